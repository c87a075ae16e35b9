// Scored reading entity
// A reading that passed validation, annotated by one scoring pass.

use serde::{Deserialize, Serialize};

use crate::entities::Reading;
use crate::value_objects::{RiskLevel, Verdict, ZoneId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredReading {
    #[serde(rename = "Zone_ID")]
    pub zone_id: ZoneId,
    #[serde(rename = "Date")]
    pub timestamp: String,
    #[serde(rename = "Water_Usage_Liters")]
    pub usage: f64,
    #[serde(rename = "Pressure")]
    pub pressure: f64,
    pub anomaly: Verdict,
    /// Raw model output, lower means more anomalous.
    pub anomaly_score: f64,
    /// Negated anomaly score rescaled over the batch into [0, 100].
    pub risk_score: f64,
    #[serde(rename = "Risk_Level")]
    pub risk_level: RiskLevel,
}

impl ScoredReading {
    pub fn reading(&self) -> Reading {
        Reading {
            zone_id: self.zone_id.clone(),
            timestamp: self.timestamp.clone(),
            usage: Some(self.usage),
            pressure: Some(self.pressure),
        }
    }
}
