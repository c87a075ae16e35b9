// Reading entity
// One sensor sample for a zone, as it appears in the input table.

use serde::{Deserialize, Serialize};

use crate::value_objects::ZoneId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(rename = "Zone_ID")]
    pub zone_id: ZoneId,
    /// Source text of the timestamp. Formats are mixed, see `parse_timestamp`.
    #[serde(rename = "Date")]
    pub timestamp: String,
    #[serde(rename = "Water_Usage_Liters", default)]
    pub usage: Option<f64>,
    #[serde(rename = "Pressure", default)]
    pub pressure: Option<f64>,
}

impl Reading {
    pub fn new(zone_id: impl Into<String>, timestamp: impl Into<String>, usage: f64, pressure: f64) -> Self {
        Self {
            zone_id: ZoneId(zone_id.into()),
            timestamp: timestamp.into(),
            usage: Some(usage),
            pressure: Some(pressure),
        }
    }
}
