// Natural-language explanation per risk tier

use crate::error::DomainError;
use crate::value_objects::RiskLevel;

pub fn explain(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => {
            "A sharp increase in water usage combined with reduced pressure was detected. \
             This pattern strongly suggests a possible underground leak."
        }
        RiskLevel::Medium => {
            "Water usage shows moderate deviation from historical patterns. \
             This zone should be monitored closely."
        }
        RiskLevel::Low => {
            "Water usage and pressure levels are within expected limits. \
             No immediate action is required."
        }
    }
}

/// Same as `explain`, for tier labels coming from outside the crate.
pub fn explain_label(label: &str) -> Result<&'static str, DomainError> {
    Ok(explain(label.parse()?))
}
