// Risk level value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub const HIGH_RISK_THRESHOLD: f64 = 70.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// Tiers are closed on their lower bound: 40 is Medium, 70 is High.
    pub fn from_score(risk_score: f64) -> Self {
        if risk_score >= HIGH_RISK_THRESHOLD {
            RiskLevel::High
        } else if risk_score >= MEDIUM_RISK_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    pub fn is_anomalous(&self) -> bool {
        matches!(self, RiskLevel::Medium | RiskLevel::High)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(DomainError::UnknownRiskLevel(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_inclusive_on_the_lower_side() {
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(39.999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(69.999), RiskLevel::Medium);
    }

    #[test]
    fn every_score_in_range_maps_to_one_tier() {
        let mut previous = RiskLevel::Low;
        for step in 0..=10_000 {
            let score = step as f64 / 100.0;
            let level = RiskLevel::from_score(score);
            // tiers only ever move upwards as the score grows
            assert!(level as u8 >= previous as u8, "tier went down at {score}");
            previous = level;
        }
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::High);
    }

    #[test]
    fn parse_accepts_known_labels_only() {
        assert_eq!("High".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(" medium ".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
        let err = "Critical".parse::<RiskLevel>().expect_err("reject unknown tier");
        assert_eq!(err, DomainError::UnknownRiskLevel("Critical".to_string()));
    }
}
