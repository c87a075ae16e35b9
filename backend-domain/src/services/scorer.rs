use tracing::{debug, warn};

use crate::entities::{Reading, ScoredReading};
use crate::error::{DegenerateScale, DomainError};
use crate::services::IsolationForest;
use crate::value_objects::{RiskLevel, Verdict};

/// Below this many rows the forest still fits, but its scores are unstable.
pub const USABILITY_FLOOR: usize = 10;

pub const RISK_SCORE_MIN: f64 = 0.0;
pub const RISK_SCORE_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub contamination: f64,
    pub seed: u64,
    pub n_estimators: usize,
    pub max_samples: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            contamination: 0.2,
            seed: 42,
            n_estimators: 100,
            max_samples: 256,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnomalyScorer {
    config: ScoringConfig,
}

impl AnomalyScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Refits the forest over the whole batch and annotates every row.
    /// Risk scores are relative to this batch only.
    pub fn score(&self, readings: &[Reading]) -> Result<Vec<ScoredReading>, DomainError> {
        let features = extract_features(readings)?;
        if features.len() < USABILITY_FLOOR {
            warn!(
                rows = features.len(),
                floor = USABILITY_FLOOR,
                "scoring a batch below the usability floor, risk scores are unstable"
            );
        }

        let forest = IsolationForest::fit(&features, &self.config)?;
        let decisions = forest.decision_function(&features);
        let negated: Vec<f64> = decisions.iter().map(|decision| -decision).collect();
        let risk_scores = match min_max_scale(&negated, RISK_SCORE_MIN, RISK_SCORE_MAX) {
            Ok(scaled) => scaled,
            Err(degenerate) => {
                debug!("{degenerate}, assigning risk score {RISK_SCORE_MIN} to every row");
                vec![RISK_SCORE_MIN; negated.len()]
            }
        };

        Ok(readings
            .iter()
            .zip(features)
            .zip(decisions)
            .zip(risk_scores)
            .map(|(((reading, [usage, pressure]), decision), risk_score)| ScoredReading {
                zone_id: reading.zone_id.clone(),
                timestamp: reading.timestamp.clone(),
                usage,
                pressure,
                anomaly: Verdict::from_decision(decision),
                anomaly_score: decision,
                risk_score,
                risk_level: RiskLevel::from_score(risk_score),
            })
            .collect())
    }
}

/// Builds the `(usage, pressure)` matrix in row order. NaN and infinities count as missing.
pub fn extract_features(readings: &[Reading]) -> Result<Vec<[f64; 2]>, DomainError> {
    if readings.is_empty() {
        return Err(DomainError::InsufficientData);
    }
    readings
        .iter()
        .enumerate()
        .map(|(row, reading)| {
            let usage = require_feature(row, reading, reading.usage, "usage")?;
            let pressure = require_feature(row, reading, reading.pressure, "pressure")?;
            Ok([usage, pressure])
        })
        .collect()
}

fn require_feature(
    row: usize,
    reading: &Reading,
    value: Option<f64>,
    field: &'static str,
) -> Result<f64, DomainError> {
    value
        .filter(|value| value.is_finite())
        .ok_or_else(|| DomainError::FeatureMissing {
            row,
            zone_id: reading.zone_id.to_string(),
            field,
        })
}

/// Maps the batch minimum to `lo` and the maximum to `hi` exactly.
pub fn min_max_scale(values: &[f64], lo: f64, hi: f64) -> Result<Vec<f64>, DegenerateScale> {
    let Some(first) = values.first().copied() else {
        return Ok(Vec::new());
    };
    let (min, max) = values
        .iter()
        .fold((first, first), |(min, max), &value| (min.min(value), max.max(value)));
    if max <= min {
        return Err(DegenerateScale {
            len: values.len(),
            value: min,
        });
    }
    let range = max - min;
    Ok(values
        .iter()
        .map(|value| ((value - min) / range * (hi - lo) + lo).clamp(lo, hi))
        .collect())
}
