// Domain error taxonomy
// Hard errors abort the whole batch; DegenerateScale is recoverable and handled by the scorer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("cannot inject a live reading into an empty table")]
    EmptyInput,
    #[error("row {row} (zone {zone_id}) has no usable {field} value")]
    FeatureMissing {
        row: usize,
        zone_id: String,
        field: &'static str,
    },
    #[error("cannot fit the outlier model on an empty batch")]
    InsufficientData,
    #[error("unknown risk level '{0}'")]
    UnknownRiskLevel(String),
}

/// Every value in the batch was identical, so min-max rescaling has no range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("all {len} values are identical ({value}), min-max scale is undefined")]
pub struct DegenerateScale {
    pub len: usize,
    pub value: f64,
}
