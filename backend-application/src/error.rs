use backend_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("no data available: {0}")]
    NoData(String),
    #[error("invalid reading table: {0}")]
    InvalidData(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::EmptyInput | DomainError::InsufficientData => AppError::NoData(err.to_string()),
            DomainError::FeatureMissing { .. } => AppError::InvalidData(err.to_string()),
            DomainError::UnknownRiskLevel(_) => AppError::BadRequest(err.to_string()),
        }
    }
}
