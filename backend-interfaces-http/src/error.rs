use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use backend_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    Unauthorized,
    BadRequest(String),
    NoData(String),
    InvalidData(String),
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::NoData(_) => StatusCode::SERVICE_UNAVAILABLE,
            HttpError::InvalidData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            HttpError::Unauthorized => "unauthorized".to_string(),
            HttpError::BadRequest(msg) => format!("bad request: {}", msg),
            HttpError::NoData(msg) => format!("no data available: {}", msg),
            HttpError::InvalidData(msg) => format!("invalid reading table: {}", msg),
            HttpError::Internal(msg) => msg.clone(),
        }
    }
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::Unauthorized => HttpError::Unauthorized,
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::NoData(msg) => HttpError::NoData(msg),
            AppError::InvalidData(msg) => HttpError::InvalidData(msg),
            AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.message() })).into_response()
    }
}
