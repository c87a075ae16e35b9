use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;

use backend_application::queries::readings_queries::{self, Explanation};
use backend_application::AppState;
use backend_domain::ScoredReading;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_scored(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ScoredReading>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let rows = readings_queries::list_scored(&state).await?;
    Ok(Json(rows))
}

pub async fn export_scored(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let table = readings_queries::export_scored(&state).await?;
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(table.content_type));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"scored.csv\""),
    );
    Ok((headers, table.body).into_response())
}

pub async fn explain_level(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(level): Path<String>,
) -> Result<Json<Explanation>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(readings_queries::explain_level(&level)?))
}
