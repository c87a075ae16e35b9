use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::warn;

use backend_application::dtos::{DashboardQuery, DashboardView};
use backend_application::queries::dashboard_queries;
use backend_application::AppState;

use crate::error::HttpError;
use crate::middleware::authorize;
use crate::views::{render_dashboard, render_unavailable};

pub async fn dashboard_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Response {
    if !authorize(&state.config, &headers) {
        return HttpError::Unauthorized.into_response();
    }
    match dashboard_queries::load_dashboard(&state, query).await {
        Ok(view) => Html(render_dashboard(&view)).into_response(),
        Err(err) => {
            let err = HttpError::from(err);
            warn!("dashboard unavailable: {}", err.message());
            (err.status(), Html(render_unavailable(&err.message()))).into_response()
        }
    }
}

pub async fn dashboard_json(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let view = dashboard_queries::load_dashboard(&state, query).await?;
    Ok(Json(view))
}
