use axum::routing::get;
use axum::Router;

use backend_application::AppState;

use crate::handlers::{dashboard_handlers, ops_handlers, readings_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_handlers::dashboard_page))
        .route("/v1/dashboard", get(dashboard_handlers::dashboard_json))
        .route("/v1/readings/scored", get(readings_handlers::list_scored))
        .route("/v1/readings/scored.csv", get(readings_handlers::export_scored))
        .route("/v1/explain/:level", get(readings_handlers::explain_level))
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
