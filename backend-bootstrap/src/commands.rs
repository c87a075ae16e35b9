use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use backend_application::commands::refresh_commands::{refresh_scores, refresh_scores_with, RefreshOptions};
use backend_application::queries::dashboard_queries::build_dashboard;
use backend_application::AppState;
use backend_infrastructure::{encode_scored_csv, write_report, ReportFiles};
use backend_interfaces_http::render_dashboard;

use crate::cli::OutputFormat;

/// Scores one batch and returns it encoded for stdout.
pub async fn score_once(
    state: &AppState,
    format: OutputFormat,
    no_live: bool,
    seed: Option<u64>,
) -> Result<Vec<u8>> {
    let options = RefreshOptions {
        live_injection: state.config.live_injection && !no_live,
        live_seed: seed.or(state.config.live_seed),
    };
    let scored = refresh_scores_with(state, options).await?;
    let encoded = match format {
        OutputFormat::Csv => encode_scored_csv(&scored)?,
        OutputFormat::Json => {
            let mut out = serde_json::to_vec_pretty(&scored)?;
            out.push(b'\n');
            out
        }
    };
    Ok(encoded)
}

/// Renders the dashboard and the scored table from the same batch.
pub async fn write_reports(state: &AppState, out_dir: Option<PathBuf>, zone: Option<&str>) -> Result<ReportFiles> {
    let scored = refresh_scores(state).await?;
    let view = build_dashboard(&scored, &state.config.zones, zone)?;
    let dir = out_dir.unwrap_or_else(|| PathBuf::from(&state.config.report_dir));
    let files = write_report(Path::new(&dir), &render_dashboard(&view), &encode_scored_csv(&scored)?).await?;
    info!(
        dashboard = %files.dashboard.display(),
        scored = %files.scored.display(),
        rows = scored.len(),
        "report ready"
    );
    Ok(files)
}
