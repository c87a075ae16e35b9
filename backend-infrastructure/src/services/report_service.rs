use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::fs;
use tracing::info;

pub const DASHBOARD_FILE: &str = "dashboard.html";
pub const SCORED_FILE: &str = "scored.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub dashboard: PathBuf,
    pub scored: PathBuf,
}

/// Writes a rendered dashboard and the scored table side by side, replacing older files.
pub async fn write_report(report_dir: &Path, dashboard_html: &str, scored_csv: &[u8]) -> Result<ReportFiles> {
    fs::create_dir_all(report_dir).await?;
    let files = ReportFiles {
        dashboard: report_dir.join(DASHBOARD_FILE),
        scored: report_dir.join(SCORED_FILE),
    };
    fs::write(&files.dashboard, dashboard_html).await?;
    fs::write(&files.scored, scored_csv).await?;
    info!(dir = %report_dir.display(), "report written");
    Ok(files)
}
