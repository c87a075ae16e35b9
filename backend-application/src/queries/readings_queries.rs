use serde::Serialize;

use backend_domain::services::explain;
use backend_domain::{RiskLevel, ScoredReading};

use crate::commands::refresh_commands::refresh_scores;
use crate::{AppError, AppState};

pub struct ExportedTable {
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub level: RiskLevel,
    pub text: &'static str,
}

pub async fn list_scored(state: &AppState) -> Result<Vec<ScoredReading>, AppError> {
    refresh_scores(state).await
}

pub async fn export_scored(state: &AppState) -> Result<ExportedTable, AppError> {
    let rows = refresh_scores(state).await?;
    let body = state.exporter.encode(&rows)?;
    Ok(ExportedTable {
        content_type: state.exporter.content_type(),
        body,
    })
}

pub fn explain_level(label: &str) -> Result<Explanation, AppError> {
    let level: RiskLevel = label.parse()?;
    Ok(Explanation {
        level,
        text: explain(level),
    })
}
