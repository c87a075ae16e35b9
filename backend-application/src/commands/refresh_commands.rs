use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use backend_domain::services::{inject_live_reading, AnomalyScorer};
use backend_domain::{Reading, RiskLevel, ScoredReading};

use crate::{AppError, AppState};

#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshOptions {
    pub live_injection: bool,
    pub live_seed: Option<u64>,
}

impl RefreshOptions {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            live_injection: state.config.live_injection,
            live_seed: state.config.live_seed,
        }
    }
}

/// One dashboard refresh: load the table, inject a live reading, score the batch.
pub async fn refresh_scores(state: &AppState) -> Result<Vec<ScoredReading>, AppError> {
    refresh_scores_with(state, RefreshOptions::from_state(state)).await
}

pub async fn refresh_scores_with(
    state: &AppState,
    options: RefreshOptions,
) -> Result<Vec<ScoredReading>, AppError> {
    let readings = match state.reading_repo.load_readings().await {
        Ok(readings) => readings,
        Err(err) => {
            state.metrics.record_refresh_failure();
            error!("failed to load readings: {}", err);
            return Err(AppError::Internal(err));
        }
    };

    match score_table(&readings, &state.scorer, options, Local::now().naive_local()) {
        Ok(scored) => {
            let high = scored
                .iter()
                .filter(|row| row.risk_level == RiskLevel::High)
                .count();
            state.metrics.record_refresh(scored.len(), high);
            info!(rows = scored.len(), high, "scored reading batch");
            Ok(scored)
        }
        Err(err) => {
            state.metrics.record_refresh_failure();
            error!("scoring failed: {}", err);
            Err(err)
        }
    }
}

/// Pure part of a refresh, separated so a fixed clock and seed make it reproducible.
pub fn score_table(
    readings: &[Reading],
    scorer: &AnomalyScorer,
    options: RefreshOptions,
    now: NaiveDateTime,
) -> Result<Vec<ScoredReading>, AppError> {
    if readings.is_empty() {
        return Err(AppError::NoData("reading table is empty".to_string()));
    }
    let batch = if options.live_injection {
        let mut rng = match options.live_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        inject_live_reading(readings, &mut rng, now)?
    } else {
        readings.to_vec()
    };
    Ok(scorer.score(&batch)?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::testing::{broken_state, state_with, table};

    use super::*;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn score_table_with_injection_changes_one_timestamp() {
        let options = RefreshOptions {
            live_injection: true,
            live_seed: Some(3),
        };
        let scored = score_table(&table(), &AnomalyScorer::default(), options, noon()).expect("score");
        assert_eq!(scored.len(), 20);
        let stamped = scored
            .iter()
            .filter(|row| row.timestamp == "2024-03-01 12:00:00")
            .count();
        assert_eq!(stamped, 1);
    }

    #[test]
    fn score_table_rejects_empty_tables() {
        let err = score_table(&[], &AnomalyScorer::default(), RefreshOptions::default(), noon())
            .expect_err("empty table");
        assert!(matches!(err, AppError::NoData(_)));
    }

    #[test]
    fn missing_values_surface_as_invalid_data() {
        let mut readings = table();
        readings[3].usage = None;
        let err = score_table(&readings, &AnomalyScorer::default(), RefreshOptions::default(), noon())
            .expect_err("missing usage");
        assert!(matches!(err, AppError::InvalidData(_)));
    }

    #[tokio::test]
    async fn refresh_records_metrics() {
        let state = state_with(table(), true);
        let scored = refresh_scores(&state).await.expect("refresh");
        assert_eq!(scored.len(), 20);
        assert!(state
            .metrics
            .render_prometheus()
            .contains("leakwatch_rows_scored_total 20\n"));
    }

    #[tokio::test]
    async fn refresh_reports_load_failures() {
        let state = broken_state();
        let err = refresh_scores(&state).await.expect_err("load failure");
        assert!(matches!(err, AppError::Internal(_)));
        assert!(state
            .metrics
            .render_prometheus()
            .contains("leakwatch_refresh_failures_total 1\n"));
    }
}
