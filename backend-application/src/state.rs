use std::sync::Arc;

use backend_domain::ports::{ReadingRepository, ScoredTableExporter};
use backend_domain::services::AnomalyScorer;
use backend_domain::RuntimeConfig;

use crate::Metrics;

/// Shared across requests: configuration, the reading source and counters.
/// No model state lives here, every refresh refits from scratch.
#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub reading_repo: Arc<dyn ReadingRepository>,
    pub exporter: Arc<dyn ScoredTableExporter>,
    pub scorer: Arc<AnomalyScorer>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        config: RuntimeConfig,
        reading_repo: Arc<dyn ReadingRepository>,
        exporter: Arc<dyn ScoredTableExporter>,
    ) -> Self {
        let scorer = Arc::new(AnomalyScorer::new(config.scoring.clone()));
        Self {
            config,
            reading_repo,
            exporter,
            scorer,
            metrics: Arc::new(Metrics::default()),
        }
    }
}
