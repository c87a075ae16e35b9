use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use backend_application::AppState;
use backend_infrastructure::{AppConfig, CsvReadingRepository, CsvScoredExporter};

pub struct AppContext {
    pub config: AppConfig,
    pub state: AppState,
}

impl AppContext {
    /// Loads configuration from `config_path`, or from `LEAKWATCH_CONFIG` when absent.
    pub async fn load(config_path: Option<&str>) -> Result<AppConfig> {
        match config_path {
            Some(path) => AppConfig::load_from(path).await,
            None => AppConfig::load().await,
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let runtime_config = config.to_runtime_config();
        info!(
            data_path = %runtime_config.data_path,
            live_injection = runtime_config.live_injection,
            "wiring application state"
        );
        let reading_repo = Arc::new(CsvReadingRepository::new(&runtime_config.data_path));
        let state = AppState::new(runtime_config, reading_repo, Arc::new(CsvScoredExporter));
        Self { config, state }
    }
}
