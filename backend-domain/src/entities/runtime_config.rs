// Runtime configuration handed from infrastructure to the application layer

use crate::entities::ZoneLocation;
use crate::services::ScoringConfig;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub data_path: String,
    pub report_dir: String,
    pub live_injection: bool,
    pub live_seed: Option<u64>,
    pub request_timeout_seconds: u64,
    pub scoring: ScoringConfig,
    pub zones: Vec<ZoneLocation>,
}
