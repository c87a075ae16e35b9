use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::{info, warn};

use backend_domain::{RuntimeConfig, ScoringConfig, ZoneLocation};

use crate::config::validation::{validate_contamination, validate_zones};

pub const CONFIG_ENV: &str = "LEAKWATCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub data_path: String,
    pub report_dir: String,
    pub live_injection: bool,
    pub live_seed: Option<u64>,
    pub request_timeout_seconds: u64,
    pub contamination: f64,
    pub model_seed: u64,
    pub n_estimators: usize,
    pub max_samples: usize,
    pub zones: Vec<ZoneLocation>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let scoring = ScoringConfig::default();
        Self {
            bind_addr: "127.0.0.1:8501".to_string(),
            api_token: None,
            data_path: "./data/water_usage.csv".to_string(),
            report_dir: "./reports".to_string(),
            live_injection: true,
            live_seed: None,
            request_timeout_seconds: 15,
            contamination: scoring.contamination,
            model_seed: scoring.seed,
            n_estimators: scoring.n_estimators,
            max_samples: scoring.max_samples,
            zones: ZoneLocation::defaults(),
        }
    }
}

impl AppConfig {
    /// Reads the file named by `LEAKWATCH_CONFIG`, falling back to `./config.toml`.
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &str) -> Result<Self> {
        let file_path = Path::new(path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            let config: AppConfig = toml::from_str(&content)
                .map_err(|err| anyhow!("failed to parse {}: {}", file_path.display(), err))?;
            info!("loaded configuration from {}", file_path.display());
            config
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        for zone in &mut self.zones {
            zone.zone_id = zone.zone_id.trim().to_string();
            if zone.label.as_deref().is_some_and(|label| label.trim().is_empty()) {
                zone.label = None;
            }
        }
        self.request_timeout_seconds = self.request_timeout_seconds.max(1);
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.data_path = resolve_path(base, &self.data_path);
        self.report_dir = resolve_path(base, &self.report_dir);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.data_path.trim().is_empty() {
            return Err(anyhow!("data_path must not be empty"));
        }
        validate_contamination(self.contamination)?;
        if self.n_estimators == 0 {
            return Err(anyhow!("n_estimators must be greater than 0"));
        }
        if self.max_samples == 0 {
            return Err(anyhow!("max_samples must be greater than 0"));
        }
        validate_zones(&self.zones)?;
        Ok(())
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            contamination: self.contamination,
            seed: self.model_seed,
            n_estimators: self.n_estimators,
            max_samples: self.max_samples,
        }
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            data_path: self.data_path.clone(),
            report_dir: self.report_dir.clone(),
            live_injection: self.live_injection,
            live_seed: self.live_seed,
            request_timeout_seconds: self.request_timeout_seconds,
            scoring: self.scoring_config(),
            zones: self.zones.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("LEAKWATCH_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("LEAKWATCH_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("LEAKWATCH_DATA_PATH") {
            self.data_path = value;
        }
        if let Some(value) = lookup("LEAKWATCH_REPORT_DIR") {
            self.report_dir = value;
        }
        if let Some(value) = lookup("LEAKWATCH_LIVE_INJECTION") {
            self.live_injection = value.parse().unwrap_or(self.live_injection);
        }
        if let Some(value) = lookup("LEAKWATCH_LIVE_SEED") {
            self.live_seed = value.parse().ok();
        }
        if let Some(value) = lookup("LEAKWATCH_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("LEAKWATCH_CONTAMINATION") {
            self.contamination = value.parse().unwrap_or(self.contamination);
        }
        if let Some(value) = lookup("LEAKWATCH_MODEL_SEED") {
            self.model_seed = value.parse().unwrap_or(self.model_seed);
        }
        if let Some(value) = lookup("LEAKWATCH_N_ESTIMATORS") {
            self.n_estimators = value.parse().unwrap_or(self.n_estimators);
        }
        if let Some(value) = lookup("LEAKWATCH_MAX_SAMPLES") {
            self.max_samples = value.parse().unwrap_or(self.max_samples);
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
