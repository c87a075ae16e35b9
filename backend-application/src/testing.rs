// Fixtures shared by the command and query tests

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;

use backend_domain::{
    Reading, ReadingRepository, RuntimeConfig, ScoredReading, ScoredTableExporter, ScoringConfig,
    ZoneLocation,
};

use crate::AppState;

pub struct JsonLines;

impl ScoredTableExporter for JsonLines {
    fn encode(&self, rows: &[ScoredReading]) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut out, row)?;
            out.push(b'\n');
        }
        Ok(out)
    }

    fn content_type(&self) -> &'static str {
        "application/x-ndjson"
    }
}

pub struct FixedReadings(pub Vec<Reading>);

#[async_trait]
impl ReadingRepository for FixedReadings {
    async fn load_readings(&self) -> anyhow::Result<Vec<Reading>> {
        Ok(self.0.clone())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct BrokenSource;

#[async_trait]
impl ReadingRepository for BrokenSource {
    async fn load_readings(&self) -> anyhow::Result<Vec<Reading>> {
        Err(anyhow!("disk on fire"))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Err(anyhow!("disk on fire"))
    }
}

pub fn runtime_config(live_injection: bool) -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        data_path: "unused.csv".to_string(),
        report_dir: "./reports".to_string(),
        live_injection,
        live_seed: Some(7),
        request_timeout_seconds: 5,
        scoring: ScoringConfig::default(),
        zones: ZoneLocation::defaults(),
    }
}

/// Twenty unremarkable rows over zones Z1..Z3.
pub fn table() -> Vec<Reading> {
    (0..20)
        .map(|i| {
            Reading::new(
                format!("Z{}", i % 3 + 1),
                format!("2024-02-{:02}", i + 1),
                100.0 + (i % 4) as f64 * 5.0,
                5.0 + (i % 3) as f64 * 0.1,
            )
        })
        .collect()
}

pub fn state_with(readings: Vec<Reading>, live_injection: bool) -> AppState {
    AppState::new(
        runtime_config(live_injection),
        Arc::new(FixedReadings(readings)),
        Arc::new(JsonLines),
    )
}

pub fn broken_state() -> AppState {
    AppState::new(runtime_config(false), Arc::new(BrokenSource), Arc::new(JsonLines))
}
