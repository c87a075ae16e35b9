use async_trait::async_trait;

use crate::entities::Reading;

/// Source of the historical reading table. Every refresh loads it anew.
#[async_trait]
pub trait ReadingRepository: Send + Sync {
    async fn load_readings(&self) -> anyhow::Result<Vec<Reading>>;
    async fn ping(&self) -> anyhow::Result<()>;
}
