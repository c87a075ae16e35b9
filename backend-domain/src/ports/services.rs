use crate::entities::ScoredReading;

/// Encodes a scored batch for download or report files.
pub trait ScoredTableExporter: Send + Sync {
    fn encode(&self, rows: &[ScoredReading]) -> anyhow::Result<Vec<u8>>;
    fn content_type(&self) -> &'static str;
}
