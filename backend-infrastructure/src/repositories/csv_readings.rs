use std::io::Read;
use std::path::PathBuf;

use anyhow::anyhow;
use async_trait::async_trait;
use thiserror::Error;
use tokio::fs;
use tracing::info;

use backend_domain::{Reading, ReadingRepository, ScoredReading, ScoredTableExporter};

pub const READING_COLUMNS: [&str; 4] = ["Zone_ID", "Date", "Water_Usage_Liters", "Pressure"];
pub const SCORED_COLUMNS: [&str; 8] = [
    "Zone_ID",
    "Date",
    "Water_Usage_Liters",
    "Pressure",
    "anomaly",
    "anomaly_score",
    "risk_score",
    "Risk_Level",
];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("reading table {0} not found")]
    NotFound(String),
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },
    #[error("reading table lacks the '{0}' column")]
    MissingColumn(&'static str),
    #[error("malformed reading table: {0}")]
    Csv(#[from] csv::Error),
}

/// Historical readings kept in a CSV file, re-read on every load.
pub struct CsvReadingRepository {
    path: PathBuf,
}

impl CsvReadingRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, TableError> {
        let display = self.path.display().to_string();
        if !self.path.exists() {
            return Err(TableError::NotFound(display));
        }
        fs::read(&self.path).await.map_err(|err| TableError::Read {
            path: display,
            message: err.to_string(),
        })
    }
}

#[async_trait]
impl ReadingRepository for CsvReadingRepository {
    async fn load_readings(&self) -> anyhow::Result<Vec<Reading>> {
        let bytes = self.read_bytes().await?;
        let readings = parse_readings(bytes.as_slice())?;
        info!(rows = readings.len(), path = %self.path.display(), "loaded reading table");
        Ok(readings)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let bytes = self.read_bytes().await?;
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        check_headers(reader.headers()?)?;
        Ok(())
    }
}

/// Parses a reading table. Extra columns are ignored and empty cells become missing values.
pub fn parse_readings<R: Read>(source: R) -> Result<Vec<Reading>, TableError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    check_headers(reader.headers()?)?;
    reader
        .deserialize::<Reading>()
        .map(|row| row.map_err(TableError::from))
        .collect()
}

fn check_headers(headers: &csv::StringRecord) -> Result<(), TableError> {
    for column in READING_COLUMNS {
        if !headers.iter().any(|header| header.trim() == column) {
            return Err(TableError::MissingColumn(column));
        }
    }
    Ok(())
}

pub fn encode_scored_csv(rows: &[ScoredReading]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.is_empty() {
        writer.write_record(SCORED_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush scored table: {}", err))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvScoredExporter;

impl ScoredTableExporter for CsvScoredExporter {
    fn encode(&self, rows: &[ScoredReading]) -> anyhow::Result<Vec<u8>> {
        encode_scored_csv(rows)
    }

    fn content_type(&self) -> &'static str {
        "text/csv; charset=utf-8"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use backend_domain::{RiskLevel, Verdict, ZoneId};

    use super::*;

    const SAMPLE: &str = "\
Zone_ID,Date,Water_Usage_Liters,Pressure,Operator
Z1,2024-01-01,120.5,5.1,amy
Z2, 2024-01-01 ,98,4.8,bo
Z3,2024-01-02,,5.2,cy
";

    #[test]
    fn parses_rows_in_order_and_keeps_gaps() {
        let readings = parse_readings(SAMPLE.as_bytes()).expect("parse");
        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0], Reading::new("Z1", "2024-01-01", 120.5, 5.1));
        assert_eq!(readings[1].timestamp, "2024-01-01");
        assert_eq!(readings[2].usage, None);
        assert_eq!(readings[2].pressure, Some(5.2));
    }

    #[test]
    fn missing_column_is_reported() {
        let err = parse_readings("Zone_ID,Date,Pressure\nZ1,2024-01-01,5.0\n".as_bytes())
            .expect_err("no usage column");
        assert!(matches!(err, TableError::MissingColumn("Water_Usage_Liters")));
    }

    #[test]
    fn non_numeric_cells_fail_the_table() {
        let err = parse_readings("Zone_ID,Date,Water_Usage_Liters,Pressure\nZ1,2024-01-01,lots,5.0\n".as_bytes())
            .expect_err("bad number");
        assert!(matches!(err, TableError::Csv(_)));
    }

    #[tokio::test]
    async fn repository_reads_the_file_each_time() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(SAMPLE.as_bytes()).expect("write");
        let repo = CsvReadingRepository::new(file.path());

        assert_eq!(repo.load_readings().await.expect("load").len(), 3);
        repo.ping().await.expect("ping");

        file.write_all(b"Z4,2024-01-03,77,4.9,dee\n").expect("append");
        assert_eq!(repo.load_readings().await.expect("reload").len(), 4);
    }

    #[tokio::test]
    async fn absent_file_fails_ping() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = CsvReadingRepository::new(dir.path().join("missing.csv"));
        assert!(repo.ping().await.is_err());
        assert!(repo.load_readings().await.is_err());
    }

    #[test]
    fn scored_export_has_the_output_columns() {
        let rows = vec![ScoredReading {
            zone_id: ZoneId::from("Z1"),
            timestamp: "2024-01-01".to_string(),
            usage: 120.5,
            pressure: 5.1,
            anomaly: Verdict::Outlier,
            anomaly_score: -0.25,
            risk_score: 100.0,
            risk_level: RiskLevel::High,
        }];
        let text = String::from_utf8(encode_scored_csv(&rows).expect("encode")).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(SCORED_COLUMNS.join(",").as_str()));
        assert_eq!(lines.next(), Some("Z1,2024-01-01,120.5,5.1,-1,-0.25,100.0,High"));

        let empty = String::from_utf8(encode_scored_csv(&[]).expect("encode")).expect("utf8");
        assert_eq!(empty.trim_end(), SCORED_COLUMNS.join(","));
    }
}
