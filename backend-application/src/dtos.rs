// View models handed to the presentation layer

use serde::{Deserialize, Serialize};

use backend_domain::RiskLevel;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
    pub zone: String,
    pub risk: RiskLevel,
    pub risk_score: f64,
    pub color: [u8; 3],
    pub radius: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub severity: InsightSeverity,
    pub zone: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsagePoint {
    pub date: String,
    pub actual: f64,
    /// Rolling mean over the previous and current reading.
    pub expected: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityBucket {
    pub level: RiskLevel,
    pub count: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub pressure: f64,
    pub usage: f64,
    pub risk_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayEvents {
    pub day: String,
    pub total: usize,
    pub anomalies: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneDashboard {
    pub zone: String,
    pub usage_series: Vec<UsagePoint>,
    pub daily_loss_risk: Vec<SeriesPoint>,
    pub predicted_risk: Vec<SeriesPoint>,
    pub predicted_mean: Option<f64>,
    pub recommended_action: String,
    pub severity: Vec<SeverityBucket>,
    pub daily_severity: Vec<SeriesPoint>,
    pub usage_vs_pressure: Vec<ScatterPoint>,
    /// Absent when fewer than two distinct timestamps could be parsed.
    pub weekday_timeline: Option<Vec<WeekdayEvents>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub generated_at: String,
    pub total_rows: usize,
    pub counts: RiskCounts,
    pub map: Vec<MapPoint>,
    pub insights: Vec<Insight>,
    pub zones: Vec<String>,
    pub selected: Option<ZoneDashboard>,
}
