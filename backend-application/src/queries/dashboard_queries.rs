use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Local, Weekday};

use backend_domain::services::explain;
use backend_domain::{
    format_timestamp, parse_timestamp, RiskLevel, ScoredReading, ZoneLocation, HIGH_RISK_THRESHOLD,
    MEDIUM_RISK_THRESHOLD,
};

use crate::commands::refresh_commands::refresh_scores;
use crate::dtos::{
    DashboardQuery, DashboardView, Insight, InsightSeverity, MapPoint, RiskCounts, ScatterPoint,
    SeriesPoint, SeverityBucket, UsagePoint, WeekdayEvents, ZoneDashboard,
};
use crate::{AppError, AppState};

const CRITICAL_INSIGHTS: usize = 2;
const WARNING_INSIGHTS: usize = 1;
const WARNING_MESSAGE: &str = "Abnormal water usage detected. Monitor closely.";

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub async fn load_dashboard(state: &AppState, query: DashboardQuery) -> Result<DashboardView, AppError> {
    let scored = refresh_scores(state).await?;
    build_dashboard(&scored, &state.config.zones, query.zone.as_deref())
}

pub fn build_dashboard(
    rows: &[ScoredReading],
    locations: &[ZoneLocation],
    zone: Option<&str>,
) -> Result<DashboardView, AppError> {
    let zones = zone_ids(rows);
    let selected_zone = match zone.map(str::trim).filter(|zone| !zone.is_empty()) {
        Some(requested) => {
            if !zones.iter().any(|known| known == requested) {
                return Err(AppError::BadRequest(format!("unknown zone '{}'", requested)));
            }
            Some(requested.to_string())
        }
        None => zones.first().cloned(),
    };

    Ok(DashboardView {
        generated_at: format_timestamp(&Local::now().naive_local()),
        total_rows: rows.len(),
        counts: risk_counts(rows),
        map: map_points(rows, locations),
        insights: insights(rows),
        selected: selected_zone.map(|zone| zone_dashboard(rows, &zone)),
        zones,
    })
}

pub fn risk_counts(rows: &[ScoredReading]) -> RiskCounts {
    rows.iter().fold(RiskCounts::default(), |mut counts, row| {
        match row.risk_level {
            RiskLevel::High => counts.high += 1,
            RiskLevel::Medium => counts.medium += 1,
            RiskLevel::Low => counts.low += 1,
        }
        counts
    })
}

/// Rows whose zone has no known location are left off the map.
pub fn map_points(rows: &[ScoredReading], locations: &[ZoneLocation]) -> Vec<MapPoint> {
    let by_zone: HashMap<&str, &ZoneLocation> = locations
        .iter()
        .map(|location| (location.zone_id.as_str(), location))
        .collect();
    rows.iter()
        .filter_map(|row| {
            let location = by_zone.get(row.zone_id.as_str())?;
            let (color, radius) = match row.risk_level {
                RiskLevel::High => ([239, 68, 68], 70_000),
                RiskLevel::Medium => ([234, 179, 8], 50_000),
                RiskLevel::Low => ([34, 197, 94], 30_000),
            };
            Some(MapPoint {
                lat: location.latitude,
                lon: location.longitude,
                zone: row.zone_id.to_string(),
                risk: row.risk_level,
                risk_score: row.risk_score,
                color,
                radius,
            })
        })
        .collect()
}

pub fn insights(rows: &[ScoredReading]) -> Vec<Insight> {
    let critical = rows
        .iter()
        .filter(|row| row.risk_level == RiskLevel::High)
        .take(CRITICAL_INSIGHTS)
        .map(|row| Insight {
            severity: InsightSeverity::Critical,
            zone: row.zone_id.to_string(),
            message: explain(RiskLevel::High).to_string(),
        });
    let warnings = rows
        .iter()
        .filter(|row| row.risk_level == RiskLevel::Medium)
        .take(WARNING_INSIGHTS)
        .map(|row| Insight {
            severity: InsightSeverity::Warning,
            zone: row.zone_id.to_string(),
            message: WARNING_MESSAGE.to_string(),
        });
    critical.chain(warnings).collect()
}

/// Distinct zones in first-seen order.
pub fn zone_ids(rows: &[ScoredReading]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| seen.insert(row.zone_id.as_str()))
        .map(|row| row.zone_id.to_string())
        .collect()
}

pub fn zone_dashboard(rows: &[ScoredReading], zone: &str) -> ZoneDashboard {
    let zone_rows: Vec<&ScoredReading> = rows.iter().filter(|row| row.zone_id.as_str() == zone).collect();
    let risk: Vec<f64> = zone_rows.iter().map(|row| row.risk_score).collect();
    let predicted = back_fill(&rolling_mean(&risk, 3));
    let predicted_values: Vec<f64> = predicted.iter().flatten().copied().collect();

    ZoneDashboard {
        zone: zone.to_string(),
        usage_series: usage_series(&zone_rows),
        daily_loss_risk: group_by_date(&zone_rows, |values| values.iter().sum()),
        predicted_risk: zone_rows
            .iter()
            .zip(predicted)
            .map(|(row, value)| SeriesPoint {
                date: row.timestamp.clone(),
                value,
            })
            .collect(),
        predicted_mean: mean(&predicted_values),
        recommended_action: recommended_action(mean(&risk).unwrap_or(0.0)).to_string(),
        severity: severity_distribution(&zone_rows),
        daily_severity: group_by_date(&zone_rows, |values| values.iter().sum::<f64>() / values.len() as f64),
        usage_vs_pressure: zone_rows
            .iter()
            .map(|row| ScatterPoint {
                pressure: row.pressure,
                usage: row.usage,
                risk_score: row.risk_score,
            })
            .collect(),
        weekday_timeline: weekday_timeline(&zone_rows),
    }
}

fn usage_series(rows: &[&ScoredReading]) -> Vec<UsagePoint> {
    let usage: Vec<f64> = rows.iter().map(|row| row.usage).collect();
    rows.iter()
        .zip(rolling_mean(&usage, 2))
        .map(|(row, expected)| UsagePoint {
            date: row.timestamp.clone(),
            actual: row.usage,
            expected,
        })
        .collect()
}

/// Aggregates risk scores per distinct timestamp text, keys in ascending order.
fn group_by_date(rows: &[&ScoredReading], aggregate: impl Fn(&[f64]) -> f64) -> Vec<SeriesPoint> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.timestamp.as_str()).or_default().push(row.risk_score);
    }
    groups
        .into_iter()
        .map(|(date, values)| SeriesPoint {
            date: date.to_string(),
            value: Some(aggregate(&values)),
        })
        .collect()
}

pub fn recommended_action(mean_risk: f64) -> &'static str {
    if mean_risk > HIGH_RISK_THRESHOLD {
        "Inspect underground pipelines immediately"
    } else if mean_risk > MEDIUM_RISK_THRESHOLD {
        "Increase pressure & flow monitoring"
    } else {
        "Routine maintenance recommended"
    }
}

fn severity_distribution(rows: &[&ScoredReading]) -> Vec<SeverityBucket> {
    let total = rows.len();
    RiskLevel::ALL
        .iter()
        .map(|level| {
            let count = rows.iter().filter(|row| row.risk_level == *level).count();
            let percent = if total > 0 { (count * 100 / total) as u32 } else { 0 };
            SeverityBucket {
                level: *level,
                count,
                percent,
            }
        })
        .collect()
}

fn weekday_timeline(rows: &[&ScoredReading]) -> Option<Vec<WeekdayEvents>> {
    let parsed: Vec<_> = rows
        .iter()
        .filter_map(|row| parse_timestamp(&row.timestamp).map(|time| (time, row.risk_level)))
        .collect();
    let distinct: HashSet<_> = parsed.iter().map(|(time, _)| *time).collect();
    if distinct.len() < 2 {
        return None;
    }
    Some(
        WEEKDAYS
            .iter()
            .map(|day| {
                let on_day = parsed.iter().filter(|(time, _)| time.weekday() == *day);
                WeekdayEvents {
                    day: weekday_name(*day).to_string(),
                    total: on_day.clone().count(),
                    anomalies: on_day.filter(|(_, level)| level.is_anomalous()).count(),
                }
            })
            .collect(),
    )
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Trailing mean; the first `window - 1` positions have no value.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if window == 0 || i + 1 < window {
                None
            } else {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

/// Fills gaps with the next available value; trailing gaps stay empty.
pub fn back_fill(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut next = None;
    let mut filled: Vec<Option<f64>> = values
        .iter()
        .rev()
        .map(|value| {
            if value.is_some() {
                next = *value;
            }
            next
        })
        .collect();
    filled.reverse();
    filled
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{Verdict, ZoneId};

    fn row(zone: &str, date: &str, usage: f64, risk_score: f64) -> ScoredReading {
        ScoredReading {
            zone_id: ZoneId::from(zone),
            timestamp: date.to_string(),
            usage,
            pressure: 5.0,
            anomaly: if risk_score >= 70.0 { Verdict::Outlier } else { Verdict::Inlier },
            anomaly_score: -risk_score / 100.0,
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
        }
    }

    fn batch() -> Vec<ScoredReading> {
        vec![
            row("Z1", "2024-01-01", 100.0, 10.0),
            row("Z2", "2024-01-01", 120.0, 75.0),
            row("Z1", "2024-01-02", 110.0, 45.0),
            row("Z4", "2024-01-02", 300.0, 100.0),
            row("Z1", "2024-01-03", 130.0, 80.0),
            row("Z3", "2024-01-03", 90.0, 0.0),
            row("Z2", "2024-01-04", 95.0, 50.0),
        ]
    }

    #[test]
    fn counts_cover_every_row() {
        let counts = risk_counts(&batch());
        assert_eq!(counts, RiskCounts { high: 3, medium: 2, low: 2 });
    }

    #[test]
    fn map_skips_zones_without_location() {
        let points = map_points(&batch(), &ZoneLocation::defaults());
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|point| point.zone != "Z4"));
        let high = points.iter().find(|point| point.risk == RiskLevel::High).expect("high point");
        assert_eq!((high.color, high.radius), ([239, 68, 68], 70_000));
    }

    #[test]
    fn insights_take_two_critical_and_one_warning() {
        let list = insights(&batch());
        let summary: Vec<(InsightSeverity, &str)> = list
            .iter()
            .map(|insight| (insight.severity, insight.zone.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (InsightSeverity::Critical, "Z2"),
                (InsightSeverity::Critical, "Z4"),
                (InsightSeverity::Warning, "Z1"),
            ]
        );
    }

    #[test]
    fn zones_keep_first_seen_order() {
        assert_eq!(zone_ids(&batch()), vec!["Z1", "Z2", "Z4", "Z3"]);
    }

    #[test]
    fn rolling_mean_and_back_fill() {
        let rolled = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_eq!(rolled, vec![None, None, Some(2.0), Some(3.0)]);
        assert_eq!(back_fill(&rolled), vec![Some(2.0), Some(2.0), Some(2.0), Some(3.0)]);
        assert_eq!(back_fill(&rolling_mean(&[1.0, 2.0], 3)), vec![None, None]);
    }

    #[test]
    fn zone_panel_aggregates_selected_zone_only() {
        let panel = zone_dashboard(&batch(), "Z1");
        assert_eq!(panel.usage_series.len(), 3);
        assert_eq!(panel.usage_series[0].expected, None);
        assert_eq!(panel.usage_series[1].expected, Some(105.0));
        assert_eq!(panel.predicted_risk[0].value, Some(45.0));
        assert_eq!(panel.predicted_mean, Some(45.0));
        assert_eq!(panel.recommended_action, "Increase pressure & flow monitoring");

        let severity: Vec<(RiskLevel, usize, u32)> = panel
            .severity
            .iter()
            .map(|bucket| (bucket.level, bucket.count, bucket.percent))
            .collect();
        assert_eq!(
            severity,
            vec![
                (RiskLevel::Low, 1, 33),
                (RiskLevel::Medium, 1, 33),
                (RiskLevel::High, 1, 33)
            ]
        );

        let timeline = panel.weekday_timeline.expect("three distinct dates");
        // 2024-01-01 was a Monday
        assert_eq!(timeline[0], WeekdayEvents { day: "Monday".to_string(), total: 1, anomalies: 0 });
        assert_eq!(timeline[1].anomalies, 1);
        assert_eq!(timeline[2].anomalies, 1);
    }

    #[test]
    fn timeline_needs_two_distinct_timestamps() {
        let rows = vec![row("Z1", "2024-01-01", 100.0, 10.0), row("Z1", "not a date", 100.0, 10.0)];
        assert_eq!(zone_dashboard(&rows, "Z1").weekday_timeline, None);
    }

    #[test]
    fn daily_groups_are_sorted_by_date_text() {
        let rows = vec![
            row("Z1", "2024-01-02", 100.0, 20.0),
            row("Z1", "2024-01-01", 100.0, 10.0),
            row("Z1", "2024-01-02", 100.0, 40.0),
        ];
        let panel = zone_dashboard(&rows, "Z1");
        let totals: Vec<(&str, Option<f64>)> = panel
            .daily_loss_risk
            .iter()
            .map(|point| (point.date.as_str(), point.value))
            .collect();
        assert_eq!(totals, vec![("2024-01-01", Some(10.0)), ("2024-01-02", Some(60.0))]);
        assert_eq!(panel.daily_severity[1].value, Some(30.0));
    }

    #[test]
    fn unknown_zone_is_a_bad_request() {
        let err = build_dashboard(&batch(), &ZoneLocation::defaults(), Some("Z9")).expect_err("unknown zone");
        assert!(matches!(err, AppError::BadRequest(_)));

        let view = build_dashboard(&batch(), &ZoneLocation::defaults(), None).expect("default zone");
        assert_eq!(view.selected.map(|panel| panel.zone), Some("Z1".to_string()));
    }

    #[test]
    fn recommended_action_tiers() {
        assert_eq!(recommended_action(85.0), "Inspect underground pipelines immediately");
        assert_eq!(recommended_action(70.0), "Increase pressure & flow monitoring");
        assert_eq!(recommended_action(40.5), "Increase pressure & flow monitoring");
        assert_eq!(recommended_action(40.0), "Routine maintenance recommended");
        assert_eq!(recommended_action(12.5), "Routine maintenance recommended");
    }

    #[tokio::test]
    async fn load_dashboard_scores_a_fresh_batch() {
        let state = crate::testing::state_with(crate::testing::table(), true);
        let view = load_dashboard(&state, DashboardQuery { zone: Some("Z2".to_string()) })
            .await
            .expect("dashboard");
        assert_eq!(view.total_rows, 20);
        assert_eq!(view.counts.high + view.counts.medium + view.counts.low, 20);
        assert_eq!(view.zones, vec!["Z1", "Z2", "Z3"]);
        assert_eq!(view.map.len(), 20);
        assert_eq!(view.selected.map(|panel| panel.zone), Some("Z2".to_string()));
    }
}
