// Server-rendered dashboard pages

use std::fmt::Write;

use backend_application::dtos::{DashboardView, InsightSeverity, ZoneDashboard};
use backend_domain::RiskLevel;

const STYLE: &str = r#"
:root {
  --ink: #0f172a;
  --muted: #64748b;
  --border: #e2e8f0;
  --shadow: rgba(15, 23, 42, 0.14);
  --high: #ef4444;
  --medium: #eab308;
  --low: #22c55e;
}
* { box-sizing: border-box; }
body {
  margin: 0;
  font-family: "IBM Plex Sans", "Source Sans 3", sans-serif;
  background: radial-gradient(circle at top, #1e293b 0%, #0f172a 55%, #0b1220 100%);
  color: #e2e8f0;
}
.page { max-width: 1200px; margin: 0 auto; padding: 32px 20px 48px; }
.hero {
  background: linear-gradient(135deg, rgba(14,165,233,0.18), rgba(15,23,42,0.95));
  border-radius: 20px;
  padding: 28px;
  box-shadow: 0 18px 40px rgba(15, 23, 42, 0.35);
}
.hero h1 { margin: 0 0 6px; font-size: 28px; letter-spacing: 0.01em; }
.hero p { margin: 0; color: var(--muted); font-size: 14px; }
.summary {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
  gap: 12px;
  margin-top: 18px;
}
.card {
  background: rgba(255,255,255,0.96);
  color: var(--ink);
  padding: 16px 18px;
  border-radius: 14px;
  box-shadow: 0 8px 20px rgba(15, 23, 42, 0.12);
}
.card .label { font-size: 11px; text-transform: uppercase; letter-spacing: 0.12em; color: var(--muted); }
.card .value { font-size: 22px; font-weight: 700; margin-top: 6px; }
h2 { font-size: 18px; margin: 28px 0 12px; }
.insight { padding: 12px 16px; border-radius: 12px; margin-bottom: 8px; color: var(--ink); }
.insight.critical { background: #fee2e2; border-left: 6px solid var(--high); }
.insight.warning { background: #fef9c3; border-left: 6px solid var(--medium); }
.zones a {
  display: inline-block;
  margin: 0 8px 8px 0;
  padding: 6px 12px;
  border-radius: 10px;
  background: #1e293b;
  color: #e2e8f0;
  text-decoration: none;
}
.zones a.active { background: #0ea5e9; color: #0f172a; font-weight: 600; }
.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 16px; }
.table-wrap { background: #ffffff; color: var(--ink); border-radius: 16px; overflow: hidden; box-shadow: 0 12px 28px var(--shadow); }
.table { width: 100%; border-collapse: collapse; font-size: 14px; }
.table thead th {
  text-align: left;
  font-size: 11px;
  letter-spacing: 0.12em;
  text-transform: uppercase;
  color: #64748b;
  background: #f1f5f9;
  padding: 10px 14px;
}
.table tbody td { padding: 10px 14px; border-bottom: 1px solid var(--border); }
.table tbody tr:nth-child(even) { background: #f8fafc; }
.num { text-align: right; font-variant-numeric: tabular-nums; }
.badge { display: inline-flex; padding: 4px 10px; border-radius: 999px; font-size: 12px; font-weight: 600; color: white; }
.risk-high { background: var(--high); }
.risk-medium { background: var(--medium); }
.risk-low { background: var(--low); }
.bar { height: 10px; border-radius: 6px; background: #0ea5e9; }
.empty { padding: 20px; text-align: center; color: var(--muted); }
.footer { margin-top: 16px; color: var(--muted); font-size: 12px; }
"#;

pub fn render_dashboard(view: &DashboardView) -> String {
    let counts = &view.counts;
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<section class="hero">
    <h1>Smart Water Leak Risk Dashboard</h1>
    <p>Generated {generated} · {total} readings scored</p>
    <div class="summary">
      <div class="card"><div class="label">High Risk</div><div class="value">{high}</div></div>
      <div class="card"><div class="label">Medium Risk</div><div class="value">{medium}</div></div>
      <div class="card"><div class="label">Low Risk</div><div class="value">{low}</div></div>
      <div class="card"><div class="label">Total</div><div class="value">{total}</div></div>
    </div>
  </section>"#,
        generated = escape_html(&view.generated_at),
        total = view.total_rows,
        high = counts.high,
        medium = counts.medium,
        low = counts.low,
    );

    body.push_str("\n  <h2>Alerts</h2>\n");
    if view.insights.is_empty() {
        body.push_str(r#"  <div class="empty">No alerts in this batch.</div>"#);
    }
    for insight in &view.insights {
        let (class, title) = match insight.severity {
            InsightSeverity::Critical => ("critical", "Critical"),
            InsightSeverity::Warning => ("warning", "Warning"),
        };
        let _ = writeln!(
            body,
            r#"  <div class="insight {class}"><strong>{title} · Zone {zone}</strong><br />{message}</div>"#,
            zone = escape_html(&insight.zone),
            message = escape_html(&insight.message),
        );
    }

    body.push_str("\n  <h2>Risk map</h2>\n");
    let map_rows: String = view
        .map
        .iter()
        .map(|point| {
            format!(
                "<tr><td>{zone}</td><td class=\"num\">{lat:.4}</td><td class=\"num\">{lon:.4}</td>\
                 <td class=\"num\">{score:.1}</td><td>{badge}</td></tr>",
                zone = escape_html(&point.zone),
                lat = point.lat,
                lon = point.lon,
                score = point.risk_score,
                badge = risk_badge(point.risk),
            )
        })
        .collect();
    body.push_str(&table(
        &["Zone", "Latitude", "Longitude", "Risk score", "Risk"],
        &map_rows,
        "No zone in this batch has a known location.",
    ));

    body.push_str("\n  <h2>Zones</h2>\n  <div class=\"zones\">");
    let selected = view.selected.as_ref().map(|panel| panel.zone.as_str());
    for zone in &view.zones {
        let class = if Some(zone.as_str()) == selected { " class=\"active\"" } else { "" };
        let _ = write!(
            body,
            r#"<a href="/?zone={query}"{class}>{zone}</a>"#,
            query = urlencoding::encode(zone),
            zone = escape_html(zone),
        );
    }
    body.push_str("</div>\n");

    if let Some(panel) = &view.selected {
        body.push_str(&render_zone(panel));
    }

    page("Smart Water Leak Risk Dashboard", &body)
}

fn render_zone(panel: &ZoneDashboard) -> String {
    let mut out = String::new();
    let predicted = panel
        .predicted_mean
        .map(|value| format!("{:.1}", value))
        .unwrap_or_else(|| "n/a".to_string());
    let _ = write!(
        out,
        r#"  <div class="summary">
    <div class="card"><div class="label">Predicted risk</div><div class="value">{predicted}</div></div>
    <div class="card"><div class="label">Recommended action</div><div class="value">{action}</div></div>
  </div>
"#,
        action = escape_html(&panel.recommended_action),
    );

    out.push_str("  <h2>Usage vs expected</h2>\n");
    let usage_rows: String = panel
        .usage_series
        .iter()
        .map(|point| {
            format!(
                "<tr><td>{}</td><td class=\"num\">{:.1}</td><td class=\"num\">{}</td></tr>",
                escape_html(&point.date),
                point.actual,
                optional(point.expected),
            )
        })
        .collect();
    out.push_str(&table(&["Date", "Actual", "Expected"], &usage_rows, "No readings for this zone."));

    out.push_str("  <div class=\"grid\">\n  <div>\n  <h2>Daily loss risk</h2>\n");
    out.push_str(&series_table(&panel.daily_loss_risk, "Total risk"));
    out.push_str("  </div>\n  <div>\n  <h2>Daily severity</h2>\n");
    out.push_str(&series_table(&panel.daily_severity, "Mean risk"));
    out.push_str("  </div>\n  </div>\n");

    out.push_str("  <h2>Severity distribution</h2>\n");
    let severity_rows: String = panel
        .severity
        .iter()
        .map(|bucket| {
            format!(
                "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}%</td>\
                 <td><div class=\"bar\" style=\"width:{}%\"></div></td></tr>",
                risk_badge(bucket.level),
                bucket.count,
                bucket.percent,
                bucket.percent,
            )
        })
        .collect();
    out.push_str(&table(&["Tier", "Rows", "Share", ""], &severity_rows, "No readings for this zone."));

    out.push_str("  <h2>Usage vs pressure</h2>\n");
    let scatter_rows: String = panel
        .usage_vs_pressure
        .iter()
        .map(|point| {
            format!(
                "<tr><td class=\"num\">{:.2}</td><td class=\"num\">{:.1}</td><td class=\"num\">{:.1}</td></tr>",
                point.pressure, point.usage, point.risk_score,
            )
        })
        .collect();
    out.push_str(&table(&["Pressure", "Usage", "Risk score"], &scatter_rows, "No readings for this zone."));

    out.push_str("  <h2>Anomalies by weekday</h2>\n");
    match &panel.weekday_timeline {
        Some(timeline) => {
            let rows: String = timeline
                .iter()
                .map(|day| {
                    format!(
                        "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                        day.day, day.total, day.anomalies
                    )
                })
                .collect();
            out.push_str(&table(&["Day", "Events", "Anomalies"], &rows, ""));
        }
        None => out.push_str(
            "  <div class=\"table-wrap\"><div class=\"empty\">Not enough historical data for a timeline.</div></div>\n",
        ),
    }
    out
}

/// Shown instead of the dashboard when no batch could be scored.
pub fn render_unavailable(message: &str) -> String {
    let body = format!(
        r#"<section class="hero">
    <h1>No data available</h1>
    <p>{}</p>
  </section>"#,
        escape_html(message)
    );
    page("No data available", &body)
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="page">
  {body}
  <div class="footer">Risk scores are relative to the batch they were computed in.</div>
</div>
</body>
</html>"#
    )
}

fn table(headers: &[&str], rows: &str, empty: &str) -> String {
    let head: String = headers.iter().map(|header| format!("<th>{}</th>", header)).collect();
    let content = if rows.is_empty() && !empty.is_empty() {
        format!("<div class=\"empty\">{}</div>", empty)
    } else {
        format!(
            "<table class=\"table\"><thead><tr>{}</tr></thead><tbody>{}</tbody></table>",
            head, rows
        )
    };
    format!("  <div class=\"table-wrap\">{}</div>\n", content)
}

fn series_table(points: &[backend_application::dtos::SeriesPoint], label: &str) -> String {
    let rows: String = points
        .iter()
        .map(|point| {
            format!(
                "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
                escape_html(&point.date),
                optional(point.value)
            )
        })
        .collect();
    table(&["Date", label], &rows, "No readings for this zone.")
}

fn risk_badge(level: RiskLevel) -> String {
    let class = match level {
        RiskLevel::High => "risk-high",
        RiskLevel::Medium => "risk-medium",
        RiskLevel::Low => "risk-low",
    };
    format!("<span class=\"badge {}\">{}</span>", class, level)
}

fn optional(value: Option<f64>) -> String {
    value.map(|value| format!("{:.1}", value)).unwrap_or_else(|| "–".to_string())
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
