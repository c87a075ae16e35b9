use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    refreshes: AtomicU64,
    rows_scored: AtomicU64,
    refresh_failures: AtomicU64,
    last_high_risk_rows: AtomicU64,
}

impl Metrics {
    pub fn record_refresh(&self, row_count: usize, high_risk_rows: usize) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
        self.rows_scored
            .fetch_add(row_count as u64, Ordering::Relaxed);
        self.last_high_risk_rows
            .store(high_risk_rows as u64, Ordering::Relaxed);
    }

    pub fn record_refresh_failure(&self) {
        self.refresh_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let refreshes = self.refreshes.load(Ordering::Relaxed);
        let rows = self.rows_scored.load(Ordering::Relaxed);
        let failures = self.refresh_failures.load(Ordering::Relaxed);
        let high = self.last_high_risk_rows.load(Ordering::Relaxed);

        format!(
            "# TYPE leakwatch_refreshes_total counter\n\
leakwatch_refreshes_total {}\n\
# TYPE leakwatch_rows_scored_total counter\n\
leakwatch_rows_scored_total {}\n\
# TYPE leakwatch_refresh_failures_total counter\n\
leakwatch_refresh_failures_total {}\n\
# TYPE leakwatch_high_risk_rows gauge\n\
leakwatch_high_risk_rows {}\n",
            refreshes, rows, failures, high
        )
    }
}
