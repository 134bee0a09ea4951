use std::time::Duration;

use hdrhistogram::Histogram;

/// Latency statistics in milliseconds. Values are `None` until at least one
/// outcome has been recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySummary {
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub mean_ms: Option<f64>,
    pub stdev_ms: Option<f64>,
    pub p50_ms: Option<f64>,
    pub p75_ms: Option<f64>,
    pub p90_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    /// Value-at-percentile table for every integer percentile 1..=99.
    pub distribution_ms: Vec<(u8, f64)>,
    pub count: u64,
}

impl LatencySummary {
    pub(crate) fn from_histogram(h: &Histogram<u64>) -> Self {
        let count = h.len();
        let us_to_ms = |v: u64| v as f64 / 1000.0;

        let distribution_ms = if count > 0 {
            (1u8..=99)
                .map(|p| (p, us_to_ms(h.value_at_quantile(f64::from(p) / 100.0))))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            min_ms: (count > 0).then(|| us_to_ms(h.min())),
            max_ms: (count > 0).then(|| us_to_ms(h.max())),
            mean_ms: (count > 0).then(|| h.mean() / 1000.0),
            stdev_ms: (count > 0).then(|| h.stdev() / 1000.0),
            p50_ms: (count > 0).then(|| us_to_ms(h.value_at_quantile(0.50))),
            p75_ms: (count > 0).then(|| us_to_ms(h.value_at_quantile(0.75))),
            p90_ms: (count > 0).then(|| us_to_ms(h.value_at_quantile(0.90))),
            p95_ms: (count > 0).then(|| us_to_ms(h.value_at_quantile(0.95))),
            p99_ms: (count > 0).then(|| us_to_ms(h.value_at_quantile(0.99))),
            distribution_ms,
            count,
        }
    }

    /// Value at the given integer percentile (1..=99), if recorded.
    pub fn percentile_ms(&self, p: u8) -> Option<f64> {
        self.distribution_ms
            .iter()
            .find(|(q, _)| *q == p)
            .map(|(_, v)| *v)
    }
}

/// Consistent point-in-time view of one run's aggregated statistics.
///
/// `success + errors == invocations` holds for every snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub invocations: u64,
    pub success: u64,
    pub errors: u64,
    /// The elapsed measured window (run time minus warm-up).
    pub measured: Duration,
    pub latency: LatencySummary,
}

impl StatsSnapshot {
    /// Fraction of recorded invocations that failed. Zero when nothing was
    /// recorded.
    pub fn error_rate(&self) -> f64 {
        if self.invocations == 0 {
            0.0
        } else {
            self.errors as f64 / self.invocations as f64
        }
    }

    /// Recorded invocations per second of measured time. Zero when the
    /// measured window is empty.
    pub fn throughput(&self) -> f64 {
        let secs = self.measured.as_secs_f64();
        if secs <= 0.0 {
            0.0
        } else {
            self.invocations as f64 / secs
        }
    }
}
