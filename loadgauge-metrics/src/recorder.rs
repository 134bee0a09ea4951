use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use hdrhistogram::Histogram;
use parking_lot::{Mutex, RwLock};

use crate::snapshot::{LatencySummary, StatsSnapshot};

pub(crate) fn new_latency_histogram() -> Histogram<u64> {
    // Latencies in microseconds. Upper bound: 1 hour.
    match Histogram::<u64>::new_with_bounds(1, 3_600_000_000, 3) {
        Ok(h) => h,
        Err(err) => panic!("failed to create histogram: {err}"),
    }
}

/// Shared sink for the per-invocation outcomes of a single run.
///
/// Any number of workers may record concurrently. Writers hold the shared
/// side of `gate`; [`StatsRecorder::snapshot`] takes the exclusive side, so a
/// snapshot never observes a record that updated the counter but not yet the
/// latency distribution (or vice versa).
#[derive(Debug)]
pub struct StatsRecorder {
    gate: RwLock<()>,
    success: AtomicU64,
    error: AtomicU64,
    latency_us: Mutex<Histogram<u64>>,
}

impl Default for StatsRecorder {
    fn default() -> Self {
        Self {
            gate: RwLock::new(()),
            success: AtomicU64::new(0),
            error: AtomicU64::new(0),
            latency_us: Mutex::new(new_latency_histogram()),
        }
    }
}

impl StatsRecorder {
    pub fn record_success(&self, latency: Duration) {
        let _shared = self.gate.read();
        self.success.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
    }

    pub fn record_error(&self, latency: Duration) {
        let _shared = self.gate.read();
        self.error.fetch_add(1, Ordering::Relaxed);
        self.record_latency(latency);
    }

    fn record_latency(&self, latency: Duration) {
        // Clamp to the histogram floor so every outcome shows up in the
        // distribution and the histogram count matches the outcome counters.
        let us = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX).max(1);
        let mut h = self.latency_us.lock();
        let _ = h.record(us);
    }

    /// Live read, not synchronized against in-flight records.
    pub fn success_total(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    /// Live read, not synchronized against in-flight records.
    pub fn error_total(&self) -> u64 {
        self.error.load(Ordering::Relaxed)
    }

    /// Live read, not synchronized against in-flight records.
    pub fn invocations_total(&self) -> u64 {
        self.success_total().saturating_add(self.error_total())
    }

    /// Slowest invocation recorded so far. Zero until something is recorded.
    pub fn max_latency(&self) -> Duration {
        let h = self.latency_us.lock();
        if h.is_empty() {
            Duration::ZERO
        } else {
            Duration::from_micros(h.max())
        }
    }

    /// Point-in-time view of everything recorded so far.
    ///
    /// Blocks new records for the duration of the read, so the counters and
    /// the latency distribution always agree with each other. `measured` is
    /// the elapsed measured window used for throughput.
    pub fn snapshot(&self, measured: Duration) -> StatsSnapshot {
        let _exclusive = self.gate.write();

        let success = self.success.load(Ordering::Relaxed);
        let errors = self.error.load(Ordering::Relaxed);
        let h = self.latency_us.lock();

        StatsSnapshot {
            invocations: success.saturating_add(errors),
            success,
            errors,
            measured,
            latency: LatencySummary::from_histogram(&h),
        }
    }
}
