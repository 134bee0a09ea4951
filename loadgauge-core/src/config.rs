use std::time::Duration;

use crate::error::{Error, Result};
use crate::thresholds::Threshold;

/// Immutable description of one measurement run.
///
/// `duration` is the total wall-clock budget measured from worker release,
/// not from the end of warm-up; a config whose `warm_up` meets or exceeds
/// `duration` is valid and produces a run that records nothing.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Number of concurrent worker threads.
    pub workers: u64,
    /// Per-worker grace period during which outcomes are executed but not
    /// recorded.
    pub warm_up: Duration,
    /// Total wall-clock budget for the run.
    pub duration: Duration,
    /// Requirements evaluated against the final snapshot.
    pub thresholds: Vec<Threshold>,
}

impl RunConfig {
    /// Checked by the orchestrator before any worker is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::InvalidWorkers);
        }
        if self.duration.is_zero() {
            return Err(Error::InvalidDuration);
        }
        Ok(())
    }
}
