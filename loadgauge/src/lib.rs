//! Micro load-generation and measurement engine: run an operation
//! concurrently across a fixed set of worker threads for a bounded duration,
//! aggregate outcome and latency statistics, validate them against
//! thresholds, and hand the result to one or more reporters.
//!
//! ```
//! use loadgauge::{ConsoleReporter, RunConfig, RunOrchestrator, parse_threshold};
//! use std::time::Duration;
//!
//! let mut orchestrator = RunOrchestrator::new("noop", || {
//!     Ok::<(), std::convert::Infallible>(())
//! })
//! .with_reporter(ConsoleReporter);
//!
//! let config = RunConfig {
//!     workers: 2,
//!     duration: Duration::from_millis(50),
//!     thresholds: vec![parse_threshold("error_rate<0.01")?],
//!     ..RunConfig::default()
//! };
//!
//! let run = orchestrator.run(config)?;
//! assert!(run.verdict.passed());
//! # Ok::<(), loadgauge::Error>(())
//! ```

mod report;

pub use loadgauge_core::{
    BoxError, CancelToken, Error, Reporter, Result, RunConfig, RunContext, RunOrchestrator,
    StartGate, ThreadFactory, Threshold, ThresholdMetric, ThresholdOp, ThresholdViolation,
    Verdict, parse_threshold, validate,
};
pub use loadgauge_metrics::{LatencySummary, StatsRecorder, StatsSnapshot};
pub use report::{ConsoleReporter, JsonReporter};
