mod config;
mod context;
mod error;
mod orchestrator;
mod reporter;
mod sync;
mod thresholds;
mod validator;
mod worker;

pub use config::RunConfig;
pub use context::RunContext;
pub use error::{BoxError, Error, Result};
pub use orchestrator::RunOrchestrator;
pub use reporter::Reporter;
pub use sync::{CancelToken, StartGate, ThreadFactory};
pub use thresholds::{
    Threshold, ThresholdMetric, ThresholdOp, ThresholdViolation, parse_threshold,
};
pub use validator::{Verdict, validate};
