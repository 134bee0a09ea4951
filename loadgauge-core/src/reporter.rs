use crate::context::RunContext;
use crate::error::BoxError;

/// Consumer of finished runs.
///
/// Registered reporters are invoked sequentially once validation completes,
/// with the target identifier and every run finished so far for that target.
/// An error from one reporter is logged and does not stop the others, and it
/// never affects the run's verdict.
pub trait Reporter: Send + Sync {
    fn report(&self, target: &str, runs: &[RunContext]) -> Result<(), BoxError>;
}
