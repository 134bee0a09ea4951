use loadgauge_metrics::StatsSnapshot;

use crate::config::RunConfig;
use crate::validator::Verdict;

/// The frozen record of one finished run, handed to every reporter.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Identifier of the operation under test, for reporting.
    pub target: String,
    pub config: RunConfig,
    pub snapshot: StatsSnapshot,
    pub verdict: Verdict,
}
