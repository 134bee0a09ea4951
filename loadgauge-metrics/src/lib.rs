mod recorder;
mod snapshot;

pub use recorder::StatsRecorder;
pub use snapshot::{LatencySummary, StatsSnapshot};
