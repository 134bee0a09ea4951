use loadgauge_metrics::StatsSnapshot;

use crate::thresholds::{Threshold, ThresholdMetric, ThresholdOp, ThresholdViolation};

/// Outcome of validating a snapshot against a config's thresholds.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Passed,
    Failed(Vec<ThresholdViolation>),
    /// The run recorded no invocations; thresholds were not evaluated.
    NoData,
}

impl Verdict {
    pub fn passed(&self) -> bool {
        matches!(self, Verdict::Passed)
    }

    pub fn violations(&self) -> &[ThresholdViolation] {
        match self {
            Verdict::Failed(v) => v,
            _ => &[],
        }
    }
}

/// Evaluates every threshold against the snapshot. Pure; mutates nothing.
///
/// A snapshot with zero recorded invocations yields [`Verdict::NoData`]
/// rather than a pass, and no metric is ever computed from an empty
/// denominator.
pub fn validate(thresholds: &[Threshold], snapshot: &StatsSnapshot) -> Verdict {
    if snapshot.invocations == 0 {
        return Verdict::NoData;
    }

    let mut violations = Vec::new();
    for threshold in thresholds {
        let observed = observed_value(snapshot, threshold.metric);
        let passed = observed.is_some_and(|v| compare(v, threshold.op, threshold.value));
        if !passed {
            violations.push(ThresholdViolation {
                threshold: *threshold,
                observed,
            });
        }
    }

    if violations.is_empty() {
        Verdict::Passed
    } else {
        Verdict::Failed(violations)
    }
}

fn observed_value(snapshot: &StatsSnapshot, metric: ThresholdMetric) -> Option<f64> {
    match metric {
        ThresholdMetric::ErrorRate => Some(snapshot.error_rate()),
        ThresholdMetric::Throughput => Some(snapshot.throughput()),
        ThresholdMetric::MeanLatency => snapshot.latency.mean_ms,
        ThresholdMetric::MinLatency => snapshot.latency.min_ms,
        ThresholdMetric::MaxLatency => snapshot.latency.max_ms,
        ThresholdMetric::Percentile(p) => snapshot.latency.percentile_ms(p),
    }
}

fn compare(observed: f64, op: ThresholdOp, expected: f64) -> bool {
    match op {
        ThresholdOp::Lt => observed < expected,
        ThresholdOp::Lte => observed <= expected,
        ThresholdOp::Gt => observed > expected,
        ThresholdOp::Gte => observed >= expected,
        ThresholdOp::Eq => observed == expected,
    }
}
