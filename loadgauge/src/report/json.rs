use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;

use loadgauge_core::{BoxError, Reporter, RunContext, Verdict};

/// Writes the full run history as pretty-printed JSON to a file, replacing
/// any previous report at the same path.
#[derive(Debug, Clone)]
pub struct JsonReporter {
    path: PathBuf,
}

impl JsonReporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Reporter for JsonReporter {
    fn report(&self, target: &str, runs: &[RunContext]) -> Result<(), BoxError> {
        write_report(&self.path, target, runs).map_err(Into::into)
    }
}

fn write_report(path: &Path, target: &str, runs: &[RunContext]) -> anyhow::Result<()> {
    let report = JsonReport {
        kind: "report",
        target: target.to_string(),
        runs: runs.iter().map(JsonRun::from_context).collect(),
    };
    let body = serde_json::to_string_pretty(&report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report dir: {}", parent.display()))?;
    }
    std::fs::write(path, body)
        .with_context(|| format!("failed to write report: {}", path.display()))?;

    Ok(())
}

#[derive(Debug, Serialize)]
struct JsonReport {
    kind: &'static str,
    target: String,
    runs: Vec<JsonRun>,
}

#[derive(Debug, Serialize)]
struct JsonRun {
    workers: u64,
    warm_up_ms: u64,
    duration_ms: u64,

    invocations: u64,
    success: u64,
    errors: u64,
    error_rate: f64,
    throughput: f64,

    latency: Option<JsonLatency>,

    verdict: &'static str,
    violations: Vec<JsonViolation>,
}

#[derive(Debug, Serialize)]
struct JsonLatency {
    min_ms: f64,
    max_ms: f64,
    mean_ms: f64,
    stdev_ms: f64,
    p50_ms: f64,
    p75_ms: f64,
    p90_ms: f64,
    p95_ms: f64,
    p99_ms: f64,
    count: u64,
}

#[derive(Debug, Serialize)]
struct JsonViolation {
    threshold: String,
    observed: Option<f64>,
}

impl JsonRun {
    fn from_context(ctx: &RunContext) -> Self {
        let s = &ctx.snapshot;

        let latency = (s.latency.count > 0).then(|| JsonLatency {
            min_ms: s.latency.min_ms.unwrap_or_default(),
            max_ms: s.latency.max_ms.unwrap_or_default(),
            mean_ms: s.latency.mean_ms.unwrap_or_default(),
            stdev_ms: s.latency.stdev_ms.unwrap_or_default(),
            p50_ms: s.latency.p50_ms.unwrap_or_default(),
            p75_ms: s.latency.p75_ms.unwrap_or_default(),
            p90_ms: s.latency.p90_ms.unwrap_or_default(),
            p95_ms: s.latency.p95_ms.unwrap_or_default(),
            p99_ms: s.latency.p99_ms.unwrap_or_default(),
            count: s.latency.count,
        });

        let (verdict, violations) = match &ctx.verdict {
            Verdict::Passed => ("pass", Vec::new()),
            Verdict::NoData => ("no_data", Vec::new()),
            Verdict::Failed(violations) => (
                "fail",
                violations
                    .iter()
                    .map(|v| JsonViolation {
                        threshold: v.threshold.to_string(),
                        observed: v.observed,
                    })
                    .collect(),
            ),
        };

        Self {
            workers: ctx.config.workers,
            warm_up_ms: u64::try_from(ctx.config.warm_up.as_millis()).unwrap_or(u64::MAX),
            duration_ms: u64::try_from(ctx.config.duration.as_millis()).unwrap_or(u64::MAX),
            invocations: s.invocations,
            success: s.success,
            errors: s.errors,
            error_rate: s.error_rate(),
            throughput: s.throughput(),
            latency,
            verdict,
            violations,
        }
    }
}
