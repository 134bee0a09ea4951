use std::fmt::Write as _;

use loadgauge_core::{BoxError, Reporter, RunContext, Verdict};

/// Prints a human-readable summary of every finished run to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&self, target: &str, runs: &[RunContext]) -> Result<(), BoxError> {
        print!("{}", render(target, runs));
        Ok(())
    }
}

fn format_ms(v: Option<f64>) -> String {
    match v {
        Some(ms) => format!("{ms:.2}ms"),
        None => "n/a".to_string(),
    }
}

pub(crate) fn render(target: &str, runs: &[RunContext]) -> String {
    let mut out = String::new();

    writeln!(&mut out, "target: {target}").ok();

    if runs.is_empty() {
        out.push_str("no finished runs\n");
        return out;
    }

    for (idx, ctx) in runs.iter().enumerate() {
        let s = &ctx.snapshot;

        writeln!(
            &mut out,
            "run #{}: workers={} warm_up={} duration={}",
            idx + 1,
            ctx.config.workers,
            humantime::format_duration(ctx.config.warm_up),
            humantime::format_duration(ctx.config.duration),
        )
        .ok();
        writeln!(
            &mut out,
            "  invocations: {} (errors {})",
            s.invocations, s.errors
        )
        .ok();
        writeln!(&mut out, "  error_rate: {:.2}%", s.error_rate() * 100.0).ok();
        writeln!(&mut out, "  throughput: {:.1}/s", s.throughput()).ok();

        if s.latency.count > 0 {
            writeln!(
                &mut out,
                "  latency = p50={} p90={} p99={} mean={} max={} (n={})",
                format_ms(s.latency.p50_ms),
                format_ms(s.latency.p90_ms),
                format_ms(s.latency.p99_ms),
                format_ms(s.latency.mean_ms),
                format_ms(s.latency.max_ms),
                s.latency.count
            )
            .ok();
        } else {
            out.push_str("  latency: n/a\n");
        }

        match &ctx.verdict {
            Verdict::Passed => out.push_str("  verdict: pass\n"),
            Verdict::NoData => out.push_str("  verdict: no data\n"),
            Verdict::Failed(violations) => {
                writeln!(&mut out, "  verdict: fail ({} violated)", violations.len()).ok();
                for v in violations {
                    let observed = match v.observed {
                        Some(value) => format!("{value:.3}"),
                        None => "n/a".to_string(),
                    };
                    writeln!(
                        &mut out,
                        "    {} (observed {observed})",
                        v.threshold
                    )
                    .ok();
                }
            }
        }

        out.push('\n');
    }

    out
}
