use std::sync::Arc;
use std::thread;
use std::time::Instant;

use loadgauge_metrics::StatsRecorder;

use crate::config::RunConfig;
use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::sync::{CancelToken, StartGate, ThreadFactory};
use crate::validator;
use crate::worker::{self, Operation, WorkerContext};

/// Run lifecycle phases, in order. Tracked for transition logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
enum Phase {
    Idle,
    Spawning,
    Running,
    Cancelling,
    Draining,
    Validating,
    Reporting,
    Done,
}

fn enter(phase: &mut Phase, next: Phase) {
    tracing::debug!(from = %phase, to = %next, "run phase");
    *phase = next;
}

/// Drives the full lifecycle of measurement runs for one operation under
/// test: spawn workers, enforce the time budget, cancel, drain, validate and
/// report.
///
/// The orchestrator owns its collaborators by composition: the operation
/// provider, the registered reporters and a run-scoped [`ThreadFactory`].
/// Finished runs accumulate in [`RunOrchestrator::runs`]; every reporter
/// receives the full history each time a run completes.
pub struct RunOrchestrator {
    target: String,
    op: Arc<Operation>,
    reporters: Vec<Box<dyn Reporter>>,
    threads: ThreadFactory,
    runs: Vec<RunContext>,
}

impl RunOrchestrator {
    pub fn new<F, E>(target: impl Into<String>, op: F) -> Self
    where
        F: Fn() -> std::result::Result<(), E> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            target: target.into(),
            op: Arc::new(move || op().map_err(|err| err.to_string())),
            reporters: Vec::new(),
            threads: ThreadFactory::default(),
            runs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    #[must_use]
    pub fn with_thread_factory(mut self, threads: ThreadFactory) -> Self {
        self.threads = threads;
        self
    }

    /// Finished runs, oldest first.
    pub fn runs(&self) -> &[RunContext] {
        &self.runs
    }

    /// Executes one measurement run.
    ///
    /// Returns an error only for an invalid config or a failed thread spawn,
    /// both before any outcome is recorded. A run whose thresholds are
    /// violated completes normally; the result is the verdict on the
    /// returned context.
    pub fn run(&mut self, config: RunConfig) -> Result<&RunContext> {
        config.validate()?;

        let mut phase = Phase::Idle;
        enter(&mut phase, Phase::Spawning);

        let recorder = Arc::new(StatsRecorder::default());
        let cancel = Arc::new(CancelToken::default());
        let start = Arc::new(StartGate::default());

        for worker_id in 1..=config.workers {
            let ctx = WorkerContext {
                worker_id,
                op: self.op.clone(),
                recorder: recorder.clone(),
                warm_up: config.warm_up,
                cancel: cancel.clone(),
                start: start.clone(),
            };

            let spawned = self
                .threads
                .builder(worker_id)
                .spawn(move || worker::worker_loop(ctx));
            if let Err(err) = spawned {
                // Let the workers parked so far exit before surfacing.
                cancel.cancel();
                start.release();
                return Err(Error::Spawn(err));
            }
        }

        enter(&mut phase, Phase::Running);
        let started = Instant::now();
        start.release();
        thread::sleep(config.duration);

        enter(&mut phase, Phase::Cancelling);
        cancel.cancel();
        let cancelled_at = Instant::now();

        enter(&mut phase, Phase::Draining);
        // Grace period for in-flight invocations, approximated by the slowest
        // invocation recorded so far. A straggler slower than anything seen
        // yet can still record after the snapshot below; workers are not
        // joined, so a hung invocation cannot wedge the run.
        let drain = recorder.max_latency();
        if !drain.is_zero() {
            thread::sleep(drain);
        }

        enter(&mut phase, Phase::Validating);
        let measured = cancelled_at
            .duration_since(started)
            .saturating_sub(config.warm_up);
        let snapshot = recorder.snapshot(measured);
        let verdict = validator::validate(&config.thresholds, &snapshot);
        tracing::info!(
            run = %self.target,
            invocations = snapshot.invocations,
            errors = snapshot.errors,
            passed = verdict.passed(),
            "run finished"
        );

        enter(&mut phase, Phase::Reporting);
        self.runs.push(RunContext {
            target: self.target.clone(),
            config,
            snapshot,
            verdict,
        });
        let finished = self.runs.len() - 1;

        for reporter in &self.reporters {
            if let Err(err) = reporter.report(&self.target, &self.runs) {
                tracing::error!(run = %self.target, error = %err, "reporter failed");
            }
        }

        enter(&mut phase, Phase::Done);
        Ok(&self.runs[finished])
    }
}
