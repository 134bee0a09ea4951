use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::{Duration, Instant};

use loadgauge_metrics::StatsRecorder;

use crate::sync::{CancelToken, StartGate};

/// The operation under test, erased to a string-error closure. Must tolerate
/// repeated, concurrent invocation from independent workers.
pub(crate) type Operation = dyn Fn() -> std::result::Result<(), String> + Send + Sync;

pub(crate) struct WorkerContext {
    pub worker_id: u64,
    pub op: Arc<Operation>,
    pub recorder: Arc<StatsRecorder>,
    pub warm_up: Duration,
    pub cancel: Arc<CancelToken>,
    pub start: Arc<StartGate>,
}

/// Invoke-measure-record loop for one worker thread.
///
/// Runs until the cancellation token is raised; the check happens between
/// invocations only, so one in-flight invocation may run past the nominal
/// deadline. An `Err` return or a panic from the operation is recorded as an
/// error outcome and never terminates the worker. Invocations that start
/// before the per-worker warm-up deadline execute but are not recorded.
pub(crate) fn worker_loop(ctx: WorkerContext) {
    ctx.start.wait();
    let measure_from = Instant::now() + ctx.warm_up;

    while !ctx.cancel.is_cancelled() {
        let begun = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| (ctx.op)()));
        let latency = begun.elapsed();

        if begun < measure_from {
            continue;
        }

        match outcome {
            Ok(Ok(())) => ctx.recorder.record_success(latency),
            Ok(Err(err)) => {
                tracing::debug!(worker = ctx.worker_id, error = %err, "operation failed");
                ctx.recorder.record_error(latency);
            }
            Err(_) => {
                tracing::debug!(worker = ctx.worker_id, "operation panicked");
                ctx.recorder.record_error(latency);
            }
        }
    }

    tracing::trace!(worker = ctx.worker_id, "worker stopped");
}
