use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

/// Cooperative, broadcast-once cancellation flag shared by every worker of a
/// run. Workers check it between invocations; an in-flight invocation is
/// allowed to finish.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Latch that parks spawned workers until the orchestrator releases the run.
///
/// All workers are spawned first and released together, keeping spawn skew
/// out of the measured window.
#[derive(Debug, Default)]
pub struct StartGate {
    released: Mutex<bool>,
    condvar: Condvar,
}

impl StartGate {
    pub fn release(&self) {
        let mut released = self
            .released
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *released = true;
        self.condvar.notify_all();
    }

    pub fn wait(&self) {
        let mut released = self
            .released
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        while !*released {
            released = self
                .condvar
                .wait(released)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }
}

/// Names the worker threads of one run. Owned by the orchestrator rather
/// than shared process-wide.
#[derive(Debug, Clone)]
pub struct ThreadFactory {
    prefix: String,
}

impl Default for ThreadFactory {
    fn default() -> Self {
        Self {
            prefix: "loadgauge-worker".to_string(),
        }
    }
}

impl ThreadFactory {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub(crate) fn builder(&self, worker_id: u64) -> std::thread::Builder {
        std::thread::Builder::new().name(format!("{}-{worker_id}", self.prefix))
    }
}
