use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use loadgauge_core::{
    BoxError, Error, Reporter, RunConfig, RunContext, RunOrchestrator, Verdict, parse_threshold,
};

fn sleepy_op(ms: u64) -> impl Fn() -> Result<(), std::io::Error> + Send + Sync + 'static {
    move || {
        std::thread::sleep(Duration::from_millis(ms));
        Ok(())
    }
}

fn threshold(raw: &str) -> loadgauge_core::Threshold {
    parse_threshold(raw).unwrap_or_else(|e| panic!("{e}"))
}

#[test]
fn steady_operation_yields_expected_invocation_count() {
    let mut orchestrator = RunOrchestrator::new("steady", sleepy_op(10));
    let config = RunConfig {
        workers: 4,
        duration: Duration::from_millis(300),
        ..RunConfig::default()
    };

    let run = orchestrator
        .run(config)
        .unwrap_or_else(|e| panic!("{e}"));
    let s = &run.snapshot;

    assert_eq!(s.errors, 0);
    assert_eq!(s.success + s.errors, s.invocations);
    // 4 workers * ~30 invocations of 10ms in 300ms. Generous bounds to stay
    // robust under scheduler noise; the ceiling is one extra in-flight
    // invocation per worker.
    assert!(s.invocations >= 40, "invocations = {}", s.invocations);
    assert!(s.invocations <= 4 * 31, "invocations = {}", s.invocations);
    assert!(s.throughput() > 0.0);
    assert!(s.latency.p50_ms.is_some_and(|v| v >= 9.0));
}

#[test]
fn always_failing_operation_fails_error_rate_threshold() {
    let mut orchestrator = RunOrchestrator::new("failing", || {
        Err::<(), _>(std::io::Error::other("boom"))
    });
    let config = RunConfig {
        workers: 2,
        duration: Duration::from_millis(100),
        thresholds: vec![threshold("error_rate<0.5")],
        ..RunConfig::default()
    };

    let run = orchestrator
        .run(config)
        .unwrap_or_else(|e| panic!("{e}"));

    assert!(run.snapshot.invocations > 0);
    assert_eq!(run.snapshot.error_rate(), 1.0);
    assert_eq!(run.snapshot.success, 0);

    match &run.verdict {
        Verdict::Failed(violations) => {
            assert_eq!(violations.len(), 1);
            assert_eq!(violations[0].observed, Some(1.0));
        }
        other => panic!("expected failed verdict, got {other:?}"),
    }
}

#[test]
fn run_shorter_than_warm_up_yields_no_data() {
    let mut orchestrator = RunOrchestrator::new("warming", sleepy_op(1));
    let config = RunConfig {
        workers: 2,
        warm_up: Duration::from_secs(10),
        duration: Duration::from_millis(60),
        thresholds: vec![threshold("throughput>=1")],
        ..RunConfig::default()
    };

    let run = orchestrator
        .run(config)
        .unwrap_or_else(|e| panic!("{e}"));

    assert_eq!(run.snapshot.invocations, 0);
    assert_eq!(run.verdict, Verdict::NoData);
    assert!(!run.verdict.passed());
}

#[test]
fn invalid_config_fails_before_any_side_effect() {
    let reported = Arc::new(AtomicUsize::new(0));

    struct CountingSink(Arc<AtomicUsize>);
    impl Reporter for CountingSink {
        fn report(&self, _target: &str, _runs: &[RunContext]) -> Result<(), BoxError> {
            self.0.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    let mut orchestrator = RunOrchestrator::new("invalid", sleepy_op(1))
        .with_reporter(CountingSink(reported.clone()));

    let no_workers = RunConfig {
        workers: 0,
        duration: Duration::from_secs(1),
        ..RunConfig::default()
    };
    assert!(matches!(
        orchestrator.run(no_workers),
        Err(Error::InvalidWorkers)
    ));

    let no_duration = RunConfig {
        workers: 1,
        duration: Duration::ZERO,
        ..RunConfig::default()
    };
    assert!(matches!(
        orchestrator.run(no_duration),
        Err(Error::InvalidDuration)
    ));

    assert!(orchestrator.runs().is_empty());
    assert_eq!(reported.load(Ordering::Relaxed), 0);
}

#[test]
fn sink_failure_is_isolated_from_other_sinks() {
    struct FailingSink;
    impl Reporter for FailingSink {
        fn report(&self, _target: &str, _runs: &[RunContext]) -> Result<(), BoxError> {
            Err("sink down".into())
        }
    }

    struct RecordingSink {
        calls: Arc<AtomicUsize>,
    }
    impl Reporter for RecordingSink {
        fn report(&self, target: &str, runs: &[RunContext]) -> Result<(), BoxError> {
            assert_eq!(target, "isolated");
            assert_eq!(runs.len(), 1);
            assert!(runs[0].snapshot.invocations > 0);
            self.calls.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut orchestrator = RunOrchestrator::new("isolated", sleepy_op(1))
        .with_reporter(FailingSink)
        .with_reporter(RecordingSink {
            calls: calls.clone(),
        });

    let config = RunConfig {
        workers: 1,
        duration: Duration::from_millis(60),
        ..RunConfig::default()
    };
    let run = orchestrator
        .run(config)
        .unwrap_or_else(|e| panic!("{e}"));

    assert!(run.verdict.passed());
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn reporters_see_the_full_run_history() {
    struct HistorySink {
        seen: Arc<AtomicUsize>,
    }
    impl Reporter for HistorySink {
        fn report(&self, _target: &str, runs: &[RunContext]) -> Result<(), BoxError> {
            self.seen.store(runs.len(), Ordering::Relaxed);
            Ok(())
        }
    }

    let seen = Arc::new(AtomicUsize::new(0));
    let mut orchestrator = RunOrchestrator::new("history", sleepy_op(1))
        .with_reporter(HistorySink { seen: seen.clone() });

    let config = RunConfig {
        workers: 1,
        duration: Duration::from_millis(40),
        ..RunConfig::default()
    };

    for expected in 1..=3 {
        orchestrator
            .run(config.clone())
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(seen.load(Ordering::Relaxed), expected);
    }
    assert_eq!(orchestrator.runs().len(), 3);
}

#[test]
fn mixed_outcomes_keep_the_count_invariant() {
    let calls = Arc::new(AtomicUsize::new(0));
    let op = {
        let calls = calls.clone();
        move || {
            if calls.fetch_add(1, Ordering::Relaxed) % 3 == 0 {
                Err(std::io::Error::other("every third fails"))
            } else {
                Ok(())
            }
        }
    };

    let mut orchestrator = RunOrchestrator::new("mixed", op);
    let config = RunConfig {
        workers: 2,
        duration: Duration::from_millis(80),
        ..RunConfig::default()
    };

    let run = orchestrator
        .run(config)
        .unwrap_or_else(|e| panic!("{e}"));
    let s = &run.snapshot;

    assert!(s.invocations > 0);
    assert!(s.errors > 0);
    assert!(s.success > 0);
    assert_eq!(s.success + s.errors, s.invocations);
    assert!(s.error_rate() > 0.0 && s.error_rate() < 1.0);
}
