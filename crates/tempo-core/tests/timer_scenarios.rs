//! # Timer Scenario Tests
//!
//! End-to-end behaviour of the Registry and the stage timer.
//!
//! ## Groups
//! - S0: Identity and addressing
//! - S1: Single-flight transitions
//! - S2: Accumulation across intervals
//! - S3: Serialized contention

use chrono::TimeDelta;
use std::sync::Arc;
use std::time::Duration;
use tempo_core::{
    ErrorKind, IterationDraft, ManualClock, ProcessDraft, ProcessId, Registry, StageDraft,
    TempoError, TimerFault,
};

fn manual_registry() -> (Registry, ManualClock) {
    let clock = ManualClock::at_epoch();
    (Registry::with_clock(Arc::new(clock.clone())), clock)
}

// =============================================================================
// S0: IDENTITY AND ADDRESSING
// =============================================================================

mod s0_identity {
    use super::*;

    /// S0.1: The first process of a fresh registry gets id 1.
    #[test]
    fn first_process_gets_id_one() {
        let mut registry = Registry::new();
        let id = registry.create(ProcessDraft::new("Build")).expect("create");
        assert_eq!(id, ProcessId(1));
    }

    /// S0.2: Names carry no uniqueness constraint.
    #[test]
    fn duplicate_names_get_distinct_ids() {
        let mut registry = Registry::new();
        let a = registry.create(ProcessDraft::new("Build")).expect("create");
        let b = registry.create(ProcessDraft::new("Build")).expect("create");
        assert_ne!(a, b);
    }

    /// S0.3: Stopping a timer on a never-created process is NotFound.
    #[test]
    fn stop_on_unknown_process() {
        let mut registry = Registry::new();

        let err = registry.stop_timer(ProcessId(99), 0).expect_err("missing");

        assert!(matches!(err, TempoError::ProcessNotFound(ProcessId(99))));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    /// S0.4: add-stage addresses continue after the creation payload.
    #[test]
    fn added_stages_follow_payload_stages() {
        let mut registry = Registry::new();
        let id = registry
            .create(
                ProcessDraft::new("Release")
                    .with_iteration(IterationDraft::new("Sprint 1").with_stage("Design"))
                    .with_iteration(IterationDraft::new("Sprint 2").with_stage("Build")),
            )
            .expect("create");

        let added = registry
            .add_stage(id, StageDraft::new("Ship"), Some(1))
            .expect("add");

        assert_eq!(added, 2);
        let snapshot = registry.snapshot(id).expect("snapshot");
        let sprint2: Vec<usize> = snapshot.iterations[1]
            .stages
            .iter()
            .map(|s| s.index)
            .collect();
        assert_eq!(sprint2, vec![1, 2]);
    }

    /// S0.5: add-stage into a missing iteration is NotFound and adds nothing.
    #[test]
    fn add_stage_unknown_iteration() {
        let mut registry = Registry::new();
        let id = registry.create(ProcessDraft::new("Build")).expect("create");

        let err = registry
            .add_stage(id, StageDraft::new("Compile"), Some(0))
            .expect_err("no iterations");

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(registry.get(id).expect("get").stage_count(), 0);
    }
}

// =============================================================================
// S1: SINGLE-FLIGHT TRANSITIONS
// =============================================================================

mod s1_single_flight {
    use super::*;

    /// S1.1: Build / Compile with a real delay on the system clock.
    #[test]
    fn start_stop_with_real_delay() {
        let mut registry = Registry::new();
        let id = registry.create(ProcessDraft::new("Build")).expect("create");
        let index = registry
            .add_stage(id, StageDraft::new("Compile"), None)
            .expect("add");
        assert_eq!((id, index), (ProcessId(1), 0));

        registry.start_timer(id, 0).expect("start");
        std::thread::sleep(Duration::from_millis(50));
        let elapsed = registry.stop_timer(id, 0).expect("stop");

        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_secs(5));
        assert_eq!(registry.stage(id, 0).expect("stage").accumulated(), elapsed);
    }

    /// S1.2: A second start is refused and keeps the first start instant.
    #[test]
    fn double_start_keeps_first_instant() {
        let (mut registry, clock) = manual_registry();
        let id = registry.create(ProcessDraft::new("Build")).expect("create");
        registry
            .add_stage(id, StageDraft::new("Compile"), None)
            .expect("add");

        let first = registry.start_timer(id, 0).expect("start");
        clock.advance(TimeDelta::seconds(3));
        let err = registry.start_timer(id, 0).expect_err("second start");

        assert!(matches!(
            err,
            TempoError::InvalidTransition(TimerFault::AlreadyRunning)
        ));
        assert_eq!(
            registry.stage(id, 0).expect("stage").started_at(),
            Some(first)
        );
    }

    /// S1.3: Stop while idle is refused and leaves the total untouched.
    #[test]
    fn stop_while_idle_keeps_duration() {
        let (mut registry, clock) = manual_registry();
        let id = registry.create(ProcessDraft::new("Build")).expect("create");
        registry
            .add_stage(id, StageDraft::new("Compile"), None)
            .expect("add");
        registry.start_timer(id, 0).expect("start");
        clock.advance(TimeDelta::seconds(2));
        registry.stop_timer(id, 0).expect("stop");

        let err = registry.stop_timer(id, 0).expect_err("second stop");

        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(
            registry.stage(id, 0).expect("stage").accumulated(),
            Duration::from_secs(2)
        );
    }

    /// S1.4: A clock that moved backwards cannot produce a negative interval.
    #[test]
    fn backwards_clock_leaves_stage_running() {
        let (mut registry, clock) = manual_registry();
        clock.advance(TimeDelta::seconds(100));
        let id = registry.create(ProcessDraft::new("Build")).expect("create");
        registry
            .add_stage(id, StageDraft::new("Compile"), None)
            .expect("add");
        let started = registry.start_timer(id, 0).expect("start");

        clock.advance(TimeDelta::seconds(-10));
        let err = registry.stop_timer(id, 0).expect_err("negative");

        assert!(matches!(
            err,
            TempoError::InvalidTransition(TimerFault::ClockWentBackwards)
        ));
        let stage = registry.stage(id, 0).expect("stage");
        assert_eq!(stage.started_at(), Some(started));
        assert_eq!(stage.accumulated(), Duration::ZERO);

        clock.advance(TimeDelta::seconds(15));
        assert_eq!(
            registry.stop_timer(id, 0).expect("stop"),
            Duration::from_secs(5)
        );
    }
}

// =============================================================================
// S2: ACCUMULATION
// =============================================================================

mod s2_accumulation {
    use super::*;

    /// S2.1: Two intervals on the same stage are summed, not replaced.
    #[test]
    fn repeated_runs_accumulate() {
        let (mut registry, clock) = manual_registry();
        let id = registry.create(ProcessDraft::new("Build")).expect("create");
        registry
            .add_stage(id, StageDraft::new("Compile"), None)
            .expect("add");
        let test = registry
            .add_stage(id, StageDraft::new("Test"), None)
            .expect("add");
        assert_eq!(test, 1);

        registry.start_timer(id, 1).expect("start");
        clock.advance(TimeDelta::milliseconds(1_500));
        let first = registry.stop_timer(id, 1).expect("stop");

        clock.advance(TimeDelta::seconds(60));
        registry.start_timer(id, 1).expect("start");
        clock.advance(TimeDelta::milliseconds(500));
        let second = registry.stop_timer(id, 1).expect("stop");

        assert_eq!(first, Duration::from_millis(1_500));
        assert_eq!(second, Duration::from_millis(500));
        let stage = registry.stage(id, 1).expect("stage");
        assert_eq!(stage.accumulated(), first + second);
        assert_eq!(stage.completed_runs(), 2);
        assert_eq!(
            registry.stage(id, 0).expect("stage").accumulated(),
            Duration::ZERO
        );
    }

    /// S2.2: The process total sums every stage.
    #[test]
    fn process_total_sums_stages() {
        let (mut registry, clock) = manual_registry();
        let id = registry
            .create(
                ProcessDraft::new("Release").with_iteration(
                    IterationDraft::new("Sprint")
                        .with_stage("Design")
                        .with_stage("Build"),
                ),
            )
            .expect("create");

        for (index, secs) in [(0, 2), (1, 3)] {
            registry.start_timer(id, index).expect("start");
            clock.advance(TimeDelta::seconds(secs));
            registry.stop_timer(id, index).expect("stop");
        }

        assert_eq!(
            registry.get(id).expect("get").total_duration(),
            Duration::from_secs(5)
        );
    }
}

// =============================================================================
// S3: SERIALIZED CONTENTION
// =============================================================================

mod s3_contention {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    fn shared_registry() -> Arc<Mutex<Registry>> {
        let mut registry = Registry::new();
        let id = registry.create(ProcessDraft::new("Build")).expect("create");
        registry
            .add_stage(id, StageDraft::new("Compile"), None)
            .expect("add");
        Arc::new(Mutex::new(registry))
    }

    /// S3.1: Of many concurrent starts exactly one wins.
    #[test]
    fn concurrent_starts_have_one_winner() {
        let shared = shared_registry();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let mut registry = shared.lock().expect("lock");
                    registry.start_timer(ProcessId(1), 0)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("join"))
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().filter(|r| r.is_err()).all(|r| matches!(
            r,
            Err(TempoError::InvalidTransition(TimerFault::AlreadyRunning))
        )));
    }

    /// S3.2: Of many concurrent stops exactly one closes the interval.
    #[test]
    fn concurrent_stops_have_one_winner() {
        let shared = shared_registry();
        shared
            .lock()
            .expect("lock")
            .start_timer(ProcessId(1), 0)
            .expect("start");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&shared);
                thread::spawn(move || {
                    let mut registry = shared.lock().expect("lock");
                    registry.stop_timer(ProcessId(1), 0)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("join"))
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let registry = shared.lock().expect("lock");
        assert_eq!(
            registry.stage(ProcessId(1), 0).expect("stage").completed_runs(),
            1
        );
    }
}
