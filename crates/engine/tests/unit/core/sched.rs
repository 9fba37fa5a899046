//! # Scheduler Tests
//!
//! Single-continuation bookkeeping: scheduling replaces, cancelling
//! removes, and a continuation is consumed exactly once.

use std::time::{Duration, Instant};

use bfvm_core::config::ExecConfig;
use bfvm_core::core::sched::Scheduler;

fn scheduler(yield_delay_ms: u64) -> Scheduler {
    Scheduler::new(&ExecConfig {
        throttle: 100,
        yield_delay_ms,
    })
}

#[test]
fn test_starts_idle() {
    let sched = scheduler(5);
    assert!(sched.is_idle());
    assert_eq!(sched.next_wake(), None);
}

#[test]
fn test_yield_continuation_is_due_after_delay() {
    let mut sched = scheduler(5);
    let now = Instant::now();
    sched.schedule_yield(now);
    assert_eq!(sched.next_wake(), Some(now + Duration::from_millis(5)));

    assert!(!sched.take_due(now), "must not fire before its deadline");
    assert!(sched.take_due(now + Duration::from_millis(5)));
    assert!(sched.is_idle(), "a consumed continuation is gone");
}

#[test]
fn test_step_continuation_uses_step_delay() {
    let mut sched = scheduler(5);
    sched.set_step_delay(Duration::from_millis(250));
    let now = Instant::now();
    sched.schedule_step(now);
    assert_eq!(sched.next_wake(), Some(now + Duration::from_millis(250)));
}

#[test]
fn test_scheduling_replaces_pending_continuation() {
    let mut sched = scheduler(5);
    let now = Instant::now();
    sched.schedule_yield(now);
    sched.set_step_delay(Duration::from_secs(1));
    sched.schedule_step(now);

    // Only the later deadline remains; the earlier one must not fire.
    assert!(!sched.take_due(now + Duration::from_millis(5)));
    assert!(sched.take_due(now + Duration::from_secs(1)));
    assert!(!sched.take_due(now + Duration::from_secs(2)));
}

#[test]
fn test_cancel_removes_pending_continuation() {
    let mut sched = scheduler(5);
    let now = Instant::now();
    sched.schedule_yield(now);
    sched.cancel();
    assert!(sched.is_idle());
    assert!(!sched.take_due(now + Duration::from_secs(60)));
}

#[test]
fn test_zero_delays_are_due_immediately() {
    let mut sched = scheduler(0);
    let now = Instant::now();
    sched.schedule_yield(now);
    assert!(sched.take_due(now));

    sched.set_step_delay(Duration::ZERO);
    sched.schedule_step(now);
    assert!(sched.take_due(now));
}

#[test]
fn test_throttle_is_at_least_one() {
    let sched = Scheduler::new(&ExecConfig {
        throttle: 0,
        yield_delay_ms: 5,
    });
    assert_eq!(sched.throttle(), 1);
}
