//! Deferred-continuation scheduling.
//!
//! This module implements the cooperative half of the execution model. It
//! tracks:
//! 1. **Throttle:** How many instructions a continuous run may execute before
//!    yielding control back to the host.
//! 2. **Continuation:** At most one pending resume deadline. Scheduling a new
//!    continuation replaces the old one; cancellation removes it so no stale
//!    resumption can fire after a state change.
//!
//! The scheduler never sleeps or spawns anything. The host pumps the machine
//! with [`Machine::poll`](crate::Machine::poll) and may sleep until
//! [`next_wake`](Scheduler::next_wake); tests drive it with fabricated
//! instants.

use std::time::{Duration, Instant};

use crate::config::ExecConfig;

/// Cooperative continuation bookkeeping for a machine.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Instructions per batch during continuous runs.
    throttle: u32,
    /// Delay before a yielded continuous run resumes.
    yield_delay: Duration,
    /// Delay between instructions in slow-step mode.
    step_delay: Duration,
    /// The single pending continuation, as a resume deadline.
    pending: Option<Instant>,
}

impl Scheduler {
    /// Creates a scheduler from the execution configuration.
    pub fn new(config: &ExecConfig) -> Self {
        Self {
            throttle: config.throttle.max(1),
            yield_delay: config.yield_delay(),
            step_delay: Duration::ZERO,
            pending: None,
        }
    }

    /// Returns the batch size for continuous runs.
    pub const fn throttle(&self) -> u32 {
        self.throttle
    }

    /// Sets the inter-instruction delay used by slow-step mode.
    pub fn set_step_delay(&mut self, delay: Duration) {
        self.step_delay = delay;
    }

    /// Schedules the post-yield continuation of a continuous run.
    ///
    /// Replaces any pending continuation.
    pub fn schedule_yield(&mut self, now: Instant) {
        self.pending = Some(now + self.yield_delay);
    }

    /// Schedules the next instruction of a slow-step run.
    ///
    /// Replaces any pending continuation.
    pub fn schedule_step(&mut self, now: Instant) {
        self.pending = Some(now + self.step_delay);
    }

    /// Cancels the pending continuation, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consumes the pending continuation if its deadline has passed.
    ///
    /// Returns `true` exactly when the machine should resume now.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(at) if at <= now => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Returns the pending resume deadline, if any.
    pub const fn next_wake(&self) -> Option<Instant> {
        self.pending
    }

    /// Returns `true` when no continuation is pending.
    pub const fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}
