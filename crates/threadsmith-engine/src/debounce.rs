//! Deadline-based debouncing.
//!
//! A burst of triggering events should produce one downstream action,
//! carrying only the final intent. [`Debouncer`] is an explicit object —
//! scheduled, polled, cancellable — rather than a timer captured in a
//! closure, so teardown is deterministic and tests drive it with a fake
//! clock instead of sleeping.
//!
//! The orchestrator owns one debouncer per segment for checks and a single
//! debouncer for saves; the two windows are tuned independently.

use web_time::{Duration, Instant};

/// Coalesces scheduled values, firing the latest one after a quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            pending: None,
        }
    }

    /// Schedule `value`, replacing any pending value and resetting the
    /// timer. Latest wins; earlier schedules are canceled, not merged.
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some(value);
        self.deadline = Some(now + self.delay);
    }

    /// Take the pending value if its quiet period has elapsed.
    #[must_use]
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drop the pending value and disarm the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    /// Whether a value is waiting for its deadline.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}
