//! Coalescing timer for bursts of viewer events.
//!
//! Every event re-arms a single pending deadline. The owner polls the
//! debouncer from its tick; the deadline fires once when no new event has
//! arrived for the whole quiescence window.

use std::time::Duration;
use web_time::Instant;

#[derive(Debug, Clone)]
pub struct Debouncer {
    /// Quiescence window after the last event.
    delay: Duration,

    /// Time of the last event in the current burst.
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending_since: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an event now.
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    /// Record an event at `now`, restarting the window.
    pub fn trigger_at(&mut self, now: Instant) {
        self.pending_since = Some(now);
    }

    /// Whether an event is waiting for its window to elapse.
    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Check the window against the current time.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    /// Returns true exactly once per burst, when `now` is at least `delay`
    /// past the last event.
    pub fn poll_at(&mut self, now: Instant) -> bool {
        let Some(since) = self.pending_since else {
            return false;
        };

        if now.saturating_duration_since(since) < self.delay {
            return false;
        }

        self.pending_since = None;
        true
    }

    /// Drop a pending burst without firing.
    pub fn cancel(&mut self) {
        self.pending_since = None;
    }
}
