//! Polled debouncing for slider-driven recomputation.
//!
//! Every `schedule` bumps a generation counter and pushes the deadline
//! out again. Only the value from the newest generation is ever handed
//! back by `poll`, and only after the quiet period has elapsed.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    generation: u64,
    due: Instant,
    value: T,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Queue `value`, superseding anything already pending.
    ///
    /// Returns the generation of the new request.
    pub fn schedule(&mut self, value: T, now: Instant) -> u64 {
        self.generation += 1;
        if self.pending.is_some() {
            log::debug!("Superseding pending recompute with generation {}", self.generation);
        }
        self.pending = Some(Pending {
            generation: self.generation,
            due: now + self.delay,
            value,
        });
        self.generation
    }

    /// Drop the pending request, if any.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            self.generation += 1;
        }
    }

    /// Whether `generation` is still the newest request.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending request fires, `None` when idle.
    pub fn time_remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.due.saturating_duration_since(now))
    }

    /// Take the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.due && self.is_current(p.generation) => {
                self.pending.take().map(|p| p.value)
            }
            _ => None,
        }
    }

    /// Take the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}
