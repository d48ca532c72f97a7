//! Deferred actions - "dispatch this later" on the UI thread
//!
//! The store has no timers. Anything that should happen after a delay is
//! queued here and handed back to the event loop once it is due, which then
//! dispatches it like any other action.

use std::time::{Duration, Instant};

pub struct Deferred<A> {
    pending: Vec<(Instant, A)>,
}

impl<A> Default for Deferred<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A> Deferred<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `action` to become due after `delay`
    pub fn schedule(&mut self, delay: Duration, action: A) {
        self.schedule_at(Instant::now() + delay, action);
    }

    pub fn schedule_at(&mut self, due: Instant, action: A) {
        self.pending.push((due, action));
    }

    /// Remove and return every action due at `now`, earliest first
    ///
    /// Actions due at the same instant keep their scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<A> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(at, _)| *at <= now);
        self.pending = pending;

        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, action)| action).collect()
    }

    /// When the next queued action becomes due
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.iter().map(|(at, _)| *at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
