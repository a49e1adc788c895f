use std::time::{Duration, Instant};

/// A repeating schedule driven by the caller's notion of "now".
///
/// Nothing here reads the wall clock: the event loop passes `Instant::now()`
/// and tests pass synthetic instants, so ticking is fully deterministic.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Begin ticking from `now`. Any previous schedule is replaced.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Instants of every tick that fell due at or before `now`, oldest first.
    /// A zero interval never fires.
    pub fn poll(&mut self, now: Instant) -> Vec<Instant> {
        let mut due = Vec::new();
        if self.interval.is_zero() {
            return due;
        }
        while let Some(next) = self.next_due.filter(|next| *next <= now) {
            due.push(next);
            self.next_due = Some(next + self.interval);
        }
        due
    }
}
