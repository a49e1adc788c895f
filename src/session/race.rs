use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::session::clock::Ticker;
use crate::session::{SessionEvent, SessionStatus};

pub const RACE_SECS: u32 = 30;
pub const POINTS_PER_CHAR: u32 = 10;
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Thirty-second race: type the shown word and press Enter, as many times
/// as possible before the countdown runs out.
pub struct WordRace {
    words: Vec<String>,
    current: Option<String>,
    score: u32,
    words_completed: u32,
    time_left: u32,
    status: SessionStatus,
    clock: Ticker,
}

impl WordRace {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            current: None,
            score: 0,
            words_completed: 0,
            time_left: RACE_SECS,
            status: SessionStatus::Idle,
            clock: Ticker::new(COUNTDOWN_TICK),
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn words_completed(&self) -> u32 {
        self.words_completed
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_ticking(&self) -> bool {
        self.clock.is_active()
    }

    pub fn start<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Option<SessionEvent> {
        if self.status.is_running() || self.words.is_empty() {
            return None;
        }
        self.score = 0;
        self.words_completed = 0;
        self.time_left = RACE_SECS;
        self.status = SessionStatus::Running;
        self.next_word(rng);
        self.clock.start(now);
        info!(words = self.words.len(), "word race started");
        Some(SessionEvent::Started)
    }

    /// Check a committed entry against the current word. Surrounding
    /// whitespace is ignored; anything else that doesn't match is dropped.
    pub fn submit<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> Option<SessionEvent> {
        if !self.status.is_running() {
            return None;
        }
        let entry = text.trim();
        if self.current.as_deref() != Some(entry) {
            return None;
        }
        let points = entry.chars().count() as u32 * POINTS_PER_CHAR;
        self.words_completed += 1;
        self.score += points;
        let word = entry.to_string();
        self.next_word(rng);
        debug!(%word, points, score = self.score, "race word completed");
        Some(SessionEvent::WordCompleted { word, points })
    }

    pub fn tick(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for _ in self.clock.poll(now) {
            self.time_left = self.time_left.saturating_sub(1);
            if self.time_left == 0 {
                events.push(self.finish());
                break;
            }
            events.push(SessionEvent::Countdown {
                secs_left: self.time_left,
            });
        }
        events
    }

    pub fn reset(&mut self) {
        self.clock.cancel();
        self.status = SessionStatus::Idle;
        self.current = None;
        self.score = 0;
        self.words_completed = 0;
        self.time_left = RACE_SECS;
    }

    fn next_word<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current = self.words.choose(rng).cloned();
    }

    fn finish(&mut self) -> SessionEvent {
        self.clock.cancel();
        self.status = SessionStatus::Completed;
        info!(
            words_completed = self.words_completed,
            score = self.score,
            "word race finished"
        );
        SessionEvent::RaceFinished {
            words_completed: self.words_completed,
            score: self.score,
        }
    }
}
