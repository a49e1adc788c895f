use std::time::{Duration, Instant};

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::session::clock::Ticker;
use crate::session::{SessionEvent, SessionStatus};

pub const STARTING_LIVES: u32 = 3;
pub const POINTS_PER_CHAR: u32 = 20;
/// Units per second every falling word travels.
pub const FALL_SPEED: f64 = 60.0;
/// Depth past which a word counts as missed.
pub const FLOOR: f64 = 350.0;
/// Horizontal spawn offsets are drawn from `0..MAX_OFFSET` percent.
pub const MAX_OFFSET: f64 = 80.0;
const SPAWN_TICK: Duration = Duration::from_millis(1500);

#[derive(Clone, Debug, PartialEq)]
pub struct FallingWord {
    pub word: String,
    pub spawned_at: Instant,
    pub offset: f64,
    pub depth: f64,
}

impl FallingWord {
    pub fn depth_at(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.spawned_at).as_secs_f64() * FALL_SPEED
    }
}

/// Falling-word shooter. Every spawn tick adds a word and moves all live
/// words down; a word reaching the floor costs a life.
pub struct Arena {
    words: Vec<String>,
    entities: Vec<FallingWord>,
    lives: u32,
    score: u32,
    hits: u32,
    status: SessionStatus,
    clock: Ticker,
}

impl Arena {
    pub fn new(words: Vec<String>) -> Self {
        Self {
            words,
            entities: Vec::new(),
            lives: STARTING_LIVES,
            score: 0,
            hits: 0,
            status: SessionStatus::Idle,
            clock: Ticker::new(SPAWN_TICK),
        }
    }

    pub fn entities(&self) -> &[FallingWord] {
        &self.entities
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_ticking(&self) -> bool {
        self.clock.is_active()
    }

    pub fn start(&mut self, now: Instant) -> Option<SessionEvent> {
        if self.status.is_running() || self.words.is_empty() {
            return None;
        }
        self.entities.clear();
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.hits = 0;
        self.status = SessionStatus::Running;
        self.clock.start(now);
        info!(words = self.words.len(), "shooter started");
        Some(SessionEvent::Started)
    }

    /// Run every spawn tick due by `now`: spawn one word, then advance all
    /// words to that tick's time and drop the ones past the floor.
    pub fn tick<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for at in self.clock.poll(now) {
            if let Some(event) = self.spawn(at, rng) {
                events.push(event);
            }
            self.advance(at, &mut events);
            if !self.status.is_running() {
                break;
            }
        }
        events
    }

    /// Shoot the first live word equal to the trimmed entry.
    pub fn submit(&mut self, text: &str) -> Option<SessionEvent> {
        if !self.status.is_running() {
            return None;
        }
        let entry = text.trim();
        let idx = self.entities.iter().position(|e| e.word == entry)?;
        let hit = self.entities.remove(idx);
        let points = hit.word.chars().count() as u32 * POINTS_PER_CHAR;
        self.hits += 1;
        self.score += points;
        debug!(word = %hit.word, points, score = self.score, "target hit");
        Some(SessionEvent::TargetHit {
            word: hit.word,
            points,
        })
    }

    pub fn reset(&mut self) {
        self.clock.cancel();
        self.entities.clear();
        self.status = SessionStatus::Idle;
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.hits = 0;
    }

    fn spawn<R: Rng + ?Sized>(&mut self, at: Instant, rng: &mut R) -> Option<SessionEvent> {
        let word = self.words.choose(rng)?.clone();
        let offset = rng.gen_range(0.0..MAX_OFFSET);
        debug!(%word, offset, "spawned falling word");
        self.entities.push(FallingWord {
            word: word.clone(),
            spawned_at: at,
            offset,
            depth: 0.0,
        });
        Some(SessionEvent::Spawned { word })
    }

    fn advance(&mut self, at: Instant, events: &mut Vec<SessionEvent>) {
        let mut missed = 0u32;
        self.entities.retain_mut(|e| {
            e.depth = e.depth_at(at);
            if e.depth > FLOOR {
                missed += 1;
                false
            } else {
                true
            }
        });

        for _ in 0..missed {
            self.lives = self.lives.saturating_sub(1);
            events.push(SessionEvent::LifeLost { lives: self.lives });
            if self.lives == 0 {
                events.push(self.finish());
                return;
            }
        }
    }

    fn finish(&mut self) -> SessionEvent {
        self.clock.cancel();
        self.entities.clear();
        self.status = SessionStatus::Failed;
        info!(hits = self.hits, score = self.score, "shooter game over");
        SessionEvent::GameOver {
            hits: self.hits,
            score: self.score,
        }
    }
}
