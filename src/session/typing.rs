use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::engine::diff;
use crate::engine::highlight::{self, HighlightedChar};
use crate::engine::metrics::{self, Metrics};
use crate::session::clock::Ticker;
use crate::session::{SessionEvent, SessionStatus};

const DISPLAY_TICK: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PracticeKind {
    PlainText,
    HtmlSnippet,
}

impl PracticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeKind::PlainText => "typing-test",
            PracticeKind::HtmlSnippet => "html-practice",
        }
    }
}

/// Timed typing session over a single practice target: the plain-text
/// typing test and the HTML snippet practice share this state machine.
pub struct TypingSession {
    pub kind: PracticeKind,
    target: String,
    input: String,
    status: SessionStatus,
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    total_chars: usize,
    correct_chars: usize,
    elapsed_secs: u64,
    metrics: Metrics,
    disable_backspace: bool,
    clock: Ticker,
}

impl TypingSession {
    pub fn new(kind: PracticeKind) -> Self {
        Self {
            kind,
            target: String::new(),
            input: String::new(),
            status: SessionStatus::Idle,
            started_at: None,
            finished_at: None,
            total_chars: 0,
            correct_chars: 0,
            elapsed_secs: 0,
            metrics: Metrics::idle(),
            disable_backspace: false,
            clock: Ticker::new(DISPLAY_TICK),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn correct_chars(&self) -> usize {
        self.correct_chars
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn disable_backspace(&self) -> bool {
        self.disable_backspace
    }

    pub fn set_disable_backspace(&mut self, disabled: bool) {
        self.disable_backspace = disabled;
    }

    pub fn is_ticking(&self) -> bool {
        self.clock.is_active()
    }

    pub fn can_start(&self) -> bool {
        !self.status.is_running() && !self.target.is_empty()
    }

    pub fn start(&mut self, now: Instant) -> Option<SessionEvent> {
        if !self.can_start() {
            return None;
        }
        self.input.clear();
        self.total_chars = 0;
        self.correct_chars = 0;
        self.elapsed_secs = 0;
        self.metrics = Metrics::idle();
        self.started_at = Some(now);
        self.finished_at = None;
        self.status = SessionStatus::Running;
        self.clock.start(now);
        info!(mode = self.kind.as_str(), target_len = self.target.chars().count(), "session started");
        Some(SessionEvent::Started)
    }

    /// Replace the whole input with `text`, as a text box reports it.
    pub fn on_input(&mut self, text: &str, now: Instant) -> Option<SessionEvent> {
        if !self.status.is_running() {
            return None;
        }

        let target_len = self.target.chars().count();
        let locked = self.disable_backspace && text.chars().count() >= target_len;
        self.input = if locked {
            text.chars().take(target_len).collect()
        } else {
            text.to_string()
        };

        self.total_chars = self.input.chars().count();
        self.correct_chars = diff::count_correct(&self.target, &self.input);
        self.metrics =
            metrics::compute_metrics(self.correct_chars, self.total_chars, self.elapsed_at(now));

        if self.input == self.target {
            Some(self.finish(SessionStatus::Completed, now))
        } else if locked {
            Some(self.finish(SessionStatus::Failed, now))
        } else {
            None
        }
    }

    pub fn push_char(&mut self, ch: char, now: Instant) -> Option<SessionEvent> {
        let mut text = self.input.clone();
        text.push(ch);
        self.on_input(&text, now)
    }

    /// Delete the last typed character. Refused while backspace is disabled.
    pub fn backspace(&mut self, now: Instant) -> Option<SessionEvent> {
        if self.disable_backspace || self.input.is_empty() {
            return None;
        }
        let mut text = self.input.clone();
        text.pop();
        self.on_input(&text, now)
    }

    pub fn tick(&mut self, now: Instant) -> Option<SessionEvent> {
        let start = self.started_at?;
        let last = self.clock.poll(now).pop()?;
        self.elapsed_secs = last.saturating_duration_since(start).as_secs();
        debug!(mode = self.kind.as_str(), elapsed = self.elapsed_secs, "tick");
        Some(SessionEvent::Elapsed {
            secs: self.elapsed_secs,
        })
    }

    /// Stop the clock, clear counters and displays, and optionally swap in a
    /// new target. `None` keeps the current target.
    pub fn reset(&mut self, next_target: Option<String>) {
        self.clock.cancel();
        self.status = SessionStatus::Idle;
        self.input.clear();
        self.total_chars = 0;
        self.correct_chars = 0;
        self.elapsed_secs = 0;
        self.metrics = Metrics::idle();
        self.started_at = None;
        self.finished_at = None;
        if let Some(target) = next_target {
            self.target = target;
        }
    }

    /// Swap the practice target without starting. Ignored while running.
    /// A finished session goes back to idle so its results don't linger
    /// beside the new target.
    pub fn replace_target(&mut self, next_target: Option<String>) -> bool {
        match next_target {
            Some(target) if !self.status.is_running() => {
                self.reset(Some(target));
                true
            }
            _ => false,
        }
    }

    pub fn highlighted(&self) -> Vec<HighlightedChar> {
        match self.kind {
            PracticeKind::PlainText => highlight::highlight_plain(&self.target, &self.input),
            PracticeKind::HtmlSnippet => highlight::highlight_snippet(&self.target, &self.input),
        }
    }

    fn elapsed_at(&self, now: Instant) -> f64 {
        let end = self.finished_at.unwrap_or(now);
        self.started_at
            .map(|start| end.saturating_duration_since(start).as_secs_f64())
            .unwrap_or(0.0)
    }

    fn finish(&mut self, status: SessionStatus, now: Instant) -> SessionEvent {
        self.clock.cancel();
        self.status = status;
        self.finished_at = Some(now);
        self.elapsed_secs = self.elapsed_at(now) as u64;
        let metrics = self.metrics;
        info!(
            mode = self.kind.as_str(),
            ?status,
            wpm = metrics.wpm,
            accuracy = metrics.accuracy,
            "session finished"
        );
        match status {
            SessionStatus::Completed => SessionEvent::Completed {
                metrics,
                clean: self.correct_chars == self.target.chars().count(),
            },
            _ => SessionEvent::Failed { metrics },
        }
    }
}
