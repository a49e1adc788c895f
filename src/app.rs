use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::config::Config;
use crate::content::repository::split_editor_text;
use crate::content::{ContentKind, ContentLists, ContentRequest, ContentResponse};
use crate::error::ContentError;
use crate::session::race::WordRace;
use crate::session::shooter::Arena;
use crate::session::typing::{PracticeKind, TypingSession};
use crate::session::{SessionEvent, SessionStatus};
use crate::store::json_store::JsonStore;
use crate::store::schema::Preferences;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::text_area::TextArea;
use crate::ui::theme::Theme;

/// How long an inline save status stays on screen.
pub const STATUS_TTL: Duration = Duration::from_secs(5);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    TypingTest,
    HtmlPractice,
    WordRace,
    Shooter,
    Content,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::TypingTest,
        Tab::HtmlPractice,
        Tab::WordRace,
        Tab::Shooter,
        Tab::Content,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::TypingTest => "Typing Test",
            Tab::HtmlPractice => "HTML Practice",
            Tab::WordRace => "Word Race",
            Tab::Shooter => "Shooter",
            Tab::Content => "Content",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Tab::TypingTest => "F1",
            Tab::HtmlPractice => "F2",
            Tab::WordRace => "F3",
            Tab::Shooter => "F4",
            Tab::Content => "F5",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    pub expires_at: Instant,
}

/// End-of-session popup. The first line is the headline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub lines: Vec<String>,
    pub celebratory: bool,
}

pub struct App {
    pub tab: Tab,
    pub typing: TypingSession,
    pub html: TypingSession,
    pub race: WordRace,
    pub shooter: Arena,
    pub race_input: LineInput,
    pub shooter_input: LineInput,
    pub content: ContentLists,
    pub texts_editor: TextArea,
    pub snippets_editor: TextArea,
    pub editor_focus: ContentKind,
    pub preferences: Preferences,
    pub theme: &'static Theme,
    pub notification: Option<Notification>,
    pub status: Option<StatusMessage>,
    pub store: Option<JsonStore>,
    pub should_quit: bool,
    editor_generation: u64,
    save_seq: u64,
    /// Newest save applied per list, indexed by `save_slot`.
    applied_saves: [u64; 2],
    requests: Vec<ContentRequest>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: &Config, store: Option<JsonStore>) -> Self {
        Self::with_rng(config, store, SmallRng::from_entropy())
    }

    pub fn with_rng(config: &Config, store: Option<JsonStore>, rng: SmallRng) -> Self {
        let preferences = store
            .as_ref()
            .map(JsonStore::load_preferences)
            .unwrap_or_default();
        let loaded_theme = Theme::load(&preferences.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));

        let mut typing = TypingSession::new(PracticeKind::PlainText);
        typing.set_disable_backspace(preferences.disable_backspace_typing);
        let mut html = TypingSession::new(PracticeKind::HtmlSnippet);
        html.set_disable_backspace(preferences.disable_backspace_html);

        Self {
            tab: Tab::TypingTest,
            typing,
            html,
            race: WordRace::new(config.race_words.clone()),
            shooter: Arena::new(config.shooter_words.clone()),
            race_input: LineInput::default(),
            shooter_input: LineInput::default(),
            content: ContentLists::default(),
            texts_editor: TextArea::default(),
            snippets_editor: TextArea::default(),
            editor_focus: ContentKind::TypingTexts,
            preferences,
            theme,
            notification: None,
            status: None,
            store,
            should_quit: false,
            editor_generation: 0,
            save_seq: 0,
            applied_saves: [0; 2],
            requests: vec![ContentRequest::Load],
            rng,
        }
    }

    /// Work queued for the background workers since the last call.
    pub fn take_requests(&mut self) -> Vec<ContentRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn editor_generation(&self) -> u64 {
        self.editor_generation
    }

    pub fn typing_session(&self, kind: PracticeKind) -> &TypingSession {
        match kind {
            PracticeKind::PlainText => &self.typing,
            PracticeKind::HtmlSnippet => &self.html,
        }
    }

    fn typing_session_mut(&mut self, kind: PracticeKind) -> &mut TypingSession {
        match kind {
            PracticeKind::PlainText => &mut self.typing,
            PracticeKind::HtmlSnippet => &mut self.html,
        }
    }

    fn practice_kind(&self) -> Option<PracticeKind> {
        match self.tab {
            Tab::TypingTest => Some(PracticeKind::PlainText),
            Tab::HtmlPractice => Some(PracticeKind::HtmlSnippet),
            _ => None,
        }
    }

    fn pick(&mut self, kind: PracticeKind) -> Option<String> {
        self.content.get(content_kind(kind)).choose(&mut self.rng).cloned()
    }

    // --- navigation ---

    /// Switch tabs. A running session on the tab being left is stopped so
    /// its clock can't keep firing in the background.
    pub fn select_tab(&mut self, tab: Tab) {
        if tab == self.tab {
            return;
        }
        self.suspend(self.tab);
        self.tab = tab;
        if tab == Tab::Content {
            self.load_editors();
        }
    }

    fn suspend(&mut self, tab: Tab) {
        match tab {
            Tab::TypingTest if self.typing.status().is_running() => self.typing.reset(None),
            Tab::HtmlPractice if self.html.status().is_running() => self.html.reset(None),
            Tab::WordRace if self.race.status().is_running() => {
                self.race.reset();
                self.race_input.clear();
            }
            Tab::Shooter if self.shooter.status().is_running() => {
                self.shooter.reset();
                self.shooter_input.clear();
            }
            _ => {}
        }
    }

    // --- session controls ---

    pub fn start_current(&mut self, now: Instant) {
        match self.tab {
            Tab::TypingTest => {
                self.typing.start(now);
            }
            Tab::HtmlPractice => {
                self.html.start(now);
            }
            Tab::WordRace => {
                self.race_input.clear();
                self.race.start(now, &mut self.rng);
            }
            Tab::Shooter => {
                self.shooter_input.clear();
                self.shooter.start(now);
            }
            Tab::Content => {}
        }
    }

    /// Stop the current tab's session and return it to idle. Text modes
    /// draw a fresh target, keeping the old one if the list is empty.
    pub fn reset_current(&mut self) {
        match self.tab {
            Tab::TypingTest | Tab::HtmlPractice => {
                if let Some(kind) = self.practice_kind() {
                    let next = self.pick(kind);
                    self.typing_session_mut(kind).reset(next);
                }
            }
            Tab::WordRace => {
                self.race.reset();
                self.race_input.clear();
            }
            Tab::Shooter => {
                self.shooter.reset();
                self.shooter_input.clear();
            }
            Tab::Content => {}
        }
    }

    /// Draw another target without starting. Ignored while running.
    pub fn new_target(&mut self) {
        if let Some(kind) = self.practice_kind() {
            if self.typing_session(kind).status().is_running() {
                return;
            }
            let next = self.pick(kind);
            self.typing_session_mut(kind).replace_target(next);
        }
    }

    pub fn type_char(&mut self, ch: char, now: Instant) {
        if let Some(kind) = self.practice_kind()
            && let Some(event) = self.typing_session_mut(kind).push_char(ch, now)
        {
            self.on_typing_event(kind, event);
        }
    }

    pub fn backspace(&mut self, now: Instant) {
        if let Some(kind) = self.practice_kind()
            && let Some(event) = self.typing_session_mut(kind).backspace(now)
        {
            self.on_typing_event(kind, event);
        }
    }

    /// Feed a key to the race or shooter entry box. Enter commits the
    /// entry and always clears it, matched or not.
    pub fn entry_key(&mut self, key: KeyEvent) {
        let input = match self.tab {
            Tab::WordRace if self.race.status().is_running() => &mut self.race_input,
            Tab::Shooter if self.shooter.status().is_running() => &mut self.shooter_input,
            _ => return,
        };
        match input.handle(key) {
            InputResult::Submit => {
                let entry = input.take();
                self.submit_entry(&entry);
            }
            InputResult::Cancel => input.clear(),
            InputResult::Continue => {}
        }
    }

    pub fn submit_entry(&mut self, entry: &str) {
        match self.tab {
            Tab::WordRace => {
                self.race.submit(entry, &mut self.rng);
            }
            Tab::Shooter => {
                self.shooter.submit(entry);
            }
            _ => {}
        }
    }

    /// Flip the backspace lock for the current text mode and persist it.
    pub fn toggle_backspace(&mut self) {
        let Some(kind) = self.practice_kind() else {
            return;
        };
        let disabled = !self.typing_session(kind).disable_backspace();
        self.typing_session_mut(kind).set_disable_backspace(disabled);
        match kind {
            PracticeKind::PlainText => self.preferences.disable_backspace_typing = disabled,
            PracticeKind::HtmlSnippet => self.preferences.disable_backspace_html = disabled,
        }
        info!(mode = kind.as_str(), disabled, "backspace lock toggled");
        self.save_preferences();
    }

    // --- theme ---

    /// Switch to a theme by name for this run only. Returns false if the
    /// theme can't be loaded.
    pub fn apply_theme(&mut self, name: &str) -> bool {
        match Theme::load(name) {
            Some(theme) => {
                self.theme = Box::leak(Box::new(theme));
                true
            }
            None => {
                warn!(theme = name, "theme not found");
                false
            }
        }
    }

    pub fn cycle_theme(&mut self) {
        let Some(next) = Theme::next_name(&self.theme.name) else {
            return;
        };
        if self.apply_theme(&next) {
            self.preferences.theme = next;
            self.save_preferences();
        }
    }

    // --- clock ---

    /// Drive every session's clock up to `now` and expire the status line.
    pub fn tick(&mut self, now: Instant) {
        self.typing.tick(now);
        self.html.tick(now);

        for event in self.race.tick(now) {
            self.on_game_event(event);
        }
        for event in self.shooter.tick(now, &mut self.rng) {
            self.on_game_event(event);
        }

        if self.status.as_ref().is_some_and(|s| now >= s.expires_at) {
            self.status = None;
        }
    }

    fn on_typing_event(&mut self, kind: PracticeKind, event: SessionEvent) {
        let title = match kind {
            PracticeKind::PlainText => Tab::TypingTest.label(),
            PracticeKind::HtmlSnippet => Tab::HtmlPractice.label(),
        };
        match event {
            SessionEvent::Completed { metrics, clean } => {
                let headline = match kind {
                    PracticeKind::PlainText => "Congratulations! You completed the typing test!",
                    PracticeKind::HtmlSnippet => "Great job! HTML snippet completed!",
                };
                let mut lines = vec![
                    headline.to_string(),
                    format!("{} WPM, {}% accuracy", metrics.wpm, metrics.accuracy),
                ];
                let mut celebratory = false;
                if kind == PracticeKind::PlainText
                    && clean
                    && self.preferences.best_wpm.record(metrics.wpm)
                {
                    info!(wpm = metrics.wpm, "new best wpm");
                    lines.push(format!("New best: {} WPM!", metrics.wpm));
                    celebratory = true;
                    self.save_preferences();
                }
                self.notify(title, lines, celebratory);
            }
            SessionEvent::Failed { metrics } => {
                let session = self.typing_session(kind);
                let mistakes = session.total_chars() - session.correct_chars();
                let plural = if mistakes == 1 { "" } else { "s" };
                self.notify(
                    title,
                    vec![
                        format!("Session failed with {mistakes} uncorrected mistake{plural}."),
                        format!("{} WPM, {}% accuracy", metrics.wpm, metrics.accuracy),
                    ],
                    false,
                );
            }
            _ => {}
        }
    }

    fn on_game_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::RaceFinished {
                words_completed,
                score,
            } => self.notify(
                Tab::WordRace.label(),
                vec![format!(
                    "Race finished! You typed {words_completed} words and scored {score} points!"
                )],
                false,
            ),
            SessionEvent::GameOver { hits, score } => self.notify(
                Tab::Shooter.label(),
                vec![format!(
                    "Game Over! You hit {hits} targets and scored {score} points!"
                )],
                false,
            ),
            _ => {}
        }
    }

    fn notify(&mut self, title: &str, lines: Vec<String>, celebratory: bool) {
        self.notification = Some(Notification {
            title: title.to_string(),
            lines,
            celebratory,
        });
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    // --- content ---

    /// Apply a finished background request.
    pub fn apply_content(&mut self, response: ContentResponse, now: Instant) {
        match response {
            ContentResponse::Loaded(lists) => {
                self.content = lists;
                self.reselect_target(PracticeKind::PlainText);
                self.reselect_target(PracticeKind::HtmlSnippet);
                if self.tab == Tab::Content {
                    self.load_editors();
                }
            }
            ContentResponse::Saved {
                kind,
                generation,
                seq,
                result,
            } => {
                let slot = save_slot(kind);
                // A newer save of this list has already landed.
                let superseded = seq <= self.applied_saves[slot];
                let current = generation == self.editor_generation;
                match result {
                    Ok(_) if superseded => {
                        info!(kind = kind.endpoint(), seq, "superseded save response");
                    }
                    Ok(lines) => {
                        self.applied_saves[slot] = seq;
                        if current {
                            let editor = self.editor_mut(kind);
                            if split_editor_text(&editor.text()) == lines {
                                editor.mark_clean();
                            }
                            self.set_status(saved_message(kind), StatusKind::Success, now);
                        }
                        // The remote copy has changed either way.
                        self.content.set(kind, lines);
                        self.reselect_target(practice_kind(kind));
                    }
                    Err(e) => {
                        if current && !superseded {
                            self.set_status(save_error_message(kind, &e), StatusKind::Error, now);
                        }
                    }
                }
                if !current {
                    info!(kind = kind.endpoint(), generation, "stale save response");
                }
            }
        }
    }

    /// Swap in a fresh target unless a session is in progress.
    fn reselect_target(&mut self, kind: PracticeKind) {
        if self.typing_session(kind).status().is_running() {
            return;
        }
        let next = self.pick(kind);
        self.typing_session_mut(kind).replace_target(next);
    }

    /// Refill both editors from the in-memory lists.
    pub fn load_editors(&mut self) {
        self.texts_editor.set_lines(&self.content.texts);
        self.snippets_editor.set_lines(&self.content.snippets);
        self.editor_generation += 1;
    }

    pub fn focused_editor_mut(&mut self) -> &mut TextArea {
        self.editor_mut(self.editor_focus)
    }

    fn editor_mut(&mut self, kind: ContentKind) -> &mut TextArea {
        match kind {
            ContentKind::TypingTexts => &mut self.texts_editor,
            ContentKind::HtmlSnippets => &mut self.snippets_editor,
        }
    }

    pub fn toggle_editor_focus(&mut self) {
        self.editor_focus = match self.editor_focus {
            ContentKind::TypingTexts => ContentKind::HtmlSnippets,
            ContentKind::HtmlSnippets => ContentKind::TypingTexts,
        };
    }

    /// Queue a full replacement of the focused list with the editor text.
    pub fn save_editor(&mut self) {
        let kind = self.editor_focus;
        let text = match kind {
            ContentKind::TypingTexts => self.texts_editor.text(),
            ContentKind::HtmlSnippets => self.snippets_editor.text(),
        };
        self.save_seq += 1;
        self.requests.push(ContentRequest::Save {
            kind,
            lines: split_editor_text(&text),
            generation: self.editor_generation,
            seq: self.save_seq,
        });
    }

    fn set_status(&mut self, text: String, kind: StatusKind, now: Instant) {
        self.status = Some(StatusMessage {
            text,
            kind,
            expires_at: now + STATUS_TTL,
        });
    }

    fn save_preferences(&self) {
        if let Some(ref store) = self.store
            && let Err(e) = store.save_preferences(&self.preferences)
        {
            warn!(error = %e, "failed to save preferences");
        }
    }

    /// Status of the session on the visible tab; the footer picks hints from it.
    pub fn current_status(&self) -> SessionStatus {
        match self.tab {
            Tab::TypingTest => self.typing.status(),
            Tab::HtmlPractice => self.html.status(),
            Tab::WordRace => self.race.status(),
            Tab::Shooter => self.shooter.status(),
            Tab::Content => SessionStatus::Idle,
        }
    }
}

fn content_kind(kind: PracticeKind) -> ContentKind {
    match kind {
        PracticeKind::PlainText => ContentKind::TypingTexts,
        PracticeKind::HtmlSnippet => ContentKind::HtmlSnippets,
    }
}

fn practice_kind(kind: ContentKind) -> PracticeKind {
    match kind {
        ContentKind::TypingTexts => PracticeKind::PlainText,
        ContentKind::HtmlSnippets => PracticeKind::HtmlSnippet,
    }
}

fn save_slot(kind: ContentKind) -> usize {
    match kind {
        ContentKind::TypingTexts => 0,
        ContentKind::HtmlSnippets => 1,
    }
}

fn saved_message(kind: ContentKind) -> String {
    match kind {
        ContentKind::TypingTexts => "Typing texts saved successfully!".to_string(),
        ContentKind::HtmlSnippets => "HTML snippets saved successfully!".to_string(),
    }
}

fn save_error_message(kind: ContentKind, err: &ContentError) -> String {
    format!("Error saving {}: {err}", kind.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::content::repository::ContentRepository;
    use crate::content::store::MemoryContentStore;
    use crate::engine::Metrics;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App {
        App::with_rng(&Config::default(), None, SmallRng::seed_from_u64(7))
    }

    fn lists(texts: &[&str], snippets: &[&str]) -> ContentLists {
        ContentLists {
            texts: texts.iter().map(|s| s.to_string()).collect(),
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn loaded_app(now: Instant) -> App {
        let mut app = app();
        app.apply_content(
            ContentResponse::Loaded(lists(&["abcde"], &["<p>x</p>"])),
            now,
        );
        app
    }

    fn type_str(app: &mut App, s: &str, now: Instant) {
        for ch in s.chars() {
            app.type_char(ch, now);
        }
    }

    #[test]
    fn new_app_queues_initial_load() {
        let mut app = app();
        assert_eq!(app.take_requests(), vec![ContentRequest::Load]);
        assert!(app.take_requests().is_empty());
        assert_eq!(app.typing.target(), "");
    }

    #[test]
    fn loaded_content_selects_targets() {
        let app = loaded_app(Instant::now());
        assert_eq!(app.typing.target(), "abcde");
        assert_eq!(app.html.target(), "<p>x</p>");
    }

    #[test]
    fn clean_completion_records_best_wpm_once() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);

        app.start_current(t0);
        // 5 chars in 60s is 1 WPM, which beats the default of 0.
        type_str(&mut app, "abcde", t0 + Duration::from_secs(60));
        assert_eq!(app.typing.status(), SessionStatus::Completed);
        let note = app.notification.take().expect("completion popup");
        assert!(note.celebratory);
        assert_eq!(note.lines[0], "Congratulations! You completed the typing test!");
        assert_eq!(note.lines.last().map(String::as_str), Some("New best: 1 WPM!"));
        assert_eq!(app.preferences.best_wpm.value(), 1);

        // A slower run leaves the record alone and isn't celebrated.
        let t1 = t0 + Duration::from_secs(100);
        app.start_current(t1);
        type_str(&mut app, "abcde", t1 + Duration::from_secs(120));
        let note = app.notification.take().expect("completion popup");
        assert!(!note.celebratory);
        assert_eq!(app.preferences.best_wpm.value(), 1);
    }

    #[test]
    fn new_target_after_completion_clears_results() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.start_current(t0);
        type_str(&mut app, "abcde", t0 + Duration::from_secs(60));
        assert_eq!(app.typing.status(), SessionStatus::Completed);

        app.new_target();
        assert_eq!(app.typing.status(), SessionStatus::Idle);
        assert_eq!(app.typing.metrics(), Metrics::idle());
        assert_eq!(app.typing.elapsed_secs(), 0);
    }

    #[test]
    fn html_completion_never_touches_best_wpm() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.select_tab(Tab::HtmlPractice);
        app.start_current(t0);
        type_str(&mut app, "<p>x</p>", t0 + Duration::from_secs(1));
        let note = app.notification.take().expect("completion popup");
        assert_eq!(note.lines[0], "Great job! HTML snippet completed!");
        assert!(!note.celebratory);
        assert_eq!(app.preferences.best_wpm.value(), 0);
    }

    #[test]
    fn backspace_lock_failure_reports_mistakes() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.toggle_backspace();
        assert!(app.typing.disable_backspace());
        assert!(app.preferences.disable_backspace_typing);

        app.start_current(t0);
        type_str(&mut app, "abxdz", t0 + Duration::from_secs(5));
        assert_eq!(app.typing.status(), SessionStatus::Failed);
        let note = app.notification.take().expect("failure popup");
        assert_eq!(note.lines[0], "Session failed with 2 uncorrected mistakes.");
    }

    #[test]
    fn new_target_is_ignored_while_running() {
        let t0 = Instant::now();
        let mut app = app();
        app.apply_content(
            ContentResponse::Loaded(lists(&["one", "two", "three"], &[])),
            t0,
        );
        app.start_current(t0);
        let before = app.typing.target().to_string();
        for _ in 0..10 {
            app.new_target();
            assert_eq!(app.typing.target(), before);
        }
    }

    #[test]
    fn leaving_a_tab_stops_its_clock() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.start_current(t0);
        assert!(app.typing.is_ticking());
        app.select_tab(Tab::WordRace);
        assert!(!app.typing.is_ticking());
        assert_eq!(app.typing.status(), SessionStatus::Idle);
        assert_eq!(app.typing.target(), "abcde");
    }

    #[test]
    fn race_entry_scores_and_clears() {
        let t0 = Instant::now();
        let mut app = app();
        app.select_tab(Tab::WordRace);
        app.start_current(t0);
        let word = app.race.current_word().expect("word drawn").to_string();
        for ch in word.chars() {
            app.entry_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        app.entry_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.race.words_completed(), 1);
        assert_eq!(app.race.score(), word.chars().count() as u32 * 10);
        assert_eq!(app.race_input.value(), "");

        app.submit_entry("definitely-not-a-word");
        assert_eq!(app.race.words_completed(), 1);
    }

    #[test]
    fn race_end_posts_summary() {
        let t0 = Instant::now();
        let mut app = app();
        app.select_tab(Tab::WordRace);
        app.start_current(t0);
        app.tick(t0 + Duration::from_secs(30));
        assert_eq!(app.race.status(), SessionStatus::Completed);
        let note = app.notification.take().expect("race summary");
        assert_eq!(
            note.lines[0],
            "Race finished! You typed 0 words and scored 0 points!"
        );
    }

    #[test]
    fn shooter_game_over_posts_summary() {
        let t0 = Instant::now();
        let mut app = app();
        app.select_tab(Tab::Shooter);
        app.start_current(t0);
        app.tick(t0 + Duration::from_secs(60));
        assert_eq!(app.shooter.status(), SessionStatus::Failed);
        let note = app.notification.take().expect("game over popup");
        assert_eq!(
            note.lines[0],
            "Game Over! You hit 0 targets and scored 0 points!"
        );
    }

    #[test]
    fn save_success_updates_list_and_reports() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.select_tab(Tab::Content);
        app.save_editor();
        let generation = app.editor_generation();
        assert!(matches!(
            app.take_requests().last(),
            Some(ContentRequest::Save { kind: ContentKind::TypingTexts, .. })
        ));

        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::TypingTexts,
                generation,
                seq: 1,
                result: Ok(vec!["fresh".to_string()]),
            },
            t0,
        );
        assert_eq!(app.content.texts, vec!["fresh".to_string()]);
        assert_eq!(app.typing.target(), "fresh");
        let status = app.status.as_ref().expect("status line");
        assert_eq!(status.text, "Typing texts saved successfully!");
        assert_eq!(status.kind, StatusKind::Success);
    }

    #[test]
    fn stale_save_updates_list_without_status() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.select_tab(Tab::Content);
        let stale = app.editor_generation();
        app.select_tab(Tab::TypingTest);
        app.select_tab(Tab::Content);
        assert_ne!(stale, app.editor_generation());

        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::HtmlSnippets,
                generation: stale,
                seq: 1,
                result: Ok(vec!["<b>y</b>".to_string()]),
            },
            t0,
        );
        assert_eq!(app.content.snippets, vec!["<b>y</b>".to_string()]);
        assert!(app.status.is_none());
    }

    /// Run queued saves against `store` in issue order and return the
    /// responses without applying them.
    fn run_saves(app: &mut App, store: &Arc<MemoryContentStore>) -> Vec<ContentResponse> {
        let repo = ContentRepository::new(store.clone());
        app.take_requests()
            .into_iter()
            .filter(|r| matches!(r, ContentRequest::Save { .. }))
            .map(|r| r.execute(&repo))
            .collect()
    }

    #[test]
    fn out_of_order_save_responses_keep_newest_list() {
        let t0 = Instant::now();
        let store = Arc::new(MemoryContentStore::new(ContentLists::default()));
        let mut app = loaded_app(t0);
        app.select_tab(Tab::Content);
        app.texts_editor.set_lines(&["first"]);
        app.save_editor();
        app.texts_editor.set_lines(&["second"]);
        app.save_editor();

        let mut responses = run_saves(&mut app, &store);
        assert_eq!(store.snapshot().texts, vec!["second".to_string()]);

        responses.reverse();
        for response in responses {
            app.apply_content(response, t0);
        }
        assert_eq!(app.content.texts, vec!["second".to_string()]);
        assert_eq!(app.typing.target(), "second");
    }

    #[test]
    fn failed_newer_save_does_not_block_older_success() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.select_tab(Tab::Content);
        let generation = app.editor_generation();
        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::TypingTexts,
                generation,
                seq: 2,
                result: Err(ContentError::Rejected("busy".to_string())),
            },
            t0,
        );
        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::TypingTexts,
                generation,
                seq: 1,
                result: Ok(vec!["older".to_string()]),
            },
            t0,
        );
        assert_eq!(app.content.texts, vec!["older".to_string()]);
    }

    #[test]
    fn saves_of_different_lists_do_not_supersede_each_other() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        let generation = app.editor_generation();
        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::HtmlSnippets,
                generation,
                seq: 2,
                result: Ok(vec!["<i>s</i>".to_string()]),
            },
            t0,
        );
        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::TypingTexts,
                generation,
                seq: 1,
                result: Ok(vec!["t".to_string()]),
            },
            t0,
        );
        assert_eq!(app.content.texts, vec!["t".to_string()]);
        assert_eq!(app.content.snippets, vec!["<i>s</i>".to_string()]);
    }

    #[test]
    fn successful_save_clears_editor_dirty_flag() {
        let t0 = Instant::now();
        let store = Arc::new(MemoryContentStore::new(ContentLists::default()));
        let mut app = loaded_app(t0);
        app.select_tab(Tab::Content);
        app.texts_editor
            .handle(KeyEvent::new(KeyCode::Char('!'), KeyModifiers::NONE));
        assert!(app.texts_editor.is_dirty());

        app.save_editor();
        for response in run_saves(&mut app, &store) {
            app.apply_content(response, t0);
        }
        assert!(!app.texts_editor.is_dirty());
        assert_eq!(app.content.texts, vec!["!abcde".to_string()]);
    }

    #[test]
    fn edits_after_save_keep_dirty_flag() {
        let t0 = Instant::now();
        let store = Arc::new(MemoryContentStore::new(ContentLists::default()));
        let mut app = loaded_app(t0);
        app.select_tab(Tab::Content);
        app.texts_editor
            .handle(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        app.save_editor();
        let responses = run_saves(&mut app, &store);
        app.texts_editor
            .handle(KeyEvent::new(KeyCode::Char('b'), KeyModifiers::NONE));

        for response in responses {
            app.apply_content(response, t0);
        }
        assert!(app.texts_editor.is_dirty());
    }

    #[test]
    fn save_failure_keeps_content_and_expires() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        app.select_tab(Tab::Content);
        let generation = app.editor_generation();
        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::TypingTexts,
                generation,
                seq: 1,
                result: Err(ContentError::Rejected("disk full".to_string())),
            },
            t0,
        );
        assert_eq!(app.content.texts, vec!["abcde".to_string()]);
        let status = app.status.clone().expect("status line");
        assert_eq!(status.text, "Error saving typing texts: disk full");
        assert_eq!(status.kind, StatusKind::Error);

        app.tick(t0 + Duration::from_secs(4));
        assert!(app.status.is_some());
        app.tick(t0 + STATUS_TTL);
        assert!(app.status.is_none());
    }

    #[test]
    fn emptied_list_keeps_previous_target() {
        let t0 = Instant::now();
        let mut app = loaded_app(t0);
        let generation = app.editor_generation();
        app.apply_content(
            ContentResponse::Saved {
                kind: ContentKind::TypingTexts,
                generation,
                seq: 1,
                result: Ok(Vec::new()),
            },
            t0,
        );
        assert!(app.content.texts.is_empty());
        assert_eq!(app.typing.target(), "abcde");
        app.reset_current();
        assert_eq!(app.typing.target(), "abcde");
    }

    #[test]
    fn editor_save_drops_blank_lines() {
        let mut app = loaded_app(Instant::now());
        app.select_tab(Tab::Content);
        app.take_requests();
        app.texts_editor.set_lines(&["  first  ", "", "   ", "second"]);
        app.save_editor();
        match app.take_requests().pop() {
            Some(ContentRequest::Save { lines, .. }) => {
                assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
            }
            other => panic!("expected a save request, got {other:?}"),
        }
    }

    #[test]
    fn editor_focus_switches_save_target() {
        let mut app = loaded_app(Instant::now());
        app.select_tab(Tab::Content);
        app.take_requests();
        app.toggle_editor_focus();
        app.save_editor();
        assert!(matches!(
            app.take_requests().pop(),
            Some(ContentRequest::Save { kind: ContentKind::HtmlSnippets, .. })
        ));
    }

    #[test]
    fn preferences_persist_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = App::with_rng(&Config::default(), Some(store), SmallRng::seed_from_u64(1));
        app.select_tab(Tab::HtmlPractice);
        app.toggle_backspace();

        let reopened = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let prefs = reopened.load_preferences();
        assert!(prefs.disable_backspace_html);
        assert!(!prefs.disable_backspace_typing);

        let app = App::with_rng(&Config::default(), Some(reopened), SmallRng::seed_from_u64(1));
        assert!(app.html.disable_backspace());
    }

    #[test]
    fn tab_metadata_lines_up() {
        for (i, tab) in Tab::ALL.iter().enumerate() {
            assert_eq!(tab.index(), i);
            assert_eq!(tab.key(), format!("F{}", i + 1));
        }
    }
}
