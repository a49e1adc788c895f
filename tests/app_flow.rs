use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;

use typearcade::app::{App, StatusKind, Tab};
use typearcade::config::Config;
use typearcade::content::repository::{ContentRepository, default_list};
use typearcade::content::store::MemoryContentStore;
use typearcade::content::{ContentKind, ContentLists, ContentRequest};
use typearcade::session::SessionStatus;
use typearcade::session::race::WordRace;
use typearcade::session::shooter::{Arena, FALL_SPEED, FLOOR, STARTING_LIVES};
use typearcade::session::{SessionEvent, typing::PracticeKind};
use typearcade::store::json_store::JsonStore;

fn seeded_app(store: Option<JsonStore>) -> App {
    App::with_rng(&Config::default(), store, SmallRng::seed_from_u64(42))
}

/// Run every queued request against `repo` and feed the answers back, the
/// way the worker threads do.
fn pump(app: &mut App, repo: &ContentRepository, now: Instant) {
    for request in app.take_requests() {
        app.apply_content(request.execute(repo), now);
    }
}

#[test]
fn startup_load_falls_back_per_list() {
    let store = Arc::new(MemoryContentStore::new(ContentLists {
        texts: vec!["remote text".to_string()],
        snippets: vec!["<i>remote</i>".to_string()],
    }));
    store.fail_fetch(ContentKind::TypingTexts);
    let repo = ContentRepository::new(store);

    let now = Instant::now();
    let mut app = seeded_app(None);
    pump(&mut app, &repo, now);

    assert_eq!(app.content.texts, default_list(ContentKind::TypingTexts));
    assert_eq!(app.content.snippets, vec!["<i>remote</i>".to_string()]);
    assert!(default_list(ContentKind::TypingTexts).contains(&app.typing.target().to_string()));
    assert_eq!(app.html.target(), "<i>remote</i>");
}

#[test]
fn editor_save_round_trips_through_store() {
    let store = Arc::new(MemoryContentStore::new(ContentLists::default()));
    let repo = ContentRepository::new(store.clone());
    let now = Instant::now();
    let mut app = seeded_app(None);
    pump(&mut app, &repo, now);

    app.select_tab(Tab::Content);
    app.texts_editor.set_lines(&["  alpha  ", "", "beta", "   ", "alpha"]);
    app.save_editor();
    pump(&mut app, &repo, now);

    let expected = vec!["alpha".to_string(), "beta".to_string(), "alpha".to_string()];
    assert_eq!(store.snapshot().texts, expected);
    assert_eq!(app.content.texts, expected);
    assert_eq!(
        app.status.as_ref().map(|s| (s.text.as_str(), s.kind)),
        Some(("Typing texts saved successfully!", StatusKind::Success))
    );

    // A fresh load sees the same list.
    app.apply_content(ContentRequest::Load.execute(&repo), now);
    assert_eq!(app.content.texts, expected);
}

#[test]
fn rejected_save_surfaces_message_and_keeps_state() {
    let store = Arc::new(MemoryContentStore::new(ContentLists {
        texts: vec!["keep me".to_string()],
        snippets: Vec::new(),
    }));
    let repo = ContentRepository::new(store.clone());
    let now = Instant::now();
    let mut app = seeded_app(None);
    pump(&mut app, &repo, now);

    store.reject_saves(Some("read-only store"));
    app.select_tab(Tab::Content);
    app.texts_editor.set_lines(&["replacement"]);
    app.save_editor();
    pump(&mut app, &repo, now);

    assert_eq!(app.content.texts, vec!["keep me".to_string()]);
    assert_eq!(store.snapshot().texts, vec!["keep me".to_string()]);
    assert_eq!(app.texts_editor.text(), "replacement");
    let status = app.status.clone().expect("status message");
    assert_eq!(status.text, "Error saving typing texts: read-only store");
    assert_eq!(status.kind, StatusKind::Error);
}

#[test]
fn best_wpm_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryContentStore::new(ContentLists {
        texts: vec!["hello world".to_string()],
        snippets: Vec::new(),
    }));
    let repo = ContentRepository::new(store);
    let t0 = Instant::now();

    {
        let json = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let mut app = seeded_app(Some(json));
        pump(&mut app, &repo, t0);
        app.start_current(t0);
        // 11 chars in 12s: (11 / 5) / 0.2 min = 11 WPM.
        for ch in "hello world".chars() {
            app.type_char(ch, t0 + Duration::from_secs(12));
        }
        assert_eq!(app.typing.status(), SessionStatus::Completed);
        assert_eq!(app.preferences.best_wpm.value(), 11);
    }

    let json = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let app = seeded_app(Some(json));
    assert_eq!(app.preferences.best_wpm.value(), 11);
}

#[test]
fn typing_session_walkthrough() {
    let mut session = typearcade::session::typing::TypingSession::new(PracticeKind::PlainText);
    session.reset(Some("type me".to_string()));
    let t0 = Instant::now();

    assert_eq!(session.start(t0), Some(SessionEvent::Started));
    assert_eq!(session.start(t0), None);
    session.on_input("type", t0 + Duration::from_secs(1));
    assert_eq!(
        session.tick(t0 + Duration::from_millis(2500)),
        Some(SessionEvent::Elapsed { secs: 2 })
    );
    let done = session.on_input("type me", t0 + Duration::from_secs(3));
    assert!(matches!(done, Some(SessionEvent::Completed { clean: true, .. })));
    assert!(!session.is_ticking());
    assert_eq!(session.on_input("x", t0 + Duration::from_secs(4)), None);
}

#[test]
fn race_runs_out_after_thirty_ticks() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut race = WordRace::new(vec!["git".to_string(), "rust".to_string()]);
    let t0 = Instant::now();
    race.start(t0, &mut rng);

    let word = race.current_word().unwrap().to_string();
    race.submit(&format!("  {word} "), &mut rng);
    assert_eq!(race.words_completed(), 1);
    assert_eq!(race.score(), 10 * word.len() as u32);

    let mut finished = 0;
    for s in 1..=40 {
        for event in race.tick(t0 + Duration::from_secs(s)) {
            if matches!(event, SessionEvent::RaceFinished { .. }) {
                finished += 1;
            }
        }
    }
    assert_eq!(finished, 1);
    assert_eq!(race.status(), SessionStatus::Completed);
    assert_eq!(race.time_left(), 0);
}

#[test]
fn shooter_loses_all_lives_exactly_once() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut arena = Arena::new(vec!["npm".to_string()]);
    let t0 = Instant::now();
    arena.start(t0);

    let lifetime = FLOOR / FALL_SPEED;
    let horizon = Duration::from_secs_f64(lifetime * 4.0 + 10.0);
    let mut game_overs = 0;
    let mut lives_lost = 0;
    let mut at = t0;
    while at < t0 + horizon {
        at += Duration::from_millis(100);
        for event in arena.tick(at, &mut rng) {
            match event {
                SessionEvent::GameOver { .. } => game_overs += 1,
                SessionEvent::LifeLost { .. } => lives_lost += 1,
                _ => {}
            }
        }
    }

    assert_eq!(game_overs, 1);
    assert_eq!(lives_lost, STARTING_LIVES);
    assert_eq!(arena.lives(), 0);
    assert_eq!(arena.status(), SessionStatus::Failed);
    assert!(arena.entities().is_empty());
    assert!(!arena.is_ticking());
}
