mod app;
mod config;
mod content;
mod engine;
mod error;
mod event;
mod session;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use app::{App, StatusKind, Tab};
use config::Config;
use content::repository::{ContentRepository, default_lists};
use content::store::{HttpContentStore, MemoryContentStore};
use event::{AppEvent, EventHandler};
use session::SessionStatus;
use session::typing::PracticeKind;
use store::json_store::JsonStore;
use ui::components::content_editor::{ContentEditor, EditorPane};
use ui::components::notification::NotificationPopup;
use ui::components::race_view::RaceView;
use ui::components::shooter_arena::ShooterArena;
use ui::components::stats_sidebar::{StatsSidebar, status_label};
use ui::components::tab_bar::{TabBar, TabItem};
use ui::components::typing_area::TypingArea;
use ui::layout::{AppLayout, fit_hints};

#[derive(Parser)]
#[command(
    name = "typearcade",
    version,
    about = "Terminal typing practice: typing test, HTML snippets, word race and a falling-word shooter"
)]
struct Cli {
    #[arg(short, long, help = "Theme name (not persisted)")]
    theme: Option<String>,

    #[arg(long, help = "Base URL of the content API")]
    api_url: Option<String>,

    #[arg(long, help = "Use built-in content and keep edits in memory")]
    offline: bool,

    #[arg(long, help = "Write logs to this file")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load();
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    if let Some(url) = cli.api_url {
        config.content_api_url = url;
    }
    if cli.offline {
        config.offline = true;
    }

    init_logging(&config, cli.log_file);
    if let Err(e) = loaded {
        warn!(error = %e, path = %Config::config_path().display(), "bad config file, using defaults");
    }
    info!(
        api = %config.content_api_url,
        offline = config.offline,
        "typearcade starting"
    );

    let store = match JsonStore::new() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "preferences store unavailable");
            None
        }
    };
    let mut app = App::new(&config, store);
    if let Some(theme_name) = cli.theme {
        app.apply_theme(&theme_name);
    }

    let repo = build_repository(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events, &repo);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    info!("typearcade exiting");
    Ok(())
}

/// Log to a file; the terminal belongs to the UI. Failure only means no logs.
fn init_logging(config: &Config, log_file: Option<PathBuf>) {
    let path = log_file.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typearcade")
            .join("typearcade.log")
    });
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(_) => return,
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

fn build_repository(config: &Config) -> ContentRepository {
    let offline = || ContentRepository::new(Arc::new(MemoryContentStore::new(default_lists())));
    if config.offline {
        return offline();
    }
    match HttpContentStore::new(&config.content_api_url, config.request_timeout()) {
        Ok(store) => ContentRepository::new(Arc::new(store)),
        Err(e) => {
            warn!(error = %e, "content API client unavailable, working offline");
            offline()
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    repo: &ContentRepository,
) -> Result<()> {
    loop {
        for request in app.take_requests() {
            debug!(?request, "dispatching content request");
            let repo = repo.clone();
            let tx = events.sender();
            thread::spawn(move || {
                let _ = tx.send(AppEvent::Content(request.execute(&repo)));
            });
        }

        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now()),
            AppEvent::Content(response) => app.apply_content(response, Instant::now()),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        // Ticks are skipped while keys keep arriving, so drive clocks every pass.
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        app.should_quit = true;
        return;
    }

    if app.notification.is_some() {
        app.dismiss_notification();
        return;
    }

    if let KeyCode::F(n @ 1..=5) = key.code {
        app.select_tab(Tab::ALL[usize::from(n - 1)]);
        return;
    }

    if ctrl {
        match key.code {
            KeyCode::Char('t') => app.cycle_theme(),
            KeyCode::Char('r') => app.reset_current(),
            KeyCode::Char('n') => app.new_target(),
            KeyCode::Char('b') => app.toggle_backspace(),
            KeyCode::Char('s') if app.tab == Tab::Content => app.save_editor(),
            KeyCode::Char('u') | KeyCode::Char('w') => app.entry_key(key),
            _ => {}
        }
        return;
    }

    match app.tab {
        Tab::TypingTest | Tab::HtmlPractice => handle_typing_key(app, key, now),
        Tab::WordRace | Tab::Shooter => handle_game_key(app, key, now),
        Tab::Content => handle_content_key(app, key),
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent, now: Instant) {
    if app.current_status().is_running() {
        match key.code {
            KeyCode::Char(ch) => app.type_char(ch, now),
            KeyCode::Backspace => app.backspace(now),
            KeyCode::Esc => app.reset_current(),
            _ => {}
        }
    } else if key.code == KeyCode::Enter {
        app.start_current(now);
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent, now: Instant) {
    if app.current_status().is_running() {
        app.entry_key(key);
    } else if key.code == KeyCode::Enter {
        app.start_current(now);
    }
}

fn handle_content_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => app.toggle_editor_focus(),
        _ => {
            app.focused_editor_mut().handle(key);
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let app_layout = AppLayout::new(area);

    let items = Tab::ALL.map(|t| TabItem {
        key: t.key(),
        label: t.label(),
    });
    frame.render_widget(
        TabBar::new(&items, app.tab.index(), app.theme),
        app_layout.tabs,
    );

    let full = match app_layout.sidebar {
        Some(sidebar) => app_layout.main.union(sidebar),
        None => app_layout.main,
    };

    match app.tab {
        Tab::TypingTest => render_typing(frame, app, PracticeKind::PlainText, &app_layout),
        Tab::HtmlPractice => render_typing(frame, app, PracticeKind::HtmlSnippet, &app_layout),
        Tab::WordRace => {
            frame.render_widget(RaceView::new(&app.race, &app.race_input, app.theme), full);
        }
        Tab::Shooter => {
            frame.render_widget(
                ShooterArena::new(&app.shooter, &app.shooter_input, app.theme),
                full,
            );
        }
        Tab::Content => {
            let editor = ContentEditor::new(
                [
                    EditorPane {
                        title: "Typing Texts",
                        area: &app.texts_editor,
                        focused: app.editor_focus == content::ContentKind::TypingTexts,
                    },
                    EditorPane {
                        title: "HTML Snippets",
                        area: &app.snippets_editor,
                        focused: app.editor_focus == content::ContentKind::HtmlSnippets,
                    },
                ],
                app.theme,
            );
            frame.render_widget(editor, full);
        }
    }

    render_status(frame, app, app_layout.status);
    render_footer(frame, app, app_layout.footer);

    if let Some(ref note) = app.notification {
        frame.render_widget(
            NotificationPopup::new(&note.title, &note.lines, note.celebratory, app.theme),
            area,
        );
    }
}

fn render_typing(frame: &mut ratatui::Frame, app: &App, kind: PracticeKind, app_layout: &AppLayout) {
    let colors = &app.theme.colors;
    let session = app.typing_session(kind);
    let best = match kind {
        PracticeKind::PlainText => Some(app.preferences.best_wpm.value()),
        PracticeKind::HtmlSnippet => None,
    };

    let main = if app_layout.tier.show_sidebar() {
        app_layout.main
    } else {
        // Narrow: one-line stats above the practice text.
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(app_layout.main);
        let metrics = session.metrics();
        let mut text = format!(
            " {} | {}s | WPM: {} | Acc: {}%",
            status_label(session.status()),
            session.elapsed_secs(),
            metrics.wpm,
            metrics.accuracy
        );
        if let Some(best) = best {
            text.push_str(&format!(" | Best: {best}"));
        }
        if session.disable_backspace() {
            text.push_str(" | no backspace");
        }
        let header = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().bg(colors.header_bg()));
        frame.render_widget(header, rows[0]);
        rows[1]
    };

    let title = match kind {
        PracticeKind::PlainText => "Typing Test",
        PracticeKind::HtmlSnippet => "HTML Practice",
    };
    if session.target().is_empty() {
        render_placeholder(frame, app, title, "Loading content...", main);
    } else {
        let chars = session.highlighted();
        frame.render_widget(
            TypingArea::new(&chars, title, app.theme).focused(session.status().is_running()),
            main,
        );
    }

    if let Some(sidebar) = app_layout.sidebar {
        frame.render_widget(StatsSidebar::new(session, best, app.theme), sidebar);
    }
}

fn render_placeholder(frame: &mut ratatui::Frame, app: &App, title: &str, text: &str, area: Rect) {
    let colors = &app.theme.colors;
    let block = Block::bordered()
        .title(format!(" {title} "))
        .border_style(Style::default().fg(colors.border()));
    let paragraph = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(colors.text_pending()),
    )))
    .alignment(Alignment::Center)
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_status(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let Some(ref status) = app.status else {
        return;
    };
    let color = match status.kind {
        StatusKind::Success => colors.success(),
        StatusKind::Error => colors.error(),
    };
    let line = Paragraph::new(Line::from(Span::styled(
        format!(" {}", status.text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(line, area);
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    let running = app.current_status() == SessionStatus::Running;
    let mut hints = match app.tab {
        Tab::TypingTest | Tab::HtmlPractice if running => {
            vec!["[type] Practice", "[Esc] Reset", "[^B] Backspace lock"]
        }
        Tab::TypingTest | Tab::HtmlPractice => vec![
            "[Enter] Start",
            "[^R] Reset",
            "[^N] New text",
            "[^B] Backspace lock",
        ],
        Tab::WordRace | Tab::Shooter if running => vec!["[Enter] Fire word", "[^R] Reset"],
        Tab::WordRace | Tab::Shooter => vec!["[Enter] Start", "[^R] Reset"],
        Tab::Content => vec!["[Tab] Switch list", "[^S] Save list"],
    };
    hints.extend(["[F1-F5] Tabs", "[^T] Theme", "[^Q] Quit"]);
    hints
}

fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let hints = footer_hints(app);
    let line = fit_hints(&hints, area.width as usize);
    let footer = Paragraph::new(Line::from(Span::styled(
        line,
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, area);
}
