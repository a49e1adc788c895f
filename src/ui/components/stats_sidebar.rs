use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::SessionStatus;
use crate::session::typing::TypingSession;
use crate::ui::theme::{Theme, ThemeColors};

pub struct StatsSidebar<'a> {
    session: &'a TypingSession,
    best_wpm: Option<u32>,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    /// `best_wpm` is shown only when given; HTML practice keeps no record.
    pub fn new(session: &'a TypingSession, best_wpm: Option<u32>, theme: &'a Theme) -> Self {
        Self {
            session,
            best_wpm,
            theme,
        }
    }
}

pub fn status_label(status: SessionStatus) -> &'static str {
    match status {
        SessionStatus::Idle => "Ready",
        SessionStatus::Running => "Running",
        SessionStatus::Completed => "Completed",
        SessionStatus::Failed => "Failed",
    }
}

fn status_color(colors: &ThemeColors, status: SessionStatus) -> Color {
    match status {
        SessionStatus::Idle => colors.text_pending(),
        SessionStatus::Running => colors.accent(),
        SessionStatus::Completed => colors.success(),
        SessionStatus::Failed => colors.error(),
    }
}

fn accuracy_color(colors: &ThemeColors, accuracy: u32) -> Color {
    if accuracy >= 95 {
        colors.success()
    } else if accuracy >= 85 {
        colors.warning()
    } else {
        colors.error()
    }
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let metrics = self.session.metrics();
        let status = self.session.status();

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Status: ", Style::default().fg(colors.fg())),
                Span::styled(status_label(status), Style::default().fg(status_color(colors, status))),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Time: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}s", self.session.elapsed_secs()),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(vec![
                Span::styled("WPM: ", Style::default().fg(colors.fg())),
                Span::styled(metrics.wpm.to_string(), Style::default().fg(colors.accent())),
            ]),
            Line::from(vec![
                Span::styled("Accuracy: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}%", metrics.accuracy),
                    Style::default().fg(accuracy_color(colors, metrics.accuracy)),
                ),
            ]),
        ];

        if let Some(best) = self.best_wpm {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Best WPM: ", Style::default().fg(colors.fg())),
                Span::styled(best.to_string(), Style::default().fg(colors.success())),
            ]));
        }

        lines.push(Line::from(""));
        let (flag, flag_color) = if self.session.disable_backspace() {
            ("off", colors.warning())
        } else {
            ("on", colors.text_pending())
        };
        lines.push(Line::from(vec![
            Span::styled("Backspace: ", Style::default().fg(colors.fg())),
            Span::styled(flag, Style::default().fg(flag_color)),
        ]));

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
