use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::race::{RACE_SECS, WordRace};
use crate::ui::components::entry_line;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct RaceView<'a> {
    race: &'a WordRace,
    input: &'a LineInput,
    theme: &'a Theme,
}

impl<'a> RaceView<'a> {
    pub fn new(race: &'a WordRace, input: &'a LineInput, theme: &'a Theme) -> Self {
        Self { race, input, theme }
    }
}

/// Live "completed/total" readout; a race has no fixed word count.
pub fn words_display(completed: u32) -> String {
    format!("{completed}/\u{221e}")
}

impl Widget for RaceView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Word Race ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(inner);

        let ratio = self.race.time_left() as f64 / RACE_SECS as f64;
        ProgressBar::new("Time left", ratio, format!("{} s", self.race.time_left()), self.theme)
            .render(rows[0], buf);

        let score_line = Line::from(vec![
            Span::styled(" Score: ", Style::default().fg(colors.fg())),
            Span::styled(self.race.score().to_string(), Style::default().fg(colors.accent())),
            Span::styled("   Words: ", Style::default().fg(colors.fg())),
            Span::styled(
                words_display(self.race.words_completed()),
                Style::default().fg(colors.accent()),
            ),
        ]);
        Paragraph::new(score_line).render(rows[1], buf);

        let word = match self.race.current_word() {
            Some(word) => Span::styled(
                word,
                Style::default()
                    .fg(colors.falling_word())
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(
                "Press Enter to start the race",
                Style::default().fg(colors.text_pending()),
            ),
        };
        Paragraph::new(vec![Line::from(""), Line::from(word)])
            .alignment(Alignment::Center)
            .render(rows[2], buf);

        entry_line(self.input, self.race.status().is_running(), self.theme).render(rows[3], buf);
    }
}
