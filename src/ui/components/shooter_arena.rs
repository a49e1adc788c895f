use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::SessionStatus;
use crate::session::shooter::{Arena, FLOOR};
use crate::ui::components::entry_line;
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

pub struct ShooterArena<'a> {
    arena: &'a Arena,
    input: &'a LineInput,
    theme: &'a Theme,
}

impl<'a> ShooterArena<'a> {
    pub fn new(arena: &'a Arena, input: &'a LineInput, theme: &'a Theme) -> Self {
        Self {
            arena,
            input,
            theme,
        }
    }
}

/// Map a word's depth and horizontal offset (percent of width) to a cell
/// inside `field`, keeping the whole word on screen.
pub fn project(depth: f64, offset: f64, word_width: u16, field: Rect) -> (u16, u16) {
    let max_row = field.height.saturating_sub(1) as f64;
    let row = ((depth / FLOOR).clamp(0.0, 1.0) * max_row).round() as u16;
    let max_col = field.width.saturating_sub(word_width);
    let col = ((offset / 100.0).clamp(0.0, 1.0) * field.width as f64) as u16;
    (field.x + col.min(max_col), field.y + row)
}

impl Widget for ShooterArena<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Word Shooter ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
            ])
            .split(inner);

        let hearts = "\u{2665} ".repeat(self.arena.lives() as usize);
        let header = Line::from(vec![
            Span::styled(" Lives: ", Style::default().fg(colors.fg())),
            Span::styled(hearts, Style::default().fg(colors.error())),
            Span::styled("  Score: ", Style::default().fg(colors.fg())),
            Span::styled(self.arena.score().to_string(), Style::default().fg(colors.accent())),
            Span::styled("  Hits: ", Style::default().fg(colors.fg())),
            Span::styled(self.arena.hits().to_string(), Style::default().fg(colors.accent())),
        ]);
        Paragraph::new(header).render(rows[0], buf);

        let field = Block::bordered()
            .border_style(Style::default().fg(colors.accent_dim()));
        let field_inner = field.inner(rows[1]);
        field.render(rows[1], buf);

        match self.arena.status() {
            SessionStatus::Running => {
                let word_style = Style::default()
                    .fg(colors.falling_word())
                    .add_modifier(Modifier::BOLD);
                for entity in self.arena.entities() {
                    let width = entity.word.chars().count() as u16;
                    let (x, y) = project(entity.depth, entity.offset, width, field_inner);
                    if field_inner.width > 0 && field_inner.height > 0 {
                        buf.set_stringn(
                            x,
                            y,
                            &entity.word,
                            field_inner.width as usize,
                            word_style,
                        );
                    }
                }
            }
            status => {
                let prompt = if status == SessionStatus::Failed {
                    "Game over. Press Enter to play again"
                } else {
                    "Press Enter to start shooting"
                };
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled(prompt, Style::default().fg(colors.text_pending()))),
                ])
                .alignment(Alignment::Center)
                .render(field_inner, buf);
            }
        }

        entry_line(self.input, self.arena.status().is_running(), self.theme).render(rows[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_maps_depth_to_rows() {
        let field = Rect::new(2, 5, 40, 11);
        assert_eq!(project(0.0, 0.0, 3, field), (2, 5));
        assert_eq!(project(FLOOR, 0.0, 3, field), (2, 15));
        assert_eq!(project(FLOOR / 2.0, 0.0, 3, field).1, 10);
    }

    #[test]
    fn project_keeps_word_inside_field() {
        let field = Rect::new(0, 0, 20, 10);
        let (x, _) = project(0.0, 99.0, 8, field);
        assert_eq!(x, 12);
        let (x, _) = project(0.0, 50.0, 4, field);
        assert_eq!(x, 10);
    }

    #[test]
    fn idle_arena_shows_start_prompt() {
        let theme = Theme::default();
        let arena = Arena::new(vec!["bug".to_string()]);
        let input = LineInput::default();
        let area = Rect::new(0, 0, 50, 16);
        let mut buf = Buffer::empty(area);
        ShooterArena::new(&arena, &input, &theme).render(area, &mut buf);
        let all: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(all.contains("Press Enter to start shooting"));
    }
}
