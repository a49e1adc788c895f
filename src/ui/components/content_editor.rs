use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::text_area::TextArea;
use crate::ui::theme::Theme;

/// One editor pane: a title, the buffer, and whether it has focus.
pub struct EditorPane<'a> {
    pub title: &'a str,
    pub area: &'a TextArea,
    pub focused: bool,
}

pub struct ContentEditor<'a> {
    panes: [EditorPane<'a>; 2],
    theme: &'a Theme,
}

impl<'a> ContentEditor<'a> {
    pub fn new(panes: [EditorPane<'a>; 2], theme: &'a Theme) -> Self {
        Self { panes, theme }
    }
}

/// First visible row so the cursor row stays on screen.
pub fn scroll_offset(cursor_row: usize, height: usize) -> usize {
    if height == 0 {
        return 0;
    }
    cursor_row.saturating_sub(height - 1)
}

fn render_pane(pane: &EditorPane<'_>, theme: &Theme, rect: Rect, buf: &mut Buffer) {
    let colors = &theme.colors;
    let border = if pane.focused {
        colors.border_focused()
    } else {
        colors.border()
    };
    let dirty = if pane.area.is_dirty() { " *" } else { "" };
    let block = Block::bordered()
        .title(format!(" {}{dirty} ", pane.title))
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(rect);
    block.render(rect, buf);

    let (cursor_row, cursor_col) = pane.area.cursor();
    let top = scroll_offset(cursor_row, inner.height as usize);
    let text_style = Style::default().fg(colors.fg());
    let cursor_style = Style::default()
        .fg(colors.text_cursor_fg())
        .bg(colors.text_cursor_bg());

    let lines: Vec<Line> = pane
        .area
        .lines()
        .iter()
        .enumerate()
        .skip(top)
        .take(inner.height as usize)
        .map(|(row, text)| {
            if !pane.focused || row != cursor_row {
                return Line::from(Span::styled(text.as_str(), text_style));
            }
            let before: String = text.chars().take(cursor_col).collect();
            let at = text.chars().nth(cursor_col).unwrap_or(' ');
            let after: String = text.chars().skip(cursor_col + 1).collect();
            Line::from(vec![
                Span::styled(before, text_style),
                Span::styled(at.to_string(), cursor_style),
                Span::styled(after, text_style),
            ])
        })
        .collect();

    Paragraph::new(lines).render(inner, buf);
}

impl Widget for ContentEditor<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let direction = if area.width >= 100 {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let halves = Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (pane, rect) in self.panes.iter().zip(halves.iter()) {
            render_pane(pane, self.theme, *rect, buf);
        }
    }
}
