pub mod content_editor;
pub mod notification;
pub mod progress_bar;
pub mod race_view;
pub mod shooter_arena;
pub mod stats_sidebar;
pub mod tab_bar;
pub mod typing_area;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

/// Bordered one-line entry box for the race and shooter views.
pub fn entry_line<'a>(input: &'a LineInput, active: bool, theme: &Theme) -> Paragraph<'a> {
    let colors = &theme.colors;
    let (before, cursor_ch, after) = input.render_parts();

    let mut spans = vec![Span::styled(before, Style::default().fg(colors.fg()))];
    if active {
        let cursor_style = Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg());
        match cursor_ch {
            Some(ch) => spans.push(Span::styled(ch.to_string(), cursor_style)),
            None => spans.push(Span::styled(" ", cursor_style)),
        }
    } else if let Some(ch) = cursor_ch {
        spans.push(Span::styled(ch.to_string(), Style::default().fg(colors.fg())));
    }
    spans.push(Span::styled(after, Style::default().fg(colors.fg())));

    let border = if active {
        colors.border_focused()
    } else {
        colors.border()
    };
    Paragraph::new(Line::from(spans)).block(
        Block::bordered()
            .title(" Type here ")
            .border_style(Style::default().fg(border)),
    )
}
