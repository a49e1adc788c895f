use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::layout::popup_rect;
use crate::ui::theme::Theme;

/// Centered popup announcing the end of a session. Any key dismisses it.
pub struct NotificationPopup<'a> {
    title: &'a str,
    lines: &'a [String],
    celebratory: bool,
    theme: &'a Theme,
}

impl<'a> NotificationPopup<'a> {
    pub fn new(title: &'a str, lines: &'a [String], celebratory: bool, theme: &'a Theme) -> Self {
        Self {
            title,
            lines,
            celebratory,
            theme,
        }
    }
}

impl Widget for NotificationPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        // Blank line, message, blank line, hint, plus the border.
        let popup = popup_rect(area, 50, self.lines.len() as u16 + 5);
        Clear.render(popup, buf);

        let accent = if self.celebratory {
            colors.success()
        } else {
            colors.accent()
        };
        let block = Block::bordered()
            .title(Span::styled(
                format!(" {} ", self.title),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(accent))
            .style(Style::default().bg(colors.bg()));

        let mut lines: Vec<Line> = vec![Line::from("")];
        for (i, text) in self.lines.iter().enumerate() {
            let style = if i == 0 {
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD)
            } else if self.celebratory {
                Style::default().fg(colors.success())
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(text.as_str(), style)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(colors.text_pending()),
        )));

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popup_shows_message_lines() {
        let theme = Theme::default();
        let lines = vec![
            "Congratulations! You completed the typing test!".to_string(),
            "New best: 80 WPM!".to_string(),
        ];
        let area = Rect::new(0, 0, 120, 40);
        let mut buf = Buffer::empty(area);
        NotificationPopup::new("Typing Test", &lines, true, &theme).render(area, &mut buf);
        let all: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(all.contains("New best: 80 WPM!"));
        assert!(all.contains("Press any key"));
    }
}
