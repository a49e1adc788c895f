use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bordered one-row bar with a caption drawn over the fill.
pub struct ProgressBar<'a> {
    title: &'a str,
    ratio: f64,
    caption: String,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(title: &'a str, ratio: f64, caption: impl Into<String>, theme: &'a Theme) -> Self {
        Self {
            title,
            ratio: ratio.clamp(0.0, 1.0),
            caption: caption.into(),
            theme,
        }
    }

    fn filled_cells(&self, width: u16) -> u16 {
        (self.ratio * f64::from(width)).round() as u16
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.is_empty() {
            return;
        }

        let filled = self.filled_cells(inner.width);
        let caption: Vec<char> = self.caption.chars().collect();
        let caption_start = inner.width.saturating_sub(caption.len() as u16) / 2;

        for col in 0..inner.width {
            let style = if col < filled {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            let symbol = col
                .checked_sub(caption_start)
                .and_then(|i| caption.get(usize::from(i)))
                .copied()
                .unwrap_or(' ');
            buf[(inner.x + col, inner.y)]
                .set_char(symbol)
                .set_style(style);
        }
    }
}
