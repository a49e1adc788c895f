use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug)]
pub struct TabItem<'a> {
    pub key: &'a str,
    pub label: &'a str,
}

/// Header row listing every mode with its function key.
pub struct TabBar<'a> {
    items: &'a [TabItem<'a>],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    pub fn new(items: &'a [TabItem<'a>], selected: usize, theme: &'a Theme) -> Self {
        Self {
            items,
            selected,
            theme,
        }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(Span::styled(
                " typearcade ",
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.header_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let idle = Style::default().fg(colors.header_fg());
        let active = Style::default()
            .fg(colors.bg())
            .bg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let right = inner.right();
        let mut x = inner.x;
        for (i, item) in self.items.iter().enumerate() {
            if x >= right {
                break;
            }
            let style = if i == self.selected { active } else { idle };
            let text = format!(" [{}] {} ", item.key, item.label);
            let (end, _) = buf.set_stringn(x, inner.y, &text, usize::from(right - x), style);
            x = end + 1;
        }
    }
}
