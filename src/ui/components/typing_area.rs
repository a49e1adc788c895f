use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::CharClass;
use crate::engine::highlight::{HighlightedChar, SyntaxClass};
use crate::ui::theme::{Theme, ThemeColors};

pub struct TypingArea<'a> {
    chars: &'a [HighlightedChar],
    title: &'a str,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(chars: &'a [HighlightedChar], title: &'a str, theme: &'a Theme) -> Self {
        Self {
            chars,
            title,
            focused: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

/// A render token maps a single target character to its display representation.
struct RenderToken {
    target_idx: usize,
    display: String,
    is_line_break: bool,
}

/// Expand target chars into render tokens, making whitespace visible.
fn build_render_tokens(target: &[HighlightedChar]) -> Vec<RenderToken> {
    let mut tokens = Vec::with_capacity(target.len());
    let mut col = 0usize;

    for (i, hc) in target.iter().enumerate() {
        match hc.ch {
            '\n' => {
                tokens.push(RenderToken {
                    target_idx: i,
                    display: "\u{21b5}".to_string(), // ↵
                    is_line_break: true,
                });
                col = 0;
            }
            '\t' => {
                let tab_width = 4 - (col % 4);
                let mut display = String::from("\u{2192}"); // →
                for _ in 1..tab_width {
                    display.push('\u{00b7}'); // ·
                }
                tokens.push(RenderToken {
                    target_idx: i,
                    display,
                    is_line_break: false,
                });
                col += tab_width;
            }
            ch => {
                tokens.push(RenderToken {
                    target_idx: i,
                    display: ch.to_string(),
                    is_line_break: false,
                });
                col += 1;
            }
        }
    }

    tokens
}

fn syntax_color(colors: &ThemeColors, syntax: SyntaxClass) -> Color {
    match syntax {
        SyntaxClass::Bracket | SyntaxClass::TagName => colors.syntax_tag(),
        SyntaxClass::AttrName => colors.syntax_attr(),
        SyntaxClass::AttrValue => colors.syntax_value(),
    }
}

/// Correctness decides the colors; syntax class only tints pending text
/// and marks typed tag characters bold, so it never hides a mistake.
fn char_style(colors: &ThemeColors, hc: &HighlightedChar) -> Style {
    let base = match hc.class {
        CharClass::Correct => Style::default().fg(colors.text_correct()),
        CharClass::Incorrect => Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::UNDERLINED),
        CharClass::Cursor => Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg()),
        CharClass::Pending => Style::default().fg(colors.text_pending()),
    };

    match (hc.class, hc.syntax) {
        (CharClass::Pending, Some(syntax)) => base
            .fg(syntax_color(colors, syntax))
            .add_modifier(Modifier::DIM),
        (CharClass::Correct, Some(_)) => base.add_modifier(Modifier::BOLD),
        _ => base,
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let tokens = build_render_tokens(self.chars);

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        for token in tokens {
            let style = char_style(colors, &self.chars[token.target_idx]);
            if let Some(line) = lines.last_mut() {
                line.push(Span::styled(token.display, style));
            }
            if token.is_line_break {
                lines.push(Vec::new());
            }
        }

        let ratatui_lines: Vec<Line> = lines.into_iter().map(Line::from).collect();

        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(ratatui_lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
