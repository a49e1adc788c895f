use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: practice area + stats sidebar
    Narrow, // <100 cols: full-width practice area, stats in a single line
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub tabs: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub status: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);

        let (main, sidebar) = if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
                .split(vertical[1]);
            (horizontal[0], Some(horizontal[1]))
        } else {
            (vertical[1], None)
        };

        Self {
            tabs: vertical[0],
            main,
            sidebar,
            status: vertical[2],
            footer: vertical[3],
            tier,
        }
    }
}

/// Join as many leading hints as fit on one `width`-column line. Hints that
/// would overflow are dropped, never cut mid-word.
pub fn fit_hints(hints: &[&str], width: usize) -> String {
    let mut line = String::new();
    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let sep = if line.is_empty() { " " } else { "  " };
        if line.chars().count() + sep.len() + hint.chars().count() > width {
            break;
        }
        line.push_str(sep);
        line.push_str(hint);
    }
    line
}

/// Rect of `percent_x` of the area's width and `height` rows, centered.
/// At least 40 columns wide when the area allows it.
pub fn popup_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let scaled = u32::from(area.width) * u32::from(percent_x.min(100)) / 100;
    let width = (scaled as u16).max(40).min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
