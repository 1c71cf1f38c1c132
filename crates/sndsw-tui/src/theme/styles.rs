//! Semantic style builders

use ratatui::style::{Modifier, Style};

use super::palette;

/// Title and status bars
pub fn bar() -> Style {
    Style::default().fg(palette::BAR_FG).bg(palette::BAR_BG)
}

/// A menu row that is not highlighted
pub fn menu_row() -> Style {
    Style::default().fg(palette::MENU_TEXT).bg(palette::MENU_ROW)
}

/// The highlighted menu row
pub fn menu_highlight() -> Style {
    Style::default()
        .fg(palette::MENU_TEXT)
        .bg(palette::MENU_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}
