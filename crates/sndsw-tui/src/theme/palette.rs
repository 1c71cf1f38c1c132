//! Color palette
//!
//! Classic curses look: bars in black on blue, menu rows in reverse video.

use ratatui::style::Color;

// --- Bars ---
pub const BAR_FG: Color = Color::Black;
pub const BAR_BG: Color = Color::Blue;

// --- Menu ---
pub const MENU_TEXT: Color = Color::Black;
pub const MENU_ROW: Color = Color::White;
pub const MENU_HIGHLIGHT: Color = Color::Yellow;

// --- Text ---
pub const TEXT_MUTED: Color = Color::DarkGray;
