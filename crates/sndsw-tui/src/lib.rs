//! sndsw-tui - Terminal UI for sndsw
//!
//! Provides the ratatui renderer and crossterm key source the event loop from
//! sndsw-app runs against, terminal setup and restoration, and [`run`], which
//! wires them to the sndio control transport.

pub mod event;
pub mod render;
pub mod runner;
pub mod terminal;
pub mod theme;
pub mod widgets;

#[cfg(test)]
pub mod test_utils;

// Re-export main entry points
pub use event::CrosstermKeys;
pub use render::TuiRenderer;
pub use runner::run;
pub use terminal::{install_panic_hook, TerminalGuard};
