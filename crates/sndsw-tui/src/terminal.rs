//! Terminal setup and restoration
//!
//! The terminal is put back into its normal mode on every way out: when the
//! [`TerminalGuard`] is dropped and when the program panics.

use ratatui::DefaultTerminal;
use sndsw_core::prelude::*;

/// Install a panic hook that restores the terminal
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

/// Restores the terminal when dropped
#[must_use = "the terminal is restored as soon as the guard is dropped"]
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen
    pub fn init() -> Result<(Self, DefaultTerminal)> {
        let terminal = ratatui::try_init().map_err(|e| Error::TerminalInit(e.to_string()))?;
        debug!("Terminal initialized");
        Ok((Self { _private: () }, terminal))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
        debug!("Terminal restored");
    }
}
