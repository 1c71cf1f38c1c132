//! Runs the device menu against the real sndio server and terminal

use sndsw_app::{Engine, Outcome, Settings};
use sndsw_core::prelude::*;
use sndsw_ctl::SndioTransport;

use crate::event::CrosstermKeys;
use crate::render::TuiRenderer;
use crate::terminal::{install_panic_hook, TerminalGuard};

/// Open the control device, show the menu and run until the user commits
/// or quits.
///
/// The terminal is restored before this returns, on success and on error.
pub fn run(settings: &Settings) -> Result<Outcome> {
    // Connect first so a missing server fails before the screen is taken over
    let transport = SndioTransport::open(&settings.control.library, &settings.control.device)?;

    install_panic_hook();
    let (guard, terminal) = TerminalGuard::init()?;

    let renderer = TuiRenderer::new(terminal, settings.ui.title.clone());
    let result = Engine::start(
        transport,
        CrosstermKeys::new(),
        renderer,
        settings.behavior.clone(),
    )
    .and_then(|mut engine| engine.run());

    drop(guard);
    result
}
