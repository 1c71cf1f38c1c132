//! sndsw - Pick the default sndio output device from a terminal
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use clap::Parser;
use sndsw_app::{config, Outcome};
use sndsw_core::logging;
use tracing::{error, info};

/// Select the default output device of a running sndiod
#[derive(Parser, Debug)]
#[command(name = "sndsw", version)]
#[command(about = "Select the default sndio output device", long_about = None)]
struct Args {}

fn main() -> color_eyre::Result<()> {
    let _args = Args::parse();

    color_eyre::install()?;

    // Log to a file, the TUI owns stdout
    logging::init()?;

    let settings = config::load_user_settings();
    info!(
        "Using control device '{}' from {}",
        settings.control.device, settings.control.library
    );

    match sndsw_tui::run(&settings) {
        Ok(Outcome::Committed(addr)) => {
            info!("Default device set (control {})", addr);
            Ok(())
        }
        Ok(Outcome::Quit) => {
            info!("Quit without changing the default device");
            Ok(())
        }
        Err(e) => {
            error!("Application error: {:?}", e);
            Err(e.into())
        }
    }
}
