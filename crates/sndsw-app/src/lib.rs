//! sndsw-app - Device registry and live menu synchronization
//!
//! This crate keeps an in-memory list of the server's output devices in sync
//! with the control channel, projects it into a navigable menu and runs the
//! single-threaded event loop that multiplexes control events and keyboard
//! input. Terminal specifics stay behind the [`KeySource`] and
//! [`MenuRenderer`] traits.

pub mod config;
pub mod engine;
pub mod ingest;
pub mod input_key;
pub mod keys;
pub mod menu;
pub mod readiness;
pub mod registry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

// Re-export primary types
pub use config::{EmptyPolicy, OrderPolicy, Settings};
pub use engine::{Engine, InputEvent, KeySource, LoopState, MenuRenderer, Outcome};
pub use ingest::{EventIngestor, IngestReport};
pub use input_key::InputKey;
pub use menu::{Direction, MenuController, MenuEntry, MenuSnapshot, MenuView, RebuildOutcome};
pub use readiness::Readiness;
pub use registry::{Registry, RegistryChange};
