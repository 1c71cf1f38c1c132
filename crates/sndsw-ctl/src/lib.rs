//! # sndsw-ctl - Control Transport
//!
//! Talks to the audio server's control channel. Transports report control
//! descriptors and value changes as [`ControlEvent`](sndsw_core::ControlEvent)s
//! and accept a single command: make a device the current default.
//!
//! Depends on [`sndsw_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Transport Seam
//! - [`ControlTransport`] - What the event loop needs from a control channel
//! - [`PollSlot`] - One waitable descriptor plus requested/returned events
//!
//! ### sndio Backend
//! - [`SndioTransport`] - `libsndio` control handle, loaded at runtime
//!
//! ### Test Helpers (`test-helpers` feature)
//! - [`test_utils::ScriptedTransport`] - Socket-pair backed fake transport

pub mod sndio;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;
pub mod transport;

// Public API re-exports
pub use sndio::{SndioTransport, DEFAULT_DEVICE, DEFAULT_LIBRARY};
pub use transport::{ControlTransport, PollSlot};
