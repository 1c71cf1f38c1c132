//! # sndsw-core - Core Domain Types
//!
//! Foundation crate for sndsw. Provides the device model, the control
//! descriptor/event model shared by every transport, error handling and
//! logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (thiserror, tracing, dirs).
//!
//! ## Public API
//!
//! ### Devices (`device`)
//! - [`Device`] - One selectable audio output endpoint
//! - [`DeviceAddr`] - Control address assigned by the server
//!
//! ### Controls (`control`)
//! - [`ControlDesc`] - Description of one server control
//! - [`ControlKind`] - Control type (selector, switch, ...)
//! - [`ControlEvent`] - Descriptor/value notification from a transport
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use sndsw_core::prelude::*;
//! ```

pub mod control;
pub mod device;
pub mod error;
pub mod logging;

/// Prelude for common imports used throughout all sndsw crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use control::{ControlDesc, ControlEvent, ControlKind, ControlNode, DEVICE_FUNC, SERVER_NODE};
pub use device::{bound_label, bound_name, Device, DeviceAddr, LABEL_MAX, NAME_MAX};
pub use error::{Error, Result, ResultExt};
