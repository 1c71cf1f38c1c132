//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    // ─────────────────────────────────────────────────────────────
    // Control Transport Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to open control device '{target}': {reason}")]
    TransportOpen { target: String, reason: String },

    #[error("Control transport error: {message}")]
    Transport { message: String },

    #[error("lost connection to sndiod")]
    ConnectionLost,

    #[error("Failed to select device at control address {addr}")]
    Commit { addr: u32 },

    // ─────────────────────────────────────────────────────────────
    // Event Loop Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to wait for input: {message}")]
    Wait { message: String },

    #[error("No audio devices reported by the server")]
    NoDevices,

    #[error("Event loop already stopped after a fatal error")]
    LoopStopped,

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn transport_open(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TransportOpen {
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn commit(addr: u32) -> Self {
        Self::Commit { addr }
    }

    pub fn wait(message: impl Into<String>) -> Self {
        Self::Wait {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error should terminate the program
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::TerminalInit(_)
                | Error::TransportOpen { .. }
                | Error::Transport { .. }
                | Error::ConnectionLost
                | Error::Commit { .. }
                | Error::Wait { .. }
                | Error::NoDevices
                | Error::LoopStopped
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::ConnectionLost;
        assert_eq!(err.to_string(), "lost connection to sndiod");

        let err = Error::transport_open("default", "no such device");
        assert_eq!(
            err.to_string(),
            "Failed to open control device 'default': no such device"
        );

        let err = Error::commit(17);
        assert!(err.to_string().contains("17"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::ConnectionLost.is_fatal());
        assert!(Error::NoDevices.is_fatal());
        assert!(Error::wait("EBADF").is_fatal());
        assert!(Error::commit(1).is_fatal());
        assert!(Error::transport_open("default", "refused").is_fatal());
        assert!(!Error::config("bad toml").is_fatal());
    }

    #[test]
    fn test_loop_stopped_is_fatal() {
        assert!(Error::LoopStopped.is_fatal());
        assert!(Error::LoopStopped.to_string().contains("already stopped"));
    }

    #[test]
    fn test_result_ext_preserves_error() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        ));
        let err = result.context("writing to control socket").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
