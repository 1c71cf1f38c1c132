//! The control transport seam used by the event loop

use std::os::fd::RawFd;

use sndsw_core::prelude::*;
use sndsw_core::{ControlEvent, DeviceAddr};

/// One descriptor the event loop must wait on for a transport.
///
/// `events` is what the transport asked for; `revents` is filled in by the
/// readiness wait and handed back through [`ControlTransport::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSlot {
    pub fd: RawFd,
    pub events: i16,
    pub revents: i16,
}

impl PollSlot {
    /// A slot waiting for input on `fd`
    pub fn readable(fd: RawFd) -> Self {
        Self {
            fd,
            events: libc::POLLIN,
            revents: 0,
        }
    }

    /// The peer hung up or the descriptor went bad
    pub fn is_hangup(&self) -> bool {
        self.revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0
    }

    pub fn is_readable(&self) -> bool {
        self.revents & libc::POLLIN != 0
    }

    pub fn is_ready(&self) -> bool {
        self.revents != 0
    }
}

/// A control channel to the audio server.
///
/// Implementations register their descriptor and value listeners when they
/// are opened and queue every notification internally; nothing is delivered
/// through globals or callbacks into the caller. Closing happens on drop.
pub trait ControlTransport {
    /// Descriptors to wait on for the next cycle.
    ///
    /// Queried again before every wait because the set can change.
    fn poll_slots(&mut self) -> Result<Vec<PollSlot>>;

    /// Process readiness reported for `ready` and return every notification
    /// that is now pending, in arrival order.
    ///
    /// Must drain completely: anything left behind would only surface on a
    /// later wake-up.
    fn dispatch(&mut self, ready: &[PollSlot]) -> Result<Vec<ControlEvent>>;

    /// Notifications queued outside of [`dispatch`](Self::dispatch), such as
    /// the burst describing every existing control right after open.
    fn take_queued(&mut self) -> Vec<ControlEvent>;

    /// Make the device at `addr` the server's current default
    fn set_current(&mut self, addr: DeviceAddr) -> Result<()>;
}
