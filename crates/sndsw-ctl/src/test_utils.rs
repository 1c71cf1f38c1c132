//! Test utilities for control transports
//!
//! [`ScriptedTransport`] behaves like a real control channel as far as the
//! event loop can tell: its descriptor is one end of a socket pair, it turns
//! readable whenever events are pushed, and it reports a hang-up when the
//! other end is dropped.

use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::AsRawFd;
use std::os::unix::net::UnixStream;

use sndsw_core::prelude::*;
use sndsw_core::{ControlEvent, DeviceAddr};

use crate::transport::{ControlTransport, PollSlot};

/// Fake control transport driven by the test
pub struct ScriptedTransport {
    reader: UnixStream,
    writer: Option<UnixStream>,
    queued: Vec<ControlEvent>,
    pending: VecDeque<ControlEvent>,
    commits: Vec<DeviceAddr>,
    fail_commits: bool,
    dispatches: usize,
}

impl ScriptedTransport {
    /// Creates a transport with no devices.
    pub fn new() -> Self {
        let (reader, writer) = UnixStream::pair().expect("socket pair for scripted transport");
        reader
            .set_nonblocking(true)
            .expect("non-blocking scripted transport socket");
        Self {
            reader,
            writer: Some(writer),
            queued: Vec::new(),
            pending: VecDeque::new(),
            commits: Vec::new(),
            fail_commits: false,
            dispatches: 0,
        }
    }

    /// Creates a transport whose open-time burst describes `devices`.
    ///
    /// # Arguments
    /// * `devices` - `(addr, name, display)` for each device, in the order the
    ///   server announces them
    /// * `current` - Address of the device the server reports as current
    pub fn with_devices(devices: &[(u32, &str, &str)], current: Option<u32>) -> Self {
        let mut transport = Self::new();
        for &(addr, name, display) in devices {
            let value = u32::from(current == Some(addr));
            transport
                .queued
                .push(ControlEvent::device(addr, name, display, value));
        }
        transport.queued.push(ControlEvent::BatchEnd);
        transport
    }

    /// Queue one event and make the descriptor readable.
    pub fn push(&mut self, event: ControlEvent) {
        self.push_batch(vec![event]);
    }

    /// Queue several events delivered by a single wake-up.
    pub fn push_batch(&mut self, events: Vec<ControlEvent>) {
        self.pending.extend(events);
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(&[1]).expect("signal scripted transport");
        }
    }

    /// Simulate the server going away.
    pub fn hang_up(&mut self) {
        self.writer = None;
    }

    /// Make every later [`ControlTransport::set_current`] call fail.
    pub fn fail_commits(&mut self) {
        self.fail_commits = true;
    }

    /// Addresses passed to `set_current`, oldest first.
    pub fn commits(&self) -> &[DeviceAddr] {
        &self.commits
    }

    /// Number of `dispatch` calls so far.
    pub fn dispatches(&self) -> usize {
        self.dispatches
    }

    /// Whether pushed events are still waiting for a dispatch.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn drain_signal(&mut self) -> Result<()> {
        let mut buf = [0u8; 64];
        loop {
            match self.reader.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlTransport for ScriptedTransport {
    fn poll_slots(&mut self) -> Result<Vec<PollSlot>> {
        Ok(vec![PollSlot::readable(self.reader.as_raw_fd())])
    }

    fn dispatch(&mut self, _ready: &[PollSlot]) -> Result<Vec<ControlEvent>> {
        self.dispatches += 1;
        self.drain_signal()?;
        Ok(self.pending.drain(..).collect())
    }

    fn take_queued(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.queued)
    }

    fn set_current(&mut self, addr: DeviceAddr) -> Result<()> {
        if self.fail_commits {
            return Err(Error::commit(addr.raw()));
        }
        self.commits.push(addr);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_devices_queues_burst_and_batch_end() {
        let mut transport =
            ScriptedTransport::with_devices(&[(1, "0", "snd/0"), (2, "1", "snd/1")], Some(2));
        let burst = transport.take_queued();
        assert_eq!(
            burst,
            vec![
                ControlEvent::device(1, "0", "snd/0", 0),
                ControlEvent::device(2, "1", "snd/1", 1),
                ControlEvent::BatchEnd,
            ]
        );
        assert!(transport.take_queued().is_empty());
    }

    #[test]
    fn test_dispatch_drains_everything_pushed() {
        let mut transport = ScriptedTransport::new();
        transport.push(ControlEvent::value(1, 1));
        transport.push_batch(vec![ControlEvent::device_removed(1), ControlEvent::BatchEnd]);

        let slots = transport.poll_slots().unwrap();
        let events = transport.dispatch(&slots).unwrap();
        assert_eq!(events.len(), 3);
        assert!(!transport.has_pending());
        assert_eq!(transport.dispatches(), 1);
    }

    #[test]
    fn test_commits_are_recorded() {
        let mut transport = ScriptedTransport::new();
        transport.set_current(DeviceAddr(3)).unwrap();
        assert_eq!(transport.commits(), &[DeviceAddr(3)]);
    }

    #[test]
    fn test_commit_failure_injection() {
        let mut transport = ScriptedTransport::new();
        transport.fail_commits();
        let err = transport.set_current(DeviceAddr(3)).unwrap_err();
        assert!(matches!(err, Error::Commit { addr: 3 }));
        assert!(transport.commits().is_empty());
    }
}
