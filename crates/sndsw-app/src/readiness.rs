//! Readiness multiplexer
//!
//! One `poll(2)` over the keyboard and every control descriptor. This is the
//! only place the event loop blocks.

use std::os::fd::{BorrowedFd, RawFd};
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use sndsw_core::prelude::*;
use sndsw_ctl::PollSlot;

/// Which sources became ready during one wait
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Readiness {
    pub keyboard: bool,
    pub control: bool,
    pub timed_out: bool,
}

impl Readiness {
    pub fn is_idle(&self) -> bool {
        !self.keyboard && !self.control
    }
}

/// Wait until the keyboard or a control slot is ready, or `timeout` elapses.
///
/// `revents` of every slot is overwritten with what the kernel reported, so
/// the slots can be handed straight to the transport's dispatch.
///
/// `keyboard_buffered` is asked before every `poll`, including the retry after
/// `EINTR`. When it reports input the key source already holds, the wait
/// degrades to a non-blocking check of the control slots. Terminal resizes
/// arrive this way: the signal interrupts `poll` and the key source has a
/// resize event queued by the time it is asked again.
///
/// # Errors
/// - [`Error::ConnectionLost`] if a control slot reports hang-up, error or an
///   invalid descriptor
/// - [`Error::Wait`] if `poll` fails for any reason other than `EINTR`, or
///   the keyboard descriptor is no longer usable
pub fn wait<F>(
    keyboard: BorrowedFd<'_>,
    slots: &mut [PollSlot],
    timeout: Option<Duration>,
    mut keyboard_buffered: F,
) -> Result<Readiness>
where
    F: FnMut() -> Result<bool>,
{
    let (buffered, keyboard_flags, revents) = loop {
        let buffered = keyboard_buffered()?;
        let timeout = if buffered {
            PollTimeout::ZERO
        } else {
            poll_timeout(timeout)
        };

        let mut fds = Vec::with_capacity(slots.len() + 1);
        fds.push(PollFd::new(keyboard, PollFlags::POLLIN));
        for slot in slots.iter() {
            fds.push(PollFd::new(
                borrow_slot(slot.fd),
                PollFlags::from_bits_truncate(slot.events),
            ));
        }

        match poll(&mut fds, timeout) {
            Ok(_) => {
                let keyboard_flags = fds[0].revents().unwrap_or(PollFlags::empty());
                let revents: Vec<i16> = fds[1..]
                    .iter()
                    .map(|fd| fd.revents().map(|f| f.bits()).unwrap_or(0))
                    .collect();
                break (buffered, keyboard_flags, revents);
            }
            Err(Errno::EINTR) => {
                trace!("poll interrupted, retrying");
                continue;
            }
            Err(e) => return Err(Error::wait(format!("poll: {}", e))),
        }
    };

    for (slot, revents) in slots.iter_mut().zip(revents) {
        slot.revents = revents;
    }

    if let Some(slot) = slots.iter().find(|s| s.is_hangup()) {
        error!("Control descriptor {} hung up (revents {:#x})", slot.fd, slot.revents);
        return Err(Error::ConnectionLost);
    }

    if keyboard_flags.intersects(PollFlags::POLLERR | PollFlags::POLLNVAL) {
        return Err(Error::wait("terminal input is no longer readable"));
    }

    let readiness = Readiness {
        keyboard: buffered
            || keyboard_flags.intersects(PollFlags::POLLIN | PollFlags::POLLHUP),
        control: slots.iter().any(|s| s.is_ready()),
        timed_out: false,
    };
    Ok(Readiness {
        timed_out: readiness.is_idle(),
        ..readiness
    })
}

fn poll_timeout(timeout: Option<Duration>) -> PollTimeout {
    match timeout {
        None => PollTimeout::NONE,
        Some(duration) => PollTimeout::try_from(duration).unwrap_or(PollTimeout::MAX),
    }
}

fn borrow_slot<'a>(fd: RawFd) -> BorrowedFd<'a> {
    // SAFETY: slots come from the transport, which keeps its descriptors open
    // for as long as it lives, and the transport outlives every wait.
    unsafe { BorrowedFd::borrow_raw(fd) }
}
