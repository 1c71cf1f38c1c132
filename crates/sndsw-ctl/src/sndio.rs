//! sndio control transport
//!
//! `libsndio` is loaded at runtime so sndsw builds and its tests run on
//! machines without sndio installed; a missing library surfaces as a normal
//! open failure instead of a link error.
//!
//! The library reports controls through C callbacks. Both callbacks receive
//! a pointer to a queue owned by the [`SndioTransport`]; they only push
//! [`ControlEvent`]s onto it, and the transport hands the queue contents to
//! the caller after each `sioctl_revents` call.

use std::ffi::{c_char, c_int, c_uint, c_void, CString};
use std::ptr::NonNull;

use libloading::Library;
use sndsw_core::prelude::*;
use sndsw_core::{ControlDesc, ControlEvent, ControlKind, ControlNode, DeviceAddr};

use crate::transport::{ControlTransport, PollSlot};

/// Control device used when none is configured (`SIO_DEVANY`)
pub const DEFAULT_DEVICE: &str = "default";

/// Shared object loaded when none is configured
pub const DEFAULT_LIBRARY: &str = "libsndio.so.7";

const SIOCTL_NAMEMAX: usize = 12;
const SIOCTL_DISPLAYMAX: usize = 32;
const SIOCTL_WRITE: c_uint = 0x200;

#[repr(C)]
struct RawNode {
    name: [c_char; SIOCTL_NAMEMAX],
    unit: c_int,
}

#[repr(C)]
struct RawDesc {
    addr: c_uint,
    kind: c_uint,
    func: [c_char; SIOCTL_NAMEMAX],
    group: [c_char; SIOCTL_NAMEMAX],
    node0: RawNode,
    node1: RawNode,
    maxval: c_uint,
    display: [c_char; SIOCTL_DISPLAYMAX],
}

/// Opaque `struct sioctl_hdl`
#[repr(C)]
struct RawHandle {
    _private: [u8; 0],
}

type DescCallback = unsafe extern "C" fn(*mut c_void, *mut RawDesc, c_int);
type ValCallback = unsafe extern "C" fn(*mut c_void, c_uint, c_uint);

type OpenFn = unsafe extern "C" fn(*const c_char, c_uint, c_int) -> *mut RawHandle;
type CloseFn = unsafe extern "C" fn(*mut RawHandle);
type OnDescFn = unsafe extern "C" fn(*mut RawHandle, Option<DescCallback>, *mut c_void) -> c_int;
type OnValFn = unsafe extern "C" fn(*mut RawHandle, Option<ValCallback>, *mut c_void) -> c_int;
type SetValFn = unsafe extern "C" fn(*mut RawHandle, c_uint, c_uint) -> c_int;
type NfdsFn = unsafe extern "C" fn(*mut RawHandle) -> c_int;
type PollFdFn = unsafe extern "C" fn(*mut RawHandle, *mut libc::pollfd, c_int) -> c_int;
type ReventsFn = unsafe extern "C" fn(*mut RawHandle, *mut libc::pollfd) -> c_int;
type EofFn = unsafe extern "C" fn(*mut RawHandle) -> c_int;

/// Entry points resolved from `libsndio`
struct SndioApi {
    open: OpenFn,
    close: CloseFn,
    ondesc: OnDescFn,
    onval: OnValFn,
    setval: SetValFn,
    nfds: NfdsFn,
    pollfd: PollFdFn,
    revents: ReventsFn,
    eof: EofFn,
    // Keeps the function pointers above valid
    _library: Library,
}

impl SndioApi {
    fn load(library: &str, target: &str) -> Result<Self> {
        // SAFETY: loading libsndio runs no initialisation code with
        // preconditions beyond those of the dynamic loader.
        let lib = unsafe { Library::new(library) }
            .map_err(|e| Error::transport_open(target, format!("{library}: {e}")))?;

        // SAFETY: every type alias above matches the prototype in <sndio.h>.
        unsafe {
            Ok(Self {
                open: symbol(&lib, b"sioctl_open\0", target)?,
                close: symbol(&lib, b"sioctl_close\0", target)?,
                ondesc: symbol(&lib, b"sioctl_ondesc\0", target)?,
                onval: symbol(&lib, b"sioctl_onval\0", target)?,
                setval: symbol(&lib, b"sioctl_setval\0", target)?,
                nfds: symbol(&lib, b"sioctl_nfds\0", target)?,
                pollfd: symbol(&lib, b"sioctl_pollfd\0", target)?,
                revents: symbol(&lib, b"sioctl_revents\0", target)?,
                eof: symbol(&lib, b"sioctl_eof\0", target)?,
                _library: lib,
            })
        }
    }
}

unsafe fn symbol<T: Copy>(lib: &Library, name: &[u8], target: &str) -> Result<T> {
    lib.get::<T>(name).map(|sym| *sym).map_err(|e| {
        let name = String::from_utf8_lossy(&name[..name.len().saturating_sub(1)]).into_owned();
        Error::transport_open(target, format!("missing symbol {name}: {e}"))
    })
}

/// Control handle on a sndio server
pub struct SndioTransport {
    api: SndioApi,
    handle: NonNull<RawHandle>,
    queue: NonNull<Vec<ControlEvent>>,
    target: String,
}

impl SndioTransport {
    /// Load `library`, open the control device `target` for writing and
    /// register the descriptor and value listeners.
    ///
    /// Registering the descriptor listener makes the server describe every
    /// existing control; those notifications are available from
    /// [`ControlTransport::take_queued`] right after this returns.
    pub fn open(library: &str, target: &str) -> Result<Self> {
        let api = SndioApi::load(library, target)?;
        let device = CString::new(target)
            .map_err(|_| Error::transport_open(target, "device name contains a NUL byte"))?;

        // SAFETY: `device` is a valid C string for the duration of the call.
        let raw = unsafe { (api.open)(device.as_ptr(), SIOCTL_WRITE, 0) };
        let handle =
            NonNull::new(raw).ok_or_else(|| Error::transport_open(target, "sioctl_open() failed"))?;

        let queue = NonNull::from(Box::leak(Box::new(Vec::new())));
        let mut transport = Self {
            api,
            handle,
            queue,
            target: target.to_string(),
        };
        transport.register_listeners()?;

        info!(device = %transport.target, library, "opened sndio control device");
        Ok(transport)
    }

    fn register_listeners(&mut self) -> Result<()> {
        let arg = self.queue.as_ptr().cast::<c_void>();

        // SAFETY: the queue outlives the handle (see Drop), and both
        // callbacks only touch the queue.
        let ok = unsafe { (self.api.ondesc)(self.handle.as_ptr(), Some(on_desc), arg) };
        if ok == 0 {
            return Err(Error::transport_open(&self.target, "sioctl_ondesc() failed"));
        }

        let ok = unsafe { (self.api.onval)(self.handle.as_ptr(), Some(on_val), arg) };
        if ok == 0 {
            return Err(Error::transport_open(&self.target, "sioctl_onval() failed"));
        }
        Ok(())
    }

    fn drain_queue(&mut self) -> Vec<ControlEvent> {
        // SAFETY: no libsndio call is in progress, so the callbacks cannot
        // alias this borrow.
        std::mem::take(unsafe { self.queue.as_mut() })
    }
}

impl ControlTransport for SndioTransport {
    fn poll_slots(&mut self) -> Result<Vec<PollSlot>> {
        // SAFETY: the handle is open for the lifetime of `self`.
        let nfds = unsafe { (self.api.nfds)(self.handle.as_ptr()) };
        let mut pfds = vec![
            libc::pollfd {
                fd: -1,
                events: 0,
                revents: 0,
            };
            nfds.max(0) as usize
        ];

        // SAFETY: `pfds` has room for the `sioctl_nfds()` entries the
        // library may fill in.
        let filled = unsafe {
            (self.api.pollfd)(
                self.handle.as_ptr(),
                pfds.as_mut_ptr(),
                c_int::from(libc::POLLIN),
            )
        };
        pfds.truncate(filled.max(0) as usize);

        Ok(pfds
            .into_iter()
            .map(|pfd| PollSlot {
                fd: pfd.fd,
                events: pfd.events,
                revents: 0,
            })
            .collect())
    }

    fn dispatch(&mut self, ready: &[PollSlot]) -> Result<Vec<ControlEvent>> {
        let mut pfds: Vec<libc::pollfd> = ready
            .iter()
            .map(|slot| libc::pollfd {
                fd: slot.fd,
                events: slot.events,
                revents: slot.revents,
            })
            .collect();

        // SAFETY: `pfds` mirrors the array `sioctl_pollfd()` filled in; the
        // callbacks fired from here only push onto the queue.
        let revents = unsafe { (self.api.revents)(self.handle.as_ptr(), pfds.as_mut_ptr()) };
        if revents & c_int::from(libc::POLLHUP) != 0 {
            error!(device = %self.target, "control channel hung up");
            return Err(Error::ConnectionLost);
        }
        if unsafe { (self.api.eof)(self.handle.as_ptr()) } != 0 {
            error!(device = %self.target, "control channel reached end of stream");
            return Err(Error::ConnectionLost);
        }

        let events = self.drain_queue();
        trace!(count = events.len(), "dispatched sndio notifications");
        Ok(events)
    }

    fn take_queued(&mut self) -> Vec<ControlEvent> {
        self.drain_queue()
    }

    fn set_current(&mut self, addr: DeviceAddr) -> Result<()> {
        // SAFETY: the handle is open for the lifetime of `self`.
        let ok = unsafe { (self.api.setval)(self.handle.as_ptr(), addr.raw(), 1) };
        if ok == 0 {
            return Err(Error::commit(addr.raw()));
        }
        debug!(%addr, "sioctl_setval() accepted");
        Ok(())
    }
}

impl Drop for SndioTransport {
    fn drop(&mut self) {
        // SAFETY: closing first guarantees no callback can run once the
        // queue is freed.
        unsafe {
            (self.api.close)(self.handle.as_ptr());
            drop(Box::from_raw(self.queue.as_ptr()));
        }
        debug!(device = %self.target, "closed sndio control device");
    }
}

unsafe extern "C" fn on_desc(arg: *mut c_void, desc: *mut RawDesc, value: c_int) {
    let queue = &mut *arg.cast::<Vec<ControlEvent>>();
    match desc.as_ref() {
        None => queue.push(ControlEvent::BatchEnd),
        Some(raw) => queue.push(ControlEvent::Descriptor {
            desc: raw.to_desc(),
            value: value.max(0) as u32,
        }),
    }
}

unsafe extern "C" fn on_val(arg: *mut c_void, addr: c_uint, value: c_uint) {
    let queue = &mut *arg.cast::<Vec<ControlEvent>>();
    queue.push(ControlEvent::Value {
        addr: DeviceAddr(addr),
        value,
    });
}

impl RawDesc {
    fn to_desc(&self) -> ControlDesc {
        ControlDesc {
            addr: DeviceAddr(self.addr),
            kind: ControlKind::from_raw(self.kind),
            func: fixed_str(&self.func),
            group: fixed_str(&self.group),
            node0: self.node0.to_node(),
            node1: self.node1.to_node(),
            maxval: self.maxval,
            display: fixed_str(&self.display),
        }
    }
}

impl RawNode {
    fn to_node(&self) -> ControlNode {
        ControlNode {
            name: fixed_str(&self.name),
            unit: self.unit,
        }
    }
}

/// Read a NUL-padded fixed-size C buffer; an unterminated buffer is taken
/// whole and invalid UTF-8 is replaced.
fn fixed_str(buf: &[c_char]) -> String {
    let bytes: Vec<u8> = buf
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed<const N: usize>(s: &str) -> [c_char; N] {
        let mut buf = [0 as c_char; N];
        for (dst, src) in buf.iter_mut().zip(s.bytes()) {
            *dst = src as c_char;
        }
        buf
    }

    fn raw_device(addr: u32, name: &str, display: &str) -> RawDesc {
        RawDesc {
            addr,
            kind: 6,
            func: fixed("device"),
            group: fixed(""),
            node0: RawNode {
                name: fixed("server"),
                unit: -1,
            },
            node1: RawNode {
                name: fixed(name),
                unit: -1,
            },
            maxval: 1,
            display: fixed(display),
        }
    }

    #[test]
    fn test_fixed_str_stops_at_nul() {
        let buf: [c_char; 12] = fixed("server");
        assert_eq!(fixed_str(&buf), "server");
    }

    #[test]
    fn test_fixed_str_unterminated_buffer() {
        let buf: [c_char; 4] = fixed("abcdef");
        assert_eq!(fixed_str(&buf), "abcd");
    }

    #[test]
    fn test_raw_desc_conversion() {
        let desc = raw_device(9, "1", "rsnd/1").to_desc();
        assert_eq!(desc.addr, DeviceAddr(9));
        assert_eq!(desc.kind, ControlKind::Selector);
        assert!(desc.is_device_selector());
        assert_eq!(desc.node1.name, "1");
        assert_eq!(desc.display, "rsnd/1");
    }

    #[test]
    fn test_desc_callback_queues_descriptor_and_batch_end() {
        let mut queue: Vec<ControlEvent> = Vec::new();
        let arg = (&mut queue as *mut Vec<ControlEvent>).cast::<c_void>();
        let mut raw = raw_device(4, "0", "snd/0");

        unsafe {
            on_desc(arg, &mut raw, 1);
            on_desc(arg, std::ptr::null_mut(), 0);
        }

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue[0],
            ControlEvent::Descriptor {
                desc: ControlDesc::device_selector(4, "0", "snd/0"),
                value: 1,
            }
        );
        assert_eq!(queue[1], ControlEvent::BatchEnd);
    }

    #[test]
    fn test_val_callback_queues_value() {
        let mut queue: Vec<ControlEvent> = Vec::new();
        let arg = (&mut queue as *mut Vec<ControlEvent>).cast::<c_void>();

        unsafe { on_val(arg, 12, 1) };

        assert_eq!(queue, vec![ControlEvent::value(12, 1)]);
    }

    #[test]
    fn test_open_with_missing_library_fails_cleanly() {
        let err = SndioTransport::open("libsndio-does-not-exist.so", DEFAULT_DEVICE)
            .err()
            .expect("open must fail");
        assert!(matches!(err, Error::TransportOpen { .. }));
        assert!(err.to_string().contains("libsndio-does-not-exist.so"));
    }
}
