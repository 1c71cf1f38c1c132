//! Audio output devices as reported by the control server

use std::fmt;

/// Capacity of a control name buffer on the server, terminator included
pub const NAME_MAX: usize = 12;

/// Maximum number of characters kept from a device's display string
pub const LABEL_MAX: usize = 32;

/// Control address the server assigned to a device selector.
///
/// Stable for the device's lifetime, but the server may hand the same value
/// out again once the device is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceAddr(pub u32);

impl DeviceAddr {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for DeviceAddr {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// One selectable audio output endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Address of the `server.device` control for this endpoint
    pub addr: DeviceAddr,

    /// Short identifier, bounded to the server's name length
    pub name: String,

    /// Human-readable display string, bounded to [`LABEL_MAX`] characters
    pub label: String,

    /// Whether the server reports this device as the active default
    pub is_current: bool,
}

impl Device {
    /// Create a device, bounding `name` and `label` to their fixed widths.
    ///
    /// Over-long or malformed input is truncated rather than rejected.
    pub fn new(addr: DeviceAddr, name: &str, label: &str) -> Self {
        Self {
            addr,
            name: bound_name(name),
            label: bound_label(label),
            is_current: false,
        }
    }

    /// Builder-style helper marking the device as the active default
    pub fn current(mut self) -> Self {
        self.is_current = true;
        self
    }

    /// Text to show for this device; falls back to the name when the server
    /// sent an empty display string
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.name
        } else {
            &self.label
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_label(), self.addr)
    }
}

/// Bound a control name the way the server's fixed buffer does: at most
/// `NAME_MAX - 1` bytes, cut on a character boundary.
pub fn bound_name(raw: &str) -> String {
    let limit = NAME_MAX - 1;
    if raw.len() <= limit {
        return raw.to_string();
    }
    let mut end = limit;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    raw[..end].to_string()
}

/// Bound a display string to [`LABEL_MAX`] characters.
///
/// Control characters are replaced by spaces so a label can never emit
/// terminal escape sequences, and trailing padding is dropped.
pub fn bound_label(raw: &str) -> String {
    let label: String = raw
        .chars()
        .take(LABEL_MAX)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    label.trim_end().to_string()
}
