//! Control descriptors and the notifications a control transport produces.
//!
//! The model mirrors what the sndio control protocol reports: every control
//! has an address, a type, a function name and up to two nodes. sndsw only
//! cares about the `server.device` selector, but transports hand over every
//! control and leave filtering to the registry.

use crate::device::DeviceAddr;

/// Node name owning the device selector control
pub const SERVER_NODE: &str = "server";

/// Function name of the device selector control
pub const DEVICE_FUNC: &str = "device";

/// Control type as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// The control was deleted
    None,
    /// Integer in `0..=maxval`
    Number,
    /// On/off switch
    Switch,
    /// Element of a matrix
    Vector,
    /// Element of a multi-choice list
    List,
    /// Element of a single-choice selector
    Selector,
    /// Type value this build does not know
    Unknown(u32),
}

impl ControlKind {
    /// Map the wire value (`SIOCTL_*`) to a kind
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => ControlKind::None,
            2 => ControlKind::Number,
            3 => ControlKind::Switch,
            4 => ControlKind::Vector,
            5 => ControlKind::List,
            6 => ControlKind::Selector,
            other => ControlKind::Unknown(other),
        }
    }
}

/// One node of a control (`name` plus optional unit number, `-1` for none)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlNode {
    pub name: String,
    pub unit: i32,
}

impl ControlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: -1,
        }
    }
}

/// Description of one server control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlDesc {
    pub addr: DeviceAddr,
    pub kind: ControlKind,
    pub func: String,
    pub group: String,
    pub node0: ControlNode,
    pub node1: ControlNode,
    pub maxval: u32,
    pub display: String,
}

impl ControlDesc {
    /// A `server.device` selector entry, as the server announces an output
    pub fn device_selector(addr: u32, name: &str, display: &str) -> Self {
        Self {
            addr: DeviceAddr(addr),
            kind: ControlKind::Selector,
            func: DEVICE_FUNC.to_string(),
            group: String::new(),
            node0: ControlNode::new(SERVER_NODE),
            node1: ControlNode::new(name),
            maxval: 1,
            display: display.to_string(),
        }
    }

    /// Deletion notice for a `server.device` selector
    pub fn device_removed(addr: u32) -> Self {
        Self {
            kind: ControlKind::None,
            ..Self::device_selector(addr, "", "")
        }
    }

    /// Whether this is the one control class sndsw manages
    pub fn is_device_selector(&self) -> bool {
        self.node0.name == SERVER_NODE && self.func == DEVICE_FUNC
    }

    pub fn is_deletion(&self) -> bool {
        self.kind == ControlKind::None
    }
}

/// Notification produced by a control transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    /// A control was created, changed or deleted; `value` is its current value
    Descriptor { desc: ControlDesc, value: u32 },

    /// The server finished sending a batch of descriptors
    BatchEnd,

    /// The value of an existing control changed
    Value { addr: DeviceAddr, value: u32 },
}

impl ControlEvent {
    /// Convenience constructor for a device selector announcement
    pub fn device(addr: u32, name: &str, display: &str, value: u32) -> Self {
        ControlEvent::Descriptor {
            desc: ControlDesc::device_selector(addr, name, display),
            value,
        }
    }

    /// Convenience constructor for a device selector deletion
    pub fn device_removed(addr: u32) -> Self {
        ControlEvent::Descriptor {
            desc: ControlDesc::device_removed(addr),
            value: 0,
        }
    }

    pub fn value(addr: u32, value: u32) -> Self {
        ControlEvent::Value {
            addr: DeviceAddr(addr),
            value,
        }
    }
}
