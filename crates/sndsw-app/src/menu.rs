//! Selection menu controller
//!
//! Projects a registry snapshot into a navigable list and owns the cursor.
//! Every rebuild installs a fresh [`MenuSnapshot`]; the previous one is
//! dropped in the same step, so the menu never refers to a replaced device.

use sndsw_core::{Device, DeviceAddr};

/// One row of the menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub device: Device,
    pub selectable: bool,
}

/// Immutable list of menu rows in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuSnapshot {
    entries: Vec<MenuEntry>,
}

impl MenuSnapshot {
    pub fn from_devices(devices: Vec<Device>) -> Self {
        Self {
            entries: devices
                .into_iter()
                .map(|device| MenuEntry {
                    device,
                    selectable: true,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, addr: DeviceAddr) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.selectable && e.device.addr == addr)
    }

    fn current_position(&self) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.selectable && e.device.is_current)
    }

    fn first_selectable(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.selectable)
    }

    fn last_selectable(&self) -> Option<usize> {
        self.entries.iter().rposition(|e| e.selectable)
    }
}

/// Cursor movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    First,
    Last,
}

/// Where the cursor landed after a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// The previously highlighted device is still there
    Restored,
    /// Fell back to the current default device
    Current,
    /// Fell back to the first entry
    First,
    /// Nothing to select
    Empty,
}

/// What the renderer needs to draw the menu
#[derive(Debug, Clone, Copy)]
pub struct MenuView<'a> {
    pub entries: &'a [MenuEntry],
    pub cursor: Option<usize>,
    /// Device the server reports as current, for the status bar
    pub current: Option<&'a Device>,
}

impl MenuView<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn highlighted(&self) -> Option<&Device> {
        self.cursor
            .and_then(|i| self.entries.get(i))
            .map(|e| &e.device)
    }
}

/// Owns the menu snapshot and the cursor
#[derive(Debug, Default)]
pub struct MenuController {
    snapshot: MenuSnapshot,
    cursor: Option<usize>,
}

impl MenuController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the menu with `devices`, keeping `previous` highlighted when
    /// it is still present.
    ///
    /// Falls back to the current device, then to the first entry.
    pub fn rebuild(&mut self, devices: Vec<Device>, previous: Option<DeviceAddr>) -> RebuildOutcome {
        self.snapshot = MenuSnapshot::from_devices(devices);

        let (cursor, outcome) = if let Some(i) = previous.and_then(|a| self.snapshot.position(a)) {
            (Some(i), RebuildOutcome::Restored)
        } else if let Some(i) = self.snapshot.current_position() {
            (Some(i), RebuildOutcome::Current)
        } else if let Some(i) = self.snapshot.first_selectable() {
            (Some(i), RebuildOutcome::First)
        } else {
            (None, RebuildOutcome::Empty)
        };

        self.cursor = cursor;
        debug_assert!(self
            .cursor
            .map_or(true, |i| self.snapshot.entries.get(i).is_some_and(|e| e.selectable)));
        outcome
    }

    /// Move the cursor one step (or to an end), clamped without wrapping
    pub fn move_cursor(&mut self, direction: Direction) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        let entries = self.snapshot.entries();

        let target = match direction {
            Direction::Up => entries[..cursor].iter().rposition(|e| e.selectable),
            Direction::Down => entries[cursor + 1..]
                .iter()
                .position(|e| e.selectable)
                .map(|i| cursor + 1 + i),
            Direction::First => self.snapshot.first_selectable(),
            Direction::Last => self.snapshot.last_selectable(),
        };

        match target {
            Some(t) if t != cursor => {
                self.cursor = Some(t);
                true
            }
            _ => false,
        }
    }

    /// Address of the highlighted device
    pub fn commit(&self) -> Option<DeviceAddr> {
        self.selected().map(|d| d.addr)
    }

    pub fn selected(&self) -> Option<&Device> {
        self.cursor
            .and_then(|i| self.snapshot.entries.get(i))
            .map(|e| &e.device)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn snapshot(&self) -> &MenuSnapshot {
        &self.snapshot
    }

    pub fn view(&self) -> MenuView<'_> {
        MenuView {
            entries: self.snapshot.entries(),
            cursor: self.cursor,
            current: self
                .snapshot
                .entries
                .iter()
                .map(|e| &e.device)
                .find(|d| d.is_current),
        }
    }

    /// Drop the snapshot and the cursor
    pub fn clear(&mut self) {
        self.snapshot = MenuSnapshot::default();
        self.cursor = None;
    }
}
