//! Device registry
//!
//! The canonical set of known output devices, keyed by control address and
//! kept in a deterministic order. Only the ingestion adapter mutates it.

use std::collections::HashMap;

use sndsw_core::prelude::*;
use sndsw_core::{ControlDesc, ControlKind, Device, DeviceAddr};

use crate::config::OrderPolicy;

/// Effect a single event had on the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryChange {
    /// The event does not concern the device selector, or was not applicable
    Ignored,
    /// A device with a new address was added
    Inserted(DeviceAddr),
    /// A known address was re-announced and its device replaced
    Replaced(DeviceAddr),
    /// A device was deleted
    Removed(DeviceAddr),
    /// Deletion of an address that is not known
    NotFound,
    /// Another device became the current default
    CurrentChanged(DeviceAddr),
    /// The event restated what the registry already knew
    Unchanged,
}

impl RegistryChange {
    /// Whether the set of devices (or any of their fields) changed
    pub fn devices_changed(&self) -> bool {
        matches!(
            self,
            RegistryChange::Inserted(_)
                | RegistryChange::Replaced(_)
                | RegistryChange::Removed(_)
                | RegistryChange::CurrentChanged(_)
        )
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, RegistryChange::Ignored)
    }
}

/// Ordered map of devices keyed by address
#[derive(Debug, Default)]
pub struct Registry {
    /// Devices indexed by address
    devices: HashMap<DeviceAddr, Device>,

    /// Iteration order of addresses
    order: Vec<DeviceAddr>,

    policy: OrderPolicy,
}

impl Registry {
    pub fn new(policy: OrderPolicy) -> Self {
        Self {
            devices: HashMap::new(),
            order: Vec::new(),
            policy,
        }
    }

    pub fn order_policy(&self) -> OrderPolicy {
        self.policy
    }

    /// Apply a descriptor notification together with the control's value.
    ///
    /// Only `server.device` selectors are accepted. A deletion removes the
    /// device if present; anything else replaces the device at that address
    /// in one step. A non-zero value marks the announced device as current.
    pub fn apply_descriptor_event(&mut self, desc: &ControlDesc, value: u32) -> RegistryChange {
        if !desc.is_device_selector() {
            trace!("Ignoring control {} ({}.{})", desc.addr, desc.node0.name, desc.func);
            return RegistryChange::Ignored;
        }

        match desc.kind {
            ControlKind::None => self.remove(desc.addr),
            ControlKind::Selector => {
                let mut device = Device::new(desc.addr, &desc.node1.name, &desc.display);
                device.is_current = value != 0;
                self.replace(device)
            }
            other => {
                warn!(
                    "Ignoring server.device control {} of unexpected type {:?}",
                    desc.addr, other
                );
                RegistryChange::Ignored
            }
        }
    }

    /// Apply a value notification.
    ///
    /// An active value for a known address makes that device the only current
    /// one. Everything else is ignored: values of other controls share the
    /// same address space, and an unknown address may simply not have been
    /// described yet.
    pub fn apply_value_event(&mut self, addr: DeviceAddr, is_active: bool) -> RegistryChange {
        if !is_active {
            return RegistryChange::Ignored;
        }
        if !self.devices.contains_key(&addr) {
            trace!("Value for unknown control {}", addr);
            return RegistryChange::Ignored;
        }
        if self.current().map(|d| d.addr) == Some(addr) {
            return RegistryChange::Unchanged;
        }

        self.set_current(addr);
        debug!("Device {} is now current", addr);
        RegistryChange::CurrentChanged(addr)
    }

    /// Owned copy of every device in registry order
    pub fn snapshot(&self) -> Vec<Device> {
        self.iter().cloned().collect()
    }

    /// Devices in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.order.iter().filter_map(|addr| self.devices.get(addr))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, addr: DeviceAddr) -> Option<&Device> {
        self.devices.get(&addr)
    }

    /// The device the server reports as the active default
    pub fn current(&self) -> Option<&Device> {
        self.iter().find(|d| d.is_current)
    }

    /// Drop every device
    pub fn clear(&mut self) {
        self.devices.clear();
        self.order.clear();
    }

    fn remove(&mut self, addr: DeviceAddr) -> RegistryChange {
        if self.devices.remove(&addr).is_none() {
            trace!("Delete for unknown device {}", addr);
            return RegistryChange::NotFound;
        }
        self.order.retain(|a| *a != addr);
        debug!("Removed device {}", addr);
        self.check_invariants();
        RegistryChange::Removed(addr)
    }

    fn replace(&mut self, device: Device) -> RegistryChange {
        let addr = device.addr;
        let previous = self.devices.get(&addr);

        if previous == Some(&device)
            && (self.policy == OrderPolicy::Insertion || self.order.first() == Some(&addr))
        {
            return RegistryChange::Unchanged;
        }

        let existed = previous.is_some();
        if device.is_current {
            self.clear_current();
        }
        debug!("{} device {}", if existed { "Replacing" } else { "Adding" }, device);
        self.devices.insert(addr, device);

        match (self.policy, existed) {
            (OrderPolicy::MostRecentFirst, _) => {
                self.order.retain(|a| *a != addr);
                self.order.insert(0, addr);
            }
            (OrderPolicy::Insertion, false) => self.order.push(addr),
            (OrderPolicy::Insertion, true) => {}
        }

        self.check_invariants();
        if existed {
            RegistryChange::Replaced(addr)
        } else {
            RegistryChange::Inserted(addr)
        }
    }

    fn set_current(&mut self, addr: DeviceAddr) {
        for device in self.devices.values_mut() {
            device.is_current = device.addr == addr;
        }
        self.check_invariants();
    }

    fn clear_current(&mut self) {
        for device in self.devices.values_mut() {
            device.is_current = false;
        }
    }

    fn check_invariants(&self) {
        debug_assert_eq!(
            self.order.len(),
            self.devices.len(),
            "registry order and index disagree"
        );
        debug_assert!(
            self.order.iter().all(|a| self.devices.contains_key(a)),
            "registry order references a missing device"
        );
        debug_assert!(
            self.devices.values().filter(|d| d.is_current).count() <= 1,
            "more than one current device"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sndsw_core::ControlNode;

    fn announce(registry: &mut Registry, addr: u32, name: &str, value: u32) -> RegistryChange {
        let desc = ControlDesc::device_selector(addr, name, &format!("snd/{}", name));
        registry.apply_descriptor_event(&desc, value)
    }

    fn delete(registry: &mut Registry, addr: u32) -> RegistryChange {
        registry.apply_descriptor_event(&ControlDesc::device_removed(addr), 0)
    }

    fn addrs(registry: &Registry) -> Vec<u32> {
        registry.iter().map(|d| d.addr.raw()).collect()
    }

    fn current_count(registry: &Registry) -> usize {
        registry.iter().filter(|d| d.is_current).count()
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = Registry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.current().is_none());
        assert_eq!(registry.order_policy(), OrderPolicy::MostRecentFirst);
    }

    #[test]
    fn test_most_recent_first_puts_new_devices_in_front() {
        let mut registry = Registry::new(OrderPolicy::MostRecentFirst);
        announce(&mut registry, 1, "0", 0);
        announce(&mut registry, 2, "1", 0);
        announce(&mut registry, 3, "2", 0);
        assert_eq!(addrs(&registry), vec![3, 2, 1]);

        // re-announcement moves to the front
        announce(&mut registry, 1, "0", 0);
        assert_eq!(addrs(&registry), vec![1, 3, 2]);
    }

    #[test]
    fn test_insertion_order_keeps_slots() {
        let mut registry = Registry::new(OrderPolicy::Insertion);
        announce(&mut registry, 1, "0", 0);
        announce(&mut registry, 2, "1", 0);
        announce(&mut registry, 1, "renamed", 0);
        assert_eq!(addrs(&registry), vec![1, 2]);
        assert_eq!(registry.get(DeviceAddr(1)).unwrap().name, "renamed");
    }

    #[test]
    fn test_foreign_controls_are_ignored() {
        let mut registry = Registry::default();
        let mut desc = ControlDesc::device_selector(9, "0", "snd/0");
        desc.func = "level".to_string();
        desc.kind = ControlKind::Number;
        assert_eq!(registry.apply_descriptor_event(&desc, 127), RegistryChange::Ignored);

        let mut desc = ControlDesc::device_selector(9, "0", "snd/0");
        desc.node0 = ControlNode::new("app");
        assert_eq!(registry.apply_descriptor_event(&desc, 1), RegistryChange::Ignored);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unexpected_kind_for_selector_is_ignored() {
        let mut registry = Registry::default();
        let mut desc = ControlDesc::device_selector(4, "0", "snd/0");
        desc.kind = ControlKind::Switch;
        assert_eq!(registry.apply_descriptor_event(&desc, 1), RegistryChange::Ignored);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_replace_is_atomic() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 0);
        let desc = ControlDesc::device_selector(1, "0", "usb speakers");
        assert_eq!(
            registry.apply_descriptor_event(&desc, 0),
            RegistryChange::Replaced(DeviceAddr(1))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(DeviceAddr(1)).unwrap().label, "usb speakers");
    }

    #[test]
    fn test_restating_a_device_is_unchanged() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 1);
        assert_eq!(announce(&mut registry, 1, "0", 1), RegistryChange::Unchanged);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 0);
        announce(&mut registry, 2, "1", 0);

        assert_eq!(delete(&mut registry, 1), RegistryChange::Removed(DeviceAddr(1)));
        let after_first = registry.snapshot();
        assert_eq!(delete(&mut registry, 1), RegistryChange::NotFound);
        assert_eq!(registry.snapshot(), after_first);
        assert_eq!(delete(&mut registry, 77), RegistryChange::NotFound);
    }

    #[test]
    fn test_descriptor_value_marks_current() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 1);
        announce(&mut registry, 2, "1", 1);
        assert_eq!(registry.current().unwrap().addr, DeviceAddr(2));
        assert_eq!(current_count(&registry), 1);
    }

    #[test]
    fn test_replace_with_zero_value_clears_current() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 1);
        announce(&mut registry, 1, "0", 0);
        assert!(registry.current().is_none());
    }

    #[test]
    fn test_value_event_moves_current() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 1);
        announce(&mut registry, 2, "1", 0);

        assert_eq!(
            registry.apply_value_event(DeviceAddr(2), true),
            RegistryChange::CurrentChanged(DeviceAddr(2))
        );
        assert_eq!(registry.current().unwrap().addr, DeviceAddr(2));
        assert!(!registry.get(DeviceAddr(1)).unwrap().is_current);
        assert_eq!(
            registry.apply_value_event(DeviceAddr(2), true),
            RegistryChange::Unchanged
        );
    }

    #[test]
    fn test_value_event_for_unknown_or_inactive_is_ignored() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 1);
        assert_eq!(
            registry.apply_value_event(DeviceAddr(5), true),
            RegistryChange::Ignored
        );
        assert_eq!(
            registry.apply_value_event(DeviceAddr(1), false),
            RegistryChange::Ignored
        );
        assert_eq!(registry.current().unwrap().addr, DeviceAddr(1));
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let mut registry = Registry::default();
        let desc = ControlDesc::device_selector(1, "0", &"y".repeat(80));
        registry.apply_descriptor_event(&desc, 0);
        assert_eq!(
            registry.get(DeviceAddr(1)).unwrap().label.chars().count(),
            sndsw_core::LABEL_MAX
        );
    }

    #[test]
    fn test_clear() {
        let mut registry = Registry::default();
        announce(&mut registry, 1, "0", 1);
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.current().is_none());
    }

    /// Drives the registry through a deterministic pseudo-random mix of
    /// creates, deletes and value changes, checking the invariants after every
    /// step.
    #[test]
    fn test_invariants_hold_over_event_sequences() {
        for policy in [OrderPolicy::MostRecentFirst, OrderPolicy::Insertion] {
            let mut registry = Registry::new(policy);
            let mut seed: u32 = 0x2545_f491;
            for _ in 0..2000 {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                let addr = seed % 8;
                match (seed >> 8) % 4 {
                    0 | 1 => {
                        announce(&mut registry, addr, "d", (seed >> 12) % 2);
                    }
                    2 => {
                        delete(&mut registry, addr);
                    }
                    _ => {
                        registry.apply_value_event(DeviceAddr(addr), (seed >> 12) % 2 == 1);
                    }
                }

                let mut seen = addrs(&registry);
                let len = seen.len();
                seen.sort_unstable();
                seen.dedup();
                assert_eq!(seen.len(), len, "duplicate address");
                assert_eq!(registry.len(), len);
                assert!(current_count(&registry) <= 1, "more than one current");
            }
        }
    }
}
