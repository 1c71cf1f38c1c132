//! Event ingestion
//!
//! Bridges transport notifications into registry mutations and tells the
//! event loop, once per wake-up, whether anything it renders has changed.

use sndsw_core::prelude::*;
use sndsw_core::{ControlEvent, DeviceAddr};
use sndsw_ctl::{ControlTransport, PollSlot};

use crate::registry::{Registry, RegistryChange};

/// Summary of one ingestion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Events that changed or restated registry state
    pub applied: usize,
    /// Events that did not concern the registry
    pub ignored: usize,
    /// Whether any device was added, replaced or removed
    pub devices_changed: bool,
    /// Whether the current device differs from before the pass
    pub current_changed: bool,
    /// Batch terminators seen
    pub batches: usize,
}

impl IngestReport {
    /// Whether the menu must be rebuilt
    pub fn changed(&self) -> bool {
        self.devices_changed || self.current_changed
    }

    pub fn total(&self) -> usize {
        self.applied + self.ignored + self.batches
    }
}

/// Applies transport notifications to a [`Registry`]
#[derive(Debug, Default)]
pub struct EventIngestor;

impl EventIngestor {
    pub fn new() -> Self {
        Self
    }

    /// Apply `events` in order
    pub fn apply(
        &self,
        registry: &mut Registry,
        events: impl IntoIterator<Item = ControlEvent>,
    ) -> IngestReport {
        let current_before = current_addr(registry);
        let mut report = IngestReport::default();

        for event in events {
            let change = match event {
                ControlEvent::Descriptor { desc, value } => {
                    registry.apply_descriptor_event(&desc, value)
                }
                ControlEvent::Value { addr, value } => registry.apply_value_event(addr, value != 0),
                ControlEvent::BatchEnd => {
                    report.batches += 1;
                    continue;
                }
            };

            match change {
                RegistryChange::Ignored | RegistryChange::NotFound => report.ignored += 1,
                other => {
                    report.applied += 1;
                    report.devices_changed |= other.devices_changed()
                        && !matches!(other, RegistryChange::CurrentChanged(_));
                }
            }
        }

        report.current_changed = current_addr(registry) != current_before;
        if report.changed() {
            debug!(
                "Ingested {} events ({} ignored), {} devices",
                report.applied,
                report.ignored,
                registry.len()
            );
        }
        report
    }

    /// Apply the notifications a transport queued while opening.
    pub fn prime<T: ControlTransport + ?Sized>(
        &self,
        transport: &mut T,
        registry: &mut Registry,
    ) -> IngestReport {
        let report = self.apply(registry, transport.take_queued());
        info!("Found {} devices", registry.len());
        report
    }

    /// Dispatch readiness on `ready` and apply everything that is now pending.
    ///
    /// Returns only after the transport's queue is empty, so the caller sees
    /// the whole effect of one wake-up at once.
    pub fn apply_pending<T: ControlTransport + ?Sized>(
        &self,
        transport: &mut T,
        ready: &[PollSlot],
        registry: &mut Registry,
    ) -> Result<IngestReport> {
        let mut events = transport.dispatch(ready)?;
        events.extend(transport.take_queued());
        Ok(self.apply(registry, events))
    }
}

fn current_addr(registry: &Registry) -> Option<DeviceAddr> {
    registry.current().map(|d| d.addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sndsw_core::{ControlDesc, ControlKind};
    use sndsw_ctl::test_utils::ScriptedTransport;

    #[test]
    fn test_prime_applies_initial_burst() {
        let mut transport =
            ScriptedTransport::with_devices(&[(1, "0", "snd/0"), (2, "1", "snd/1")], Some(2));
        let mut registry = Registry::default();

        let report = EventIngestor::new().prime(&mut transport, &mut registry);
        assert_eq!(report.applied, 2);
        assert_eq!(report.batches, 1);
        assert!(report.devices_changed);
        assert!(report.current_changed);
        assert_eq!(registry.current().unwrap().addr, DeviceAddr(2));
    }

    #[test]
    fn test_value_only_change_is_not_a_device_change() {
        let mut registry = Registry::default();
        let ingestor = EventIngestor::new();
        ingestor.apply(
            &mut registry,
            vec![
                ControlEvent::device(1, "0", "snd/0", 1),
                ControlEvent::device(2, "1", "snd/1", 0),
            ],
        );

        let report = ingestor.apply(&mut registry, vec![ControlEvent::value(2, 1)]);
        assert!(!report.devices_changed);
        assert!(report.current_changed);
        assert!(report.changed());
    }

    #[test]
    fn test_foreign_events_are_counted_as_ignored() {
        let mut registry = Registry::default();
        let mut level = ControlDesc::device_selector(9, "0", "");
        level.func = "level".to_string();
        level.kind = ControlKind::Number;

        let report = EventIngestor::new().apply(
            &mut registry,
            vec![
                ControlEvent::Descriptor {
                    desc: level,
                    value: 64,
                },
                ControlEvent::value(9, 100),
                ControlEvent::device_removed(3),
            ],
        );
        assert_eq!(report.applied, 0);
        assert_eq!(report.ignored, 3);
        assert!(!report.changed());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_current_flapping_within_one_pass_is_not_a_change() {
        let mut registry = Registry::default();
        let ingestor = EventIngestor::new();
        ingestor.apply(
            &mut registry,
            vec![
                ControlEvent::device(1, "0", "snd/0", 1),
                ControlEvent::device(2, "1", "snd/1", 0),
            ],
        );

        let report = ingestor.apply(
            &mut registry,
            vec![ControlEvent::value(2, 1), ControlEvent::value(1, 1)],
        );
        assert_eq!(report.applied, 2);
        assert!(!report.current_changed);
    }

    #[test]
    fn test_update_without_create_is_recorded_as_create() {
        let mut registry = Registry::default();
        let report = EventIngestor::new().apply(
            &mut registry,
            vec![ControlEvent::device(4, "late", "late/0", 0)],
        );
        assert!(report.devices_changed);
        assert_eq!(registry.get(DeviceAddr(4)).unwrap().name, "late");
    }

    #[test]
    fn test_apply_pending_drains_transport() {
        let mut transport = ScriptedTransport::new();
        let mut registry = Registry::default();
        transport.push_batch(vec![
            ControlEvent::device(1, "0", "snd/0", 0),
            ControlEvent::device(2, "1", "snd/1", 1),
            ControlEvent::BatchEnd,
        ]);
        transport.push(ControlEvent::device_removed(1));

        let slots = transport.poll_slots().unwrap();
        let report = EventIngestor::new()
            .apply_pending(&mut transport, &slots, &mut registry)
            .unwrap();

        assert!(!transport.has_pending());
        assert_eq!(report.total(), 4);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.current().unwrap().addr, DeviceAddr(2));
    }
}
