//! Interaction loop
//!
//! [`Engine`] owns the registry and the menu and drives them from two
//! sources: the control transport and the keyboard. Each call to
//! [`Engine::step`] performs one state transition; [`Engine::run`] steps
//! until the loop is done.
//!
//! Control events always win. When the control channel is ready, everything
//! it has pending is applied and the menu rebuilt before any keystroke from
//! the same wake-up is looked at, and the loop goes back to waiting instead
//! of acting on a key typed against the old menu.

use std::os::fd::BorrowedFd;

use sndsw_core::prelude::*;
use sndsw_core::DeviceAddr;
use sndsw_ctl::{ControlTransport, PollSlot};

use crate::config::{BehaviorSettings, EmptyPolicy};
use crate::ingest::EventIngestor;
use crate::input_key::InputKey;
use crate::keys::{handle_key, Action};
use crate::menu::{MenuController, MenuView, RebuildOutcome};
use crate::readiness;
use crate::registry::Registry;

/// Input delivered by a [`KeySource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(InputKey),
    /// The terminal changed size
    Resize,
}

/// Keyboard side of the event loop
pub trait KeySource {
    /// Descriptor that turns readable when input arrives
    fn as_fd(&self) -> BorrowedFd<'_>;

    /// Whether input was already read from the descriptor but not yet
    /// returned by [`read_event`](Self::read_event)
    fn has_buffered(&self) -> Result<bool>;

    /// Next input event, `None` when nothing is pending. Never blocks.
    fn read_event(&mut self) -> Result<Option<InputEvent>>;

    /// Throw away everything typed so far
    fn discard_pending(&mut self) -> Result<()>;
}

/// Draws the menu
pub trait MenuRenderer {
    fn render(&mut self, view: &MenuView<'_>) -> Result<()>;
}

/// How a normal run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The device at this address was made the default
    Committed(DeviceAddr),
    /// The user left without selecting
    Quit,
}

/// State of the interaction loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    /// Blocked on the readiness multiplexer
    Waiting,
    /// Control descriptors are ready; `keyboard_ready` tells whether input
    /// arrived in the same wake-up
    Syncing {
        slots: Vec<PollSlot>,
        keyboard_ready: bool,
    },
    /// Processing one keystroke
    Navigating,
    /// Sending the selection to the server
    Committing(DeviceAddr),
    /// Releasing registry and menu
    Exiting(Outcome),
    Done(Outcome),
    Fatal,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Done(_) | LoopState::Fatal)
    }
}

/// The device menu event loop
pub struct Engine<T, K, R> {
    transport: T,
    keys: K,
    renderer: R,
    registry: Registry,
    menu: MenuController,
    ingestor: EventIngestor,
    behavior: BehaviorSettings,
    state: LoopState,
}

impl<T, K, R> Engine<T, K, R>
where
    T: ControlTransport,
    K: KeySource,
    R: MenuRenderer,
{
    /// Prime the registry from the transport's initial burst, build and draw
    /// the first menu, and enter [`LoopState::Waiting`].
    ///
    /// # Errors
    /// [`Error::NoDevices`] when the server reports no devices and
    /// `behavior.on_empty` is [`EmptyPolicy::Fatal`]; renderer errors.
    pub fn start(transport: T, keys: K, renderer: R, behavior: BehaviorSettings) -> Result<Self> {
        let mut engine = Self {
            transport,
            keys,
            renderer,
            registry: Registry::new(behavior.order),
            menu: MenuController::new(),
            ingestor: EventIngestor::new(),
            behavior,
            state: LoopState::Waiting,
        };

        engine.ingestor.prime(&mut engine.transport, &mut engine.registry);
        let outcome = engine.menu.rebuild(engine.registry.snapshot(), None);
        engine.check_empty(outcome)?;
        engine.render()?;

        info!(
            "Menu ready with {} devices (order: {}, on_empty: {})",
            engine.registry.len(),
            engine.behavior.order,
            engine.behavior.on_empty
        );
        Ok(engine)
    }

    /// Step until the loop finishes
    pub fn run(&mut self) -> Result<Outcome> {
        loop {
            match self.state {
                LoopState::Done(outcome) => return Ok(outcome),
                LoopState::Fatal => return Err(Error::LoopStopped),
                _ => self.step()?,
            }
        }
    }

    /// Perform exactly one state transition.
    ///
    /// Any error moves the loop to [`LoopState::Fatal`] and is returned.
    pub fn step(&mut self) -> Result<()> {
        let state = std::mem::replace(&mut self.state, LoopState::Fatal);
        trace!("step from {:?}", state);

        match self.transition(state) {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                error!("Event loop failed: {}", e);
                self.state = LoopState::Fatal;
                Err(e)
            }
        }
    }

    fn transition(&mut self, state: LoopState) -> Result<LoopState> {
        match state {
            LoopState::Waiting => self.wait(),
            LoopState::Syncing {
                slots,
                keyboard_ready,
            } => self.sync(&slots, keyboard_ready),
            LoopState::Navigating => self.navigate(),
            LoopState::Committing(addr) => self.commit(addr),
            LoopState::Exiting(outcome) => {
                self.registry.clear();
                self.menu.clear();
                debug!("Event loop done: {:?}", outcome);
                Ok(LoopState::Done(outcome))
            }
            LoopState::Done(outcome) => Ok(LoopState::Done(outcome)),
            LoopState::Fatal => Err(Error::LoopStopped),
        }
    }

    fn wait(&mut self) -> Result<LoopState> {
        let mut slots = self.transport.poll_slots()?;
        let keys = &self.keys;
        let ready = readiness::wait(
            keys.as_fd(),
            &mut slots,
            self.behavior.poll_interval(),
            || keys.has_buffered(),
        )?;

        if ready.control {
            return Ok(LoopState::Syncing {
                slots,
                keyboard_ready: ready.keyboard,
            });
        }
        if ready.keyboard {
            return Ok(LoopState::Navigating);
        }

        // timed out
        self.render()?;
        Ok(LoopState::Waiting)
    }

    fn sync(&mut self, slots: &[PollSlot], keyboard_ready: bool) -> Result<LoopState> {
        let report = self
            .ingestor
            .apply_pending(&mut self.transport, slots, &mut self.registry)?;
        if !report.changed() {
            return Ok(LoopState::Waiting);
        }

        let previous = self.menu.selected().cloned();
        let outcome = self
            .menu
            .rebuild(self.registry.snapshot(), previous.as_ref().map(|d| d.addr));
        self.check_empty(outcome)?;

        // An address can come back as a different device within one pass
        let same_entry = outcome == RebuildOutcome::Restored
            && self.menu.selected().map(|d| &d.name) == previous.as_ref().map(|d| &d.name);
        if keyboard_ready && !same_entry {
            debug!(
                "Highlighted entry changed ({:?}), dropping keys typed against the old menu",
                outcome
            );
            self.keys.discard_pending()?;
        }

        self.render()?;
        Ok(LoopState::Waiting)
    }

    fn navigate(&mut self) -> Result<LoopState> {
        let key = match self.keys.read_event()? {
            None => return Ok(LoopState::Waiting),
            Some(InputEvent::Resize) => {
                self.render()?;
                return Ok(LoopState::Waiting);
            }
            Some(InputEvent::Key(key)) => key,
        };

        match handle_key(key) {
            Some(Action::Move(direction)) => {
                if self.menu.move_cursor(direction) {
                    self.render()?;
                }
                Ok(LoopState::Waiting)
            }
            Some(Action::Confirm) => Ok(match self.menu.commit() {
                Some(addr) => LoopState::Committing(addr),
                None => LoopState::Waiting,
            }),
            Some(Action::Quit) => Ok(LoopState::Exiting(Outcome::Quit)),
            None => Ok(LoopState::Waiting),
        }
    }

    fn commit(&mut self, addr: DeviceAddr) -> Result<LoopState> {
        if let Some(device) = self.registry.get(addr) {
            info!("Selecting {}", device);
        }
        self.transport.set_current(addr)?;

        if self.behavior.exit_on_commit {
            Ok(LoopState::Exiting(Outcome::Committed(addr)))
        } else {
            Ok(LoopState::Waiting)
        }
    }

    fn check_empty(&self, outcome: RebuildOutcome) -> Result<()> {
        if outcome == RebuildOutcome::Empty {
            match self.behavior.on_empty {
                EmptyPolicy::Fatal => return Err(Error::NoDevices),
                EmptyPolicy::Wait => info!("No devices, waiting for the server to report some"),
            }
        }
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        self.renderer.render(&self.menu.view())
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn keys_mut(&mut self) -> &mut K {
        &mut self.keys
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
