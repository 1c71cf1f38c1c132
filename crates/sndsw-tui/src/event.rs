//! Terminal input
//!
//! [`CrosstermKeys`] feeds the event loop from stdin. crossterm decodes and
//! buffers input internally, so besides the descriptor the loop also asks
//! whether decoded events are already waiting.

use std::io::Stdin;
use std::os::fd::{AsFd, BorrowedFd};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use sndsw_app::{InputEvent, InputKey, KeySource};
use sndsw_core::prelude::*;

/// Convert crossterm KeyEvent to InputKey
pub fn key_event_to_input(key: crossterm::event::KeyEvent) -> Option<InputKey> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputKey::CharCtrl(c))
        }
        KeyCode::Char(c) => Some(InputKey::Char(c)),
        KeyCode::Enter => Some(InputKey::Enter),
        KeyCode::Esc => Some(InputKey::Esc),
        KeyCode::Up => Some(InputKey::Up),
        KeyCode::Down => Some(InputKey::Down),
        KeyCode::Home => Some(InputKey::Home),
        KeyCode::End => Some(InputKey::End),
        KeyCode::PageUp => Some(InputKey::PageUp),
        KeyCode::PageDown => Some(InputKey::PageDown),
        _ => None, // Unsupported keys ignored
    }
}

/// Convert a crossterm event to an [`InputEvent`], dropping what the menu
/// has no use for (releases, mouse, focus, paste)
pub fn to_input_event(event: Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            key_event_to_input(key).map(InputEvent::Key)
        }
        Event::Resize(..) => Some(InputEvent::Resize),
        _ => None,
    }
}

/// Keyboard input from the controlling terminal
pub struct CrosstermKeys {
    stdin: Stdin,
}

impl CrosstermKeys {
    pub fn new() -> Self {
        Self {
            stdin: std::io::stdin(),
        }
    }
}

impl Default for CrosstermKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for CrosstermKeys {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.stdin.as_fd()
    }

    fn has_buffered(&self) -> Result<bool> {
        Ok(event::poll(Duration::ZERO)?)
    }

    fn read_event(&mut self) -> Result<Option<InputEvent>> {
        while event::poll(Duration::ZERO)? {
            let raw = event::read().context("reading terminal event")?;
            if let Some(input) = to_input_event(raw) {
                return Ok(Some(input));
            }
        }
        Ok(None)
    }

    fn discard_pending(&mut self) -> Result<()> {
        let mut dropped = 0;
        while event::poll(Duration::ZERO)? {
            event::read().context("discarding terminal event")?;
            dropped += 1;
        }
        trace!("Discarded {} pending terminal events", dropped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;

    #[test]
    fn test_char_conversion() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(key_event_to_input(key), Some(InputKey::Char('q')));
    }

    #[test]
    fn test_char_with_ctrl_conversion() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_event_to_input(key), Some(InputKey::CharCtrl('c')));
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(
            key_event_to_input(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)),
            Some(InputKey::Up)
        );
        assert_eq!(
            key_event_to_input(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
            Some(InputKey::Down)
        );
        assert_eq!(
            key_event_to_input(KeyEvent::new(KeyCode::End, KeyModifiers::NONE)),
            Some(InputKey::End)
        );
    }

    #[test]
    fn test_unsupported_keys_are_ignored() {
        assert_eq!(
            key_event_to_input(KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            key_event_to_input(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_key_release_is_dropped() {
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(to_input_event(Event::Key(key)), None);
    }

    #[test]
    fn test_press_and_resize_events() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            to_input_event(Event::Key(key)),
            Some(InputEvent::Key(InputKey::Enter))
        );
        assert_eq!(to_input_event(Event::Resize(80, 24)), Some(InputEvent::Resize));
        assert_eq!(to_input_event(Event::FocusGained), None);
    }
}
