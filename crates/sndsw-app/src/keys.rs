//! Key bindings for the device menu

use crate::input_key::InputKey;
use crate::menu::Direction;

/// What a key press asks the event loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Confirm,
    Quit,
}

/// Map a key to an action, `None` for unbound keys
pub fn handle_key(key: InputKey) -> Option<Action> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Action::Move(Direction::Up)),
        InputKey::Down | InputKey::Char('j') => Some(Action::Move(Direction::Down)),
        InputKey::Home | InputKey::PageUp | InputKey::Char('g') => {
            Some(Action::Move(Direction::First))
        }
        InputKey::End | InputKey::PageDown | InputKey::Char('G') => {
            Some(Action::Move(Direction::Last))
        }
        InputKey::Enter => Some(Action::Confirm),
        InputKey::Char('q' | 'Q') | InputKey::Esc | InputKey::CharCtrl('c') => Some(Action::Quit),
        _ => None,
    }
}
