//! Translation from crossterm input to session key input.
//!
//! Bindings themselves live in the session; this layer only normalises raw
//! terminal events so the session never sees crossterm types.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use sup_core::session::KeyInput;

/// Maps a key press to the session's key vocabulary.
///
/// Ctrl-C becomes [`KeyInput::Interrupt`]; any other chord with Ctrl or Alt
/// is unbound.
pub fn key_input(key: KeyEvent) -> KeyInput {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => KeyInput::Interrupt,
            _ => KeyInput::Other,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return KeyInput::Other;
    }
    match key.code {
        KeyCode::Char(c) => KeyInput::Char(c),
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Esc => KeyInput::Esc,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Home => KeyInput::Home,
        KeyCode::End => KeyInput::End,
        _ => KeyInput::Other,
    }
}

/// Maps the scroll wheel to cursor movement. Other mouse events are dropped.
pub fn mouse_input(mouse: MouseEvent) -> Option<KeyInput> {
    match mouse.kind {
        MouseEventKind::ScrollUp => Some(KeyInput::Up),
        MouseEventKind::ScrollDown => Some(KeyInput::Down),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyInput {
        key_input(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn plain_keys_map_directly() {
        assert_eq!(press(KeyCode::Char('j'), KeyModifiers::NONE), KeyInput::Char('j'));
        assert_eq!(press(KeyCode::Char('G'), KeyModifiers::SHIFT), KeyInput::Char('G'));
        assert_eq!(press(KeyCode::Enter, KeyModifiers::NONE), KeyInput::Enter);
        assert_eq!(press(KeyCode::Esc, KeyModifiers::NONE), KeyInput::Esc);
        assert_eq!(press(KeyCode::Home, KeyModifiers::NONE), KeyInput::Home);
        assert_eq!(press(KeyCode::Tab, KeyModifiers::NONE), KeyInput::Other);
    }

    #[test]
    fn ctrl_c_interrupts() {
        assert_eq!(press(KeyCode::Char('c'), KeyModifiers::CONTROL), KeyInput::Interrupt);
        assert_eq!(press(KeyCode::Char('j'), KeyModifiers::CONTROL), KeyInput::Other);
    }

    #[test]
    fn wheel_scrolls() {
        let wheel = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(mouse_input(wheel(MouseEventKind::ScrollUp)), Some(KeyInput::Up));
        assert_eq!(mouse_input(wheel(MouseEventKind::ScrollDown)), Some(KeyInput::Down));
        assert_eq!(mouse_input(wheel(MouseEventKind::Moved)), None);
    }
}
