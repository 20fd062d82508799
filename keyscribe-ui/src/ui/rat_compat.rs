//! Converts our InputEvent back into crossterm events at the point where
//! rat-widget consumes them.

use crossterm::event::{
    Event as CtEvent, KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyEventKind,
    KeyEventState, KeyModifiers,
};
use rat_event::Outcome;

use super::input::{InputEvent, KeyCode};

pub fn to_crossterm_key_event(event: &InputEvent) -> CtEvent {
    let code = match event.key {
        KeyCode::Char(c) => CtKeyCode::Char(c),
        KeyCode::Enter => CtKeyCode::Enter,
        KeyCode::Escape => CtKeyCode::Esc,
        KeyCode::Backspace => CtKeyCode::Backspace,
        KeyCode::Tab => CtKeyCode::Tab,
        KeyCode::Up => CtKeyCode::Up,
        KeyCode::Down => CtKeyCode::Down,
        KeyCode::Left => CtKeyCode::Left,
        KeyCode::Right => CtKeyCode::Right,
        KeyCode::Home => CtKeyCode::Home,
        KeyCode::End => CtKeyCode::End,
        KeyCode::PageUp => CtKeyCode::PageUp,
        KeyCode::PageDown => CtKeyCode::PageDown,
        KeyCode::Delete => CtKeyCode::Delete,
        KeyCode::F(n) => CtKeyCode::F(n),
    };

    let mut modifiers = KeyModifiers::empty();
    if event.modifiers.ctrl {
        modifiers |= KeyModifiers::CONTROL;
    }
    if event.modifiers.alt {
        modifiers |= KeyModifiers::ALT;
    }
    if event.modifiers.shift {
        modifiers |= KeyModifiers::SHIFT;
    }

    CtEvent::Key(CtKeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    })
}

/// Whether rat-widget consumed the event.
pub fn outcome_consumed(outcome: Outcome) -> bool {
    matches!(outcome, Outcome::Changed | Outcome::Unchanged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::Modifiers;

    #[test]
    fn ctrl_char_maps_modifiers() {
        let ev = InputEvent::new(KeyCode::Char('a'), Modifiers::ctrl());
        match to_crossterm_key_event(&ev) {
            CtEvent::Key(k) => {
                assert_eq!(k.code, CtKeyCode::Char('a'));
                assert!(k.modifiers.contains(KeyModifiers::CONTROL));
                assert_eq!(k.kind, KeyEventKind::Press);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
