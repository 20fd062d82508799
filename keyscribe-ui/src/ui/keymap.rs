use super::action_id::ActionId;
use super::input::{InputEvent, KeyCode};

/// A key (plus modifiers) a binding responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPattern {
    Char(char),
    Key(KeyCode),
    Ctrl(char),
    Alt(char),
    CtrlKey(KeyCode),
    ShiftKey(KeyCode),
}

impl KeyPattern {
    pub fn matches(&self, event: &InputEvent) -> bool {
        let m = event.modifiers;
        match *self {
            KeyPattern::Char(c) => event.key == KeyCode::Char(c) && !m.ctrl && !m.alt,
            KeyPattern::Key(k) => event.key == k && !m.ctrl && !m.alt && !m.shift,
            KeyPattern::Ctrl(c) => event.key == KeyCode::Char(c) && m.ctrl && !m.alt,
            KeyPattern::Alt(c) => event.key == KeyCode::Char(c) && m.alt && !m.ctrl,
            KeyPattern::CtrlKey(k) => event.key == k && m.ctrl,
            KeyPattern::ShiftKey(k) => event.key == k && m.shift && !m.ctrl,
        }
    }

    /// Human-readable form for the help pane.
    pub fn display(&self) -> String {
        match *self {
            KeyPattern::Char(' ') => "Space".to_string(),
            KeyPattern::Char(c) => c.to_string(),
            KeyPattern::Key(k) => key_name(k),
            KeyPattern::Ctrl(c) => format!("Ctrl+{}", c),
            KeyPattern::Alt(c) => format!("Alt+{}", c),
            KeyPattern::CtrlKey(k) => format!("Ctrl+{}", key_name(k)),
            KeyPattern::ShiftKey(k) => format!("Shift+{}", key_name(k)),
        }
    }
}

fn key_name(key: KeyCode) -> String {
    match key {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Escape => "Esc".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{}", n),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeyBinding {
    pub pattern: KeyPattern,
    pub action: ActionId,
    pub description: &'static str,
}

/// Ordered bindings; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bindings(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    /// Add a plain-character binding.
    #[allow(dead_code)]
    pub fn bind(mut self, key: char, action: ActionId, description: &'static str) -> Self {
        self.bindings.push(KeyBinding {
            pattern: KeyPattern::Char(key),
            action,
            description,
        });
        self
    }

    pub fn lookup(&self, event: &InputEvent) -> Option<ActionId> {
        self.bindings
            .iter()
            .find(|b| b.pattern.matches(event))
            .map(|b| b.action)
    }

    pub fn bindings(&self) -> &[KeyBinding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::action_id::{GlobalActionId, ScoreActionId};
    use crate::ui::input::Modifiers;

    #[test]
    fn ctrl_binding_needs_ctrl() {
        let km = Keymap::from_bindings(vec![KeyBinding {
            pattern: KeyPattern::Ctrl('q'),
            action: ActionId::Global(GlobalActionId::Quit),
            description: "Quit",
        }]);
        assert_eq!(km.lookup(&InputEvent::key(KeyCode::Char('q'))), None);
        assert_eq!(
            km.lookup(&InputEvent::new(KeyCode::Char('q'), Modifiers::ctrl())),
            Some(ActionId::Global(GlobalActionId::Quit))
        );
    }

    #[test]
    fn char_binding_ignores_shift_only() {
        let km = Keymap::new().bind(' ', ActionId::Score(ScoreActionId::FlushChord), "Flush");
        let shifted = InputEvent::new(
            KeyCode::Char(' '),
            Modifiers {
                shift: true,
                ..Modifiers::none()
            },
        );
        assert!(km.lookup(&shifted).is_some());
    }

    #[test]
    fn display_names() {
        assert_eq!(KeyPattern::Char(' ').display(), "Space");
        assert_eq!(KeyPattern::Key(KeyCode::F(5)).display(), "F5");
        assert_eq!(KeyPattern::Ctrl('l').display(), "Ctrl+l");
    }
}
