use std::any::Any;

use crate::state::AppState;
use crate::ui::action_id::{ActionId, MidiActionId};
use crate::ui::{Action, Color, InputEvent, Keymap, MidiAction, NavAction, Pane, Rect, RenderBuf, Style};

/// MIDI input port picker.
pub struct MidiPane {
    keymap: Keymap,
    port_cursor: usize,
}

impl MidiPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            port_cursor: 0,
        }
    }
}

impl Pane for MidiPane {
    fn id(&self) -> &'static str {
        "midi"
    }

    fn handle_action(&mut self, action: ActionId, _event: &InputEvent, state: &AppState) -> Action {
        match action {
            ActionId::Midi(MidiActionId::Up) => {
                self.port_cursor = self.port_cursor.saturating_sub(1);
                Action::None
            }
            ActionId::Midi(MidiActionId::Down) => {
                let max = state.midi.port_names.len().saturating_sub(1);
                self.port_cursor = (self.port_cursor + 1).min(max);
                Action::None
            }
            ActionId::Midi(MidiActionId::Connect) => {
                if state.midi.port_names.is_empty() {
                    Action::None
                } else {
                    Action::Midi(MidiAction::ConnectPort(self.port_cursor))
                }
            }
            ActionId::Midi(MidiActionId::Disconnect) => Action::Midi(MidiAction::DisconnectPort),
            ActionId::Midi(MidiActionId::Refresh) => Action::Midi(MidiAction::RefreshPorts),
            ActionId::Midi(MidiActionId::Back) => Action::Nav(NavAction::SwitchPane("score")),
            _ => Action::None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        let border_style = Style::new().fg(Color::CYAN);
        let inner = buf.draw_block(area, " MIDI Input ", border_style, border_style);

        if inner.height < 3 || inner.width < 20 {
            return;
        }

        let normal = Style::new().fg(Color::GRAY);
        let dim = Style::new().fg(Color::DARK_GRAY);
        let highlight = Style::new().fg(Color::WHITE).bg(Color::SELECTION_BG).bold();

        let mut y = inner.y;
        let x = inner.x + 1;
        let w = inner.width.saturating_sub(2);

        let conn_text = if let Some(ref name) = state.midi.connected_port {
            format!("  [Connected: {}]", name)
        } else {
            "  [Not connected]".to_string()
        };
        buf.draw_line(
            Rect::new(x, y, w, 1),
            &[(" Ports ", Style::new().fg(Color::CYAN).bold()), (&conn_text, dim)],
        );
        y += 1;

        if state.midi.port_names.is_empty() {
            buf.draw_line(Rect::new(x, y, w, 1), &[("  (no MIDI ports found, the computer keyboard still plays)", dim)]);
        } else {
            let cursor = self.port_cursor.min(state.midi.port_names.len() - 1);
            for (i, name) in state.midi.port_names.iter().enumerate() {
                if y >= inner.y + inner.height.saturating_sub(1) {
                    break;
                }
                let is_connected = state.midi.connected_port.as_deref() == Some(name);
                let prefix = if is_connected { " * " } else { "   " };
                let text = format!("{}{}", prefix, name);
                let style = if i == cursor { highlight } else { normal };
                buf.draw_line(Rect::new(x, y, w, 1), &[(&text, style)]);
                y += 1;
            }
        }

        let help_y = inner.y + inner.height - 1;
        buf.draw_line(
            Rect::new(x, help_y, w, 1),
            &[("[Enter] Connect  [d] Disconnect  [r] Refresh  [Esc] Back", dim)],
        );
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::KeyCode;

    fn state_with_ports(n: usize) -> AppState {
        let mut state = AppState::default();
        state.midi.port_names = (0..n).map(|i| format!("Port {}", i)).collect();
        state
    }

    #[test]
    fn connect_selected_port() {
        let mut pane = MidiPane::new(Keymap::new());
        let state = state_with_ports(3);
        let ev = InputEvent::key(KeyCode::Down);
        pane.handle_action(ActionId::Midi(MidiActionId::Down), &ev, &state);
        pane.handle_action(ActionId::Midi(MidiActionId::Down), &ev, &state);
        pane.handle_action(ActionId::Midi(MidiActionId::Down), &ev, &state);
        assert_eq!(
            pane.handle_action(ActionId::Midi(MidiActionId::Connect), &ev, &state),
            Action::Midi(MidiAction::ConnectPort(2))
        );
    }

    #[test]
    fn connect_without_ports_does_nothing() {
        let mut pane = MidiPane::new(Keymap::new());
        let state = state_with_ports(0);
        let ev = InputEvent::key(KeyCode::Enter);
        assert_eq!(
            pane.handle_action(ActionId::Midi(MidiActionId::Connect), &ev, &state),
            Action::None
        );
    }
}
