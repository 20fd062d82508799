use std::any::Any;

use crate::state::AppState;
use crate::ui::action_id::{ActionId, SynthActionId};
use crate::ui::layout_helpers::center_rect;
use crate::ui::style::selected_style;
use crate::ui::{Action, Color, InputEvent, Keymap, NavAction, Pane, Rect, RenderBuf, Style, SynthAction};

const DETUNE_STEP: f32 = 0.5;
const GAIN_STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Enabled(usize),
    Waveform(usize),
    Harmony(usize),
    Detune(usize),
    MasterGain,
}

const ROWS: [Row; 9] = [
    Row::Enabled(0),
    Row::Waveform(0),
    Row::Harmony(0),
    Row::Detune(0),
    Row::Enabled(1),
    Row::Waveform(1),
    Row::Harmony(1),
    Row::Detune(1),
    Row::MasterGain,
];

/// Oscillator slot editor.
pub struct SynthPane {
    keymap: Keymap,
    cursor: usize,
}

impl SynthPane {
    pub fn new(keymap: Keymap) -> Self {
        Self { keymap, cursor: 0 }
    }

    fn row(&self) -> Row {
        ROWS[self.cursor.min(ROWS.len() - 1)]
    }

    /// Action for stepping the selected row; `up` is Right/Increase.
    fn adjust(&self, up: bool) -> Action {
        let sign = if up { 1.0 } else { -1.0 };
        let synth = match self.row() {
            Row::Enabled(slot) => SynthAction::ToggleSlot(slot),
            Row::Waveform(slot) => SynthAction::CycleWaveform(slot),
            Row::Harmony(slot) => SynthAction::CycleHarmony(slot),
            Row::Detune(slot) => SynthAction::AdjustDetune(slot, sign * DETUNE_STEP),
            Row::MasterGain => SynthAction::AdjustMasterGain(sign * GAIN_STEP),
        };
        Action::Synth(synth)
    }
}

fn row_text(row: Row, state: &AppState) -> (String, String) {
    let synth = &state.synth;
    match row {
        Row::Enabled(slot) => (
            format!("Osc {}", slot + 1),
            if synth.slots[slot].enabled { "on" } else { "off" }.to_string(),
        ),
        Row::Waveform(slot) => ("  Waveform".to_string(), synth.slots[slot].waveform.name().to_string()),
        Row::Harmony(slot) => ("  Harmony".to_string(), synth.slots[slot].harmony.name().to_string()),
        Row::Detune(slot) => ("  Detune".to_string(), format!("{:.1} Hz", synth.slots[slot].detune_hz)),
        Row::MasterGain => ("Master gain".to_string(), format!("{:.2}", synth.master_gain)),
    }
}

impl Pane for SynthPane {
    fn id(&self) -> &'static str {
        "synth"
    }

    fn handle_action(&mut self, action: ActionId, _event: &InputEvent, _state: &AppState) -> Action {
        match action {
            ActionId::Synth(SynthActionId::Prev) => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            ActionId::Synth(SynthActionId::Next) => {
                self.cursor = (self.cursor + 1).min(ROWS.len() - 1);
                Action::None
            }
            ActionId::Synth(SynthActionId::Decrease) => self.adjust(false),
            ActionId::Synth(SynthActionId::Increase) | ActionId::Synth(SynthActionId::Activate) => {
                self.adjust(true)
            }
            ActionId::Synth(SynthActionId::Back) => Action::Nav(NavAction::SwitchPane("score")),
            _ => Action::None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        let rect = center_rect(area, 50, ROWS.len() as u16 + 6);
        let border_style = Style::new().fg(Color::ORANGE);
        let inner = buf.draw_block(rect, " Synth ", border_style, border_style);
        let max_x = inner.x + inner.width;

        for (i, row) in ROWS.iter().enumerate() {
            let y = inner.y + 1 + i as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let selected = i == self.cursor;
            let (label, value) = row_text(*row, state);
            let label_style = selected_style(selected, Color::WHITE);
            let value_style = selected_style(selected, Color::CYAN);
            buf.draw_str(inner.x + 1, y, max_x, &format!("{:<16}", label), label_style);
            buf.draw_str(inner.x + 17, y, max_x, &format!("{:<12}", value), value_style);
        }

        let help_y = inner.y + inner.height.saturating_sub(1);
        buf.draw_str(
            inner.x + 1,
            help_y,
            max_x,
            "[Up/Down] Select  [Left/Right] Change  [Esc] Back",
            Style::new().fg(Color::DARK_GRAY),
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

    fn act(pane: &mut SynthPane, id: SynthActionId) -> Action {
        let state = AppState::default();
        pane.handle_action(ActionId::Synth(id), &InputEvent::key(KeyCode::Enter), &state)
    }

    #[test]
    fn cursor_is_clamped() {
        let mut pane = SynthPane::new(Keymap::new());
        act(&mut pane, SynthActionId::Prev);
        assert_eq!(pane.cursor, 0);
        for _ in 0..20 {
            act(&mut pane, SynthActionId::Next);
        }
        assert_eq!(pane.row(), Row::MasterGain);
    }

    #[test]
    fn rows_map_to_synth_actions() {
        let mut pane = SynthPane::new(Keymap::new());
        assert_eq!(act(&mut pane, SynthActionId::Activate), Action::Synth(SynthAction::ToggleSlot(0)));
        act(&mut pane, SynthActionId::Next);
        assert_eq!(act(&mut pane, SynthActionId::Increase), Action::Synth(SynthAction::CycleWaveform(0)));
        for _ in 0..6 {
            act(&mut pane, SynthActionId::Next);
        }
        assert_eq!(
            act(&mut pane, SynthActionId::Decrease),
            Action::Synth(SynthAction::AdjustDetune(1, -DETUNE_STEP))
        );
    }

    #[test]
    fn row_text_shows_defaults() {
        let state = AppState::default();
        assert_eq!(row_text(Row::Waveform(1), &state).1, "triangle");
        assert_eq!(row_text(Row::Detune(0), &state).1, "2.0 Hz");
        assert_eq!(row_text(Row::MasterGain, &state).1, "0.10");
    }
}
