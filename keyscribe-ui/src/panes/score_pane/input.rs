use keyscribe_types::Staff;

use super::{Field, ScorePane};
use crate::state::AppState;
use crate::ui::action_id::{ActionId, ScoreActionId, TextEditActionId};
use crate::ui::{Action, InputEvent, MouseButton, MouseEvent, MouseEventKind};

impl ScorePane {
    pub(super) fn handle_action_impl(
        &mut self,
        action: ActionId,
        _event: &InputEvent,
        state: &AppState,
    ) -> Action {
        match action {
            ActionId::Score(ScoreActionId::LeftStaff) => Action::SelectStaff(Staff::Left),
            ActionId::Score(ScoreActionId::RightStaff) => Action::SelectStaff(Staff::Right),
            ActionId::Score(ScoreActionId::FlushChord) => Action::FlushChord,
            ActionId::Score(ScoreActionId::ClearStaves) => Action::ClearStaves,
            ActionId::Score(ScoreActionId::Edit) => {
                self.focus(Some(Field::for_staff(state.session.staff())));
                Action::PushLayer("text_edit")
            }
            ActionId::Score(ScoreActionId::OctaveDown) => {
                self.piano.octave_down();
                Action::None
            }
            ActionId::Score(ScoreActionId::OctaveUp) => {
                self.piano.octave_up();
                Action::None
            }
            ActionId::TextEdit(TextEditActionId::Done) => match self.editing {
                Some(field) => {
                    let edit = self.edit_action(field);
                    self.focus(None);
                    edit
                }
                None => Action::None,
            },
            ActionId::TextEdit(TextEditActionId::NextField) => match self.editing {
                Some(field) => {
                    let edit = self.edit_action(field);
                    self.focus(Some(field.next()));
                    edit
                }
                None => Action::None,
            },
            ActionId::TextEdit(TextEditActionId::Quit) => Action::Quit,
            _ => Action::None,
        }
    }

    /// Text fields take typing while focused; otherwise letters play notes.
    pub(super) fn handle_raw_input_impl(&mut self, event: &InputEvent) -> Action {
        if let Some(field) = self.editing {
            if self.input_mut(field).handle_input(event) {
                return self.edit_action(field);
            }
            return Action::None;
        }

        let Some(c) = event.plain_char() else {
            return Action::None;
        };
        let Some(pitch) = self.piano.key_to_pitch(c) else {
            return Action::None;
        };
        self.piano
            .key_pressed(c, pitch, event.timestamp, event.is_repeat)
            .map(Action::NoteOn)
            .unwrap_or(Action::None)
    }

    pub(super) fn handle_mouse_impl(&mut self, event: &MouseEvent) -> Action {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(note) = self.keyboard.note_at(event.column, event.row) {
                    // One mouse key at a time; the held one must come up first
                    if self.mouse_note.is_some() {
                        return Action::None;
                    }
                    self.mouse_note = Some(note);
                    return Action::NoteOn(note);
                }
                self.staff_rows
                    .iter()
                    .find(|(_, row)| *row == event.row)
                    .map(|(staff, _)| Action::SelectStaff(*staff))
                    .unwrap_or(Action::None)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.mouse_note.take().map(Action::NoteOff).unwrap_or(Action::None)
            }
            _ => Action::None,
        }
    }
}
