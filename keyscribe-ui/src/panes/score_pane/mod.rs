mod input;
mod rendering;

use std::any::Any;
use std::time::Instant;

use keyscribe_types::{KeyboardLayout, Staff};

use crate::state::AppState;
use crate::ui::action_id::ActionId;
use crate::ui::widgets::{KeyboardView, TextInput};
use crate::ui::{Action, InputEvent, Keymap, MouseEvent, Pane, PianoKeyboard, Rect, RenderBuf};

/// Text fields on the score pane, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Field {
    Header,
    Right,
    Left,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Header => Field::Right,
            Field::Right => Field::Left,
            Field::Left => Field::Header,
        }
    }

    fn for_staff(staff: Staff) -> Field {
        match staff {
            Staff::Right => Field::Right,
            Staff::Left => Field::Left,
        }
    }
}

/// The header is multi-line; the single-line field shows breaks as `\n`.
pub(super) fn header_to_field(header: &str) -> String {
    header.replace('\n', "\\n")
}

pub(super) fn field_to_header(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Main view: staves, on-screen keyboard, score preview.
pub struct ScorePane {
    keymap: Keymap,
    piano: PianoKeyboard,
    keyboard: KeyboardView,
    header_input: TextInput,
    right_input: TextInput,
    left_input: TextInput,
    editing: Option<Field>,
    /// Key held down with the mouse.
    mouse_note: Option<u8>,
    /// Staff header rows from the last render, for clicks.
    staff_rows: Vec<(Staff, u16)>,
}

impl ScorePane {
    pub fn new(keymap: Keymap, layout: KeyboardLayout, octave: i8) -> Self {
        Self {
            keymap,
            piano: PianoKeyboard::new(layout, octave),
            keyboard: KeyboardView::new(),
            header_input: TextInput::new(""),
            right_input: TextInput::new(""),
            left_input: TextInput::new(""),
            editing: None,
            mouse_note: None,
            staff_rows: Vec::new(),
        }
    }

    pub fn set_enhanced_keyboard(&mut self, enabled: bool) {
        self.piano.set_enhanced_keyboard(enabled);
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn input_mut(&mut self, field: Field) -> &mut TextInput {
        match field {
            Field::Header => &mut self.header_input,
            Field::Right => &mut self.right_input,
            Field::Left => &mut self.left_input,
        }
    }

    fn focus(&mut self, field: Option<Field>) {
        self.editing = field;
        for f in [Field::Header, Field::Right, Field::Left] {
            self.input_mut(f).set_focused(field == Some(f));
        }
    }

    /// Action carrying the current text of `field` into the session.
    fn edit_action(&self, field: Field) -> Action {
        match field {
            Field::Header => Action::EditHeader(field_to_header(self.header_input.value())),
            Field::Right => Action::EditStaff(Staff::Right, self.right_input.value().to_string()),
            Field::Left => Action::EditStaff(Staff::Left, self.left_input.value().to_string()),
        }
    }
}

impl Pane for ScorePane {
    fn id(&self) -> &'static str {
        "score"
    }

    fn handle_action(&mut self, action: ActionId, event: &InputEvent, state: &AppState) -> Action {
        self.handle_action_impl(action, event, state)
    }

    fn handle_raw_input(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        self.handle_raw_input_impl(event)
    }

    fn handle_key_release(&mut self, event: &InputEvent, _state: &AppState) -> Action {
        event
            .plain_char()
            .and_then(|c| self.piano.key_released(c))
            .map(Action::NoteOff)
            .unwrap_or(Action::None)
    }

    fn handle_mouse(&mut self, event: &MouseEvent, _area: Rect, _state: &AppState) -> Action {
        self.handle_mouse_impl(event)
    }

    fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        self.render_impl(area, buf, state);
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn on_exit(&mut self, _state: &AppState) {
        self.focus(None);
    }

    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        if !self.piano.has_active_keys() {
            return vec![];
        }
        self.piano
            .check_releases(Instant::now())
            .into_iter()
            .map(Action::NoteOff)
            .collect()
    }

    fn release_all(&mut self) -> Vec<Action> {
        let mut actions: Vec<Action> = self.piano.release_all().into_iter().map(Action::NoteOff).collect();
        if let Some(note) = self.mouse_note.take() {
            actions.push(Action::NoteOff(note));
        }
        actions
    }

    fn sync(&mut self, state: &AppState) {
        let session = &state.session;
        self.header_input.sync_value(&header_to_field(session.header()));
        self.right_input.sync_value(session.buffer(Staff::Right));
        self.left_input.sync_value(session.buffer(Staff::Left));
    }

    fn wants_text_input(&self) -> bool {
        self.is_editing()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
