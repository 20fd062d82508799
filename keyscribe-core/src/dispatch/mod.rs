mod notes;
mod synth;

use crate::action::{Action, DispatchResult, StatusLevel};
use crate::midi::{MidiEvent, MidiEventKind};
use crate::render::{compose_score, ScoreRenderer};
use crate::state::AppState;
use crate::transcribe::SessionEvent;

/// Controller numbers treated as "all notes off".
const CC_ALL_SOUND_OFF: u8 = 120;
const CC_ALL_NOTES_OFF: u8 = 123;

/// Dispatch a UI action against the state. Audio commands and port
/// operations are returned for the runtime to carry out; renders happen
/// inline through `renderer`.
pub fn dispatch_action(
    action: &Action,
    state: &mut AppState,
    renderer: &mut dyn ScoreRenderer,
) -> DispatchResult {
    match action {
        Action::None | Action::Nav(_) | Action::PushLayer(_) | Action::PopLayer(_) => {
            DispatchResult::none()
        }
        Action::Quit => DispatchResult::with_quit(),
        Action::NoteOn(note) => notes::note_on(*note, state, renderer),
        Action::NoteOff(note) => notes::note_off(*note, state),
        Action::AllNotesOff => notes::all_notes_off(state),
        Action::ToggleTranscription => {
            let enabled = state.session.toggle_transcription();
            let mut result = DispatchResult::none();
            apply_session_event(SessionEvent::ModeChanged(enabled), state, renderer, &mut result);
            result
        }
        Action::SelectStaff(staff) => {
            state.session.set_staff(*staff);
            let mut result = DispatchResult::none();
            apply_session_event(SessionEvent::StaffChanged(*staff), state, renderer, &mut result);
            result
        }
        Action::FlushChord => {
            let mut result = DispatchResult::none();
            let event = state.session.flush_chord();
            apply_session_event(event, state, renderer, &mut result);
            result
        }
        Action::Render => {
            let mut result = DispatchResult::none();
            apply_session_event(SessionEvent::RenderRequested, state, renderer, &mut result);
            result
        }
        Action::EditHeader(text) => {
            state.session.set_header(text);
            DispatchResult::none()
        }
        Action::EditStaff(staff, text) => {
            state.session.replace_buffer(*staff, text);
            DispatchResult::none()
        }
        Action::ClearStaves => {
            state.session.clear_buffers();
            DispatchResult::with_status(StatusLevel::Info, "Staves cleared")
        }
        Action::Synth(a) => synth::dispatch_synth(a, state),
        Action::Midi(a) => DispatchResult {
            midi: Some(*a),
            ..DispatchResult::default()
        },
    }
}

/// Dispatch one incoming MIDI message. Only note on/off and the
/// all-notes-off controllers do anything.
pub fn dispatch_midi_event(
    event: &MidiEvent,
    state: &mut AppState,
    renderer: &mut dyn ScoreRenderer,
) -> DispatchResult {
    match event.kind {
        MidiEventKind::NoteOn { note, velocity, .. } if velocity > 0 => {
            notes::note_on(note, state, renderer)
        }
        MidiEventKind::NoteOn { note, .. } | MidiEventKind::NoteOff { note, .. } => {
            notes::note_off(note, state)
        }
        MidiEventKind::ControlChange { controller, .. }
            if controller == CC_ALL_NOTES_OFF || controller == CC_ALL_SOUND_OFF =>
        {
            notes::all_notes_off(state)
        }
        _ => DispatchResult::none(),
    }
}

pub(crate) fn apply_session_event(
    event: SessionEvent,
    state: &mut AppState,
    renderer: &mut dyn ScoreRenderer,
    result: &mut DispatchResult,
) {
    match &event {
        SessionEvent::None | SessionEvent::Committed { .. } => {}
        SessionEvent::StaffChanged(staff) => {
            result.push_status(StatusLevel::Info, format!("Writing to {}", staff.name()));
        }
        SessionEvent::ModeChanged(enabled) => {
            let msg = if *enabled {
                "Transcription on"
            } else {
                "Transcription off"
            };
            result.push_status(StatusLevel::Info, msg);
        }
        SessionEvent::RenderRequested => render_score(state, renderer, result),
    }
    result.push_event(event);
}

fn render_score(state: &mut AppState, renderer: &mut dyn ScoreRenderer, result: &mut DispatchResult) {
    use keyscribe_types::Staff;

    let session = &state.session;
    let abc = compose_score(
        session.header(),
        session.buffer(Staff::Right),
        session.buffer(Staff::Left),
    );

    match renderer.render(&abc) {
        Ok(outcome) => match outcome.command_status {
            Some(code) if code != 0 => result.push_status(
                StatusLevel::Warning,
                format!("Render command exited with {}", code),
            ),
            _ => result.push_status(
                StatusLevel::Info,
                format!("Rendered to {}", outcome.path.display()),
            ),
        },
        Err(e) => {
            log::warn!(target: "render", "render failed: {}", e);
            result.push_status(StatusLevel::Error, e);
        }
    }
    state.last_score = Some(abc);
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::render::{RenderOutcome, ScoreRenderer};

    /// Renderer that records what it was given.
    #[derive(Default)]
    pub struct RecordingRenderer {
        pub scores: Vec<String>,
        pub fail: bool,
        pub command_status: Option<i32>,
    }

    impl ScoreRenderer for RecordingRenderer {
        fn render(&mut self, abc: &str) -> Result<RenderOutcome, String> {
            if self.fail {
                return Err("renderer offline".to_string());
            }
            self.scores.push(abc.to_string());
            Ok(RenderOutcome {
                path: "score.abc".into(),
                command_status: self.command_status,
            })
        }
    }
}
