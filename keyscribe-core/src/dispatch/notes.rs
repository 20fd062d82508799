use crate::action::DispatchResult;
use crate::audio::AudioCmd;
use crate::render::ScoreRenderer;
use crate::state::AppState;
use crate::tone::{voice_keys_for_note, voices_for_note};

use super::apply_session_event;

/// Sound the note, then let the session see it. Control codes sound too.
pub(super) fn note_on(
    note: u8,
    state: &mut AppState,
    renderer: &mut dyn ScoreRenderer,
) -> DispatchResult {
    let mut result = DispatchResult::none();
    if !state.press(note) {
        log::debug!(target: "midi", "retrigger {}", note);
    }
    for voice in voices_for_note(note, &state.synth) {
        result.audio.push(AudioCmd::Start {
            key: voice.key,
            frequency: voice.frequency,
            waveform: voice.waveform,
        });
    }

    let event = state.session.note_on(note);
    apply_session_event(event, state, renderer, &mut result);
    result
}

pub(super) fn note_off(note: u8, state: &mut AppState) -> DispatchResult {
    let mut result = DispatchResult::none();
    if state.release(note) {
        for key in voice_keys_for_note(note, &state.synth) {
            result.audio.push(AudioCmd::Stop { key });
        }
    }
    let event = state.session.note_off(note);
    result.push_event(event);
    result
}

pub(super) fn all_notes_off(state: &mut AppState) -> DispatchResult {
    state.held.clear();
    state.session.cancel_chord();
    DispatchResult {
        audio: vec![AudioCmd::StopAll],
        ..DispatchResult::default()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::RecordingRenderer;
    use super::*;
    use crate::audio::VoiceKey;
    use crate::transcribe::SessionEvent;
    use keyscribe_types::Staff;

    #[test]
    fn note_on_starts_one_voice_per_enabled_slot() {
        let mut state = AppState::default();
        let mut renderer = RecordingRenderer::default();
        let result = note_on(69, &mut state, &mut renderer);
        assert_eq!(result.audio.len(), 2);
        match result.audio[0] {
            AudioCmd::Start { key, frequency, .. } => {
                assert_eq!(key, VoiceKey::new(69, 0));
                assert!((frequency - 438.0).abs() < 0.01);
            }
            other => panic!("unexpected {:?}", other),
        }
        match result.audio[1] {
            AudioCmd::Start { key, frequency, .. } => {
                assert_eq!(key, VoiceKey::new(69, 1));
                assert!((frequency - 219.0).abs() < 0.01);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(state.is_highlighted(69));
    }

    #[test]
    fn note_off_stops_voices_and_commits() {
        let mut state = AppState::default();
        state.session.set_enabled(true);
        let mut renderer = RecordingRenderer::default();
        note_on(60, &mut state, &mut renderer);
        let result = note_off(60, &mut state);
        assert_eq!(
            result.audio,
            vec![
                AudioCmd::Stop { key: VoiceKey::new(60, 0) },
                AudioCmd::Stop { key: VoiceKey::new(60, 1) },
            ]
        );
        assert_eq!(
            result.session_events,
            vec![SessionEvent::Committed {
                staff: Staff::Right,
                token: "C".to_string()
            }]
        );
        assert!(!state.is_held(60));
    }

    #[test]
    fn releasing_unheld_note_does_nothing() {
        let mut state = AppState::default();
        state.session.set_enabled(true);
        let result = note_off(62, &mut state);
        assert_eq!(result, DispatchResult::none());
        assert_eq!(state.session.buffer(Staff::Right), "");
    }

    #[test]
    fn disabled_slot_starts_no_voice() {
        let mut state = AppState::default();
        state.synth.slots[1].enabled = false;
        let mut renderer = RecordingRenderer::default();
        let result = note_on(60, &mut state, &mut renderer);
        assert_eq!(result.audio.len(), 1);
    }

    #[test]
    fn control_notes_still_sound() {
        let mut state = AppState::default();
        let mut renderer = RecordingRenderer::default();
        let result = note_on(21, &mut state, &mut renderer);
        assert_eq!(result.audio.len(), 2);
        assert_eq!(state.session.staff(), Staff::Left);
        assert!(!state.is_highlighted(21));
    }
}
