//! End-to-end transcription driven by raw MIDI bytes.

use keyscribe_core::action::DispatchResult;
use keyscribe_core::dispatch::dispatch_midi_event;
use keyscribe_core::midi::{parse_midi_message, MidiEvent};
use keyscribe_core::render::{RenderOutcome, ScoreRenderer};
use keyscribe_core::state::AppState;
use keyscribe_core::transcribe::SessionEvent;
use keyscribe_types::Staff;

#[derive(Default)]
struct CaptureRenderer {
    scores: Vec<String>,
}

impl ScoreRenderer for CaptureRenderer {
    fn render(&mut self, abc: &str) -> Result<RenderOutcome, String> {
        self.scores.push(abc.to_string());
        Ok(RenderOutcome {
            path: "score.abc".into(),
            command_status: None,
        })
    }
}

struct Harness {
    state: AppState,
    renderer: CaptureRenderer,
    commits: usize,
}

impl Harness {
    fn new(enabled: bool) -> Self {
        let mut state = AppState::default();
        state.session.set_enabled(enabled);
        Self {
            state,
            renderer: CaptureRenderer::default(),
            commits: 0,
        }
    }

    fn send(&mut self, bytes: &[u8]) -> DispatchResult {
        let Some(kind) = parse_midi_message(bytes) else {
            return DispatchResult::none();
        };
        let result = dispatch_midi_event(&MidiEvent::new(0, kind), &mut self.state, &mut self.renderer);
        self.commits += result
            .session_events
            .iter()
            .filter(|e| matches!(e, SessionEvent::Committed { .. }))
            .count();
        result
    }

    fn on(&mut self, note: u8) {
        self.send(&[0x90, note, 100]);
    }

    fn off(&mut self, note: u8) {
        self.send(&[0x80, note, 0]);
    }

    fn right(&self) -> &str {
        self.state.session.buffer(Staff::Right)
    }

    fn left(&self) -> &str {
        self.state.session.buffer(Staff::Left)
    }
}

#[test]
fn two_note_chord_on_right_staff() {
    let mut h = Harness::new(true);
    h.on(60);
    h.on(64);
    h.off(60);
    h.off(64);
    assert_eq!(h.right(), "[CE]");
    assert_eq!(h.left(), "");
}

#[test]
fn single_note_has_no_brackets() {
    let mut h = Harness::new(true);
    h.on(72);
    h.off(72);
    assert_eq!(h.right(), "c");
    assert_eq!(h.commits, 1);
}

#[test]
fn release_order_does_not_matter() {
    let mut h = Harness::new(true);
    h.on(67);
    h.on(71);
    h.off(71);
    h.off(67);
    assert_eq!(h.right(), "[GB]");
}

#[test]
fn one_commit_per_return_to_empty() {
    let mut h = Harness::new(true);
    h.on(48);
    h.off(48);
    h.on(50);
    h.on(53);
    h.off(53);
    h.on(57);
    h.off(50);
    h.off(57);
    h.on(95);
    h.off(95);
    assert_eq!(h.commits, 3);
    assert_eq!(h.right(), "C,[D,F,A,]b'");
}

#[test]
fn never_pressed_release_is_noop() {
    let mut h = Harness::new(true);
    h.off(60);
    h.off(33);
    assert_eq!(h.right(), "");
    assert_eq!(h.commits, 0);
    assert!(h.state.held.is_empty());
}

#[test]
fn velocity_zero_note_on_releases() {
    let mut h = Harness::new(true);
    h.on(62);
    h.send(&[0x90, 62, 0]);
    assert_eq!(h.right(), "D");
}

#[test]
fn any_channel_is_accepted() {
    let mut h = Harness::new(true);
    h.send(&[0x95, 61, 80]);
    h.send(&[0x85, 61, 0]);
    assert_eq!(h.right(), "_D");
}

#[test]
fn staff_control_codes_route_buffers() {
    let mut h = Harness::new(true);
    h.on(21);
    h.off(21);
    h.on(36);
    h.off(36);
    h.on(23);
    h.off(23);
    h.on(84);
    h.off(84);
    assert_eq!(h.left(), "C,,");
    assert_eq!(h.right(), "c'");
}

#[test]
fn toggle_mid_chord_suppresses_until_reenabled() {
    let mut h = Harness::new(true);
    h.on(60);
    h.on(96);
    h.off(96);
    assert!(!h.state.session.is_enabled());
    h.off(60);
    assert_eq!(h.right(), "");
    assert!(h.state.session.transcriber().is_idle());
    assert!(h.state.held.is_empty());

    h.on(62);
    h.off(62);
    assert_eq!(h.right(), "");

    h.on(96);
    h.off(96);
    h.on(64);
    h.off(64);
    assert_eq!(h.right(), "E");
    assert_eq!(h.commits, 1);
}

#[test]
fn mode_off_keeps_held_bookkeeping() {
    let mut h = Harness::new(false);
    h.on(60);
    h.on(64);
    assert_eq!(h.state.held, vec![60, 64]);
    assert!(h.state.is_highlighted(60));
    h.off(60);
    h.off(64);
    assert!(h.state.held.is_empty());
    assert_eq!(h.right(), "");
}

#[test]
fn notation_keys_append_directly() {
    let mut h = Harness::new(true);
    h.on(60);
    h.off(60);
    h.on(28);
    h.off(28);
    h.on(34);
    h.off(34);
    assert_eq!(h.right(), "C4|");
}

#[test]
fn render_code_sends_composed_score() {
    let mut h = Harness::new(true);
    h.state.session.set_header("X:1\nK:C\n");
    h.on(60);
    h.off(60);
    h.on(21);
    h.on(48);
    h.off(48);
    h.on(97);
    assert_eq!(h.renderer.scores, vec!["X:1\nK:C\nCC,".to_string()]);
}

#[test]
fn short_messages_are_dropped() {
    let mut h = Harness::new(true);
    h.send(&[0xD0, 60]);
    h.send(&[0x90, 60]);
    assert!(h.state.held.is_empty());
}
