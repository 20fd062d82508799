use std::path::PathBuf;

use keyscribe_types::{is_rendered_key, SynthSettings};

use crate::config::Config;
use crate::transcribe::TranscriptionSession;

/// Known MIDI ports and which one is open.
#[derive(Debug, Clone, Default)]
pub struct MidiConnectionState {
    pub port_names: Vec<String>,
    pub connected_port: Option<String>,
}

/// Everything the runtime owns for the lifetime of the program.
#[derive(Debug, Clone)]
pub struct AppState {
    pub session: TranscriptionSession,
    /// Every note currently sounding, in press order.
    pub held: Vec<u8>,
    pub synth: SynthSettings,
    pub midi: MidiConnectionState,
    /// Last score handed to the renderer.
    pub last_score: Option<String>,
    pub render_path: PathBuf,
}

impl AppState {
    pub fn new(session: TranscriptionSession, synth: SynthSettings, render_path: PathBuf) -> Self {
        Self {
            session,
            held: Vec::new(),
            synth,
            midi: MidiConnectionState::default(),
            last_score: None,
            render_path,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut session = TranscriptionSession::new(config.controls(), config.header());
        session.set_enabled(config.start_enabled());
        Self::new(session, config.synth(), config.render_path())
    }

    pub fn is_held(&self, note: u8) -> bool {
        self.held.contains(&note)
    }

    /// Whether the on-screen key for `note` should be highlighted.
    pub fn is_highlighted(&self, note: u8) -> bool {
        is_rendered_key(note) && self.is_held(note)
    }

    /// Record a press; false if the note was already sounding.
    pub fn press(&mut self, note: u8) -> bool {
        if self.is_held(note) {
            return false;
        }
        self.held.push(note);
        true
    }

    /// Record a release; false if the note was not sounding.
    pub fn release(&mut self, note: u8) -> bool {
        match self.held.iter().position(|n| *n == note) {
            Some(i) => {
                self.held.remove(i);
                true
            }
            None => false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            TranscriptionSession::default(),
            SynthSettings::default(),
            std::env::temp_dir().join("score.abc"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_track_held_notes() {
        let mut state = AppState::default();
        assert!(state.press(60));
        assert!(!state.press(60));
        assert!(state.press(64));
        assert_eq!(state.held, vec![60, 64]);
        assert!(state.release(60));
        assert!(!state.release(60));
        assert_eq!(state.held, vec![64]);
    }

    #[test]
    fn highlight_only_rendered_keys() {
        let mut state = AppState::default();
        state.press(21);
        state.press(60);
        assert!(!state.is_highlighted(21));
        assert!(state.is_highlighted(60));
        assert!(!state.is_highlighted(62));
    }
}
