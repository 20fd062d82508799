//! # keyscribe-core
//!
//! UI-independent backend for keyscribe: MIDI input, chord transcription to
//! ABC, score rendering, tone math and the audio output thread.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keyscribe_core::config::Config;
//! use keyscribe_core::state::AppState;
//! use keyscribe_core::audio::AudioHandle;
//! use keyscribe_core::render::FileRenderer;
//! use keyscribe_core::dispatch::dispatch_midi_event;
//!
//! let config = Config::load();
//! let mut state = AppState::from_config(&config);
//! let audio = AudioHandle::new(state.synth.master_gain);
//! let mut renderer = FileRenderer::new(config.render_path(), config.render_command());
//!
//! for event in midi.poll_events() {
//!     let result = dispatch_midi_event(&event, &mut state, &mut renderer);
//!     audio.apply(&result.audio);
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`transcribe`]: `ChordTranscriber` and `TranscriptionSession`
//! - [`dispatch`]: `dispatch_action()` / `dispatch_midi_event()`, the only
//!   entry points that mutate `AppState`
//! - [`audio`]: `AudioHandle` and the synth run by the output stream
//! - [`midi`]: `MidiInputManager` and raw message parsing
//! - [`render`]: `compose_score()` and the `ScoreRenderer` seam
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod action;
pub mod audio;
pub mod config;
pub mod dispatch;
pub mod midi;
pub mod render;
pub mod state;
pub mod tone;
pub mod transcribe;
