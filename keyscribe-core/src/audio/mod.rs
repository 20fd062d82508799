pub mod commands;
pub mod handle;
pub mod synth;

pub use commands::{AudioCmd, AudioFeedback, VoiceKey};
pub use handle::{AudioHandle, AudioReadState};
pub use synth::SynthEngine;
