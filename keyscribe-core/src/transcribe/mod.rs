//! Note capture and ABC transcription.
//!
//! - `chord`: turns held-note sets into single ABC tokens
//! - `session`: mode flag, current staff, control codes and the two staff buffers

mod chord;
mod session;

pub use chord::{chord_token, ChordTranscriber, REST_PLACEHOLDER};
pub use session::{SessionEvent, TranscriptionSession};
