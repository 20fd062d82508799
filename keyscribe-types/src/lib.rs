//! # keyscribe-types
//!
//! Shared type definitions for keyscribe.
//! Plain data used by both keyscribe-core and the terminal UI: note ranges,
//! the ABC symbol table, staves, control codes and oscillator settings.

pub mod control;
pub mod keyboard;
pub mod note;
pub mod staff;
pub mod symbol_table;
pub mod synth;

pub use control::{ControlCode, ControlCodes};
pub use keyboard::KeyboardLayout;
pub use note::{is_black_key, is_rendered_key, note_label, KEY_RANGE, MIDDLE_C};
pub use staff::Staff;
pub use symbol_table::SymbolTable;
pub use synth::{Harmony, OscillatorSlot, SynthSettings, Waveform};
