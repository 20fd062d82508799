//! ABC pitch symbols for the transcribable range, plus the literal notation
//! keys that sit just below it.

/// ABC symbols for notes 36..=95, one octave per row.
const PITCH_SYMBOLS: [&str; 60] = [
    "C,,", "_D,,", "D,,", "_E,,", "E,,", "F,,", "^F,,", "G,,", "_A,,", "A,,", "_B,,", "B,,",
    "C,", "_D,", "D,", "_E,", "E,", "F,", "^F,", "G,", "_A,", "A,", "_B,", "B,",
    "C", "_D", "D", "_E", "E", "F", "^F", "G", "_A", "A", "_B", "B",
    "c", "_d", "d", "_e", "e", "f", "^f", "g", "_a", "a", "_b", "b",
    "c'", "_d'", "d'", "_e'", "e'", "f'", "^f'", "g'", "_a'", "a'", "_b'", "b'",
];

/// Literal tokens for notes 27..=35: durations, chord brackets, triplet,
/// rest, bar line and spacer.
const NOTATION_TOKENS: [&str; 9] = ["2", "4", "8", "[", "]", "(3", "z", "|", " "];

/// Bounds-checked lookup from MIDI note to ABC notation.
///
/// Every lookup returns `None` outside its table rather than indexing past it.
pub struct SymbolTable;

impl SymbolTable {
    /// Lowest note with a pitch symbol.
    pub const FIRST_PITCH: u8 = 36;
    /// Lowest notation key.
    pub const FIRST_NOTATION_KEY: u8 = 27;

    /// ABC pitch symbol for `note`, e.g. 60 -> "C", 66 -> "^F".
    pub fn pitch(note: u8) -> Option<&'static str> {
        let index = note.checked_sub(Self::FIRST_PITCH)?;
        PITCH_SYMBOLS.get(index as usize).copied()
    }

    /// Literal token for a notation key, e.g. 33 -> "z".
    pub fn notation(note: u8) -> Option<&'static str> {
        let index = note.checked_sub(Self::FIRST_NOTATION_KEY)?;
        NOTATION_TOKENS.get(index as usize).copied()
    }

    pub fn is_transcribable(note: u8) -> bool {
        Self::pitch(note).is_some()
    }
}
