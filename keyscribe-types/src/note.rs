use std::ops::RangeInclusive;

/// Notes drawn on the on-screen keyboard and eligible for transcription (C2 to B6).
pub const KEY_RANGE: RangeInclusive<u8> = 36..=95;

pub const MIDDLE_C: u8 = 60;

const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Whether `note` has a key on the on-screen keyboard.
pub fn is_rendered_key(note: u8) -> bool {
    KEY_RANGE.contains(&note)
}

pub fn is_black_key(note: u8) -> bool {
    matches!(note % 12, 1 | 3 | 6 | 8 | 10)
}

/// Scientific pitch label, e.g. 60 -> "C4".
pub fn note_label(note: u8) -> String {
    let octave = (note / 12) as i8 - 1;
    format!("{}{}", NAMES[(note % 12) as usize], octave)
}
