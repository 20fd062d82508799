use std::collections::HashMap;
use std::time::{Duration, Instant};

use keyscribe_types::KeyboardLayout;

/// Translate a key character from the configured layout to its QWERTY position.
pub fn translate_key(c: char, layout: KeyboardLayout) -> char {
    match layout {
        KeyboardLayout::Qwerty => c,
        KeyboardLayout::Colemak => colemak_to_qwerty(c),
    }
}

fn colemak_to_qwerty(c: char) -> char {
    match c {
        // top row
        'f' => 'e', 'p' => 'r', 'g' => 't', 'j' => 'y',
        'l' => 'u', 'u' => 'i', 'y' => 'o', ';' => 'p',
        // home row
        'r' => 's', 's' => 'd', 't' => 'f', 'd' => 'g',
        'n' => 'j', 'e' => 'k', 'i' => 'l', 'o' => ';',
        // bottom row
        'k' => 'n',
        other => other,
    }
}

const MIN_OCTAVE: i8 = 0;
const MAX_OCTAVE: i8 = 8;

/// Computer keyboard as a one-and-a-half octave piano, C on 'a'.
///
/// Terminals without key release reporting only send repeats while a key is
/// held, so a key counts as released once no event arrives for
/// `release_timeout`. With release reporting, `key_released` ends the note.
pub struct PianoKeyboard {
    octave: i8,
    layout: KeyboardLayout,
    // char -> (pitch, last event time)
    active_keys: HashMap<char, (u8, Instant)>,
    release_timeout: Duration,
    enhanced_keyboard: bool,
}

impl PianoKeyboard {
    pub fn new(layout: KeyboardLayout, octave: i8) -> Self {
        Self {
            octave: octave.clamp(MIN_OCTAVE, MAX_OCTAVE),
            layout,
            active_keys: HashMap::new(),
            release_timeout: Duration::from_millis(150),
            enhanced_keyboard: false,
        }
    }

    pub fn set_enhanced_keyboard(&mut self, enabled: bool) {
        self.enhanced_keyboard = enabled;
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// Decrease octave. Returns true if changed.
    pub fn octave_down(&mut self) -> bool {
        if self.octave > MIN_OCTAVE {
            self.octave -= 1;
            true
        } else {
            false
        }
    }

    /// Increase octave. Returns true if changed.
    pub fn octave_up(&mut self) -> bool {
        if self.octave < MAX_OCTAVE {
            self.octave += 1;
            true
        } else {
            false
        }
    }

    pub fn status_label(&self) -> String {
        format!(" PIANO C{} ", self.octave)
    }

    /// MIDI pitch for a typed character in the configured layout.
    pub fn key_to_pitch(&self, key: char) -> Option<u8> {
        let key = translate_key(key, self.layout);
        Self::key_to_offset(key).map(|off| {
            let base = (self.octave as i16 + 1) * 12;
            (base + off as i16).clamp(0, 127) as u8
        })
    }

    // ── Sustain tracking ──────────────────────────────────────────

    /// Returns Some(pitch) for a new press, None for a repeat of a held key.
    pub fn key_pressed(&mut self, c: char, pitch: u8, now: Instant, is_repeat: bool) -> Option<u8> {
        if let Some(entry) = self.active_keys.get_mut(&c) {
            entry.1 = now;
            return None;
        }
        if is_repeat && self.enhanced_keyboard {
            // Repeat of a key whose press we never saw
            return None;
        }
        self.active_keys.insert(c, (pitch, now));
        Some(pitch)
    }

    /// Explicit release from a terminal that reports them.
    pub fn key_released(&mut self, c: char) -> Option<u8> {
        self.active_keys.remove(&c).map(|(pitch, _)| pitch)
    }

    /// Keys that have gone quiet for longer than the release timeout.
    /// Always empty when the terminal reports real releases.
    pub fn check_releases(&mut self, now: Instant) -> Vec<u8> {
        if self.enhanced_keyboard {
            return Vec::new();
        }
        let timeout = self.release_timeout;
        let mut released = Vec::new();
        self.active_keys.retain(|_, (pitch, last)| {
            if now.duration_since(*last) > timeout {
                released.push(*pitch);
                false
            } else {
                true
            }
        });
        released
    }

    pub fn release_all(&mut self) -> Vec<u8> {
        let pitches = self.active_keys.values().map(|(p, _)| *p).collect();
        self.active_keys.clear();
        pitches
    }

    pub fn has_active_keys(&self) -> bool {
        !self.active_keys.is_empty()
    }

    fn key_to_offset(key: char) -> Option<u8> {
        match key {
            'a' => Some(0),   // C
            's' => Some(2),   // D
            'd' => Some(4),   // E
            'f' => Some(5),   // F
            'g' => Some(7),   // G
            'h' => Some(9),   // A
            'j' => Some(11),  // B
            'w' => Some(1),   // C#
            'e' => Some(3),   // D#
            't' => Some(6),   // F#
            'y' => Some(8),   // G#
            'u' => Some(10),  // A#
            'k' => Some(12),  // C (octave up)
            'l' => Some(14),  // D
            ';' => Some(16),  // E
            'o' => Some(13),  // C#
            'p' => Some(15),  // D#
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kb() -> PianoKeyboard {
        PianoKeyboard::new(KeyboardLayout::Qwerty, 4)
    }

    #[test]
    fn a_is_middle_c_at_octave_4() {
        assert_eq!(kb().key_to_pitch('a'), Some(60));
        assert_eq!(kb().key_to_pitch('w'), Some(61));
        assert_eq!(kb().key_to_pitch(';'), Some(64));
        assert_eq!(kb().key_to_pitch('q'), None);
    }

    #[test]
    fn octave_is_clamped() {
        let mut k = kb();
        for _ in 0..20 {
            k.octave_up();
        }
        assert_eq!(k.octave(), MAX_OCTAVE);
        assert!(!k.octave_up());
        for _ in 0..20 {
            k.octave_down();
        }
        assert_eq!(k.octave(), MIN_OCTAVE);
        assert_eq!(PianoKeyboard::new(KeyboardLayout::Qwerty, 12).octave(), MAX_OCTAVE);
    }

    #[test]
    fn colemak_translates_home_row() {
        let k = PianoKeyboard::new(KeyboardLayout::Colemak, 4);
        // Colemak 'r' sits where QWERTY 's' is
        assert_eq!(k.key_to_pitch('r'), Some(62));
    }

    #[test]
    fn repeat_sustains_instead_of_retriggering() {
        let mut k = kb();
        let t0 = Instant::now();
        assert_eq!(k.key_pressed('a', 60, t0, false), Some(60));
        assert_eq!(k.key_pressed('a', 60, t0, true), None);
        assert!(k.has_active_keys());
    }

    #[test]
    fn timeout_releases() {
        let mut k = kb();
        let t0 = Instant::now();
        k.key_pressed('a', 60, t0, false);
        assert!(k.check_releases(t0 + Duration::from_millis(50)).is_empty());
        assert_eq!(k.check_releases(t0 + Duration::from_millis(200)), vec![60]);
        assert!(!k.has_active_keys());
    }

    #[test]
    fn enhanced_keyboard_uses_explicit_release() {
        let mut k = kb();
        k.set_enhanced_keyboard(true);
        let t0 = Instant::now();
        k.key_pressed('s', 62, t0, false);
        assert!(k.check_releases(t0 + Duration::from_secs(5)).is_empty());
        assert_eq!(k.key_released('s'), Some(62));
        assert_eq!(k.key_released('s'), None);
    }

    #[test]
    fn release_all_empties() {
        let mut k = kb();
        let t0 = Instant::now();
        k.key_pressed('a', 60, t0, false);
        k.key_pressed('d', 64, t0, false);
        let mut all = k.release_all();
        all.sort();
        assert_eq!(all, vec![60, 64]);
        assert!(!k.has_active_keys());
    }
}
