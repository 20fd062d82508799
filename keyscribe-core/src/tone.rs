//! Note-to-frequency math and per-slot voice derivation.

use keyscribe_types::{SynthSettings, Waveform};

use crate::audio::VoiceKey;

/// 12-TET frequency of a MIDI note, `a4 * 2^((note - 69) / 12)`.
pub fn midi_note_to_frequency(note: u8, tuning_a4: f32) -> f32 {
    tuning_a4 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// A voice to start for a held note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSpec {
    pub key: VoiceKey,
    pub frequency: f32,
    pub waveform: Waveform,
}

/// One voice per enabled oscillator slot: harmonized, then detuned down.
pub fn voices_for_note(note: u8, settings: &SynthSettings) -> Vec<VoiceSpec> {
    let base = midi_note_to_frequency(note, settings.tuning_a4);
    settings
        .slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.enabled)
        .map(|(i, slot)| VoiceSpec {
            key: VoiceKey::new(note, i as u8),
            frequency: (base * slot.harmony.multiplier() - slot.detune_hz).max(0.0),
            waveform: slot.waveform,
        })
        .collect()
}

/// Keys of every voice a note may have started, enabled or not.
pub fn voice_keys_for_note(note: u8, settings: &SynthSettings) -> Vec<VoiceKey> {
    (0..settings.slots.len())
        .map(|i| VoiceKey::new(note, i as u8))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyscribe_types::{Harmony, OscillatorSlot};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn reference_frequencies() {
        assert!(approx(midi_note_to_frequency(69, 440.0), 440.0));
        assert!(approx(midi_note_to_frequency(81, 440.0), 880.0));
        assert!(approx(midi_note_to_frequency(57, 440.0), 220.0));
        assert!(approx(midi_note_to_frequency(60, 440.0), 261.63));
        assert!(approx(midi_note_to_frequency(69, 432.0), 432.0));
    }

    #[test]
    fn slots_are_harmonized_and_detuned() {
        let settings = SynthSettings {
            slots: [
                OscillatorSlot::new(Waveform::Square, Harmony::Unison, 2.0),
                OscillatorSlot::new(Waveform::Sawtooth, Harmony::OctaveUp, 1.0),
            ],
            master_gain: 0.1,
            tuning_a4: 440.0,
        };
        let voices = voices_for_note(69, &settings);
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].key, VoiceKey::new(69, 0));
        assert!(approx(voices[0].frequency, 438.0));
        assert_eq!(voices[0].waveform, Waveform::Square);
        assert!(approx(voices[1].frequency, 879.0));
        assert_eq!(voices[1].waveform, Waveform::Sawtooth);
    }

    #[test]
    fn disabled_slot_has_no_voice() {
        let mut settings = SynthSettings::default();
        settings.slots[1].enabled = false;
        let voices = voices_for_note(60, &settings);
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].key.slot, 0);
        assert_eq!(voice_keys_for_note(60, &settings).len(), 2);
    }

    #[test]
    fn frequency_never_negative() {
        let mut settings = SynthSettings::default();
        settings.slots[0].harmony = Harmony::OctaveDown;
        settings.slots[0].detune_hz = 50.0;
        assert_eq!(voices_for_note(0, &settings)[0].frequency, 0.0);
    }
}
