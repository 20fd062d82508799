use serde::{Deserialize, Serialize};

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Triangle => "triangle",
        }
    }

    pub fn next(&self) -> Waveform {
        let i = Self::ALL.iter().position(|w| w == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// Interval an oscillator is shifted by relative to the played note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Harmony {
    #[default]
    Unison,
    FifthUp,
    FifthDown,
    OctaveUp,
    OctaveDown,
    ThirdUp,
    ThirdDown,
}

impl Harmony {
    pub const ALL: [Harmony; 7] = [
        Harmony::Unison,
        Harmony::FifthUp,
        Harmony::FifthDown,
        Harmony::OctaveUp,
        Harmony::OctaveDown,
        Harmony::ThirdUp,
        Harmony::ThirdDown,
    ];

    /// Frequency multiplier applied to the note's base frequency.
    pub fn multiplier(&self) -> f32 {
        match self {
            Harmony::Unison => 1.0,
            Harmony::FifthUp => 1.5,
            Harmony::FifthDown => 0.75,
            Harmony::OctaveUp => 2.0,
            Harmony::OctaveDown => 0.5,
            Harmony::ThirdUp => 1.26,
            Harmony::ThirdDown => 0.79,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Harmony::Unison => "unison",
            Harmony::FifthUp => "5th up",
            Harmony::FifthDown => "5th down",
            Harmony::OctaveUp => "octave up",
            Harmony::OctaveDown => "octave down",
            Harmony::ThirdUp => "3rd up",
            Harmony::ThirdDown => "3rd down",
        }
    }

    pub fn next(&self) -> Harmony {
        let i = Self::ALL.iter().position(|h| h == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// One of the two oscillators started for every held note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OscillatorSlot {
    pub enabled: bool,
    pub waveform: Waveform,
    pub harmony: Harmony,
    /// Subtracted from the harmonized frequency so the slots beat slightly.
    pub detune_hz: f32,
}

impl OscillatorSlot {
    pub fn new(waveform: Waveform, harmony: Harmony, detune_hz: f32) -> Self {
        Self {
            enabled: true,
            waveform,
            harmony,
            detune_hz,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthSettings {
    pub slots: [OscillatorSlot; 2],
    pub master_gain: f32,
    pub tuning_a4: f32,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            slots: [
                OscillatorSlot::new(Waveform::Sine, Harmony::Unison, 2.0),
                OscillatorSlot::new(Waveform::Triangle, Harmony::OctaveDown, 1.0),
            ],
            master_gain: 0.1,
            tuning_a4: 440.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waveform_cycles() {
        let mut w = Waveform::Sine;
        for _ in 0..Waveform::ALL.len() {
            w = w.next();
        }
        assert_eq!(w, Waveform::Sine);
        assert_eq!(Waveform::Sawtooth.next(), Waveform::Triangle);
    }

    #[test]
    fn harmony_multipliers() {
        assert_eq!(Harmony::Unison.multiplier(), 1.0);
        assert_eq!(Harmony::OctaveUp.multiplier(), 2.0);
        assert_eq!(Harmony::ThirdDown.multiplier(), 0.79);
        assert_eq!(Harmony::ThirdDown.next(), Harmony::Unison);
    }
}
