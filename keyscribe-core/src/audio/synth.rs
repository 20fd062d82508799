//! Oscillator voices mixed inside the output stream callback.

use std::collections::HashMap;
use std::f32::consts::TAU;

use keyscribe_types::Waveform;

use super::commands::{AudioCmd, VoiceKey};

/// Seconds to ramp a voice in and out; avoids clicks on start/stop.
const ATTACK_SECS: f32 = 0.005;
const RELEASE_SECS: f32 = 0.04;

/// One sample of a unit-amplitude waveform at `phase` in [0, 1).
pub fn waveform_sample(waveform: Waveform, phase: f32) -> f32 {
    match waveform {
        Waveform::Sine => (phase * TAU).sin(),
        Waveform::Square => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Sawtooth => 2.0 * phase - 1.0,
        Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
    }
}

#[derive(Debug, Clone)]
struct Voice {
    frequency: f32,
    waveform: Waveform,
    phase: f32,
    level: f32,
    releasing: bool,
}

impl Voice {
    fn new(frequency: f32, waveform: Waveform) -> Self {
        Self {
            frequency,
            waveform,
            phase: 0.0,
            level: 0.0,
            releasing: false,
        }
    }

    fn is_silent(&self) -> bool {
        self.releasing && self.level <= 0.0
    }
}

/// Polyphonic oscillator bank.
pub struct SynthEngine {
    sample_rate: f32,
    master_gain: f32,
    voices: HashMap<VoiceKey, Voice>,
    attack_step: f32,
    release_step: f32,
}

impl SynthEngine {
    pub fn new(sample_rate: f32, master_gain: f32) -> Self {
        let sample_rate = sample_rate.max(1.0);
        Self {
            sample_rate,
            master_gain,
            voices: HashMap::new(),
            attack_step: 1.0 / (ATTACK_SECS * sample_rate),
            release_step: 1.0 / (RELEASE_SECS * sample_rate),
        }
    }

    pub fn apply(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Start {
                key,
                frequency,
                waveform,
            } => {
                // Retrigger keeps the current level so a repeated press doesn't click
                let level = self.voices.get(&key).map(|v| v.level).unwrap_or(0.0);
                let mut voice = Voice::new(frequency, waveform);
                voice.level = level;
                self.voices.insert(key, voice);
            }
            AudioCmd::Stop { key } => {
                if let Some(voice) = self.voices.get_mut(&key) {
                    voice.releasing = true;
                }
            }
            AudioCmd::StopAll => {
                for voice in self.voices.values_mut() {
                    voice.releasing = true;
                }
            }
            AudioCmd::SetMasterGain(gain) => {
                self.master_gain = gain.clamp(0.0, 1.0);
            }
        }
    }

    /// Number of voices still producing sound (including ones fading out).
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn is_sounding(&self, key: VoiceKey) -> bool {
        self.voices.get(&key).is_some_and(|v| !v.releasing)
    }

    /// Mix the next mono sample.
    pub fn next_sample(&mut self) -> f32 {
        let mut mix = 0.0;
        for voice in self.voices.values_mut() {
            if voice.releasing {
                voice.level = (voice.level - self.release_step).max(0.0);
            } else {
                voice.level = (voice.level + self.attack_step).min(1.0);
            }
            mix += waveform_sample(voice.waveform, voice.phase) * voice.level;
            voice.phase += voice.frequency / self.sample_rate;
            voice.phase -= voice.phase.floor();
        }
        self.voices.retain(|_, v| !v.is_silent());
        (mix * self.master_gain).clamp(-1.0, 1.0)
    }
}
