use crate::action::{DispatchResult, StatusLevel, SynthAction};
use crate::audio::{AudioCmd, VoiceKey};
use crate::state::AppState;

const MAX_DETUNE_HZ: f32 = 50.0;

/// Edits apply to voices started afterwards; sounding voices keep their pitch.
pub(super) fn dispatch_synth(action: &SynthAction, state: &mut AppState) -> DispatchResult {
    match *action {
        SynthAction::ToggleSlot(slot) => {
            let Some(s) = state.synth.slots.get_mut(slot) else {
                return DispatchResult::none();
            };
            s.enabled = !s.enabled;
            let enabled = s.enabled;
            let mut result = DispatchResult::with_status(
                StatusLevel::Info,
                format!("Osc {} {}", slot + 1, if enabled { "on" } else { "off" }),
            );
            if !enabled {
                for note in &state.held {
                    result.audio.push(AudioCmd::Stop {
                        key: VoiceKey::new(*note, slot as u8),
                    });
                }
            }
            result
        }
        SynthAction::CycleWaveform(slot) => {
            if let Some(s) = state.synth.slots.get_mut(slot) {
                s.waveform = s.waveform.next();
            }
            DispatchResult::none()
        }
        SynthAction::CycleHarmony(slot) => {
            if let Some(s) = state.synth.slots.get_mut(slot) {
                s.harmony = s.harmony.next();
            }
            DispatchResult::none()
        }
        SynthAction::AdjustDetune(slot, delta) => {
            if let Some(s) = state.synth.slots.get_mut(slot) {
                s.detune_hz = (s.detune_hz + delta).clamp(-MAX_DETUNE_HZ, MAX_DETUNE_HZ);
            }
            DispatchResult::none()
        }
        SynthAction::AdjustMasterGain(delta) => {
            let gain = (state.synth.master_gain + delta).clamp(0.0, 1.0);
            state.synth.master_gain = gain;
            DispatchResult {
                audio: vec![AudioCmd::SetMasterGain(gain)],
                ..DispatchResult::default()
            }
        }
    }
}
