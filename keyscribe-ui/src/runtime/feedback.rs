//! Feedback draining: audio thread reports and MIDI events.

use super::AppRuntime;
use crate::action::StatusLevel;
use crate::audio::AudioFeedback;
use crate::dispatch::dispatch_midi_event;
use crate::global_actions::apply_dispatch_result;

impl AppRuntime {
    pub(crate) fn drain_audio_feedback(&mut self) {
        for feedback in self.audio.drain_feedback() {
            match feedback {
                AudioFeedback::Started { device, sample_rate } => {
                    log::info!(target: "audio", "output on {} at {} Hz", device, sample_rate);
                }
                AudioFeedback::Unavailable(reason) => {
                    log::warn!(target: "audio", "audio unavailable: {}", reason);
                    self.status_bar
                        .push(format!("Audio unavailable: {}", reason), StatusLevel::Warning);
                    self.render_needed = true;
                }
                AudioFeedback::StreamError(err) => {
                    log::error!(target: "audio", "stream error: {}", err);
                    self.status_bar.push(format!("Audio error: {}", err), StatusLevel::Error);
                    self.render_needed = true;
                }
            }
        }
    }

    /// Dispatch pending MIDI events in arrival order. Returns true to quit.
    pub(crate) fn drain_midi_events(&mut self) -> bool {
        let events = self.midi_input.poll_events();
        if events.is_empty() {
            return false;
        }
        self.render_needed = true;
        for event in &events {
            let result = dispatch_midi_event(event, &mut self.state, &mut self.renderer);
            if apply_dispatch_result(
                result,
                &mut self.state,
                &mut self.panes,
                &mut self.status_bar,
                &self.audio,
                &mut self.midi_input,
            ) {
                return true;
            }
        }
        false
    }
}
