use serde::{Deserialize, Serialize};

/// Action bound to a reserved MIDI note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCode {
    LeftStaff,
    RightStaff,
    ToggleTranscription,
    Render,
}

/// Note numbers reserved as control codes instead of pitches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlCodes {
    pub left_staff: u8,
    pub right_staff: u8,
    pub toggle_transcription: u8,
    pub render: u8,
}

impl Default for ControlCodes {
    fn default() -> Self {
        Self {
            left_staff: 21,
            right_staff: 23,
            toggle_transcription: 96,
            render: 97,
        }
    }
}

impl ControlCodes {
    pub fn classify(&self, note: u8) -> Option<ControlCode> {
        if note == self.left_staff {
            Some(ControlCode::LeftStaff)
        } else if note == self.right_staff {
            Some(ControlCode::RightStaff)
        } else if note == self.toggle_transcription {
            Some(ControlCode::ToggleTranscription)
        } else if note == self.render {
            Some(ControlCode::Render)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_codes() {
        let codes = ControlCodes::default();
        assert_eq!(codes.classify(21), Some(ControlCode::LeftStaff));
        assert_eq!(codes.classify(23), Some(ControlCode::RightStaff));
        assert_eq!(codes.classify(96), Some(ControlCode::ToggleTranscription));
        assert_eq!(codes.classify(97), Some(ControlCode::Render));
        assert_eq!(codes.classify(60), None);
    }
}
