use keyscribe_types::Waveform;

/// Identifies one oscillator: the note that started it and its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceKey {
    pub note: u8,
    pub slot: u8,
}

impl VoiceKey {
    pub fn new(note: u8, slot: u8) -> Self {
        Self { note, slot }
    }
}

/// Commands sent from the main thread to the output stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCmd {
    Start {
        key: VoiceKey,
        frequency: f32,
        waveform: Waveform,
    },
    /// Release a voice; a key with no sounding voice is ignored.
    Stop { key: VoiceKey },
    StopAll,
    SetMasterGain(f32),
}

/// Reports from the audio thread back to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioFeedback {
    Started { device: String, sample_rate: u32 },
    Unavailable(String),
    StreamError(String),
}
