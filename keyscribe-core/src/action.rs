use keyscribe_types::Staff;

use crate::audio::AudioCmd;
use crate::transcribe::SessionEvent;

/// Everything the UI can ask the core to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    /// Key press from the computer keyboard or an on-screen key.
    NoteOn(u8),
    NoteOff(u8),
    AllNotesOff,
    ToggleTranscription,
    SelectStaff(Staff),
    /// Commit the held chord now (a rest when nothing is held).
    FlushChord,
    Render,
    EditHeader(String),
    EditStaff(Staff, String),
    ClearStaves,
    Synth(SynthAction),
    Midi(MidiAction),
    Nav(NavAction),
    /// Input layer changes, carried out by the UI.
    PushLayer(&'static str),
    PopLayer(&'static str),
}

/// Pane navigation, carried out by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    SwitchPane(&'static str),
    PushPane(&'static str),
    PopPane,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthAction {
    ToggleSlot(usize),
    CycleWaveform(usize),
    CycleHarmony(usize),
    AdjustDetune(usize, f32),
    AdjustMasterGain(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiAction {
    RefreshPorts,
    ConnectPort(usize),
    DisconnectPort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    pub level: StatusLevel,
    pub message: String,
}

/// Side effects of a dispatch for the runtime to carry out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchResult {
    pub quit: bool,
    pub status: Vec<StatusEvent>,
    /// Commands for the audio thread, in order.
    pub audio: Vec<AudioCmd>,
    pub session_events: Vec<SessionEvent>,
    /// Port operations need the MidiInputManager, which the runtime owns.
    pub midi: Option<MidiAction>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }

    pub fn with_status(level: StatusLevel, message: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.push_status(level, message);
        result
    }

    pub fn push_status(&mut self, level: StatusLevel, message: impl Into<String>) {
        self.status.push(StatusEvent {
            level,
            message: message.into(),
        });
    }

    pub fn push_event(&mut self, event: SessionEvent) {
        if event != SessionEvent::None {
            self.session_events.push(event);
        }
    }
}
