use keyscribe_types::{ControlCode, ControlCodes, Staff, SymbolTable};

use super::chord::ChordTranscriber;

/// What a session operation did, for the UI to reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    Committed { staff: Staff, token: String },
    StaffChanged(Staff),
    ModeChanged(bool),
    RenderRequested,
}

/// Transcription state for one run of the program: the chord transcriber,
/// the two staff buffers, the mode flag and the current staff.
#[derive(Debug, Clone)]
pub struct TranscriptionSession {
    transcriber: ChordTranscriber,
    controls: ControlCodes,
    enabled: bool,
    staff: Staff,
    header: String,
    right: String,
    left: String,
}

impl TranscriptionSession {
    pub fn new(controls: ControlCodes, header: impl Into<String>) -> Self {
        Self {
            transcriber: ChordTranscriber::new(),
            controls,
            enabled: false,
            staff: Staff::default(),
            header: header.into(),
            right: String::new(),
            left: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Flip transcription mode and return the new value. Held notes are kept.
    pub fn toggle_transcription(&mut self) -> bool {
        self.enabled = !self.enabled;
        log::debug!(target: "transcribe", "transcription {}", if self.enabled { "on" } else { "off" });
        self.enabled
    }

    pub fn staff(&self) -> Staff {
        self.staff
    }

    pub fn set_staff(&mut self, staff: Staff) {
        self.staff = staff;
    }

    pub fn controls(&self) -> &ControlCodes {
        &self.controls
    }

    pub fn transcriber(&self) -> &ChordTranscriber {
        &self.transcriber
    }

    /// Handle a key press.
    ///
    /// Control codes act whether or not transcription is on. Pitches and
    /// notation keys only reach the buffers while it is on.
    pub fn note_on(&mut self, note: u8) -> SessionEvent {
        if let Some(code) = self.controls.classify(note) {
            return self.apply_control(code);
        }
        if !self.enabled {
            return SessionEvent::None;
        }
        if let Some(token) = SymbolTable::notation(note) {
            return self.append(token.to_string());
        }
        self.transcriber.note_on(note);
        SessionEvent::None
    }

    /// Handle a key release. A chord that completes while transcription is
    /// off is dropped.
    pub fn note_off(&mut self, note: u8) -> SessionEvent {
        match self.transcriber.note_off(note) {
            Some(token) if self.enabled => self.append(token),
            Some(token) => {
                log::debug!(target: "transcribe", "discarded {:?} (transcription off)", token);
                SessionEvent::None
            }
            None => SessionEvent::None,
        }
    }

    /// Commit whatever is held right now; an empty chord commits a rest
    /// placeholder. Does nothing while transcription is off.
    pub fn flush_chord(&mut self) -> SessionEvent {
        if !self.enabled {
            return SessionEvent::None;
        }
        let token = self.transcriber.flush();
        self.append(token)
    }

    /// Forget the held chord, e.g. after an all-notes-off.
    pub fn cancel_chord(&mut self) {
        self.transcriber.cancel();
    }

    fn apply_control(&mut self, code: ControlCode) -> SessionEvent {
        match code {
            ControlCode::LeftStaff => {
                self.staff = Staff::Left;
                SessionEvent::StaffChanged(Staff::Left)
            }
            ControlCode::RightStaff => {
                self.staff = Staff::Right;
                SessionEvent::StaffChanged(Staff::Right)
            }
            ControlCode::ToggleTranscription => SessionEvent::ModeChanged(self.toggle_transcription()),
            ControlCode::Render => SessionEvent::RenderRequested,
        }
    }

    fn append(&mut self, token: String) -> SessionEvent {
        let staff = self.staff;
        self.buffer_mut(staff).push_str(&token);
        log::debug!(target: "transcribe", "{:?} += {:?}", staff, token);
        SessionEvent::Committed { staff, token }
    }

    pub fn buffer(&self, staff: Staff) -> &str {
        match staff {
            Staff::Left => &self.left,
            Staff::Right => &self.right,
        }
    }

    fn buffer_mut(&mut self, staff: Staff) -> &mut String {
        match staff {
            Staff::Left => &mut self.left,
            Staff::Right => &mut self.right,
        }
    }

    /// Overwrite a staff buffer with user-edited text.
    pub fn replace_buffer(&mut self, staff: Staff, text: &str) {
        let buf = self.buffer_mut(staff);
        buf.clear();
        buf.push_str(text);
    }

    pub fn clear_buffers(&mut self) {
        self.left.clear();
        self.right.clear();
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, header: &str) {
        self.header = header.to_string();
    }
}

impl Default for TranscriptionSession {
    fn default() -> Self {
        Self::new(ControlCodes::default(), "")
    }
}
