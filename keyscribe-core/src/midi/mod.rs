use midir::{MidiInput, MidiInputConnection};
use std::sync::mpsc::{self, Receiver};

const CLIENT_NAME: &str = "keyscribe";

/// A parsed MIDI message with the driver timestamp it arrived with.
/// Timestamp is in microseconds from a driver-specific epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEvent {
    pub timestamp_us: u64,
    pub kind: MidiEventKind,
}

/// The specific type of MIDI event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidiEventKind {
    NoteOn {
        channel: u8,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: u8,
        note: u8,
    },
    ControlChange {
        channel: u8,
        controller: u8,
        value: u8,
    },
    PitchBend {
        channel: u8,
        /// Pitch bend value: -8192 (full down) to +8191 (full up), 0 = center
        value: i16,
    },
    ProgramChange {
        channel: u8,
        program: u8,
    },
    Aftertouch {
        channel: u8,
        pressure: u8,
    },
    PolyAftertouch {
        channel: u8,
        note: u8,
        pressure: u8,
    },
}

impl MidiEvent {
    pub fn new(timestamp_us: u64, kind: MidiEventKind) -> Self {
        Self { timestamp_us, kind }
    }

    pub fn note_on(note: u8, velocity: u8) -> Self {
        Self::new(
            0,
            MidiEventKind::NoteOn {
                channel: 0,
                note,
                velocity,
            },
        )
    }

    pub fn note_off(note: u8) -> Self {
        Self::new(0, MidiEventKind::NoteOff { channel: 0, note })
    }
}

/// Information about an available MIDI port
#[derive(Debug, Clone)]
pub struct MidiPortInfo {
    pub index: usize,
    pub name: String,
}

/// Port names that appeared or went away between two scans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl PortChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn diff_ports(before: &[String], after: &[String]) -> PortChanges {
    PortChanges {
        added: after.iter().filter(|n| !before.contains(n)).cloned().collect(),
        removed: before.iter().filter(|n| !after.contains(n)).cloned().collect(),
    }
}

/// MIDI input manager.
///
/// midir invokes the callback on its own thread; messages are parsed there
/// and queued on a channel for the main loop to drain with `poll_events`.
pub struct MidiInputManager {
    midi_in: Option<MidiInput>,
    connection: Option<MidiInputConnection<()>>,
    event_receiver: Option<Receiver<MidiEvent>>,
    connected_port_name: Option<String>,
    available_ports: Vec<MidiPortInfo>,
}

impl MidiInputManager {
    pub fn new() -> Self {
        let midi_in = match MidiInput::new(CLIENT_NAME) {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!(target: "midi", "MIDI input unavailable: {}", e);
                None
            }
        };
        Self {
            midi_in,
            connection: None,
            event_receiver: None,
            connected_port_name: None,
            available_ports: Vec::new(),
        }
    }

    /// Refresh the list of available MIDI input ports
    pub fn refresh_ports(&mut self) {
        self.available_ports.clear();

        if let Some(ref midi_in) = self.midi_in {
            let ports = midi_in.ports();
            for (index, port) in ports.iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    self.available_ports.push(MidiPortInfo { index, name });
                }
            }
        }
    }

    /// Refresh the port list and report what changed since the last scan.
    /// midir has no hot-plug notification, so the runtime calls this
    /// periodically. A connection whose port went away is closed.
    pub fn rescan_ports(&mut self) -> PortChanges {
        let before = self.port_names();
        self.refresh_ports();
        let changes = diff_ports(&before, &self.port_names());
        for name in &changes.added {
            log::info!(target: "midi", "port appeared: {}", name);
        }
        for name in &changes.removed {
            log::info!(target: "midi", "port went away: {}", name);
        }
        let lost = self
            .connected_port_name
            .as_ref()
            .is_some_and(|name| changes.removed.contains(name));
        if lost {
            self.disconnect();
        }
        changes
    }

    fn port_names(&self) -> Vec<String> {
        self.available_ports.iter().map(|p| p.name.clone()).collect()
    }

    pub fn list_ports(&self) -> &[MidiPortInfo] {
        &self.available_ports
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn connected_port_name(&self) -> Option<&str> {
        self.connected_port_name.as_deref()
    }

    /// Index of the first port whose name contains `pattern` (case-insensitive).
    pub fn find_port(&self, pattern: &str) -> Option<usize> {
        let pattern = pattern.to_lowercase();
        self.available_ports
            .iter()
            .find(|p| p.name.to_lowercase().contains(&pattern))
            .map(|p| p.index)
    }

    /// Connect to a MIDI input port by index
    pub fn connect(&mut self, port_index: usize) -> Result<(), String> {
        self.disconnect();

        // midir consumes the MidiInput on connect, so open a fresh one
        let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| e.to_string())?;
        let ports = midi_in.ports();

        let port = ports
            .get(port_index)
            .ok_or_else(|| format!("Invalid port index: {}", port_index))?;
        let port_name = midi_in
            .port_name(port)
            .unwrap_or_else(|_| "Unknown".to_string());

        let (tx, rx) = mpsc::channel();
        self.event_receiver = Some(rx);

        let connection = midi_in
            .connect(
                port,
                "keyscribe-input",
                move |timestamp, message, _| {
                    if let Some(kind) = parse_midi_message(message) {
                        let _ = tx.send(MidiEvent::new(timestamp, kind));
                    }
                },
                (),
            )
            .map_err(|e| e.to_string())?;

        log::info!(target: "midi", "connected to {}", port_name);
        self.connection = Some(connection);
        self.connected_port_name = Some(port_name);

        if self.midi_in.is_none() {
            self.midi_in = MidiInput::new(CLIENT_NAME).ok();
        }

        Ok(())
    }

    /// Disconnect from the current MIDI input port
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.connection.take() {
            conn.close();
            if let Some(name) = self.connected_port_name.as_deref() {
                log::info!(target: "midi", "disconnected from {}", name);
            }
        }
        self.event_receiver = None;
        self.connected_port_name = None;
    }

    /// Poll for pending MIDI events (non-blocking)
    pub fn poll_events(&self) -> Vec<MidiEvent> {
        let mut events = Vec::new();
        if let Some(ref rx) = self.event_receiver {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }
}

impl Default for MidiInputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MidiInputManager {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Parse a raw MIDI message into a MidiEventKind.
///
/// Messages shorter than their kind requires (e.g. a two-byte note-on) are
/// rejected rather than read past the end.
pub fn parse_midi_message(data: &[u8]) -> Option<MidiEventKind> {
    let (&status, data) = data.split_first()?;
    let channel = status & 0x0F;

    let kind = match (status & 0xF0, data) {
        (0x80, &[note, _, ..]) | (0x90, &[note, 0, ..]) => MidiEventKind::NoteOff { channel, note },
        (0x90, &[note, velocity, ..]) => MidiEventKind::NoteOn {
            channel,
            note,
            velocity,
        },
        (0xA0, &[note, pressure, ..]) => MidiEventKind::PolyAftertouch {
            channel,
            note,
            pressure,
        },
        (0xB0, &[controller, value, ..]) => MidiEventKind::ControlChange {
            channel,
            controller,
            value,
        },
        (0xC0, &[program, ..]) => MidiEventKind::ProgramChange { channel, program },
        (0xD0, &[pressure, ..]) => MidiEventKind::Aftertouch { channel, pressure },
        (0xE0, &[lsb, msb, ..]) => MidiEventKind::PitchBend {
            channel,
            value: (((msb as i16) << 7) | lsb as i16) - 8192,
        },
        // System messages (clock, active sensing, sysex) and truncated data
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn diff_reports_added_and_removed_ports() {
        let before = names(&["Midi Through", "Keystation 49"]);
        let after = names(&["Midi Through", "nanoKEY2"]);
        let changes = diff_ports(&before, &after);
        assert_eq!(changes.added, names(&["nanoKEY2"]));
        assert_eq!(changes.removed, names(&["Keystation 49"]));
        assert!(!changes.is_empty());
    }

    #[test]
    fn unchanged_ports_diff_empty() {
        let ports = names(&["Midi Through"]);
        assert!(diff_ports(&ports, &ports).is_empty());
        assert!(diff_ports(&[], &[]).is_empty());
    }

    #[test]
    fn test_parse_note_on() {
        let data = [144, 60, 100];
        let event = parse_midi_message(&data).unwrap();
        assert_eq!(
            event,
            MidiEventKind::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            }
        );
    }

    #[test]
    fn test_parse_note_off() {
        let data = [128, 60, 64];
        let event = parse_midi_message(&data).unwrap();
        assert_eq!(event, MidiEventKind::NoteOff { channel: 0, note: 60 });
    }

    #[test]
    fn test_parse_note_on_velocity_zero() {
        let data = [144, 60, 0];
        let event = parse_midi_message(&data).unwrap();
        assert!(matches!(event, MidiEventKind::NoteOff { note: 60, .. }));
    }

    #[test]
    fn test_parse_note_on_other_channel() {
        let data = [0x93, 48, 90];
        match parse_midi_message(&data).unwrap() {
            MidiEventKind::NoteOn { channel, note, .. } => {
                assert_eq!(channel, 3);
                assert_eq!(note, 48);
            }
            other => panic!("Expected NoteOn, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_channel_aftertouch_two_bytes() {
        // 208 carries only a pressure byte
        let data = [208, 40];
        let event = parse_midi_message(&data).unwrap();
        assert_eq!(
            event,
            MidiEventKind::Aftertouch {
                channel: 0,
                pressure: 40
            }
        );
    }

    #[test]
    fn test_parse_pitch_bend() {
        let event = parse_midi_message(&[0xE0, 0x00, 0x40]).unwrap();
        assert_eq!(event, MidiEventKind::PitchBend { channel: 0, value: 0 });

        let event = parse_midi_message(&[0xE0, 0x7F, 0x7F]).unwrap();
        assert_eq!(event, MidiEventKind::PitchBend { channel: 0, value: 8191 });

        let event = parse_midi_message(&[0xE0, 0x00, 0x00]).unwrap();
        assert_eq!(event, MidiEventKind::PitchBend { channel: 0, value: -8192 });
    }

    #[test]
    fn test_parse_empty_message_returns_none() {
        assert!(parse_midi_message(&[]).is_none());
    }

    #[test]
    fn test_parse_short_messages_return_none() {
        assert!(parse_midi_message(&[0x90, 60]).is_none());
        assert!(parse_midi_message(&[0x80]).is_none());
        assert!(parse_midi_message(&[0xB0, 1]).is_none());
    }

    #[test]
    fn test_parse_system_messages_return_none() {
        assert!(parse_midi_message(&[248]).is_none());
        assert!(parse_midi_message(&[254]).is_none());
        assert!(parse_midi_message(&[0xF0, 0x01, 0x02]).is_none());
    }
}
