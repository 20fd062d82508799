use std::path::{Path, PathBuf};

use serde::Deserialize;

use keyscribe_types::{ControlCodes, Harmony, KeyboardLayout, OscillatorSlot, SynthSettings, Waveform};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    transcription: TranscriptionConfig,
    #[serde(default)]
    synth: SynthConfig,
    #[serde(default)]
    render: RenderConfig,
    #[serde(default)]
    midi: MidiConfig,
    #[serde(default)]
    keyboard: KeyboardConfig,
}

#[derive(Deserialize, Default)]
struct TranscriptionConfig {
    start_enabled: Option<bool>,
    header: Option<String>,
    left_staff_note: Option<u8>,
    right_staff_note: Option<u8>,
    toggle_note: Option<u8>,
    render_note: Option<u8>,
}

#[derive(Deserialize, Default)]
struct SynthConfig {
    master_gain: Option<f32>,
    tuning_a4: Option<f32>,
    #[serde(default)]
    osc1: OscConfig,
    #[serde(default)]
    osc2: OscConfig,
}

#[derive(Deserialize, Default)]
struct OscConfig {
    enabled: Option<bool>,
    waveform: Option<String>,
    harmony: Option<String>,
    detune_hz: Option<f32>,
}

#[derive(Deserialize, Default)]
struct RenderConfig {
    output_path: Option<String>,
    command: Option<String>,
}

#[derive(Deserialize, Default)]
struct MidiConfig {
    port: Option<String>,
    auto_connect: Option<bool>,
}

#[derive(Deserialize, Default)]
struct KeyboardConfig {
    layout: Option<String>,
    octave: Option<i8>,
}

pub struct Config {
    transcription: TranscriptionConfig,
    synth: SynthConfig,
    render: RenderConfig,
    midi: MidiConfig,
    keyboard: KeyboardConfig,
}

impl Config {
    /// Embedded defaults overlaid with `~/.config/keyscribe/config.toml`.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Embedded defaults overlaid with the file at `user_path`, if it exists.
    /// An unreadable or malformed user file is logged and skipped.
    pub fn load_from(user_path: Option<&Path>) -> Self {
        let mut base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::error!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        });

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => merge_file(&mut base, user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            transcription: base.transcription,
            synth: base.synth,
            render: base.render,
            midi: base.midi,
            keyboard: base.keyboard,
        }
    }

    pub fn controls(&self) -> ControlCodes {
        let fallback = ControlCodes::default();
        let t = &self.transcription;
        ControlCodes {
            left_staff: t.left_staff_note.unwrap_or(fallback.left_staff),
            right_staff: t.right_staff_note.unwrap_or(fallback.right_staff),
            toggle_transcription: t.toggle_note.unwrap_or(fallback.toggle_transcription),
            render: t.render_note.unwrap_or(fallback.render),
        }
    }

    pub fn start_enabled(&self) -> bool {
        self.transcription.start_enabled.unwrap_or(false)
    }

    pub fn header(&self) -> String {
        self.transcription.header.clone().unwrap_or_default()
    }

    pub fn synth(&self) -> SynthSettings {
        let fallback = SynthSettings::default();
        SynthSettings {
            slots: [
                osc_slot(&self.synth.osc1, fallback.slots[0]),
                osc_slot(&self.synth.osc2, fallback.slots[1]),
            ],
            master_gain: self
                .synth
                .master_gain
                .unwrap_or(fallback.master_gain)
                .clamp(0.0, 1.0),
            tuning_a4: self
                .synth
                .tuning_a4
                .filter(|a4| *a4 > 0.0)
                .unwrap_or(fallback.tuning_a4),
        }
    }

    /// Target file for rendered scores.
    pub fn render_path(&self) -> PathBuf {
        match self.render.output_path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => default_render_path(),
        }
    }

    pub fn render_command(&self) -> Option<String> {
        self.render
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    pub fn midi_port_pattern(&self) -> Option<String> {
        self.midi
            .port
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
    }

    pub fn midi_auto_connect(&self) -> bool {
        self.midi.auto_connect.unwrap_or(true)
    }

    pub fn keyboard_layout(&self) -> KeyboardLayout {
        self.keyboard
            .layout
            .as_deref()
            .and_then(parse_keyboard_layout)
            .unwrap_or_default()
    }

    /// Starting octave of the computer keyboard piano (clamped to 2..6).
    pub fn keyboard_octave(&self) -> i8 {
        self.keyboard.octave.unwrap_or(4).clamp(2, 6)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keyscribe").join("config.toml"))
}

fn default_render_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("keyscribe"))
        .unwrap_or_else(std::env::temp_dir)
        .join("score.abc")
}

fn osc_slot(cfg: &OscConfig, fallback: OscillatorSlot) -> OscillatorSlot {
    OscillatorSlot {
        enabled: cfg.enabled.unwrap_or(fallback.enabled),
        waveform: cfg
            .waveform
            .as_deref()
            .and_then(parse_waveform)
            .unwrap_or(fallback.waveform),
        harmony: cfg
            .harmony
            .as_deref()
            .and_then(parse_harmony)
            .unwrap_or(fallback.harmony),
        detune_hz: cfg.detune_hz.unwrap_or(fallback.detune_hz),
    }
}

fn merge_file(base: &mut ConfigFile, user: ConfigFile) {
    merge_transcription(&mut base.transcription, user.transcription);
    merge_synth(&mut base.synth, user.synth);
    merge_render(&mut base.render, user.render);
    merge_midi(&mut base.midi, user.midi);
    merge_keyboard(&mut base.keyboard, user.keyboard);
}

fn merge_transcription(base: &mut TranscriptionConfig, user: TranscriptionConfig) {
    if user.start_enabled.is_some() {
        base.start_enabled = user.start_enabled;
    }
    if user.header.is_some() {
        base.header = user.header;
    }
    if user.left_staff_note.is_some() {
        base.left_staff_note = user.left_staff_note;
    }
    if user.right_staff_note.is_some() {
        base.right_staff_note = user.right_staff_note;
    }
    if user.toggle_note.is_some() {
        base.toggle_note = user.toggle_note;
    }
    if user.render_note.is_some() {
        base.render_note = user.render_note;
    }
}

fn merge_synth(base: &mut SynthConfig, user: SynthConfig) {
    if user.master_gain.is_some() {
        base.master_gain = user.master_gain;
    }
    if user.tuning_a4.is_some() {
        base.tuning_a4 = user.tuning_a4;
    }
    merge_osc(&mut base.osc1, user.osc1);
    merge_osc(&mut base.osc2, user.osc2);
}

fn merge_osc(base: &mut OscConfig, user: OscConfig) {
    if user.enabled.is_some() {
        base.enabled = user.enabled;
    }
    if user.waveform.is_some() {
        base.waveform = user.waveform;
    }
    if user.harmony.is_some() {
        base.harmony = user.harmony;
    }
    if user.detune_hz.is_some() {
        base.detune_hz = user.detune_hz;
    }
}

fn merge_render(base: &mut RenderConfig, user: RenderConfig) {
    if user.output_path.is_some() {
        base.output_path = user.output_path;
    }
    if user.command.is_some() {
        base.command = user.command;
    }
}

fn merge_midi(base: &mut MidiConfig, user: MidiConfig) {
    if user.port.is_some() {
        base.port = user.port;
    }
    if user.auto_connect.is_some() {
        base.auto_connect = user.auto_connect;
    }
}

fn merge_keyboard(base: &mut KeyboardConfig, user: KeyboardConfig) {
    if user.layout.is_some() {
        base.layout = user.layout;
    }
    if user.octave.is_some() {
        base.octave = user.octave;
    }
}

fn parse_waveform(s: &str) -> Option<Waveform> {
    match s.to_lowercase().as_str() {
        "sine" | "sin" => Some(Waveform::Sine),
        "square" | "sqr" => Some(Waveform::Square),
        "sawtooth" | "saw" => Some(Waveform::Sawtooth),
        "triangle" | "tri" => Some(Waveform::Triangle),
        _ => None,
    }
}

fn parse_harmony(s: &str) -> Option<Harmony> {
    match s.to_lowercase().as_str() {
        "unison" | "none" => Some(Harmony::Unison),
        "fifth_up" | "5th_up" => Some(Harmony::FifthUp),
        "fifth_down" | "5th_down" => Some(Harmony::FifthDown),
        "octave_up" => Some(Harmony::OctaveUp),
        "octave_down" => Some(Harmony::OctaveDown),
        "third_up" | "3rd_up" => Some(Harmony::ThirdUp),
        "third_down" | "3rd_down" => Some(Harmony::ThirdDown),
        _ => None,
    }
}

fn parse_keyboard_layout(s: &str) -> Option<KeyboardLayout> {
    match s.to_lowercase().as_str() {
        "qwerty" => Some(KeyboardLayout::Qwerty),
        "colemak" => Some(KeyboardLayout::Colemak),
        _ => None,
    }
}
