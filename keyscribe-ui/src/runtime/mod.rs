//! App runtime coordinator.
//!
//! - `input`: event polling, layer resolution, global handler, pane dispatch
//! - `feedback`: audio feedback and MIDI event draining
//! - `render`: frame throttle and drawing

mod feedback;
mod input;
mod render;

use std::time::Instant;

use crate::action::StatusLevel;
use crate::audio::AudioHandle;
use crate::config::Config;
use crate::dispatch::dispatch_action;
use crate::global_actions::{apply_dispatch_result, sync_midi_state};
use crate::midi::MidiInputManager;
use crate::panes::ScorePane;
use crate::render::FileRenderer;
use crate::state::AppState;
use crate::ui::{keybindings, Action, LayerStack, PaneManager, RatatuiBackend, StatusBar};

/// Flags from the command line that shape startup.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// MIDI port index to open instead of the configured one.
    pub port: Option<usize>,
    pub no_audio: bool,
    /// Start with transcription on regardless of config.
    pub transcribe: bool,
}

/// Top-level runtime that owns all application state and drives the event loop.
pub struct AppRuntime {
    pub(crate) state: AppState,
    pub(crate) renderer: FileRenderer,
    pub(crate) audio: AudioHandle,
    pub(crate) midi_input: MidiInputManager,
    pub(crate) panes: PaneManager,
    pub(crate) layer_stack: LayerStack,
    pub(crate) status_bar: StatusBar,

    // Per-frame state
    pub(crate) render_needed: bool,
    pub(crate) last_render_time: Instant,
    pub(crate) last_area: ratatui::layout::Rect,
    pub(crate) last_port_scan: Instant,
}

impl AppRuntime {
    pub fn new(options: &StartupOptions) -> Self {
        let config = Config::load();
        let mut state = AppState::from_config(&config);
        if options.transcribe {
            state.session.set_enabled(true);
        }
        let renderer = FileRenderer::new(state.render_path.clone(), config.render_command());

        let (layers, mut keymaps) = keybindings::load_keybindings();
        let mut panes = crate::register_all_panes(&mut keymaps, &config);

        let mut layer_stack = LayerStack::new(layers);
        layer_stack.push("global");
        layer_stack.set_pane_layer(panes.active().id());

        let mut status_bar = StatusBar::new();

        let audio = if options.no_audio {
            log::info!(target: "audio", "audio disabled");
            status_bar.push("Audio disabled", StatusLevel::Warning);
            AudioHandle::disabled()
        } else {
            AudioHandle::new(state.synth.master_gain)
        };

        let mut midi_input = MidiInputManager::new();
        midi_input.refresh_ports();
        if let Some(index) = startup_port(options, &config, &midi_input) {
            if let Err(e) = midi_input.connect(index) {
                log::warn!(target: "midi", "could not open port {}: {}", index, e);
                status_bar.push(format!("MIDI connect failed: {}", e), StatusLevel::Error);
            }
        }
        if !midi_input.is_connected() {
            status_bar.push("No MIDI input, play with the keyboard (a-k)", StatusLevel::Info);
        }
        sync_midi_state(&mut state, &midi_input);
        panes.sync_all(&state);

        Self {
            state,
            renderer,
            audio,
            midi_input,
            panes,
            layer_stack,
            status_bar,
            render_needed: true,
            last_render_time: Instant::now(),
            last_area: ratatui::layout::Rect::new(0, 0, 80, 24),
            last_port_scan: Instant::now(),
        }
    }

    /// Main event loop.
    pub fn run(&mut self, backend: &mut RatatuiBackend) -> std::io::Result<()> {
        loop {
            if self.process_events(backend)? {
                break;
            }

            self.process_tick();
            self.drain_audio_feedback();
            if self.drain_midi_events() {
                break;
            }
            self.maybe_render(backend)?;
        }
        self.audio.stop_all();
        Ok(())
    }

    /// Dispatch one action and apply its side effects. Returns true to quit.
    pub(crate) fn dispatch(&mut self, action: &Action) -> bool {
        if *action == Action::None {
            return false;
        }
        let result = dispatch_action(action, &mut self.state, &mut self.renderer);
        self.render_needed = true;
        apply_dispatch_result(
            result,
            &mut self.state,
            &mut self.panes,
            &mut self.status_bar,
            &self.audio,
            &mut self.midi_input,
        )
    }
}

/// Port to open at startup: `--port`, then the configured name pattern,
/// then the first port when auto-connect is on.
fn startup_port(options: &StartupOptions, config: &Config, midi_input: &MidiInputManager) -> Option<usize> {
    if let Some(index) = options.port {
        return Some(index);
    }
    if !config.midi_auto_connect() {
        return None;
    }
    if let Some(pattern) = config.midi_port_pattern() {
        match midi_input.find_port(&pattern) {
            Some(index) => return Some(index),
            None => log::warn!(target: "midi", "no port matches '{}'", pattern),
        }
    }
    (!midi_input.list_ports().is_empty()).then_some(0)
}

/// Public entry point.
pub fn run(backend: &mut RatatuiBackend, options: &StartupOptions) -> std::io::Result<()> {
    let mut runtime = AppRuntime::new(options);

    // Real key releases let the piano hold notes for as long as keys are down
    if backend.keyboard_enhancement_enabled() {
        if let Some(p) = runtime.panes.get_pane_mut::<ScorePane>("score") {
            p.set_enhanced_keyboard(true);
        }
    }

    runtime.run(backend)
}
