// Re-export core crate modules so crate::state, crate::audio, etc. resolve throughout the binary
pub use keyscribe_core::action;
pub use keyscribe_core::audio;
pub use keyscribe_core::config;
pub use keyscribe_core::dispatch;
pub use keyscribe_core::midi;
pub use keyscribe_core::render;
pub use keyscribe_core::state;
pub use keyscribe_core::transcribe;

mod global_actions;
mod panes;
mod runtime;
mod ui;

use std::collections::HashMap;
use std::fs::File;

use panes::{HelpPane, MidiPane, ScorePane, SynthPane};
use runtime::StartupOptions;
use ui::{Keymap, PaneManager, RatatuiBackend};

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("keyscribe")
        .join("keyscribe.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/keyscribe.log")) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("keyscribe: cannot create log file: {}", e);
            return;
        }
    };

    if let Err(e) = WriteLogger::init(log_level, Config::default(), log_file) {
        eprintln!("keyscribe: failed to initialize logger: {}", e);
        return;
    }

    log::info!("keyscribe starting (log level: {:?})", log_level);
}

fn print_usage() {
    println!("Usage: keyscribe [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -v, --verbose      Debug logging");
    println!("      --list-ports   List MIDI input ports and exit");
    println!("      --port <N>     Open MIDI input port N");
    println!("      --no-audio     Run without sound (also KEYSCRIBE_NO_AUDIO=1)");
    println!("      --transcribe   Start with transcription on");
    println!("  -h, --help         Show this help");
}

fn list_ports() {
    let mut midi_input = midi::MidiInputManager::new();
    midi_input.refresh_ports();
    let ports = midi_input.list_ports();
    if ports.is_empty() {
        println!("No MIDI input ports found");
    }
    for port in ports {
        println!("{}: {}", port.index, port.name);
    }
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    if args.iter().any(|a| a == "--list-ports") {
        list_ports();
        return Ok(());
    }

    let port = match args.iter().position(|a| a == "--port") {
        Some(i) => match args.get(i + 1).and_then(|s| s.parse::<usize>().ok()) {
            Some(n) => Some(n),
            None => {
                eprintln!("--port needs a port index (see --list-ports)");
                std::process::exit(2);
            }
        },
        None => None,
    };

    let options = StartupOptions {
        port,
        no_audio: args.iter().any(|a| a == "--no-audio")
            || std::env::var("KEYSCRIBE_NO_AUDIO").is_ok_and(|v| !v.is_empty() && v != "0"),
        transcribe: args.iter().any(|a| a == "--transcribe"),
    };

    let mut backend = RatatuiBackend::new()?;
    backend.start()?;

    let result = runtime::run(&mut backend, &options);

    backend.stop()?;
    result
}

pub(crate) fn pane_keymap(keymaps: &mut HashMap<String, Keymap>, id: &str) -> Keymap {
    keymaps.remove(id).unwrap_or_else(Keymap::new)
}

pub(crate) fn register_all_panes(keymaps: &mut HashMap<String, Keymap>, config: &config::Config) -> PaneManager {
    let score = ScorePane::new(
        pane_keymap(keymaps, "score"),
        config.keyboard_layout(),
        config.keyboard_octave(),
    );
    let mut panes = PaneManager::new(Box::new(score));
    panes.add_pane(Box::new(SynthPane::new(pane_keymap(keymaps, "synth"))));
    panes.add_pane(Box::new(MidiPane::new(pane_keymap(keymaps, "midi"))));
    panes.add_pane(Box::new(HelpPane::new(pane_keymap(keymaps, "help"))));
    panes
}
