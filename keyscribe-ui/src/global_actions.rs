use crate::action::{DispatchResult, MidiAction, StatusLevel};
use crate::audio::AudioHandle;
use crate::midi::{MidiInputManager, PortChanges};
use crate::panes::HelpPane;
use crate::state::AppState;
use crate::ui::action_id::{ActionId, GlobalActionId};
use crate::ui::{Action, LayerStack, PaneManager, StatusBar};

pub(crate) enum GlobalResult {
    Quit,
    Handled,
    NotHandled,
    /// Actions for the runtime to dispatch, in order.
    Dispatch(Vec<Action>),
}

/// Handle actions that work from every pane. Anything else goes to the pane.
pub(crate) fn handle_global_action(
    action: ActionId,
    state: &AppState,
    panes: &mut PaneManager,
    layer_stack: &mut LayerStack,
) -> GlobalResult {
    let ActionId::Global(global) = action else {
        return GlobalResult::NotHandled;
    };
    match global {
        GlobalActionId::Quit => GlobalResult::Quit,
        GlobalActionId::ToggleTranscription => GlobalResult::Dispatch(vec![Action::ToggleTranscription]),
        GlobalActionId::Render => GlobalResult::Dispatch(vec![Action::Render]),
        GlobalActionId::Panic => {
            // Forget piano keys first so their timeouts don't fire later
            panes.release_all();
            GlobalResult::Dispatch(vec![Action::AllNotesOff])
        }
        GlobalActionId::Score => switch_pane("score", state, panes, layer_stack),
        GlobalActionId::Synth => switch_pane("synth", state, panes, layer_stack),
        GlobalActionId::Midi => switch_pane("midi", state, panes, layer_stack),
        GlobalActionId::Help => {
            if panes.active().id() == "help" {
                panes.pop(state);
                sync_pane_layer(panes, layer_stack);
                return GlobalResult::Handled;
            }
            let from = panes.active().id();
            let mut entries = layer_stack.describe(from);
            entries.extend(layer_stack.describe("global"));
            let releases = panes.active_mut().release_all();
            if let Some(help) = panes.get_pane_mut::<HelpPane>("help") {
                help.set_context(from, entries);
            }
            panes.push_to("help", state);
            sync_pane_layer(panes, layer_stack);
            dispatch_or_handled(releases)
        }
    }
}

fn switch_pane(
    id: &'static str,
    state: &AppState,
    panes: &mut PaneManager,
    layer_stack: &mut LayerStack,
) -> GlobalResult {
    if panes.active().id() == id {
        return GlobalResult::Handled;
    }
    let releases = panes.active_mut().release_all();
    panes.switch_to(id, state);
    sync_pane_layer(panes, layer_stack);
    dispatch_or_handled(releases)
}

fn dispatch_or_handled(actions: Vec<Action>) -> GlobalResult {
    if actions.is_empty() {
        GlobalResult::Handled
    } else {
        GlobalResult::Dispatch(actions)
    }
}

/// Keep the pane layer in step with the active pane; drop text editing
/// once the pane no longer has a focused field.
pub(crate) fn sync_pane_layer(panes: &mut PaneManager, layer_stack: &mut LayerStack) {
    layer_stack.set_pane_layer(panes.active().id());
    if layer_stack.has_layer("text_edit") && !panes.active().wants_text_input() {
        layer_stack.pop("text_edit");
    }
}

/// Carry out the side effects of a dispatch. Returns true if the app should quit.
pub(crate) fn apply_dispatch_result(
    result: DispatchResult,
    state: &mut AppState,
    panes: &mut PaneManager,
    status_bar: &mut StatusBar,
    audio: &AudioHandle,
    midi_input: &mut MidiInputManager,
) -> bool {
    audio.apply(&result.audio);
    for event in result.status {
        status_bar.push(event.message, event.level);
    }
    if let Some(midi) = result.midi {
        apply_midi_action(midi, state, midi_input, status_bar);
    }
    panes.sync_all(state);
    result.quit
}

/// Port operations need the MidiInputManager, so they run here rather than in dispatch.
pub(crate) fn apply_midi_action(
    action: MidiAction,
    state: &mut AppState,
    midi_input: &mut MidiInputManager,
    status_bar: &mut StatusBar,
) {
    match action {
        MidiAction::RefreshPorts => {
            midi_input.refresh_ports();
            let count = midi_input.list_ports().len();
            status_bar.push(format!("{} MIDI port(s) found", count), StatusLevel::Info);
        }
        MidiAction::ConnectPort(index) => {
            midi_input.refresh_ports();
            match midi_input.connect(index) {
                Ok(()) => {
                    let name = midi_input.connected_port_name().unwrap_or("port");
                    status_bar.push(format!("Connected to {}", name), StatusLevel::Info);
                }
                Err(e) => {
                    log::warn!(target: "midi", "connect to port {} failed: {}", index, e);
                    status_bar.push(format!("MIDI connect failed: {}", e), StatusLevel::Error);
                }
            }
        }
        MidiAction::DisconnectPort => {
            midi_input.disconnect();
            status_bar.push("MIDI disconnected", StatusLevel::Info);
        }
    }
    sync_midi_state(state, midi_input);
}

/// Show controllers that were plugged in or removed since the last scan.
pub(crate) fn report_port_changes(changes: &PortChanges, status_bar: &mut StatusBar) {
    for name in &changes.removed {
        status_bar.push(format!("MIDI device removed: {}", name), StatusLevel::Warning);
    }
    for name in &changes.added {
        status_bar.push(format!("MIDI device connected: {}", name), StatusLevel::Info);
    }
}

pub(crate) fn sync_midi_state(state: &mut AppState, midi_input: &MidiInputManager) {
    state.midi.port_names = midi_input.list_ports().iter().map(|p| p.name.clone()).collect();
    state.midi.connected_port = midi_input.connected_port_name().map(|s| s.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ui::action_id::GlobalActionId;
    use crate::ui::{keybindings, InputEvent, KeyCode, Modifiers};

    fn setup() -> (AppState, PaneManager, LayerStack) {
        let (layers, mut keymaps) = keybindings::load_keybindings_from(None);
        let config = Config::load_from(None);
        let panes = crate::register_all_panes(&mut keymaps, &config);
        let mut layer_stack = LayerStack::new(layers);
        layer_stack.push("global");
        layer_stack.set_pane_layer(panes.active().id());
        (AppState::from_config(&config), panes, layer_stack)
    }

    fn global(id: GlobalActionId) -> ActionId {
        ActionId::Global(id)
    }

    #[test]
    fn port_changes_reach_status_bar() {
        let mut status_bar = StatusBar::new();
        report_port_changes(&PortChanges::default(), &mut status_bar);
        assert!(status_bar.current().is_none());

        let changes = PortChanges {
            added: vec!["nanoKEY2".to_string()],
            removed: vec![],
        };
        report_port_changes(&changes, &mut status_bar);
        let current = status_bar.current().unwrap();
        assert_eq!(current.text, "MIDI device connected: nanoKEY2");
        assert_eq!(current.level, StatusLevel::Info);
    }

    #[test]
    fn switching_panes_moves_pane_layer() {
        let (state, mut panes, mut stack) = setup();
        assert!(stack.has_layer("score"));
        let result = handle_global_action(global(GlobalActionId::Synth), &state, &mut panes, &mut stack);
        assert!(matches!(result, GlobalResult::Handled));
        assert_eq!(panes.active().id(), "synth");
        assert!(stack.has_layer("synth"));
        assert!(!stack.has_layer("score"));
    }

    #[test]
    fn leaving_score_releases_piano_keys() {
        let (state, mut panes, mut stack) = setup();
        let key = InputEvent::new(KeyCode::Char('a'), Modifiers::none());
        assert_eq!(panes.active_mut().handle_raw_input(&key, &state), Action::NoteOn(60));
        match handle_global_action(global(GlobalActionId::Midi), &state, &mut panes, &mut stack) {
            GlobalResult::Dispatch(actions) => assert_eq!(actions, vec![Action::NoteOff(60)]),
            _ => panic!("expected note-off dispatch"),
        }
        assert_eq!(panes.active().id(), "midi");
    }

    #[test]
    fn help_lists_pane_and_global_bindings() {
        let (state, mut panes, mut stack) = setup();
        handle_global_action(global(GlobalActionId::Help), &state, &mut panes, &mut stack);
        assert_eq!(panes.active().id(), "help");
        assert!(stack.has_layer("help"));
        assert!(panes.pop(&state));
        assert_eq!(panes.active().id(), "score");
    }

    #[test]
    fn transcription_and_render_are_dispatched() {
        let (state, mut panes, mut stack) = setup();
        let toggle = handle_global_action(global(GlobalActionId::ToggleTranscription), &state, &mut panes, &mut stack);
        assert!(matches!(toggle, GlobalResult::Dispatch(ref a) if a == &vec![Action::ToggleTranscription]));
        let render = handle_global_action(global(GlobalActionId::Render), &state, &mut panes, &mut stack);
        assert!(matches!(render, GlobalResult::Dispatch(ref a) if a == &vec![Action::Render]));
    }

    #[test]
    fn pane_actions_are_not_global() {
        let (state, mut panes, mut stack) = setup();
        let id = ActionId::Score(crate::ui::action_id::ScoreActionId::FlushChord);
        assert!(matches!(
            handle_global_action(id, &state, &mut panes, &mut stack),
            GlobalResult::NotHandled
        ));
    }
}
