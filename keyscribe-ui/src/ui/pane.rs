use std::any::Any;

use super::action_id::ActionId;
use super::{InputEvent, Keymap, MouseEvent, Rect, RenderBuf};
use crate::state::AppState;

pub use crate::action::{Action, MidiAction, NavAction, SynthAction};

/// Trait for UI panes (screens/views).
pub trait Pane {
    /// Unique identifier for this pane
    fn id(&self) -> &'static str;

    /// Handle a resolved action ID from the layer system
    fn handle_action(&mut self, action: ActionId, event: &InputEvent, state: &AppState) -> Action;

    /// Handle raw input when layers resolved to Blocked or Unresolved
    fn handle_raw_input(&mut self, _event: &InputEvent, _state: &AppState) -> Action {
        Action::None
    }

    /// Handle a key release. Only called when the terminal reports releases.
    fn handle_key_release(&mut self, _event: &InputEvent, _state: &AppState) -> Action {
        Action::None
    }

    /// Handle mouse input. Area is the full pane area (same as render receives).
    fn handle_mouse(&mut self, _event: &MouseEvent, _area: Rect, _state: &AppState) -> Action {
        Action::None
    }

    /// Render the pane to the buffer
    fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState);

    /// Get the keymap for this pane (for introspection/help)
    fn keymap(&self) -> &Keymap;

    /// Called when this pane becomes active
    fn on_enter(&mut self, _state: &AppState) {}

    /// Called when this pane becomes inactive
    fn on_exit(&mut self, _state: &AppState) {}

    /// Called each frame to check for time-based state changes (e.g., key release).
    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    /// Release anything this pane is holding down (piano keys).
    fn release_all(&mut self) -> Vec<Action> {
        vec![]
    }

    /// Refresh pane-local copies of state after a dispatch.
    fn sync(&mut self, _state: &AppState) {}

    /// Whether a text field currently has focus.
    fn wants_text_input(&self) -> bool {
        false
    }

    /// Return self as Any for downcasting (required for type-specific access)
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Manages a stack of panes with one active pane
pub struct PaneManager {
    panes: Vec<Box<dyn Pane>>,
    active_index: usize,
    stack: Vec<usize>,
}

impl PaneManager {
    /// Create a new pane manager with an initial pane
    pub fn new(initial_pane: Box<dyn Pane>) -> Self {
        Self {
            panes: vec![initial_pane],
            active_index: 0,
            stack: Vec::new(),
        }
    }

    /// Add a pane to the manager (does not make it active)
    pub fn add_pane(&mut self, pane: Box<dyn Pane>) {
        self.panes.push(pane);
    }

    pub fn active(&self) -> &dyn Pane {
        self.panes[self.active_index].as_ref()
    }

    pub fn active_mut(&mut self) -> &mut dyn Pane {
        self.panes[self.active_index].as_mut()
    }

    /// Switch to a pane by ID (flat navigation, clears the stack)
    pub fn switch_to(&mut self, id: &str, state: &AppState) -> bool {
        if let Some(index) = self.panes.iter().position(|p| p.id() == id) {
            if index != self.active_index {
                self.panes[self.active_index].on_exit(state);
                self.active_index = index;
                self.panes[self.active_index].on_enter(state);
            }
            self.stack.clear();
            true
        } else {
            false
        }
    }

    /// Push current pane onto the stack and switch to a new pane (for overlays)
    pub fn push_to(&mut self, id: &str, state: &AppState) -> bool {
        if let Some(index) = self.panes.iter().position(|p| p.id() == id) {
            if index == self.active_index {
                return false;
            }
            self.stack.push(self.active_index);
            self.panes[self.active_index].on_exit(state);
            self.active_index = index;
            self.panes[self.active_index].on_enter(state);
            true
        } else {
            false
        }
    }

    /// Pop the stack and return to the previous pane
    pub fn pop(&mut self, state: &AppState) -> bool {
        if let Some(prev_index) = self.stack.pop() {
            self.panes[self.active_index].on_exit(state);
            self.active_index = prev_index;
            self.panes[self.active_index].on_enter(state);
            true
        } else {
            false
        }
    }

    pub fn process_nav(&mut self, nav: NavAction, state: &AppState) {
        match nav {
            NavAction::SwitchPane(id) => {
                self.switch_to(id, state);
            }
            NavAction::PushPane(id) => {
                self.push_to(id, state);
            }
            NavAction::PopPane => {
                self.pop(state);
            }
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        self.panes[self.active_index].render(area, buf, state);
    }

    /// Let every pane pick up state changes, not only the visible one.
    pub fn sync_all(&mut self, state: &AppState) {
        for pane in &mut self.panes {
            pane.sync(state);
        }
    }

    /// Release held keys on every pane.
    pub fn release_all(&mut self) -> Vec<Action> {
        self.panes.iter_mut().flat_map(|p| p.release_all()).collect()
    }

    /// Get a mutable reference to a pane by ID, downcasted to a specific type
    pub fn get_pane_mut<T: 'static>(&mut self, id: &str) -> Option<&mut T> {
        self.panes
            .iter_mut()
            .find(|p| p.id() == id)
            .and_then(|p| p.as_any_mut().downcast_mut::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubPane {
        id: &'static str,
        keymap: Keymap,
        entered: usize,
    }

    impl StubPane {
        fn boxed(id: &'static str) -> Box<dyn Pane> {
            Box::new(Self {
                id,
                keymap: Keymap::new(),
                entered: 0,
            })
        }
    }

    impl Pane for StubPane {
        fn id(&self) -> &'static str {
            self.id
        }
        fn handle_action(&mut self, _action: ActionId, _event: &InputEvent, _state: &AppState) -> Action {
            Action::None
        }
        fn render(&mut self, _area: Rect, _buf: &mut RenderBuf, _state: &AppState) {}
        fn keymap(&self) -> &Keymap {
            &self.keymap
        }
        fn on_enter(&mut self, _state: &AppState) {
            self.entered += 1;
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn manager() -> PaneManager {
        let mut panes = PaneManager::new(StubPane::boxed("score"));
        panes.add_pane(StubPane::boxed("synth"));
        panes.add_pane(StubPane::boxed("help"));
        panes
    }

    #[test]
    fn switch_and_push_pop() {
        let state = AppState::default();
        let mut panes = manager();
        assert!(panes.switch_to("synth", &state));
        assert_eq!(panes.active().id(), "synth");
        assert!(panes.push_to("help", &state));
        assert_eq!(panes.active().id(), "help");
        assert!(panes.pop(&state));
        assert_eq!(panes.active().id(), "synth");
        assert!(!panes.pop(&state));
    }

    #[test]
    fn unknown_pane_is_ignored() {
        let state = AppState::default();
        let mut panes = manager();
        assert!(!panes.switch_to("mixer", &state));
        assert_eq!(panes.active().id(), "score");
    }

    #[test]
    fn switch_clears_stack() {
        let state = AppState::default();
        let mut panes = manager();
        panes.push_to("help", &state);
        panes.process_nav(NavAction::SwitchPane("synth"), &state);
        assert!(!panes.pop(&state));
        assert_eq!(panes.active().id(), "synth");
    }

    #[test]
    fn downcast_by_id() {
        let state = AppState::default();
        let mut panes = manager();
        panes.switch_to("help", &state);
        let help = panes.get_pane_mut::<StubPane>("help");
        assert_eq!(help.map(|p| p.entered), Some(1));
    }
}
