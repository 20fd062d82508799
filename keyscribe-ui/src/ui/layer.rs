use std::collections::HashMap;

use super::action_id::ActionId;
use super::keymap::Keymap;
use super::InputEvent;

/// A named layer with a keymap and transparency setting.
pub struct Layer {
    pub name: &'static str,
    pub keymap: Keymap,
    pub transparent: bool,
}

/// Result of resolving an input event through the layer stack.
#[derive(Debug, PartialEq, Eq)]
pub enum LayerResult {
    Action(ActionId),
    /// An opaque layer stopped the event without matching it.
    Blocked,
    /// Nothing matched and every layer was transparent.
    Unresolved,
}

/// Layers resolved top to bottom: mode layers, then the pane layer, then global.
pub struct LayerStack {
    layers: HashMap<&'static str, Layer>,
    active: Vec<&'static str>, // bottom-to-top
}

impl LayerStack {
    pub fn new(layers: Vec<Layer>) -> Self {
        let map: HashMap<&'static str, Layer> =
            layers.into_iter().map(|l| (l.name, l)).collect();
        Self {
            layers: map,
            active: Vec::new(),
        }
    }

    pub fn resolve(&self, event: &InputEvent) -> LayerResult {
        for name in self.active.iter().rev() {
            if let Some(layer) = self.layers.get(name) {
                if let Some(action) = layer.keymap.lookup(event) {
                    return LayerResult::Action(action);
                }
                if !layer.transparent {
                    return LayerResult::Blocked;
                }
            }
        }
        LayerResult::Unresolved
    }

    pub fn push(&mut self, name: &'static str) {
        if !self.active.contains(&name) {
            self.active.push(name);
        }
    }

    pub fn pop(&mut self, name: &'static str) {
        self.active.retain(|n| *n != name);
    }

    /// Put the pane layer at position 1, above global and below mode layers.
    /// A pane without a layer leaves position 1 empty.
    pub fn set_pane_layer(&mut self, name: &'static str) {
        let mode_layers: Vec<&'static str> = self
            .active
            .iter()
            .skip(1)
            .filter(|n| is_mode_layer(n))
            .copied()
            .collect();

        self.active.truncate(1);
        if self.layers.contains_key(name) {
            self.active.push(name);
        }
        self.active.extend(mode_layers);
    }

    pub fn has_layer(&self, name: &str) -> bool {
        self.active.iter().any(|n| *n == name)
    }

    /// Bindings of one layer as (key, description), for the help pane.
    pub fn describe(&self, name: &str) -> Vec<(String, &'static str)> {
        self.layers
            .get(name)
            .map(|layer| {
                layer
                    .keymap
                    .bindings()
                    .iter()
                    .map(|b| (b.pattern.display(), b.description))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Layers pushed on top of a pane rather than owned by one.
pub const MODE_LAYERS: &[&str] = &["global", "text_edit"];

fn is_mode_layer(name: &str) -> bool {
    name != "global" && MODE_LAYERS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::action_id::{GlobalActionId, ScoreActionId};
    use crate::ui::input::KeyCode;

    fn make_layer(name: &'static str, key: char, action: ActionId, transparent: bool) -> Layer {
        Layer {
            name,
            keymap: Keymap::new().bind(key, action, "test"),
            transparent,
        }
    }

    fn ev(ch: char) -> InputEvent {
        InputEvent::key(KeyCode::Char(ch))
    }

    fn stack() -> LayerStack {
        let mut s = LayerStack::new(vec![
            make_layer("global", 'q', ActionId::Global(GlobalActionId::Quit), true),
            make_layer("score", 'z', ActionId::Score(ScoreActionId::OctaveDown), true),
            make_layer("text_edit", '\u{1}', ActionId::Global(GlobalActionId::Help), false),
        ]);
        s.push("global");
        s
    }

    #[test]
    fn pane_layer_falls_through_to_global() {
        let mut s = stack();
        s.set_pane_layer("score");
        assert_eq!(s.resolve(&ev('z')), LayerResult::Action(ActionId::Score(ScoreActionId::OctaveDown)));
        assert_eq!(s.resolve(&ev('q')), LayerResult::Action(ActionId::Global(GlobalActionId::Quit)));
        assert_eq!(s.resolve(&ev('a')), LayerResult::Unresolved);
    }

    #[test]
    fn opaque_mode_layer_blocks() {
        let mut s = stack();
        s.set_pane_layer("score");
        s.push("text_edit");
        assert_eq!(s.resolve(&ev('q')), LayerResult::Blocked);
        s.pop("text_edit");
        assert!(!s.has_layer("text_edit"));
        assert_eq!(s.resolve(&ev('q')), LayerResult::Action(ActionId::Global(GlobalActionId::Quit)));
    }

    #[test]
    fn switching_pane_keeps_mode_layers() {
        let mut s = stack();
        s.set_pane_layer("score");
        s.push("text_edit");
        s.set_pane_layer("synth");
        assert!(s.has_layer("text_edit"));
        assert!(!s.has_layer("score"));
    }
}
