use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::action_id::parse_action_id;
use super::keymap::{KeyBinding, KeyPattern, Keymap};
use super::layer::{Layer, MODE_LAYERS};
use super::KeyCode;

#[derive(Deserialize)]
struct KeybindingConfig {
    #[allow(dead_code)]
    version: u32,
    layers: HashMap<String, LayerConfig>,
}

#[derive(Deserialize)]
struct LayerConfig {
    #[serde(default = "default_transparent")]
    transparent: bool,
    bindings: Vec<RawBinding>,
}

fn default_transparent() -> bool {
    true
}

#[derive(Deserialize)]
struct RawBinding {
    key: String,
    action: String,
    description: String,
}

/// Loaded once at startup and never freed.
fn intern(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

/// Parse a key notation string: `"q"`, `"Space"`, `"Up"`, `"F5"`,
/// `"Ctrl+q"`, `"Alt+x"`, `"Ctrl+Left"`, `"Shift+Tab"`.
fn parse_key(s: &str) -> Option<KeyPattern> {
    let single = |rest: &str| {
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    };

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        match single(rest) {
            Some(c) => Some(KeyPattern::Ctrl(c)),
            None => parse_named_key(rest).map(KeyPattern::CtrlKey),
        }
    } else if let Some(rest) = s.strip_prefix("Alt+") {
        single(rest).map(KeyPattern::Alt)
    } else if let Some(rest) = s.strip_prefix("Shift+") {
        parse_named_key(rest).map(KeyPattern::ShiftKey)
    } else if s == "Space" {
        Some(KeyPattern::Char(' '))
    } else if let Some(c) = single(s) {
        Some(KeyPattern::Char(c))
    } else {
        parse_named_key(s).map(KeyPattern::Key)
    }
}

fn parse_named_key(s: &str) -> Option<KeyCode> {
    match s {
        "Up" => Some(KeyCode::Up),
        "Down" => Some(KeyCode::Down),
        "Left" => Some(KeyCode::Left),
        "Right" => Some(KeyCode::Right),
        "Enter" => Some(KeyCode::Enter),
        "Escape" => Some(KeyCode::Escape),
        "Backspace" => Some(KeyCode::Backspace),
        "Tab" => Some(KeyCode::Tab),
        "Home" => Some(KeyCode::Home),
        "End" => Some(KeyCode::End),
        "PageUp" => Some(KeyCode::PageUp),
        "PageDown" => Some(KeyCode::PageDown),
        "Delete" => Some(KeyCode::Delete),
        _ => s
            .strip_prefix('F')
            .and_then(|n| n.parse::<u8>().ok())
            .map(KeyCode::F),
    }
}

const DEFAULT_KEYBINDINGS: &str = include_str!("../../keybindings.toml");

/// Embedded defaults, with layers from `~/.config/keyscribe/keybindings.toml`
/// replacing whole default layers.
/// Returns (layers for the LayerStack, pane keymaps by pane id).
pub fn load_keybindings() -> (Vec<Layer>, HashMap<String, Keymap>) {
    load_keybindings_from(user_keybindings_path().as_deref())
}

pub fn load_keybindings_from(user_path: Option<&Path>) -> (Vec<Layer>, HashMap<String, Keymap>) {
    let mut config: KeybindingConfig = match toml::from_str(DEFAULT_KEYBINDINGS) {
        Ok(c) => c,
        Err(e) => {
            log::error!(target: "ui::keybindings", "embedded keybindings.toml is invalid: {}", e);
            KeybindingConfig {
                version: 2,
                layers: HashMap::new(),
            }
        }
    };

    if let Some(path) = user_path {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<KeybindingConfig>(&contents) {
                    Ok(user) => merge_config(&mut config, user),
                    Err(e) => {
                        log::warn!(target: "ui::keybindings", "ignoring malformed {}: {}", path.display(), e)
                    }
                },
                Err(e) => {
                    log::warn!(target: "ui::keybindings", "could not read {}: {}", path.display(), e)
                }
            }
        }
    }

    let layers = build_layers(&config.layers);
    let pane_keymaps = build_pane_keymaps(&config.layers);
    (layers, pane_keymaps)
}

fn user_keybindings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("keyscribe").join("keybindings.toml"))
}

fn merge_config(base: &mut KeybindingConfig, user: KeybindingConfig) {
    for (layer_id, layer_config) in user.layers {
        base.layers.insert(layer_id, layer_config);
    }
}

fn build_bindings(layer_name: &str, raw: &[RawBinding]) -> Vec<KeyBinding> {
    raw.iter()
        .filter_map(|b| {
            let Some(pattern) = parse_key(&b.key) else {
                log::warn!(target: "ui::keybindings", "ignoring unknown key '{}'", b.key);
                return None;
            };
            match parse_action_id(layer_name, &b.action) {
                Some(action) => Some(KeyBinding {
                    pattern,
                    action,
                    description: intern(b.description.clone()),
                }),
                None => {
                    log::warn!(target: "ui::keybindings", "ignoring unknown action '{}' in layer '{}'", b.action, layer_name);
                    None
                }
            }
        })
        .collect()
}

fn build_layers(layers: &HashMap<String, LayerConfig>) -> Vec<Layer> {
    layers
        .iter()
        .map(|(name, config)| Layer {
            name: intern(name.clone()),
            keymap: Keymap::from_bindings(build_bindings(name, &config.bindings)),
            transparent: config.transparent,
        })
        .collect()
}

fn build_pane_keymaps(layers: &HashMap<String, LayerConfig>) -> HashMap<String, Keymap> {
    layers
        .iter()
        .filter(|(name, _)| !MODE_LAYERS.contains(&name.as_str()))
        .map(|(name, config)| {
            (
                name.clone(),
                Keymap::from_bindings(build_bindings(name, &config.bindings)),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::action_id::{ActionId, GlobalActionId, ScoreActionId};
    use crate::ui::InputEvent;
    use std::io::Write;

    #[test]
    fn test_parse_key_char() {
        assert_eq!(parse_key("q"), Some(KeyPattern::Char('q')));
        assert_eq!(parse_key(";"), Some(KeyPattern::Char(';')));
        assert_eq!(parse_key("Space"), Some(KeyPattern::Char(' ')));
    }

    #[test]
    fn test_parse_key_named() {
        assert_eq!(parse_key("Up"), Some(KeyPattern::Key(KeyCode::Up)));
        assert_eq!(parse_key("F12"), Some(KeyPattern::Key(KeyCode::F(12))));
        assert_eq!(parse_key("Ctrl+l"), Some(KeyPattern::Ctrl('l')));
        assert_eq!(parse_key("Ctrl+Left"), Some(KeyPattern::CtrlKey(KeyCode::Left)));
        assert_eq!(parse_key("Shift+Tab"), Some(KeyPattern::ShiftKey(KeyCode::Tab)));
    }

    #[test]
    fn test_parse_key_unknown() {
        assert_eq!(parse_key("Bogus"), None);
        assert_eq!(parse_key("Ctrl+Bogus"), None);
        assert_eq!(parse_key("Alt+"), None);
        assert_eq!(parse_key("Fx"), None);
    }

    #[test]
    fn test_load_embedded_keybindings() {
        let (layers, pane_keymaps) = load_keybindings_from(None);
        let names: Vec<&str> = layers.iter().map(|l| l.name).collect();
        assert!(names.contains(&"global"));
        assert!(names.contains(&"text_edit"));
        assert!(pane_keymaps.contains_key("score"));
        assert!(pane_keymaps.contains_key("synth"));
        assert!(pane_keymaps.contains_key("midi"));
        assert!(pane_keymaps.contains_key("help"));
        assert!(!pane_keymaps.contains_key("global"));

        let score = &pane_keymaps["score"];
        assert_eq!(
            score.lookup(&InputEvent::key(KeyCode::Char(' '))),
            Some(ActionId::Score(ScoreActionId::FlushChord))
        );
    }

    #[test]
    fn test_user_layer_replaces_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
version = 2
[layers.global]
bindings = [{ key = "F10", action = "quit", description = "Quit" }]
"#,
        )
        .unwrap();
        let (layers, _) = load_keybindings_from(Some(file.path()));
        let global = layers.iter().find(|l| l.name == "global").unwrap();
        assert_eq!(global.keymap.bindings().len(), 1);
        assert_eq!(
            global.keymap.lookup(&InputEvent::key(KeyCode::F(10))),
            Some(ActionId::Global(GlobalActionId::Quit))
        );
    }
}
