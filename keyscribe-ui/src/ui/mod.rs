pub mod action_id;
pub mod input;
pub mod keybindings;
pub mod keymap;
pub mod layer;
pub mod layout_helpers;
pub mod pane;
pub mod piano_keyboard;
pub mod rat_compat;
pub mod ratatui_impl;
pub mod render;
pub mod status_bar;
pub mod style;
pub mod theme;
pub mod widgets;

pub use input::{AppEvent, InputEvent, InputSource, KeyCode, Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use keymap::Keymap;
pub use layer::{LayerResult, LayerStack};
pub use pane::{Action, MidiAction, NavAction, Pane, PaneManager, SynthAction};
pub use piano_keyboard::PianoKeyboard;
pub use ratatui_impl::RatatuiBackend;
pub use render::{Rect, RenderBuf};
pub use status_bar::StatusBar;
pub use style::{Color, Style};
