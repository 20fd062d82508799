use serde::{Deserialize, Serialize};

/// Physical layout the computer keyboard piano is mapped for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    Colemak,
}
