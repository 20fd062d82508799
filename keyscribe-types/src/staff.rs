use serde::{Deserialize, Serialize};

/// Which hand's notation buffer receives committed tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Staff {
    Left,
    #[default]
    Right,
}

impl Staff {
    pub const ALL: [Staff; 2] = [Staff::Right, Staff::Left];

    pub fn name(&self) -> &'static str {
        match self {
            Staff::Left => "Left hand",
            Staff::Right => "Right hand",
        }
    }

    pub fn other(&self) -> Staff {
        match self {
            Staff::Left => Staff::Right,
            Staff::Right => Staff::Left,
        }
    }
}
