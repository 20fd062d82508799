//! Typed action identifiers for the keybinding system.

/// Generates an action enum with string conversion methods.
macro_rules! define_action_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $variant:ident => $str:literal, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )*
        }
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $str, )*
                }
            }
            pub fn from_str(s: &str) -> Option<Self> {
                match s {
                    $( $str => Some($name::$variant), )*
                    _ => None,
                }
            }
        }
    }
}

define_action_enum! {
    /// Available in every pane
    pub enum GlobalActionId {
        Quit => "quit",
        Help => "help",
        ToggleTranscription => "toggle_transcription",
        Render => "render",
        Score => "score",
        Synth => "synth",
        Midi => "midi",
        Panic => "panic",
    }
}

define_action_enum! {
    pub enum ScoreActionId {
        LeftStaff => "left_staff",
        RightStaff => "right_staff",
        FlushChord => "flush_chord",
        Edit => "edit",
        ClearStaves => "clear_staves",
        OctaveDown => "octave_down",
        OctaveUp => "octave_up",
    }
}

define_action_enum! {
    /// Active while a text field has focus
    pub enum TextEditActionId {
        Done => "done",
        NextField => "next_field",
        Quit => "quit",
    }
}

define_action_enum! {
    pub enum SynthActionId {
        Prev => "prev",
        Next => "next",
        Decrease => "decrease",
        Increase => "increase",
        Activate => "activate",
        Back => "back",
    }
}

define_action_enum! {
    pub enum MidiActionId {
        Up => "up",
        Down => "down",
        Connect => "connect",
        Disconnect => "disconnect",
        Refresh => "refresh",
        Back => "back",
    }
}

define_action_enum! {
    pub enum HelpActionId {
        Close => "close",
        ScrollUp => "scroll_up",
        ScrollDown => "scroll_down",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Global(GlobalActionId),
    Score(ScoreActionId),
    TextEdit(TextEditActionId),
    Synth(SynthActionId),
    Midi(MidiActionId),
    Help(HelpActionId),
}

impl ActionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Global(a) => a.as_str(),
            ActionId::Score(a) => a.as_str(),
            ActionId::TextEdit(a) => a.as_str(),
            ActionId::Synth(a) => a.as_str(),
            ActionId::Midi(a) => a.as_str(),
            ActionId::Help(a) => a.as_str(),
        }
    }
}

/// Resolve an action string within the layer that binds it.
pub fn parse_action_id(layer: &str, action: &str) -> Option<ActionId> {
    match layer {
        "global" => GlobalActionId::from_str(action).map(ActionId::Global),
        "score" => ScoreActionId::from_str(action).map(ActionId::Score),
        "text_edit" => TextEditActionId::from_str(action).map(ActionId::TextEdit),
        "synth" => SynthActionId::from_str(action).map(ActionId::Synth),
        "midi" => MidiActionId::from_str(action).map(ActionId::Midi),
        "help" => HelpActionId::from_str(action).map(ActionId::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_actions() {
        assert_eq!(
            parse_action_id("global", "toggle_transcription"),
            Some(ActionId::Global(GlobalActionId::ToggleTranscription))
        );
        assert_eq!(
            parse_action_id("score", "flush_chord"),
            Some(ActionId::Score(ScoreActionId::FlushChord))
        );
    }

    #[test]
    fn action_is_scoped_to_its_layer() {
        assert_eq!(parse_action_id("score", "quit"), None);
        assert_eq!(parse_action_id("nowhere", "quit"), None);
    }

    #[test]
    fn as_str_round_trips() {
        let id = ActionId::Midi(MidiActionId::Connect);
        assert_eq!(parse_action_id("midi", id.as_str()), Some(id));
    }
}
