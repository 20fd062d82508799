mod help_pane;
mod midi_pane;
mod score_pane;
mod synth_pane;

pub use help_pane::HelpPane;
pub use midi_pane::MidiPane;
pub use score_pane::ScorePane;
pub use synth_pane::SynthPane;
