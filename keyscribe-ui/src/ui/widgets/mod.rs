pub mod keyboard_view;
pub mod text_input;

pub use keyboard_view::KeyboardView;
pub use text_input::TextInput;
