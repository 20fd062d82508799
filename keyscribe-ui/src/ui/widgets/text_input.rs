use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::StatefulWidget;

use rat_event::{HandleEvent, Regular};
use rat_widget::focus::HasFocus;
use rat_widget::text_input::{TextInput as RatTextInput, TextInputState};

use crate::ui::input::InputEvent;
use crate::ui::rat_compat::{outcome_consumed, to_crossterm_key_event};
use crate::ui::style::Color;
use crate::ui::theme::ScribeTheme;

/// A labelled single-line text input backed by rat-widget.
pub struct TextInput {
    label: String,
    state: TextInputState,
}

impl TextInput {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            state: TextInputState::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_value(mut self, value: &str) -> Self {
        self.state.set_value(value);
        self
    }

    pub fn value(&self) -> &str {
        self.state.text()
    }

    /// Take an external value (e.g. a freshly committed token) without
    /// disturbing the cursor when nothing changed.
    pub fn sync_value(&mut self, value: &str) {
        if self.state.text() != value {
            self.state.set_value(value);
            self.state.move_to_line_end(false);
        }
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.state.focus.set(focused);
    }

    pub fn is_focused(&self) -> bool {
        self.state.is_focused()
    }

    /// Handle input; returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if !self.state.is_focused() {
            return false;
        }
        let ct_event = to_crossterm_key_event(event);
        let outcome: rat_event::Outcome = self.state.handle(&ct_event, Regular).into();
        outcome_consumed(outcome)
    }

    /// Render `label` then the input field on one row. Returns rows used.
    pub fn render_buf(&mut self, buf: &mut Buffer, x: u16, y: u16, width: u16, label_width: u16) -> u16 {
        let label_color = if self.is_focused() { Color::GOLD } else { Color::WHITE };
        let label_style = ratatui::style::Style::default().fg(ratatui::style::Color::from(label_color));
        for (j, ch) in self.label.chars().take(label_width as usize).enumerate() {
            if let Some(cell) = buf.cell_mut((x + j as u16, y)) {
                cell.set_char(ch).set_style(label_style);
            }
        }

        let input_x = x + label_width;
        let input_width = width.saturating_sub(label_width);
        if input_width == 0 {
            return 1;
        }

        let widget = RatTextInput::new()
            .style(ScribeTheme::text_input_style())
            .focus_style(ScribeTheme::text_input_focus_style())
            .select_style(ScribeTheme::text_input_select_style())
            .cursor_style(ScribeTheme::text_input_cursor_style());

        widget.render(Rect::new(input_x, y, input_width, 1), buf, &mut self.state);
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::{KeyCode, Modifiers};

    fn char_event(ch: char) -> InputEvent {
        InputEvent::new(KeyCode::Char(ch), Modifiers::none())
    }

    #[test]
    fn typing_appends() {
        let mut input = TextInput::new("Right:");
        input.set_focused(true);
        for c in "[CE]".chars() {
            input.handle_input(&char_event(c));
        }
        assert_eq!(input.value(), "[CE]");
    }

    #[test]
    fn backspace_at_end() {
        let mut input = TextInput::new("").with_value("C,,D");
        input.set_focused(true);
        input.handle_input(&InputEvent::key(KeyCode::End));
        input.handle_input(&InputEvent::key(KeyCode::Backspace));
        assert_eq!(input.value(), "C,,");
    }

    #[test]
    fn unfocused_input_does_not_consume() {
        let mut input = TextInput::new("");
        let consumed = input.handle_input(&char_event('a'));
        assert!(!consumed);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn sync_replaces_value() {
        let mut input = TextInput::new("").with_value("C");
        input.sync_value("CD");
        assert_eq!(input.value(), "CD");
        input.sync_value("CD");
        assert_eq!(input.value(), "CD");
    }
}
