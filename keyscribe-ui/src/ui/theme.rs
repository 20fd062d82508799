//! Styles handed to rat-widget builders.

use ratatui::style::{Color as RatatuiColor, Style as RatatuiStyle};

use super::style::Color;

pub struct ScribeTheme;

impl ScribeTheme {
    pub fn text_input_style() -> RatatuiStyle {
        RatatuiStyle::default().fg(RatatuiColor::from(Color::GRAY))
    }

    pub fn text_input_focus_style() -> RatatuiStyle {
        RatatuiStyle::default()
            .fg(RatatuiColor::from(Color::WHITE))
            .bg(RatatuiColor::Rgb(25, 25, 40))
    }

    pub fn text_input_select_style() -> RatatuiStyle {
        RatatuiStyle::default()
            .fg(RatatuiColor::from(Color::WHITE))
            .bg(RatatuiColor::from(Color::SELECTION_BG))
    }

    pub fn text_input_cursor_style() -> RatatuiStyle {
        RatatuiStyle::default()
            .fg(RatatuiColor::from(Color::BLACK))
            .bg(RatatuiColor::from(Color::WHITE))
    }
}
