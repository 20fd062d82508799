use std::any::Any;

use crate::state::AppState;
use crate::ui::action_id::{ActionId, HelpActionId};
use crate::ui::layout_helpers::center_rect;
use crate::ui::{
    Action, Color, InputEvent, Keymap, MouseButton, MouseEvent, MouseEventKind, NavAction, Pane, Rect,
    RenderBuf, Style,
};

/// Key reference for the pane help was opened from.
pub struct HelpPane {
    keymap: Keymap,
    entries: Vec<(String, &'static str)>,
    title: String,
    scroll: usize,
}

impl HelpPane {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            entries: Vec::new(),
            title: String::new(),
            scroll: 0,
        }
    }

    /// Set the bindings to list, as (key, description).
    pub fn set_context(&mut self, title: &str, entries: Vec<(String, &'static str)>) {
        self.title = title.to_string();
        self.entries = entries;
        self.scroll = 0;
    }
}

impl Pane for HelpPane {
    fn id(&self) -> &'static str {
        "help"
    }

    fn handle_action(&mut self, action: ActionId, _event: &InputEvent, _state: &AppState) -> Action {
        match action {
            ActionId::Help(HelpActionId::Close) => Action::Nav(NavAction::PopPane),
            ActionId::Help(HelpActionId::ScrollUp) => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            ActionId::Help(HelpActionId::ScrollDown) => {
                if self.scroll + 1 < self.entries.len() {
                    self.scroll += 1;
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent, _area: Rect, _state: &AppState) -> Action {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Down(MouseButton::Right) => {
                Action::Nav(NavAction::PopPane)
            }
            _ => Action::None,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut RenderBuf, _state: &AppState) {
        let rect = center_rect(area, 60, 22);
        let title = format!(" Help: {} ", self.title);

        let border_style = Style::new().fg(Color::SKY_BLUE);
        let inner = buf.draw_block(rect, &title, border_style, border_style);

        let visible_lines = inner.height.saturating_sub(3) as usize;
        let max_scroll = self.entries.len().saturating_sub(visible_lines);
        let scroll = self.scroll.min(max_scroll);

        let key_style = Style::new().fg(Color::CYAN).bold();
        let desc_style = Style::new().fg(Color::WHITE);

        for (i, (key, desc)) in self.entries.iter().skip(scroll).take(visible_lines).enumerate() {
            let y = inner.y + 1 + i as u16;
            let max_desc_len = inner.width.saturating_sub(14) as usize;
            let desc_truncated: String = desc.chars().take(max_desc_len).collect();
            let key_formatted = format!("{:<12}", key);

            let line_area = Rect::new(inner.x + 1, y, inner.width.saturating_sub(1), 1);
            buf.draw_line(line_area, &[(&key_formatted, key_style), (&desc_truncated, desc_style)]);
        }

        let help_y = inner.y + inner.height.saturating_sub(1);
        let help_area = Rect::new(inner.x + 1, help_y, inner.width.saturating_sub(1), 1);
        let footer = if self.entries.len() > visible_lines {
            format!(
                "[ESC/F1] Close  [Up/Down] Scroll  {}-{}/{}",
                scroll + 1,
                (scroll + visible_lines).min(self.entries.len()),
                self.entries.len()
            )
        } else {
            "[ESC/F1] Close".to_string()
        };
        buf.draw_line(help_area, &[(&footer, Style::new().fg(Color::DARK_GRAY))]);
    }

    fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
