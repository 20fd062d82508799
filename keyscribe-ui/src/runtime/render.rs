//! Rendering: frame throttle, status line, pane drawing.

use std::time::Instant;

use super::AppRuntime;
use crate::action::StatusLevel;
use crate::ui::layout_helpers::split_bottom;
use crate::ui::{Color, Rect, RenderBuf, Style};

/// Minimum time between frames (~60fps).
const FRAME_INTERVAL_MS: u128 = 16;

impl AppRuntime {
    pub(crate) fn maybe_render(
        &mut self,
        backend: &mut crate::ui::RatatuiBackend,
    ) -> std::io::Result<()> {
        let now = Instant::now();
        if now.duration_since(self.last_render_time).as_millis() < FRAME_INTERVAL_MS {
            return Ok(());
        }

        // Re-render while status bar has a visible message (for auto-dismiss)
        if self.status_bar.current().is_some() {
            self.render_needed = true;
        }

        if !self.render_needed {
            return Ok(());
        }

        self.last_render_time = now;
        self.render_needed = false;

        let mut frame = backend.begin_frame()?;
        let area = frame.area();
        self.last_area = area;
        let (pane_area, status_area) = split_bottom(area, 1);
        {
            let mut buf = RenderBuf::new(frame.buffer_mut());
            self.panes.render(pane_area, &mut buf, &self.state);
            self.render_status_line(status_area, &mut buf);
        }
        backend.end_frame(frame)?;
        Ok(())
    }

    fn render_status_line(&self, area: Rect, buf: &mut RenderBuf) {
        if area.height == 0 {
            return;
        }
        let max_x = area.x + area.width;
        let bar_style = Style::new().fg(Color::GRAY).bg(Color::new(25, 25, 35));
        buf.fill(area, bar_style);

        let audio = if self.audio.is_running() {
            self.audio
                .read_state()
                .device_name
                .clone()
                .unwrap_or_else(|| "audio".to_string())
        } else {
            "no audio".to_string()
        };
        let left = format!(" {} | {} ", self.panes.active().id(), audio);
        buf.draw_str(area.x, area.y, max_x, &left, bar_style.bold());

        if let Some(msg) = self.status_bar.current() {
            let color = match msg.level {
                StatusLevel::Info => Color::WHITE,
                StatusLevel::Warning => Color::YELLOW,
                StatusLevel::Error => Color::RED,
            };
            let x = area.x + left.chars().count() as u16 + 1;
            buf.draw_str(x, area.y, max_x, &msg.text, bar_style.fg(color));
        }

        let hint = " F1 help ";
        let hint_len = hint.len() as u16;
        if area.width > hint_len + 40 {
            buf.draw_str(max_x - hint_len, area.y, max_x, hint, bar_style);
        }
    }
}
