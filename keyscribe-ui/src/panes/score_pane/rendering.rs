use keyscribe_types::{note_label, Staff};

use super::ScorePane;
use crate::state::AppState;
use crate::transcribe::chord_token;
use crate::ui::widgets::keyboard_view::KEYBOARD_HEIGHT;
use crate::ui::{Color, Rect, RenderBuf, Style};

/// Indent of text fields under their titles.
const FIELD_INDENT: u16 = 2;

impl ScorePane {
    pub(super) fn render_impl(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        let border_style = Style::new().fg(Color::CYAN);
        let inner = buf.draw_block(area, " keyscribe ", border_style, border_style);
        self.staff_rows.clear();

        if inner.height < 14 || inner.width < 40 {
            let msg = "Terminal too small";
            buf.draw_str(inner.x, inner.y, inner.x + inner.width, msg, Style::new().fg(Color::RED));
            return;
        }

        let x = inner.x + 1;
        let width = inner.width.saturating_sub(2);
        let max_x = x + width;
        let mut y = inner.y;

        self.render_mode_line(buf, x, y, width, state);
        y += 2;

        let title_style = if self.editing == Some(super::Field::Header) {
            Style::new().fg(Color::GOLD).bold()
        } else {
            Style::new().fg(Color::WHITE)
        };
        buf.draw_str(x, y, max_x, "Header", title_style);
        self.header_input.render_buf(buf.raw_buf(), x, y + 1, width, FIELD_INDENT);
        y += 3;

        let current = state.session.staff();
        for staff in Staff::ALL {
            let (marker, style) = if staff == current {
                ("▶ ", Style::new().fg(Color::STAFF_ACTIVE).bold())
            } else {
                ("  ", Style::new().fg(Color::DARK_GRAY))
            };
            buf.draw_str(x, y, max_x, &format!("{}{}", marker, staff.name()), style);
            self.staff_rows.push((staff, y));
            let input = match staff {
                Staff::Right => &mut self.right_input,
                Staff::Left => &mut self.left_input,
            };
            input.render_buf(buf.raw_buf(), x, y + 1, width, FIELD_INDENT);
            y += 3;
        }

        self.render_held_line(buf, x, y, max_x, state);
        y += 2;

        let bottom = inner.y + inner.height;
        if y + KEYBOARD_HEIGHT <= bottom {
            self.keyboard.render(Rect::new(inner.x, y, inner.width, KEYBOARD_HEIGHT), buf, state);
            y += KEYBOARD_HEIGHT + 1;
        }

        if y + 3 <= bottom {
            render_preview(buf, Rect::new(inner.x, y, inner.width, bottom - y), state);
        }
    }

    fn render_mode_line(&self, buf: &mut RenderBuf, x: u16, y: u16, width: u16, state: &AppState) {
        let max_x = x + width;
        let (mode_text, mode_style) = if state.session.is_enabled() {
            ("● Transcribing", Style::new().fg(Color::TRANSCRIBING).bold())
        } else {
            ("○ Transcription off", Style::new().fg(Color::DARK_GRAY))
        };
        buf.draw_str(x, y, max_x, mode_text, mode_style);

        let midi = match &state.midi.connected_port {
            Some(name) => format!("MIDI: {}", name),
            None => "MIDI: not connected".to_string(),
        };
        let piano = self.piano.status_label();
        let right = format!("{}  {}", midi, piano);
        let right_len = right.chars().count() as u16;
        if right_len + 22 < width {
            let piano_x = max_x - piano.chars().count() as u16;
            buf.draw_str(max_x - right_len, y, max_x, &midi, Style::new().fg(Color::SKY_BLUE));
            buf.draw_str(piano_x, y, max_x, &piano, Style::new().fg(Color::BLACK).bg(Color::LIME));
        }
    }

    fn render_held_line(&self, buf: &mut RenderBuf, x: u16, y: u16, max_x: u16, state: &AppState) {
        let label_style = Style::new().fg(Color::GRAY);
        buf.draw_str(x, y, max_x, "Held:", label_style);
        let held: Vec<String> = state.held.iter().map(|n| note_label(*n)).collect();
        let held_text = if held.is_empty() { "-".to_string() } else { held.join(" ") };
        buf.draw_str(x + 6, y, max_x, &held_text, Style::new().fg(Color::KEY_HELD));

        let pending = state.session.transcriber().pending_chord();
        if state.session.is_enabled() && !pending.is_empty() {
            let chord_x = x + 6 + held_text.chars().count() as u16 + 3;
            let text = format!("Chord: {}", chord_token(pending));
            buf.draw_str(chord_x, y, max_x, &text, Style::new().fg(Color::STAFF_ACTIVE));
        }
    }
}

fn render_preview(buf: &mut RenderBuf, area: Rect, state: &AppState) {
    let border_style = Style::new().fg(Color::DARK_GRAY);
    let title_style = Style::new().fg(Color::WHITE);
    let inner = buf.draw_block(area, " Score ", border_style, title_style);
    let max_x = inner.x + inner.width;

    match &state.last_score {
        Some(score) => {
            for (i, line) in score.lines().take(inner.height as usize).enumerate() {
                buf.draw_str(inner.x + 1, inner.y + i as u16, max_x, line, Style::new().fg(Color::WHITE));
            }
        }
        None => {
            let hint = format!("F5 renders to {}", state.render_path.display());
            buf.draw_str(inner.x + 1, inner.y, max_x, &hint, Style::new().fg(Color::DARK_GRAY));
        }
    }
}
