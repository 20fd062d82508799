use keyscribe_types::{is_black_key, KEY_RANGE};

use crate::state::AppState;
use crate::ui::{Color, Rect, RenderBuf, Style};

/// Columns per white key.
const KEY_WIDTH: u16 = 2;
/// Rows where black keys sit on top of the white keys.
const UPPER_ROWS: u16 = 2;
/// Upper rows, one white-only row, one label row.
pub const KEYBOARD_HEIGHT: u16 = UPPER_ROWS + 2;

fn white_keys() -> impl Iterator<Item = u8> {
    KEY_RANGE.filter(|n| !is_black_key(*n))
}

/// Width of the full keyboard in columns.
pub fn keyboard_width() -> u16 {
    white_keys().count() as u16 * KEY_WIDTH
}

fn white_key_at(index: u16) -> Option<u8> {
    white_keys().nth(index as usize)
}

/// Black key whose left edge is the right column of white key `index`.
fn black_after(index: u16) -> Option<u8> {
    let white = white_key_at(index)?;
    let black = white.checked_add(1)?;
    (KEY_RANGE.contains(&black) && is_black_key(black)).then_some(black)
}

/// Note under column `x` (relative to the keyboard's left edge) in the
/// upper or lower part of the keys.
fn note_at_offset(x: u16, upper: bool) -> Option<u8> {
    if x >= keyboard_width() {
        return None;
    }
    let index = x / KEY_WIDTH;
    if upper {
        // Black keys straddle the boundary between two white keys.
        let black = if x % KEY_WIDTH == 1 {
            black_after(index)
        } else if index > 0 {
            black_after(index - 1)
        } else {
            None
        };
        if black.is_some() {
            return black;
        }
    }
    white_key_at(index)
}

/// On-screen five-octave keyboard with held keys highlighted.
#[derive(Debug, Default)]
pub struct KeyboardView {
    /// Where the keys were last drawn; used for mouse hit testing.
    drawn: Option<Rect>,
}

impl KeyboardView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The keyboard's rectangle within `area` (centered horizontally).
    pub fn layout(area: Rect) -> Rect {
        let width = keyboard_width().min(area.width);
        let x = area.x + (area.width - width) / 2;
        Rect::new(x, area.y, width, KEYBOARD_HEIGHT.min(area.height))
    }

    pub fn render(&mut self, area: Rect, buf: &mut RenderBuf, state: &AppState) {
        let rect = Self::layout(area);
        self.drawn = Some(rect);
        let max_x = rect.x + rect.width;

        for row in 0..rect.height.min(UPPER_ROWS + 1) {
            let y = rect.y + row;
            for dx in 0..rect.width {
                let Some(note) = note_at_offset(dx, row < UPPER_ROWS) else {
                    continue;
                };
                let bg = if state.is_highlighted(note) {
                    Color::KEY_HELD
                } else if is_black_key(note) {
                    Color::BLACK_KEY
                } else {
                    Color::WHITE_KEY
                };
                let ch = if !is_black_key(note) && dx % KEY_WIDTH == 0 && dx > 0 {
                    '▏'
                } else {
                    ' '
                };
                buf.set_cell(rect.x + dx, y, ch, Style::new().fg(Color::KEY_GAP).bg(bg));
            }
        }

        if rect.height > UPPER_ROWS + 1 {
            let y = rect.y + UPPER_ROWS + 1;
            let label_style = Style::new().fg(Color::GRAY);
            for (i, note) in white_keys().enumerate() {
                if note % 12 == 0 {
                    let octave = note / 12 - 1;
                    let x = rect.x + i as u16 * KEY_WIDTH;
                    buf.draw_str(x, y, max_x, &format!("C{}", octave), label_style);
                }
            }
        }
    }

    /// Note under a screen position from the last render.
    pub fn note_at(&self, column: u16, row: u16) -> Option<u8> {
        let rect = self.drawn?;
        if column < rect.x || column >= rect.x + rect.width {
            return None;
        }
        if row < rect.y || row > rect.y + UPPER_ROWS {
            return None;
        }
        note_at_offset(column - rect.x, row < rect.y + UPPER_ROWS)
    }
}
