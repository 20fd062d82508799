use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode as CrosstermKeyCode,
        KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent,
        MouseEventKind as CrosstermMouseEventKind, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect as RatatuiRect,
    style::Style as RatatuiStyle,
    widgets::Widget,
    Terminal,
};

use super::{
    AppEvent, Color, InputEvent, InputSource, KeyCode, Modifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

/// Ratatui-based terminal backend
pub struct RatatuiBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keyboard_enhancement_enabled: bool,
}

impl RatatuiBackend {
    /// Create a new ratatui backend (does not start terminal mode)
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            keyboard_enhancement_enabled: false,
        })
    }

    /// Enter raw mode and alternate screen with mouse capture
    pub fn start(&mut self) -> io::Result<()> {
        enable_raw_mode()?;

        // Must be queried before entering the alternate screen
        let supports_enhancement = matches!(supports_keyboard_enhancement(), Ok(true));

        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;

        // Kitty protocol gives us real key releases for the piano
        if supports_enhancement
            && execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .is_ok()
        {
            self.keyboard_enhancement_enabled = true;
        }

        self.terminal.clear()?;
        Ok(())
    }

    /// Leave raw mode and alternate screen
    pub fn stop(&mut self) -> io::Result<()> {
        if self.keyboard_enhancement_enabled {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
            self.keyboard_enhancement_enabled = false;
        }

        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        Ok(())
    }

    /// Fresh frame the size of the terminal, cleared to the background.
    pub fn begin_frame(&self) -> io::Result<RatatuiFrame> {
        let size = self.terminal.size()?;
        Ok(RatatuiFrame::new(RatatuiRect::new(0, 0, size.width, size.height)))
    }

    pub fn end_frame(&mut self, frame: RatatuiFrame) -> io::Result<()> {
        self.terminal.draw(|f| {
            let area = f.area();
            f.render_widget(FrameWidget(frame.buffer), area);
        })?;
        Ok(())
    }

    /// Whether the terminal reports key release events.
    pub fn keyboard_enhancement_enabled(&self) -> bool {
        self.keyboard_enhancement_enabled
    }
}

/// Off-screen buffer the panes draw into.
pub struct RatatuiFrame {
    buffer: Buffer,
}

impl RatatuiFrame {
    fn new(area: RatatuiRect) -> Self {
        let mut buffer = Buffer::empty(area);
        buffer.set_style(area, RatatuiStyle::default().bg(Color::BLACK.into()));
        Self { buffer }
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    pub fn area(&self) -> RatatuiRect {
        self.buffer.area
    }
}

impl InputSource for RatatuiBackend {
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent> {
        let mut wait = timeout;
        loop {
            if !event::poll(wait).ok()? {
                return None;
            }
            if let Some(converted) = convert_event(event::read().ok()?) {
                return Some(converted);
            }
            // Skipped event; drain the rest without blocking again
            wait = Duration::ZERO;
        }
    }
}

/// Terminal event to app event. Focus changes, pastes, scrolls and keys
/// with no app mapping give `None`.
fn convert_event(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key_event) => {
            let converted = convert_key_event(key_event)?;
            Some(match key_event.kind {
                KeyEventKind::Release => AppEvent::KeyRelease(converted),
                KeyEventKind::Press | KeyEventKind::Repeat => AppEvent::Key(converted),
            })
        }
        Event::Mouse(mouse_event) => convert_mouse_event(mouse_event).map(AppEvent::Mouse),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}

fn convert_key_event(event: KeyEvent) -> Option<InputEvent> {
    let key = match event.code {
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Esc => KeyCode::Escape,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::PageUp => KeyCode::PageUp,
        CrosstermKeyCode::PageDown => KeyCode::PageDown,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::F(n) => KeyCode::F(n),
        _ => return None,
    };

    let modifiers = Modifiers {
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
        alt: event.modifiers.contains(KeyModifiers::ALT),
        shift: event.modifiers.contains(KeyModifiers::SHIFT),
    };

    Some(InputEvent {
        key,
        modifiers,
        timestamp: Instant::now(),
        is_repeat: event.kind == KeyEventKind::Repeat,
    })
}

fn convert_mouse_button(button: CrosstermMouseButton) -> MouseButton {
    match button {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<MouseEvent> {
    let kind = match event.kind {
        CrosstermMouseEventKind::Down(btn) => MouseEventKind::Down(convert_mouse_button(btn)),
        CrosstermMouseEventKind::Up(btn) => MouseEventKind::Up(convert_mouse_button(btn)),
        CrosstermMouseEventKind::Drag(btn) => MouseEventKind::Drag(convert_mouse_button(btn)),
        _ => return None,
    };

    Some(MouseEvent {
        kind,
        column: event.column,
        row: event.row,
    })
}

/// Copies a finished frame onto the terminal buffer. A frame built before a
/// resize only covers the overlap.
struct FrameWidget(Buffer);

impl Widget for FrameWidget {
    fn render(self, area: RatatuiRect, buf: &mut Buffer) {
        for pos in area.intersection(self.0.area).positions() {
            if let (Some(src), Some(dst)) = (self.0.cell(pos), buf.cell_mut(pos)) {
                *dst = src.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEventKind as CtMouseKind};

    fn key(code: CrosstermKeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: CtMouseKind) -> Event {
        Event::Mouse(CrosstermMouseEvent {
            kind,
            column: 12,
            row: 3,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn piano_key_release_is_reported() {
        let press = convert_event(key(CrosstermKeyCode::Char('a'), KeyEventKind::Press));
        assert!(matches!(press, Some(AppEvent::Key(e)) if e.key == KeyCode::Char('a')));
        let release = convert_event(key(CrosstermKeyCode::Char('a'), KeyEventKind::Release));
        assert!(matches!(release, Some(AppEvent::KeyRelease(e)) if e.key == KeyCode::Char('a')));
    }

    #[test]
    fn held_key_repeat_is_flagged() {
        match convert_event(key(CrosstermKeyCode::Char('s'), KeyEventKind::Repeat)) {
            Some(AppEvent::Key(e)) => assert!(e.is_repeat),
            _ => panic!("repeat should arrive as a key press"),
        }
    }

    #[test]
    fn unmapped_events_are_dropped() {
        assert!(convert_event(key(CrosstermKeyCode::CapsLock, KeyEventKind::Press)).is_none());
        assert!(convert_event(mouse(CtMouseKind::ScrollDown)).is_none());
        assert!(convert_event(Event::FocusLost).is_none());
    }

    #[test]
    fn mouse_click_keeps_position() {
        match convert_event(mouse(CtMouseKind::Down(CrosstermMouseButton::Left))) {
            Some(AppEvent::Mouse(m)) => {
                assert_eq!((m.column, m.row), (12, 3));
                assert!(matches!(m.kind, MouseEventKind::Down(MouseButton::Left)));
            }
            _ => panic!("click should convert"),
        }
    }

    #[test]
    fn frame_copy_clips_to_terminal() {
        let mut frame = RatatuiFrame::new(RatatuiRect::new(0, 0, 6, 2));
        frame.buffer_mut().set_string(0, 0, "keys", RatatuiStyle::default());
        let mut screen = Buffer::empty(RatatuiRect::new(0, 0, 3, 3));
        FrameWidget(frame.buffer).render(screen.area, &mut screen);
        assert_eq!(screen.cell((2, 0)).map(|c| c.symbol()), Some("y"));
        assert_eq!(screen.cell((0, 2)).map(|c| c.symbol()), Some(" "));
    }
}
