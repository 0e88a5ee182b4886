//! Keyboard input behind a trait so the machine can run against the real
//! terminal or a scripted source in tests.

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;

/// Source of guest keyboard input.
pub trait Keyboard {
    /// Non-blocking check; `Some` carries the byte of a pressed key.
    fn poll(&mut self) -> io::Result<Option<u8>>;

    /// Blocks until the next key arrives.
    fn read(&mut self) -> io::Result<u8>;
}

/// Keyboard input taken from the controlling terminal.
pub struct TerminalKeyboard;

impl TerminalKeyboard {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for TerminalKeyboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Keyboard for TerminalKeyboard {
    fn poll(&mut self) -> io::Result<Option<u8>> {
        // a zero timeout makes this a readiness probe; non-key events are
        // drained so they cannot mask a pending keystroke
        while event::poll(Duration::ZERO)? {
            if let Some(byte) = key_byte(&event::read()?) {
                return Ok(Some(byte));
            }
        }
        Ok(None)
    }

    fn read(&mut self) -> io::Result<u8> {
        loop {
            if let Some(byte) = key_byte(&event::read()?) {
                return Ok(byte);
            }
        }
    }
}

/// Maps a terminal event to the byte the guest receives.
///
/// Ctrl-C never shows up here: the terminal keeps `ISIG` set, so it raises
/// SIGINT before it could become input.
fn key_byte(event: &Event) -> Option<u8> {
    let Event::Key(key) = event else {
        return None;
    };
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        KeyCode::Char(c) if c.is_ascii() => Some(c as u8),
        KeyCode::Enter => Some(b'\n'),
        KeyCode::Tab => Some(b'\t'),
        KeyCode::Backspace => Some(0x08),
        KeyCode::Esc => Some(0x1B),
        _ => None,
    }
}
