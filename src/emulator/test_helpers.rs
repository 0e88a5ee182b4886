//! Doubles for exercising the machine without a terminal attached.

use crate::emulator::Emulator;
use crate::hardware::keyboard::Keyboard;
use std::collections::VecDeque;
use std::io::{self, Write};

/// Collects console output in memory.
pub struct StringWriter {
    buffer: Vec<u8>,
}

impl StringWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(120),
        }
    }

    /// The collected output as text.
    ///
    /// # Panics
    /// - the output was not valid UTF-8; use [`StringWriter::bytes`] for
    ///   byte-level assertions
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buffer).expect("console output was not UTF-8")
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }
}

impl Default for StringWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keyboard that replays a fixed key sequence.
pub struct ScriptedKeyboard {
    keys: VecDeque<u8>,
}

impl ScriptedKeyboard {
    #[must_use]
    pub fn new(keys: &[u8]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(&[])
    }
}

impl Keyboard for ScriptedKeyboard {
    fn poll(&mut self) -> io::Result<Option<u8>> {
        Ok(self.keys.pop_front())
    }

    fn read(&mut self) -> io::Result<u8> {
        self.keys.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "keyboard script exhausted")
        })
    }
}

/// Builds a machine with `program` loaded at 0x3000, a scripted keyboard,
/// and in-memory console output. The image travels through the real loader.
#[must_use]
pub fn machine(program: &[u16], keys: &[u8]) -> Emulator<StringWriter> {
    let mut image = Vec::with_capacity((program.len() + 1) * 2);
    image.extend_from_slice(&0x3000u16.to_be_bytes());
    for word in program {
        image.extend_from_slice(&word.to_be_bytes());
    }
    let mut emulator =
        Emulator::with_io(Box::new(ScriptedKeyboard::new(keys)), StringWriter::new());
    emulator
        .load_image(image.as_slice())
        .expect("test image failed to load");
    emulator
}
