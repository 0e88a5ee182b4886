//! The 65,536-word memory and the keyboard device mapped into it.

use crate::errors::ExecutionError;
use crate::hardware::keyboard::Keyboard;
use crate::numbers::swap16;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Read;
use std::ops::Index;

/// Number of addressable words; addresses are 16-bit, so every address is
/// valid by construction.
pub const MEMORY_WORDS: usize = 1 << 16;

/// Keyboard status register. Bit 15 is set iff a key is available.
pub const KBSR: u16 = 0xFE00;
/// Keyboard data register. The low byte carries the last polled key.
pub const KBDR: u16 = 0xFE02;

/// Memory plus the keyboard device whose status/data registers live in it.
///
/// Instruction-driven reads go through [`Memory::read`], which gives a read
/// of [`KBSR`] its side effect: the host keyboard is polled and both mapped
/// registers are refreshed before the value comes back.
pub struct Memory {
    /// Index equals memory address.
    data: Vec<u16>,
    keyboard: Box<dyn Keyboard>,
}

impl Memory {
    #[must_use]
    pub fn new(keyboard: Box<dyn Keyboard>) -> Self {
        Self {
            data: vec![0; MEMORY_WORDS],
            keyboard,
        }
    }

    /// Reads the word at `address` as an instruction does.
    ///
    /// # Errors
    /// - polling the host keyboard failed (reads of [`KBSR`] only)
    pub fn read(&mut self, address: u16) -> Result<u16, ExecutionError> {
        if address == KBSR {
            self.poll_keyboard()?;
        }
        Ok(self.data[usize::from(address)])
    }

    /// Stores `value` at `address`. Writes to the mapped registers land in
    /// memory like any other write and carry no device effect.
    pub fn write(&mut self, address: u16, value: u16) {
        self.data[usize::from(address)] = value;
    }

    /// Blocks until the host delivers a key, for the input traps.
    ///
    /// # Errors
    /// - reading the host keyboard failed
    pub fn wait_key(&mut self) -> Result<u8, ExecutionError> {
        Ok(self.keyboard.read()?)
    }

    fn poll_keyboard(&mut self) -> Result<(), ExecutionError> {
        match self.keyboard.poll()? {
            Some(byte) => {
                self.data[usize::from(KBSR)] = 1 << 15;
                self.data[usize::from(KBDR)] = u16::from(byte);
            }
            None => self.data[usize::from(KBSR)] = 0,
        }
        Ok(())
    }

    /// Loads a program image: a big-endian origin word followed by the words
    /// to place from that origin on. Each word is byte-flipped into host
    /// order through [`swap16`]. Returns the origin.
    ///
    /// Loading stops at end-of-file or at the top of memory, whichever comes
    /// first; a trailing odd byte is ignored. Images loaded later overlay
    /// earlier ones where their ranges meet.
    ///
    /// # Errors
    /// - the image is too short to contain an origin word
    pub fn load_image(&mut self, mut image: impl Read) -> std::io::Result<u16> {
        // a little-endian read of a big-endian word arrives byte-flipped
        let origin = swap16(image.read_u16::<LittleEndian>()?);
        let mut address = usize::from(origin);
        while address < MEMORY_WORDS {
            match image.read_u16::<LittleEndian>() {
                Ok(word) => {
                    self.data[address] = swap16(word);
                    address += 1;
                }
                Err(_) => break,
            }
        }
        Ok(origin)
    }
}

/// Raw view without device side effects, for the trap string walks.
impl Index<u16> for Memory {
    type Output = u16;

    fn index(&self, address: u16) -> &u16 {
        &self.data[usize::from(address)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::test_helpers::ScriptedKeyboard;
    use googletest::prelude::*;

    fn memory_with_keys(keys: &[u8]) -> Memory {
        Memory::new(Box::new(ScriptedKeyboard::new(keys)))
    }

    fn image_bytes(origin: u16, words: &[u16]) -> Vec<u8> {
        let mut bytes = origin.to_be_bytes().to_vec();
        for word in words {
            bytes.extend_from_slice(&word.to_be_bytes());
        }
        bytes
    }

    #[gtest]
    pub fn test_write_then_read_roundtrips() {
        let mut mem = memory_with_keys(&[]);
        mem.write(0x4242, 0xBEEF);
        expect_that!(mem.read(0x4242).unwrap(), eq(0xBEEF));
        expect_that!(mem[0x4242], eq(0xBEEF));
    }

    #[gtest]
    pub fn test_kbsr_read_without_key_clears_status() {
        let mut mem = memory_with_keys(&[]);
        mem.write(KBSR, 0x8000); // stale status from a previous poll
        expect_that!(mem.read(KBSR).unwrap(), eq(0));
    }

    #[gtest]
    pub fn test_kbsr_read_with_key_sets_status_and_data() {
        let mut mem = memory_with_keys(b"a");
        expect_that!(mem.read(KBSR).unwrap(), eq(0x8000));
        expect_that!(mem.read(KBDR).unwrap(), eq(u16::from(b'a')));

        // the key was consumed; the data register keeps the last key
        expect_that!(mem.read(KBSR).unwrap(), eq(0));
        expect_that!(mem.read(KBDR).unwrap(), eq(u16::from(b'a')));
    }

    #[gtest]
    pub fn test_load_image_places_words_at_origin() {
        let mut mem = memory_with_keys(&[]);
        let origin = mem
            .load_image(image_bytes(0x4000, &[0x1111, 0x2222, 0x3333]).as_slice())
            .unwrap();
        expect_that!(origin, eq(0x4000));
        expect_that!(mem[0x3FFF], eq(0));
        expect_that!(mem[0x4000], eq(0x1111));
        expect_that!(mem[0x4001], eq(0x2222));
        expect_that!(mem[0x4002], eq(0x3333));
        expect_that!(mem[0x4003], eq(0));
    }

    #[gtest]
    pub fn test_later_image_overlays_earlier_one() {
        let mut mem = memory_with_keys(&[]);
        mem.load_image(image_bytes(0x3000, &[0xAAAA, 0xBBBB]).as_slice())
            .unwrap();
        mem.load_image(image_bytes(0x3001, &[0xCCCC]).as_slice())
            .unwrap();
        expect_that!(mem[0x3000], eq(0xAAAA));
        expect_that!(mem[0x3001], eq(0xCCCC));
    }

    #[gtest]
    pub fn test_load_image_clamps_at_top_of_memory() {
        let mut mem = memory_with_keys(&[]);
        mem.load_image(image_bytes(0xFFFE, &[1, 2, 3, 4]).as_slice())
            .unwrap();
        expect_that!(mem[0xFFFE], eq(1));
        expect_that!(mem[0xFFFF], eq(2));
        // the remaining words have nowhere to go and are dropped
        expect_that!(mem[0x0000], eq(0));
        expect_that!(mem[0x0001], eq(0));
    }

    #[gtest]
    pub fn test_image_without_origin_word_is_an_error() {
        let mut mem = memory_with_keys(&[]);
        expect_that!(mem.load_image([0x30u8].as_slice()).is_err(), eq(true));
    }

    #[gtest]
    pub fn test_trailing_odd_byte_is_ignored() {
        let mut mem = memory_with_keys(&[]);
        let mut bytes = image_bytes(0x3000, &[0x1234]);
        bytes.push(0xFF);
        mem.load_image(bytes.as_slice()).unwrap();
        expect_that!(mem[0x3000], eq(0x1234));
        expect_that!(mem[0x3001], eq(0));
    }
}
