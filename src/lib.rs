//! # LC-3 emulator.
//!
//! `lc3-vm` emulates the LC-3 (Little Computer 3) architecture: eight
//! general-purpose registers, a 65,536-word memory with memory-mapped
//! keyboard registers, and the six classic trap service routines bridging
//! to host I/O.
//!
//! Usage starts with loading one or more program images via
//! [`Emulator::load_image_file`] (or [`Emulator::load_image`] from any
//! reader), then running the fetch–decode–execute loop with
//! [`Emulator::run`].
//!
//! # Example
//! ```
//! use lc3_vm::emulator::test_helpers::{ScriptedKeyboard, StringWriter};
//! use lc3_vm::emulator::Emulator;
//!
//! // .ORIG x3000 ; TRAP x25
//! let image: &[u8] = &[0x30, 0x00, 0xF0, 0x25];
//! let mut emu = Emulator::with_io(Box::new(ScriptedKeyboard::empty()), StringWriter::new());
//! emu.load_image(image).unwrap();
//! emu.run().unwrap();
//! assert_eq!(emu.output().as_str(), "HALT\n");
//! ```

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod numbers;
pub mod terminal;

pub use emulator::Emulator;
