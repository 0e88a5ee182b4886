//! The emulator: machine state ownership, the fetch–decode–execute loop, and
//! instruction dispatch.

pub mod instruction;
pub mod opcodes;
pub mod test_helpers;
pub mod trap_routines;

use crate::emulator::instruction::{Instruction, Opcode};
use crate::errors::{ExecutionError, LoadImageError};
use crate::hardware::keyboard::{Keyboard, TerminalKeyboard};
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::fs::File;
use std::io::{self, BufReader, Read, Stdout, Write};
use std::ops::ControlFlow;
use std::path::Path;

/// The public facing emulator used to run LC-3 programs.
///
/// Owns the complete machine state — registers, memory with its mapped
/// keyboard device, and the console writer — and passes it explicitly to
/// the handlers; nothing lives in process globals.
pub struct Emulator<W> {
    registers: Registers,
    memory: Memory,
    stdout: W,
}

impl Emulator<Stdout> {
    /// An emulator wired to the controlling terminal.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(Box::new(TerminalKeyboard::new()), io::stdout())
    }
}

impl Default for Emulator<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Emulator<W> {
    /// An emulator over the given keyboard and console, for embedding and
    /// for tests.
    #[must_use]
    pub fn with_io(keyboard: Box<dyn Keyboard>, stdout: W) -> Self {
        Self {
            registers: Registers::new(),
            memory: Memory::new(keyboard),
            stdout,
        }
    }

    /// Loads a program image from a reader. Returns the load origin.
    ///
    /// # Errors
    /// - the image is too short to contain an origin word
    pub fn load_image(&mut self, image: impl Read) -> io::Result<u16> {
        self.memory.load_image(image)
    }

    /// Loads a program image from a file. Returns the load origin.
    ///
    /// # Errors
    /// - [`LoadImageError::Unreadable`] when the file cannot be opened or
    ///   holds no origin word
    pub fn load_image_file(&mut self, path: &Path) -> Result<u16, LoadImageError> {
        let unreadable = || LoadImageError::Unreadable(path.display().to_string());
        let file = File::open(path).map_err(|_| unreadable())?;
        self.memory
            .load_image(BufReader::new(file))
            .map_err(|_| unreadable())
    }

    /// Runs the executive loop until the program halts.
    ///
    /// # Errors
    /// - host keyboard or console I/O failed mid-program
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        loop {
            if let ControlFlow::Break(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Fetches, decodes, and executes a single instruction.
    ///
    /// The PC moves past the instruction before the handler runs, so
    /// PC-relative operands resolve against the following address.
    pub fn step(&mut self) -> ControlFlow<Result<(), ExecutionError>> {
        let bits = match self.memory.read(self.registers.pc()) {
            Ok(bits) => bits,
            Err(error) => return ControlFlow::Break(Err(error)),
        };
        self.registers.advance_pc();
        let i = Instruction::from(bits);

        let Self {
            registers,
            memory,
            stdout,
        } = self;
        match i.opcode() {
            Opcode::Br => opcodes::br(i, registers),
            Opcode::Add => opcodes::add(i, registers),
            Opcode::Ld => return flow(opcodes::ld(i, registers, memory)),
            Opcode::St => opcodes::st(i, registers, memory),
            Opcode::Jsr => opcodes::jsr(i, registers),
            Opcode::And => opcodes::and(i, registers),
            Opcode::Ldr => return flow(opcodes::ldr(i, registers, memory)),
            Opcode::Str => opcodes::str(i, registers, memory),
            // not part of the user-mode subset; the PC has already advanced
            Opcode::Rti | Opcode::Res => {}
            Opcode::Not => opcodes::not(i, registers),
            Opcode::Ldi => return flow(opcodes::ldi(i, registers, memory)),
            Opcode::Sti => return flow(opcodes::sti(i, registers, memory)),
            Opcode::Jmp => opcodes::jmp(i, registers),
            Opcode::Lea => opcodes::lea(i, registers),
            Opcode::Trap => return trap_routines::execute(i, registers, memory, stdout),
        }
        ControlFlow::Continue(())
    }

    #[must_use]
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// The console writer, for inspecting collected output in tests.
    #[must_use]
    pub fn output(&self) -> &W {
        &self.stdout
    }
}

fn flow(result: Result<(), ExecutionError>) -> ControlFlow<Result<(), ExecutionError>> {
    match result {
        Ok(()) => ControlFlow::Continue(()),
        Err(error) => ControlFlow::Break(Err(error)),
    }
}
