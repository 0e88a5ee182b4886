//! The trap service routines, implemented directly against host I/O rather
//! than as guest code behind the trap vector table.
//!
//! Each routine reports back to the executive loop through
//! [`ControlFlow`]-producing dispatch: `Continue` keeps the loop running,
//! `Break(Ok(()))` is a clean halt, `Break(Err(_))` aborts on a host I/O
//! failure. Output is written as raw bytes and flushed after every routine
//! that writes.

use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use std::io::Write;
use std::ops::ControlFlow;

/// Read one character into R0, without echo.
pub const GETC: u16 = 0x20;
/// Write the character in R0.
pub const OUT: u16 = 0x21;
/// Write the zero-terminated string of one-character words at R0.
pub const PUTS: u16 = 0x22;
/// Prompt for one character, echo it, store it in R0.
pub const IN: u16 = 0x23;
/// Write the zero-terminated string of packed two-character words at R0.
pub const PUTSP: u16 = 0x24;
/// Announce the halt and stop the executive loop.
pub const HALT: u16 = 0x25;

/// Saves the return address in R7 and runs the requested service routine.
///
/// Vectors outside the implemented set are no-ops; the loop continues with
/// the PC already past the TRAP instruction.
pub fn execute<W: Write>(
    i: Instruction,
    regs: &mut Registers,
    memory: &mut Memory,
    stdout: &mut W,
) -> ControlFlow<Result<(), ExecutionError>> {
    regs.set(7, regs.pc());
    let result = match i.trap_vector() {
        GETC => get_c(regs, memory),
        OUT => out(regs, stdout),
        PUTS => put_s(regs, memory, stdout),
        IN => in_trap(regs, memory, stdout),
        PUTSP => put_sp(regs, memory, stdout),
        HALT => return halt(stdout),
        _ => Ok(()),
    };
    match result {
        Ok(()) => ControlFlow::Continue(()),
        Err(error) => ControlFlow::Break(Err(error)),
    }
}

/// GETC: one character from the keyboard into R0, high byte cleared, no
/// echo. Flags are set from R0.
///
/// # Errors
/// - reading the host keyboard failed
pub fn get_c(regs: &mut Registers, memory: &mut Memory) -> Result<(), ExecutionError> {
    let key = memory.wait_key()?;
    regs.set(0, u16::from(key));
    regs.update_flags(0);
    Ok(())
}

/// OUT: the low byte of R0 to the console.
///
/// # Errors
/// - writing the console failed
pub fn out<W: Write>(regs: &Registers, stdout: &mut W) -> Result<(), ExecutionError> {
    write_flushed(&[low_byte(regs.get(0))], stdout)
}

/// PUTS: characters from successive words starting at the address in R0,
/// one character per word, until a zero word.
///
/// # Errors
/// - writing the console failed
pub fn put_s<W: Write>(
    regs: &Registers,
    memory: &Memory,
    stdout: &mut W,
) -> Result<(), ExecutionError> {
    let mut characters = Vec::with_capacity(120);
    let mut address = regs.get(0);
    while memory[address] != 0 {
        characters.push(low_byte(memory[address]));
        address = address.wrapping_add(1);
    }
    write_flushed(&characters, stdout)
}

/// IN: prompt for a single character, echo it, and store it in R0 with the
/// high byte cleared. Flags are set from R0.
///
/// # Errors
/// - reading the host keyboard or writing the console failed
pub fn in_trap<W: Write>(
    regs: &mut Registers,
    memory: &mut Memory,
    stdout: &mut W,
) -> Result<(), ExecutionError> {
    write_flushed(b"Enter a character: ", stdout)?;
    let key = memory.wait_key()?;
    write_flushed(&[key], stdout)?;
    regs.set(0, u16::from(key));
    regs.update_flags(0);
    Ok(())
}

/// PUTSP: packed string output. Each word yields its low byte, then its high
/// byte when nonzero; a zero word ends the string.
///
/// # Errors
/// - writing the console failed
pub fn put_sp<W: Write>(
    regs: &Registers,
    memory: &Memory,
    stdout: &mut W,
) -> Result<(), ExecutionError> {
    let mut characters = Vec::with_capacity(120);
    let mut address = regs.get(0);
    while memory[address] != 0 {
        let word = memory[address];
        characters.push(low_byte(word));
        let high = (word >> 8) as u8;
        if high != 0 {
            characters.push(high);
        }
        address = address.wrapping_add(1);
    }
    write_flushed(&characters, stdout)
}

/// HALT: announce the halt and break out of the executive loop.
pub fn halt<W: Write>(stdout: &mut W) -> ControlFlow<Result<(), ExecutionError>> {
    ControlFlow::Break(write_flushed(b"HALT\n", stdout))
}

const fn low_byte(word: u16) -> u8 {
    (word & 0xFF) as u8
}

fn write_flushed<W: Write>(bytes: &[u8], stdout: &mut W) -> Result<(), ExecutionError> {
    stdout.write_all(bytes)?;
    stdout.flush()?;
    Ok(())
}
