//! Implemented operations for the LC-3.
//!
//! One handler per opcode class. Handlers see the PC as already incremented
//! by the fetch, so every PC-relative computation starts from the address of
//! the following instruction. All address and value arithmetic wraps modulo
//! 2^16.

use crate::emulator::instruction::Instruction;
use crate::errors::ExecutionError;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;

/// ADD: addition in 2 variants, flags set from the destination
/// - DR is set to SR1 + SR2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0001 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set to SR1 + sign-extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0001 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn add(i: Instruction, r: &mut Registers) {
    let rhs = if i.is_immediate() {
        i.imm5()
    } else {
        r.get(i.sr2())
    };
    r.set(i.dr(), r.get(i.sr1()).wrapping_add(rhs));
    r.update_flags(i.dr());
}

/// AND: bit-wise AND in 2 variants, flags set from the destination
/// - DR is set to SR1 AND SR2
/// ```text
///  15__12__11_9__8_6___5___4_3__2_0_
/// | 0101 |  DR | SR1 | 0 | 00 | SR2 |
///  ---------------------------------
/// ```
/// - DR is set to SR1 AND sign-extended immediate
/// ```text
///  15__12__11_9__8_6___5___4___0_
/// | 0101 |  DR | SR1 | 1 |  IMM5 |
///  ------------------------------
/// ```
pub fn and(i: Instruction, r: &mut Registers) {
    let rhs = if i.is_immediate() {
        i.imm5()
    } else {
        r.get(i.sr2())
    };
    r.set(i.dr(), r.get(i.sr1()) & rhs);
    r.update_flags(i.dr());
}

/// NOT: bit-wise complement of SR1
/// ```text
///  15__12__11_9__8_6___5___0_
/// | 1001 |  DR | SR1 | 11111 |
///  --------------------------
/// ```
pub fn not(i: Instruction, r: &mut Registers) {
    r.set(i.dr(), !r.get(i.sr1()));
    r.update_flags(i.dr());
}

/// BR: conditional branch
///
/// Adds the sign-extended offset to PC when the current condition flag is
/// among the set `nzp` bits. An `nzp` of zero never branches. Flags are left
/// untouched.
/// ```text
///  15__12__11_9___8_______0_
/// | 0000 |  nzp | PCoffset9 |
///  -------------------------
/// ```
pub fn br(i: Instruction, r: &mut Registers) {
    if i.nzp() & r.cond().bits() != 0 {
        r.set_pc(r.pc().wrapping_add(i.pc_offset9()));
    }
}

/// JMP: unconditional jump to the address in the base register. RET is the
/// special case with base register R7.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 1100 | 000 | BaseR | 000000 |
///  ------------------------------
/// ```
pub fn jmp(i: Instruction, r: &mut Registers) {
    r.set_pc(r.get(i.sr1()));
}

/// JSR/JSRR: saves the return address in R7, then jumps
/// - PC-relative (bit 11 set): PC gains the sign-extended 11-bit offset
/// - register form: PC is taken from the base register
/// ```text
///  15__12__11____10_______0_     15__12__11_9__8___6____5____0_
/// | 0100 |  1 | PCoffset11 |    | 0100 | 000 | BaseR | 000000 |
///  -------------------------     ------------------------------
/// ```
pub fn jsr(i: Instruction, r: &mut Registers) {
    r.set(7, r.pc());
    if i.is_jsr_offset() {
        r.set_pc(r.pc().wrapping_add(i.pc_offset11()));
    } else {
        r.set_pc(r.get(i.sr1()));
    }
}

/// LD: loads DR from the address PC + sign-extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - the memory read touched the keyboard device and polling failed
pub fn ld(i: Instruction, r: &mut Registers, m: &mut Memory) -> Result<(), ExecutionError> {
    let value = m.read(r.pc().wrapping_add(i.pc_offset9()))?;
    r.set(i.dr(), value);
    r.update_flags(i.dr());
    Ok(())
}

/// LDI: load indirect. The word at PC + sign-extended offset holds the
/// address whose content lands in DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1010 |  DR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - a memory read touched the keyboard device and polling failed
pub fn ldi(i: Instruction, r: &mut Registers, m: &mut Memory) -> Result<(), ExecutionError> {
    let pointer = m.read(r.pc().wrapping_add(i.pc_offset9()))?;
    let value = m.read(pointer)?;
    r.set(i.dr(), value);
    r.update_flags(i.dr());
    Ok(())
}

/// LDR: loads DR from the base register plus the sign-extended 6-bit offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0110 |  DR | BaseR | offset6 |
///  ------------------------------
/// ```
///
/// # Errors
/// - the memory read touched the keyboard device and polling failed
pub fn ldr(i: Instruction, r: &mut Registers, m: &mut Memory) -> Result<(), ExecutionError> {
    let value = m.read(r.get(i.sr1()).wrapping_add(i.offset6()))?;
    r.set(i.dr(), value);
    r.update_flags(i.dr());
    Ok(())
}

/// LEA: loads PC + sign-extended offset itself into DR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1110 |  DR  | PCoffset9 |
///  -------------------------
/// ```
pub fn lea(i: Instruction, r: &mut Registers) {
    r.set(i.dr(), r.pc().wrapping_add(i.pc_offset9()));
    r.update_flags(i.dr());
}

/// ST: stores SR at the address PC + sign-extended offset.
/// ```text
///  15__12__11_9___8_______0_
/// | 0011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
pub fn st(i: Instruction, r: &Registers, m: &mut Memory) {
    m.write(r.pc().wrapping_add(i.pc_offset9()), r.get(i.dr()));
}

/// STI: store indirect. The word at PC + sign-extended offset holds the
/// address that receives SR.
/// ```text
///  15__12__11_9___8_______0_
/// | 1011 |  SR  | PCoffset9 |
///  -------------------------
/// ```
///
/// # Errors
/// - the pointer read touched the keyboard device and polling failed
pub fn sti(i: Instruction, r: &Registers, m: &mut Memory) -> Result<(), ExecutionError> {
    let pointer = m.read(r.pc().wrapping_add(i.pc_offset9()))?;
    m.write(pointer, r.get(i.dr()));
    Ok(())
}

/// STR: stores SR at the base register plus the sign-extended 6-bit offset.
/// ```text
///  15__12__11_9__8___6____5____0_
/// | 0111 |  SR | BaseR | offset6 |
///  ------------------------------
/// ```
pub fn str(i: Instruction, r: &Registers, m: &mut Memory) {
    m.write(r.get(i.sr1()).wrapping_add(i.offset6()), r.get(i.dr()));
}
