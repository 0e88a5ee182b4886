//! The register file: eight general-purpose registers, the program counter,
//! and the condition flags.

/// Address of the first instruction a program executes.
pub const PC_START: u16 = 0x3000;

/// Machine registers, mutated only by the executive loop and its handlers.
///
/// All values are raw 16-bit words; signed interpretation is two's
/// complement on the same bits, and address arithmetic wraps modulo 2^16.
pub struct Registers {
    general: [u16; 8],
    pc: u16,
    cond: ConditionFlag,
}

impl Registers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            general: [0; 8],
            pc: PC_START,
            cond: ConditionFlag::Zero,
        }
    }

    /// Value of general-purpose register `r`.
    ///
    /// # Panics
    /// - debug builds assert `r` is a decoded 3-bit register number
    #[must_use]
    pub fn get(&self, r: u16) -> u16 {
        debug_assert!(r < 8, "register number out of range: {r}");
        self.general[usize::from(r & 0x7)]
    }

    pub fn set(&mut self, r: u16, value: u16) {
        debug_assert!(r < 8, "register number out of range: {r}");
        self.general[usize::from(r & 0x7)] = value;
    }

    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    /// Moves the PC past the instruction just fetched.
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1);
    }

    #[must_use]
    pub const fn cond(&self) -> ConditionFlag {
        self.cond
    }

    /// Derives the condition flags from the value just written to `r`.
    pub fn update_flags(&mut self, r: u16) {
        self.cond = ConditionFlag::for_value(self.get(r));
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, value) in self.general.iter().enumerate() {
            writeln!(f, "R{index}: {value:#06X}")?;
        }
        writeln!(f, "PC: {:#06X}", self.pc)?;
        write!(f, "COND: {:?}", self.cond)
    }
}

/// Sign of the last value written to a general-purpose register.
///
/// Exactly one flag is set at any instant. The discriminants match the bit
/// positions `BR` tests against its `nzp` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionFlag {
    Pos = 1 << 0,
    Zero = 1 << 1,
    Neg = 1 << 2,
}

impl ConditionFlag {
    #[must_use]
    pub fn for_value(value: u16) -> Self {
        if value == 0 {
            Self::Zero
        } else if value >> 15 == 1 {
            // leftmost bit set means negative in two's complement
            Self::Neg
        } else {
            Self::Pos
        }
    }

    /// The flag as the single bit `BR` masks with its `nzp` field.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self as u16
    }
}
