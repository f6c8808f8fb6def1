//! Machine state: the register file, program counter, and halt flag

use maschine_isa::{Register, Word, NUM_REGISTERS};

/// Register file plus program counter.
///
/// The PC is a dedicated field rather than a register slot; every
/// opcode that reads or writes "pc" goes through it. Register 0 is a
/// hard-wired zero sink at this level, independent of the resolver's
/// discard short-circuit.
#[derive(Debug, Clone)]
pub struct MachineState {
    registers: [Word; NUM_REGISTERS],
    pub pc: u32,
    halted: bool,
}

impl MachineState {
    pub fn new() -> Self {
        MachineState {
            registers: [0; NUM_REGISTERS],
            pc: 0,
            halted: false,
        }
    }

    /// Read a register (r0 always yields 0)
    #[inline]
    pub fn read_reg(&self, reg: Register) -> Word {
        if reg.is_zero() {
            0
        } else {
            self.registers[reg.index()]
        }
    }

    /// Write a register (writes to r0 are discarded)
    #[inline]
    pub fn write_reg(&mut self, reg: Register, value: Word) {
        if !reg.is_zero() {
            self.registers[reg.index()] = value;
        }
    }

    #[inline]
    pub fn sp(&self) -> u32 {
        self.read_reg(Register::SP)
    }

    #[inline]
    pub fn set_sp(&mut self, value: u32) {
        self.write_reg(Register::SP, value);
    }

    /// Condition flags, as written by CMP
    #[inline]
    pub fn flags(&self) -> u32 {
        self.read_reg(Register::FLAGS)
    }

    #[inline]
    pub fn set_flags(&mut self, value: u32) {
        self.write_reg(Register::FLAGS, value);
    }

    #[inline]
    pub fn halt(&mut self) {
        self.halted = true;
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Read-only view of the whole register file, for diagnostics
    pub fn registers(&self) -> &[Word; NUM_REGISTERS] {
        &self.registers
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}
