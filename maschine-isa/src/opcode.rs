//! # Maschine Opcode Definitions
//!
//! Opcodes are 5 bits (0x00-0x1E; 0x1F is unassigned). They are
//! organized by family:
//!
//! - 0x00-0x02: control/stack (HLT, PUSH, POP)
//! - 0x03-0x09: arithmetic (ADD, SUB, MUL, DIV, MOD, SHL, SHR)
//! - 0x0A-0x0B: data movement (MOV, XCHG)
//! - 0x0C-0x12: bitwise (AND, OR, XOR, NAND, NOR, XNOR, NOT)
//! - 0x13: compare (CMP, the only flags writer)
//! - 0x14-0x1A: jumps (J, JE, JNE, JG, JGE, JL, JLE)
//! - 0x1B-0x1D: call/interrupt (CALL, RET, INTERRUPT)
//! - 0x1E: LEA (reserved, never implemented)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction opcode (5 bits)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// HLT: stop the machine
    Hlt = 0x00,
    /// PUSH: mem[sp] = src (width-sized); sp += width/8
    Push = 0x01,
    /// POP: sp -= width/8; dst = mem[sp] (width-sized)
    Pop = 0x02,
    /// ADD: dst = src + dst
    Add = 0x03,
    /// SUB: dst = src - dst
    Sub = 0x04,
    /// MUL: dst = src * dst
    Mul = 0x05,
    /// DIV: dst = src / dst; dst == 0 is a fatal error
    Div = 0x06,
    /// MOD: dst = src % dst; dst == 0 is a fatal error
    Mod = 0x07,
    /// SHL: dst = src << dst
    Shl = 0x08,
    /// SHR: dst = src >> dst (logical)
    Shr = 0x09,
    /// MOV: dst = src
    Mov = 0x0A,
    /// XCHG: dst = src, src = dst
    Xchg = 0x0B,
    /// AND: dst = src & dst
    And = 0x0C,
    /// OR: dst = src | dst
    Or = 0x0D,
    /// XOR: dst = src ^ dst
    Xor = 0x0E,
    /// NAND: dst = !(src & dst)
    Nand = 0x0F,
    /// NOR: dst = !(src | dst)
    Nor = 0x10,
    /// XNOR: dst = !(src ^ dst)
    Xnor = 0x11,
    /// NOT: dst = !dst (unary, no source operand)
    Not = 0x12,
    /// CMP: flags = (src == dst) | (src > dst) << 1; dst unchanged
    Cmp = 0x13,
    /// J: pc = dst
    J = 0x14,
    /// JE: if flags.equal, pc = dst
    Je = 0x15,
    /// JNE: if !flags.equal, pc = dst
    Jne = 0x16,
    /// JG: if flags.greater, pc = dst
    Jg = 0x17,
    /// JGE: if flags.equal | flags.greater, pc = dst
    Jge = 0x18,
    /// JL: if !(flags.equal | flags.greater), pc = dst
    Jl = 0x19,
    /// JLE: if !flags.greater, pc = dst
    Jle = 0x1A,
    /// CALL: push pc (4 bytes); pc = dst
    Call = 0x1B,
    /// RET: pop pc (4 bytes)
    Ret = 0x1C,
    /// INTERRUPT: vectored dispatch with dst as the vector number
    Interrupt = 0x1D,
    /// LEA: reserved; executing it raises the unsupported-opcode event
    Lea = 0x1E,
}

impl Opcode {
    /// Opcode field width in bits
    pub const BITS: u32 = 5;

    /// Opcode field mask
    pub const MASK: u32 = 0x1F;

    /// Try to convert from a 5-bit field value.
    ///
    /// Returns `None` for the single unassigned value (0x1F); the
    /// decoder turns that into a recoverable unsupported-opcode event.
    pub fn from_u5(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Opcode::Hlt),
            0x01 => Some(Opcode::Push),
            0x02 => Some(Opcode::Pop),
            0x03 => Some(Opcode::Add),
            0x04 => Some(Opcode::Sub),
            0x05 => Some(Opcode::Mul),
            0x06 => Some(Opcode::Div),
            0x07 => Some(Opcode::Mod),
            0x08 => Some(Opcode::Shl),
            0x09 => Some(Opcode::Shr),
            0x0A => Some(Opcode::Mov),
            0x0B => Some(Opcode::Xchg),
            0x0C => Some(Opcode::And),
            0x0D => Some(Opcode::Or),
            0x0E => Some(Opcode::Xor),
            0x0F => Some(Opcode::Nand),
            0x10 => Some(Opcode::Nor),
            0x11 => Some(Opcode::Xnor),
            0x12 => Some(Opcode::Not),
            0x13 => Some(Opcode::Cmp),
            0x14 => Some(Opcode::J),
            0x15 => Some(Opcode::Je),
            0x16 => Some(Opcode::Jne),
            0x17 => Some(Opcode::Jg),
            0x18 => Some(Opcode::Jge),
            0x19 => Some(Opcode::Jl),
            0x1A => Some(Opcode::Jle),
            0x1B => Some(Opcode::Call),
            0x1C => Some(Opcode::Ret),
            0x1D => Some(Opcode::Interrupt),
            0x1E => Some(Opcode::Lea),
            _ => None,
        }
    }

    #[inline]
    pub fn to_u5(self) -> u8 {
        self as u8
    }

    /// Does this opcode resolve a source operand?
    pub fn has_src(self) -> bool {
        !matches!(
            self,
            Opcode::Hlt
                | Opcode::Pop
                | Opcode::Not
                | Opcode::J
                | Opcode::Je
                | Opcode::Jne
                | Opcode::Jg
                | Opcode::Jge
                | Opcode::Jl
                | Opcode::Jle
                | Opcode::Ret
                | Opcode::Call
                | Opcode::Interrupt
        )
    }

    /// Does this opcode resolve a destination operand?
    ///
    /// Jumps, CALL and INTERRUPT resolve one: they read its value as
    /// the target or vector without writing back.
    pub fn has_dst(self) -> bool {
        !matches!(self, Opcode::Hlt | Opcode::Push | Opcode::Ret)
    }

    /// Does this opcode write a result through its destination
    /// location? Only these reject an immediate destination at decode.
    pub fn writes_back(self) -> bool {
        matches!(
            self,
            Opcode::Pop
                | Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Mod
                | Opcode::Shl
                | Opcode::Shr
                | Opcode::Mov
                | Opcode::Xchg
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Nand
                | Opcode::Nor
                | Opcode::Xnor
                | Opcode::Not
        )
    }

    /// Is this one of the six flag-tested jumps?
    pub fn is_conditional_jump(self) -> bool {
        matches!(
            self,
            Opcode::Je | Opcode::Jne | Opcode::Jg | Opcode::Jge | Opcode::Jl | Opcode::Jle
        )
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "hlt",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Mod => "mod",
            Opcode::Shl => "shl",
            Opcode::Shr => "shr",
            Opcode::Mov => "mov",
            Opcode::Xchg => "xchg",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Nand => "nand",
            Opcode::Nor => "nor",
            Opcode::Xnor => "xnor",
            Opcode::Not => "not",
            Opcode::Cmp => "cmp",
            Opcode::J => "j",
            Opcode::Je => "je",
            Opcode::Jne => "jne",
            Opcode::Jg => "jg",
            Opcode::Jge => "jge",
            Opcode::Jl => "jl",
            Opcode::Jle => "jle",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Interrupt => "int",
            Opcode::Lea => "lea",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
