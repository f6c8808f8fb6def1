//! Register definitions for the Maschine register file

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of registers
pub const NUM_REGISTERS: usize = 32;

/// Register (r0-r31)
///
/// r0 is a hard-wired zero sink. A handful of indices carry a calling
/// convention: r2 is the stack pointer, r3 the syscall return value,
/// r5-r7 the syscall arguments, r31 the condition flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Register {
    R0 = 0,   // zero  - hard-wired zero sink
    R1 = 1,
    R2 = 2,   // sp    - stack pointer
    R3 = 3,   // v0    - syscall return value
    R4 = 4,
    R5 = 5,   // a0    - syscall selector
    R6 = 6,   // a1    - syscall argument 1
    R7 = 7,   // a2    - syscall argument 2
    R8 = 8,
    R9 = 9,
    R10 = 10,
    R11 = 11,
    R12 = 12,
    R13 = 13,
    R14 = 14,
    R15 = 15,
    R16 = 16,
    R17 = 17,
    R18 = 18,
    R19 = 19,
    R20 = 20,
    R21 = 21,
    R22 = 22,
    R23 = 23,
    R24 = 24,
    R25 = 25,
    R26 = 26,
    R27 = 27,
    R28 = 28,
    R29 = 29,
    R30 = 30,
    R31 = 31, // flags - condition flags, written only by CMP
}

impl Register {
    pub const ZERO: Self = Self::R0;
    pub const SP: Self = Self::R2;
    pub const V0: Self = Self::R3;
    pub const A0: Self = Self::R5;
    pub const A1: Self = Self::R6;
    pub const A2: Self = Self::R7;
    pub const FLAGS: Self = Self::R31;

    /// Convert a 5-bit field value into a register.
    ///
    /// Every value an instruction can encode (0-31) is a valid
    /// register, so this never fails for masked fields.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        if index < NUM_REGISTERS {
            Some(unsafe { std::mem::transmute::<u8, Register>(index as u8) })
        } else {
            None
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::R0 => "zero",
            Self::R2 => "sp",
            Self::R3 => "v0",
            Self::R5 => "a0",
            Self::R6 => "a1",
            Self::R7 => "a2",
            Self::R31 => "flags",
            Self::R1 => "r1",
            Self::R4 => "r4",
            Self::R8 => "r8",
            Self::R9 => "r9",
            Self::R10 => "r10",
            Self::R11 => "r11",
            Self::R12 => "r12",
            Self::R13 => "r13",
            Self::R14 => "r14",
            Self::R15 => "r15",
            Self::R16 => "r16",
            Self::R17 => "r17",
            Self::R18 => "r18",
            Self::R19 => "r19",
            Self::R20 => "r20",
            Self::R21 => "r21",
            Self::R22 => "r22",
            Self::R23 => "r23",
            Self::R24 => "r24",
            Self::R25 => "r25",
            Self::R26 => "r26",
            Self::R27 => "r27",
            Self::R28 => "r28",
            Self::R29 => "r29",
            Self::R30 => "r30",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
