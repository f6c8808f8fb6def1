//! # Decoded Instruction Types
//!
//! A fetched 24-bit word decodes into an [`Instruction`]: opcode plus
//! an addressing-mode descriptor for each operand. Decoding validates
//! the width code, the addressing-mode codes, and the
//! immediate-destination rule; an unassigned opcode value is returned
//! as a recoverable [`DecodeOutcome::Unsupported`] rather than an
//! error.

use crate::encoding;
use crate::error::IsaError;
use crate::opcode::Opcode;
use crate::register::Register;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand addressing mode (2-bit field)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AddrMode {
    /// Operand lives in the encoded register
    Register = 0,
    /// A 32-bit pointer follows in the instruction stream; its low 16
    /// bits address memory
    Absolute = 1,
    /// The operand value itself follows in the instruction stream
    /// (width-sized); valid only as a source
    Immediate = 2,
}

impl AddrMode {
    pub fn from_code(code: u8) -> Result<Self, IsaError> {
        match code {
            0 => Ok(AddrMode::Register),
            1 => Ok(AddrMode::Absolute),
            2 => Ok(AddrMode::Immediate),
            other => Err(IsaError::InvalidAddressingMode(other)),
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Operand width (2-bit size code)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Width {
    /// 8-bit operand (size code 0)
    Byte = 0,
    /// 16-bit operand (size code 1)
    Word = 1,
    /// 32-bit operand (size code 2)
    Dword = 2,
}

impl Width {
    /// Decode the 2-bit size code; code 3 is reserved and rejected.
    pub fn from_code(code: u8) -> Result<Self, IsaError> {
        match code {
            0 => Ok(Width::Byte),
            1 => Ok(Width::Word),
            2 => Ok(Width::Dword),
            other => Err(IsaError::InvalidWidthCode(other)),
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Width in bits (8, 16 or 32)
    #[inline]
    pub fn bits(self) -> u32 {
        8 << (self as u32)
    }

    /// Width in bytes (1, 2 or 4)
    #[inline]
    pub fn bytes(self) -> u32 {
        1 << (self as u32)
    }

    /// Mask covering the low `bits()` bits of a machine word
    #[inline]
    pub fn mask(self) -> u32 {
        if self == Width::Dword {
            u32::MAX
        } else {
            (1 << self.bits()) - 1
        }
    }
}

/// One operand descriptor: base register, addressing mode, and the
/// single-level indirection flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandSpec {
    pub reg: Register,
    pub mode: AddrMode,
    pub indirect: bool,
}

/// A decoded instruction (transient; never stored back to memory)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub src: OperandSpec,
    pub dst: OperandSpec,
    pub width: Width,
    pub signed: bool,
}

/// Result of decoding a fetched word.
///
/// An unassigned opcode value is a first-class recoverable event, not
/// an error: the engine reports it and resumes at the next fetch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    Decoded(Instruction),
    /// The 5-bit opcode field held an unassigned value
    Unsupported { raw_opcode: u8 },
}

impl Instruction {
    /// Decode a 24-bit instruction word.
    ///
    /// Fails on the reserved width code, an invalid addressing-mode
    /// code, or an immediate destination on a write-back opcode.
    pub fn decode(word: u32) -> Result<DecodeOutcome, IsaError> {
        let width = Width::from_code(encoding::extract_width_code(word))?;
        let src_mode = AddrMode::from_code(encoding::extract_src_mode(word))?;
        let dst_mode = AddrMode::from_code(encoding::extract_dst_mode(word))?;

        let raw_opcode = encoding::extract_opcode(word);
        let opcode = match Opcode::from_u5(raw_opcode) {
            Some(op) => op,
            None => return Ok(DecodeOutcome::Unsupported { raw_opcode }),
        };

        if opcode.writes_back() && dst_mode == AddrMode::Immediate {
            return Err(IsaError::ImmediateDestination(opcode));
        }

        // 5-bit fields are always valid register indices.
        let src_reg = Register::from_index(encoding::extract_src_reg(word) as usize)
            .expect("masked 5-bit register field");
        let dst_reg = Register::from_index(encoding::extract_dst_reg(word) as usize)
            .expect("masked 5-bit register field");

        Ok(DecodeOutcome::Decoded(Instruction {
            opcode,
            src: OperandSpec {
                reg: src_reg,
                mode: src_mode,
                indirect: encoding::extract_src_indirect(word),
            },
            dst: OperandSpec {
                reg: dst_reg,
                mode: dst_mode,
                indirect: encoding::extract_dst_indirect(word),
            },
            width,
            signed: encoding::extract_signed(word),
        }))
    }

    /// Re-encode into the 24-bit word (inverse of [`Instruction::decode`])
    pub fn encode(&self) -> u32 {
        encoding::encode_word(
            self.opcode.to_u5(),
            self.src.mode.code(),
            self.dst.mode.code(),
            self.src.reg.index() as u8,
            self.dst.reg.index() as u8,
            self.width.code(),
            self.signed,
            self.src.indirect,
            self.dst.indirect,
        )
    }

    /// Encode into the three instruction-stream bytes
    pub fn to_bytes(&self) -> [u8; 3] {
        encoding::word_to_bytes(self.encode())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} src={}({:?}{}) dst={}({:?}{}) w{}{}",
            self.opcode,
            self.src.reg,
            self.src.mode,
            if self.src.indirect { ",ind" } else { "" },
            self.dst.reg,
            self.dst.mode,
            if self.dst.indirect { ",ind" } else { "" },
            self.width.bits(),
            if self.signed { " signed" } else { "" },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::encode_word;

    fn decoded(word: u32) -> Instruction {
        match Instruction::decode(word).unwrap() {
            DecodeOutcome::Decoded(inst) => inst,
            DecodeOutcome::Unsupported { raw_opcode } => {
                panic!("unexpected unsupported opcode {raw_opcode}")
            }
        }
    }

    #[test]
    fn test_width_codes() {
        assert_eq!(Width::from_code(0).unwrap().bits(), 8);
        assert_eq!(Width::from_code(1).unwrap().bits(), 16);
        assert_eq!(Width::from_code(2).unwrap().bits(), 32);
        assert_eq!(Width::from_code(3), Err(IsaError::InvalidWidthCode(3)));
    }

    #[test]
    fn test_width_masks() {
        assert_eq!(Width::Byte.mask(), 0xFF);
        assert_eq!(Width::Word.mask(), 0xFFFF);
        assert_eq!(Width::Dword.mask(), u32::MAX);
        assert_eq!(Width::Byte.bytes(), 1);
        assert_eq!(Width::Word.bytes(), 2);
        assert_eq!(Width::Dword.bytes(), 4);
    }

    #[test]
    fn test_decode_reserved_width_code() {
        let word = encode_word(Opcode::Mov.to_u5(), 0, 0, 1, 2, 3, false, false, false);
        assert_eq!(Instruction::decode(word), Err(IsaError::InvalidWidthCode(3)));
    }

    #[test]
    fn test_decode_invalid_mode_code() {
        let word = encode_word(Opcode::Mov.to_u5(), 3, 0, 1, 2, 2, false, false, false);
        assert_eq!(
            Instruction::decode(word),
            Err(IsaError::InvalidAddressingMode(3))
        );
    }

    #[test]
    fn test_decode_immediate_destination_rejected() {
        // MOV writes back: immediate destination is a decode error.
        let word = encode_word(Opcode::Mov.to_u5(), 0, 2, 1, 2, 2, false, false, false);
        assert_eq!(
            Instruction::decode(word),
            Err(IsaError::ImmediateDestination(Opcode::Mov))
        );
    }

    #[test]
    fn test_decode_immediate_jump_target_allowed() {
        // J does not write back: an immediate destination is a valid
        // way to encode the jump target.
        let word = encode_word(Opcode::J.to_u5(), 0, 2, 0, 0, 2, false, false, false);
        let inst = decoded(word);
        assert_eq!(inst.opcode, Opcode::J);
        assert_eq!(inst.dst.mode, AddrMode::Immediate);
    }

    #[test]
    fn test_decode_unsupported_opcode_is_not_an_error() {
        let word = encode_word(0x1F, 0, 0, 0, 0, 0, false, false, false);
        assert_eq!(
            Instruction::decode(word).unwrap(),
            DecodeOutcome::Unsupported { raw_opcode: 0x1F }
        );
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let inst = Instruction {
            opcode: Opcode::Xchg,
            src: OperandSpec {
                reg: Register::R9,
                mode: AddrMode::Absolute,
                indirect: true,
            },
            dst: OperandSpec {
                reg: Register::R17,
                mode: AddrMode::Register,
                indirect: false,
            },
            width: Width::Word,
            signed: true,
        };
        assert_eq!(DecodeOutcome::Decoded(inst), Instruction::decode(inst.encode()).unwrap());
    }

    #[test]
    fn test_decode_all_fields() {
        let word = encode_word(
            Opcode::Cmp.to_u5(),
            AddrMode::Immediate.code(),
            AddrMode::Register.code(),
            5,
            31,
            Width::Dword.code(),
            true,
            false,
            true,
        );
        let inst = decoded(word);
        assert_eq!(inst.opcode, Opcode::Cmp);
        assert_eq!(inst.src.mode, AddrMode::Immediate);
        assert_eq!(inst.src.reg, Register::R5);
        assert!(!inst.src.indirect);
        assert_eq!(inst.dst.mode, AddrMode::Register);
        assert_eq!(inst.dst.reg, Register::R31);
        assert!(inst.dst.indirect);
        assert_eq!(inst.width, Width::Dword);
        assert!(inst.signed);
    }
}
