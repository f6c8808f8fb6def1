//! # Error Types for the Maschine ISA

use crate::opcode::Opcode;
use thiserror::Error;

/// Fatal decode errors.
///
/// A missed opcode-table lookup is deliberately *not* an error here;
/// it surfaces as [`crate::DecodeOutcome::Unsupported`] so the engine
/// can report it and keep running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsaError {
    #[error("invalid operand width code {0} (valid codes: 0=8-bit, 1=16-bit, 2=32-bit)")]
    InvalidWidthCode(u8),

    #[error("invalid addressing mode code {0} (valid modes: 0=register, 1=absolute, 2=immediate)")]
    InvalidAddressingMode(u8),

    #[error("opcode {0} writes back and cannot take an immediate destination")]
    ImmediateDestination(Opcode),
}
