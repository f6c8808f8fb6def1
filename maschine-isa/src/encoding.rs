//! # Instruction Encoding Constants and Helpers
//!
//! Centralized constants and helpers for the fixed 24-bit instruction
//! word. Instructions occupy exactly three bytes in memory, big-endian
//! like every other multi-byte value.
//!
//! ## Instruction Format (24-bit)
//!
//! ```text
//! [opcode:5][src_mode:2][dst_mode:2][src_reg:5][dst_reg:5][width:2][signed:1][src_ind:1][dst_ind:1]
//!  23     19 18      17 16       15 14      10 9        5 4      3 2        1         0
//! ```
//!
//! Immediate and absolute operands follow the word in the instruction
//! stream and are consumed during operand resolution, not here.

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Opcode field: bits 19-23 (5 bits)
pub const OPCODE_SHIFT: u32 = 19;

/// Source addressing-mode field: bits 17-18 (2 bits)
pub const SRC_MODE_SHIFT: u32 = 17;

/// Destination addressing-mode field: bits 15-16 (2 bits)
pub const DST_MODE_SHIFT: u32 = 15;

/// Source register field: bits 10-14 (5 bits)
pub const SRC_REG_SHIFT: u32 = 10;

/// Destination register field: bits 5-9 (5 bits)
pub const DST_REG_SHIFT: u32 = 5;

/// Operand width code field: bits 3-4 (2 bits)
pub const WIDTH_SHIFT: u32 = 3;

/// Signed-operation flag: bit 2
pub const SIGNED_BIT: u32 = 1 << 2;

/// Source indirection flag: bit 1
pub const SRC_INDIRECT_BIT: u32 = 1 << 1;

/// Destination indirection flag: bit 0
pub const DST_INDIRECT_BIT: u32 = 1 << 0;

// ============================================================================
// Field Masks
// ============================================================================

/// Opcode mask (5 bits)
pub const OPCODE_MASK: u32 = 0x1F;

/// Addressing-mode mask (2 bits)
pub const MODE_MASK: u32 = 0x3;

/// Register field mask (5 bits)
pub const REGISTER_MASK: u32 = 0x1F;

/// Width code mask (2 bits)
pub const WIDTH_MASK: u32 = 0x3;

/// Encoded instruction length in bytes
pub const INSTRUCTION_LEN: u32 = 3;

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Extract the opcode value (bits 19-23)
#[inline]
pub const fn extract_opcode(word: u32) -> u8 {
    ((word >> OPCODE_SHIFT) & OPCODE_MASK) as u8
}

/// Extract the source addressing-mode code (bits 17-18)
#[inline]
pub const fn extract_src_mode(word: u32) -> u8 {
    ((word >> SRC_MODE_SHIFT) & MODE_MASK) as u8
}

/// Extract the destination addressing-mode code (bits 15-16)
#[inline]
pub const fn extract_dst_mode(word: u32) -> u8 {
    ((word >> DST_MODE_SHIFT) & MODE_MASK) as u8
}

/// Extract the source register index (bits 10-14)
#[inline]
pub const fn extract_src_reg(word: u32) -> u8 {
    ((word >> SRC_REG_SHIFT) & REGISTER_MASK) as u8
}

/// Extract the destination register index (bits 5-9)
#[inline]
pub const fn extract_dst_reg(word: u32) -> u8 {
    ((word >> DST_REG_SHIFT) & REGISTER_MASK) as u8
}

/// Extract the operand width code (bits 3-4)
#[inline]
pub const fn extract_width_code(word: u32) -> u8 {
    ((word >> WIDTH_SHIFT) & WIDTH_MASK) as u8
}

/// Extract the signed-operation flag (bit 2)
#[inline]
pub const fn extract_signed(word: u32) -> bool {
    word & SIGNED_BIT != 0
}

/// Extract the source indirection flag (bit 1)
#[inline]
pub const fn extract_src_indirect(word: u32) -> bool {
    word & SRC_INDIRECT_BIT != 0
}

/// Extract the destination indirection flag (bit 0)
#[inline]
pub const fn extract_dst_indirect(word: u32) -> bool {
    word & DST_INDIRECT_BIT != 0
}

// ============================================================================
// Word <-> Byte Conversion
// ============================================================================

/// Assemble the 24-bit instruction word from its three bytes in
/// canonical (big-endian) order.
#[inline]
pub const fn word_from_bytes(bytes: [u8; 3]) -> u32 {
    (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32
}

/// Split a 24-bit instruction word into canonical-order bytes.
#[inline]
pub const fn word_to_bytes(word: u32) -> [u8; 3] {
    [(word >> 16) as u8, (word >> 8) as u8, word as u8]
}

// ============================================================================
// Instruction Encoding
// ============================================================================

/// Build a 24-bit instruction word from raw field values.
///
/// Fields are masked to their widths; validation is the decoder's job.
#[allow(clippy::too_many_arguments)]
#[inline]
pub const fn encode_word(
    opcode: u8,
    src_mode: u8,
    dst_mode: u8,
    src_reg: u8,
    dst_reg: u8,
    width_code: u8,
    signed: bool,
    src_indirect: bool,
    dst_indirect: bool,
) -> u32 {
    ((opcode as u32 & OPCODE_MASK) << OPCODE_SHIFT)
        | ((src_mode as u32 & MODE_MASK) << SRC_MODE_SHIFT)
        | ((dst_mode as u32 & MODE_MASK) << DST_MODE_SHIFT)
        | ((src_reg as u32 & REGISTER_MASK) << SRC_REG_SHIFT)
        | ((dst_reg as u32 & REGISTER_MASK) << DST_REG_SHIFT)
        | ((width_code as u32 & WIDTH_MASK) << WIDTH_SHIFT)
        | if signed { SIGNED_BIT } else { 0 }
        | if src_indirect { SRC_INDIRECT_BIT } else { 0 }
        | if dst_indirect { DST_INDIRECT_BIT } else { 0 }
}
