//! Condition flags and the conditional-jump predicate table
//!
//! Two flag bits, written only by CMP on unsigned 32-bit operands:
//! bit 0 = source equals destination, bit 1 = source greater than
//! destination. The six conditional jumps each test a fixed predicate
//! over those bits; nothing else reads or writes them.

use maschine_isa::Opcode;

/// CMP sets bit 0 on equality
pub const FLAG_EQUAL: u32 = 1 << 0;

/// CMP sets bit 1 when the source is (unsigned) greater
pub const FLAG_GREATER: u32 = 1 << 1;

/// Flags value produced by `CMP src, dst`
#[inline]
pub fn compare(src: u32, dst: u32) -> u32 {
    (src == dst) as u32 | ((src > dst) as u32) << 1
}

/// Evaluate a conditional jump's predicate against the flags register.
///
/// `J` is unconditional and not routed through here; passing a
/// non-jump opcode is a programming error.
pub fn condition_met(opcode: Opcode, flags: u32) -> bool {
    let equal = flags & FLAG_EQUAL != 0;
    let greater = flags & FLAG_GREATER != 0;
    match opcode {
        Opcode::Je => equal,
        Opcode::Jne => !equal,
        Opcode::Jg => greater,
        Opcode::Jge => equal || greater,
        Opcode::Jl => !(equal || greater),
        Opcode::Jle => !greater,
        other => unreachable!("{other} is not a conditional jump"),
    }
}
