//! # Maschine Instruction Set
//!
//! Definition crate for a minimal 32-bit register machine:
//!
//! - 32 general registers (r0 hard-wired to zero, r2 = stack pointer,
//!   r31 = condition flags)
//! - 64 KiB byte-addressable memory, big-endian multi-byte values
//! - fixed 24-bit instruction encoding with register/absolute/immediate
//!   addressing, 8/16/32-bit operand widths, and single-level
//!   indirection flags
//! - vectored interrupts with a small syscall table on vector 0
//!
//! The runtime that executes this ISA lives in `maschine-vm`; this
//! crate only knows how instructions are laid out, not how they run.

pub mod encoding;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod register;

pub use error::IsaError;
pub use instruction::{AddrMode, DecodeOutcome, Instruction, OperandSpec, Width};
pub use opcode::Opcode;
pub use register::{Register, NUM_REGISTERS};

/// Size of the flat address space in bytes.
pub const MEM_SIZE: usize = 0x1_0000;

/// Mask applied to every derived address before it touches memory.
///
/// Absolute and indirect resolution read full 32-bit pointers; only the
/// low 16 bits address memory. Wrapping is policy, not an error.
pub const ADDRESS_MASK: u32 = 0xFFFF;

/// Base address of the interrupt vector table. Entry `n` is the
/// big-endian u32 at `INTERRUPT_TABLE + n * 4`.
pub const INTERRUPT_TABLE: u32 = 0xFF7F;

/// Interrupt vector reserved for the syscall table.
pub const SYS_INTERRUPT: u32 = 0;

/// Machine word (register width).
pub type Word = u32;

/// Wrap a derived 32-bit address into the 16-bit address space.
#[inline]
pub const fn wrap_address(raw: u32) -> u16 {
    (raw & ADDRESS_MASK) as u16
}
