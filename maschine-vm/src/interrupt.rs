//! Interrupt and syscall controller
//!
//! `INTERRUPT n` with `n != 0` looks up the handler address in the
//! vector table and enters it through the same push-PC-and-jump
//! sequence as CALL, so a handler returns with RET. Vector 0 is the
//! system interrupt: a small fixed table of host I/O services selected
//! by the a0 register.
//!
//! Syscall convention:
//! - a0 (r5): syscall selector
//! - a1 (r6): first argument (byte for WRITE_CHAR, string address for
//!   WRITE_STRING/WRITE_LINE)
//! - v0 (r3): return value (the byte read by READ_CHAR)

use crate::error::Result;
use crate::io::Io;
use crate::memory::Memory;
use crate::stack::push_pc_and_jump;
use crate::state::MachineState;
use maschine_isa::{wrap_address, Register, INTERRUPT_TABLE, SYS_INTERRUPT};

/// Syscall selector numbers
pub const SYSCALL_STRING_LENGTH: u32 = 0;
pub const SYSCALL_STRING_COMPARE: u32 = 1;
pub const SYSCALL_READ_CHAR: u32 = 2;
pub const SYSCALL_READ_LINE: u32 = 3;
pub const SYSCALL_WRITE_CHAR: u32 = 4;
pub const SYSCALL_WRITE_STRING: u32 = 5;
pub const SYSCALL_WRITE_LINE: u32 = 6;

/// Dispatch an INTERRUPT instruction's vector argument.
pub fn handle_interrupt<I: Io>(
    state: &mut MachineState,
    mem: &mut Memory,
    io: &mut I,
    vector: u32,
) -> Result<()> {
    if vector != SYS_INTERRUPT {
        let entry = INTERRUPT_TABLE.wrapping_add(vector.wrapping_mul(4));
        let handler = mem.read_u32(wrap_address(entry));
        push_pc_and_jump(state, mem, handler);
        return Ok(());
    }
    handle_syscall(state, mem, io)
}

/// The fixed syscall table on the system interrupt (vector 0).
fn handle_syscall<I: Io>(state: &mut MachineState, mem: &mut Memory, io: &mut I) -> Result<()> {
    let selector = state.read_reg(Register::A0);

    match selector {
        SYSCALL_READ_CHAR => {
            // The only blocking point in the machine.
            let byte = io.read_byte()?;
            state.write_reg(Register::V0, byte as u32);
        }

        SYSCALL_WRITE_CHAR => {
            let byte = state.read_reg(Register::A1) as u8;
            io.write_byte(byte)?;
        }

        SYSCALL_WRITE_STRING => {
            let addr = wrap_address(state.read_reg(Register::A1));
            io.write_bytes(&mem.read_cstr(addr))?;
        }

        SYSCALL_WRITE_LINE => {
            let addr = wrap_address(state.read_reg(Register::A1));
            let mut bytes = mem.read_cstr(addr);
            bytes.push(b'\n');
            io.write_bytes(&bytes)?;
        }

        SYSCALL_STRING_LENGTH | SYSCALL_STRING_COMPARE | SYSCALL_READ_LINE => {
            // Reserved selectors: declared by the ISA, never wired up.
            tracing::debug!(selector, "reserved syscall selector, ignoring");
        }

        other => {
            tracing::debug!(selector = other, "unknown syscall selector, ignoring");
        }
    }

    Ok(())
}
