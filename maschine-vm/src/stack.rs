//! Stack and call unit
//!
//! The stack pointer (r2) is a byte offset into memory that grows
//! upward; the loader initializes it, the core assumes nothing about
//! its starting value. PUSH/POP move it by the instruction's operand
//! width; CALL/RET always transfer a full 32-bit PC and move it by 4.
//! Stack addresses wrap into the 16-bit address space like every
//! other derived address.

use crate::memory::Memory;
use crate::state::MachineState;
use maschine_isa::{wrap_address, Width};

/// PUSH: store a width-sized value at `mem[sp]`, then bump SP.
pub fn push_value(state: &mut MachineState, mem: &mut Memory, width: Width, value: u32) {
    let sp = state.sp();
    mem.write_value(wrap_address(sp), width, value);
    state.set_sp(sp.wrapping_add(width.bytes()));
}

/// POP: drop SP by the operand width, then load from `mem[sp]`.
pub fn pop_value(state: &mut MachineState, mem: &Memory, width: Width) -> u32 {
    let sp = state.sp().wrapping_sub(width.bytes());
    state.set_sp(sp);
    mem.read_value(wrap_address(sp), width)
}

/// Shared CALL/interrupt entry: push the current (post-decode) PC as
/// a full 32-bit value and transfer control.
pub fn push_pc_and_jump(state: &mut MachineState, mem: &mut Memory, target: u32) {
    let sp = state.sp();
    mem.write_u32(wrap_address(sp), state.pc);
    state.set_sp(sp.wrapping_add(4));
    state.pc = wrap_address(target) as u32;
}

/// RET: pop a full 32-bit return address into PC.
pub fn pop_pc(state: &mut MachineState, mem: &Memory) {
    let sp = state.sp().wrapping_sub(4);
    state.pc = wrap_address(mem.read_u32(wrap_address(sp))) as u32;
    state.set_sp(sp);
}
