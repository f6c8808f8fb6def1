//! Operand resolution
//!
//! Turns an addressing-mode descriptor into a tagged [`Location`] and
//! provides the width- and sign-aware value access on top of it. The
//! tagged variant replaces any notion of raw pointers into either
//! storage array: a location is a register cell, a memory address, or
//! the discard sink that register 0 resolves to as a destination.

use crate::memory::Memory;
use crate::state::MachineState;
use maschine_isa::{wrap_address, AddrMode, OperandSpec, Register, Width};

/// A resolved operand location
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Location {
    Register(Register),
    Memory(u16),
    /// Writes are no-ops, reads yield zero. Produced for a
    /// register-direct destination naming register 0.
    Discard,
}

/// Sign-extend the low `width` bits of `value` to a full machine word.
#[inline]
pub fn sign_extend(value: u32, width: Width) -> u32 {
    let value = value & width.mask();
    if width != Width::Dword && value & (1 << (width.bits() - 1)) != 0 {
        value | !width.mask()
    } else {
        value
    }
}

/// Resolve a source operand.
pub fn resolve_src(
    state: &mut MachineState,
    mem: &Memory,
    spec: OperandSpec,
    width: Width,
) -> Location {
    resolve(state, mem, spec, width, false)
}

/// Resolve a destination operand.
///
/// Register-direct register 0 short-circuits to [`Location::Discard`]
/// before any indirection is applied.
pub fn resolve_dst(
    state: &mut MachineState,
    mem: &Memory,
    spec: OperandSpec,
    width: Width,
) -> Location {
    resolve(state, mem, spec, width, true)
}

fn resolve(
    state: &mut MachineState,
    mem: &Memory,
    spec: OperandSpec,
    width: Width,
    is_dst: bool,
) -> Location {
    if is_dst && spec.mode == AddrMode::Register && spec.reg.is_zero() {
        return Location::Discard;
    }

    let base = match spec.mode {
        AddrMode::Register => Location::Register(spec.reg),
        AddrMode::Immediate => {
            // The operand value sits in the instruction stream.
            let loc = Location::Memory(wrap_address(state.pc));
            state.pc += width.bytes();
            loc
        }
        AddrMode::Absolute => {
            // Always a full 32-bit pointer fetch, regardless of the
            // operand's declared width.
            let ptr = mem.read_u32(wrap_address(state.pc));
            state.pc += 4;
            Location::Memory(wrap_address(ptr))
        }
    };

    if spec.indirect {
        // Exactly one extra hop: reinterpret the 32-bit contents at
        // the base location as a memory address.
        let ptr = read_word(state, mem, base);
        Location::Memory(wrap_address(ptr))
    } else {
        base
    }
}

/// Full 32-bit read of a location's contents (indirection and
/// call/ret traffic ignore the declared operand width).
pub fn read_word(state: &MachineState, mem: &Memory, loc: Location) -> u32 {
    match loc {
        Location::Register(reg) => state.read_reg(reg),
        Location::Memory(addr) => mem.read_u32(addr),
        Location::Discard => 0,
    }
}

/// Read a width-sized value from a location, sign- or zero-extended
/// to 32 bits per the instruction's sign flag.
pub fn read_value(
    state: &MachineState,
    mem: &Memory,
    loc: Location,
    width: Width,
    signed: bool,
) -> u32 {
    let raw = match loc {
        Location::Register(reg) => state.read_reg(reg) & width.mask(),
        Location::Memory(addr) => mem.read_value(addr, width),
        Location::Discard => 0,
    };
    if signed {
        sign_extend(raw, width)
    } else {
        raw
    }
}

/// Write the low `width` bits of `value` to a location.
///
/// Memory takes a fixed-width sub-store; a register keeps its bits
/// above the declared width (read-modify-write at the declaration
/// boundary). Each policy is applied uniformly for its storage kind.
pub fn write_value(
    state: &mut MachineState,
    mem: &mut Memory,
    loc: Location,
    width: Width,
    value: u32,
) {
    match loc {
        Location::Register(reg) => {
            let kept = state.read_reg(reg) & !width.mask();
            state.write_reg(reg, kept | (value & width.mask()));
        }
        Location::Memory(addr) => mem.write_value(addr, width, value),
        Location::Discard => {}
    }
}
