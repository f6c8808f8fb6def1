//! Instruction execution
//!
//! One `step` is the atomic fetch-decode-resolve-execute-advance unit
//! the rest of the crate builds on: the run loop drives it until the
//! machine halts, and embedders can call it directly for stepping and
//! debugging tooling.

use crate::error::{Result, RuntimeError};
use crate::flags;
use crate::interrupt::handle_interrupt;
use crate::io::Io;
use crate::memory::Memory;
use crate::operand::{read_value, resolve_dst, resolve_src, write_value, Location};
use crate::stack;
use crate::state::MachineState;
use maschine_isa::{encoding, wrap_address, DecodeOutcome, Instruction, Opcode};

/// Outcome of executing a single instruction.
///
/// `Unsupported` is the recoverable opcode-table-miss event: the run
/// loop reports it and keeps fetching. Fatal conditions come back as
/// [`RuntimeError`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction executed; the machine is still running.
    Executed,
    /// The opcode at `pc` is unassigned or reserved; execution resumes
    /// at the next fetch.
    Unsupported { pc: u32, raw_opcode: u8 },
    /// The machine is halted (HLT, now or earlier).
    Halted,
}

/// Execute exactly one instruction.
pub fn step<I: Io>(state: &mut MachineState, mem: &mut Memory, io: &mut I) -> Result<StepOutcome> {
    if state.is_halted() {
        return Ok(StepOutcome::Halted);
    }

    let fetch_pc = state.pc;
    let word = fetch_word(mem, fetch_pc);

    let inst = match Instruction::decode(word)
        .map_err(|source| RuntimeError::Decode { pc: fetch_pc, source })?
    {
        DecodeOutcome::Decoded(inst) => inst,
        DecodeOutcome::Unsupported { raw_opcode } => {
            state.pc = fetch_pc + encoding::INSTRUCTION_LEN;
            return Ok(StepOutcome::Unsupported {
                pc: fetch_pc,
                raw_opcode,
            });
        }
    };

    // PC moves past the 3-byte word before operand resolution, which
    // may advance it further for immediate/absolute operands.
    state.pc = fetch_pc + encoding::INSTRUCTION_LEN;

    if inst.opcode == Opcode::Lea {
        // Reserved: decodes fine, executes as an unsupported event.
        return Ok(StepOutcome::Unsupported {
            pc: fetch_pc,
            raw_opcode: inst.opcode.to_u5(),
        });
    }

    tracing::trace!(pc = fetch_pc, %inst, "executing");

    // Operands the opcode does not declare stay at the discard
    // location and read as zero.
    let mut src_loc = Location::Discard;
    let mut src_val = 0u32;
    if inst.opcode.has_src() {
        src_loc = resolve_src(state, mem, inst.src, inst.width);
        src_val = read_value(state, mem, src_loc, inst.width, inst.signed);
    }

    let mut dst_loc = Location::Discard;
    let mut dst_val = 0u32;
    if inst.opcode.has_dst() {
        dst_loc = resolve_dst(state, mem, inst.dst, inst.width);
        dst_val = read_value(state, mem, dst_loc, inst.width, inst.signed);
    }

    execute(state, mem, io, &inst, fetch_pc, src_loc, src_val, dst_loc, dst_val)
}

/// Assemble the 24-bit word from the three bytes at `pc`.
fn fetch_word(mem: &Memory, pc: u32) -> u32 {
    let base = wrap_address(pc);
    encoding::word_from_bytes([
        mem.read_u8(base),
        mem.read_u8(base.wrapping_add(1)),
        mem.read_u8(base.wrapping_add(2)),
    ])
}

#[allow(clippy::too_many_arguments)]
fn execute<I: Io>(
    state: &mut MachineState,
    mem: &mut Memory,
    io: &mut I,
    inst: &Instruction,
    fetch_pc: u32,
    src_loc: Location,
    s: u32,
    dst_loc: Location,
    d: u32,
) -> Result<StepOutcome> {
    let width = inst.width;

    match inst.opcode {
        Opcode::Hlt => {
            state.halt();
            return Ok(StepOutcome::Halted);
        }

        Opcode::Push => stack::push_value(state, mem, width, s),

        Opcode::Pop => {
            let value = stack::pop_value(state, mem, width);
            write_value(state, mem, dst_loc, width, value);
        }

        Opcode::Add => write_value(state, mem, dst_loc, width, s.wrapping_add(d)),
        Opcode::Sub => write_value(state, mem, dst_loc, width, s.wrapping_sub(d)),
        Opcode::Mul => write_value(state, mem, dst_loc, width, s.wrapping_mul(d)),

        Opcode::Div | Opcode::Mod => {
            if d == 0 {
                return Err(RuntimeError::DivisionByZero {
                    pc: fetch_pc,
                    opcode: inst.opcode,
                });
            }
            let result = if inst.opcode == Opcode::Div { s / d } else { s % d };
            write_value(state, mem, dst_loc, width, result);
        }

        // Shift amounts at or beyond the machine word give a
        // deterministic zero; amounts at or beyond the operand width
        // already mask to zero through the width-bounded write.
        Opcode::Shl => {
            let result = if d >= 32 { 0 } else { s << d };
            write_value(state, mem, dst_loc, width, result);
        }
        Opcode::Shr => {
            let result = if d >= 32 { 0 } else { s >> d };
            write_value(state, mem, dst_loc, width, result);
        }

        Opcode::Mov => write_value(state, mem, dst_loc, width, s),

        Opcode::Xchg => {
            write_value(state, mem, dst_loc, width, s);
            write_value(state, mem, src_loc, width, d);
        }

        Opcode::And => write_value(state, mem, dst_loc, width, s & d),
        Opcode::Or => write_value(state, mem, dst_loc, width, s | d),
        Opcode::Xor => write_value(state, mem, dst_loc, width, s ^ d),
        Opcode::Nand => write_value(state, mem, dst_loc, width, !(s & d)),
        Opcode::Nor => write_value(state, mem, dst_loc, width, !(s | d)),
        Opcode::Xnor => write_value(state, mem, dst_loc, width, !(s ^ d)),
        Opcode::Not => write_value(state, mem, dst_loc, width, !d),

        Opcode::Cmp => state.set_flags(flags::compare(s, d)),

        Opcode::J => state.pc = wrap_address(d) as u32,

        Opcode::Je | Opcode::Jne | Opcode::Jg | Opcode::Jge | Opcode::Jl | Opcode::Jle => {
            if flags::condition_met(inst.opcode, state.flags()) {
                state.pc = wrap_address(d) as u32;
            }
        }

        Opcode::Call => stack::push_pc_and_jump(state, mem, d),

        Opcode::Ret => stack::pop_pc(state, mem),

        Opcode::Interrupt => handle_interrupt(state, mem, io, d)?,

        // Handled before operand resolution.
        Opcode::Lea => unreachable!("reserved opcode reaches execute"),
    }

    Ok(StepOutcome::Executed)
}
