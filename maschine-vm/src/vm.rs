//! Machine front end
//!
//! Owns the state, memory, and I/O channel, and drives the step
//! function until a halt condition. This is the embedding surface:
//! load an image, poke registers, run or single-step, inspect.

use crate::error::Result;
use crate::execute::{step, StepOutcome};
use crate::io::{BufferedIo, Io, StdIo};
use crate::memory::Memory;
use crate::state::MachineState;
use maschine_isa::{Register, Word, NUM_REGISTERS};

/// Machine configuration
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Maximum number of instructions before the run loop gives up.
    pub max_cycles: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            max_cycles: 1_000_000,
        }
    }
}

/// Why a `run` call stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// The program executed HLT.
    Halt,
    /// The configured cycle budget ran out.
    CycleLimit,
}

/// Result of running a machine to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Number of instructions executed.
    pub cycles: u64,

    /// Why execution stopped.
    pub halt_reason: HaltReason,
}

/// The emulated machine.
pub struct Machine<I: Io> {
    state: MachineState,
    memory: Memory,
    io: I,
    config: MachineConfig,
}

impl Machine<StdIo> {
    /// A machine wired to process stdin/stdout.
    pub fn new(config: MachineConfig) -> Self {
        Machine::with_io(StdIo, config)
    }
}

impl Machine<BufferedIo> {
    /// A machine with in-memory I/O, for tests and embedding.
    pub fn buffered(config: MachineConfig) -> Self {
        Machine::with_io(BufferedIo::new(), config)
    }
}

impl<I: Io> Machine<I> {
    /// Create a machine around an arbitrary I/O channel.
    pub fn with_io(io: I, config: MachineConfig) -> Self {
        Self {
            state: MachineState::new(),
            memory: Memory::new(),
            io,
            config,
        }
    }

    /// Copy a program image to address 0. Execution starts there.
    pub fn load_image(&mut self, image: &[u8]) -> Result<()> {
        self.memory.load_image(image)
    }

    /// Execute a single instruction.
    pub fn step(&mut self) -> Result<StepOutcome> {
        step(&mut self.state, &mut self.memory, &mut self.io)
    }

    /// Run until HLT or the cycle budget runs out.
    ///
    /// Unsupported opcodes are reported through the diagnostic channel
    /// and skipped; they never stop the run.
    pub fn run(&mut self) -> Result<ExecutionSummary> {
        let mut cycles = 0u64;
        loop {
            if self.state.is_halted() {
                tracing::debug!(cycles, "machine halted");
                return Ok(ExecutionSummary {
                    cycles,
                    halt_reason: HaltReason::Halt,
                });
            }
            if cycles >= self.config.max_cycles {
                tracing::warn!(cycles, "cycle limit reached");
                return Ok(ExecutionSummary {
                    cycles,
                    halt_reason: HaltReason::CycleLimit,
                });
            }

            if let StepOutcome::Unsupported { pc, raw_opcode } = self.step()? {
                tracing::warn!(pc, raw_opcode, "unsupported opcode, skipping");
            }
            cycles += 1;
        }
    }

    // Inspection and setup surface.

    pub fn pc(&self) -> u32 {
        self.state.pc
    }

    pub fn set_pc(&mut self, pc: u32) {
        self.state.pc = pc;
    }

    pub fn register(&self, reg: Register) -> Word {
        self.state.read_reg(reg)
    }

    pub fn registers(&self) -> &[Word; NUM_REGISTERS] {
        self.state.registers()
    }

    pub fn set_register(&mut self, reg: Register, value: Word) {
        self.state.write_reg(reg, value);
    }

    pub fn flags(&self) -> u32 {
        self.state.flags()
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn io(&self) -> &I {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut I {
        &mut self.io
    }

    /// Render the register file, one register per line.
    pub fn dump_registers(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("pc    = {:#010x}\n", self.state.pc));
        for i in 0..NUM_REGISTERS {
            let reg = Register::from_index(i).expect("index in range");
            out.push_str(&format!(
                "{:<5} = {:#010x}\n",
                reg.name(),
                self.state.read_reg(reg)
            ));
        }
        out
    }

    /// Hex dump of `len` bytes of memory starting at `start`, sixteen
    /// bytes per row.
    pub fn dump_memory(&self, start: u16, len: usize) -> String {
        let mut out = String::new();
        let bytes = self.memory.as_bytes();
        for (row, chunk) in bytes
            .iter()
            .cycle()
            .skip(start as usize)
            .take(len)
            .collect::<Vec<_>>()
            .chunks(16)
            .enumerate()
        {
            out.push_str(&format!("{:04x}:", (start as usize + row * 16) & 0xFFFF));
            for byte in chunk {
                out.push_str(&format!(" {byte:02x}"));
            }
            out.push('\n');
        }
        out
    }
}
