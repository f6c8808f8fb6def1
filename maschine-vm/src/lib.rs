//! # Maschine Runtime
//!
//! Execution engine for the `maschine-isa` instruction set: a 64 KiB
//! flat memory, a 32-register file, and a fetch-decode-execute loop
//! with vectored interrupts and a host syscall table.
//!
//! ## Example
//!
//! ```rust,no_run
//! use maschine_vm::{Machine, MachineConfig};
//!
//! let image = std::fs::read("program.bin").unwrap();
//! let mut machine = Machine::new(MachineConfig::default());
//! machine.load_image(&image).unwrap();
//! let summary = machine.run().unwrap();
//! println!("halted after {} cycles", summary.cycles);
//! ```

pub mod error;
pub mod execute;
pub mod flags;
pub mod interrupt;
pub mod io;
pub mod memory;
pub mod operand;
pub mod stack;
pub mod state;
pub mod vm;

pub use error::{Result, RuntimeError};
pub use execute::StepOutcome;
pub use io::{BufferedIo, Io, StdIo};
pub use memory::Memory;
pub use state::MachineState;
pub use vm::{ExecutionSummary, HaltReason, Machine, MachineConfig};

/// Run an image with buffered input, returning the summary and the
/// bytes the program wrote.
pub fn run_image(image: &[u8], input: &[u8]) -> Result<(ExecutionSummary, Vec<u8>)> {
    let mut machine = Machine::with_io(BufferedIo::with_input(input), MachineConfig::default());
    machine.load_image(image)?;
    let summary = machine.run()?;
    let output = machine.io_mut().take_output();
    Ok((summary, output))
}
