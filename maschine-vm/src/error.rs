//! Runtime error types for the Maschine engine

use maschine_isa::{IsaError, Opcode};
use thiserror::Error;

/// Fatal runtime errors. Each carries enough context (pc, opcode) to
/// reproduce the failing instruction.
///
/// The unsupported-opcode event is deliberately absent: it is a
/// recoverable [`crate::StepOutcome::Unsupported`] value, reported on
/// the diagnostic channel without stopping the run.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("decode error at pc {pc:#06x}: {source}")]
    Decode {
        pc: u32,
        #[source]
        source: IsaError,
    },

    #[error("division by zero in {opcode} at pc {pc:#06x}")]
    DivisionByZero { pc: u32, opcode: Opcode },

    #[error("program image is {len} bytes but memory holds only {capacity}")]
    ImageTooLarge { len: usize, capacity: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
