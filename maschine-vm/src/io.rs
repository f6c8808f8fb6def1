//! Host I/O boundary for the syscall facility
//!
//! A narrow synchronous byte channel: the character-read syscall is
//! the machine's only suspension point, and writes are fire-and-forget
//! byte emissions. The trait seam keeps the engine testable without a
//! terminal.

use std::collections::VecDeque;
use std::io::{Read, Write};

/// External input/output channel used by the syscall table.
pub trait Io {
    /// Block until one byte of input is available.
    fn read_byte(&mut self) -> std::io::Result<u8>;

    /// Emit one byte of output.
    fn write_byte(&mut self, byte: u8) -> std::io::Result<()>;

    /// Emit a byte string.
    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// Real process stdin/stdout, line-buffering agnostic.
#[derive(Debug, Default)]
pub struct StdIo;

impl Io for StdIo {
    fn read_byte(&mut self) -> std::io::Result<u8> {
        let mut buf = [0u8; 1];
        std::io::stdin().read_exact(&mut buf)?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, byte: u8) -> std::io::Result<()> {
        self.write_bytes(&[byte])
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        stdout.write_all(bytes)?;
        stdout.flush()
    }
}

/// In-memory channel: a queue of pending input bytes and a capture of
/// everything written. Used by tests and embedders.
#[derive(Debug, Default, Clone)]
pub struct BufferedIo {
    inputs: VecDeque<u8>,
    outputs: Vec<u8>,
}

impl BufferedIo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &[u8]) -> Self {
        BufferedIo {
            inputs: input.iter().copied().collect(),
            outputs: Vec::new(),
        }
    }

    pub fn push_input(&mut self, byte: u8) {
        self.inputs.push_back(byte);
    }

    pub fn output(&self) -> &[u8] {
        &self.outputs
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.outputs)
    }
}

impl Io for BufferedIo {
    fn read_byte(&mut self) -> std::io::Result<u8> {
        self.inputs.pop_front().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "input exhausted")
        })
    }

    fn write_byte(&mut self, byte: u8) -> std::io::Result<()> {
        self.outputs.push(byte);
        Ok(())
    }
}
