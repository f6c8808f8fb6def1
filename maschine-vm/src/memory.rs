//! Memory subsystem
//!
//! A flat 64 KiB byte store. Every multi-byte access uses the
//! canonical big-endian order and wraps byte-wise at the end of the
//! address space; host byte order is never consulted.

use crate::error::{Result, RuntimeError};
use maschine_isa::{Width, MEM_SIZE};

#[derive(Clone)]
pub struct Memory {
    data: Box<[u8; MEM_SIZE]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            data: Box::new([0; MEM_SIZE]),
        }
    }

    /// Load a flat program image verbatim, starting at address 0.
    pub fn load_image(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > MEM_SIZE {
            return Err(RuntimeError::ImageTooLarge {
                len: image.len(),
                capacity: MEM_SIZE,
            });
        }
        self.data[..image.len()].copy_from_slice(image);
        Ok(())
    }

    #[inline]
    pub fn read_u8(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    #[inline]
    pub fn write_u8(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    pub fn read_u16(&self, addr: u16) -> u16 {
        let hi = self.read_u8(addr);
        let lo = self.read_u8(addr.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    pub fn write_u16(&mut self, addr: u16, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.write_u8(addr, hi);
        self.write_u8(addr.wrapping_add(1), lo);
    }

    pub fn read_u32(&self, addr: u16) -> u32 {
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read_u8(addr.wrapping_add(i as u16));
        }
        u32::from_be_bytes(bytes)
    }

    pub fn write_u32(&mut self, addr: u16, value: u32) {
        for (i, byte) in value.to_be_bytes().into_iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u16), byte);
        }
    }

    /// Read a width-sized value, zero-extended into a machine word.
    pub fn read_value(&self, addr: u16, width: Width) -> u32 {
        match width {
            Width::Byte => self.read_u8(addr) as u32,
            Width::Word => self.read_u16(addr) as u32,
            Width::Dword => self.read_u32(addr),
        }
    }

    /// Store the low `width` bits of a machine word as a fixed-width
    /// sub-store; bytes outside the width are untouched.
    pub fn write_value(&mut self, addr: u16, width: Width, value: u32) {
        match width {
            Width::Byte => self.write_u8(addr, value as u8),
            Width::Word => self.write_u16(addr, value as u16),
            Width::Dword => self.write_u32(addr, value),
        }
    }

    /// Collect a NUL-terminated byte string starting at `addr`.
    ///
    /// The terminator is not included. A string that never terminates
    /// wraps through the whole address space at most once.
    pub fn read_cstr(&self, addr: u16) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut cursor = addr;
        for _ in 0..MEM_SIZE {
            let byte = self.read_u8(cursor);
            if byte == 0 {
                break;
            }
            bytes.push(byte);
            cursor = cursor.wrapping_add(1);
        }
        bytes
    }

    /// Raw view of the whole address space, for the diagnostic
    /// collaborator only.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory").field("size", &MEM_SIZE).finish()
    }
}
