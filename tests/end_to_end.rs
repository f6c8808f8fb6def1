//! End-to-end integration tests for the emulator
//!
//! Each test hand-assembles a binary image with the `asm` builder,
//! loads it into a machine with buffered I/O, runs to completion, and
//! checks the architectural state and output bytes.
//!
//! Syscall conventions:
//! - a0 (r5): selector (2=read char, 4=write char, 5=write string,
//!   6=write line)
//! - a1 (r6): argument
//! - v0 (r3): return value

use maschine_isa::{encoding, AddrMode, Opcode, OperandSpec, Register, Width, INTERRUPT_TABLE};
use maschine_vm::{BufferedIo, HaltReason, Machine, MachineConfig, RuntimeError};

mod asm {
    use super::*;

    pub fn reg(r: Register) -> OperandSpec {
        OperandSpec {
            reg: r,
            mode: AddrMode::Register,
            indirect: false,
        }
    }

    pub fn reg_ind(r: Register) -> OperandSpec {
        OperandSpec {
            reg: r,
            mode: AddrMode::Register,
            indirect: true,
        }
    }

    pub fn imm() -> OperandSpec {
        OperandSpec {
            reg: Register::R0,
            mode: AddrMode::Immediate,
            indirect: false,
        }
    }

    pub fn abs() -> OperandSpec {
        OperandSpec {
            reg: Register::R0,
            mode: AddrMode::Absolute,
            indirect: false,
        }
    }

    /// Byte-level image builder. Instruction words and their inline
    /// operand payloads are appended in fetch order: word, then source
    /// payload, then destination payload.
    #[derive(Default)]
    pub struct Image {
        bytes: Vec<u8>,
    }

    impl Image {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn inst(
            mut self,
            opcode: Opcode,
            src: OperandSpec,
            dst: OperandSpec,
            width: Width,
            signed: bool,
        ) -> Self {
            let inst = maschine_isa::Instruction {
                opcode,
                src,
                dst,
                width,
                signed,
            };
            self.bytes.extend(inst.to_bytes());
            self
        }

        /// Raw 24-bit instruction word.
        pub fn word(mut self, word: u32) -> Self {
            self.bytes.extend(encoding::word_to_bytes(word));
            self
        }

        /// Width-sized immediate payload, big-endian.
        pub fn payload(mut self, width: Width, value: u32) -> Self {
            let be = value.to_be_bytes();
            self.bytes.extend(&be[4 - width.bytes() as usize..]);
            self
        }

        /// Four-byte pointer payload for an absolute operand.
        pub fn pointer(mut self, addr: u32) -> Self {
            self.bytes.extend(addr.to_be_bytes());
            self
        }

        pub fn raw(mut self, bytes: &[u8]) -> Self {
            self.bytes.extend(bytes);
            self
        }

        /// Zero-fill up to an absolute offset.
        pub fn pad_to(mut self, offset: usize) -> Self {
            assert!(offset >= self.bytes.len(), "padding cannot go backwards");
            self.bytes.resize(offset, 0);
            self
        }

        pub fn here(&self) -> usize {
            self.bytes.len()
        }

        pub fn build(self) -> Vec<u8> {
            self.bytes
        }
    }

    /// `mov` of a 32-bit immediate into a register, the workhorse of
    /// these tests. Seven bytes.
    pub fn mov_imm32(image: Image, value: u32, dst: Register) -> Image {
        image
            .inst(Opcode::Mov, imm(), reg(dst), Width::Dword, false)
            .payload(Width::Dword, value)
    }
}

use asm::{abs, imm, mov_imm32, reg, reg_ind, Image};

fn machine_with(image: Vec<u8>) -> Machine<BufferedIo> {
    let mut machine = Machine::buffered(MachineConfig::default());
    machine.load_image(&image).unwrap();
    machine
}

fn hlt(image: Image) -> Image {
    image.inst(
        Opcode::Hlt,
        reg(Register::R0),
        reg(Register::R0),
        Width::Dword,
        false,
    )
}

#[test]
fn test_mov_immediate() {
    let image = hlt(mov_imm32(Image::new(), 0xDEAD_BEEF, Register::R4)).build();

    let mut machine = machine_with(image);
    let summary = machine.run().unwrap();

    assert_eq!(summary.halt_reason, HaltReason::Halt);
    assert_eq!(summary.cycles, 2);
    assert_eq!(machine.register(Register::R4), 0xDEAD_BEEF);
}

#[test]
fn test_zero_register_stays_zero() {
    let image = mov_imm32(Image::new(), 0x1234, Register::R0).inst(
        Opcode::Add,
        reg(Register::R0),
        reg(Register::R4),
        Width::Dword,
        false,
    );
    let image = hlt(image).build();

    let mut machine = machine_with(image);
    machine.set_register(Register::R4, 10);
    machine.run().unwrap();

    assert_eq!(machine.register(Register::R0), 0);
    assert_eq!(
        machine.register(Register::R4),
        10,
        "r0 reads as zero in arithmetic"
    );
}

#[test]
fn test_push_pop_symmetry() {
    // sp = 0xE000; push r1 (16-bit); pop into r4.
    let image = mov_imm32(Image::new(), 0xE000, Register::SP);
    let image = mov_imm32(image, 0xABCD, Register::R1)
        .inst(
            Opcode::Push,
            reg(Register::R1),
            reg(Register::R0),
            Width::Word,
            false,
        )
        .inst(
            Opcode::Pop,
            reg(Register::R0),
            reg(Register::R4),
            Width::Word,
            false,
        );
    let image = hlt(image).build();

    let mut machine = machine_with(image);
    machine.run().unwrap();

    assert_eq!(machine.register(Register::R4), 0xABCD);
    assert_eq!(
        machine.register(Register::SP),
        0xE000,
        "sp is back where it started"
    );
    assert_eq!(
        machine.memory().read_u16(0xE000),
        0xABCD,
        "the stack grows upward"
    );
}

#[test]
fn test_call_and_ret() {
    // 0x00 mov sp; 0x07 call 0x20; 0x0E hlt; 0x20 subroutine.
    let image = mov_imm32(Image::new(), 0xE000, Register::SP)
        .inst(Opcode::Call, reg(Register::R0), imm(), Width::Dword, false)
        .payload(Width::Dword, 0x20);
    let image = hlt(image).pad_to(0x20);
    let image = mov_imm32(image, 99, Register::R10)
        .inst(
            Opcode::Ret,
            reg(Register::R0),
            reg(Register::R0),
            Width::Dword,
            false,
        )
        .build();

    let mut machine = machine_with(image);
    let summary = machine.run().unwrap();

    assert_eq!(summary.halt_reason, HaltReason::Halt);
    assert_eq!(machine.register(Register::R10), 99);
    assert_eq!(
        machine.register(Register::SP),
        0xE000,
        "ret unwinds the frame"
    );
}

#[test]
fn test_register_indirection_is_one_hop() {
    // r1 holds an address; reg-indirect src reads the byte there, not
    // a second level of pointer.
    let image = mov_imm32(Image::new(), 0x2000, Register::R1).inst(
        Opcode::Mov,
        reg_ind(Register::R1),
        reg(Register::R4),
        Width::Byte,
        false,
    );
    let image = hlt(image).build();

    let mut machine = machine_with(image);
    machine.memory_mut().write_u8(0x2000, 0x42);
    machine.memory_mut().write_u8(0x0042, 0x55); // must not be followed
    machine.run().unwrap();

    assert_eq!(machine.register(Register::R4), 0x42);
}

#[test]
fn test_absolute_store_and_load() {
    let image = mov_imm32(Image::new(), 0xBEEF, Register::R1)
        .inst(Opcode::Mov, reg(Register::R1), abs(), Width::Word, false)
        .pointer(0x3000)
        .inst(Opcode::Mov, abs(), reg(Register::R4), Width::Word, false)
        .pointer(0x3000);
    let image = hlt(image).build();

    let mut machine = machine_with(image);
    machine.run().unwrap();

    assert_eq!(machine.memory().read_u16(0x3000), 0xBEEF);
    assert_eq!(machine.register(Register::R4), 0xBEEF);
}

#[test]
fn test_compare_and_branch() {
    // 0x00 mov r1=5; 0x07 cmp #5, r1; 0x0E je 0x1C; 0x15 poison mov;
    // 0x1C hlt.
    let image = mov_imm32(Image::new(), 5, Register::R1)
        .inst(Opcode::Cmp, imm(), reg(Register::R1), Width::Dword, false)
        .payload(Width::Dword, 5)
        .inst(Opcode::Je, reg(Register::R0), imm(), Width::Dword, false)
        .payload(Width::Dword, 0x1C);
    let image = hlt(mov_imm32(image, 1, Register::R10)).build();

    let mut machine = machine_with(image);
    machine.run().unwrap();

    assert_eq!(
        machine.register(Register::R10),
        0,
        "the taken branch skips the mov"
    );
}

#[test]
fn test_signed_byte_compare() {
    // Signed comparisons widen operands first: 0xFF as a signed byte
    // is -1, which sits above 1 in the unsigned flag model.
    // 0x00 cmp.b #-1, #1; 0x05 jg 0x13; 0x0C poison mov; 0x13 hlt.
    let image = Image::new()
        .inst(Opcode::Cmp, imm(), imm(), Width::Byte, true)
        .payload(Width::Byte, 0xFF)
        .payload(Width::Byte, 0x01)
        .inst(Opcode::Jg, reg(Register::R0), imm(), Width::Dword, false)
        .payload(Width::Dword, 0x13);
    let image = hlt(mov_imm32(image, 1, Register::R10)).build();

    let mut machine = machine_with(image);
    machine.run().unwrap();

    assert_eq!(machine.register(Register::R10), 0);
}

#[test]
fn test_write_char_syscall() {
    let image = mov_imm32(Image::new(), 4, Register::A0);
    let image = mov_imm32(image, 0x41, Register::A1)
        .inst(
            Opcode::Interrupt,
            reg(Register::R0),
            imm(),
            Width::Dword,
            false,
        )
        .payload(Width::Dword, 0);
    let image = hlt(image).build();

    let mut machine = machine_with(image);
    machine.run().unwrap();

    assert_eq!(machine.io().output(), b"A");
}

#[test]
fn test_read_char_syscall() {
    let image = mov_imm32(Image::new(), 2, Register::A0)
        .inst(
            Opcode::Interrupt,
            reg(Register::R0),
            imm(),
            Width::Dword,
            false,
        )
        .payload(Width::Dword, 0);
    let image = hlt(image).build();

    let mut machine = Machine::with_io(BufferedIo::with_input(b"z"), MachineConfig::default());
    machine.load_image(&image).unwrap();
    machine.run().unwrap();

    assert_eq!(machine.register(Register::V0), b'z' as u32);
}

#[test]
fn test_write_line_syscall() {
    // The string lives in the image after the code; the mov of its
    // address is patched once the layout is known.
    let image = mov_imm32(Image::new(), 6, Register::A0);
    let image = mov_imm32(image, 0, Register::A1)
        .inst(
            Opcode::Interrupt,
            reg(Register::R0),
            imm(),
            Width::Dword,
            false,
        )
        .payload(Width::Dword, 0);
    let image = hlt(image);
    let text_at = image.here() as u32;
    let mut bytes = image.raw(b"hi\0").build();

    // The a1 mov's payload starts 3 bytes into its 7-byte encoding,
    // 10 bytes into the image.
    bytes[10..14].copy_from_slice(&text_at.to_be_bytes());

    let mut machine = machine_with(bytes);
    machine.run().unwrap();

    assert_eq!(machine.io().output(), b"hi\n");
}

#[test]
fn test_vectored_interrupt_handler_returns() {
    // 0x00 mov sp; 0x07 int #1; 0x0E hlt; 0x30 handler.
    let image = mov_imm32(Image::new(), 0xE000, Register::SP)
        .inst(
            Opcode::Interrupt,
            reg(Register::R0),
            imm(),
            Width::Dword,
            false,
        )
        .payload(Width::Dword, 1);
    let image = hlt(image).pad_to(0x30);
    let image = mov_imm32(image, 0xCAFE, Register::R10)
        .inst(
            Opcode::Ret,
            reg(Register::R0),
            reg(Register::R0),
            Width::Dword,
            false,
        )
        .build();

    let mut machine = machine_with(image);
    // Vector 1's table entry points at the handler.
    let entry = maschine_isa::wrap_address(INTERRUPT_TABLE + 4);
    machine.memory_mut().write_u32(entry, 0x30);

    let summary = machine.run().unwrap();
    assert_eq!(summary.halt_reason, HaltReason::Halt);
    assert_eq!(machine.register(Register::R10), 0xCAFE);
    assert_eq!(machine.register(Register::SP), 0xE000);
}

#[test]
fn test_division_by_zero_stops_the_run() {
    // r4 (the divisor) is zero.
    let image = mov_imm32(Image::new(), 10, Register::R1)
        .inst(
            Opcode::Div,
            reg(Register::R1),
            reg(Register::R4),
            Width::Dword,
            false,
        )
        .build();

    let mut machine = machine_with(image);
    let err = machine.run().unwrap_err();

    assert!(matches!(
        err,
        RuntimeError::DivisionByZero {
            opcode: Opcode::Div,
            ..
        }
    ));
}

#[test]
fn test_invalid_width_code_is_a_decode_error() {
    let word = encoding::encode_word(Opcode::Mov.to_u5(), 0, 0, 1, 4, 3, false, false, false);
    let image = Image::new().word(word).build();

    let mut machine = machine_with(image);
    let err = machine.run().unwrap_err();

    match err {
        RuntimeError::Decode { pc, .. } => assert_eq!(pc, 0),
        other => panic!("expected a decode error, got {other}"),
    }
}

#[test]
fn test_unassigned_opcode_is_skipped() {
    let word = encoding::encode_word(0x1F, 0, 0, 0, 0, 0, false, false, false);
    let image = hlt(Image::new().word(word)).build();

    let mut machine = machine_with(image);
    let summary = machine.run().unwrap();

    assert_eq!(summary.halt_reason, HaltReason::Halt);
    assert_eq!(summary.cycles, 2);
}

#[test]
fn test_byte_width_write_preserves_upper_register_bits() {
    let image = Image::new()
        .inst(Opcode::Mov, imm(), reg(Register::R4), Width::Byte, false)
        .payload(Width::Byte, 0xAA);
    let image = hlt(image).build();

    let mut machine = machine_with(image);
    machine.set_register(Register::R4, 0x1111_1100);
    machine.run().unwrap();

    assert_eq!(machine.register(Register::R4), 0x1111_11AA);
}

#[test]
fn test_loop_counts_down() {
    // 0x00 mov r1=3; 0x07 add #-1, r1; 0x0E cmp #0, r1;
    // 0x15 jne 0x07; 0x1C hlt.
    let image = mov_imm32(Image::new(), 3, Register::R1)
        .inst(Opcode::Add, imm(), reg(Register::R1), Width::Dword, false)
        .payload(Width::Dword, 0xFFFF_FFFF)
        .inst(Opcode::Cmp, imm(), reg(Register::R1), Width::Dword, false)
        .payload(Width::Dword, 0)
        .inst(Opcode::Jne, reg(Register::R0), imm(), Width::Dword, false)
        .payload(Width::Dword, 0x07);
    let image = hlt(image).build();

    let mut machine = machine_with(image);
    let summary = machine.run().unwrap();

    assert_eq!(machine.register(Register::R1), 0);
    assert_eq!(summary.halt_reason, HaltReason::Halt);
    // One mov, three iterations of three instructions, one hlt.
    assert_eq!(summary.cycles, 11);
}
