//! This code does emulate the trap routines but does not implement them via the opcodes of the LC3
//! but directly.
//!
//! In the real system the code for these routines is at the target of the
//! [Trap Vector Tables](https://cs131.info/Assembly/Instructions/TRAPRoutines.html#trap-vector-table).
//! The engine saves the return address to R7 before dispatching here.
use crate::errors::ExecutionError;
use crate::hardware::console::Console;
use crate::hardware::memory::Memory;
use crate::hardware::registers::{Registers, from_binary};
use std::io;
use std::ops::ControlFlow;

/// get character from keyboard, not echoed onto the terminal
pub const GETC: u16 = 0x20;
/// output a character
pub const OUT: u16 = 0x21;
/// output a word string
pub const PUTS: u16 = 0x22;
/// get character from keyboard, echoed onto the terminal
pub const IN: u16 = 0x23;
/// output a byte string
pub const PUTSP: u16 = 0x24;
/// halt the program
pub const HALT: u16 = 0x25;

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0. The high eight bits of R0 are cleared.
pub fn get_c(
    regs: &mut Registers,
    console: &mut impl Console,
) -> ControlFlow<Result<(), ExecutionError>> {
    match console.read_byte() {
        Ok(byte) => {
            regs.set(0, from_binary(u16::from(byte)));
            regs.update_conditional_register(0);
            ControlFlow::Continue(())
        }
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

/// IN: Print a prompt on the screen and read a single character echoed back to the console.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    console: &mut impl Console,
) -> ControlFlow<Result<(), ExecutionError>> {
    write_bytes(console, b"Enter a character: ")?;
    let byte = match console.read_byte() {
        Ok(byte) => byte,
        Err(e) => return wrap_io_error_in_cf(&e),
    };
    write_bytes(console, &[byte])?;
    regs.set(0, from_binary(u16::from(byte)));
    regs.update_conditional_register(0);
    ControlFlow::Continue(())
}

/// OUT: Write the character in R0\[7:0\] to the console display.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Truncation to the low byte is what OUT specifies"
)]
pub fn out(
    regs: &Registers,
    console: &mut impl Console,
) -> ControlFlow<Result<(), ExecutionError>> {
    write_bytes(console, &[regs.get(0).as_binary() as u8])
}

fn put_one_char_per_u16(input: u16, append_to: &mut Vec<u8>) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation is what is expected here"
    )]
    append_to.push(input as u8);
}

fn put_two_chars_per_u16(input: u16, append_to: &mut Vec<u8>) {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation is what is expected here"
    )]
    append_to.push(input as u8);
    let high = (input >> 8) as u8;
    if high != 0 {
        append_to.push(high);
    }
}

fn put(
    regs: &Registers,
    mem: &Memory,
    console: &mut impl Console,
    handle_word: fn(u16, &mut Vec<u8>),
) -> ControlFlow<Result<(), ExecutionError>> {
    let mut address = regs.get(0).as_binary();
    let mut bytes = Vec::with_capacity(120);
    while mem[address] != 0 {
        handle_word(mem[address], &mut bytes);
        address = address.wrapping_add(1);
    }
    write_bytes(console, &bytes)
}

/// PUTS: print the zero-word-delimited string at the address in R0, one character per word.
pub fn put_s(
    regs: &Registers,
    mem: &Memory,
    console: &mut impl Console,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, console, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits \[7:0\] of a memory location is written to the console first,
/// then the code in bits \[15:8\] unless it is 0x00.
/// Writing terminates on a zero word; a zero high byte inside a non-zero word does not terminate.
pub fn put_sp(
    regs: &Registers,
    mem: &Memory,
    console: &mut impl Console,
) -> ControlFlow<Result<(), ExecutionError>> {
    put(regs, mem, console, put_two_chars_per_u16)
}

/// HALT: End the program with a message on the console.
pub fn halt(console: &mut impl Console) -> ControlFlow<Result<(), ExecutionError>> {
    write_bytes(console, b"HALT\n")?;
    ControlFlow::Break(Ok(()))
}

fn write_bytes(
    console: &mut impl Console,
    bytes: &[u8],
) -> ControlFlow<Result<(), ExecutionError>> {
    for &byte in bytes {
        if let Err(e) = console.write_byte(byte) {
            return wrap_io_error_in_cf(&e);
        }
    }
    match console.flush() {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

fn wrap_io_error_in_cf(error: &io::Error) -> ControlFlow<Result<(), ExecutionError>, ()> {
    ControlFlow::Break(Err(ExecutionError::IOInputOutputError(error.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::test_helpers::FakeConsole;
    use crate::hardware::registers::ConditionFlag;
    use googletest::prelude::*;

    fn check_register_value(regs: &Registers, idx: u8, expected: u16) {
        expect_that!(
            regs.get(idx).as_binary(),
            eq(expected),
            "{:?}",
            regs.get(idx)
        );
    }

    #[gtest]
    pub fn test_get_c() {
        let mut regs = Registers::new();
        let mut console = FakeConsole::new(b"a");
        let res = get_c(&mut regs, &mut console);
        assert_that!(res, eq(&ControlFlow::Continue(())));
        check_register_value(&regs, 0, u16::from(b'a'));
        expect_that!(regs.condition(), eq(ConditionFlag::Pos));
        expect_that!(console.output_string(), eq(""));
    }
    #[gtest]
    pub fn test_out() {
        let mut regs = Registers::new();
        let mut console = FakeConsole::new(b"");
        regs.set(0, from_binary(u16::from(b'k')));
        let res = out(&regs, &mut console);
        assert!(res.is_continue());
        assert_that!(console.output_string(), eq("k"));
    }
    #[gtest]
    pub fn test_out_takes_low_byte_only() {
        let mut regs = Registers::new();
        let mut console = FakeConsole::new(b"");
        regs.set(0, from_binary(0x4A6B)); // 'J' in the high byte, 'k' in the low
        let res = out(&regs, &mut console);
        assert!(res.is_continue());
        assert_that!(console.output_string(), eq("k"));
    }
    #[gtest]
    pub fn test_put_s() {
        let mut regs = Registers::new();
        let mut memory = Memory::new();
        let mut console = FakeConsole::new(b"");
        for (offset, c) in b"Hello".iter().enumerate() {
            memory.write(0x3005 + offset as u16, u16::from(*c));
        }
        regs.set(0, from_binary(0x3005));
        let res = put_s(&regs, &memory, &mut console);
        assert!(res.is_continue());
        assert_that!(console.output_string(), eq("Hello"));
    }
    #[gtest]
    pub fn test_put_sp() {
        let data = [
            0x6548u16, 0x6c6c, 0x206f, 0x6f57, 0x6c72, 0x2164, 0x0000,
        ];
        let mut regs = Registers::new();
        let mut memory = Memory::new();
        let mut console = FakeConsole::new(b"");
        for (offset, word) in data.iter().enumerate() {
            memory.write(0x3005 + offset as u16, *word);
        }
        regs.set(0, from_binary(0x3005));
        let res = put_sp(&regs, &memory, &mut console);
        assert!(res.is_continue());
        assert_that!(console.output_string(), eq("Hello World!"));
    }
    #[gtest]
    pub fn test_put_sp_zero_high_byte_does_not_terminate() {
        let mut regs = Registers::new();
        let mut memory = Memory::new();
        let mut console = FakeConsole::new(b"");
        // "a", then a word with zero high byte, then "b"
        memory.write(0x3000, 0x0061);
        memory.write(0x3001, 0x0062);
        regs.set(0, from_binary(0x3000));
        let res = put_sp(&regs, &memory, &mut console);
        assert!(res.is_continue());
        assert_that!(console.output_string(), eq("ab"));
    }
    #[gtest]
    pub fn test_in() {
        let mut regs = Registers::new();
        let mut console = FakeConsole::new(b"abc");

        let res = in_trap(&mut regs, &mut console);
        assert!(res.is_continue());
        check_register_value(&regs, 0, u16::from(b'a'));

        let res = in_trap(&mut regs, &mut console);
        assert!(res.is_continue());
        check_register_value(&regs, 0, u16::from(b'b'));

        let res = in_trap(&mut regs, &mut console);
        assert!(res.is_continue());
        check_register_value(&regs, 0, u16::from(b'c'));

        expect_that!(
            console.output_string(),
            eq("Enter a character: aEnter a character: bEnter a character: c")
        );
    }
    #[gtest]
    pub fn test_halt() {
        let mut console = FakeConsole::new(b"");
        let res = halt(&mut console);
        assert_that!(res, eq(&ControlFlow::Break(Ok(()))));
        assert_that!(console.output_string(), eq("HALT\n"));
    }
}
