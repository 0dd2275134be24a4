//! In-memory test doubles: a [`Console`] backed by byte queues and a builder
//! for emulators preloaded with a program at the default origin.

use crate::emulator::Emulator;
use crate::hardware::console::Console;
use crate::hardware::registers::PC_START;
use std::collections::VecDeque;
use std::io;

/// Console fed from a fixed input queue, capturing all output.
///
/// `read_byte` fails instead of blocking once the queue runs dry, so a guest
/// that reads more input than a test provides fails the test instead of
/// hanging it.
pub struct FakeConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}
impl FakeConsole {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.iter().copied().collect(),
            output: Vec::with_capacity(120),
        }
    }
    pub fn output_string(&self) -> String {
        String::from_utf8(self.output.clone()).unwrap()
    }
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}
impl Console for FakeConsole {
    fn key_available(&mut self) -> io::Result<bool> {
        Ok(!self.input.is_empty())
    }
    fn read_byte(&mut self) -> io::Result<u8> {
        self.input.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "fake console input exhausted")
        })
    }
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Emulator with `words` loaded at the default origin and `input` queued on
/// the fake console.
pub fn emulator_with_program(words: &[u16], input: &[u8]) -> Emulator<FakeConsole> {
    let mut image = Vec::with_capacity((words.len() + 1) * 2);
    image.extend_from_slice(&PC_START.to_be_bytes());
    for word in words {
        image.extend_from_slice(&word.to_be_bytes());
    }
    let mut emu = Emulator::new(FakeConsole::new(input));
    emu.load_image(&image)
        .expect("Error loading test program");
    emu
}
