//! # LC-3 Virtual Machine.
//!
//! `lc3-vm` emulates the LC-3 educational 16-bit architecture: 65,536 words
//! of memory with memory-mapped keyboard registers, eight general purpose
//! registers, and the classic trap routines for character and string I/O.
//! Usage starts with loading one or more flat binary images via
//! [`Emulator::load_image`] or [`Emulator::load_image_file`], then running
//! the machine against a [`hardware::Console`] implementation.
//!
//!  # Example
//! ```
//! use lc3_vm::Emulator;
//! use lc3_vm::emulator::RunOutcome;
//! use lc3_vm::hardware::console::TerminalConsole;
//! use std::sync::atomic::AtomicBool;
//!
//! let mut emu = Emulator::new(TerminalConsole::new());
//! // origin 0x3000, followed by TRAP HALT
//! emu.load_image(&[0x30, 0x00, 0xF0, 0x25]).unwrap();
//! let outcome = emu.run(&AtomicBool::new(false)).unwrap();
//! assert_eq!(outcome, RunOutcome::Halted);
//! ```
//! # Errors
//! - Image files must be readable and carry at least the two bytes of their
//!   big-endian origin word
//! - Executing RTI or the reserved opcode ends the run with an error

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod numbers;
pub mod terminal;

pub use emulator::Emulator;
