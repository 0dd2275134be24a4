//! The execution engine: fetch, decode, dispatch.
//!
//! [`Emulator`] owns the whole machine state and the host console capability;
//! the opcode handlers and trap routines receive the parts they touch by
//! mutable reference. One [`Emulator::step`] executes exactly one
//! instruction, [`Emulator::run`] repeats until the machine halts, a fatal
//! error occurs or the hosting process asks for shutdown.

pub mod instruction;
pub mod opcodes;
#[cfg(test)]
pub mod test_helpers;
pub mod trap_routines;

use crate::emulator::instruction::Instruction;
use crate::errors::{ExecutionError, LoadImageError};
use crate::hardware::console::Console;
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use log::{debug, warn};
use std::fs;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};

/// The 16 LC-3 opcodes, selected by the high nibble of an instruction.
///
/// `Rti` and `Res` exist so the dispatch match stays exhaustive; executing
/// them is an error on this machine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Opcode {
    Br,
    Add,
    Ld,
    St,
    Jsr,
    And,
    Ldr,
    Str,
    Rti,
    Not,
    Ldi,
    Sti,
    Jmp,
    Res,
    Lea,
    Trap,
}
impl From<Instruction> for Opcode {
    fn from(i: Instruction) -> Self {
        match i.op_code() {
            0 => Self::Br,
            1 => Self::Add,
            2 => Self::Ld,
            3 => Self::St,
            4 => Self::Jsr,
            5 => Self::And,
            6 => Self::Ldr,
            7 => Self::Str,
            8 => Self::Rti,
            9 => Self::Not,
            10 => Self::Ldi,
            11 => Self::Sti,
            12 => Self::Jmp,
            13 => Self::Res,
            14 => Self::Lea,
            15 => Self::Trap,
            _ => unreachable!("the opcode is four bits wide"),
        }
    }
}

/// How a finished [`Emulator::run`] ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The guest issued the HALT trap.
    Halted,
    /// The shutdown flag was set between two instructions.
    Interrupted,
}

/// The public facing emulator used to run LC-3 programs.
pub struct Emulator<C> {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    pub(crate) console: C,
    running: bool,
}
impl<C: Console> Emulator<C> {
    /// Fresh machine: zeroed memory and registers, PC at the default origin,
    /// condition flag Zero.
    #[must_use]
    pub fn new(console: C) -> Self {
        Self {
            memory: Memory::new(),
            registers: Registers::new(),
            console,
            running: true,
        }
    }

    /// Overlays one flat binary image into memory and returns its origin.
    ///
    /// Registers are untouched, so images can be loaded in sequence before
    /// the run starts; later images win where ranges intersect.
    ///
    /// # Errors
    /// - the image is too short to carry an origin word
    pub fn load_image(&mut self, image: &[u8]) -> Result<u16, LoadImageError> {
        let origin = self.memory.load_image(image)?;
        debug!(
            "loaded image: {} words at origin {origin:#06X}",
            (image.len() - 2) / 2
        );
        Ok(origin)
    }

    /// Reads one image file and overlays it. See [`Emulator::load_image`].
    ///
    /// # Errors
    /// - the file cannot be read
    /// - the image is too short to carry an origin word
    pub fn load_image_file(&mut self, path: &str) -> Result<u16, LoadImageError> {
        let image = fs::read(path).map_err(|e| LoadImageError::ImageNotLoadable {
            file: path.to_string(),
            message: e.to_string(),
        })?;
        self.load_image(&image)
    }

    /// Executes instructions until the guest halts or `shutdown` is set.
    ///
    /// `shutdown` is observed between instructions only; a signal handler can
    /// store into it at any time.
    ///
    /// # Errors
    /// - an illegal instruction (RTI or the reserved opcode) is executed
    /// - console input or output fails
    pub fn run(&mut self, shutdown: &AtomicBool) -> Result<RunOutcome, ExecutionError> {
        while self.running {
            if shutdown.load(Ordering::SeqCst) {
                return Ok(RunOutcome::Interrupted);
            }
            self.step()?;
        }
        Ok(RunOutcome::Halted)
    }

    /// Fetches, decodes and executes exactly one instruction.
    fn step(&mut self) -> Result<(), ExecutionError> {
        let bits = self
            .memory
            .read(self.registers.pc().as_binary(), &mut self.console)?;
        self.registers.inc_pc();
        let i = Instruction::from(bits);
        let r = &mut self.registers;
        match Opcode::from(i) {
            Opcode::Br => opcodes::br(i, r),
            Opcode::Add => opcodes::add(i, r),
            Opcode::Ld => opcodes::ld(i, r, &mut self.memory, &mut self.console)?,
            Opcode::St => opcodes::st(i, r, &mut self.memory),
            Opcode::Jsr => opcodes::jsr(i, r),
            Opcode::And => opcodes::and(i, r),
            Opcode::Ldr => opcodes::ldr(i, r, &mut self.memory, &mut self.console)?,
            Opcode::Str => opcodes::str(i, r, &mut self.memory),
            Opcode::Not => opcodes::not(i, r),
            Opcode::Ldi => opcodes::ldi(i, r, &mut self.memory, &mut self.console)?,
            Opcode::Sti => opcodes::sti(i, r, &mut self.memory, &mut self.console)?,
            Opcode::Jmp => opcodes::jmp(i, r),
            Opcode::Lea => opcodes::lea(i, r),
            Opcode::Trap => self.trap(i)?,
            Opcode::Rti | Opcode::Res => {
                return Err(ExecutionError::IllegalInstruction(i.op_code()));
            }
        }
        Ok(())
    }

    /// Saves the return address to R7 and runs the selected trap routine.
    /// Unknown vectors return to the fetch loop without further action.
    fn trap(&mut self, i: Instruction) -> Result<(), ExecutionError> {
        self.registers.set(7, self.registers.pc());
        let flow = match i.trap_vector() {
            trap_routines::GETC => trap_routines::get_c(&mut self.registers, &mut self.console),
            trap_routines::OUT => trap_routines::out(&self.registers, &mut self.console),
            trap_routines::PUTS => {
                trap_routines::put_s(&self.registers, &self.memory, &mut self.console)
            }
            trap_routines::IN => trap_routines::in_trap(&mut self.registers, &mut self.console),
            trap_routines::PUTSP => {
                trap_routines::put_sp(&self.registers, &self.memory, &mut self.console)
            }
            trap_routines::HALT => trap_routines::halt(&mut self.console),
            vector => {
                warn!("unknown trap vector {vector:#06X} ignored");
                ControlFlow::Continue(())
            }
        };
        match flow {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(Ok(())) => {
                self.running = false;
                Ok(())
            }
            ControlFlow::Break(Err(e)) => Err(e),
        }
    }
}
