//! The machine state of the LC-3: main memory with its memory mapped
//! keyboard registers, the register file, and the host console capability
//! the memory bus and the trap routines talk to.

pub mod console;
pub mod memory;
pub mod registers;

pub use console::Console;
pub use memory::Memory;
pub use registers::Registers;
