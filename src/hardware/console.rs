//! The host console capability.
//!
//! Everything the machine wants from the hosting terminal goes through
//! [`Console`]: the memory bus polls for pending keys, the trap routines read
//! and write single bytes. Backing the trait with in-memory queues gives
//! deterministic tests without terminal access.

use crossterm::event::{KeyCode, poll, read};
use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

pub trait Console {
    /// Non-blocking check whether at least one byte is ready to read.
    ///
    /// # Errors
    /// - the underlying event source fails
    fn key_available(&mut self) -> io::Result<bool>;
    /// Blocking read of one byte.
    ///
    /// # Errors
    /// - the underlying event source fails or runs dry
    fn read_byte(&mut self) -> io::Result<u8>;
    /// # Errors
    /// - the underlying output stream fails
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;
    /// # Errors
    /// - the underlying output stream fails
    fn flush(&mut self) -> io::Result<()>;
}

/// Production console on top of the hosting terminal.
///
/// Key presses arrive as crossterm events; a key seen by the availability
/// poll is held back until the next read so polling does not lose input.
pub struct TerminalConsole {
    pending: Option<u8>,
    stdout: Stdout,
}
impl TerminalConsole {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: None,
            stdout: stdout(),
        }
    }
}
impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}
impl Console for TerminalConsole {
    fn key_available(&mut self) -> io::Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        if poll(Duration::from_secs(0))?
            && let Some(event) = read()?.as_key_event()
            && let Some(byte) = key_code_byte(event.code)
        {
            self.pending = Some(byte);
            return Ok(true);
        }
        Ok(false)
    }
    fn read_byte(&mut self) -> io::Result<u8> {
        if let Some(byte) = self.pending.take() {
            return Ok(byte);
        }
        loop {
            if let Some(event) = read()?.as_key_event()
                && let Some(byte) = key_code_byte(event.code)
            {
                return Ok(byte);
            }
        }
    }
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.stdout.write_all(&[byte])
    }
    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

/// Byte a key event feeds into the machine. Keys without a Latin-1 meaning
/// are invisible to the guest.
fn key_code_byte(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Enter => Some(b'\n'),
        other => other.as_char().and_then(|c| u8::try_from(c).ok()),
    }
}
