use crate::errors::{ExecutionError, LoadImageError};
use crate::hardware::console::Console;
use std::ops::Index;

/// Words in the address space, one per 16-bit address.
pub const MEMORY_SIZE: usize = 1 << 16;

/// Addresses with device semantics on the memory bus.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MemoryMappedIo {
    /// Keyboard status register, bit 15 set iff a character is available.
    Kbsr = 0xFE00,
    /// Keyboard data register, low byte holds the last polled character.
    Kbdr = 0xFE02,
}

/// The LC-3 main memory and its bus.
///
/// Plain words live in a flat array; the keyboard status register gets its
/// device behaviour on [`Memory::read`]. Raw access without bus side effects
/// goes through the `Index` impl.
pub struct Memory {
    /// Index equals memory address
    data: Vec<u16>,
}
impl Memory {
    pub fn new() -> Self {
        let data = vec![0x0u16; MEMORY_SIZE];
        Self { data }
    }

    /// Reads one word over the bus.
    ///
    /// Reading the keyboard status register is the synchronization point the
    /// guest uses to detect key presses: the host is polled, and on a pending
    /// key the status register is latched to `0x8000` with the consumed
    /// character in the data register. Without a pending key the status
    /// register is cleared.
    ///
    /// # Errors
    /// - the host console poll or read fails
    pub fn read(
        &mut self,
        address: u16,
        console: &mut impl Console,
    ) -> Result<u16, ExecutionError> {
        if address == MemoryMappedIo::Kbsr as u16 {
            if console.key_available()? {
                self.write(MemoryMappedIo::Kbsr as u16, 1 << 15);
                self.write(MemoryMappedIo::Kbdr as u16, u16::from(console.read_byte()?));
            } else {
                self.write(MemoryMappedIo::Kbsr as u16, 0);
            }
        }
        Ok(self[address])
    }

    /// Writes one word over the bus. Writes carry no device semantics.
    pub fn write(&mut self, address: u16, value: u16) {
        self.data[usize::from(address)] = value;
    }

    /// Overlays one flat binary image.
    ///
    /// The first big-endian word is the origin address, every following
    /// big-endian word lands at consecutive addresses from there. Words past
    /// the end of the address space and a trailing odd byte are ignored.
    /// Memory outside the image range keeps its prior content.
    ///
    /// Returns the origin address.
    ///
    /// # Errors
    /// - the image is too short to carry an origin word
    pub fn load_image(&mut self, image: &[u8]) -> Result<u16, LoadImageError> {
        if image.len() < 2 {
            return Err(LoadImageError::ImageMissingOrigin);
        }
        let (origin_bytes, words) = image.split_at(2);
        let origin = u16::from_be_bytes([origin_bytes[0], origin_bytes[1]]);
        let max_words = MEMORY_SIZE - usize::from(origin);
        for (offset, chunk) in words.chunks_exact(2).take(max_words).enumerate() {
            self.data[usize::from(origin) + offset] = u16::from_be_bytes([chunk[0], chunk[1]]);
        }
        Ok(origin)
    }
}
impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<u16> for Memory {
    type Output = u16;
    fn index(&self, address: u16) -> &u16 {
        &self.data[usize::from(address)]
    }
}
