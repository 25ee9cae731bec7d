//! The 4 KiB address space, with both font tables preloaded in the reserved low region.

use crate::emulator::error::EmulatorError;
use std::ops::Range;

pub const MEM_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEM_SIZE - PROGRAM_START as usize;

/// Where the 5-byte glyphs start.
pub const FONT_ADDR: u16 = 0x000;
/// Where the 10-byte extended-mode glyphs start, right after the small ones.
pub const BIG_FONT_ADDR: u16 = FONT_ADDR + FONT.len() as u16;
pub const FONT_GLYPH_SIZE: u16 = 5;
pub const BIG_FONT_GLYPH_SIZE: u16 = 10;

const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[rustfmt::skip]
const BIG_FONT: [u8; 160] = [
    0xFF, 0xFF, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, // 0
    0x18, 0x78, 0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0xFF, 0xFF, // 1
    0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // 2
    0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 3
    0xC3, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0x03, 0x03, // 4
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 5
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 6
    0xFF, 0xFF, 0x03, 0x03, 0x06, 0x0C, 0x18, 0x18, 0x18, 0x18, // 7
    0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, // 8
    0xFF, 0xFF, 0xC3, 0xC3, 0xFF, 0xFF, 0x03, 0x03, 0xFF, 0xFF, // 9
    0x7E, 0xFF, 0xC3, 0xC3, 0xC3, 0xFF, 0xFF, 0xC3, 0xC3, 0xC3, // A
    0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, 0xC3, 0xC3, 0xFC, 0xFC, // B
    0x3C, 0xFF, 0xC3, 0xC0, 0xC0, 0xC0, 0xC0, 0xC3, 0xFF, 0x3C, // C
    0xFC, 0xFE, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xFE, 0xFC, // D
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, // E
    0xFF, 0xFF, 0xC0, 0xC0, 0xFF, 0xFF, 0xC0, 0xC0, 0xC0, 0xC0, // F
];

/// Flat byte-addressable memory. Every access is bounds checked
/// and reports `AddressOutOfRange` instead of wrapping.
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {

    /// Zeroed memory with both fonts loaded.
    pub fn new() -> Memory {
        let mut bytes = [0; MEM_SIZE];
        let font = FONT_ADDR as usize;
        let big_font = BIG_FONT_ADDR as usize;
        bytes[font..font + FONT.len()].copy_from_slice(&FONT);
        bytes[big_font..big_font + BIG_FONT.len()].copy_from_slice(&BIG_FONT);
        Memory { bytes }
    }

    /// Copy a program into memory at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<(), EmulatorError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(EmulatorError::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        self.slice_mut(PROGRAM_START, program.len())?.copy_from_slice(program);
        Ok(())
    }

    /// Read the big-endian opcode stored at `addr` and `addr + 1`.
    pub fn read_word(&self, addr: u16) -> Result<u16, EmulatorError> {
        let bytes = self.slice(addr, 2)?;
        Ok(((bytes[0] as u16) << 8) | bytes[1] as u16)
    }

    pub fn slice(&self, addr: u16, len: usize) -> Result<&[u8], EmulatorError> {
        let range = Self::range(addr, len)?;
        Ok(&self.bytes[range])
    }

    pub fn slice_mut(&mut self, addr: u16, len: usize) -> Result<&mut [u8], EmulatorError> {
        let range = Self::range(addr, len)?;
        Ok(&mut self.bytes[range])
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn range(addr: u16, len: usize) -> Result<Range<usize>, EmulatorError> {
        let start = addr as usize;
        let end = start + len;
        if end > MEM_SIZE {
            return Err(EmulatorError::AddressOutOfRange {
                address: start.max(MEM_SIZE),
            });
        }
        Ok(start..end)
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn fonts_are_preloaded() {
        let memory = Memory::new();
        assert_eq!(memory.slice(FONT_ADDR, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(memory.slice(BIG_FONT_ADDR, 2).unwrap(), &[0xFF, 0xFF]);
        // Glyph F of the big font is the last thing in the reserved region
        let last = BIG_FONT_ADDR + 15 * BIG_FONT_GLYPH_SIZE;
        assert_eq!(memory.slice(last + 9, 1).unwrap(), &[0xC0]);
        assert!(last + BIG_FONT_GLYPH_SIZE <= PROGRAM_START);
    }

    #[test]
    fn load_places_program_at_0x200() {
        let mut memory = Memory::new();
        memory.load(&[0x12, 0x34, 0x56]).unwrap();
        assert_eq!(memory.read_word(0x200), Ok(0x1234));
        assert_eq!(memory.slice(0x202, 1).unwrap(), &[0x56]);
    }

    #[test]
    fn load_accepts_a_program_filling_memory() {
        let mut memory = Memory::new();
        let program = vec![0xAB; MAX_PROGRAM_SIZE];
        assert_eq!(memory.load(&program), Ok(()));
        assert_eq!(memory.read_word(0xFFE), Ok(0xABAB));
    }

    #[test]
    fn load_rejects_oversized_program() {
        let mut memory = Memory::new();
        let program = vec![0; MAX_PROGRAM_SIZE + 1];
        assert_eq!(
            memory.load(&program),
            Err(EmulatorError::ProgramTooLarge {
                size: MAX_PROGRAM_SIZE + 1,
                max: MAX_PROGRAM_SIZE
            })
        );
        assert_eq!(memory.read_word(0x200), Ok(0));
    }

    #[test]
    fn word_read_past_the_end_fails() {
        let memory = Memory::new();
        assert_eq!(
            memory.read_word(0xFFF),
            Err(EmulatorError::AddressOutOfRange { address: 0x1000 })
        );
        assert_eq!(
            memory.read_word(0x1002),
            Err(EmulatorError::AddressOutOfRange { address: 0x1002 })
        );
    }

    #[test]
    fn slice_mut_checks_bounds() {
        let mut memory = Memory::new();
        assert!(memory.slice_mut(0xFFD, 3).is_ok());
        assert!(memory.slice_mut(0xFFD, 4).is_err());
    }
}
