/// A structure for easily splitting an opcode
/// into the fields instructions are encoded with:
/// four nibbles, the low byte, or the low 12 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeBits(u16);

impl OpcodeBits {

    pub fn new(value: u16) -> OpcodeBits {
        OpcodeBits(value)
    }

    /// Combine two bytes fetched from memory, big-endian.
    pub fn from_bytes(high: u8, low: u8) -> OpcodeBits {
        OpcodeBits(((high as u16) << 8) | low as u16)
    }

    pub fn raw(&self) -> u16 {
        self.0
    }

    /// The four nibbles, most significant first.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (
            ((self.0 >> 12) & 0xF) as u8,
            ((self.0 >> 8) & 0xF) as u8,
            ((self.0 >> 4) & 0xF) as u8,
            (self.0 & 0xF) as u8,
        )
    }

    /// The `kk` field.
    pub fn low_byte(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// The `nnn` field.
    pub fn address(&self) -> u16 {
        self.0 & 0x0FFF
    }
}
