//! Small helpers that are not specific to the emulator state.

pub mod opcode_bits;
