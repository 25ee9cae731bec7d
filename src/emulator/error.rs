//! Everything that can go wrong while loading or running a program.

/// Errors reported by the emulator.
///
/// All but `ProgramTooLarge` are fatal to a running machine:
/// the emulator halts and hands the error to whoever called `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmulatorError {
    #[error("memory access out of bounds at address {address:#06X}")]
    AddressOutOfRange { address: usize },

    #[error("stack overflow: call depth exceeds {capacity}")]
    StackOverflow { capacity: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    ProgramTooLarge { size: usize, max: usize },
}
