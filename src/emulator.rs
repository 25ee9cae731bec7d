//! The interpreter core: machine state, instruction set and the devices it talks to.

pub mod display;
#[allow(clippy::module_inception)]
pub mod emulator;
pub mod error;
pub mod input;
pub mod instruction;
pub mod memory;
pub mod output;
pub mod stack;

pub use self::emulator::{Emulator, Status};
pub use self::error::EmulatorError;
