use crate::emulator::error::EmulatorError;

pub const STACK_SIZE: usize = 16;

/// Return addresses for `Call`, with an explicit stack pointer.
/// Push and pop check the pointer before touching anything.
pub struct Stack {
    frames: [u16; STACK_SIZE],
    pointer: usize,
}

impl Stack {

    pub fn new() -> Stack {
        Stack {
            frames: [0; STACK_SIZE],
            pointer: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), EmulatorError> {
        if self.pointer == STACK_SIZE {
            return Err(EmulatorError::StackOverflow { capacity: STACK_SIZE });
        }
        self.frames[self.pointer] = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, EmulatorError> {
        if self.pointer == 0 {
            return Err(EmulatorError::StackUnderflow);
        }
        self.pointer -= 1;
        Ok(self.frames[self.pointer])
    }

    /// Number of return addresses currently stored.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn frames(&self) -> &[u16] {
        &self.frames[..self.pointer]
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn pop_returns_last_pushed() {
        let mut stack = Stack::new();
        stack.push(0x202).unwrap();
        stack.push(0x304).unwrap();
        assert_eq!(stack.pop(), Ok(0x304));
        assert_eq!(stack.pop(), Ok(0x202));
        assert_eq!(stack.pointer(), 0);
    }

    #[test]
    fn pop_on_empty_underflows() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), Err(EmulatorError::StackUnderflow));
        assert_eq!(stack.pointer(), 0);
    }

    #[test]
    fn push_at_capacity_overflows_without_corruption() {
        let mut stack = Stack::new();
        for i in 0..STACK_SIZE {
            stack.push(0x200 + 2 * i as u16).unwrap();
        }
        let before = stack.frames().to_vec();
        assert_eq!(
            stack.push(0xABC),
            Err(EmulatorError::StackOverflow { capacity: STACK_SIZE })
        );
        assert_eq!(stack.pointer(), STACK_SIZE);
        assert_eq!(stack.frames(), &before[..]);
    }
}
