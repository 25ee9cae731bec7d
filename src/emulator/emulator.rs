//! The CHIP-8 emulator as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description,
//! extended with the SUPER-CHIP scrolling, resolution and save-slot instructions.

use crate::emulator::display::{Display, Screen};
use crate::emulator::error::EmulatorError;
use crate::emulator::input::{DummyInput, EmulatorInput};
use crate::emulator::instruction::*;
use crate::emulator::memory::{
    Memory, BIG_FONT_ADDR, BIG_FONT_GLYPH_SIZE, FONT_ADDR, FONT_GLYPH_SIZE, PROGRAM_START,
};
use crate::emulator::output::EmulatorOutput;
use crate::emulator::stack::Stack;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::{fmt, io};

const NUM_REGISTERS: usize = 16;
const NUM_FLAGS: usize = MAX_FLAG_REG as usize + 1;
const VF: usize = 0xF;
const INDEX_MASK: u16 = 0x0FFF;
const INSTRUCTION_SIZE: u16 = 2;

/// Whether the machine will execute anything on the next `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Reached through `00FD` or a fatal error. Stepping does nothing from here.
    Halted,
}

pub struct Emulator<I: EmulatorInput, R: RngCore> {
    // Standard fields
    memory: Memory,
    registers: [u8; NUM_REGISTERS],
    delay_timer: u8,
    sound_timer: u8,
    i: u16,
    program_counter: u16,
    stack: Stack,
    display: Display,
    status: Status,

    // SUPER-CHIP save slots
    flags: [u8; NUM_FLAGS],

    input: I,
    rng: R,
}

impl Emulator<DummyInput, StdRng> {

    /// Create a new emulator without input and with an entropy seeded random source
    pub fn new() -> Emulator<DummyInput, StdRng> {
        Emulator::with_input(DummyInput)
    }
}

impl Default for Emulator<DummyInput, StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: EmulatorInput> Emulator<I, StdRng> {

    /// Create a new emulator reading keys from `input`
    pub fn with_input(input: I) -> Emulator<I, StdRng> {
        Emulator::with_io(input, StdRng::from_entropy())
    }

    /// Create a new emulator whose random numbers are reproducible
    pub fn seeded(input: I, seed: u64) -> Emulator<I, StdRng> {
        Emulator::with_io(input, StdRng::seed_from_u64(seed))
    }
}

impl<I: EmulatorInput, R: RngCore> Emulator<I, R> {

    /// Create a new emulator with input and a random source for `CXNN`
    pub fn with_io(input: I, rng: R) -> Emulator<I, R> {
        Emulator {
            memory: Memory::new(),
            registers: [0; NUM_REGISTERS],
            delay_timer: 0,
            sound_timer: 0,
            i: 0,
            program_counter: PROGRAM_START,
            stack: Stack::new(),
            display: Display::new(),
            status: Status::Running,
            flags: [0; NUM_FLAGS],

            input,
            rng,
        }
    }

    /// Put the machine back in its freshly constructed state.
    /// The loaded program is wiped along with the rest of memory.
    pub fn reset(&mut self) {
        self.memory = Memory::new();
        self.registers = [0; NUM_REGISTERS];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.i = 0;
        self.program_counter = PROGRAM_START;
        self.stack = Stack::new();
        self.display = Display::new();
        self.status = Status::Running;
        self.flags = [0; NUM_FLAGS];
    }

    /// Copy a program into memory at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<(), EmulatorError> {
        self.memory.load(program)?;
        log::info!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Perform a single step: fetch and execute one instruction,
    /// then count both timers down.
    ///
    /// A fatal error halts the machine and is returned; the program counter is left
    /// pointing at the instruction that failed.
    pub fn step(&mut self) -> Result<Status, EmulatorError> {
        if self.status == Status::Halted {
            return Ok(Status::Halted);
        }

        if let Err(error) = self.fetch_and_execute() {
            log::error!("Halting at {:#05x}: {}", self.program_counter, error);
            self.status = Status::Halted;
            return Err(error);
        }

        // Update timers
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }

        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }

        Ok(self.status)
    }

    /// Step until the machine halts or `max_steps` steps have been taken.
    /// Returns how many steps were taken.
    pub fn run(&mut self, max_steps: u64) -> Result<u64, EmulatorError> {
        if self.status == Status::Halted {
            return Ok(0);
        }
        for steps in 0..max_steps {
            if self.step()? == Status::Halted {
                return Ok(steps + 1);
            }
        }
        Ok(max_steps)
    }

    fn fetch_and_execute(&mut self) -> Result<(), EmulatorError> {
        let pc = self.program_counter;
        let instruction = Instruction::from_u16(self.memory.read_word(pc)?)?;

        log::trace!("{:#05x}: {:?}", pc, instruction);

        self.program_counter += INSTRUCTION_SIZE;

        self.execute_single(instruction).map_err(|error| {
            self.program_counter = pc;
            error
        })
    }

    /// Execute many instructions in order, stopping at the first error.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<(), EmulatorError> {
        for instruction in instructions {
            self.execute_single(*instruction)?;
        }
        Ok(())
    }

    /// Execute a single instruction.
    ///
    /// This behaves as if the instruction had just been fetched,
    /// so the program counter is expected to already point past it.
    /// Timers are left alone; only `step` counts them down.
    pub fn execute_single(&mut self, instruction: Instruction) -> Result<(), EmulatorError> {
        match instruction {

            // Malformed program, spin on the same instruction
            Instruction::Stall => self.rewind(),

            Instruction::ScrollDown(Const(n)) => self.display.scroll_down(n as usize),

            // Clear the active screen
            Instruction::ClearScreen => self.display.clear(),

            // Return to the previous call site via the stack.
            Instruction::Return => {
                self.program_counter = self.stack.pop()?;
            }

            Instruction::ScrollRight => self.display.scroll_right(),

            Instruction::ScrollLeft => self.display.scroll_left(),

            Instruction::Exit => {
                log::info!("Program exited");
                self.status = Status::Halted;
            }

            Instruction::DisableExtended => self.display.set_extended(false),

            Instruction::EnableExtended => self.display.set_extended(true),

            // Go to a specific memory address
            Instruction::Goto(Addr(addr)) => {
                self.program_counter = addr;
            }

            // Store the address after the call on the stack, then jump to the specified address
            Instruction::Call(Addr(addr)) => {
                self.stack.push(self.program_counter)?;
                self.program_counter = addr;
            }

            // If the register equals the constant, skip the next instruction
            Instruction::IfRegEqConst(Reg(x), Const(n)) => {
                self.skip_if(self.registers[x as usize] == n);
            }

            Instruction::IfRegNeqConst(Reg(x), Const(n)) => {
                self.skip_if(self.registers[x as usize] != n);
            }

            Instruction::IfRegEqReg(Reg(x), Reg(y)) => {
                self.skip_if(self.registers[x as usize] == self.registers[y as usize]);
            }

            Instruction::SetRegToConst(Reg(x), Const(n)) => {
                self.registers[x as usize] = n;
            }

            Instruction::IncRegByConst(Reg(x), Const(n)) => {
                self.registers[x as usize] = self.registers[x as usize].wrapping_add(n);
            }

            Instruction::SetRegToReg(Reg(x), Reg(y)) => {
                self.registers[x as usize] = self.registers[y as usize];
            }

            Instruction::BitwiseOr(Reg(x), Reg(y)) => {
                self.registers[x as usize] |= self.registers[y as usize];
            }

            Instruction::BitwiseAnd(Reg(x), Reg(y)) => {
                self.registers[x as usize] &= self.registers[y as usize];
            }

            Instruction::BitwiseXor(Reg(x), Reg(y)) => {
                self.registers[x as usize] ^= self.registers[y as usize];
            }

            // The flag is written last so it wins when VF is also the destination.

            // VF is set to 1 if there is a carry, 0 otherwise.
            Instruction::IncRegByReg(Reg(x), Reg(y)) => {
                let (sum, carry) =
                    self.registers[x as usize].overflowing_add(self.registers[y as usize]);
                self.registers[x as usize] = sum;
                self.registers[VF] = carry as u8;
            }

            // VF is set to 1 if Vx > Vy, 0 otherwise.
            Instruction::DecRegByReg(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.registers[x as usize], self.registers[y as usize]);
                self.registers[x as usize] = vx.wrapping_sub(vy);
                self.registers[VF] = (vx > vy) as u8;
            }

            // VF gets the bit shifted out
            Instruction::BitshiftRight(Reg(x)) => {
                let vx = self.registers[x as usize];
                self.registers[x as usize] = vx >> 1;
                self.registers[VF] = vx & 1;
            }

            // VF is set to 1 if Vy > Vx, 0 otherwise.
            Instruction::SetVxVyMinusVx(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.registers[x as usize], self.registers[y as usize]);
                self.registers[x as usize] = vy.wrapping_sub(vx);
                self.registers[VF] = (vy > vx) as u8;
            }

            Instruction::BitshiftLeft(Reg(x)) => {
                let vx = self.registers[x as usize];
                self.registers[x as usize] = vx << 1;
                self.registers[VF] = vx >> 7;
            }

            Instruction::IfRegNeqReg(Reg(x), Reg(y)) => {
                self.skip_if(self.registers[x as usize] != self.registers[y as usize]);
            }

            Instruction::SetI(Addr(addr)) => {
                self.i = addr & INDEX_MASK;
            }

            Instruction::SetPcToV0PlusAddr(Addr(addr)) => {
                self.program_counter = self.registers[0] as u16 + addr;
            }

            Instruction::SetVxRand(Reg(x), Const(n)) => {
                self.registers[x as usize] = self.rng.gen::<u8>() & n;
            }

            Instruction::Draw(Reg(x), Reg(y), Const(sprite_height)) => {

                // Get sprite, each row is 8 bits
                let sprite = self.memory.slice(self.i, sprite_height as usize)?;

                self.registers[VF] = 0;

                // Get coordinates
                let x_coord = self.registers[x as usize] as usize;
                let y_coord = self.registers[y as usize] as usize;

                if self.display.draw(x_coord, y_coord, sprite) {
                    self.registers[VF] = 1;
                }
            }

            // Skip if the key in Vx is pressed
            Instruction::IfKeyEqVx(Reg(x)) => {
                let pressed = self.is_pressed(self.registers[x as usize]);
                self.skip_if(pressed);
            }

            // Skip if the key in Vx isn't pressed
            Instruction::IfKeyNeqVx(Reg(x)) => {
                let pressed = self.is_pressed(self.registers[x as usize]);
                self.skip_if(!pressed);
            }

            Instruction::SetRegToDelayTimer(Reg(x)) => {
                self.registers[x as usize] = self.delay_timer;
            }

            // Wait for a key press by running this instruction again until one shows up.
            // Timers keep counting down in the meantime.
            Instruction::SetRegToGetKey(Reg(x)) => {
                match self.input.keys().iter().position(|pressed| *pressed) {
                    Some(key) => self.registers[x as usize] = key as u8,
                    None => {
                        log::debug!("Waiting for key");
                        self.rewind();
                    }
                }
            }

            Instruction::SetDelayTimerToReg(Reg(x)) => {
                self.delay_timer = self.registers[x as usize];
            }

            Instruction::SetSoundTimerToReg(Reg(x)) => {
                self.sound_timer = self.registers[x as usize];
            }

            Instruction::AddRegToI(Reg(x)) => {
                self.i = (self.i + self.registers[x as usize] as u16) & INDEX_MASK;
            }

            // Set i to character address. Each font element is 5 bytes.
            // Vx is not limited to a hex digit, larger values point past the font.
            Instruction::SetIToSpriteAddrVx(Reg(x)) => {
                let glyph = self.registers[x as usize] as u16;
                self.i = (FONT_ADDR + glyph * FONT_GLYPH_SIZE) & INDEX_MASK;
            }

            // Same for the 10 byte extended font
            Instruction::SetIToBigSpriteAddrVx(Reg(x)) => {
                let glyph = self.registers[x as usize] as u16;
                self.i = (BIG_FONT_ADDR + glyph * BIG_FONT_GLYPH_SIZE) & INDEX_MASK;
            }

            Instruction::SetIToBcdOfReg(Reg(x)) => {
                let value = self.registers[x as usize];
                let digits = self.memory.slice_mut(self.i, 3)?;
                digits[0] = value / 100;
                digits[1] = (value / 10) % 10;
                digits[2] = value % 10;
            }

            // Dump register values up to and including Vx
            Instruction::RegDump(Reg(x)) => {
                let count = x as usize + 1;
                self.memory
                    .slice_mut(self.i, count)?
                    .copy_from_slice(&self.registers[..count]);
            }

            // Load register values up to and including Vx
            Instruction::RegLoad(Reg(x)) => {
                let count = x as usize + 1;
                let bytes = self.memory.slice(self.i, count)?;
                self.registers[..count].copy_from_slice(bytes);
            }

            Instruction::FlagsDump(Reg(x)) => {
                let count = x as usize + 1;
                self.flags[..count].copy_from_slice(&self.registers[..count]);
            }

            Instruction::FlagsLoad(Reg(x)) => {
                let count = x as usize + 1;
                self.registers[..count].copy_from_slice(&self.flags[..count]);
            }
        };

        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.program_counter = self.program_counter.wrapping_add(INSTRUCTION_SIZE);
        }
    }

    /// Point the program counter back at the instruction being executed.
    fn rewind(&mut self) {
        self.program_counter = self.program_counter.wrapping_sub(INSTRUCTION_SIZE);
    }

    fn is_pressed(&self, key: u8) -> bool {
        self.input.keys().get(key as usize).copied().unwrap_or(false)
    }

    /// Hand the active screen and the buzzer state to an output device.
    pub fn present<O: EmulatorOutput>(&self, output: &mut O) -> io::Result<()> {
        output.present(self.display.screen())?;
        output.set_sound(self.sound_timer > 0)
    }

    pub fn screen(&self) -> Screen<'_> {
        self.display.screen()
    }

    pub fn is_extended(&self) -> bool {
        self.display.is_extended()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    pub fn flags(&self) -> &[u8; NUM_FLAGS] {
        &self.flags
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack_pointer(&self) -> usize {
        self.stack.pointer()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn memory(&self) -> &[u8] {
        self.memory.as_slice()
    }

    pub fn input(&self) -> &I {
        &self.input
    }
}

impl<I: EmulatorInput, R: RngCore> fmt::Display for Emulator<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display.screen())
    }
}
