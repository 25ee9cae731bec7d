/*!

A SUPER-CHIP emulator core, covering the CHIP-8 instruction set as specified at https://en.wikipedia.org/wiki/CHIP-8
along with the SUPER-CHIP additions: a 128x64 extended screen, scrolling, a large font and eight save slots.

# Headless runner

If you want to try the emulator on some programs, there is a small runner
you can use with `cargo run --release -- <program>`.
It steps the program without a screen, then optionally prints the final frame with `--dump`.
See `--help` for seeding the random source, holding down keys and throttling.

# Library

If you are not interested in handling input (key presses and such),
then you can use `Emulator::new()` to get an emulator to work with.

The main way of running a program is to load instructions as bytes.

```rust
use super_chip_8::emulator::{Emulator, Status};

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let program = [0x00, 0xE0, 0x00, 0xFD]; // Clear the display, then exit
emulator.load(&program).unwrap();
assert_eq!(emulator.step(), Ok(Status::Running));
assert_eq!(emulator.step(), Ok(Status::Halted));
```

Alternatively, you can experiment by executing instructions manually.

```rust
use super_chip_8::emulator::Emulator;
use super_chip_8::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::new();

// Execute instructions manually
emulator.execute_single(Instruction::ClearScreen).unwrap();

// Or many sequentially
emulator.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
]).unwrap();

assert_eq!(emulator.registers()[0xB], 35);
```

Errors such as a stack overflow or an unknown opcode halt the machine
and come back from `step` as an `EmulatorError`.

## Custom input and output

To get keypresses, you must implement `EmulatorInput`, which tells the emulator which keys are held down.
`SharedKeys` is a ready-made one that another thread can update.
To show the screen, implement `EmulatorOutput` and hand it to `Emulator::present` whenever you want a new frame.
Take a look at `src/emulator/input.rs` and `src/emulator/output.rs` to see how to implement these.

```rust
use super_chip_8::emulator::Emulator;
use super_chip_8::emulator::input::SharedKeys;
use super_chip_8::emulator::output::DummyOutput;

let keys = SharedKeys::new();
let mut emulator = Emulator::seeded(keys.clone(), 1234);
let mut output = DummyOutput::new();

keys.press(0x5);
emulator.load(&[0xF0, 0x0A]).unwrap(); // Wait for a key
emulator.step().unwrap();
assert_eq!(emulator.registers()[0], 0x5);

emulator.present(&mut output).unwrap();
assert_eq!(output.frame().len(), 32);
```
*/

pub mod emulator;
pub mod util;
