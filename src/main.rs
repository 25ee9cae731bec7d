use std::io;
use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use structopt::StructOpt;

use super_chip_8::emulator::input::SharedKeys;
use super_chip_8::emulator::output::TextOutput;
use super_chip_8::emulator::{Emulator, Status};

/// Run a CHIP-8 or SUPER-CHIP program without a screen.
#[derive(StructOpt, Debug)]
#[structopt(name = "super-chip-8")]
struct Opt {
    /// Verbose mode (-v, -vv, -vvv)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Stop after this many steps
    #[structopt(long, default_value = "1000000")]
    steps: u64,

    /// Steps per second, 0 runs as fast as possible
    #[structopt(long, default_value = "0")]
    hz: u64,

    /// Keys to hold down for the whole run, as hex digits (e.g. 5af)
    #[structopt(long, default_value = "")]
    hold: String,

    /// Print the final frame to stdout
    #[structopt(long)]
    dump: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Get configuration and read input file
    let opt = Opt::from_args();
    env_logger::Builder::from_default_env()
        .filter_level(level(opt.verbose))
        .init();

    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let keys = SharedKeys::new();
    for c in opt.hold.chars() {
        match c.to_digit(16) {
            Some(key) => keys.press(key as u8),
            None => log::warn!("Ignoring non-hex key {:?}", c),
        }
    }

    let mut emulator = match opt.seed {
        Some(seed) => Emulator::seeded(keys, seed),
        None => Emulator::with_input(keys),
    };
    emulator.load(&program)?;

    // Start execution
    let delay = if opt.hz == 0 {
        None
    } else {
        Some(Duration::from_nanos(1_000_000_000 / opt.hz))
    };
    let mut steps = 0;
    while steps < opt.steps {
        steps += 1;
        if emulator.step()? == Status::Halted {
            break;
        }
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
    }
    log::info!("Stopped after {} steps at {:#05x}", steps, emulator.program_counter());

    if opt.dump {
        emulator.present(&mut TextOutput::new(io::stdout()))?;
    }

    Ok(())
}
