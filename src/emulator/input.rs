use std::sync::{Arc, Mutex};

pub const NUM_KEYS: usize = 16;

/// Pressed state for keys 0x0..=0xF, indexed by key code.
pub type Keys = [bool; NUM_KEYS];

/// Represents an input device that knows which of the keys 0..0xF are held down.
/// The emulator takes one snapshot per key-testing instruction.
pub trait EmulatorInput {
    fn keys(&self) -> Keys;
}

/// An input device that never provides any input
pub struct DummyInput;

impl EmulatorInput for DummyInput {
    fn keys(&self) -> Keys {
        [false; NUM_KEYS]
    }
}

/// Key state that can be updated from another thread while the emulator runs.
/// Clones share the same state, so a frontend keeps one and hands the other to the emulator.
#[derive(Clone, Default)]
pub struct SharedKeys {
    keys: Arc<Mutex<Keys>>,
}

impl SharedKeys {

    pub fn new() -> SharedKeys {
        Self::default()
    }

    pub fn press(&self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&self, key: u8) {
        self.set(key, false);
    }

    /// Set the state of one key. Codes above 0xF are ignored.
    pub fn set(&self, key: u8, pressed: bool) {
        if key as usize >= NUM_KEYS {
            log::warn!("Ignoring key code {:#x}", key);
            return;
        }
        let mut keys = self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        keys[key as usize] = pressed;
    }
}

impl EmulatorInput for SharedKeys {
    fn keys(&self) -> Keys {
        *self.keys.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
