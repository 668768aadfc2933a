// Bare-metal peripheral devices used outside the NES/PPU path.
//
// These back the single-byte-mapped devices the snake demo expects: a
// pseudo-random byte at one address and a 32x32 raw framebuffer at a 1KB
// range. Neither is part of the NES memory map; `Bus` only consults them
// when constructed via `Bus::new_demo`.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

/// Returns a fresh pseudo-random byte on every read. The one piece of state
/// a real 6502 program can't derive from its own memory, so its RNG seed
/// has to come from outside.
pub struct RandomDevice {
    rng: RefCell<SmallRng>,
}

impl RandomDevice {
    pub fn new() -> Self {
        RandomDevice {
            rng: RefCell::new(SmallRng::from_entropy()),
        }
    }

    pub fn read(&self) -> u8 {
        self.rng.borrow_mut().gen()
    }
}

impl Default for RandomDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Width/height of the demo's raw framebuffer, in pixels.
pub const DISPLAY_SIZE: usize = 32;

/// A flat 32x32 byte framebuffer, one byte per pixel, no palette
/// resolution. Row-major: `mem[y * 32 + x]`.
pub struct DisplayDevice {
    mem: [u8; DISPLAY_SIZE * DISPLAY_SIZE],
}

impl DisplayDevice {
    pub fn new() -> Self {
        DisplayDevice {
            mem: [0; DISPLAY_SIZE * DISPLAY_SIZE],
        }
    }

    pub fn read(&self, offset: u16) -> u8 {
        self.mem[offset as usize & (DISPLAY_SIZE * DISPLAY_SIZE - 1)]
    }

    pub fn write(&mut self, offset: u16, data: u8) {
        self.mem[offset as usize & (DISPLAY_SIZE * DISPLAY_SIZE - 1)] = data;
    }

    /// The full framebuffer, one byte per pixel, row-major.
    pub fn frame(&self) -> &[u8] {
        &self.mem
    }
}

impl Default for DisplayDevice {
    fn default() -> Self {
        Self::new()
    }
}
