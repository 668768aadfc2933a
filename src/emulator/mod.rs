// Emulator module - Main emulator coordinator
//
// This module provides the main emulator interface that coordinates the CPU
// and bus (which in turn owns the PPU and cartridge mapper) and implements
// quality-of-life features like save states, screenshots, speed control,
// and configuration management.

mod config;
mod recent_roms;
mod save_state;
mod screenshot;

pub use config::{EmulatorConfig, SpeedMode};
pub use recent_roms::RecentRomsList;
pub use save_state::{SaveState, SaveStateError};
pub use screenshot::{save_screenshot, ScreenshotError};

use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use crate::error::EmulationError;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Main emulator structure
///
/// Coordinates the CPU and bus and provides high-level functionality for
/// running games, saving/loading states, and managing configuration.
pub struct Emulator {
    /// CPU (6502 processor)
    cpu: Cpu,

    /// Bus (connects CPU, PPU, cartridge mapper, and controller)
    bus: Bus,

    /// Currently loaded cartridge's mapper number, retained for save-state
    /// bookkeeping and diagnostics (the cartridge's PRG/CHR data itself
    /// lives inside the bus's mapper once loaded).
    mapper: Option<u8>,

    /// Configuration
    config: EmulatorConfig,

    /// Currently loaded ROM path
    rom_path: Option<PathBuf>,

    /// Paused state
    paused: bool,

    /// Speed mode
    speed_mode: SpeedMode,

    /// Frame timing for speed control
    #[allow(dead_code)]
    last_frame_time: Option<Instant>,
}

impl Emulator {
    /// Create a new emulator instance with no cartridge loaded.
    ///
    /// # Example
    ///
    /// ```
    /// use nes_rs::emulator::Emulator;
    ///
    /// let emulator = Emulator::new();
    /// ```
    pub fn new() -> Self {
        Emulator {
            cpu: Cpu::new(),
            bus: Bus::test_bus(),
            mapper: None,
            config: EmulatorConfig::load_or_default(),
            rom_path: None,
            paused: false,
            speed_mode: SpeedMode::Normal,
            last_frame_time: None,
        }
    }

    /// Load a ROM file
    ///
    /// Parses the iNES file, wires its mapper onto a fresh bus and PPU, adds
    /// the ROM to the recent ROMs list, and resets the CPU to service the
    /// reset vector on the next tick.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ROM file (.nes)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nes_rs::emulator::Emulator;
    ///
    /// let mut emulator = Emulator::new();
    /// emulator.load_rom("game.nes").expect("Failed to load ROM");
    /// ```
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let cartridge = Cartridge::from_ines_file(path)?;
        info!(path = %path.display(), mapper = cartridge.mapper, "loaded cartridge");

        self.mapper = Some(cartridge.mapper);
        self.bus = Bus::new_nes(cartridge);
        self.rom_path = Some(path.to_path_buf());

        let mut recent_roms = RecentRomsList::load_or_default();
        recent_roms.add(path);
        recent_roms.save()?;

        self.reset();

        Ok(())
    }

    /// Reset the emulator
    ///
    /// Resets the CPU to its power-on state (which posts the reset
    /// interrupt, serviced on the next `tick`); the PPU and mapper reset
    /// through the bus when the cartridge is reloaded.
    ///
    /// # Example
    ///
    /// ```
    /// use nes_rs::emulator::Emulator;
    ///
    /// let mut emulator = Emulator::new();
    /// emulator.reset();
    /// ```
    pub fn reset(&mut self) {
        self.cpu.reset();
        if let Some(ppu) = self.bus.ppu() {
            ppu.borrow_mut().reset();
        }
        self.paused = false;
    }

    /// Advance emulation by exactly one CPU tick plus its three matching PPU
    /// ticks, delivering any NMI the PPU raises to the CPU. Returns whether
    /// the PPU completed a frame on this call, so a driver knows when to
    /// present the frame buffer.
    ///
    /// # Errors
    ///
    /// Returns the first fatal `EmulationError` raised by either chip.
    pub fn tick(&mut self) -> Result<bool, EmulationError> {
        self.cpu.tick(&mut self.bus)?;

        let Some(ppu) = self.bus.ppu() else {
            return Ok(false);
        };

        let mut frame_ready = false;
        for _ in 0..3 {
            let result = ppu.borrow_mut().tick()?;
            if result.nmi_requested {
                self.cpu.interrupt(false);
            }
            frame_ready |= result.frame_ready;
        }
        Ok(frame_ready)
    }

    /// Save state to a file
    ///
    /// Saves the complete emulator state to a file slot.
    ///
    /// # Arguments
    ///
    /// * `slot` - Save slot number (0-9)
    pub fn save_state(&self, slot: u8) -> Result<(), SaveStateError> {
        let save_state = SaveState::from_emulator(self)?;
        save_state.save_to_file(slot, self.rom_path.as_deref())
    }

    /// Quick save to slot 0
    ///
    /// Convenience method for quick save (F5 hotkey).
    pub fn quick_save(&self) -> Result<(), SaveStateError> {
        self.save_state(0)
    }

    /// Load state from a file
    ///
    /// Loads the complete emulator state from a file slot.
    ///
    /// # Arguments
    ///
    /// * `slot` - Save slot number (0-9)
    pub fn load_state(&mut self, slot: u8) -> Result<(), SaveStateError> {
        let save_state = SaveState::load_from_file(slot, self.rom_path.as_deref())?;
        save_state.restore_to_emulator(self)
    }

    /// Quick load from slot 0
    ///
    /// Convenience method for quick load (F7 hotkey).
    pub fn quick_load(&mut self) -> Result<(), SaveStateError> {
        self.load_state(0)
    }

    /// Take a screenshot
    ///
    /// Captures the current frame buffer and saves it as a PNG file. No-op
    /// error if no cartridge (and so no PPU) is loaded.
    pub fn screenshot(&self) -> Result<PathBuf, ScreenshotError> {
        let ppu = self
            .bus
            .ppu()
            .ok_or_else(|| ScreenshotError::Io(std::io::Error::other("no cartridge loaded")))?;
        screenshot::save_screenshot(ppu.borrow().frame(), self.rom_path.as_deref())
    }

    /// Set speed mode
    ///
    /// Controls emulation speed (normal, fast forward, slow motion).
    pub fn set_speed_mode(&mut self, mode: SpeedMode) {
        self.speed_mode = mode;
    }

    /// Get current speed mode
    pub fn speed_mode(&self) -> SpeedMode {
        self.speed_mode
    }

    /// Pause the emulator
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume the emulator
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Check if emulator is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get reference to CPU
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Get mutable reference to CPU
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// Get reference to Bus
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Get mutable reference to Bus
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Get reference to configuration
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Get mutable reference to configuration
    pub fn config_mut(&mut self) -> &mut EmulatorConfig {
        &mut self.config
    }

    /// Get the currently loaded ROM path
    pub fn rom_path(&self) -> Option<&Path> {
        self.rom_path.as_deref()
    }

    /// Get the currently loaded cartridge's mapper number, if any.
    pub fn mapper(&self) -> Option<u8> {
        self.mapper
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_emulator_has_no_rom_loaded() {
        let emulator = Emulator::new();
        assert!(emulator.rom_path().is_none());
        assert!(emulator.mapper().is_none());
        assert!(!emulator.is_paused());
    }

    #[test]
    fn tick_without_a_cartridge_runs_cpu_only() {
        let mut emulator = Emulator::new();
        // test_bus() has no PPU attached, so tick() should never report a
        // ready frame, but should still drive the CPU forward.
        let cycles_before = emulator.cpu().cycles;
        for _ in 0..100 {
            emulator.tick().expect("NOP-filled scratch never faults");
        }
        assert!(emulator.cpu().cycles > cycles_before);
    }

    #[test]
    fn pause_resume_toggle() {
        let mut emulator = Emulator::new();
        emulator.pause();
        assert!(emulator.is_paused());
        emulator.resume();
        assert!(!emulator.is_paused());
        emulator.toggle_pause();
        assert!(emulator.is_paused());
    }

    #[test]
    fn speed_mode_round_trips() {
        let mut emulator = Emulator::new();
        emulator.set_speed_mode(SpeedMode::FastForward2x);
        assert_eq!(emulator.speed_mode(), SpeedMode::FastForward2x);
    }
}
