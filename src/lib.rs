// NES Emulator Library
// Core library for the 6502 CPU / NES PPU subset emulation core.

// Public modules
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod devices;
pub mod display;
pub mod emulator;
pub mod error;
pub mod input;
pub mod ppu;
pub mod ram;

// Re-export main types for convenience
pub use bus::{Bus, MemoryMappedDevice};
pub use cartridge::{Cartridge, Mapper, Mirroring};
pub use cpu::Cpu;
pub use display::{FrameBuffer, WindowConfig};
pub use emulator::{Emulator, EmulatorConfig, SaveState, SaveStateError, SpeedMode};
pub use error::{CartridgeError, EmulationError};
pub use input::{Controller, ControllerIO};
pub use ppu::Ppu;
pub use ram::Ram;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that all components can be instantiated
        let _cpu = Cpu::new();
        let _ppu = Ppu::new();
        let _bus = Bus::test_bus();
        let _cartridge = Cartridge::new();
        let _controller = Controller::new();
        let _controller_io = ControllerIO::new();
        let _ram = Ram::new();
    }
}
