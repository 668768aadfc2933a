// Common test utilities for ROM-based integration tests
//
// Shared helpers for running Blargg-style test ROMs (CPU, PPU, sprite
// timing) and checking their $6000/$6001 result protocol.

#![allow(dead_code)]

use nes_rs::bus::Bus;
use nes_rs::cartridge::Cartridge;
use nes_rs::cpu::Cpu;

/// Result of running a Blargg-style test ROM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    /// Test passed
    Passed,
    /// Test failed with an error code
    Failed(u8),
    /// Test timed out before writing a result
    Timeout,
}

/// Reads a null-terminated ASCII status string out of $6004 onward, used by
/// the newer Blargg test ROMs that write a human-readable message there in
/// addition to the $6000/$6001 status/code pair.
fn read_status_message(bus: &Bus) -> String {
    let mut message = String::new();
    let mut addr: u16 = 0x6004;
    for _ in 0..512 {
        let byte = bus.read(addr);
        if byte == 0 {
            break;
        }
        if (0x20..=0x7E).contains(&byte) || byte == b'\n' {
            message.push(byte as char);
        }
        addr = addr.wrapping_add(1);
    }
    message
}

/// Loads `rom_path` as an iNES cartridge and runs it for up to `max_cycles`
/// CPU cycles, polling the standard Blargg test-status protocol:
///
/// - `$6000 == 0x80`: test still running
/// - `$6000 == 0x81`: test complete, result code in `$6001` (0 = passed)
/// - anything else before the ROM has had a chance to initialize: ignored
///
/// Returns `Ok((passed, message))` on a completed test (message is the
/// ROM's own status text if it wrote one, else a generic summary), or
/// `Err` if the ROM file couldn't be loaded.
pub fn run_blargg_style_test(rom_path: &str, max_cycles: u64) -> Result<(bool, String), String> {
    let cartridge = Cartridge::from_ines_file(rom_path)
        .map_err(|e| format!("failed to load {}: {}", rom_path, e))?;

    let mut bus = Bus::new_nes(cartridge);
    let mut cpu = Cpu::new();

    let mut result = TestResult::Timeout;
    while cpu.cycles < max_cycles {
        cpu.tick(&mut bus)
            .map_err(|e| format!("emulation fault: {}", e))?;

        if let Some(ppu) = bus.ppu() {
            for _ in 0..3 {
                ppu.borrow_mut()
                    .tick()
                    .map_err(|e| format!("emulation fault: {}", e))?;
            }
        }

        if bus.read(0x6000) == 0x81 {
            let code = bus.read(0x6001);
            result = if code == 0 {
                TestResult::Passed
            } else {
                TestResult::Failed(code)
            };
            break;
        }
    }

    let message = read_status_message(&bus);
    match result {
        TestResult::Passed => Ok((true, if message.is_empty() { "PASSED".to_string() } else { message })),
        TestResult::Failed(code) => Ok((
            false,
            if message.is_empty() {
                format!("FAILED (code ${:02X})", code)
            } else {
                message
            },
        )),
        TestResult::Timeout => Ok((false, "TIMEOUT: test never wrote a result".to_string())),
    }
}
