// Stack operation instructions for 6502 CPU
// These instructions push and pull values on the $0100-$01FF stack page.
// A push at SP=$00 or a pull at SP=$FF is a fatal stack fault (see error.rs).

use crate::bus::Bus;
use crate::cpu::{flags, Cpu};
use crate::error::EmulationError;

/// PHA - pushes the accumulator. Flags affected: none.
pub fn pha(cpu: &mut Cpu, bus: &mut Bus) -> Result<(), EmulationError> {
    cpu.push_u8(bus, cpu.a)
}

/// PHP - pushes the status register with B and the unused bit both set,
/// matching the byte a real 6502 pushes for a software-initiated push
/// (as opposed to the hardware IRQ/NMI push, which clears B). Flags
/// affected: none (the pushed copy, not the live register, carries B=1).
pub fn php(cpu: &mut Cpu, bus: &mut Bus) -> Result<(), EmulationError> {
    let pushed = cpu.status | flags::UNUSED | flags::BREAK;
    cpu.push_u8(bus, pushed)
}

/// PLA - pulls a byte into the accumulator. Flags affected: Z, N.
pub fn pla(cpu: &mut Cpu, bus: &Bus) -> Result<(), EmulationError> {
    let value = cpu.pull_u8(bus)?;
    cpu.a = value;
    cpu.update_zero_and_negative_flags(value);
    Ok(())
}

/// PLP - pulls the status register. B is discarded (it's not a real flag
/// bit, only meaningful in the pushed byte) and the unused bit is forced
/// back to 1.
pub fn plp(cpu: &mut Cpu, bus: &Bus) -> Result<(), EmulationError> {
    let value = cpu.pull_u8(bus)?;
    cpu.status = (value & !flags::BREAK) | flags::UNUSED;
    Ok(())
}
