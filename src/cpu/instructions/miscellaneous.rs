// Miscellaneous instructions for 6502 CPU: NOP, BRK, RTI.

use crate::bus::Bus;
use crate::cpu::{flags, vectors, Cpu};
use crate::error::EmulationError;

/// NOP - does nothing.
pub fn nop() {}

/// BRK - software interrupt. The opcode table lists BRK as a 2-byte
/// instruction purely so the generic PC advance in execute::step lands
/// cpu.pc two bytes past the opcode (the second byte is a padding
/// signature never actually read) before this function pushes it — that
/// pushed value is the return address real hardware produces.
/// Flags affected: I is set; B and the unused bit are set in the pushed
/// copy of status only, never in the live register.
pub fn brk(cpu: &mut Cpu, bus: &mut Bus) -> Result<(), EmulationError> {
    cpu.push_u16(bus, cpu.pc)?;
    let pushed_status = cpu.status | flags::BREAK | flags::UNUSED;
    cpu.push_u8(bus, pushed_status)?;
    cpu.set_flag(flags::INTERRUPT_DISABLE);
    cpu.pc = crate::cpu::read_u16(bus, vectors::IRQ);
    Ok(())
}

/// RTI - return from interrupt. Same status merge as PLP: B is discarded
/// (it's not a real flag bit, only meaningful in the pushed byte) and the
/// unused bit is forced back to 1.
pub fn rti(cpu: &mut Cpu, bus: &Bus) -> Result<(), EmulationError> {
    let pulled_status = cpu.pull_u8(bus)?;
    cpu.status = (pulled_status & !flags::BREAK) | flags::UNUSED;
    cpu.pc = cpu.pull_u16(bus)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::vectors;

    #[test]
    fn nop_is_a_no_op() {
        nop();
    }

    #[test]
    fn brk_pushes_pc_and_status_then_jumps_through_irq_vector() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        bus.write(vectors::IRQ, 0x00);
        bus.write(vectors::IRQ + 1, 0x80);
        cpu.pc = 0x1002; // already advanced 2 past the BRK opcode
        cpu.set_flag(flags::CARRY);
        let sp_before = cpu.sp;

        brk(&mut cpu, &mut bus).unwrap();

        assert_eq!(cpu.pc, 0x8000);
        assert!(cpu.get_flag(flags::INTERRUPT_DISABLE));
        assert_eq!(cpu.sp, sp_before.wrapping_sub(3));
    }

    #[test]
    fn brk_rti_roundtrip_restores_pc_and_flags() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        bus.write(vectors::IRQ, 0x00);
        bus.write(vectors::IRQ + 1, 0x80);
        cpu.pc = 0x1002;
        cpu.set_flag(flags::CARRY);
        cpu.set_flag(flags::OVERFLOW);

        brk(&mut cpu, &mut bus).unwrap();
        rti(&mut cpu, &bus).unwrap();

        assert_eq!(cpu.pc, 0x1002);
        assert!(cpu.get_flag(flags::CARRY));
        assert!(cpu.get_flag(flags::OVERFLOW));
    }

    #[test]
    fn rti_discards_break_and_forces_unused() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        cpu.push_u16(&mut bus, 0x1234).unwrap();
        cpu.push_u8(&mut bus, flags::CARRY | flags::BREAK).unwrap();
        rti(&mut cpu, &bus).unwrap();
        assert!(!cpu.get_flag(flags::BREAK));
        assert!(cpu.get_flag(flags::UNUSED));
        assert!(cpu.get_flag(flags::CARRY));
        assert_eq!(cpu.pc, 0x1234);
    }
}
