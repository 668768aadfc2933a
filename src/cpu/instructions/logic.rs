// Logic and bit operation instructions for 6502 CPU

use crate::bus::Bus;
use crate::cpu::addressing::{read_operand, Operand};
use crate::cpu::{flags, Cpu};

/// AND - bitwise AND with the accumulator. Flags affected: Z, N.
pub fn and(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    cpu.a &= read_operand(bus, operand);
    cpu.update_zero_and_negative_flags(cpu.a);
}

/// ORA - bitwise OR with the accumulator. Flags affected: Z, N.
pub fn ora(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    cpu.a |= read_operand(bus, operand);
    cpu.update_zero_and_negative_flags(cpu.a);
}

/// EOR - bitwise exclusive-OR with the accumulator. Flags affected: Z, N.
pub fn eor(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    cpu.a ^= read_operand(bus, operand);
    cpu.update_zero_and_negative_flags(cpu.a);
}

/// BIT - tests bits in memory against the accumulator without storing a
/// result. Z is set from `A & M`; N and V are copied directly from bits 7
/// and 6 of the memory operand, not from the AND result.
/// Flags affected: Z, V, N.
pub fn bit(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    cpu.update_flag(flags::ZERO, (cpu.a & value) == 0);
    cpu.update_flag(flags::OVERFLOW, value & 0x40 != 0);
    cpu.update_flag(flags::NEGATIVE, value & 0x80 != 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::addressing::AddressingMode;

    fn immediate(value: u8) -> Operand {
        Operand {
            mode: AddressingMode::Immediate,
            address: 0,
            page_crossed: false,
            value: Some(value),
        }
    }

    #[test]
    fn and_masks_the_accumulator() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0xF0;
        and(&mut cpu, &bus, &immediate(0x0F));
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.get_flag(flags::ZERO));
    }

    #[test]
    fn ora_and_eor_combine_bits() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0x0F;
        ora(&mut cpu, &bus, &immediate(0xF0));
        assert_eq!(cpu.a, 0xFF);
        eor(&mut cpu, &bus, &immediate(0xFF));
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.get_flag(flags::ZERO));
    }

    #[test]
    fn bit_copies_n_and_v_from_the_operand_not_the_and_result() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0x00; // AND result will be zero regardless of operand bits
        bit(&mut cpu, &bus, &immediate(0xC0));
        assert!(cpu.get_flag(flags::ZERO));
        assert!(cpu.get_flag(flags::NEGATIVE));
        assert!(cpu.get_flag(flags::OVERFLOW));
    }
}
