// Comparison instructions for 6502 CPU
// These instructions perform subtraction without storing the result,
// only updating the processor status flags.

use crate::bus::Bus;
use crate::cpu::addressing::{read_operand, Operand};
use crate::cpu::{flags, Cpu};

fn compare(cpu: &mut Cpu, register: u8, value: u8) {
    let result = register.wrapping_sub(value);
    cpu.update_flag(flags::CARRY, register >= value);
    cpu.update_zero_and_negative_flags(result);
}

/// CMP - compares the accumulator against the operand. Flags affected: C, Z, N.
pub fn cmp(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    compare(cpu, cpu.a, value);
}

/// CPX - compares the X register against the operand. Flags affected: C, Z, N.
pub fn cpx(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    compare(cpu, cpu.x, value);
}

/// CPY - compares the Y register against the operand. Flags affected: C, Z, N.
pub fn cpy(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    compare(cpu, cpu.y, value);
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
    fn cmp_sets_carry_when_register_is_greater_or_equal() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0x10;
        cmp(&mut cpu, &bus, &immediate(0x10));
        assert!(cpu.get_flag(flags::CARRY));
        assert!(cpu.get_flag(flags::ZERO));
    }

    #[test]
    fn cmp_clears_carry_when_register_is_smaller() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0x01;
        cmp(&mut cpu, &bus, &immediate(0x10));
        assert!(!cpu.get_flag(flags::CARRY));
        assert!(cpu.get_flag(flags::NEGATIVE));
    }

    #[test]
    fn cpx_cpy_compare_their_own_registers() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.x = 0x05;
        cpu.y = 0x05;
        cpx(&mut cpu, &bus, &immediate(0x05));
        assert!(cpu.get_flag(flags::ZERO));
        cpy(&mut cpu, &bus, &immediate(0x06));
        assert!(!cpu.get_flag(flags::CARRY));
    }
}
