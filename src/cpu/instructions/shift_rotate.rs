// Shift and rotate instructions for 6502 CPU
//
// Each of these operates on either the accumulator (AddressingMode::Accumulator)
// or a memory location, decided by the resolved operand's mode.

use crate::bus::Bus;
use crate::cpu::addressing::{AddressingMode, Operand};
use crate::cpu::{flags, Cpu};

fn load(cpu: &Cpu, bus: &Bus, operand: &Operand) -> u8 {
    if operand.mode == AddressingMode::Accumulator {
        cpu.a
    } else {
        bus.read(operand.address)
    }
}

fn store(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand, value: u8) {
    if operand.mode == AddressingMode::Accumulator {
        cpu.a = value;
    } else {
        bus.write(operand.address, value);
    }
}

/// ASL - arithmetic shift left. Bit 7 moves into carry; bit 0 becomes 0.
/// Flags affected: C, Z, N.
pub fn asl(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand) {
    let value = load(cpu, bus, operand);
    let carry = value & 0x80 != 0;
    let result = value << 1;
    store(cpu, bus, operand, result);
    cpu.update_flag(flags::CARRY, carry);
    cpu.update_zero_and_negative_flags(result);
}

/// LSR - logical shift right. Bit 0 moves into carry; bit 7 becomes 0.
/// Flags affected: C, Z, N.
pub fn lsr(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand) {
    let value = load(cpu, bus, operand);
    let carry = value & 0x01 != 0;
    let result = value >> 1;
    store(cpu, bus, operand, result);
    cpu.update_flag(flags::CARRY, carry);
    cpu.update_zero_and_negative_flags(result);
}

/// ROL - rotate left through carry: carry-in becomes bit 0, bit 7 becomes carry-out.
/// Flags affected: C, Z, N.
pub fn rol(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand) {
    let value = load(cpu, bus, operand);
    let carry_in = cpu.get_flag(flags::CARRY) as u8;
    let carry_out = value & 0x80 != 0;
    let result = (value << 1) | carry_in;
    store(cpu, bus, operand, result);
    cpu.update_flag(flags::CARRY, carry_out);
    cpu.update_zero_and_negative_flags(result);
}

/// ROR - rotate right through carry: carry-in becomes bit 7, bit 0 becomes carry-out.
/// Flags affected: C, Z, N.
pub fn ror(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand) {
    let value = load(cpu, bus, operand);
    let carry_in = cpu.get_flag(flags::CARRY) as u8;
    let carry_out = value & 0x01 != 0;
    let result = (value >> 1) | (carry_in << 7);
    store(cpu, bus, operand, result);
    cpu.update_flag(flags::CARRY, carry_out);
    cpu.update_zero_and_negative_flags(result);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulator() -> Operand {
        Operand {
            mode: AddressingMode::Accumulator,
            address: 0,
            page_crossed: false,
            value: None,
        }
    }

    fn memory(address: u16) -> Operand {
        Operand {
            mode: AddressingMode::Absolute,
            address,
            page_crossed: false,
            value: None,
        }
    }

    #[test]
    fn asl_shifts_accumulator_and_sets_carry() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        cpu.a = 0x81;
        asl(&mut cpu, &mut bus, &accumulator());
        assert_eq!(cpu.a, 0x02);
        assert!(cpu.get_flag(flags::CARRY));
    }

    #[test]
    fn lsr_shifts_memory_and_sets_carry() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        bus.write(0x10, 0x01);
        lsr(&mut cpu, &mut bus, &memory(0x10));
        assert_eq!(bus.read(0x10), 0x00);
        assert!(cpu.get_flag(flags::CARRY));
        assert!(cpu.get_flag(flags::ZERO));
    }

    #[test]
    fn rol_brings_carry_in_to_bit_zero() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        cpu.a = 0x80;
        cpu.set_flag(flags::CARRY);
        rol(&mut cpu, &mut bus, &accumulator());
        assert_eq!(cpu.a, 0x01);
        assert!(cpu.get_flag(flags::CARRY), "old bit 7 becomes the new carry");
    }

    #[test]
    fn ror_brings_carry_in_to_bit_seven() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        cpu.a = 0x01;
        cpu.set_flag(flags::CARRY);
        ror(&mut cpu, &mut bus, &accumulator());
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.get_flag(flags::CARRY), "old bit 0 becomes the new carry");
    }
}
