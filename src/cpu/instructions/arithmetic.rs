// Arithmetic instructions: ADC, SBC, and the INC/DEC family.

use crate::bus::Bus;
use crate::cpu::addressing::{read_operand, Operand};
use crate::cpu::{flags, Cpu};

/// ADC - adds the operand and the carry flag to the accumulator.
/// Flags affected: C, Z, V, N.
pub fn adc(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    add_to_accumulator(cpu, value);
}

/// SBC - subtracts the operand (with borrow) from the accumulator.
/// Implemented as ADC of the one's complement, which reuses the same
/// carry/overflow arithmetic since A - M - (1-C) == A + !M + C.
/// Flags affected: C, Z, V, N.
pub fn sbc(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    add_to_accumulator(cpu, !value);
}

fn add_to_accumulator(cpu: &mut Cpu, value: u8) {
    let carry_in = cpu.get_flag(flags::CARRY) as u16;
    let sum = cpu.a as u16 + value as u16 + carry_in;
    let result = sum as u8;
    let overflow = (!(cpu.a ^ value) & (cpu.a ^ result) & 0x80) != 0;
    cpu.update_flag(flags::CARRY, sum > 0xFF);
    cpu.update_flag(flags::OVERFLOW, overflow);
    cpu.a = result;
    cpu.update_zero_and_negative_flags(cpu.a);
}

/// INC - increments a memory location. Flags affected: Z, N.
pub fn inc(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand) {
    let value = bus.read(operand.address).wrapping_add(1);
    bus.write(operand.address, value);
    cpu.update_zero_and_negative_flags(value);
}

/// DEC - decrements a memory location. Flags affected: Z, N.
pub fn dec(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand) {
    let value = bus.read(operand.address).wrapping_sub(1);
    bus.write(operand.address, value);
    cpu.update_zero_and_negative_flags(value);
}

/// INX - increments the X register. Flags affected: Z, N.
pub fn inx(cpu: &mut Cpu) {
    cpu.x = cpu.x.wrapping_add(1);
    cpu.update_zero_and_negative_flags(cpu.x);
}

/// INY - increments the Y register. Flags affected: Z, N.
pub fn iny(cpu: &mut Cpu) {
    cpu.y = cpu.y.wrapping_add(1);
    cpu.update_zero_and_negative_flags(cpu.y);
}

/// DEX - decrements the X register. Flags affected: Z, N.
pub fn dex(cpu: &mut Cpu) {
    cpu.x = cpu.x.wrapping_sub(1);
    cpu.update_zero_and_negative_flags(cpu.x);
}

/// DEY - decrements the Y register. Flags affected: Z, N.
pub fn dey(cpu: &mut Cpu) {
    cpu.y = cpu.y.wrapping_sub(1);
    cpu.update_zero_and_negative_flags(cpu.y);
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

    fn memory(address: u16) -> Operand {
        Operand {
            mode: AddressingMode::Absolute,
            address,
            page_crossed: false,
            value: None,
        }
    }

    #[test]
    fn adc_sets_carry_on_unsigned_overflow() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0xFF;
        adc(&mut cpu, &bus, &immediate(0x01));
        assert_eq!(cpu.a, 0x00);
        assert!(cpu.get_flag(flags::CARRY));
        assert!(cpu.get_flag(flags::ZERO));
    }

    #[test]
    fn adc_sets_overflow_on_signed_overflow() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0x7F; // +127
        adc(&mut cpu, &bus, &immediate(0x01));
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.get_flag(flags::OVERFLOW));
        assert!(cpu.get_flag(flags::NEGATIVE));
    }

    #[test]
    fn sbc_without_borrow_needs_carry_set_first() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0x10;
        cpu.set_flag(flags::CARRY); // no borrow
        sbc(&mut cpu, &bus, &immediate(0x05));
        assert_eq!(cpu.a, 0x0B);
        assert!(cpu.get_flag(flags::CARRY), "carry set means no borrow occurred");
    }

    #[test]
    fn sbc_with_borrow_clears_carry_on_underflow() {
        let mut cpu = Cpu::new();
        let bus = Bus::test_bus();
        cpu.a = 0x00;
        cpu.set_flag(flags::CARRY);
        sbc(&mut cpu, &bus, &immediate(0x01));
        assert_eq!(cpu.a, 0xFF);
        assert!(!cpu.get_flag(flags::CARRY), "borrow occurred");
    }

    #[test]
    fn inc_dec_memory_update_flags() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::test_bus();
        bus.write(0x10, 0xFF);
        inc(&mut cpu, &mut bus, &memory(0x10));
        assert_eq!(bus.read(0x10), 0x00);
        assert!(cpu.get_flag(flags::ZERO));
        dec(&mut cpu, &mut bus, &memory(0x10));
        assert_eq!(bus.read(0x10), 0xFF);
        assert!(cpu.get_flag(flags::NEGATIVE));
    }

    #[test]
    fn register_increment_decrement_wrap() {
        let mut cpu = Cpu::new();
        cpu.x = 0xFF;
        inx(&mut cpu);
        assert_eq!(cpu.x, 0x00);
        dex(&mut cpu);
        assert_eq!(cpu.x, 0xFF);
        cpu.y = 0x00;
        dey(&mut cpu);
        assert_eq!(cpu.y, 0xFF);
        iny(&mut cpu);
        assert_eq!(cpu.y, 0x00);
    }
}
