// Load and Store instructions for 6502 CPU

use crate::bus::Bus;
use crate::cpu::addressing::{read_operand, Operand};
use crate::cpu::Cpu;

// Load instructions read a value from memory into a register and update the
// Zero (Z) and Negative (N) flags.

/// LDA - loads a byte into the accumulator. Flags affected: Z, N.
pub fn lda(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    cpu.a = value;
    cpu.update_zero_and_negative_flags(value);
}

/// LDX - loads a byte into the X register. Flags affected: Z, N.
pub fn ldx(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    cpu.x = value;
    cpu.update_zero_and_negative_flags(value);
}

/// LDY - loads a byte into the Y register. Flags affected: Z, N.
pub fn ldy(cpu: &mut Cpu, bus: &Bus, operand: &Operand) {
    let value = read_operand(bus, operand);
    cpu.y = value;
    cpu.update_zero_and_negative_flags(value);
}

// Store instructions write a register to memory. They never touch flags.

/// STA - stores the accumulator. Flags affected: none.
pub fn sta(cpu: &Cpu, bus: &mut Bus, operand: &Operand) {
    bus.write(operand.address, cpu.a);
}

/// STX - stores the X register. Flags affected: none.
pub fn stx(cpu: &Cpu, bus: &mut Bus, operand: &Operand) {
    bus.write(operand.address, cpu.x);
}

/// STY - stores the Y register. Flags affected: none.
pub fn sty(cpu: &Cpu, bus: &mut Bus, operand: &Operand) {
    bus.write(operand.address, cpu.y);
}
