// Flag manipulation instructions for 6502 CPU
// These instructions directly set or clear specific processor status flags
// and affect nothing else.

use crate::cpu::{flags, Cpu};

/// CLC - clear carry.
pub fn clc(cpu: &mut Cpu) {
    cpu.clear_flag(flags::CARRY);
}

/// SEC - set carry.
pub fn sec(cpu: &mut Cpu) {
    cpu.set_flag(flags::CARRY);
}

/// CLI - clear interrupt disable.
pub fn cli(cpu: &mut Cpu) {
    cpu.clear_flag(flags::INTERRUPT_DISABLE);
}

/// SEI - set interrupt disable.
pub fn sei(cpu: &mut Cpu) {
    cpu.set_flag(flags::INTERRUPT_DISABLE);
}

/// CLD - clear decimal mode. Decimal arithmetic isn't modeled, so this flag
/// is otherwise inert, but the bit itself is still tracked faithfully.
pub fn cld(cpu: &mut Cpu) {
    cpu.clear_flag(flags::DECIMAL);
}

/// SED - set decimal mode.
pub fn sed(cpu: &mut Cpu) {
    cpu.set_flag(flags::DECIMAL);
}

/// CLV - clear overflow.
pub fn clv(cpu: &mut Cpu) {
    cpu.clear_flag(flags::OVERFLOW);
}
