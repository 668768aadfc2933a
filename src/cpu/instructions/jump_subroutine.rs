// Jump and Subroutine instructions for 6502 CPU
//
// By the time any of these run, the generic instruction-length PC advance
// in execute::step has already happened: cpu.pc points at the start of the
// following instruction. JSR/RTS lean on that directly rather than
// re-deriving it from the opcode length.

use crate::bus::Bus;
use crate::cpu::addressing::Operand;
use crate::cpu::Cpu;
use crate::error::EmulationError;

/// JMP - unconditional jump. Flags affected: none.
pub fn jmp(cpu: &mut Cpu, operand: &Operand) {
    cpu.pc = operand.address;
}

/// JSR - pushes the address of the last byte of the JSR instruction
/// (cpu.pc - 1, since cpu.pc already points past it) and jumps.
/// Flags affected: none.
pub fn jsr(cpu: &mut Cpu, bus: &mut Bus, operand: &Operand) -> Result<(), EmulationError> {
    cpu.push_u16(bus, cpu.pc.wrapping_sub(1))?;
    cpu.pc = operand.address;
    Ok(())
}

/// RTS - pulls the return address JSR pushed and resumes one byte past it.
/// Flags affected: none.
pub fn rts(cpu: &mut Cpu, bus: &Bus) -> Result<(), EmulationError> {
    let return_addr = cpu.pull_u16(bus)?;
    cpu.pc = return_addr.wrapping_add(1);
    Ok(())
}
