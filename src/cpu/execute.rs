// Ties the opcode table, addressing resolution and instruction dispatch
// together into a single fetch-decode-execute step, plus a nestest-style
// trace line used by the debug log.

use crate::bus::Bus;
use crate::cpu::addressing::{resolve, AddressingMode};
use crate::cpu::instructions::{
    arithmetic, branch, compare, flags as flag_ops, jump_subroutine, load_store, logic,
    miscellaneous, shift_rotate, stack, transfer,
};
use crate::cpu::opcodes::{Instr, OpcodeInfo, OPCODE_TABLE};
use crate::cpu::Cpu;
use crate::error::EmulationError;

/// Fetches, decodes and executes exactly one instruction, and returns the
/// number of cycles it consumed (base cost plus any page-cross or
/// branch-taken extras). The generic PC advance past the opcode and its
/// operand bytes happens here, before dispatch, so JSR/branch/BRK can lean
/// on `cpu.pc` already pointing past the instruction.
pub fn step(cpu: &mut Cpu, bus: &mut Bus) -> Result<u8, EmulationError> {
    let pc = cpu.pc;
    let opcode = bus.read(pc);
    let info = OPCODE_TABLE[opcode as usize].ok_or(EmulationError::UnknownOpcode { opcode, pc })?;

    let operand_start = pc.wrapping_add(1);
    let operand = resolve(info.mode, cpu, bus, operand_start);
    cpu.pc = pc.wrapping_add(info.bytes as u16);

    let mut cycles = info.cycles;
    let mut branch_taken = false;

    match info.instr {
        Instr::Lda => load_store::lda(cpu, bus, &operand),
        Instr::Ldx => load_store::ldx(cpu, bus, &operand),
        Instr::Ldy => load_store::ldy(cpu, bus, &operand),
        Instr::Sta => load_store::sta(cpu, bus, &operand),
        Instr::Stx => load_store::stx(cpu, bus, &operand),
        Instr::Sty => load_store::sty(cpu, bus, &operand),

        Instr::Tax => transfer::tax(cpu),
        Instr::Tay => transfer::tay(cpu),
        Instr::Txa => transfer::txa(cpu),
        Instr::Tya => transfer::tya(cpu),
        Instr::Tsx => transfer::tsx(cpu),
        Instr::Txs => transfer::txs(cpu),

        Instr::Pha => stack::pha(cpu, bus)?,
        Instr::Php => stack::php(cpu, bus)?,
        Instr::Pla => stack::pla(cpu, bus)?,
        Instr::Plp => stack::plp(cpu, bus)?,

        Instr::And => logic::and(cpu, bus, &operand),
        Instr::Ora => logic::ora(cpu, bus, &operand),
        Instr::Eor => logic::eor(cpu, bus, &operand),
        Instr::Bit => logic::bit(cpu, bus, &operand),

        Instr::Adc => arithmetic::adc(cpu, bus, &operand),
        Instr::Sbc => arithmetic::sbc(cpu, bus, &operand),
        Instr::Inc => arithmetic::inc(cpu, bus, &operand),
        Instr::Inx => arithmetic::inx(cpu),
        Instr::Iny => arithmetic::iny(cpu),
        Instr::Dec => arithmetic::dec(cpu, bus, &operand),
        Instr::Dex => arithmetic::dex(cpu),
        Instr::Dey => arithmetic::dey(cpu),

        Instr::Asl => shift_rotate::asl(cpu, bus, &operand),
        Instr::Lsr => shift_rotate::lsr(cpu, bus, &operand),
        Instr::Rol => shift_rotate::rol(cpu, bus, &operand),
        Instr::Ror => shift_rotate::ror(cpu, bus, &operand),

        Instr::Cmp => compare::cmp(cpu, bus, &operand),
        Instr::Cpx => compare::cpx(cpu, bus, &operand),
        Instr::Cpy => compare::cpy(cpu, bus, &operand),

        Instr::Bcc => branch_taken = branch::bcc(cpu, &operand).0,
        Instr::Bcs => branch_taken = branch::bcs(cpu, &operand).0,
        Instr::Beq => branch_taken = branch::beq(cpu, &operand).0,
        Instr::Bne => branch_taken = branch::bne(cpu, &operand).0,
        Instr::Bmi => branch_taken = branch::bmi(cpu, &operand).0,
        Instr::Bpl => branch_taken = branch::bpl(cpu, &operand).0,
        Instr::Bvc => branch_taken = branch::bvc(cpu, &operand).0,
        Instr::Bvs => branch_taken = branch::bvs(cpu, &operand).0,

        Instr::Jmp => jump_subroutine::jmp(cpu, &operand),
        Instr::Jsr => jump_subroutine::jsr(cpu, bus, &operand)?,
        Instr::Rts => jump_subroutine::rts(cpu, bus)?,

        Instr::Brk => miscellaneous::brk(cpu, bus)?,
        Instr::Rti => miscellaneous::rti(cpu, bus)?,
        Instr::Nop => miscellaneous::nop(),

        Instr::Clc => flag_ops::clc(cpu),
        Instr::Sec => flag_ops::sec(cpu),
        Instr::Cli => flag_ops::cli(cpu),
        Instr::Sei => flag_ops::sei(cpu),
        Instr::Cld => flag_ops::cld(cpu),
        Instr::Sed => flag_ops::sed(cpu),
        Instr::Clv => flag_ops::clv(cpu),
    }

    // Branch page-cross extras are computed by the branch taken above
    // (relative addressing never sets operand.page_crossed); everything
    // else that pays the indexed-read penalty does so through the table.
    if branch_taken {
        cycles += 1;
        let target = cpu.pc;
        if (pc.wrapping_add(info.bytes as u16) & 0xFF00) != (target & 0xFF00) {
            cycles += 1;
        }
    } else if info.page_cross_extra && operand.page_crossed {
        cycles += 1;
    }

    Ok(cycles)
}

/// A nestest-format trace line: `PC  OP OP OP  MNEM $ADDR    A:XX X:XX Y:XX P:XX SP:XX CYC:N`.
pub fn trace(cpu: &Cpu, bus: &Bus) -> String {
    let pc = cpu.pc;
    let opcode = bus.read(pc);
    let Some(info) = OPCODE_TABLE[opcode as usize] else {
        return format!("{:04X}  {:02X}      .byte ${:02X}", pc, opcode, opcode);
    };

    let byte2 = if info.bytes >= 2 {
        bus.read(pc.wrapping_add(1))
    } else {
        0
    };
    let byte3 = if info.bytes >= 3 {
        bus.read(pc.wrapping_add(2))
    } else {
        0
    };

    let hex_bytes = match info.bytes {
        1 => format!("{:02X}      ", opcode),
        2 => format!("{:02X} {:02X}   ", opcode, byte2),
        _ => format!("{:02X} {:02X} {:02X}", opcode, byte2, byte3),
    };

    let disassembly = disassemble(cpu, bus, pc, &info, byte2, byte3);

    format!(
        "{:04X}  {}  {:<32}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        pc, hex_bytes, disassembly, cpu.a, cpu.x, cpu.y, cpu.status, cpu.sp, cpu.cycles
    )
}

fn disassemble(cpu: &Cpu, bus: &Bus, pc: u16, info: &OpcodeInfo, byte2: u8, byte3: u8) -> String {
    let mnemonic = format!("{:?}", info.instr).to_uppercase();
    match info.mode {
        AddressingMode::Implicit => mnemonic,
        AddressingMode::Accumulator => format!("{mnemonic} A"),
        AddressingMode::Immediate => format!("{mnemonic} #${byte2:02X}"),
        AddressingMode::ZeroPage => format!("{mnemonic} ${byte2:02X} = {:02X}", bus.read(byte2 as u16)),
        AddressingMode::ZeroPageX => {
            let addr = byte2.wrapping_add(cpu.x);
            format!("{mnemonic} ${byte2:02X},X @ {addr:02X} = {:02X}", bus.read(addr as u16))
        }
        AddressingMode::ZeroPageY => {
            let addr = byte2.wrapping_add(cpu.y);
            format!("{mnemonic} ${byte2:02X},Y @ {addr:02X} = {:02X}", bus.read(addr as u16))
        }
        AddressingMode::Relative => {
            let offset = byte2 as i8;
            let target = pc.wrapping_add(2).wrapping_add(offset as u16);
            format!("{mnemonic} ${target:04X}")
        }
        AddressingMode::Absolute => {
            let addr = u16::from_le_bytes([byte2, byte3]);
            if matches!(info.instr, Instr::Jmp | Instr::Jsr) {
                format!("{mnemonic} ${addr:04X}")
            } else {
                format!("{mnemonic} ${addr:04X} = {:02X}", bus.read(addr))
            }
        }
        AddressingMode::AbsoluteX => {
            let base = u16::from_le_bytes([byte2, byte3]);
            let addr = base.wrapping_add(cpu.x as u16);
            format!("{mnemonic} ${base:04X},X @ {addr:04X} = {:02X}", bus.read(addr))
        }
        AddressingMode::AbsoluteY => {
            let base = u16::from_le_bytes([byte2, byte3]);
            let addr = base.wrapping_add(cpu.y as u16);
            format!("{mnemonic} ${base:04X},Y @ {addr:04X} = {:02X}", bus.read(addr))
        }
        AddressingMode::Indirect => {
            let ptr = u16::from_le_bytes([byte2, byte3]);
            let lo = bus.read(ptr);
            let hi = bus.read(ptr.wrapping_add(1));
            let target = u16::from_le_bytes([lo, hi]);
            format!("{mnemonic} (${ptr:04X}) = {target:04X}")
        }
        AddressingMode::PreIndexIndirect => {
            let ptr = byte2.wrapping_add(cpu.x);
            let lo = bus.read(ptr as u16);
            let hi = bus.read(ptr.wrapping_add(1) as u16);
            let addr = u16::from_le_bytes([lo, hi]);
            format!(
                "{mnemonic} (${byte2:02X},X) @ {ptr:02X} = {addr:04X} = {:02X}",
                bus.read(addr)
            )
        }
        AddressingMode::PostIndexIndirect => {
            let lo = bus.read(byte2 as u16);
            let hi = bus.read(byte2.wrapping_add(1) as u16);
            let base = u16::from_le_bytes([lo, hi]);
            let addr = base.wrapping_add(cpu.y as u16);
            format!(
                "{mnemonic} (${byte2:02X}),Y = {base:04X} @ {addr:04X} = {:02X}",
                bus.read(addr)
            )
        }
    }
}
