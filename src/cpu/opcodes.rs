// The 6502 opcode table: one entry per legal opcode byte, giving the
// addressing mode, instruction length, base cycle cost, and whether an
// indexed-read crossing a page boundary adds a cycle.
//
// Only the 151 official opcodes are populated; everything else is `None`
// and triggers `EmulationError::UnknownOpcode` in `execute::step`.

use crate::cpu::addressing::AddressingMode as Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instr {
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    Pha,
    Php,
    Pla,
    Plp,
    And,
    Ora,
    Eor,
    Bit,
    Adc,
    Sbc,
    Inc,
    Inx,
    Iny,
    Dec,
    Dex,
    Dey,
    Asl,
    Lsr,
    Rol,
    Ror,
    Cmp,
    Cpx,
    Cpy,
    Bcc,
    Bcs,
    Beq,
    Bne,
    Bmi,
    Bpl,
    Bvc,
    Bvs,
    Jmp,
    Jsr,
    Rts,
    Brk,
    Rti,
    Clc,
    Sec,
    Cli,
    Sei,
    Cld,
    Sed,
    Clv,
    Nop,
}

#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub instr: Instr,
    pub mode: Mode,
    /// Total instruction length in bytes, including the opcode byte.
    pub bytes: u8,
    pub cycles: u8,
    /// Indexed addressing modes that cross a page boundary cost one extra
    /// cycle on reads; stores and read-modify-write ops always pay the
    /// worst case up front and never set this.
    pub page_cross_extra: bool,
}

const fn op(instr: Instr, mode: Mode, bytes: u8, cycles: u8, page_cross_extra: bool) -> OpcodeInfo {
    OpcodeInfo {
        instr,
        mode,
        bytes,
        cycles,
        page_cross_extra,
    }
}

pub const OPCODE_TABLE: [Option<OpcodeInfo>; 256] = build_table();

const fn build_table() -> [Option<OpcodeInfo>; 256] {
    let mut t: [Option<OpcodeInfo>; 256] = [None; 256];

    // LDA
    t[0xA9] = Some(op(Instr::Lda, Mode::Immediate, 2, 2, false));
    t[0xA5] = Some(op(Instr::Lda, Mode::ZeroPage, 2, 3, false));
    t[0xB5] = Some(op(Instr::Lda, Mode::ZeroPageX, 2, 4, false));
    t[0xAD] = Some(op(Instr::Lda, Mode::Absolute, 3, 4, false));
    t[0xBD] = Some(op(Instr::Lda, Mode::AbsoluteX, 3, 4, true));
    t[0xB9] = Some(op(Instr::Lda, Mode::AbsoluteY, 3, 4, true));
    t[0xA1] = Some(op(Instr::Lda, Mode::PreIndexIndirect, 2, 6, false));
    t[0xB1] = Some(op(Instr::Lda, Mode::PostIndexIndirect, 2, 5, true));

    // LDX
    t[0xA2] = Some(op(Instr::Ldx, Mode::Immediate, 2, 2, false));
    t[0xA6] = Some(op(Instr::Ldx, Mode::ZeroPage, 2, 3, false));
    t[0xB6] = Some(op(Instr::Ldx, Mode::ZeroPageY, 2, 4, false));
    t[0xAE] = Some(op(Instr::Ldx, Mode::Absolute, 3, 4, false));
    t[0xBE] = Some(op(Instr::Ldx, Mode::AbsoluteY, 3, 4, true));

    // LDY
    t[0xA0] = Some(op(Instr::Ldy, Mode::Immediate, 2, 2, false));
    t[0xA4] = Some(op(Instr::Ldy, Mode::ZeroPage, 2, 3, false));
    t[0xB4] = Some(op(Instr::Ldy, Mode::ZeroPageX, 2, 4, false));
    t[0xAC] = Some(op(Instr::Ldy, Mode::Absolute, 3, 4, false));
    t[0xBC] = Some(op(Instr::Ldy, Mode::AbsoluteX, 3, 4, true));

    // STA
    t[0x85] = Some(op(Instr::Sta, Mode::ZeroPage, 2, 3, false));
    t[0x95] = Some(op(Instr::Sta, Mode::ZeroPageX, 2, 4, false));
    t[0x8D] = Some(op(Instr::Sta, Mode::Absolute, 3, 4, false));
    t[0x9D] = Some(op(Instr::Sta, Mode::AbsoluteX, 3, 5, false));
    t[0x99] = Some(op(Instr::Sta, Mode::AbsoluteY, 3, 5, false));
    t[0x81] = Some(op(Instr::Sta, Mode::PreIndexIndirect, 2, 6, false));
    t[0x91] = Some(op(Instr::Sta, Mode::PostIndexIndirect, 2, 6, false));

    // STX / STY
    t[0x86] = Some(op(Instr::Stx, Mode::ZeroPage, 2, 3, false));
    t[0x96] = Some(op(Instr::Stx, Mode::ZeroPageY, 2, 4, false));
    t[0x8E] = Some(op(Instr::Stx, Mode::Absolute, 3, 4, false));
    t[0x84] = Some(op(Instr::Sty, Mode::ZeroPage, 2, 3, false));
    t[0x94] = Some(op(Instr::Sty, Mode::ZeroPageX, 2, 4, false));
    t[0x8C] = Some(op(Instr::Sty, Mode::Absolute, 3, 4, false));

    // Register transfers
    t[0xAA] = Some(op(Instr::Tax, Mode::Implicit, 1, 2, false));
    t[0xA8] = Some(op(Instr::Tay, Mode::Implicit, 1, 2, false));
    t[0x8A] = Some(op(Instr::Txa, Mode::Implicit, 1, 2, false));
    t[0x98] = Some(op(Instr::Tya, Mode::Implicit, 1, 2, false));
    t[0xBA] = Some(op(Instr::Tsx, Mode::Implicit, 1, 2, false));
    t[0x9A] = Some(op(Instr::Txs, Mode::Implicit, 1, 2, false));

    // Stack
    t[0x48] = Some(op(Instr::Pha, Mode::Implicit, 1, 3, false));
    t[0x08] = Some(op(Instr::Php, Mode::Implicit, 1, 3, false));
    t[0x68] = Some(op(Instr::Pla, Mode::Implicit, 1, 4, false));
    t[0x28] = Some(op(Instr::Plp, Mode::Implicit, 1, 4, false));

    // AND
    t[0x29] = Some(op(Instr::And, Mode::Immediate, 2, 2, false));
    t[0x25] = Some(op(Instr::And, Mode::ZeroPage, 2, 3, false));
    t[0x35] = Some(op(Instr::And, Mode::ZeroPageX, 2, 4, false));
    t[0x2D] = Some(op(Instr::And, Mode::Absolute, 3, 4, false));
    t[0x3D] = Some(op(Instr::And, Mode::AbsoluteX, 3, 4, true));
    t[0x39] = Some(op(Instr::And, Mode::AbsoluteY, 3, 4, true));
    t[0x21] = Some(op(Instr::And, Mode::PreIndexIndirect, 2, 6, false));
    t[0x31] = Some(op(Instr::And, Mode::PostIndexIndirect, 2, 5, true));

    // ORA
    t[0x09] = Some(op(Instr::Ora, Mode::Immediate, 2, 2, false));
    t[0x05] = Some(op(Instr::Ora, Mode::ZeroPage, 2, 3, false));
    t[0x15] = Some(op(Instr::Ora, Mode::ZeroPageX, 2, 4, false));
    t[0x0D] = Some(op(Instr::Ora, Mode::Absolute, 3, 4, false));
    t[0x1D] = Some(op(Instr::Ora, Mode::AbsoluteX, 3, 4, true));
    t[0x19] = Some(op(Instr::Ora, Mode::AbsoluteY, 3, 4, true));
    t[0x01] = Some(op(Instr::Ora, Mode::PreIndexIndirect, 2, 6, false));
    t[0x11] = Some(op(Instr::Ora, Mode::PostIndexIndirect, 2, 5, true));

    // EOR
    t[0x49] = Some(op(Instr::Eor, Mode::Immediate, 2, 2, false));
    t[0x45] = Some(op(Instr::Eor, Mode::ZeroPage, 2, 3, false));
    t[0x55] = Some(op(Instr::Eor, Mode::ZeroPageX, 2, 4, false));
    t[0x4D] = Some(op(Instr::Eor, Mode::Absolute, 3, 4, false));
    t[0x5D] = Some(op(Instr::Eor, Mode::AbsoluteX, 3, 4, true));
    t[0x59] = Some(op(Instr::Eor, Mode::AbsoluteY, 3, 4, true));
    t[0x41] = Some(op(Instr::Eor, Mode::PreIndexIndirect, 2, 6, false));
    t[0x51] = Some(op(Instr::Eor, Mode::PostIndexIndirect, 2, 5, true));

    // BIT
    t[0x24] = Some(op(Instr::Bit, Mode::ZeroPage, 2, 3, false));
    t[0x2C] = Some(op(Instr::Bit, Mode::Absolute, 3, 4, false));

    // ADC
    t[0x69] = Some(op(Instr::Adc, Mode::Immediate, 2, 2, false));
    t[0x65] = Some(op(Instr::Adc, Mode::ZeroPage, 2, 3, false));
    t[0x75] = Some(op(Instr::Adc, Mode::ZeroPageX, 2, 4, false));
    t[0x6D] = Some(op(Instr::Adc, Mode::Absolute, 3, 4, false));
    t[0x7D] = Some(op(Instr::Adc, Mode::AbsoluteX, 3, 4, true));
    t[0x79] = Some(op(Instr::Adc, Mode::AbsoluteY, 3, 4, true));
    t[0x61] = Some(op(Instr::Adc, Mode::PreIndexIndirect, 2, 6, false));
    t[0x71] = Some(op(Instr::Adc, Mode::PostIndexIndirect, 2, 5, true));

    // SBC
    t[0xE9] = Some(op(Instr::Sbc, Mode::Immediate, 2, 2, false));
    t[0xE5] = Some(op(Instr::Sbc, Mode::ZeroPage, 2, 3, false));
    t[0xF5] = Some(op(Instr::Sbc, Mode::ZeroPageX, 2, 4, false));
    t[0xED] = Some(op(Instr::Sbc, Mode::Absolute, 3, 4, false));
    t[0xFD] = Some(op(Instr::Sbc, Mode::AbsoluteX, 3, 4, true));
    t[0xF9] = Some(op(Instr::Sbc, Mode::AbsoluteY, 3, 4, true));
    t[0xE1] = Some(op(Instr::Sbc, Mode::PreIndexIndirect, 2, 6, false));
    t[0xF1] = Some(op(Instr::Sbc, Mode::PostIndexIndirect, 2, 5, true));

    // INC / DEC and register increment/decrement
    t[0xE6] = Some(op(Instr::Inc, Mode::ZeroPage, 2, 5, false));
    t[0xF6] = Some(op(Instr::Inc, Mode::ZeroPageX, 2, 6, false));
    t[0xEE] = Some(op(Instr::Inc, Mode::Absolute, 3, 6, false));
    t[0xFE] = Some(op(Instr::Inc, Mode::AbsoluteX, 3, 7, false));
    t[0xE8] = Some(op(Instr::Inx, Mode::Implicit, 1, 2, false));
    t[0xC8] = Some(op(Instr::Iny, Mode::Implicit, 1, 2, false));
    t[0xC6] = Some(op(Instr::Dec, Mode::ZeroPage, 2, 5, false));
    t[0xD6] = Some(op(Instr::Dec, Mode::ZeroPageX, 2, 6, false));
    t[0xCE] = Some(op(Instr::Dec, Mode::Absolute, 3, 6, false));
    t[0xDE] = Some(op(Instr::Dec, Mode::AbsoluteX, 3, 7, false));
    t[0xCA] = Some(op(Instr::Dex, Mode::Implicit, 1, 2, false));
    t[0x88] = Some(op(Instr::Dey, Mode::Implicit, 1, 2, false));

    // Shifts / rotates
    t[0x0A] = Some(op(Instr::Asl, Mode::Accumulator, 1, 2, false));
    t[0x06] = Some(op(Instr::Asl, Mode::ZeroPage, 2, 5, false));
    t[0x16] = Some(op(Instr::Asl, Mode::ZeroPageX, 2, 6, false));
    t[0x0E] = Some(op(Instr::Asl, Mode::Absolute, 3, 6, false));
    t[0x1E] = Some(op(Instr::Asl, Mode::AbsoluteX, 3, 7, false));
    t[0x4A] = Some(op(Instr::Lsr, Mode::Accumulator, 1, 2, false));
    t[0x46] = Some(op(Instr::Lsr, Mode::ZeroPage, 2, 5, false));
    t[0x56] = Some(op(Instr::Lsr, Mode::ZeroPageX, 2, 6, false));
    t[0x4E] = Some(op(Instr::Lsr, Mode::Absolute, 3, 6, false));
    t[0x5E] = Some(op(Instr::Lsr, Mode::AbsoluteX, 3, 7, false));
    t[0x2A] = Some(op(Instr::Rol, Mode::Accumulator, 1, 2, false));
    t[0x26] = Some(op(Instr::Rol, Mode::ZeroPage, 2, 5, false));
    t[0x36] = Some(op(Instr::Rol, Mode::ZeroPageX, 2, 6, false));
    t[0x2E] = Some(op(Instr::Rol, Mode::Absolute, 3, 6, false));
    t[0x3E] = Some(op(Instr::Rol, Mode::AbsoluteX, 3, 7, false));
    t[0x6A] = Some(op(Instr::Ror, Mode::Accumulator, 1, 2, false));
    t[0x66] = Some(op(Instr::Ror, Mode::ZeroPage, 2, 5, false));
    t[0x76] = Some(op(Instr::Ror, Mode::ZeroPageX, 2, 6, false));
    t[0x6E] = Some(op(Instr::Ror, Mode::Absolute, 3, 6, false));
    t[0x7E] = Some(op(Instr::Ror, Mode::AbsoluteX, 3, 7, false));

    // Compares
    t[0xC9] = Some(op(Instr::Cmp, Mode::Immediate, 2, 2, false));
    t[0xC5] = Some(op(Instr::Cmp, Mode::ZeroPage, 2, 3, false));
    t[0xD5] = Some(op(Instr::Cmp, Mode::ZeroPageX, 2, 4, false));
    t[0xCD] = Some(op(Instr::Cmp, Mode::Absolute, 3, 4, false));
    t[0xDD] = Some(op(Instr::Cmp, Mode::AbsoluteX, 3, 4, true));
    t[0xD9] = Some(op(Instr::Cmp, Mode::AbsoluteY, 3, 4, true));
    t[0xC1] = Some(op(Instr::Cmp, Mode::PreIndexIndirect, 2, 6, false));
    t[0xD1] = Some(op(Instr::Cmp, Mode::PostIndexIndirect, 2, 5, true));
    t[0xE0] = Some(op(Instr::Cpx, Mode::Immediate, 2, 2, false));
    t[0xE4] = Some(op(Instr::Cpx, Mode::ZeroPage, 2, 3, false));
    t[0xEC] = Some(op(Instr::Cpx, Mode::Absolute, 3, 4, false));
    t[0xC0] = Some(op(Instr::Cpy, Mode::Immediate, 2, 2, false));
    t[0xC4] = Some(op(Instr::Cpy, Mode::ZeroPage, 2, 3, false));
    t[0xCC] = Some(op(Instr::Cpy, Mode::Absolute, 3, 4, false));

    // Branches (the +1 taken / +1 page-cross cycles are accounted for in
    // execute::step, not here, since they depend on the runtime outcome).
    t[0x90] = Some(op(Instr::Bcc, Mode::Relative, 2, 2, false));
    t[0xB0] = Some(op(Instr::Bcs, Mode::Relative, 2, 2, false));
    t[0xF0] = Some(op(Instr::Beq, Mode::Relative, 2, 2, false));
    t[0xD0] = Some(op(Instr::Bne, Mode::Relative, 2, 2, false));
    t[0x30] = Some(op(Instr::Bmi, Mode::Relative, 2, 2, false));
    t[0x10] = Some(op(Instr::Bpl, Mode::Relative, 2, 2, false));
    t[0x50] = Some(op(Instr::Bvc, Mode::Relative, 2, 2, false));
    t[0x70] = Some(op(Instr::Bvs, Mode::Relative, 2, 2, false));

    // Jumps / subroutines / interrupts
    t[0x4C] = Some(op(Instr::Jmp, Mode::Absolute, 3, 3, false));
    t[0x6C] = Some(op(Instr::Jmp, Mode::Indirect, 3, 5, false));
    t[0x20] = Some(op(Instr::Jsr, Mode::Absolute, 3, 6, false));
    t[0x60] = Some(op(Instr::Rts, Mode::Implicit, 1, 6, false));
    // BRK is a 2-byte instruction: the byte after the opcode is a padding
    // signature byte that's never read, but still counts toward the pushed
    // return address.
    t[0x00] = Some(op(Instr::Brk, Mode::Implicit, 2, 7, false));
    t[0x40] = Some(op(Instr::Rti, Mode::Implicit, 1, 6, false));

    // Flag instructions
    t[0x18] = Some(op(Instr::Clc, Mode::Implicit, 1, 2, false));
    t[0x38] = Some(op(Instr::Sec, Mode::Implicit, 1, 2, false));
    t[0x58] = Some(op(Instr::Cli, Mode::Implicit, 1, 2, false));
    t[0x78] = Some(op(Instr::Sei, Mode::Implicit, 1, 2, false));
    t[0xD8] = Some(op(Instr::Cld, Mode::Implicit, 1, 2, false));
    t[0xF8] = Some(op(Instr::Sed, Mode::Implicit, 1, 2, false));
    t[0xB8] = Some(op(Instr::Clv, Mode::Implicit, 1, 2, false));

    t[0xEA] = Some(op(Instr::Nop, Mode::Implicit, 1, 2, false));

    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lda_immediate_is_two_bytes_two_cycles() {
        let info = OPCODE_TABLE[0xA9].unwrap();
        assert_eq!(info.instr, Instr::Lda);
        assert_eq!(info.mode, Mode::Immediate);
        assert_eq!(info.bytes, 2);
        assert_eq!(info.cycles, 2);
    }

    #[test]
    fn unmapped_opcode_is_none() {
        assert!(OPCODE_TABLE[0x02].is_none());
        assert!(OPCODE_TABLE[0xFF].is_none());
    }

    #[test]
    fn sta_absolute_x_never_sets_page_cross_extra() {
        let info = OPCODE_TABLE[0x9D].unwrap();
        assert_eq!(info.instr, Instr::Sta);
        assert!(!info.page_cross_extra);
    }

    #[test]
    fn brk_is_two_bytes() {
        let info = OPCODE_TABLE[0x00].unwrap();
        assert_eq!(info.bytes, 2);
    }
}
