// CPU module - 6502 processor implementation

pub mod addressing;
pub mod execute;
pub mod instructions;
pub mod opcodes;

use crate::bus::Bus;
use crate::error::EmulationError;

/// Processor Status Flags (P register)
///
/// Bit layout:
/// ```text
/// 7  6  5  4  3  2  1  0
/// N  V  -  B  D  I  Z  C
/// ```
///
/// - N: Negative flag (bit 7)
/// - V: Overflow flag (bit 6)
/// - -: Unused flag (bit 5, always 1)
/// - B: Break command flag (bit 4)
/// - D: Decimal mode flag (bit 3, unused — decimal arithmetic is not modeled)
/// - I: Interrupt disable flag (bit 2)
/// - Z: Zero flag (bit 1)
/// - C: Carry flag (bit 0)
pub mod flags {
    pub const CARRY: u8 = 0b0000_0001;
    pub const ZERO: u8 = 0b0000_0010;
    pub const INTERRUPT_DISABLE: u8 = 0b0000_0100;
    pub const DECIMAL: u8 = 0b0000_1000;
    pub const BREAK: u8 = 0b0001_0000;
    pub const UNUSED: u8 = 0b0010_0000;
    pub const OVERFLOW: u8 = 0b0100_0000;
    pub const NEGATIVE: u8 = 0b1000_0000;
}

/// Interrupt vector addresses.
pub mod vectors {
    /// NMI vector ($FFFA-$FFFB). Raised by the PPU at the start of VBlank.
    pub const NMI: u16 = 0xFFFA;
    /// RESET vector ($FFFC-$FFFD). Serviced once at startup.
    pub const RESET: u16 = 0xFFFC;
    /// IRQ/BRK vector ($FFFE-$FFFF). Shared between hardware IRQ and BRK.
    pub const IRQ: u16 = 0xFFFE;
}

/// The pending-interrupt slot.
///
/// `interrupt()` posts into this slot asynchronously; `tick()` drains it
/// lazily at the next instruction boundary. Posting is monotonic in
/// priority — an NMI already latched is never downgraded back to an IRQ by a
/// later maskable post (see DESIGN.md for why this departs from the
/// distilled source, which overwrites unconditionally).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingInterrupt {
    None,
    Irq,
    Nmi,
    Reset,
}

impl PendingInterrupt {
    fn priority(self) -> u8 {
        match self {
            PendingInterrupt::None => 0,
            PendingInterrupt::Irq => 1,
            PendingInterrupt::Nmi => 2,
            PendingInterrupt::Reset => 3,
        }
    }

    /// Combines an incoming post with what's already latched, keeping
    /// whichever has higher priority.
    fn post(self, incoming: PendingInterrupt) -> PendingInterrupt {
        if incoming.priority() >= self.priority() {
            incoming
        } else {
            self
        }
    }
}

/// CPU structure representing the 6502 processor state.
pub struct Cpu {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub cycles: u64,

    pending: PendingInterrupt,
    /// Cycles left to "idle" before the next instruction is decoded, giving
    /// `tick()` its one-call-per-cycle external contract over an
    /// instruction-granular interpreter.
    cycles_remaining: u8,
}

impl Cpu {
    /// Power-on state: A/X/Y cleared, SP = $FD, status = unused|I, and the
    /// pending-interrupt slot primed to RESET so the first `tick()` drives
    /// the CPU through the reset vector exactly like a real boot.
    pub fn new() -> Self {
        let mut cpu = Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: 0,
            cycles: 0,
            pending: PendingInterrupt::Reset,
            cycles_remaining: 0,
        };
        cpu.set_flag(flags::UNUSED);
        cpu.set_flag(flags::INTERRUPT_DISABLE);
        cpu
    }

    /// Re-latches a RESET into the pending-interrupt slot. Unlike IRQ/NMI,
    /// RESET always wins regardless of what's currently pending.
    pub fn reset(&mut self) {
        self.pending = PendingInterrupt::Reset;
        self.cycles_remaining = 0;
    }

    /// Posts an interrupt request asynchronously. `maskable = true` posts an
    /// IRQ (subject to the I flag and to NMI priority); `maskable = false`
    /// posts an NMI, which always wins.
    pub fn interrupt(&mut self, maskable: bool) {
        let incoming = if maskable {
            PendingInterrupt::Irq
        } else {
            PendingInterrupt::Nmi
        };
        self.pending = self.pending.post(incoming);
    }

    /// Advances the CPU by exactly one machine cycle.
    ///
    /// The first cycle of an instruction decodes and executes it, producing
    /// a cycle cost N; the following N-1 calls just tick the idle counter
    /// down. Returns `Ok(true)` to continue (there is no halt opcode) or an
    /// `Err` for a fatal configuration error (§7).
    pub fn tick(&mut self, bus: &mut Bus) -> Result<bool, EmulationError> {
        if self.cycles_remaining > 0 {
            self.cycles_remaining -= 1;
            self.cycles += 1;
            return Ok(true);
        }

        let cost = if self.pending != PendingInterrupt::None {
            self.service_pending_interrupt(bus)?
        } else {
            execute::step(self, bus)?
        };

        self.cycles_remaining = cost - 1;
        self.cycles += 1;
        Ok(true)
    }

    fn service_pending_interrupt(&mut self, bus: &mut Bus) -> Result<u8, EmulationError> {
        let pending = self.pending;
        if pending == PendingInterrupt::Irq && self.get_flag(flags::INTERRUPT_DISABLE) {
            // IRQ race while disabled: dropped silently, not an error.
            self.pending = PendingInterrupt::None;
            return execute::step(self, bus);
        }

        // RESET does not push: real hardware leaves the R/W line in read
        // mode during its three phantom stack cycles, and the power-on SP of
        // $FD already reflects that net effect (see DESIGN.md). IRQ/NMI/BRK
        // go through the full push-then-jump sequence.
        if pending == PendingInterrupt::Reset {
            self.set_flag(flags::INTERRUPT_DISABLE);
            self.pc = read_u16(bus, vectors::RESET);
            self.pending = PendingInterrupt::None;
            return Ok(7);
        }

        let vector = match pending {
            PendingInterrupt::Irq => vectors::IRQ,
            PendingInterrupt::Nmi => vectors::NMI,
            PendingInterrupt::Reset | PendingInterrupt::None => unreachable!("guarded above"),
        };

        self.push_u16(bus, self.pc)?;
        let pushed_status = (self.status | flags::UNUSED) & !flags::BREAK;
        self.push_u8(bus, pushed_status)?;
        self.set_flag(flags::INTERRUPT_DISABLE);
        self.pc = read_u16(bus, vector);
        self.pending = PendingInterrupt::None;
        Ok(7)
    }

    /// True when the next `tick()` will decode a new instruction rather
    /// than idle through a pending cycle. Exposed for callers (benchmarks,
    /// a driver wanting to align work to instruction boundaries) that need
    /// to tick a whole instruction at a time over the one-cycle-per-call
    /// contract.
    pub fn at_instruction_boundary(&self) -> bool {
        self.cycles_remaining == 0
    }

    // ---- flag helpers ----

    pub fn get_flag(&self, mask: u8) -> bool {
        self.status & mask != 0
    }

    pub fn set_flag(&mut self, mask: u8) {
        self.status |= mask;
    }

    pub fn clear_flag(&mut self, mask: u8) {
        self.status &= !mask;
    }

    pub fn update_flag(&mut self, mask: u8, condition: bool) {
        if condition {
            self.set_flag(mask);
        } else {
            self.clear_flag(mask);
        }
    }

    /// Sets Z and N from the low 8 bits of `value`, per the Z/N update rule
    /// that applies after every arithmetic or load into A/X/Y.
    pub fn update_zero_and_negative_flags(&mut self, value: u8) {
        self.update_flag(flags::ZERO, value == 0);
        self.update_flag(flags::NEGATIVE, value & 0x80 != 0);
    }

    // ---- stack ----

    /// Pushes a byte at $0100+S, then decrements S (wrapping). A push while
    /// S is already $00 is a fatal stack overflow (§7) rather than a silent
    /// wrap: no supported program legitimately exhausts the stack.
    pub fn push_u8(&mut self, bus: &mut Bus, value: u8) -> Result<(), EmulationError> {
        if self.sp == 0x00 {
            return Err(EmulationError::StackOverflow);
        }
        bus.write(0x0100 + self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
        Ok(())
    }

    /// Increments S (wrapping), then reads at $0100+S. A pull while S is
    /// already $FF is a fatal stack underflow (§7).
    pub fn pull_u8(&mut self, bus: &Bus) -> Result<u8, EmulationError> {
        if self.sp == 0xFF {
            return Err(EmulationError::StackUnderflow);
        }
        self.sp = self.sp.wrapping_add(1);
        Ok(bus.read(0x0100 + self.sp as u16))
    }

    pub(crate) fn push_u16(&mut self, bus: &mut Bus, value: u16) -> Result<(), EmulationError> {
        self.push_u8(bus, (value >> 8) as u8)?;
        self.push_u8(bus, (value & 0xFF) as u8)
    }

    pub fn pull_u16(&mut self, bus: &Bus) -> Result<u16, EmulationError> {
        let lo = self.pull_u8(bus)? as u16;
        let hi = self.pull_u8(bus)? as u16;
        Ok((hi << 8) | lo)
    }
}

pub(crate) fn read_u16(bus: &Bus, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi = bus.read(addr.wrapping_add(1)) as u16;
    (hi << 8) | lo
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
