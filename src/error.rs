// Error types for the emulator core.
//
// Fatal configuration errors (bad ROM headers, unknown opcodes, stack
// exhaustion, bus misconfiguration) are represented here and propagated with
// `?` rather than panicking. Ignored-by-design conditions (unmapped register
// reads, writes to read-only registers) are not errors at all and never reach
// this type — see the PPU and bus modules for that handling.

use thiserror::Error;

/// Every fatal error the emulation core can raise.
///
/// The driver's outer loop is the only place that turns one of these into a
/// logged diagnostic and a process exit; library code always returns it
/// through `Result`.
#[derive(Debug, Error)]
pub enum EmulationError {
    #[error("unknown opcode ${opcode:02X} at PC=${pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },

    #[error("stack overflow: push with S already at $00")]
    StackOverflow,

    #[error("stack underflow: pull with S already at $FF")]
    StackUnderflow,

    #[error("bus read/write of {len} bytes starting at ${start:04X} crosses a device boundary")]
    DeviceBoundaryCrossed { start: u16, len: usize },

    #[error("8x16 sprite mode is not supported")]
    UnsupportedSpriteMode,

    #[error(transparent)]
    Cartridge(#[from] CartridgeError),
}

/// Errors raised while parsing or loading an iNES cartridge image.
///
/// Paths are stored pre-rendered (`path.display().to_string()`) so the
/// `#[error(...)]` strings below can interpolate them directly.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("{path}: missing \"NES\\x1A\" magic in header")]
    BadHeader { path: String },

    #[error("{path}: file length {actual} does not match header (expected {expected} = 16 + {prg}*16KiB + {chr}*8KiB)")]
    WrongFileSize {
        path: String,
        actual: usize,
        expected: usize,
        prg: u8,
        chr: u8,
    },

    #[error("{path}: trainer-equipped ROMs are not supported")]
    TrainerUnsupported { path: String },

    #[error("{path}: mapper {mapper} is not supported (only mapper 0 / NROM)")]
    UnsupportedMapper { path: String, mapper: u8 },

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
