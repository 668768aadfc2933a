// Bare-metal demo: runs the classic "snake" 6502 program with no PPU and
// no cartridge at all, exercising the CPU core through `Bus::new_demo`
// directly against RAM plus the random-byte, keyboard-latch, and raw
// framebuffer devices it expects at $00FE/$00FF/$0200-$05FF.
//
// The program binary (32 KiB, $8000-$FFFF, RESET/IRQ/NMI vectors included
// at the end) is loaded as-is with no iNES header to parse.

use nes_rs::bus::Bus;
use nes_rs::cpu::Cpu;
use std::env;
use std::fs;

const PRG_LOAD_ADDR: u16 = 0x8000;
const SCRATCH_BASE: u16 = 0x4020;

fn print_display(frame: &[u8]) {
    for row in frame.chunks(32) {
        let line: String = row
            .iter()
            .map(|&b| if b == 0 { '.' } else { '#' })
            .collect();
        println!("{line}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Some(bin_path) = env::args().nth(1) else {
        eprintln!("usage: snake_demo <path-to-snake.bin> [key] [cycles]");
        eprintln!();
        eprintln!("  key     optional ascii key to publish on the input latch (default: none)");
        eprintln!("  cycles  how many CPU cycles to run (default: 100000)");
        std::process::exit(1);
    };
    let key = env::args().nth(2).and_then(|s| s.bytes().next());
    let cycles: u64 = env::args()
        .nth(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(100_000);

    let program = fs::read(&bin_path)?;
    println!("loaded {} bytes from {bin_path}", program.len());

    let mut bus = Bus::new_demo();
    bus.load_scratch(&program, PRG_LOAD_ADDR - SCRATCH_BASE);
    if let Some(key) = key {
        bus.input().set_key(key);
        println!("publishing key '{}' on the input latch", key as char);
    }

    let mut cpu = Cpu::new();
    while cpu.cycles < cycles {
        cpu.tick(&mut bus)?;
    }

    println!("ran {} cycles, PC=${:04X}", cpu.cycles, cpu.pc);
    println!();
    println!("framebuffer ($0200-$05FF):");
    let display = bus.display().expect("new_demo always wires a display");
    print_display(display.borrow().frame());

    Ok(())
}
