// NES Emulator - Game Runner
//
// Opens a window and runs a ROM to completion.

use nes_rs::display::{run_emulator, WindowConfig};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <rom_path>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} game.nes", args[0]);
        eprintln!("  {} \"assets/JPA/Dragon Quest.nes\"", args[0]);
        std::process::exit(1);
    }

    let rom_path = &args[1];
    let config = WindowConfig::new().with_scale(3).with_fps(60).with_vsync(true);
    run_emulator(config, rom_path)
}
