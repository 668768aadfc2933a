// NES Emulator - Main Entry Point

use nes_rs::display::{run_emulator, WindowConfig};
use nes_rs::emulator::EmulatorConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(rom_path) = std::env::args().nth(1) else {
        eprintln!("usage: nes-rs <path-to-rom.nes>");
        std::process::exit(1);
    };

    let settings = EmulatorConfig::load_or_default();
    let window_config = WindowConfig::new()
        .with_scale(settings.video.scale)
        .with_fps(settings.video.fps)
        .with_vsync(settings.video.vsync);

    run_emulator(window_config, rom_path)
}
