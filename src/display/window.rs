// Window module - Manages display window and rendering
//
// This module provides window creation, scaling, and frame rendering
// using the winit and pixels crates, and the real CPU+PPU driver loop
// that runs behind the window.

use super::framebuffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use super::integration::copy_ppu_to_display;
use crate::bus::Bus;
use crate::cartridge::Cartridge;
use crate::cpu::Cpu;
use pixels::{Pixels, SurfaceTexture};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

/// Window configuration
#[derive(Debug, Clone, Copy)]
pub struct WindowConfig {
    /// Scale factor (1x, 2x, 3x, 4x, etc.)
    pub scale: u32,
    /// Target frame rate in Hz (typically 60 for NTSC NES)
    pub target_fps: u32,
    /// Whether to enable VSync
    pub vsync: bool,
}

impl WindowConfig {
    /// Create a new window configuration with default values
    ///
    /// Default: 3x scale, 60 FPS, VSync enabled
    pub fn new() -> Self {
        Self {
            scale: 3,
            target_fps: 60,
            vsync: true,
        }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8); // Clamp between 1x and 8x
        self
    }

    /// Set the target frame rate
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    /// Set VSync enabled or disabled
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Get the window width in pixels
    pub fn window_width(&self) -> u32 {
        SCREEN_WIDTH as u32 * self.scale
    }

    /// Get the window height in pixels
    pub fn window_height(&self) -> u32 {
        SCREEN_HEIGHT as u32 * self.scale
    }

    /// Get the frame duration for the target FPS
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps as u64)
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Translates a winit key into the lowercase ASCII byte the input latch
/// expects, or `None` for keys the latch has no opinion about. Only the
/// fixed demo/controller key set {P,O,B,N,W,S,A,D} round-trips; anything
/// else is ignored rather than forwarded as garbage.
fn key_to_latch_byte(logical_key: &Key) -> Option<u8> {
    match logical_key {
        Key::Character(s) => {
            let byte = s.chars().next()?.to_ascii_lowercase() as u8;
            matches!(byte, b'p' | b'o' | b'b' | b'n' | b'w' | b's' | b'a' | b'd').then_some(byte)
        }
        Key::Named(NamedKey::ArrowUp) => Some(b'w'),
        Key::Named(NamedKey::ArrowDown) => Some(b's'),
        Key::Named(NamedKey::ArrowLeft) => Some(b'a'),
        Key::Named(NamedKey::ArrowRight) => Some(b'd'),
        _ => None,
    }
}

/// Owns the CPU, Bus, and PPU for a loaded cartridge and drives them behind
/// a winit window. Each redraw runs one CPU tick followed by three PPU
/// ticks (the PPU's documented 3x-CPU-clock ratio) until the PPU reports a
/// completed frame, then presents it; an NMI request from the PPU is
/// delivered to the CPU the same tick it's raised.
///
/// Everything here runs on a single thread: `Bus` holds `Rc<RefCell<_>>`
/// internals shared between the PPU and its mapper, which are not `Send`.
/// See the input-latch/frame-presentation design note in `DESIGN.md` for
/// why this crate doesn't split CPU/input/render across OS threads.
pub struct EmulatorDisplayWindow {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    config: WindowConfig,
    cpu: Cpu,
    bus: Bus,
    frame_buffer: FrameBuffer,
    last_frame_time: Instant,
    paused: bool,
}

impl EmulatorDisplayWindow {
    /// Loads `rom_path` and builds a window ready to drive it.
    pub fn load<P: AsRef<Path>>(
        config: WindowConfig,
        rom_path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let cartridge = Cartridge::from_ines_file(rom_path.as_ref())?;
        info!(path = %rom_path.as_ref().display(), mapper = cartridge.mapper, "loaded cartridge");

        let mut bus = Bus::new_nes(cartridge);
        let mut cpu = Cpu::new();
        // Services the pending Reset interrupt posted by Cpu::new(), jumping
        // to the reset vector before the first frame is ticked.
        cpu.tick(&mut bus)?;

        Ok(Self {
            window: None,
            pixels: None,
            config,
            cpu,
            bus,
            frame_buffer: FrameBuffer::new(),
            last_frame_time: Instant::now(),
            paused: false,
        })
    }

    /// Runs CPU and PPU ticks until a frame is ready, or a fatal emulation
    /// error occurs (in which case the window closes rather than crash).
    fn advance_to_next_frame(&mut self, event_loop: &ActiveEventLoop) {
        if self.paused {
            return;
        }
        loop {
            match self.cpu.tick(&mut self.bus) {
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "CPU fault, stopping emulation");
                    event_loop.exit();
                    return;
                }
            }

            let Some(ppu_cell) = self.bus.ppu() else {
                return;
            };
            let mut frame_ready = false;
            for _ in 0..3 {
                match ppu_cell.borrow_mut().tick() {
                    Ok(result) => {
                        if result.nmi_requested {
                            self.cpu.interrupt(false);
                        }
                        frame_ready |= result.frame_ready;
                    }
                    Err(err) => {
                        warn!(%err, "PPU fault, stopping emulation");
                        event_loop.exit();
                        return;
                    }
                }
            }

            if frame_ready {
                copy_ppu_to_display(ppu_cell.borrow().frame(), &mut self.frame_buffer);
                return;
            }
        }
    }

    fn render(&mut self) -> Result<(), pixels::Error> {
        if let Some(pixels) = &mut self.pixels {
            let frame = pixels.frame_mut();
            self.frame_buffer.to_rgba(frame);
            pixels.render()?;
        }
        Ok(())
    }

    fn should_render_frame(&mut self) -> bool {
        let elapsed = self.last_frame_time.elapsed();
        if elapsed >= self.config.frame_duration() {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }
}

impl ApplicationHandler for EmulatorDisplayWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(format!(
                "nes-rs - {}x{}",
                self.config.window_width(),
                self.config.window_height()
            ))
            .with_inner_size(LogicalSize::new(
                self.config.window_width(),
                self.config.window_height(),
            ))
            .with_resizable(false);

        let window = event_loop
            .create_window(window_attributes)
            .expect("Failed to create window");
        let window = Arc::new(window);
        let window_size = window.inner_size();

        let surface_texture =
            SurfaceTexture::new(window_size.width, window_size.height, window.clone());
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, surface_texture)
            .expect("Failed to create pixel buffer");

        self.window = Some(window);
        self.pixels = Some(pixels);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(byte) = key_to_latch_byte(&logical_key) {
                    match state {
                        ElementState::Pressed => {
                            debug!(key = byte as char, "input latch set");
                            self.bus.input().set_key(byte);
                        }
                        ElementState::Released => {
                            if self.bus.input().key() == byte {
                                self.bus.input().set_key(0);
                            }
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if self.should_render_frame() {
                    self.advance_to_next_frame(event_loop);
                    if let Err(err) = self.render() {
                        warn!(%err, "render error, exiting");
                        event_loop.exit();
                    }
                }

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Loads `rom_path` and runs it to completion (until the window closes or
/// emulation faults).
pub fn run_emulator<P: AsRef<Path>>(
    config: WindowConfig,
    rom_path: P,
) -> Result<(), Box<dyn std::error::Error>> {
    let rom_path: PathBuf = rom_path.as_ref().to_path_buf();
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(if config.vsync {
        ControlFlow::Wait
    } else {
        ControlFlow::Poll
    });

    let mut display = EmulatorDisplayWindow::load(config, &rom_path)?;
    info!(
        width = config.window_width(),
        height = config.window_height(),
        fps = config.target_fps,
        "starting emulator window"
    );

    event_loop.run_app(&mut display)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_config_defaults() {
        let config = WindowConfig::new();
        assert_eq!(config.scale, 3);
        assert_eq!(config.target_fps, 60);
        assert!(config.vsync);
    }

    #[test]
    fn test_window_config_builder() {
        let config = WindowConfig::new()
            .with_scale(2)
            .with_fps(30)
            .with_vsync(false);

        assert_eq!(config.scale, 2);
        assert_eq!(config.target_fps, 30);
        assert!(!config.vsync);
    }

    #[test]
    fn test_window_dimensions() {
        let config = WindowConfig::new().with_scale(2);
        assert_eq!(config.window_width(), 512);
        assert_eq!(config.window_height(), 480);
    }

    #[test]
    fn test_frame_duration() {
        let config = WindowConfig::new().with_fps(60);
        let duration = config.frame_duration();
        assert_eq!(duration.as_micros(), 16666); // ~16.67ms for 60 FPS
    }

    #[test]
    fn test_scale_clamping() {
        let config = WindowConfig::new().with_scale(100);
        assert_eq!(config.scale, 8); // Should be clamped to max 8x

        let config = WindowConfig::new().with_scale(0);
        assert_eq!(config.scale, 1); // Should be clamped to min 1x
    }

    #[test]
    fn key_to_latch_byte_maps_demo_key_set_and_arrows() {
        assert_eq!(key_to_latch_byte(&Key::Character("p".into())), Some(b'p'));
        assert_eq!(key_to_latch_byte(&Key::Character("P".into())), Some(b'p'));
        assert_eq!(key_to_latch_byte(&Key::Named(NamedKey::ArrowUp)), Some(b'w'));
        assert_eq!(key_to_latch_byte(&Key::Character("q".into())), None);
    }

    #[test]
    fn loading_a_bad_path_errors_instead_of_panicking() {
        let result = EmulatorDisplayWindow::load(WindowConfig::new(), "/nonexistent/rom.nes");
        assert!(result.is_err());
    }
}
