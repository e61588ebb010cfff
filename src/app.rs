use std::sync::Arc;

use instant::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::animator::Animator;
use crate::render::texture::SpriteImage;
use crate::render::{FrameStatus, GpuState};

const WINDOW_TITLE: &str = "huebounce";
const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
/// Sprite image, relative to the working directory.
const TEXTURE_PATH: &str = "HelloKitty.png";
/// How often to log FPS (seconds).
const FPS_LOG_INTERVAL: f64 = 5.0;

// ---------------------------------------------------------------------------
// Frame timing
// ---------------------------------------------------------------------------

/// Rolling frame-time window, logged every `FPS_LOG_INTERVAL`.
struct FrameStats {
    window_start: Instant,
    frame_time_sum: f64,
    frame_time_min: f64,
    frame_time_max: f64,
    frames_since_log: u32,
}

impl FrameStats {
    fn new() -> Self {
        Self {
            window_start: Instant::now(),
            frame_time_sum: 0.0,
            frame_time_min: f64::MAX,
            frame_time_max: 0.0,
            frames_since_log: 0,
        }
    }

    fn record_frame(&mut self, dt: f64) {
        self.frames_since_log += 1;
        self.frame_time_sum += dt;
        self.frame_time_min = self.frame_time_min.min(dt);
        self.frame_time_max = self.frame_time_max.max(dt);

        let elapsed = self.window_start.elapsed().as_secs_f64();
        if elapsed < FPS_LOG_INTERVAL {
            return;
        }

        let frames = self.frames_since_log as f64;
        log::info!(
            "{:.0} fps, frame {:.2}/{:.2}/{:.2} ms (min/avg/max)",
            frames / elapsed,
            self.frame_time_min * 1000.0,
            self.frame_time_sum / frames * 1000.0,
            self.frame_time_max * 1000.0,
        );
        *self = Self::new();
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Top-level application state.
struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,

    animator: Animator,

    // Time is measured from loop start, so the first frame's delta
    // covers window and GPU setup.
    last_frame_time: Instant,

    frame_stats: FrameStats,

    // Setup failure surfaced from inside the event loop
    error: Option<anyhow::Error>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            gpu: None,
            animator: Animator::default(),
            last_frame_time: Instant::now(),
            frame_stats: FrameStats::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        log::info!("Window created: {}x{}", size.width, size.height);

        log::info!("Bounce bounds: {:?}", self.animator.bounds());

        let sprite = SpriteImage::load_or_fallback(TEXTURE_PATH);

        let gpu = GpuState::new(window.clone(), sprite)?;
        self.gpu = Some(gpu);
        log::info!("wgpu + sprite pipeline initialized");

        // Continuous render loop
        event_loop.set_control_flow(ControlFlow::Poll);

        self.window = Some(window);
        Ok(())
    }

    /// Advance the animation and draw one frame.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame_time).as_secs_f64();
        self.last_frame_time = now;

        self.frame_stats.record_frame(dt);
        self.animator.tick(dt as f32);
        log::trace!("dt={dt:.4} state={:?}", self.animator.state());

        let Some(gpu) = &self.gpu else {
            return;
        };
        if gpu.render_frame(self.animator.offset(), self.animator.clear_color())
            == FrameStatus::Fatal
        {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                log::info!("ESC pressed, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    log::info!("Resized to {}x{}", new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            _ => {}
        }
    }
}

/// Entry point: create event loop and run.
pub fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_stats_track_window_extremes() {
        let mut stats = FrameStats::new();
        for dt in [0.016, 0.002, 0.050, 0.020] {
            stats.record_frame(dt);
        }
        assert_eq!(stats.frames_since_log, 4);
        assert_eq!(stats.frame_time_min, 0.002);
        assert_eq!(stats.frame_time_max, 0.050);
    }
}
