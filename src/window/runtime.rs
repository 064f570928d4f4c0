use anyhow::{anyhow, Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::render::TriangleRenderer;

/// Window/runtime configuration. Compile-time constants for this program;
/// there is no CLI or environment surface.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Hello Triangle".to_string(),
            size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Loop lifecycle. `Closing` is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Lifecycle {
    Running,
    Closing,
}

impl Lifecycle {
    /// The only transition: a close request ends the loop.
    pub fn close_requested(self) -> Self {
        Lifecycle::Closing
    }

    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs the program to completion: setup, render loop, teardown.
    ///
    /// Any setup failure (event loop, window, GPU, shader build) is returned
    /// to the caller; nothing past the failing step is attempted.
    pub fn run(config: RuntimeConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        // Setup errors happen inside `resumed`, which cannot return them.
        match state.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Window and its GPU context. The surface borrows the window, so the two
/// live in one self-referencing entry; drop order releases GPU objects
/// before the window.
#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState {
    config: RuntimeConfig,

    entry: Option<WindowEntry>,
    renderer: Option<TriangleRenderer>,

    lifecycle: Lifecycle,
    fatal: Option<anyhow::Error>,
    frame_index: u64,
}

impl AppState {
    fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            entry: None,
            renderer: None,
            lifecycle: Lifecycle::Running,
            fatal: None,
            frame_index: 0,
        }
    }

    /// Window + GPU context + renderer, in dependency order.
    fn bootstrap(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size)
            .with_resizable(false);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, GpuInit::default())),
        }
        .try_build()
        .context("failed to initialize GPU context")?;

        let renderer = entry
            .with_gpu(|gpu| TriangleRenderer::new(gpu.device(), gpu.surface_format()))
            .context("failed to build triangle renderer")?;

        self.entry = Some(entry);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.lifecycle = self.lifecycle.close_requested();
        event_loop.exit();
    }

    /// Tears down in the fixed order: renderer resources, GPU context,
    /// window. The event loop itself exits when the handler returns.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.lifecycle = self.lifecycle.close_requested();
        self.renderer = None;
        self.entry = None;
        event_loop.exit();
        log::info!("shutting down after {} frames", self.frame_index);
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(renderer)) = (self.entry.as_mut(), self.renderer.as_ref()) else {
            return;
        };

        match entry.with_gpu(|gpu| gpu.begin_frame()) {
            Ok(mut frame) => {
                renderer.draw(&mut frame.encoder, &frame.view);
                entry.with_gpu(|gpu| gpu.submit(frame));
                self.frame_index += 1;
            }
            Err(err) => match entry.with_gpu_mut(|gpu| gpu.handle_surface_error(err)) {
                SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {}
                SurfaceErrorAction::Fatal => {
                    self.fail(event_loop, anyhow!("surface ran out of memory"));
                }
            },
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        if let Err(err) = self.bootstrap(event_loop) {
            self.fail(event_loop, err);
            return;
        }

        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.lifecycle.is_running() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw; pacing comes from the surface present mode.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.lifecycle.is_running() {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_window_contract() {
        let config = RuntimeConfig::default();
        assert_eq!(config.title, "Hello Triangle");
        assert_eq!(config.size.width, 800.0);
        assert_eq!(config.size.height, 600.0);
    }

    #[test]
    fn close_request_ends_the_loop() {
        let state = Lifecycle::Running;
        assert!(state.is_running());
        assert_eq!(state.close_requested(), Lifecycle::Closing);
    }

    #[test]
    fn closing_is_terminal() {
        let state = Lifecycle::Closing;
        assert!(!state.is_running());
        assert_eq!(state.close_requested(), Lifecycle::Closing);
    }
}
