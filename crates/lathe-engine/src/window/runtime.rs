use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::config::{Configuration, WindowMode};
use crate::core::{SurfaceCreationError, SurfaceFactory};
use crate::device::{GpuInit, WgpuBackend};
use crate::logging::TARGET_ADVISORY;

use super::host::{Host, HostEvent};
use super::icon::load_icon;

/// Pumps used to wait for the platform to hand out the window.
const WINDOW_CREATE_PUMPS: usize = 100;

/// winit-backed host.
///
/// Owns the winit `EventLoop` and pumps it from the shell's loop with
/// `pump_app_events`, so the frame loop stays in control of ordering.
pub struct WinitHost {
    event_loop: EventLoop<()>,
    handler: HostHandler,
}

impl WinitHost {
    pub fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            handler: HostHandler::default(),
        })
    }

    fn pump(&mut self, timeout: Duration) -> PumpStatus {
        self.event_loop
            .pump_app_events(Some(timeout), &mut self.handler)
    }

    fn open_window(&mut self, config: &Configuration) -> Result<Arc<Window>, SurfaceCreationError> {
        self.handler.request = Some(window_attributes(config));

        for _ in 0..WINDOW_CREATE_PUMPS {
            if let PumpStatus::Exit(code) = self.pump(Duration::from_millis(10)) {
                return Err(anyhow::anyhow!("event loop exited ({code}) before the window opened").into());
            }
            if let Some(err) = self.handler.create_error.take() {
                return Err(anyhow::anyhow!("failed to create window: {err}").into());
            }
            if let Some(window) = self.handler.window.as_ref() {
                return Ok(window.clone());
            }
        }

        Err(anyhow::anyhow!("platform did not provide a window").into())
    }
}

impl SurfaceFactory for WinitHost {
    type Backend = WgpuBackend;

    fn create_surface(
        &mut self,
        config: &Configuration,
    ) -> Result<WgpuBackend, SurfaceCreationError> {
        let window = self.open_window(config)?;

        if let Some(path) = config.icon.as_deref() {
            match load_icon(path) {
                Ok(icon) => window.set_window_icon(Some(icon)),
                Err(e) => log::warn!(target: TARGET_ADVISORY, "failed to load icon: {e:#}"),
            }
        }

        pollster::block_on(WgpuBackend::new(window, GpuInit::from_config(config)))
    }
}

impl Host for WinitHost {
    fn pump_events(&mut self) -> Vec<HostEvent> {
        if let PumpStatus::Exit(code) = self.pump(Duration::ZERO) {
            log::debug!("event loop exited with code {code}");
            self.handler.events.push(HostEvent::CloseRequested);
        }
        std::mem::take(&mut self.handler.events)
    }

    fn release(&mut self) {
        if self.handler.window.take().is_some() {
            // Let the platform process the close.
            let _ = self.pump(Duration::ZERO);
            log::debug!("window released");
        }
    }
}

#[derive(Default)]
struct HostHandler {
    request: Option<WindowAttributes>,
    window: Option<Arc<Window>>,
    create_error: Option<String>,
    events: Vec<HostEvent>,
}

impl HostHandler {
    fn create_requested(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.request.take() else { return };

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.create_error = Some(e.to_string()),
        }
    }

    fn is_ours(&self, id: WindowId) -> bool {
        self.window.as_ref().is_some_and(|w| w.id() == id)
    }
}

impl ApplicationHandler for HostHandler {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        self.create_requested(event_loop);
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_requested(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if !self.is_ours(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.events.push(HostEvent::CloseRequested);
            }

            WindowEvent::Resized(size) => self.events.push(resized(size)),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = self.window.as_ref() {
                    self.events.push(resized(window.inner_size()));
                }
            }

            _ => {}
        }
    }
}

fn resized(size: PhysicalSize<u32>) -> HostEvent {
    HostEvent::Resized {
        width: size.width,
        height: size.height,
    }
}

fn window_attributes(config: &Configuration) -> WindowAttributes {
    let mode = WindowMode::resolve(config);
    let attrs = Window::default_attributes()
        .with_title(config.title.clone())
        .with_inner_size(PhysicalSize::new(config.width, config.height))
        .with_decorations(mode.decorated());

    match mode {
        WindowMode::Fullscreen => attrs.with_fullscreen(Some(Fullscreen::Borderless(None))),
        WindowMode::Maximized => attrs.with_maximized(true),
        WindowMode::Windowed | WindowMode::Borderless => attrs,
    }
}
