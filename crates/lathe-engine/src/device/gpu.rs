use std::sync::Arc;

use anyhow::Context;
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::core::{Backend, BlendMode, FrameError, SurfaceCreationError};
use crate::paint::Color;
use crate::surface::{PresentMode, SurfaceHandle, SurfaceState, Viewport};

use super::frame::{GpuFrame, PassTarget};
use super::surface;
use super::targets::{FrameTargets, DEPTH_FORMAT};
use super::GpuInit;

/// wgpu implementation of [`Backend`].
///
/// Owns wgpu core objects, the surface configuration and the depth/MSAA
/// attachments. Blending in wgpu is pipeline state, so `set_blending` only
/// records the mode; drawables pick their pipeline variant from
/// [`PassTarget::blend`].
pub struct WgpuBackend {
    /// Window the surface presents into; kept alive with the surface.
    window: Arc<Window>,

    /// wgpu instance used to create the adapter and surface.
    _instance: wgpu::Instance,

    surface: wgpu::Surface<'static>,
    _adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration.
    config: wgpu::SurfaceConfiguration,

    /// Current drawable size in physical pixels.
    size: PhysicalSize<u32>,

    sample_count: u32,
    targets: FrameTargets,
    clear_color: Color,

    frame: Option<GpuFrame>,
    blend: BlendMode,
}

impl WgpuBackend {
    /// Creates a GPU context bound to a window.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, init: GpuInit) -> Result<Self, SurfaceCreationError> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(SurfaceCreationError::InvalidSize {
                width: size.width,
                height: size.height,
            });
        }

        let GpuInit {
            prefer_srgb,
            present_mode,
            alpha_mode,
            required_features,
            required_limits,
            desired_maximum_frame_latency,
            sample_count,
            clear_color,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("lathe device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&surface_caps, prefer_srgb)
            .ok_or(SurfaceCreationError::NoSurfaceFormat)?;

        let supported = surface::supported_sample_counts(
            adapter.get_texture_format_features(format).flags,
            adapter.get_texture_format_features(DEPTH_FORMAT).flags,
        );
        if !supported.contains(&sample_count) {
            return Err(SurfaceCreationError::UnsupportedSampleCount {
                requested: sample_count,
                supported,
            });
        }

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: surface::choose_present_mode(&surface_caps, present_mode),
            alpha_mode: surface::choose_alpha_mode(&surface_caps, alpha_mode),
            view_formats: vec![],
            desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);
        let targets = FrameTargets::new(&device, format, size, sample_count);

        log::info!(
            "wgpu backend ready: adapter={:?} format={format:?} samples={sample_count}",
            adapter.get_info().name
        );

        Ok(Self {
            window,
            _instance: instance,
            surface,
            _adapter: adapter,
            device,
            queue,
            config,
            size,
            sample_count,
            targets,
            clear_color,
            frame: None,
            blend: BlendMode::Disabled,
        })
    }

    /// Returns the active surface format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Draw target for the frame in flight, or `None` outside a frame.
    pub fn target(&mut self) -> Option<PassTarget<'_>> {
        let frame = self.frame.as_mut()?;
        let (color_view, resolve_target) = match self.targets.msaa.as_ref() {
            Some(msaa) => (msaa, Some(&frame.view)),
            None => (&frame.view, None),
        };

        Some(PassTarget {
            device: &self.device,
            queue: &self.queue,
            encoder: &mut frame.encoder,
            color_view,
            resolve_target,
            depth_view: &self.targets.depth,
            format: self.config.format,
            sample_count: self.sample_count,
            blend: self.blend,
            viewport: Viewport::new(self.size.width, self.size.height),
        })
    }

    fn clear(&self, frame: &mut GpuFrame) {
        let c = self.clear_color;
        let (view, resolve_target) = match self.targets.msaa.as_ref() {
            Some(msaa) => (msaa, Some(&frame.view)),
            None => (&frame.view, None),
        };

        // Dropped immediately; the pass only records the clears.
        let _rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lathe clear"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: c.r as f64,
                        g: c.g as f64,
                        b: c.b as f64,
                        a: c.a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
}

impl Backend for WgpuBackend {
    fn handle(&self) -> SurfaceHandle {
        SurfaceHandle {
            width: self.size.width,
            height: self.size.height,
            sample_count: self.sample_count,
            present_mode: match self.config.present_mode {
                wgpu::PresentMode::Fifo | wgpu::PresentMode::FifoRelaxed | wgpu::PresentMode::AutoVsync => {
                    PresentMode::Vsync
                }
                _ => PresentMode::Immediate,
            },
        }
    }

    fn begin_frame(&mut self) -> Result<(), FrameError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(FrameError::Transient("surface has zero area".into()));
        }
        if self.frame.is_some() {
            log::warn!("begin_frame called with a frame in flight; discarding it");
            self.frame = None;
        }

        let surface_texture = self.surface.get_current_texture().map_err(|err| {
            surface::map_surface_error(&self.surface, &self.device, &self.config, self.size, err)
        })?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lathe frame encoder"),
            });

        let mut frame = GpuFrame {
            surface_texture,
            view,
            encoder,
        };
        self.clear(&mut frame);
        self.frame = Some(frame);
        Ok(())
    }

    fn set_blending(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn blending(&self) -> BlendMode {
        self.blend
    }

    fn present(&mut self) -> Result<(), FrameError> {
        let Some(GpuFrame {
            surface_texture,
            view,
            encoder,
        }) = self.frame.take()
        else {
            return Err(FrameError::Transient("present without an acquired frame".into()));
        };

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);

        self.window.pre_present_notify();
        surface_texture.present();
        Ok(())
    }

    fn resize(&mut self, state: &SurfaceState) {
        let new_size = PhysicalSize::new(state.width, state.height);
        let configured = surface::apply_resize(
            &self.surface,
            &self.device,
            &mut self.config,
            &mut self.size,
            new_size,
        );

        if configured {
            self.targets =
                FrameTargets::new(&self.device, self.config.format, self.size, self.sample_count);
        }
    }

    fn release(&mut self) {
        if self.frame.take().is_some() {
            log::debug!("dropping unpresented frame on release");
        }
        log::info!("wgpu backend released");
    }
}
