use crate::core::BlendMode;
use crate::surface::Viewport;

/// Represents a single acquired frame.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub(crate) struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Target for drawing during a pass (device/queue + encoder + attachments).
///
/// The color and depth attachments already hold this frame's earlier passes;
/// drawables must load, never clear.
pub struct PassTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,

    /// Multisampled target when MSAA is on, otherwise the surface view.
    pub color_view: &'a wgpu::TextureView,
    /// Surface view to resolve into when MSAA is on.
    pub resolve_target: Option<&'a wgpu::TextureView>,
    pub depth_view: &'a wgpu::TextureView,

    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
    pub blend: BlendMode,
    pub viewport: Viewport,
}

impl<'a> PassTarget<'a> {
    /// Color attachment that keeps existing contents.
    ///
    /// Borrows only the attachment views, so the encoder can be used while it lives.
    pub fn color_attachment(&self) -> wgpu::RenderPassColorAttachment<'a> {
        wgpu::RenderPassColorAttachment {
            view: self.color_view,
            resolve_target: self.resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        }
    }

    /// Depth attachment that keeps the opaque depth written so far.
    pub fn depth_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'a> {
        wgpu::RenderPassDepthStencilAttachment {
            view: self.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }
    }
}
