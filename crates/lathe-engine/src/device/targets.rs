use winit::dpi::PhysicalSize;

/// Depth buffer format shared by every pipeline drawing into the frame.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Size-dependent attachments: depth, plus a multisampled color target when
/// `sample_count > 1`.
pub(crate) struct FrameTargets {
    pub depth: wgpu::TextureView,
    pub msaa: Option<wgpu::TextureView>,
}

impl FrameTargets {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let depth = create_view(device, "lathe depth", DEPTH_FORMAT, size, sample_count);
        let msaa = (sample_count > 1)
            .then(|| create_view(device, "lathe msaa color", format, size, sample_count));

        Self { depth, msaa }
    }
}

fn create_view(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
