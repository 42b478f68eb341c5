use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::core::BlendMode;
use crate::device::PassTarget;
use crate::paint::Color;

use super::common::{
    blend_state_for, depth_state_for, viewport_ubo_min_binding_size, QuadVertex, ViewportUniform,
    QUAD_INDICES, QUAD_VERTICES,
};

/// Axis-aligned quad in physical pixels at a given depth.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quad {
    pub origin: [f32; 2],
    pub size: [f32; 2],
    /// `[0, 1]`, nearer is smaller.
    pub depth: f32,
    pub color: Color,
}

impl Quad {
    pub fn new(x: f32, y: f32, w: f32, h: f32, depth: f32, color: Color) -> Self {
        Self {
            origin: [x, y],
            size: [w, h],
            depth,
            color,
        }
    }

    fn is_empty(&self) -> bool {
        self.size[0] <= 0.0 || self.size[1] <= 0.0
    }
}

#[derive(Copy, Clone, Eq, PartialEq)]
struct PipelineKey {
    format: wgpu::TextureFormat,
    sample_count: u32,
}

/// Instanced quad renderer.
///
/// Holds one pipeline per blend mode and picks the one matching
/// [`PassTarget::blend`], so the same renderer draws correctly in either pass.
/// Instance data lives in a single buffer: call `render` at most once per frame.
#[derive(Default)]
pub struct QuadRenderer {
    pipeline_key: Option<PipelineKey>,
    opaque_pipeline: Option<wgpu::RenderPipeline>,
    blended_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl QuadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `quads` into `target` with the pipeline for the target's blend mode.
    pub fn render(&mut self, target: &mut PassTarget<'_>, quads: &[Quad]) -> anyhow::Result<()> {
        let instances: Vec<QuadInstance> = quads
            .iter()
            .filter(|q| !q.is_empty())
            .map(QuadInstance::from)
            .collect();

        if instances.is_empty() {
            return Ok(());
        }

        self.ensure_pipelines(target);
        self.ensure_static_buffers(target.device);
        self.ensure_bindings(target.device);
        self.write_viewport_uniform(target);
        self.ensure_instance_capacity(target.device, instances.len());

        let (Some(pipeline), Some(bind_group), Some(quad_vbo), Some(quad_ibo), Some(instance_vbo)) = (
            self.pipeline_for(target.blend),
            self.bind_group.as_ref(),
            self.quad_vbo.as_ref(),
            self.quad_ibo.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            anyhow::bail!("quad renderer resources missing after initialization");
        };

        target
            .queue
            .write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let color = target.color_attachment();
        let depth = target.depth_attachment();
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lathe quad pass"),
            color_attachments: &[Some(color)],
            depth_stencil_attachment: Some(depth),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..6, 0, 0..instances.len() as u32);

        Ok(())
    }

    fn pipeline_for(&self, mode: BlendMode) -> Option<&wgpu::RenderPipeline> {
        match mode {
            BlendMode::Disabled => self.opaque_pipeline.as_ref(),
            BlendMode::Enabled => self.blended_pipeline.as_ref(),
        }
    }

    fn ensure_pipelines(&mut self, target: &PassTarget<'_>) {
        let key = PipelineKey {
            format: target.format,
            sample_count: target.sample_count,
        };
        if self.pipeline_key == Some(key) && self.opaque_pipeline.is_some() {
            return;
        }

        let device = target.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lathe quad shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/quad.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lathe quad bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(viewport_ubo_min_binding_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lathe quad pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let build = |mode: BlendMode, label: &str| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[QuadVertex::layout(), QuadInstance::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: key.format,
                        blend: blend_state_for(mode),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(depth_state_for(mode)),
                multisample: wgpu::MultisampleState {
                    count: key.sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },

                multiview_mask: None,
                cache: None,
            })
        };

        self.opaque_pipeline = Some(build(BlendMode::Disabled, "lathe quad opaque pipeline"));
        self.blended_pipeline = Some(build(BlendMode::Enabled, "lathe quad blended pipeline"));
        self.pipeline_key = Some(key);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, device: &wgpu::Device) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lathe quad viewport ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lathe quad bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }

    fn ensure_static_buffers(&mut self, device: &wgpu::Device) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lathe quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lathe quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_viewport_uniform(&self, target: &PassTarget<'_>) {
        let Some(ubo) = self.viewport_ubo.as_ref() else { return };
        let u = ViewportUniform {
            viewport: [
                target.viewport.width.max(1) as f32,
                target.viewport.height.max(1) as f32,
            ],
            _pad: [0.0; 2],
        };
        target.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }

    fn ensure_instance_capacity(&mut self, device: &wgpu::Device, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        let new_cap = required.next_power_of_two().max(64);
        self.instance_vbo = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lathe quad instance vbo"),
            size: (new_cap * std::mem::size_of::<QuadInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadInstance {
    origin: [f32; 2],
    size: [f32; 2],
    depth: f32,
    color: [f32; 4],
}

impl From<&Quad> for QuadInstance {
    fn from(q: &Quad) -> Self {
        Self {
            origin: q.origin,
            size: q.size,
            depth: q.depth.clamp(0.0, 1.0),
            color: q.color.to_array(),
        }
    }
}

impl QuadInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2, // origin
        2 => Float32x2, // size
        3 => Float32,   // depth
        4 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_has_no_padding() {
        assert_eq!(std::mem::size_of::<QuadInstance>(), 36);
    }

    #[test]
    fn instance_clamps_depth() {
        let q = Quad::new(0.0, 0.0, 1.0, 1.0, 4.0, Color::WHITE);
        assert_eq!(QuadInstance::from(&q).depth, 1.0);
    }

    #[test]
    fn empty_quads_are_detected() {
        assert!(Quad::new(0.0, 0.0, 0.0, 5.0, 0.5, Color::WHITE).is_empty());
        assert!(!Quad::new(0.0, 0.0, 1.0, 1.0, 0.5, Color::WHITE).is_empty());
    }
}
