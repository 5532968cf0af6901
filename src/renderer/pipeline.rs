//! WebGPU render pipeline setup
//!
//! Two vertex buffers of identical shape: static template positions and
//! per-vertex offsets. Each slice is one draw with its colour selected by a
//! dynamic uniform offset.

use wgpu::util::DeviceExt;

use super::draw::DrawCall;
use super::error::StartupError;
use super::sync::{OffsetSink, template_vertices};
use super::vertex::{OffsetVertex, SliceUniform, TemplateVertex, UNIFORM_STRIDE};
use crate::colors;
use crate::consts::VERTEX_SIZE;
use crate::sim::{GameState, SliceId};

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    /// Template geometry, written once here and never again
    template_buffer: wgpu::Buffer,
    /// Per-vertex offsets, partially rewritten every frame
    offset_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Viewport size in pixels
    pub size: (u32, u32),
}

/// Offset buffer writes through the device queue
pub struct GpuOffsets<'a> {
    queue: &'a wgpu::Queue,
    buffer: &'a wgpu::Buffer,
}

impl OffsetSink for GpuOffsets<'_> {
    fn write(&mut self, byte_offset: u64, data: &[u8]) {
        self.queue.write_buffer(self.buffer, byte_offset, data);
    }
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        state: &GameState,
    ) -> Result<Self, StartupError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("turret-shooter-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(StartupError::NoSurfaceFormat)?;
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("slice_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("slice_shader.wgsl").into()),
        });

        // Template and offset buffers share one layout
        let templates: Vec<TemplateVertex> = template_vertices(state)
            .into_iter()
            .map(|p| TemplateVertex {
                position: p.to_array(),
            })
            .collect();
        let template_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("template_buffer"),
            contents: bytemuck::cast_slice(&templates),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let offset_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("offset_buffer"),
            contents: bytemuck::cast_slice(&vec![
                OffsetVertex { offset: [0.0; 2] };
                templates.len()
            ]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        debug_assert_eq!(
            templates.len() as u64 * VERTEX_SIZE,
            offset_buffer.size()
        );

        // One colour per slice, UNIFORM_STRIDE apart
        let colours = [
            state.turret.colour(),
            state.bullets.colour(),
            state.birds.colour(),
            state.scorecard.colour(),
        ];
        let mut uniform_bytes = vec![0u8; UNIFORM_STRIDE as usize * SliceId::ALL.len()];
        for (id, colour) in SliceId::ALL.into_iter().zip(colours) {
            let uniform = SliceUniform { colour };
            let at = id.index() * UNIFORM_STRIDE as usize;
            uniform_bytes[at..at + std::mem::size_of::<SliceUniform>()]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slice_uniforms"),
            contents: &uniform_bytes,
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let uniform_size = wgpu::BufferSize::new(std::mem::size_of::<SliceUniform>() as u64);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("slice_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: uniform_size,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("slice_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: uniform_size,
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[TemplateVertex::desc(), OffsetVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "Render state ready: {} vertices per buffer",
            templates.len()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            template_buffer,
            offset_buffer,
            bind_group,
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Sink writing into the GPU offset buffer
    pub fn offsets(&self) -> GpuOffsets<'_> {
        GpuOffsets {
            queue: &self.queue,
            buffer: &self.offset_buffer,
        }
    }

    /// Issue one draw per call
    pub fn render(&mut self, draws: &[DrawCall]) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_vertex_buffer(0, self.template_buffer.slice(..));
            render_pass.set_vertex_buffer(1, self.offset_buffer.slice(..));
            for draw in draws {
                let dynamic_offset = (draw.slice.index() as u64 * UNIFORM_STRIDE) as u32;
                render_pass.set_bind_group(0, &self.bind_group, &[dynamic_offset]);
                render_pass.draw(draw.vertices.clone(), 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
