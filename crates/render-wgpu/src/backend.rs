use std::collections::HashMap;
use std::num::NonZeroU64;

use roomview_geometry::Mesh;
use roomview_scene::{DrawCall, MeshKey, ShadingBackend};
use wgpu::util::DeviceExt;

use crate::layout::{DrawUniforms, Vertex, align_to, linear_to_srgb, vertices_of};
use crate::shaders;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Uniform slots allocated up front; the buffer doubles when exceeded.
const INITIAL_DRAW_CAPACITY: u64 = 16;

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    last_used: u64,
}

struct QueuedDraw {
    mesh_key: MeshKey,
    uniforms: DrawUniforms,
}

/// Long-lived GPU state: pipeline, depth buffer, uniform ring and mesh cache.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    draw_capacity: u64,
    depth_view: wgpu::TextureView,
    meshes: HashMap<MeshKey, GpuMesh>,
    frame: u64,
    /// The target format has no hardware sRGB encoding.
    encode_output: bool,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let uniform_size = std::mem::size_of::<DrawUniforms>() as u64;
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let uniform_stride = align_to(uniform_size, alignment);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_uniforms_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(uniform_size),
                },
                count: None,
            }],
        });

        let (uniform_buffer, uniform_bind_group) = Self::create_uniforms(
            device,
            &bind_group_layout,
            uniform_stride,
            INITIAL_DRAW_CAPACITY,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("wall_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("wall_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::WALL_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("wall_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            depth_view: Self::create_depth_view(device, width, height),
            meshes: HashMap::new(),
            frame: 0,
            encode_output: !surface_format.is_srgb(),
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_view = Self::create_depth_view(device, width, height);
    }

    /// Number of meshes currently resident on the GPU.
    pub fn cached_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Borrow the renderer as a [`ShadingBackend`] drawing into `target`.
    pub fn frame<'a>(
        &'a mut self,
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        target: &'a wgpu::TextureView,
    ) -> WgpuFrame<'a> {
        WgpuFrame {
            renderer: self,
            device,
            queue,
            target,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            draws: Vec::new(),
        }
    }

    fn upload(&mut self, device: &wgpu::Device, key: MeshKey, mesh: &Mesh) {
        let frame = self.frame;
        if let Some(cached) = self.meshes.get_mut(&key) {
            cached.last_used = frame;
            return;
        }
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&vertices_of(mesh)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        tracing::debug!(?key, vertices = mesh.vertex_count(), "mesh uploaded");
        self.meshes.insert(
            key,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
                last_used: frame,
            },
        );
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, draws: u64) {
        if draws <= self.draw_capacity {
            return;
        }
        let mut capacity = self.draw_capacity.max(1);
        while capacity < draws {
            capacity *= 2;
        }
        let (buffer, bind_group) =
            Self::create_uniforms(device, &self.bind_group_layout, self.uniform_stride, capacity);
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.draw_capacity = capacity;
        tracing::debug!(capacity, "uniform buffer grown");
    }

    fn evict_unused(&mut self) {
        let frame = self.frame;
        let before = self.meshes.len();
        self.meshes.retain(|_, mesh| mesh.last_used == frame);
        let evicted = before - self.meshes.len();
        if evicted > 0 {
            tracing::debug!(evicted, "gpu meshes released");
        }
    }

    fn create_uniforms(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: stride * capacity,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_uniforms_bind_group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

/// One frame's worth of draws against a [`WgpuRenderer`].
///
/// Draw calls are queued and encoded in a single pass at
/// [`end_frame`](ShadingBackend::end_frame).
pub struct WgpuFrame<'a> {
    renderer: &'a mut WgpuRenderer,
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    target: &'a wgpu::TextureView,
    clear_color: [f32; 4],
    draws: Vec<QueuedDraw>,
}

impl ShadingBackend for WgpuFrame<'_> {
    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        self.renderer.frame += 1;
        self.clear_color = clear_color;
        self.draws.clear();
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        self.renderer.upload(self.device, call.mesh_key, call.mesh);
        self.draws.push(QueuedDraw {
            mesh_key: call.mesh_key,
            uniforms: DrawUniforms::from_call(call)
                .with_output_encoding(self.renderer.encode_output),
        });
    }

    fn end_frame(&mut self) {
        let renderer = &mut *self.renderer;
        renderer.ensure_capacity(self.device, self.draws.len() as u64);

        let stride = renderer.uniform_stride as usize;
        let mut staging = vec![0u8; stride * self.draws.len()];
        for (slot, draw) in staging.chunks_exact_mut(stride).zip(&self.draws) {
            let bytes = bytemuck::bytes_of(&draw.uniforms);
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        if !staging.is_empty() {
            self.queue.write_buffer(&renderer.uniform_buffer, 0, &staging);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut clear = self.clear_color;
            if renderer.encode_output {
                for channel in &mut clear[..3] {
                    *channel = linear_to_srgb(*channel);
                }
            }
            let [r, g, b, a] = clear.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &renderer.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&renderer.pipeline);
            for (i, draw) in self.draws.iter().enumerate() {
                let Some(mesh) = renderer.meshes.get(&draw.mesh_key) else {
                    continue;
                };
                let offset = (i * stride) as u32;
                pass.set_bind_group(0, &renderer.uniform_bind_group, &[offset]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));

        renderer.evict_unused();
        self.draws.clear();
    }
}
