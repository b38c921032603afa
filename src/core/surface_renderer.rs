use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, RenderPipeline, Surface, SurfaceConfiguration, TextureView};
use winit::window::Window;

use super::gpu_context::GpuContext;
use super::render_pipeline::{RenderSurface, SurfaceOptions};
use super::viewport::buffer_size;
use crate::camera::PerspectiveCamera;
use crate::error::{BackdropError, Result};
use crate::scene::Scene;
use crate::types::{InstanceRaw, SceneUniform, Vertex};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Static geometry uploaded by `prepare`
struct SceneBuffers {
    vertices: Buffer,
    instances: Buffer,
    vertex_count: u32,
    instance_count: u32,
}

/// Draws the particle scene into a window surface with instanced meshes
///
/// The backing buffer is `logical size x pixel ratio`, so a capped pixel
/// ratio renders fewer pixels than the window has and lets the compositor
/// scale them up.
pub struct SurfaceRenderer {
    gpu: GpuContext,
    surface: Option<Surface<'static>>,
    surface_config: SurfaceConfiguration,
    render_pipeline: RenderPipeline,
    bind_group: BindGroup,
    uniform_buffer: Buffer,
    depth_view: TextureView,
    buffers: Option<SceneBuffers>,
    clear_color: wgpu::Color,
    logical_size: (u32, u32),
    pixel_ratio: f64,
}

impl SurfaceRenderer {
    /// Create a renderer for a window, negotiating its own device
    pub fn new(window: Arc<Window>, options: &SurfaceOptions) -> Result<Self> {
        let size = window.inner_size();
        let scale = window.scale_factor();
        let logical = size.to_logical::<u32>(scale);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let gpu = pollster::block_on(GpuContext::new_with_surface(&instance, &surface))?;

        Self::with_gpu(gpu, surface, (logical.width, logical.height), scale, options)
    }

    fn with_gpu(
        gpu: GpuContext,
        surface: Surface<'static>,
        logical_size: (u32, u32),
        pixel_ratio: f64,
        options: &SurfaceOptions,
    ) -> Result<Self> {
        let (width, height) = buffer_size(logical_size.0, logical_size.1, pixel_ratio);
        let surface_config = Self::create_surface_config(&surface, &gpu, width, height, options)?;
        surface.configure(gpu.device(), &surface_config);

        let uniform_buffer = gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let (render_pipeline, bind_group) =
            Self::create_render_pipeline(gpu.device(), &uniform_buffer, surface_config.format);
        let depth_view = Self::create_depth_view(gpu.device(), width, height);

        let premultiply = surface_config.alpha_mode == wgpu::CompositeAlphaMode::PreMultiplied;
        let [r, g, b, a] = options.clear_color;
        let alpha = if options.transparent { a } else { 1.0 };
        let clear_color = if premultiply {
            wgpu::Color { r: r * alpha, g: g * alpha, b: b * alpha, a: alpha }
        } else {
            wgpu::Color { r, g, b, a: alpha }
        };

        log::debug!(
            "Surface configured: {}x{} {:?} alpha={:?}",
            width,
            height,
            surface_config.format,
            surface_config.alpha_mode
        );

        Ok(Self {
            gpu,
            surface: Some(surface),
            surface_config,
            render_pipeline,
            bind_group,
            uniform_buffer,
            depth_view,
            buffers: None,
            clear_color,
            logical_size,
            pixel_ratio,
        })
    }

    /// Current backing buffer size in physical pixels
    pub fn buffer_dimensions(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn create_surface_config(
        surface: &Surface,
        gpu: &GpuContext,
        width: u32,
        height: u32,
        options: &SurfaceOptions,
    ) -> Result<SurfaceConfiguration> {
        let caps = surface.get_capabilities(gpu.adapter());
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| BackdropError::Surface("surface reports no formats".into()))?;

        let blended = [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ];
        let alpha_mode = blended
            .into_iter()
            .filter(|_| options.transparent)
            .find(|mode| caps.alpha_modes.contains(mode))
            .or_else(|| caps.alpha_modes.first().copied())
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_render_pipeline(
        device: &wgpu::Device,
        uniform_buffer: &Buffer,
        surface_format: wgpu::TextureFormat,
    ) -> (RenderPipeline, BindGroup) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../particles.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout(), InstanceRaw::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
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
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        (pipeline, bind_group)
    }

    /// Apply logical size and pixel ratio to the surface and depth buffer
    fn reconfigure(&mut self) {
        let Some(surface) = &self.surface else {
            return;
        };
        let (logical_w, logical_h) = self.logical_size;
        if logical_w == 0 || logical_h == 0 {
            return;
        }

        let (width, height) = buffer_size(logical_w, logical_h, self.pixel_ratio);
        if width == self.surface_config.width && height == self.surface_config.height {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_view(self.gpu.device(), width, height);
        log::debug!("Surface resized to {}x{} (ratio {})", width, height, self.pixel_ratio);
    }
}

impl RenderSurface for SurfaceRenderer {
    fn resize(&mut self, width: u32, height: u32, ratio: f64) {
        self.logical_size = (width, height);
        self.pixel_ratio = ratio;
        self.reconfigure();
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn size(&self) -> (u32, u32) {
        self.logical_size
    }

    fn prepare(&mut self, scene: &Scene) -> Result<()> {
        let vertices = scene.geometry().vertices();
        let instances = scene.instances();
        if vertices.is_empty() || instances.is_empty() {
            self.buffers = None;
            return Ok(());
        }

        let device = self.gpu.device();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Instance Buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.buffers = Some(SceneBuffers {
            vertices: vertex_buffer,
            instances: instance_buffer,
            vertex_count: vertices.len() as u32,
            instance_count: instances.len() as u32,
        });
        log::debug!("Uploaded {} particle instances", instances.len());
        Ok(())
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let Some(surface) = &self.surface else {
            return Ok(());
        };

        let output = match surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let uniform = scene.uniform(camera);
        self.gpu
            .queue()
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(buffers) = &self.buffers {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, buffers.vertices.slice(..));
                render_pass.set_vertex_buffer(1, buffers.instances.slice(..));
                render_pass.draw(0..buffers.vertex_count, 0..buffers.instance_count);
            }
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(&mut self) {
        self.buffers = None;
        if self.surface.take().is_some() {
            log::debug!("Released drawing surface");
        }
    }
}
