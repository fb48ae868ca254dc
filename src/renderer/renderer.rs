use std::sync::Arc;

use log::{info, warn};
use nalgebra_glm as glm;
use wgpu::util::DeviceExt;

use crate::assets::EnvironmentMap;
use crate::error::SceneError;
use crate::renderer::environment::GpuEnvironment;
use crate::renderer::texture::{
    DEPTH_FORMAT, HDR_FORMAT, RenderTargets, linear_sampler, solid_rgba8, upload_rgba8,
};
use crate::renderer::uniforms::{CameraUniform, DrawUniform, PostUniform, SceneUniform};
use crate::renderer::vertex::Vertex;
use crate::scene::model::{ModelAsset, TextureImage};
use crate::scene::{BULB_RADIUS, CUP_MESH_NAME, FLOOR_SIZE, primitives};

pub(crate) struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl GpuMesh {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

/// Per-draw uniform buffer plus the group(1) bind group that references it.
pub(crate) struct DrawSlot {
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

pub(crate) struct GpuPrimitive {
    pub(crate) mesh: GpuMesh,
    pub(crate) slot: DrawSlot,
    pub(crate) local: glm::Mat4,
    pub(crate) base_color: [f32; 4],
    pub(crate) metallic: f32,
    pub(crate) roughness: f32,
    pub(crate) textured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSlot {
    Machine,
    Cup,
}

pub struct Renderer {
    pub(crate) surface: wgpu::Surface<'static>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) config: wgpu::SurfaceConfiguration,

    pub(crate) background_pipeline: wgpu::RenderPipeline,
    pub(crate) opaque_pipeline: wgpu::RenderPipeline,
    pub(crate) floor_pipeline: wgpu::RenderPipeline,
    pub(crate) transmission_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,

    frame_layout: wgpu::BindGroupLayout,
    draw_layout: wgpu::BindGroupLayout,
    surface_layout: wgpu::BindGroupLayout,
    composite_layout: wgpu::BindGroupLayout,

    pub(crate) camera_buffer: wgpu::Buffer,
    pub(crate) mirrored_camera_buffer: wgpu::Buffer,
    pub(crate) scene_buffer: wgpu::Buffer,
    pub(crate) post_buffer: wgpu::Buffer,
    pub(crate) frame_bind_group: wgpu::BindGroup,
    pub(crate) mirrored_frame_bind_group: wgpu::BindGroup,
    pub(crate) surface_bind_group: wgpu::BindGroup,
    pub(crate) composite_bind_group: wgpu::BindGroup,

    pub(crate) environment: GpuEnvironment,
    env_sampler: wgpu::Sampler,
    clamp_sampler: wgpu::Sampler,
    repeat_sampler: wgpu::Sampler,
    base_sampler: wgpu::Sampler,
    white_view: wgpu::TextureView,
    distortion_view: wgpu::TextureView,
    pub(crate) has_distortion: bool,

    pub(crate) targets: RenderTargets,

    pub(crate) machine: Vec<GpuPrimitive>,
    pub(crate) cup: Vec<GpuPrimitive>,
    pub(crate) floor: (GpuMesh, DrawSlot),
    pub(crate) bulb_mesh: GpuMesh,
    pub(crate) bulb_slots: [DrawSlot; 2],

    pub(crate) egui_renderer: egui_wgpu::Renderer,
    egui_ctx: egui::Context,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(std::slice::from_ref(value)),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    blend: wgpu::BlendState,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // The mirrored reflection pass flips winding.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl Renderer {
    pub async fn new(window: Arc<winit::window::Window>) -> Result<Self, SceneError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cafevis device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                ..Default::default()
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| SceneError::new("surface-no-format"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });
        let composite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Composite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/composite.wgsl").into()),
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
                texture_entry(2),
                sampler_entry(3),
            ],
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                texture_entry(1),
                sampler_entry(2),
            ],
        });
        let surface_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Surface Bind Group Layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                texture_entry(2),
                sampler_entry(3),
                sampler_entry(4),
            ],
        });
        let composite_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Composite Bind Group Layout"),
            entries: &[
                texture_entry(0),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                sampler_entry(2),
                uniform_entry(3, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let background_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });
        let opaque_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Opaque Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let surface_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Surface Pipeline Layout"),
                bind_group_layouts: &[&frame_layout, &draw_layout, &surface_layout],
                push_constant_ranges: &[],
            });
        let composite_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Composite Pipeline Layout"),
                bind_group_layouts: &[&composite_layout],
                push_constant_ranges: &[],
            });

        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Background Pipeline"),
            layout: Some(&background_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_background"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_background"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: HDR_FORMAT,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let opaque_pipeline = mesh_pipeline(
            &device,
            "Opaque Pipeline",
            &opaque_layout,
            &scene_shader,
            "fs_main",
            wgpu::BlendState::REPLACE,
            true,
        );
        let floor_pipeline = mesh_pipeline(
            &device,
            "Floor Pipeline",
            &surface_pipeline_layout,
            &scene_shader,
            "fs_floor",
            wgpu::BlendState::REPLACE,
            true,
        );
        let transmission_pipeline = mesh_pipeline(
            &device,
            "Transmission Pipeline",
            &surface_pipeline_layout,
            &scene_shader,
            "fs_transmission",
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        );

        let composite_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Composite Pipeline"),
            layout: Some(&composite_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &composite_shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &composite_shader,
                entry_point: Some("fs_composite"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let env_sampler = linear_sampler(&device, "Environment Sampler", wgpu::AddressMode::Repeat);
        let clamp_sampler = linear_sampler(&device, "Clamp Sampler", wgpu::AddressMode::ClampToEdge);
        let repeat_sampler = linear_sampler(&device, "Repeat Sampler", wgpu::AddressMode::Repeat);
        let base_sampler = linear_sampler(&device, "Base Color Sampler", wgpu::AddressMode::Repeat);
        let (_, white_view) = solid_rgba8(&device, &queue, "White Texture", [255, 255, 255, 255]);
        let (_, distortion_view) =
            solid_rgba8(&device, &queue, "Neutral Distortion", [128, 128, 128, 255]);

        let environment = GpuEnvironment::fallback(&device, &queue);
        let targets = RenderTargets::new(&device, config.width, config.height);

        let empty_camera: CameraUniform = bytemuck::Zeroable::zeroed();
        let empty_post: PostUniform = bytemuck::Zeroable::zeroed();
        let camera_buffer = uniform_buffer(&device, "Camera Buffer", &empty_camera);
        let mirrored_camera_buffer =
            uniform_buffer(&device, "Mirrored Camera Buffer", &empty_camera);
        let scene_buffer = uniform_buffer(&device, "Scene Buffer", &SceneUniform::default());
        let post_buffer = uniform_buffer(&device, "Post Buffer", &empty_post);

        let frame_bind_group = create_frame_bind_group(
            &device,
            &frame_layout,
            &camera_buffer,
            &scene_buffer,
            &environment.view,
            &env_sampler,
        );
        let mirrored_frame_bind_group = create_frame_bind_group(
            &device,
            &frame_layout,
            &mirrored_camera_buffer,
            &scene_buffer,
            &environment.view,
            &env_sampler,
        );
        let surface_bind_group = create_surface_bind_group(
            &device,
            &surface_layout,
            &targets,
            &distortion_view,
            &clamp_sampler,
            &repeat_sampler,
        );
        let composite_bind_group = create_composite_bind_group(
            &device,
            &composite_layout,
            &targets,
            &clamp_sampler,
            &post_buffer,
        );

        let (floor_vertices, floor_indices) = primitives::floor_plane(FLOOR_SIZE);
        let floor = (
            GpuMesh::new(&device, "Floor", &floor_vertices, &floor_indices),
            create_draw_slot(&device, &draw_layout, &white_view, &base_sampler, "Floor"),
        );
        let (sphere_vertices, sphere_indices) = primitives::uv_sphere(BULB_RADIUS, 32, 16);
        let bulb_mesh = GpuMesh::new(&device, "Bulb", &sphere_vertices, &sphere_indices);
        let bulb_slots = [
            create_draw_slot(&device, &draw_layout, &white_view, &base_sampler, "Bulb 1"),
            create_draw_slot(&device, &draw_layout, &white_view, &base_sampler, "Bulb 2"),
        ];

        let egui_ctx = egui::Context::default();
        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, Default::default());

        Ok(Self {
            surface,
            device,
            queue,
            config,
            background_pipeline,
            opaque_pipeline,
            floor_pipeline,
            transmission_pipeline,
            composite_pipeline,
            frame_layout,
            draw_layout,
            surface_layout,
            composite_layout,
            camera_buffer,
            mirrored_camera_buffer,
            scene_buffer,
            post_buffer,
            frame_bind_group,
            mirrored_frame_bind_group,
            surface_bind_group,
            composite_bind_group,
            environment,
            env_sampler,
            clamp_sampler,
            repeat_sampler,
            base_sampler,
            white_view,
            distortion_view,
            has_distortion: false,
            targets,
            machine: Vec::new(),
            cup: Vec::new(),
            floor,
            bulb_mesh,
            bulb_slots,
            egui_renderer,
            egui_ctx,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.targets = RenderTargets::new(&self.device, new_size.width, new_size.height);
            self.rebuild_target_bind_groups();
        }
    }

    /// Reconfigure the swapchain at its current size, after it was lost or outdated.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn egui_context(&self) -> egui::Context {
        self.egui_ctx.clone()
    }

    fn rebuild_target_bind_groups(&mut self) {
        self.surface_bind_group = create_surface_bind_group(
            &self.device,
            &self.surface_layout,
            &self.targets,
            &self.distortion_view,
            &self.clamp_sampler,
            &self.repeat_sampler,
        );
        self.composite_bind_group = create_composite_bind_group(
            &self.device,
            &self.composite_layout,
            &self.targets,
            &self.clamp_sampler,
            &self.post_buffer,
        );
    }

    /// Upload `model` into `slot`, replacing whatever was there. The cup slot
    /// only keeps the mesh named `cup` when the file has one.
    pub fn set_model(&mut self, slot: ModelSlot, model: &ModelAsset) {
        let selected;
        let source = match slot {
            ModelSlot::Machine => model,
            ModelSlot::Cup => match model.geometry_of(CUP_MESH_NAME) {
                Some(cup) => {
                    selected = cup;
                    &selected
                }
                None => {
                    warn!("No mesh named '{CUP_MESH_NAME}', using the whole cup model");
                    model
                }
            },
        };

        let label = match slot {
            ModelSlot::Machine => "Machine",
            ModelSlot::Cup => "Cup",
        };
        let mut uploaded = Vec::with_capacity(source.primitives.len());
        for (i, primitive) in source.primitives.iter().enumerate() {
            if primitive.indices.is_empty() || primitive.vertices.is_empty() {
                continue;
            }
            let label = format!("{label} #{i}");
            let texture = primitive
                .material
                .base_color_texture
                .as_ref()
                .map(|image| upload_rgba8(&self.device, &self.queue, &label, image, true).1);
            let view = texture.as_ref().unwrap_or(&self.white_view);
            uploaded.push(GpuPrimitive {
                mesh: GpuMesh::new(&self.device, &label, &primitive.vertices, &primitive.indices),
                slot: create_draw_slot(&self.device, &self.draw_layout, view, &self.base_sampler, &label),
                local: primitive.transform,
                base_color: primitive.material.base_color,
                metallic: primitive.material.metallic,
                roughness: primitive.material.roughness,
                textured: texture.is_some(),
            });
        }

        info!("{label}: uploaded {} primitives", uploaded.len());
        match slot {
            ModelSlot::Machine => self.machine = uploaded,
            ModelSlot::Cup => self.cup = uploaded,
        }
    }

    pub fn set_environment(&mut self, map: &EnvironmentMap) {
        self.environment = GpuEnvironment::upload(&self.device, &self.queue, map);
        self.frame_bind_group = create_frame_bind_group(
            &self.device,
            &self.frame_layout,
            &self.camera_buffer,
            &self.scene_buffer,
            &self.environment.view,
            &self.env_sampler,
        );
        self.mirrored_frame_bind_group = create_frame_bind_group(
            &self.device,
            &self.frame_layout,
            &self.mirrored_camera_buffer,
            &self.scene_buffer,
            &self.environment.view,
            &self.env_sampler,
        );
    }

    pub fn set_distortion_map(&mut self, image: &TextureImage) {
        let (_, view) = upload_rgba8(&self.device, &self.queue, "Distortion Map", image, false);
        self.distortion_view = view;
        self.has_distortion = true;
        self.rebuild_target_bind_groups();
    }

    pub(crate) fn write_draw(&self, slot: &DrawSlot, uniform: &DrawUniform) {
        self.queue
            .write_buffer(&slot.uniform_buffer, 0, bytemuck::cast_slice(&[*uniform]));
    }

    pub(crate) fn write_frame(
        &self,
        camera: &CameraUniform,
        mirrored: &CameraUniform,
        scene: &SceneUniform,
        post: &PostUniform,
    ) {
        self.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[*camera]));
        self.queue.write_buffer(
            &self.mirrored_camera_buffer,
            0,
            bytemuck::cast_slice(&[*mirrored]),
        );
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[*scene]));
        self.queue
            .write_buffer(&self.post_buffer, 0, bytemuck::cast_slice(&[*post]));
    }
}

fn create_draw_slot(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    label: &str,
) -> DrawSlot {
    let initial = DrawUniform::new(&glm::Mat4::identity(), [1.0; 4], 0.0, 1.0);
    let uniform_buffer = uniform_buffer(device, &format!("{label} Draw Buffer"), &initial);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} Draw Bind Group")),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(texture),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });
    DrawSlot {
        uniform_buffer,
        bind_group,
    }
}

fn create_frame_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    camera: &wgpu::Buffer,
    scene: &wgpu::Buffer,
    environment: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Frame Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: scene.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(environment),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_surface_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    targets: &RenderTargets,
    distortion: &wgpu::TextureView,
    clamp_sampler: &wgpu::Sampler,
    repeat_sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Surface Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.reflection_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(distortion),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&targets.opaque_copy_view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(clamp_sampler),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::Sampler(repeat_sampler),
            },
        ],
    })
}

fn create_composite_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    targets: &RenderTargets,
    sampler: &wgpu::Sampler,
    post: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Composite Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&targets.hdr_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&targets.depth_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: post.as_entire_binding(),
            },
        ],
    })
}
