//! Render pipelines and GPU data layouts for lit spheres.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orb_scene::PointLight;

use crate::depth::DepthBuffer;
use crate::sphere::SphereMesh;

pub const SPHERE_SHADER_SOURCE: &str = include_str!("sphere.wgsl");

/// Per-frame camera and light data, bind group 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// xyz = position, w = intensity.
    pub light: [f32; 4],
    /// x = cutoff distance, y = decay, z = fade opacity.
    pub light_params: [f32; 4],
}

impl FrameUniform {
    #[must_use]
    pub fn new(view_proj: Mat4, eye: Vec3, light: &PointLight, fade: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: eye.extend(1.0).to_array(),
            light: light.position.extend(light.intensity).to_array(),
            light_params: [light.distance, light.decay, fade.clamp(0.0, 1.0), 0.0],
        }
    }
}

/// Per-mesh transform and material, bind group 1 binding 2.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct MaterialUniform {
    pub model: [[f32; 4]; 4],
    /// rgb = linear color, a = opacity.
    pub base_color: [f32; 4],
}

impl MaterialUniform {
    /// `srgb` is the material color as authored; it is linearized here.
    #[must_use]
    pub fn new(model: Mat4, srgb: [f32; 3], opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            base_color: [
                srgb_to_linear(srgb[0]),
                srgb_to_linear(srgb[1]),
                srgb_to_linear(srgb[2]),
                opacity,
            ],
        }
    }
}

/// sRGB transfer function decode for one normalized channel.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct SphereVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl SphereVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Interleave a CPU mesh into vertex records.
    #[must_use]
    pub fn from_mesh(mesh: &SphereMesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .zip(&mesh.uvs)
            .map(|((p, n), uv)| Self {
                position: p.to_array(),
                normal: n.to_array(),
                uv: *uv,
            })
            .collect()
    }
}

/// Opaque and alpha-blended variants of the sphere pipeline, sharing layouts.
pub struct SpherePipeline {
    pub opaque: wgpu::RenderPipeline,
    /// Alpha blending, depth test without depth writes.
    pub transparent: wgpu::RenderPipeline,
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    pub material_bind_group_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
}

impl SpherePipeline {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sphere-shader"),
            source: wgpu::ShaderSource::Wgsl(SPHERE_SHADER_SOURCE.into()),
        });

        let frame_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("sphere-frame-bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<FrameUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let material_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("sphere-material-bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<MaterialUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                ],
            });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sphere-pipeline-layout"),
            bind_group_layouts: &[&frame_bind_group_layout, &material_bind_group_layout],
            immediate_size: 0,
        });

        let build = |label: &str, blend: Option<wgpu::BlendState>, depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[SphereVertex::layout()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthBuffer::FORMAT,
                    depth_write_enabled: depth_write,
                    depth_compare: DepthBuffer::COMPARE_FUNCTION,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                multiview_mask: None,
                cache: None,
            })
        };

        let opaque = build("sphere-opaque-pipeline", None, true);
        let transparent = build(
            "sphere-transparent-pipeline",
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sphere-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        Self {
            opaque,
            transparent,
            frame_bind_group_layout,
            material_bind_group_layout,
            sampler,
        }
    }
}
