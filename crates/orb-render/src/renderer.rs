//! Draws the active scene.
//!
//! GPU meshes for a scene are created when that scene first syncs and
//! dropped when another scene replaces it. Textures stay in the cache, so a
//! return trip to the Earth only rebuilds bind groups.

use std::path::PathBuf;
use std::sync::Arc;

use glam::Mat4;
use orb_scene::{ActiveScene, DayNightMode, EarthScene, SceneController, SceneMode};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{FrameUniform, MaterialUniform, SpherePipeline, SphereVertex};
use crate::sphere::generate_uv_sphere;
use crate::texture::{ManagedTexture, Placeholder, TextureCache, TextureError};

/// Locations of the three Earth maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarthTextures {
    pub day: PathBuf,
    pub night: PathBuf,
    pub clouds: PathBuf,
}

/// Renderer construction parameters.
#[derive(Debug, Clone)]
pub struct RendererSettings {
    pub sphere_segments: u32,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub clear_color: [f64; 3],
    pub clouds_opacity: f32,
    pub earth_textures: EarthTextures,
}

/// Uniform buffer and bind group for one drawn sphere.
struct MeshDraw {
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshDraw {
    fn new(
        device: &wgpu::Device,
        pipeline: &SpherePipeline,
        texture: &ManagedTexture,
        label: &str,
    ) -> Self {
        let uniform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<MaterialUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &pipeline.material_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&pipeline.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform.as_entire_binding(),
                },
            ],
        });
        Self {
            uniform,
            bind_group,
        }
    }

    fn write(&self, queue: &wgpu::Queue, material: MaterialUniform) {
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&material));
    }
}

enum SceneDraws {
    Ball(MeshDraw),
    Earth {
        body: MeshDraw,
        clouds: MeshDraw,
        day_night: DayNightMode,
    },
}

impl SceneDraws {
    fn key(&self) -> DrawKey {
        match self {
            Self::Ball(_) => (SceneMode::Ball, None),
            Self::Earth { day_night, .. } => (SceneMode::Earth, Some(*day_night)),
        }
    }
}

/// What a set of GPU meshes was built for. The body texture depends on the
/// day/night mode, so that is part of the key.
type DrawKey = (SceneMode, Option<DayNightMode>);

fn scene_key(active: &ActiveScene) -> DrawKey {
    match active {
        ActiveScene::Ball(_) => (SceneMode::Ball, None),
        ActiveScene::Earth(earth) => (SceneMode::Earth, Some(earth.day_night())),
    }
}

fn faded_clear_color([r, g, b]: [f64; 3], opacity: f32) -> wgpu::Color {
    let fade = f64::from(opacity.clamp(0.0, 1.0));
    wgpu::Color {
        r: r * fade,
        g: g * fade,
        b: b * fade,
        a: 1.0,
    }
}

pub struct SceneRenderer {
    pipeline: SpherePipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    depth: DepthBuffer,
    textures: TextureCache,
    camera: Camera,
    settings: RendererSettings,
    draws: Option<SceneDraws>,
}

impl SceneRenderer {
    pub fn new(ctx: &RenderContext, settings: RendererSettings) -> Self {
        Self::with_device(&ctx.device, ctx.surface_format, ctx.size(), settings)
    }

    /// Builds a renderer for any device, without a window surface.
    pub fn with_device(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        (width, height): (u32, u32),
        settings: RendererSettings,
    ) -> Self {
        let pipeline = SpherePipeline::new(device, surface_format);

        let mesh = generate_uv_sphere(settings.sphere_segments, settings.sphere_segments);
        let vertices = SphereVertex::from_mesh(&mesh);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere-vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere-indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bg"),
            layout: &pipeline.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let depth = DepthBuffer::new(device, width, height);
        let mut camera = Camera::looking_at_origin(
            glam::Vec3::Z,
            settings.fov_deg,
            1.0,
            settings.near,
            settings.far,
        );
        camera.set_aspect_ratio(width, height);

        log::info!(
            "Sphere mesh: {} vertices, {} triangles",
            vertices.len(),
            mesh.indices.len() / 3
        );

        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            frame_buffer,
            frame_bind_group,
            depth,
            textures: TextureCache::new(),
            camera,
            settings,
            draws: None,
        }
    }

    /// Takes new settings without rebuilding the pipeline. Changed texture
    /// paths drop the current meshes so the next [`sync`](Self::sync) reloads
    /// them; the sphere mesh keeps its segment count until restart.
    pub fn apply_settings(&mut self, settings: RendererSettings) {
        if settings.sphere_segments != self.settings.sphere_segments {
            log::warn!(
                "Sphere segment change ({} -> {}) applies after restart",
                self.settings.sphere_segments,
                settings.sphere_segments
            );
        }
        if settings.earth_textures != self.settings.earth_textures {
            self.draws = None;
        }
        self.camera.fov_y = settings.fov_deg.to_radians();
        self.camera.near = settings.near;
        self.camera.far = settings.far;
        let segments = self.settings.sphere_segments;
        self.settings = RendererSettings {
            sphere_segments: segments,
            ..settings
        };
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        self.camera.set_aspect_ratio(width, height);
    }

    /// Bring GPU meshes in line with the active scene.
    ///
    /// On entering the Earth scene this loads its maps and only then mounts
    /// the body and cloud layers, so rotation starts with the first visible
    /// frame.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &mut SceneController,
    ) -> Result<(), TextureError> {
        let wanted = scene_key(scene.active());
        if self.draws.as_ref().map(SceneDraws::key) != Some(wanted) {
            // Release the previous scene's buffers before building new ones.
            self.draws = None;
            self.draws = Some(match scene.active() {
                ActiveScene::Ball(_) => {
                    let white = self.textures.white(device, queue)?;
                    SceneDraws::Ball(MeshDraw::new(device, &self.pipeline, &white, "ball"))
                }
                ActiveScene::Earth(earth) => self.build_earth(device, queue, earth)?,
            });
            log::debug!(
                "Rebuilt GPU meshes for {} ({} textures cached)",
                wanted.0.label(),
                self.cached_textures()
            );
        }

        if let ActiveScene::Earth(earth) = scene.active_mut() {
            earth.mount_body();
            earth.mount_clouds();
        }
        Ok(())
    }

    fn build_earth(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        earth: &EarthScene,
    ) -> Result<SceneDraws, TextureError> {
        let paths = self.settings.earth_textures.clone();
        let day_night = earth.day_night();
        let body_texture: Arc<ManagedTexture> = match day_night {
            DayNightMode::Day => {
                self.textures
                    .load_or_placeholder(device, queue, &paths.day, Placeholder::Day)?
            }
            DayNightMode::Night => {
                self.textures
                    .load_or_placeholder(device, queue, &paths.night, Placeholder::Night)?
            }
        };
        let clouds_texture =
            self.textures
                .load_or_placeholder(device, queue, &paths.clouds, Placeholder::Clouds)?;

        Ok(SceneDraws::Earth {
            body: MeshDraw::new(device, &self.pipeline, &body_texture, "earth-body"),
            clouds: MeshDraw::new(device, &self.pipeline, &clouds_texture, "earth-clouds"),
            day_night,
        })
    }

    /// Upload this frame's uniforms and draw. Call after [`sync`](Self::sync).
    pub fn render(
        &mut self,
        ctx: &RenderContext,
        scene: &SceneController,
    ) -> Result<(), SurfaceError> {
        self.camera.eye = scene.eye();
        let light = scene.light();
        let opacity = scene.opacity();
        let frame = FrameUniform::new(
            self.camera.view_projection_matrix(),
            self.camera.eye,
            &light,
            opacity,
        );
        ctx.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let Some(draws) = &self.draws else {
            return Ok(());
        };
        let mut visible: Vec<(&MeshDraw, bool)> = Vec::with_capacity(2);
        match (draws, scene.active()) {
            (SceneDraws::Ball(draw), ActiveScene::Ball(ball)) => {
                draw.write(
                    &ctx.queue,
                    MaterialUniform::new(Mat4::IDENTITY, ball.color().to_srgb_f32(), 1.0),
                );
                visible.push((draw, false));
            }
            (SceneDraws::Earth { body, clouds, .. }, ActiveScene::Earth(earth)) => {
                let layers = earth.layers();
                if let Some(t) = layers.body {
                    body.write(
                        &ctx.queue,
                        MaterialUniform::new(t.model_matrix(), [1.0; 3], 1.0),
                    );
                    visible.push((body, false));
                }
                if let Some(t) = layers.clouds {
                    clouds.write(
                        &ctx.queue,
                        MaterialUniform::new(
                            t.model_matrix(),
                            [1.0; 3],
                            self.settings.clouds_opacity,
                        ),
                    );
                    visible.push((clouds, true));
                }
            }
            _ => log::debug!("GPU meshes out of date, drawing background only"),
        }

        let surface_texture = ctx.get_current_texture()?;
        let mut encoder = FrameEncoder::new(&ctx.device, Arc::clone(&ctx.queue), surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .label("scene-pass")
                .clear_color(faded_clear_color(self.settings.clear_color, opacity))
                .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE);
            let mut pass = encoder.begin_render_pass(&builder);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            // Opaque meshes were pushed first; transparent ones follow.
            for (draw, transparent) in visible {
                pass.set_pipeline(if transparent {
                    &self.pipeline.transparent
                } else {
                    &self.pipeline.opaque
                });
                pass.set_bind_group(1, &draw.bind_group, &[]);
                pass.draw_indexed(0..self.index_count, 0, 0..1);
            }
        }
        encoder.submit();
        Ok(())
    }

    #[must_use]
    pub fn cached_textures(&self) -> usize {
        self.textures.len()
    }
}
