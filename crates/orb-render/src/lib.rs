//! wgpu rendering for the viewer: device setup, the lit sphere pipeline,
//! Earth texture loading, and per-frame drawing of the active scene.

pub mod camera;
pub mod depth;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod renderer;
pub mod sphere;
pub mod texture;

pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use pipeline::{FrameUniform, MaterialUniform, SpherePipeline, SphereVertex, srgb_to_linear};
pub use renderer::{EarthTextures, RendererSettings, SceneRenderer};
pub use sphere::{SphereMesh, generate_uv_sphere};
pub use texture::{ManagedTexture, Placeholder, TextureCache, TextureError};
