//! Scene state for the viewer: which scene is showing, how its meshes
//! rotate each frame, the orbiting camera, and the startup fade-in.
//!
//! Nothing here touches the GPU. The renderer reads [`SceneController`]
//! after each tick and draws what it describes.

pub mod lighting;
pub mod mode;
pub mod orbit;
pub mod rotation;
pub mod scene;
pub mod schedule;
pub mod transition;

pub use lighting::PointLight;
pub use mode::{DayNightMode, SceneCommand, SceneMode};
pub use orbit::{OrbitController, OrbitSettings};
pub use rotation::{BODY_RATE, CLOUDS_RATE, MeshTransform, PlanetLayers, RotationAngle};
pub use scene::{
    ActiveScene, BODY_RADIUS, BallScene, CLOUDS_RADIUS, EarthScene, SceneController, SceneSettings,
};
pub use schedule::{FrameCallbackId, FrameScheduler};
pub use transition::FadeIn;
