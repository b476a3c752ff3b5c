//! Configuration for the viewer.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the
//! command line, and tolerate missing or unknown fields so old files keep
//! loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, LightingConfig, RenderConfig, SceneConfig, WindowConfig,
};
pub use error::ConfigError;
