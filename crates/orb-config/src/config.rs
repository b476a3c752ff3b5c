//! Configuration sections, their defaults, and RON persistence.

use std::path::{Path, PathBuf};

use glam::Vec3;
use orb_scene::{DayNightMode, OrbitSettings, PointLight, SceneMode, SceneSettings};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const FILE_NAME: &str = "config.ron";
const APP_DIR: &str = "orb";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub lighting: LightingConfig,
    pub render: RenderConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Inner width in logical pixels.
    pub width: u32,
    /// Inner height in logical pixels.
    pub height: u32,
    pub fullscreen: bool,
    /// Present with `Fifo` when true, `AutoNoVsync` otherwise.
    pub vsync: bool,
    pub title: String,
}

/// Perspective and orbit-control settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    /// Starting distance from the origin.
    pub distance: f32,
    pub rotate_speed: f32,
    pub auto_rotate: bool,
    /// Turns per minute while the ball is showing.
    pub ball_auto_rotate_speed: f32,
    /// Turns per minute while the Earth is showing.
    pub earth_auto_rotate_speed: f32,
    pub enable_zoom: bool,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
}

/// Startup scene and Earth texture locations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub initial_scene: SceneMode,
    pub initial_day_night: DayNightMode,
    /// Directory holding the Earth maps. Relative paths resolve against the
    /// working directory.
    pub assets_dir: PathBuf,
    pub day_texture: String,
    pub night_texture: String,
    pub clouds_texture: String,
    pub clouds_opacity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
    pub position: [f32; 3],
    pub ball_intensity: f32,
    pub earth_intensity: f32,
    /// Cutoff distance; 0 disables the range window.
    pub distance: f32,
    pub decay: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Width and height segments of the sphere meshes.
    pub sphere_segments: u32,
    /// Startup fade from black, in seconds. 0 disables it.
    pub fade_in_secs: f64,
    /// Linear RGB behind the scene.
    pub clear_color: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "The Ball".to_string(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let orbit = OrbitSettings::default();
        Self {
            fov_deg: 45.0,
            near: 0.1,
            far: 100.0,
            distance: orbit.distance,
            rotate_speed: orbit.rotate_speed,
            auto_rotate: orbit.auto_rotate,
            ball_auto_rotate_speed: 5.0,
            earth_auto_rotate_speed: 0.3,
            enable_zoom: orbit.enable_zoom,
            zoom_speed: orbit.zoom_speed,
            min_distance: orbit.min_distance,
            max_distance: orbit.max_distance,
            enable_damping: orbit.enable_damping,
            damping_factor: orbit.damping_factor,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            initial_scene: SceneMode::Ball,
            initial_day_night: DayNightMode::Day,
            assets_dir: PathBuf::from("assets"),
            day_texture: "2k_earth_daymap.jpg".to_string(),
            night_texture: "2k_earth_nightmap.jpg".to_string(),
            clouds_texture: "2k_earth_clouds.jpg".to_string(),
            clouds_opacity: 0.1,
        }
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 10.0],
            ball_intensity: 200.0,
            earth_intensity: 800.0,
            distance: 100.0,
            decay: 2.0,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sphere_segments: 64,
            fade_in_secs: 1.0,
            clear_color: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Per-user config directory, e.g. `~/.config/orb` on Linux.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or write and return defaults.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(FILE_NAME);
        if path.exists() {
            let config = Self::read(&path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let path = config_dir.join(FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        std::fs::write(&path, serialized).map_err(|source| ConfigError::Write { path, source })
    }

    /// Re-reads the file; `Some` only when its contents differ from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let fresh = Self::read(&config_dir.join(FILE_NAME))?;
        if &fresh != self {
            log::info!("Config reloaded with changes");
            Ok(Some(fresh))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Scene-layer settings derived from the camera, lighting and render
    /// sections.
    #[must_use]
    pub fn scene_settings(&self) -> SceneSettings {
        let cam = &self.camera;
        let light = &self.lighting;
        SceneSettings {
            orbit: OrbitSettings {
                distance: cam.distance,
                rotate_speed: cam.rotate_speed,
                auto_rotate: cam.auto_rotate,
                auto_rotate_speed: cam.ball_auto_rotate_speed,
                enable_zoom: cam.enable_zoom,
                zoom_speed: cam.zoom_speed,
                min_distance: cam.min_distance,
                max_distance: cam.max_distance,
                enable_damping: cam.enable_damping,
                damping_factor: cam.damping_factor,
            },
            ball_auto_rotate_speed: cam.ball_auto_rotate_speed,
            earth_auto_rotate_speed: cam.earth_auto_rotate_speed,
            light: PointLight {
                position: Vec3::from_array(light.position),
                intensity: light.ball_intensity,
                distance: light.distance,
                decay: light.decay,
            },
            ball_light_intensity: light.ball_intensity,
            earth_light_intensity: light.earth_intensity,
            fade_in_secs: self.render.fade_in_secs,
        }
    }

    /// Resolved paths of the day, night and cloud maps.
    #[must_use]
    pub fn texture_paths(&self) -> [PathBuf; 3] {
        let s = &self.scene;
        [
            s.assets_dir.join(&s.day_texture),
            s.assets_dir.join(&s.night_texture),
            s.assets_dir.join(&s.clouds_texture),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let ron_str =
            ron::ser::to_string_pretty(&Config::default(), ron::ser::PrettyConfig::new()).unwrap();
        assert!(ron_str.contains("width: 1280"));
        assert!(ron_str.contains("initial_scene: Ball"));
        assert!(ron_str.contains("2k_earth_daymap.jpg"));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = ron::from_str("(window: (width: 640))").unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.lighting, LightingConfig::default());
        assert_eq!(config.camera.fov_deg, 45.0);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true, scene: (moon: 1))");
        assert!(result.is_ok());
    }

    #[test]
    fn test_enum_fields_parse() {
        let config: Config =
            ron::from_str("(scene: (initial_scene: Earth, initial_day_night: Night))").unwrap();
        assert_eq!(config.scene.initial_scene, SceneMode::Earth);
        assert_eq!(config.scene.initial_day_night, DayNightMode::Night);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1920;
        config.scene.assets_dir = PathBuf::from("/srv/textures");
        config.lighting.earth_intensity = 640.0;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested");
        let config = Config::load_or_create(&sub).unwrap();
        assert_eq!(config, Config::default());
        assert!(sub.join(FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());

        let mut modified = config.clone();
        modified.camera.earth_auto_rotate_speed = 1.0;
        modified.save(dir.path()).unwrap();

        let reloaded = config.reload(dir.path()).unwrap().expect("change detected");
        assert_eq!(reloaded.camera.earth_auto_rotate_speed, 1.0);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE_NAME), "{{not ron}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(FILE_NAME));
    }

    #[test]
    fn test_scene_settings_mapping() {
        let mut config = Config::default();
        config.lighting.position = [1.0, 2.0, 3.0];
        config.camera.earth_auto_rotate_speed = 0.6;
        let s = config.scene_settings();
        assert_eq!(s.light.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(s.earth_auto_rotate_speed, 0.6);
        assert_eq!(s.ball_light_intensity, 200.0);
        assert_eq!(s.earth_light_intensity, 800.0);
        assert_eq!(s.orbit.distance, 4.0);
    }

    #[test]
    fn test_default_settings_match_scene_defaults() {
        assert_eq!(Config::default().scene_settings(), SceneSettings::default());
    }

    #[test]
    fn test_texture_paths() {
        let [day, night, clouds] = Config::default().texture_paths();
        assert_eq!(day, Path::new("assets/2k_earth_daymap.jpg"));
        assert_eq!(night, Path::new("assets/2k_earth_nightmap.jpg"));
        assert_eq!(clouds, Path::new("assets/2k_earth_clouds.jpg"));
    }
}
