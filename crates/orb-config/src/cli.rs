//! Command-line overrides.

use std::path::PathBuf;

use clap::Parser;
use orb_scene::{DayNightMode, SceneMode};

use crate::Config;

/// CLI values take precedence over `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orb", about = "Spin a ball or the Earth")]
pub struct CliArgs {
    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Scene to show first: `ball` or `earth`.
    #[arg(long)]
    pub scene: Option<SceneMode>,

    /// Start the Earth on its night map.
    #[arg(long)]
    pub night: bool,

    /// Directory containing the Earth textures.
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace, or a full directive).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Config directory (overrides the platform default).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(scene) = args.scene {
            self.scene.initial_scene = scene;
        }
        if args.night {
            self.scene.initial_day_night = DayNightMode::Night;
        }
        if let Some(ref dir) = args.assets {
            self.scene.assets_dir = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs::parse_from(["orb", "--width", "1920", "--scene", "earth", "--night"]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.scene.initial_scene, SceneMode::Earth);
        assert_eq!(config.scene.initial_day_night, DayNightMode::Night);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_assets_and_log_level() {
        let mut config = Config::default();
        let args = CliArgs::parse_from(["orb", "--assets", "/tmp/maps", "--log-level", "debug"]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.scene.assets_dir, PathBuf::from("/tmp/maps"));
        assert_eq!(config.debug.log_level, "debug");
    }

    #[test]
    fn test_unknown_scene_rejected() {
        assert!(CliArgs::try_parse_from(["orb", "--scene", "mars"]).is_err());
    }
}
