//! The viewer binary.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags, e.g. `orb --scene earth --night --width 1920 --height 1080`.

use std::process::ExitCode;

use clap::Parser;
use orb_app::App;
use orb_app::platform::PlatformDirs;
use orb_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_and_create(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };

    let on_disk = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let mut config = on_disk.clone();
    config.apply_cli_overrides(&args);

    orb_log::init_logging(Some(dirs.log_dir.as_path()), cfg!(debug_assertions), Some(&config));
    info!(
        config_dir = %dirs.config_dir.display(),
        scene = config.scene.initial_scene.label(),
        "starting viewer"
    );

    let app = App::new(config).with_config_source(dirs.config_dir, on_disk, args);
    match orb_app::run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
