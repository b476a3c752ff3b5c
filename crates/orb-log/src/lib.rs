//! Logging setup for the viewer.
//!
//! Installs a `tracing` subscriber with a human-readable console layer and,
//! in debug builds, a JSON file layer. `log` records from wgpu and the config
//! crate flow into the same subscriber.

use std::path::{Path, PathBuf};

use orb_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when neither `RUST_LOG` nor the config supply one.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log written in debug builds.
pub const LOG_FILE_NAME: &str = "orb.log";

/// Picks the filter directive: the config's `debug.log_level` when set,
/// otherwise [`DEFAULT_FILTER`]. `RUST_LOG` still wins at init time.
#[must_use]
pub fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .map_or_else(|| DEFAULT_FILTER.to_string(), str::to_string)
}

/// Path of the debug log file inside `log_dir`.
#[must_use]
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Install the global subscriber. Call once, early in `main`.
///
/// `log_dir` is only used when `debug_build` is true; if the directory or
/// file cannot be created the console layer is installed on its own.
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let directive = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_file_path(log_dir))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        tracing::debug!(dir = %log_dir.display(), "file logging enabled");
        return;
    }

    subscriber.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_without_config() {
        assert_eq!(filter_directive(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_config_level_used() {
        let mut config = Config::default();
        config.debug.log_level = "debug,orb_render=trace".to_string();
        assert_eq!(filter_directive(Some(&config)), "debug,orb_render=trace");
    }

    #[test]
    fn test_blank_config_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "   ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_directives_parse() {
        for directive in [DEFAULT_FILTER, "info", "warn,orb_scene=debug", "trace"] {
            assert!(
                EnvFilter::try_new(directive).is_ok(),
                "failed to parse filter: {directive}"
            );
        }
    }

    #[test]
    fn test_log_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path());
        assert_eq!(path.file_name().unwrap(), "orb.log");
        assert!(path.starts_with(dir.path()));
    }
}
