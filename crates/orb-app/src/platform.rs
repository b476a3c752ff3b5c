//! Per-user directories for the config file and logs.

use std::path::{Path, PathBuf};

use orb_config::{Config, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the viewer keeps `config.ron` and its log files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Use `config_override` when given, the OS config directory otherwise.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self, PlatformError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => Config::default_dir()?,
        };
        Ok(Self::with_root(&config_dir))
    }

    #[must_use]
    pub fn with_root(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            log_dir: config_dir.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| PlatformError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn resolve_and_create(config_override: Option<&Path>) -> Result<Self, PlatformError> {
        let dirs = Self::resolve(config_override)?;
        dirs.create_dirs()?;
        Ok(dirs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve(Some(tmp.path())).unwrap();
        assert_eq!(dirs.config_dir, tmp.path());
        assert_eq!(dirs.log_dir, tmp.path().join("logs"));
    }

    #[test]
    fn test_default_resolves_under_os_config_dir() {
        let Ok(dirs) = PlatformDirs::resolve(None) else {
            return;
        };
        assert!(dirs.config_dir.is_absolute());
        assert!(dirs.log_dir.starts_with(&dirs.config_dir));
    }

    #[test]
    fn test_create_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("orb");
        let dirs = PlatformDirs::resolve_and_create(Some(&root)).unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_create_dirs_reports_path_on_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        let err = PlatformDirs::with_root(&file).create_dirs().unwrap_err();
        assert!(err.to_string().contains("not-a-dir"));
    }
}
