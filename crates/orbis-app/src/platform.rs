//! Per-user directories for configuration and logs.

use std::path::{Path, PathBuf};

use crate::error::AppError;

const APP_NAME: &str = "orbis";

/// OS-specific directory paths, following OS conventions (XDG on Linux,
/// Known Folders on Windows, Library on macOS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// JSON log files.
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Resolve directories without creating them on disk.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoConfigDir`] if the OS does not expose a
    /// configuration directory.
    pub fn resolve() -> Result<Self, AppError> {
        let base = dirs::config_dir().ok_or(AppError::NoConfigDir)?;
        Ok(Self::resolve_with_root(&base))
    }

    /// Resolve directories rooted under a custom base path.
    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.clone(),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Directories for an explicit config directory; logs go next to it.
    pub fn from_config_dir(config_dir: &Path) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            log_dir: config_dir.join("logs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_root() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = AppDirs::resolve_with_root(tmp.path());
        assert_eq!(dirs.config_dir, tmp.path().join("orbis"));
        assert!(dirs.log_dir.starts_with(&dirs.config_dir));
    }

    #[test]
    fn test_explicit_config_dir() {
        let dirs = AppDirs::from_config_dir(Path::new("settings"));
        assert_eq!(dirs.config_dir, Path::new("settings"));
        assert_eq!(dirs.log_dir, Path::new("settings").join("logs"));
    }
}
