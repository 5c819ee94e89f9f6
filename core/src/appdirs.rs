//! OS-standard application directories.
//!
//! [`AppDirs`] supplies the values substituted for `{user_data_dir}` and
//! friends during template expansion.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Name used for every per-application directory.
pub const APP_NAME: &str = "cihai";

/// Directory locations for one application.
///
/// # Examples
///
/// ```
/// use cihai_core::AppDirs;
///
/// let dirs = AppDirs::under_root("/tmp/sandbox");
/// assert!(dirs.user_data_dir.ends_with("data/cihai"));
/// assert!(dirs.user_log_dir.starts_with(&dirs.user_cache_dir));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub user_data_dir: PathBuf,
    pub user_config_dir: PathBuf,
    pub user_cache_dir: PathBuf,
    pub user_log_dir: PathBuf,
    pub site_data_dir: PathBuf,
    pub site_config_dir: PathBuf,
}

impl AppDirs {
    /// Discovers the directories for [`APP_NAME`] on the current platform.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDirectory`] when the platform does not
    /// report a data, config or cache directory (e.g. `$HOME` is unset).
    pub fn discover() -> Result<Self> {
        Self::discover_for(APP_NAME)
    }

    /// Discovers the directories for an arbitrary application name.
    pub fn discover_for(app: &str) -> Result<Self> {
        let data = dirs::data_dir().ok_or(ConfigError::MissingDirectory("data"))?;
        let config = dirs::config_dir().ok_or(ConfigError::MissingDirectory("config"))?;
        let cache = dirs::cache_dir().ok_or(ConfigError::MissingDirectory("cache"))?;

        let user_cache_dir = cache.join(app);
        Ok(Self {
            user_data_dir: data.join(app),
            user_config_dir: config.join(app),
            user_log_dir: user_cache_dir.join("log"),
            user_cache_dir,
            site_data_dir: first_xdg_entry("XDG_DATA_DIRS", "/usr/local/share").join(app),
            site_config_dir: first_xdg_entry("XDG_CONFIG_DIRS", "/etc/xdg").join(app),
        })
    }

    /// Lays out every directory beneath a single root.
    ///
    /// Useful for tests and for embedding where nothing should touch the
    /// user's real home directory.
    pub fn under_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let user_cache_dir = root.join("cache").join(APP_NAME);
        Self {
            user_data_dir: root.join("data").join(APP_NAME),
            user_config_dir: root.join("config").join(APP_NAME),
            user_log_dir: user_cache_dir.join("log"),
            user_cache_dir,
            site_data_dir: root.join("site-data").join(APP_NAME),
            site_config_dir: root.join("site-config").join(APP_NAME),
        }
    }

    /// Creates the user data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.user_data_dir.exists() {
            tracing::debug!(path = %self.user_data_dir.display(), "creating data directory");
            std::fs::create_dir_all(&self.user_data_dir)?;
        }
        Ok(())
    }

    /// Looks up the directory bound to a template placeholder name.
    pub fn placeholder(&self, name: &str) -> Option<&Path> {
        let path = match name {
            "user_data_dir" => &self.user_data_dir,
            "user_config_dir" => &self.user_config_dir,
            "user_cache_dir" => &self.user_cache_dir,
            "user_log_dir" => &self.user_log_dir,
            "site_data_dir" => &self.site_data_dir,
            "site_config_dir" => &self.site_config_dir,
            _ => return None,
        };
        Some(path.as_path())
    }
}

fn first_xdg_entry(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .and_then(|raw| {
            raw.split(':')
                .find(|entry| !entry.is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_root_layout() {
        let dirs = AppDirs::under_root("/sandbox");
        assert_eq!(dirs.user_data_dir, PathBuf::from("/sandbox/data/cihai"));
        assert_eq!(dirs.user_config_dir, PathBuf::from("/sandbox/config/cihai"));
        assert_eq!(dirs.user_cache_dir, PathBuf::from("/sandbox/cache/cihai"));
        assert_eq!(dirs.user_log_dir, PathBuf::from("/sandbox/cache/cihai/log"));
    }

    #[test]
    fn test_placeholder_lookup() {
        let dirs = AppDirs::under_root("/sandbox");
        assert_eq!(
            dirs.placeholder("user_cache_dir"),
            Some(Path::new("/sandbox/cache/cihai"))
        );
        assert_eq!(
            dirs.placeholder("site_config_dir"),
            Some(Path::new("/sandbox/site-config/cihai"))
        );
        assert!(dirs.placeholder("home").is_none());
    }

    #[test]
    fn test_ensure_data_dir_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = AppDirs::under_root(tmp.path());
        assert!(!dirs.user_data_dir.exists());

        dirs.ensure_data_dir().unwrap();
        assert!(dirs.user_data_dir.is_dir());

        // Second call is a no-op.
        dirs.ensure_data_dir().unwrap();
    }
}
