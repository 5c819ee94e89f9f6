//! Application configuration: defaults, file loading and the typed view.
//!
//! Configuration is resolved in three steps:
//!
//! 1. the user's tree is merged over [`default_config`]
//! 2. optional extra layers (e.g. the UNIHAN dataset defaults) are merged
//!    *under* the result, so user values always win
//! 3. every string is template-expanded against [`AppDirs`]
//!
//! # Example YAML
//!
//! ```yaml
//! debug: false
//! database:
//!   url: "sqlite:///{user_data_dir}/cihai.db"
//! dirs:
//!   cache: "{user_cache_dir}"
//!   log: "{user_log_dir}"
//!   data: "{user_data_dir}"
//! datasets:
//!   unihan: cihai::datasets::Unihan
//! plugins:
//!   unihan:
//!     variants: cihai::datasets::UnihanVariants
//! unihan_options:
//!   fields: [kDefinition, kMandarin]
//! ```

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::appdirs::AppDirs;
use crate::error::{ConfigError, Result};
use crate::expand::expand_templates;
use crate::merge::merge_values;

/// Default database location, before template expansion.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///{user_data_dir}/cihai.db";

/// Returns the built-in default configuration tree.
pub fn default_config() -> Value {
    let mut database = serde_yaml::Mapping::new();
    database.insert("url".into(), DEFAULT_DATABASE_URL.into());

    let mut dirs = serde_yaml::Mapping::new();
    dirs.insert("cache".into(), "{user_cache_dir}".into());
    dirs.insert("log".into(), "{user_log_dir}".into());
    dirs.insert("data".into(), "{user_data_dir}".into());

    let mut root = serde_yaml::Mapping::new();
    root.insert("debug".into(), false.into());
    root.insert("database".into(), Value::Mapping(database));
    root.insert("dirs".into(), Value::Mapping(dirs));
    Value::Mapping(root)
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite:////home/me/.local/share/cihai/cihai.db`.
    pub url: String,
}

/// Working directories used by the application and its datasets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirsConfig {
    pub cache: PathBuf,
    pub log: PathBuf,
    pub data: PathBuf,
}

/// The resolved, template-expanded configuration.
///
/// Known keys are typed. Everything else is kept as raw YAML and can be
/// pulled out with [`Config::section`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub debug: bool,
    pub database: DatabaseConfig,
    pub dirs: DirsConfig,
    /// Dataset namespace → registered path.
    #[serde(default)]
    pub datasets: BTreeMap<String, String>,
    /// Dataset namespace → (plugin namespace → registered path).
    #[serde(default)]
    pub plugins: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl Config {
    /// Resolves a user configuration tree against the defaults.
    ///
    /// `layers` are applied beneath the merged user config, in order, so a
    /// key the user sets is never overridden by a layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPlaceholder`] for bad templates, or
    /// [`ConfigError::YamlError`] if the merged tree does not match the typed
    /// shape (for example `database.url` is not a string).
    pub fn resolve(user: &Value, layers: &[Value], dirs: &AppDirs) -> Result<Self> {
        let mut merged = merge_values(&default_config(), user);
        for layer in layers {
            merged = merge_values(layer, &merged);
        }
        let expanded = expand_templates(&merged, dirs)?;
        let config: Config = serde_yaml::from_value(expanded)?;
        tracing::debug!(
            database = %config.database.url,
            datasets = config.datasets.len(),
            "resolved configuration"
        );
        Ok(config)
    }

    /// Deserializes an untyped top-level section, if present.
    ///
    /// # Examples
    ///
    /// ```
    /// use cihai_core::{AppDirs, Config};
    ///
    /// #[derive(serde::Deserialize)]
    /// struct Opts { fields: Vec<String> }
    ///
    /// let user: serde_yaml::Value =
    ///     serde_yaml::from_str("unihan_options: {fields: [kDefinition]}").unwrap();
    /// let config = Config::resolve(&user, &[], &AppDirs::under_root("/tmp/x")).unwrap();
    /// let opts: Opts = config.section("unihan_options").unwrap().unwrap();
    /// assert_eq!(opts.fields, vec!["kDefinition"]);
    /// ```
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.extra.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_yaml::from_value(value.clone())?)),
        }
    }

    /// Returns the raw value of an untyped top-level key.
    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Reads a configuration tree from a JSON or YAML file.
///
/// The format is picked from the extension: `.json`, or `.yml` / `.yaml`.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file is missing,
/// [`ConfigError::UnsupportedExtension`] for any other extension, or a
/// parse error from the matching format.
pub fn load_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(absolute(path)));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let file = std::fs::File::open(path)?;
    let reader = BufReader::new(file);
    let value = match extension.as_deref() {
        Some("json") => {
            let json: serde_json::Value = serde_json::from_reader(reader)?;
            serde_yaml::to_value(json)?
        }
        Some("yml" | "yaml") => serde_yaml::from_reader(reader)?,
        _ => return Err(ConfigError::UnsupportedExtension(absolute(path))),
    };

    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(value)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(raw: &str) -> Value {
        serde_yaml::from_str(raw).unwrap()
    }

    #[test]
    fn test_defaults_are_expanded() {
        let dirs = AppDirs::under_root("/srv");
        let config = Config::resolve(&Value::Null, &[], &dirs).unwrap();
        assert!(!config.debug);
        assert_eq!(config.database.url, "sqlite:////srv/data/cihai/cihai.db");
        assert_eq!(config.dirs.cache, PathBuf::from("/srv/cache/cihai"));
        assert_eq!(config.dirs.log, PathBuf::from("/srv/cache/cihai/log"));
        assert!(config.datasets.is_empty());
    }

    #[test]
    fn test_user_values_override_defaults() {
        let dirs = AppDirs::under_root("/srv");
        let user = yaml("debug: true\ndatabase: {url: 'sqlite:///:memory:'}");
        let config = Config::resolve(&user, &[], &dirs).unwrap();
        assert!(config.debug);
        assert_eq!(config.database.url, "sqlite:///:memory:");
        // Untouched defaults survive.
        assert_eq!(config.dirs.data, PathBuf::from("/srv/data/cihai"));
    }

    #[test]
    fn test_layers_sit_beneath_user_config() {
        let dirs = AppDirs::under_root("/srv");
        let layer = yaml(
            r#"
datasets:
  unihan: cihai::datasets::Unihan
plugins:
  unihan:
    variants: cihai::datasets::UnihanVariants
"#,
        );
        let user = yaml("plugins: {unihan: {variants: my::Variants}}");

        let config = Config::resolve(&user, &[layer], &dirs).unwrap();
        assert_eq!(config.datasets["unihan"], "cihai::datasets::Unihan");
        assert_eq!(config.plugins["unihan"]["variants"], "my::Variants");
    }

    #[test]
    fn test_section_missing_is_none() {
        let config = Config::resolve(&Value::Null, &[], &AppDirs::under_root("/x")).unwrap();
        let section: Option<BTreeMap<String, String>> = config.section("unihan_options").unwrap();
        assert!(section.is_none());
        assert!(config.raw("unihan_options").is_none());
    }

    #[test]
    fn test_bad_typed_shape_is_error() {
        let user = yaml("database: {url: [1, 2]}");
        let err = Config::resolve(&user, &[], &AppDirs::under_root("/x")).unwrap_err();
        assert!(matches!(err, ConfigError::YamlError(_)));
    }

    #[test]
    fn test_load_file_json_and_yaml() {
        let tmp = tempfile::tempdir().unwrap();

        let json_path = tmp.path().join("config.json");
        std::fs::write(&json_path, r#"{"debug": true, "dirs": {"cache": "/c"}}"#).unwrap();
        let json = load_file(&json_path).unwrap();
        assert_eq!(json["debug"], Value::Bool(true));
        assert_eq!(json["dirs"]["cache"], Value::from("/c"));

        let yaml_path = tmp.path().join("config.yml");
        std::fs::write(&yaml_path, "debug: true\n").unwrap();
        assert_eq!(load_file(&yaml_path).unwrap()["debug"], Value::Bool(true));
    }

    #[test]
    fn test_load_file_missing() {
        let err = load_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_load_file_unsupported_extension() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "debug = true").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedExtension(_)));
    }
}
