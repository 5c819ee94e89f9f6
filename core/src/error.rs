//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or value conversion failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The configuration file does not exist.
    #[error("{} does not exist.", .0.display())]
    NotFound(PathBuf),

    /// The configuration file extension is not one we can read.
    #[error("{} does not have a yaml, yml or json extension.", .0.display())]
    UnsupportedExtension(PathBuf),

    /// A `{name}` template placeholder has no known expansion.
    #[error("unknown placeholder '{{{0}}}' in config value '{1}'")]
    UnknownPlaceholder(String, String),

    /// The platform did not report a directory we need.
    #[error("could not determine {0} directory")]
    MissingDirectory(&'static str),
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
