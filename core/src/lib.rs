//! Configuration loading for cihai.
//!
//! This crate turns a user's configuration (a YAML/JSON file, or a tree
//! built in code) into a resolved [`Config`]:
//!
//! - [`merge_values`] layers user settings over defaults
//! - [`expand_templates`] fills in environment variables, `~` and
//!   OS-standard directories from [`AppDirs`]
//! - [`load_file`] reads `.json`, `.yml` and `.yaml` files
//!
//! # Example
//!
//! ```
//! use cihai_core::{AppDirs, Config};
//!
//! let user: serde_yaml::Value = serde_yaml::from_str("debug: true").unwrap();
//! let config = Config::resolve(&user, &[], &AppDirs::under_root("/tmp/cihai")).unwrap();
//!
//! assert!(config.debug);
//! assert_eq!(config.database.url, "sqlite:////tmp/cihai/data/cihai/cihai.db");
//! ```

mod appdirs;
mod config;
mod error;
mod expand;
mod merge;

pub use appdirs::{APP_NAME, AppDirs};
pub use config::{
    Config, DEFAULT_DATABASE_URL, DatabaseConfig, DirsConfig, default_config, load_file,
};
pub use error::{ConfigError, Result};
pub use expand::expand_templates;
pub use merge::merge_values;
