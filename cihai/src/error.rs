//! Error types for the application object and its datasets.

use thiserror::Error;

/// Errors raised while building a [`Cihai`](crate::Cihai) or using its datasets.
#[derive(Debug, Error)]
pub enum CihaiError {
    /// Configuration could not be loaded, merged or expanded.
    #[error(transparent)]
    ConfigError(#[from] cihai_core::ConfigError),

    /// Database open, reflection or query failure.
    #[error(transparent)]
    SqliteError(#[from] cihai_sqlite::SqliteError),

    /// UNIHAN download, extraction or load failure.
    #[error("bootstrap error: {0}")]
    BootstrapError(#[from] cihai_bootstrap::BootstrapError),

    /// A configured dataset or plugin path has no registered constructor.
    #[error("nothing registered under '{0}'")]
    UnresolvedPath(String),

    /// Plugins were configured for a dataset namespace that is not loaded.
    #[error("plugins configured for unknown dataset '{0}'")]
    UnknownDataset(String),

    /// A SQL-aware dataset or plugin was used before a database was attached.
    #[error("no database attached")]
    SqlNotAttached,

    /// The dataset under a namespace is not of the requested type.
    #[error("dataset '{namespace}' is not a {expected}")]
    WrongDatasetType {
        namespace: String,
        expected: &'static str,
    },
}

/// Convenience alias for results with [`CihaiError`].
pub type Result<T> = std::result::Result<T, CihaiError>;
