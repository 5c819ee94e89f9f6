//! Error types for SQLite database operations.

use thiserror::Error;

/// Errors that can occur while opening, reflecting or querying the database.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// File I/O failure (creating the database directory).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The connection URL is not a SQLite URL we understand.
    #[error("unsupported database url '{0}': expected sqlite:///<path> or sqlite:///:memory:")]
    UnsupportedUrl(String),

    /// A table or column name contains characters we refuse to interpolate.
    #[error("invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),

    /// The table is not present in the reflected schema.
    #[error("no such table: {0}")]
    TableNotFound(String),

    /// The column is not present on the reflected table.
    #[error("no such column: {table}.{column}")]
    ColumnNotFound { table: String, column: String },
}

/// Convenience alias for results with [`SqliteError`].
pub type Result<T> = std::result::Result<T, SqliteError>;
