//! Error types for the UNIHAN bootstrap.
//!
//! Covers every stage of the pipeline: fetching the archive, extracting
//! members, parsing UNIHAN lines and loading rows.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while bootstrapping the UNIHAN table.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP download failure.
    #[error("download error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The archive is not a readable zip file.
    #[error("archive error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Raw SQLite failure during the bulk load.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Failure from the database handle (reflection, DDL generation).
    #[error("{0}")]
    SqliteError(#[from] cihai_sqlite::SqliteError),

    /// A local archive source does not exist.
    #[error("archive source does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The archive's SHA-256 differs from the configured value.
    #[error("checksum mismatch for {}: expected {expected}, got {actual}", .path.display())]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// No `work_dir` was configured and no per-user cache directory exists.
    #[error("no work directory configured and no user cache directory found")]
    NoWorkDir,

    /// A requested file is not in the archive.
    #[error("archive has no member named {0}")]
    MissingArchiveMember(String),

    /// A requested field is not a known UNIHAN field.
    #[error("unknown UNIHAN field: {0}")]
    UnknownField(String),

    /// A requested input file is not a known UNIHAN file.
    #[error("unknown UNIHAN input file: {0}")]
    UnknownInputFile(String),

    /// A requested field is not carried by any of the requested input files.
    #[error("field {field} is not present in the selected input files")]
    FieldNotInFiles { field: String },

    /// A UNIHAN data line could not be parsed.
    #[error("{file}:{line}: {message}")]
    ParseError {
        file: String,
        line: usize,
        message: String,
    },
}

/// Convenience alias for results with [`BootstrapError`].
pub type Result<T> = std::result::Result<T, BootstrapError>;
