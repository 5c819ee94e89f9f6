//! UNIHAN bootstrap: fetch the archive, extract it, load it into SQLite.
//!
//! The pipeline is linear:
//!
//! 1. [`fetch_archive`] downloads (or copies) `Unihan.zip` into the work
//!    directory, reusing a previous download and verifying an optional
//!    SHA-256
//! 2. [`extract_files`] pulls out the text files the selected fields need
//! 3. [`UnihanRows::read_file`] parses `U+XXXX<TAB>field<TAB>value` lines
//!    into one row per character
//! 4. [`load_rows`] replaces the `Unihan` table in a single transaction
//!
//! [`bootstrap_unihan`] runs all four; [`is_bootstrapped`] tells whether it
//! needs to.
//!
//! # Example
//!
//! ```no_run
//! use cihai_bootstrap::{UnihanOptions, bootstrap_unihan, is_bootstrapped};
//! use cihai_sqlite::Database;
//!
//! let db = Database::open("sqlite:////tmp/cihai.db").unwrap();
//! let options = UnihanOptions {
//!     fields: vec!["kDefinition".into(), "kMandarin".into()],
//!     ..UnihanOptions::default()
//! };
//!
//! if !is_bootstrapped(&db, &options).unwrap() {
//!     let report = bootstrap_unihan(&db, &options).unwrap();
//!     println!("loaded {} characters", report.rows_inserted);
//! }
//! ```

mod error;
mod extract;
mod fetch;
mod load;
pub mod manifest;
mod options;
mod parse;

pub use error::{BootstrapError, Result};
pub use extract::extract_files;
pub use fetch::{ArchiveSource, FetchedArchive, fetch_archive, sha256_file};
pub use load::{
    BootstrapReport, KEY_COLUMNS, TABLE_NAME, bootstrap_unihan, is_bootstrapped, load_rows,
    meta_keys,
};
pub use options::{ARCHIVE_NAME, LoadPlan, UNIHAN_URL, UnihanOptions};
pub use parse::{CharRow, UnihanEntry, UnihanRows, format_ucn, parse_line, parse_ucn};
