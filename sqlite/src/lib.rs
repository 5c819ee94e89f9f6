//! SQLite storage for cihai.
//!
//! This crate wraps a [`rusqlite::Connection`] in a [`Database`] handle that
//! keeps a reflected snapshot of the live schema. Datasets query through the
//! reflected [`Table`] objects instead of hard-coding columns, which lets the
//! bootstrap step decide at runtime which UNIHAN fields exist.
//!
//! # Architecture
//!
//! - **`url`**: parsing of `sqlite://` connection URLs
//! - **`database`**: the shared handle (open, reflect, lookup and search)
//! - **`schema`**: reflected [`Table`]/[`Column`] objects and DDL helpers
//! - **`record`**: rows returned by queries
//!
//! # Quick start
//!
//! ```
//! use cihai_sqlite::Database;
//!
//! let db = Database::open("sqlite:///:memory:").unwrap();
//! db.connection()
//!     .execute_batch("CREATE TABLE Unihan (ucn TEXT PRIMARY KEY, char TEXT);
//!                     INSERT INTO Unihan VALUES ('U+4E00', '一');")
//!     .unwrap();
//! db.reflect().unwrap();
//!
//! let row = db.first_by("Unihan", "char", "一").unwrap().unwrap();
//! assert_eq!(row.text("ucn"), Some("U+4E00"));
//! ```

mod database;
mod error;
mod record;
mod schema;
mod url;

pub use database::Database;
pub use error::{Result, SqliteError};
pub use record::Record;
pub use schema::{
    Column, META_TABLE, Table, generate_drop_sql, generate_table_sql, quote_identifier,
    validate_identifier,
};
pub use url::DatabaseUrl;

pub use rusqlite;
