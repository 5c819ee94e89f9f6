//! Reflected schema objects and DDL generation.
//!
//! [`Table`] and [`Column`] are the runtime view of what SQLite reports in
//! `sqlite_master` and `PRAGMA table_info`. The `generate_*` helpers build
//! the DDL the bootstrap step needs, quoting every identifier after checking
//! it contains only ASCII alphanumerics and underscores.

use crate::error::{Result, SqliteError};

/// Name of the bookkeeping table written by [`Database::set_meta`](crate::Database::set_meta).
pub const META_TABLE: &str = "cihai_meta";

/// One column of a reflected table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Declared type as written in the DDL (may be empty).
    pub decl_type: String,
    pub not_null: bool,
    pub primary_key: bool,
}

/// A table reflected from the live database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns `true` if the table has a column called `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Returns `true` if every name in `required` is a column of this table.
    pub fn has_columns<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> bool {
        required.into_iter().all(|name| self.has_column(name))
    }
}

/// Validates that an identifier contains only ASCII alphanumerics and underscores.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SqliteError::InvalidIdentifier(name.to_string()));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SqliteError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Wraps an identifier in double quotes, escaping embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Generates `CREATE TABLE` for a text table keyed on `key`.
///
/// Every column is `TEXT`. `key` becomes the primary key; each name in
/// `unique` is `NOT NULL UNIQUE`; everything in `columns` is nullable.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidIdentifier`] if any name is invalid.
///
/// # Examples
///
/// ```
/// use cihai_sqlite::generate_table_sql;
///
/// let sql = generate_table_sql("Unihan", "ucn", &["char"], &["kDefinition".to_string()]).unwrap();
/// assert!(sql.contains("\"ucn\" TEXT NOT NULL PRIMARY KEY"));
/// assert!(sql.contains("\"char\" TEXT NOT NULL UNIQUE"));
/// assert!(sql.contains("\"kDefinition\" TEXT"));
/// ```
pub fn generate_table_sql(
    table: &str,
    key: &str,
    unique: &[&str],
    columns: &[String],
) -> Result<String> {
    validate_identifier(table)?;
    validate_identifier(key)?;

    let mut defs = vec![format!("    {} TEXT NOT NULL PRIMARY KEY", quote_identifier(key))];
    for name in unique {
        validate_identifier(name)?;
        defs.push(format!("    {} TEXT NOT NULL UNIQUE", quote_identifier(name)));
    }
    for name in columns {
        validate_identifier(name)?;
        defs.push(format!("    {} TEXT", quote_identifier(name)));
    }

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
        quote_identifier(table),
        defs.join(",\n")
    ))
}

/// Generates `DROP TABLE IF EXISTS` for a table.
///
/// # Errors
///
/// Returns [`SqliteError::InvalidIdentifier`] if the name is invalid.
pub fn generate_drop_sql(table: &str) -> Result<String> {
    validate_identifier(table)?;
    Ok(format!("DROP TABLE IF EXISTS {};", quote_identifier(table)))
}

/// DDL for the key/value bookkeeping table.
pub(crate) fn meta_table_sql() -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {META_TABLE} (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#
    )
}
