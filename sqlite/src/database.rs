//! The shared database handle.
//!
//! [`Database`] owns the SQLite connection and a reflected snapshot of every
//! user table. Queries that take table or column names check them against
//! that snapshot before building SQL, so callers can pass names through from
//! configuration or user input.
//!
//! # Example
//!
//! ```no_run
//! use cihai_sqlite::Database;
//!
//! let db = Database::open("sqlite:////tmp/cihai.db").unwrap();
//! if db.has_table("Unihan") {
//!     if let Some(row) = db.first_by("Unihan", "char", "好").unwrap() {
//!         println!("{:?}", row.text("kDefinition"));
//!     }
//! }
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rusqlite::types::Value;

use crate::error::{Result, SqliteError};
use crate::record::Record;
use crate::schema::{Column, META_TABLE, Table, meta_table_sql, quote_identifier};
use crate::url::DatabaseUrl;

/// Connection to the local store plus its reflected schema.
///
/// All methods take `&self`, so one handle can be shared (e.g. behind an
/// `Rc`) between the application and every dataset. Call
/// [`reflect`](Self::reflect) after changing the schema outside this type.
pub struct Database {
    conn: Connection,
    url: DatabaseUrl,
    tables: RefCell<BTreeMap<String, Table>>,
}

impl Database {
    /// Opens the database named by a `sqlite://` URL and reflects it.
    ///
    /// For file databases the parent directory is created if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::UnsupportedUrl`] for non-SQLite URLs, or an
    /// I/O / database error if the file cannot be created or opened.
    pub fn open(url: &str) -> Result<Self> {
        let parsed = DatabaseUrl::parse(url)?;
        let conn = match &parsed {
            DatabaseUrl::Memory => Connection::open_in_memory()?,
            DatabaseUrl::File(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                Connection::open(path)?
            }
        };
        tracing::debug!(url, "opened database");
        Self::from_connection(conn, parsed)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, DatabaseUrl::Memory)
    }

    fn from_connection(conn: Connection, url: DatabaseUrl) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Self {
            conn,
            url,
            tables: RefCell::new(BTreeMap::new()),
        };
        db.reflect()?;
        Ok(db)
    }

    /// Where this database lives.
    pub fn url(&self) -> &DatabaseUrl {
        &self.url
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Re-reads every user table and its columns from SQLite.
    pub fn reflect(&self) -> Result<()> {
        let names: Vec<String> = self
            .conn
            .prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            )?
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut tables = BTreeMap::new();
        for name in names {
            let columns = self.table_columns(&name)?;
            tables.insert(name.clone(), Table { name, columns });
        }

        tracing::debug!(tables = tables.len(), "reflected database schema");
        *self.tables.borrow_mut() = tables;
        Ok(())
    }

    fn table_columns(&self, table: &str) -> Result<Vec<Column>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;
        let columns = stmt
            .query_map([], |row| {
                Ok(Column {
                    name: row.get(1)?,
                    decl_type: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    not_null: row.get::<_, i64>(3)? != 0,
                    primary_key: row.get::<_, i64>(5)? != 0,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Returns a copy of a reflected table.
    pub fn table(&self, name: &str) -> Option<Table> {
        self.tables.borrow().get(name).cloned()
    }

    /// Names of all reflected tables, sorted.
    pub fn table_names(&self) -> Vec<String> {
        self.tables.borrow().keys().cloned().collect()
    }

    /// Returns `true` if `name` was present at the last reflection.
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.borrow().contains_key(name)
    }

    /// Returns the first row whose `column` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteError::TableNotFound`] / [`SqliteError::ColumnNotFound`]
    /// if the names are not in the reflected schema.
    pub fn first_by(&self, table: &str, column: &str, value: &str) -> Result<Option<Record>> {
        let reflected = self.require_table(table)?;
        require_column(&reflected, column)?;

        let sql = format!(
            "SELECT * FROM {} WHERE {} = ?1 LIMIT 1",
            quote_identifier(table),
            quote_identifier(column)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let names = column_names(&stmt);
        let record = stmt
            .query_row(params![value], |row| read_record(table, &names, row))
            .optional()?;
        Ok(record)
    }

    /// Returns rows where any of `columns` contains any of `hints`.
    ///
    /// Matching uses SQL `LIKE '%hint%'` (case-insensitive for ASCII). An
    /// empty `columns` slice searches every column of the table. Rows come
    /// back in insertion order, capped at `limit` when given.
    pub fn search_any(
        &self,
        table: &str,
        columns: &[&str],
        hints: &[&str],
        limit: Option<usize>,
    ) -> Result<Vec<Record>> {
        let reflected = self.require_table(table)?;
        if hints.is_empty() {
            return Ok(Vec::new());
        }

        let searched: Vec<&str> = if columns.is_empty() {
            reflected.column_names().collect()
        } else {
            for column in columns {
                require_column(&reflected, column)?;
            }
            columns.to_vec()
        };

        let mut clauses = Vec::with_capacity(searched.len() * hints.len());
        for column in &searched {
            for idx in 1..=hints.len() {
                clauses.push(format!("{} LIKE ?{idx}", quote_identifier(column)));
            }
        }

        let mut sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY rowid",
            quote_identifier(table),
            clauses.join(" OR ")
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        let patterns: Vec<String> = hints.iter().map(|hint| format!("%{hint}%")).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let names = column_names(&stmt);
        let records = stmt
            .query_map(params_from_iter(patterns.iter()), |row| {
                read_record(table, &names, row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Counts the rows of a reflected table.
    pub fn count_rows(&self, table: &str) -> Result<usize> {
        self.require_table(table)?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_identifier(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Reads a bookkeeping value, if one was stored.
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        if !self.has_table(META_TABLE) {
            return Ok(None);
        }
        let value = self
            .conn
            .query_row(
                &format!("SELECT value FROM {META_TABLE} WHERE key = ?1"),
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Stores a bookkeeping value, creating the meta table on first use.
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        if !self.has_table(META_TABLE) {
            self.conn.execute_batch(&meta_table_sql())?;
            self.reflect()?;
        }
        self.conn.execute(
            &format!(
                "INSERT INTO {META_TABLE} (key, value, updated_at) VALUES (?1, ?2, datetime('now')) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"
            ),
            params![key, value],
        )?;
        Ok(())
    }

    fn require_table(&self, table: &str) -> Result<Table> {
        self.table(table)
            .ok_or_else(|| SqliteError::TableNotFound(table.to_string()))
    }
}

fn require_column(table: &Table, column: &str) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(SqliteError::ColumnNotFound {
            table: table.name.clone(),
            column: column.to_string(),
        })
    }
}

fn column_names(stmt: &rusqlite::Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(String::from).collect()
}

fn read_record(table: &str, names: &[String], row: &Row<'_>) -> rusqlite::Result<Record> {
    let mut values = Vec::with_capacity(names.len());
    for (idx, name) in names.iter().enumerate() {
        values.push((name.clone(), row.get::<_, Value>(idx)?));
    }
    Ok(Record::new(table, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.connection()
            .execute_batch(
                r#"
CREATE TABLE Unihan (ucn TEXT PRIMARY KEY, char TEXT UNIQUE, kDefinition TEXT, kMandarin TEXT);
INSERT INTO Unihan VALUES ('U+4E00', '一', 'one; a, an; alone', 'yī');
INSERT INTO Unihan VALUES ('U+597D', '好', 'good, excellent, fine; well', 'hǎo');
INSERT INTO Unihan VALUES ('U+4E8C', '二', 'two; twice', 'èr');
"#,
            )
            .unwrap();
        db.reflect().unwrap();
        db
    }

    #[test]
    fn test_reflect_sees_new_tables() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.table_names().is_empty());

        db.connection()
            .execute_batch("CREATE TABLE t (a TEXT NOT NULL, b INTEGER PRIMARY KEY)")
            .unwrap();
        assert!(!db.has_table("t"));

        db.reflect().unwrap();
        let table = db.table("t").unwrap();
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(table.column("a").unwrap().not_null);
        assert!(table.column("b").unwrap().primary_key);
        assert_eq!(table.column("b").unwrap().decl_type, "INTEGER");
    }

    #[test]
    fn test_first_by() {
        let db = seeded();
        let row = db.first_by("Unihan", "char", "好").unwrap().unwrap();
        assert_eq!(row.text("ucn"), Some("U+597D"));
        assert_eq!(row.text("kMandarin"), Some("hǎo"));
        assert!(db.first_by("Unihan", "char", "猫").unwrap().is_none());
    }

    #[test]
    fn test_first_by_unknown_names() {
        let db = seeded();
        assert!(matches!(
            db.first_by("Nope", "char", "x"),
            Err(SqliteError::TableNotFound(_))
        ));
        assert!(matches!(
            db.first_by("Unihan", "char; DROP TABLE Unihan", "x"),
            Err(SqliteError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_search_any_all_columns() {
        let db = seeded();
        let rows = db.search_any("Unihan", &[], &["two"], None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("char"), Some("二"));

        let rows = db.search_any("Unihan", &[], &["one", "good"], None).unwrap();
        let chars: Vec<_> = rows.iter().filter_map(|r| r.text("char")).collect();
        assert_eq!(chars, vec!["一", "好"]);
    }

    #[test]
    fn test_search_any_specific_columns_and_limit() {
        let db = seeded();
        let rows = db
            .search_any("Unihan", &["kDefinition"], &["o"], Some(2))
            .unwrap();
        assert_eq!(rows.len(), 2);

        assert!(db.search_any("Unihan", &["kDefinition"], &[], None).unwrap().is_empty());
        assert!(db.search_any("Unihan", &["nope"], &["o"], None).is_err());
    }

    #[test]
    fn test_count_rows() {
        let db = seeded();
        assert_eq!(db.count_rows("Unihan").unwrap(), 3);
        assert!(db.count_rows("Missing").is_err());
    }

    #[test]
    fn test_meta_roundtrip_and_overwrite() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_meta("source").unwrap(), None);

        db.set_meta("source", "a.zip").unwrap();
        assert!(db.has_table(META_TABLE));
        assert_eq!(db.get_meta("source").unwrap().as_deref(), Some("a.zip"));

        db.set_meta("source", "b.zip").unwrap();
        assert_eq!(db.get_meta("source").unwrap().as_deref(), Some("b.zip"));
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("dir").join("cihai.db");
        let url = format!("sqlite:///{}", path.display());

        let db = Database::open(&url).unwrap();
        assert_eq!(db.url(), &DatabaseUrl::File(path.clone()));
        assert!(path.parent().unwrap().is_dir());
    }
}
