//! Loading parsed rows into SQLite and the end-to-end bootstrap.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use cihai_sqlite::{Database, generate_drop_sql, generate_table_sql, quote_identifier};
use rusqlite::params_from_iter;

use crate::error::Result;
use crate::extract::extract_files;
use crate::fetch::fetch_archive;
use crate::options::UnihanOptions;
use crate::parse::UnihanRows;

/// Name of the table holding one row per character.
pub const TABLE_NAME: &str = "Unihan";

/// Columns present on every UNIHAN table regardless of the selected fields.
pub const KEY_COLUMNS: [&str; 2] = ["ucn", "char"];

/// `cihai_meta` keys written after a successful bootstrap.
pub mod meta_keys {
    pub const SOURCE: &str = "unihan_source";
    pub const SHA256: &str = "unihan_sha256";
    pub const FIELDS: &str = "unihan_fields";
    pub const BOOTSTRAPPED_AT: &str = "unihan_bootstrapped_at";
}

/// Summary of a bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapReport {
    /// Number of characters written to the table.
    pub rows_inserted: usize,
    /// Fields loaded, in column order.
    pub fields: Vec<String>,
    /// Archive the rows came from.
    pub archive: PathBuf,
    /// Lowercase hex SHA-256 of the archive.
    pub sha256: String,
}

/// Returns `true` if the UNIHAN table exists with every column `options` asks for.
///
/// Works from the database's reflected schema; call
/// [`Database::reflect`] first if the schema may have changed.
pub fn is_bootstrapped(db: &Database, options: &UnihanOptions) -> Result<bool> {
    let Some(table) = db.table(TABLE_NAME) else {
        return Ok(false);
    };
    let plan = options.plan()?;
    let required = KEY_COLUMNS
        .iter()
        .copied()
        .chain(plan.fields.iter().map(String::as_str));
    Ok(table.has_columns(required))
}

/// Replaces the UNIHAN table with `rows`, one column per field.
///
/// Drop, create and every insert run in a single transaction. The schema
/// is reflected again afterwards.
pub fn load_rows(db: &Database, fields: &[String], rows: &UnihanRows) -> Result<usize> {
    let drop_sql = generate_drop_sql(TABLE_NAME)?;
    let create_sql = generate_table_sql(TABLE_NAME, KEY_COLUMNS[0], &KEY_COLUMNS[1..], fields)?;

    let columns: Vec<String> = KEY_COLUMNS
        .iter()
        .copied()
        .chain(fields.iter().map(String::as_str))
        .map(quote_identifier)
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();
    let insert_sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(TABLE_NAME),
        columns.join(", "),
        placeholders.join(", ")
    );

    let tx = db.connection().unchecked_transaction()?;
    tx.execute_batch(&drop_sql)?;
    tx.execute_batch(&create_sql)?;

    let mut inserted = 0usize;
    {
        let mut stmt = tx.prepare(&insert_sql)?;
        for row in rows.iter() {
            let ucn = row.ucn();
            let character = row.character().to_string();
            let mut values: Vec<Option<&str>> = Vec::with_capacity(columns.len());
            values.push(Some(&ucn));
            values.push(Some(&character));
            values.extend(fields.iter().map(|field| row.get(field)));

            stmt.execute(params_from_iter(values))?;
            inserted += 1;
        }
    }
    tx.commit()?;

    db.reflect()?;
    tracing::info!(rows = inserted, fields = fields.len(), "loaded UNIHAN table");
    Ok(inserted)
}

/// Fetches, extracts, parses and loads the UNIHAN dataset.
///
/// # Errors
///
/// Any stage's failure is returned as-is; the existing table is left
/// untouched unless the final load transaction commits.
pub fn bootstrap_unihan(db: &Database, options: &UnihanOptions) -> Result<BootstrapReport> {
    let plan = options.plan()?;
    let archive = fetch_archive(options)?;

    let extract_dir = options.work_dir()?.join("extracted");
    let paths = extract_files(&archive.path, &plan.files, &extract_dir)?;

    let wanted: HashSet<&str> = plan.fields.iter().map(String::as_str).collect();
    let mut rows = UnihanRows::new();
    for (path, name) in paths.iter().zip(&plan.files) {
        let reader = BufReader::new(File::open(path)?);
        rows.read_file(reader, name, &wanted)?;
    }

    let rows_inserted = load_rows(db, &plan.fields, &rows)?;

    db.set_meta(meta_keys::SOURCE, &archive.source)?;
    db.set_meta(meta_keys::SHA256, &archive.sha256)?;
    db.set_meta(meta_keys::FIELDS, &plan.fields.join(","))?;
    db.set_meta(meta_keys::BOOTSTRAPPED_AT, &chrono::Utc::now().to_rfc3339())?;

    Ok(BootstrapReport {
        rows_inserted,
        fields: plan.fields,
        archive: archive.path,
        sha256: archive.sha256,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn rows() -> UnihanRows {
        let mut rows = UnihanRows::new();
        let fields: HashSet<&str> = ["kDefinition", "kMandarin"].into_iter().collect();
        rows.read_file(
            "U+597D\tkDefinition\tgood\nU+597D\tkMandarin\thǎo\nU+4E00\tkDefinition\tone\n"
                .as_bytes(),
            "Unihan_Readings.txt",
            &fields,
        )
        .unwrap();
        rows
    }

    fn fields() -> Vec<String> {
        vec!["kDefinition".to_string(), "kMandarin".to_string()]
    }

    fn options() -> UnihanOptions {
        UnihanOptions {
            fields: fields(),
            ..UnihanOptions::default()
        }
    }

    #[test]
    fn test_load_rows_creates_and_fills_table() {
        let db = Database::open_in_memory().unwrap();
        assert!(!is_bootstrapped(&db, &options()).unwrap());

        assert_eq!(load_rows(&db, &fields(), &rows()).unwrap(), 2);
        assert!(is_bootstrapped(&db, &options()).unwrap());

        let hao = db.first_by(TABLE_NAME, "char", "好").unwrap().unwrap();
        assert_eq!(hao.text("ucn"), Some("U+597D"));
        assert_eq!(hao.text("kMandarin"), Some("hǎo"));

        let yi = db.first_by(TABLE_NAME, "ucn", "U+4E00").unwrap().unwrap();
        assert_eq!(yi.get("kMandarin"), Some(&rusqlite::types::Value::Null));
    }

    #[test]
    fn test_load_rows_replaces_previous_table() {
        let db = Database::open_in_memory().unwrap();
        load_rows(&db, &fields(), &rows()).unwrap();
        load_rows(&db, &["kDefinition".to_string()], &rows()).unwrap();

        let table = db.table(TABLE_NAME).unwrap();
        assert!(!table.has_column("kMandarin"));
        assert_eq!(db.count_rows(TABLE_NAME).unwrap(), 2);
        // The narrower table no longer satisfies the wider field list.
        assert!(!is_bootstrapped(&db, &options()).unwrap());
    }

    #[test]
    fn test_failed_load_keeps_previous_table() {
        let db = Database::open_in_memory().unwrap();
        load_rows(&db, &fields(), &rows()).unwrap();

        // `char` collides with a key column, so CREATE fails after the DROP.
        let err = load_rows(&db, &["char".to_string()], &rows());
        assert!(err.is_err());

        db.reflect().unwrap();
        assert!(is_bootstrapped(&db, &options()).unwrap());
        assert_eq!(db.count_rows(TABLE_NAME).unwrap(), 2);
        let hao = db.first_by(TABLE_NAME, "char", "好").unwrap().unwrap();
        assert_eq!(hao.text("kMandarin"), Some("hǎo"));
    }
}
