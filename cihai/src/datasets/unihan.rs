//! The UNIHAN dataset.

use std::any::Any;

use cihai_bootstrap::{BootstrapReport, TABLE_NAME, UnihanOptions};
use cihai_sqlite::Record;

use crate::error::Result;
use crate::extend::{Dataset, Plugins, SqlAccess, SqlSlot};
use crate::registry::Registered;

/// Namespace the UNIHAN dataset is attached under by default.
pub const UNIHAN_NAMESPACE: &str = "unihan";

/// Character lookups against the bootstrapped `Unihan` table.
#[derive(Default)]
pub struct Unihan {
    sql: SqlSlot,
    plugins: Plugins,
}

impl Registered for Unihan {
    const PATH: &'static str = "cihai::datasets::Unihan";
}

impl Dataset for Unihan {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn plugins(&self) -> &Plugins {
        &self.plugins
    }

    fn plugins_mut(&mut self) -> &mut Plugins {
        &mut self.plugins
    }

    fn sql_access(&mut self) -> Option<&mut dyn SqlAccess> {
        Some(&mut self.sql)
    }
}

impl Unihan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the row for `ch`, or `None` if the character is not in the table.
    ///
    /// # Errors
    ///
    /// Fails if no database is attached or the table has not been
    /// bootstrapped yet.
    pub fn lookup_char(&self, ch: char) -> Result<Option<Record>> {
        let db = self.sql.get()?;
        Ok(db.first_by(TABLE_NAME, "char", &ch.to_string())?)
    }

    /// Returns every row where any column contains any of `hints`.
    ///
    /// Handy for reverse lookups such as finding characters by an English
    /// word in `kDefinition` or by a reading.
    pub fn reverse_char(&self, hints: &[&str]) -> Result<Vec<Record>> {
        let db = self.sql.get()?;
        Ok(db.search_any(TABLE_NAME, &[], hints, None)?)
    }

    /// Returns `true` if the table holds every column `options` asks for.
    pub fn is_bootstrapped(&self, options: &UnihanOptions) -> Result<bool> {
        let db = self.sql.get()?;
        Ok(cihai_bootstrap::is_bootstrapped(db, options)?)
    }

    /// Downloads and loads UNIHAN into the attached database.
    pub fn bootstrap(&self, options: &UnihanOptions) -> Result<BootstrapReport> {
        let db = self.sql.get()?;
        Ok(cihai_bootstrap::bootstrap_unihan(db, options)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::rc::Rc;

    use cihai_bootstrap::{UnihanRows, load_rows};
    use cihai_sqlite::Database;

    use super::*;
    use crate::error::CihaiError;

    fn loaded() -> Unihan {
        let db = Database::open_in_memory().unwrap();
        let fields = vec!["kDefinition".to_string(), "kMandarin".to_string()];
        let wanted: HashSet<&str> = fields.iter().map(String::as_str).collect();
        let mut rows = UnihanRows::new();
        rows.read_file(
            "U+4E00\tkDefinition\tone; a, an; alone\n\
             U+4E00\tkMandarin\tyī\n\
             U+597D\tkDefinition\tgood, excellent, fine; well\n\
             U+597D\tkMandarin\thǎo\n\
             U+5B50\tkDefinition\tson, child; seed, egg; fruit\n"
                .as_bytes(),
            "Unihan_Readings.txt",
            &wanted,
        )
        .unwrap();
        load_rows(&db, &fields, &rows).unwrap();

        let mut unihan = Unihan::new();
        unihan.sql.attach_sql(Rc::new(db));
        unihan
    }

    #[test]
    fn test_lookup_char() {
        let unihan = loaded();
        let row = unihan.lookup_char('好').unwrap().unwrap();
        assert_eq!(row.text("ucn"), Some("U+597D"));
        assert_eq!(row.text("kDefinition"), Some("good, excellent, fine; well"));
        assert!(unihan.lookup_char('猫').unwrap().is_none());
    }

    #[test]
    fn test_reverse_char_matches_any_hint() {
        let unihan = loaded();
        let chars: Vec<_> = unihan
            .reverse_char(&["good"])
            .unwrap()
            .iter()
            .filter_map(|row| row.text("char").map(String::from))
            .collect();
        assert_eq!(chars, vec!["好"]);

        let rows = unihan.reverse_char(&["alone", "child"]).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_bootstrapped_fields() {
        let unihan = loaded();
        let narrow = UnihanOptions {
            fields: vec!["kMandarin".into()],
            ..UnihanOptions::default()
        };
        assert!(unihan.is_bootstrapped(&narrow).unwrap());

        let wide = UnihanOptions {
            fields: vec!["kMandarin".into(), "kCantonese".into()],
            ..UnihanOptions::default()
        };
        assert!(!unihan.is_bootstrapped(&wide).unwrap());
    }

    #[test]
    fn test_detached_dataset_errors() {
        let unihan = Unihan::new();
        assert!(matches!(
            unihan.lookup_char('一'),
            Err(CihaiError::SqlNotAttached)
        ));
    }
}
