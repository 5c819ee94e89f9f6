//! Parsing of UNIHAN data files.
//!
//! Each data line is `U+XXXX<TAB>field<TAB>value`. Lines starting with `#`
//! and blank lines are ignored. Rows are collected per code point so the
//! loader can write one table row per character.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::BufRead;

use crate::error::{BootstrapError, Result};

/// A single `code point / field / value` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnihanEntry<'a> {
    pub code_point: u32,
    pub field: &'a str,
    pub value: &'a str,
}

/// Parses one line. Returns `Ok(None)` for comments and blank lines.
///
/// # Examples
///
/// ```
/// use cihai_bootstrap::parse_line;
///
/// let entry = parse_line("U+597D\tkDefinition\tgood, excellent, fine; well").unwrap().unwrap();
/// assert_eq!(entry.code_point, 0x597D);
/// assert_eq!(entry.field, "kDefinition");
///
/// assert!(parse_line("# Unihan_Readings.txt").unwrap().is_none());
/// assert!(parse_line("U+597D kDefinition").is_err());
/// ```
pub fn parse_line(line: &str) -> std::result::Result<Option<UnihanEntry<'_>>, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.splitn(3, '\t');
    let (Some(ucn), Some(field), Some(value)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected 3 tab-separated columns, got {line:?}"));
    };

    let code_point = parse_ucn(ucn)?;
    if field.is_empty() {
        return Err("empty field name".to_string());
    }

    Ok(Some(UnihanEntry {
        code_point,
        field,
        value,
    }))
}

/// Parses a `U+XXXX` code point notation.
pub fn parse_ucn(ucn: &str) -> std::result::Result<u32, String> {
    let hex = ucn
        .strip_prefix("U+")
        .ok_or_else(|| format!("code point {ucn:?} does not start with U+"))?;
    let code_point =
        u32::from_str_radix(hex, 16).map_err(|_| format!("invalid code point {ucn:?}"))?;
    if char::from_u32(code_point).is_none() {
        return Err(format!("code point {ucn:?} is not a Unicode scalar value"));
    }
    Ok(code_point)
}

/// Formats a code point in `U+XXXX` notation (at least four hex digits).
pub fn format_ucn(code_point: u32) -> String {
    format!("U+{code_point:04X}")
}

/// Field values for every code point seen so far, ordered by code point.
#[derive(Debug, Default)]
pub struct UnihanRows {
    rows: BTreeMap<u32, HashMap<String, String>>,
}

/// One character's worth of field values.
#[derive(Debug, Clone, Copy)]
pub struct CharRow<'a> {
    pub code_point: u32,
    values: &'a HashMap<String, String>,
}

impl CharRow<'_> {
    pub fn ucn(&self) -> String {
        format_ucn(self.code_point)
    }

    pub fn character(&self) -> char {
        // Code points are checked in `parse_ucn` before they get here.
        char::from_u32(self.code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

impl UnihanRows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one entry. A repeated field for the same character keeps the last value.
    pub fn insert(&mut self, entry: &UnihanEntry<'_>) {
        self.rows
            .entry(entry.code_point)
            .or_default()
            .insert(entry.field.to_string(), entry.value.to_string());
    }

    /// Number of distinct characters.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in code point order.
    pub fn iter(&self) -> impl Iterator<Item = CharRow<'_>> {
        self.rows.iter().map(|(code_point, values)| CharRow {
            code_point: *code_point,
            values,
        })
    }

    /// Reads every line of one UNIHAN file, keeping only `fields`.
    ///
    /// `file` is used in error messages only.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ParseError`] with the 1-based line number of
    /// the first malformed line.
    pub fn read_file(
        &mut self,
        reader: impl BufRead,
        file: &str,
        fields: &HashSet<&str>,
    ) -> Result<usize> {
        let mut kept = 0usize;
        let mut skipped: HashSet<String> = HashSet::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let entry = parse_line(&line).map_err(|message| BootstrapError::ParseError {
                file: file.to_string(),
                line: idx + 1,
                message,
            })?;
            let Some(entry) = entry else {
                continue;
            };

            if fields.contains(entry.field) {
                self.insert(&entry);
                kept += 1;
            } else if skipped.insert(entry.field.to_string()) {
                tracing::debug!(file, field = entry.field, "skipping unrequested field");
            }
        }

        tracing::debug!(file, entries = kept, "parsed UNIHAN file");
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const READINGS: &str = "\
# Unihan_Readings.txt
# Date: 2018-05-18

U+4E00\tkDefinition\tone; a, an; alone
U+4E00\tkMandarin\tyī
U+597D\tkDefinition\tgood, excellent, fine; well
U+597D\tkMandarin\thǎo
U+597D\tkCantonese\thou2 hou3
U+20000\tkDefinition\t(same as U+5344 十) ten
";

    #[test]
    fn test_parse_line_value_keeps_tabs_after_second() {
        let entry = parse_line("U+4E00\tkDefinition\ta\tb").unwrap().unwrap();
        assert_eq!(entry.value, "a\tb");
    }

    #[test]
    fn test_parse_line_strips_crlf() {
        let entry = parse_line("U+4E00\tkMandarin\tyī\r\n").unwrap().unwrap();
        assert_eq!(entry.value, "yī");
    }

    #[test]
    fn test_parse_ucn() {
        assert_eq!(parse_ucn("U+4E00").unwrap(), 0x4E00);
        assert_eq!(parse_ucn("U+2A6D6").unwrap(), 0x2A6D6);
        assert!(parse_ucn("4E00").is_err());
        assert!(parse_ucn("U+XYZ").is_err());
        assert!(parse_ucn("U+D800").is_err());
    }

    #[test]
    fn test_format_ucn_pads_to_four_digits() {
        assert_eq!(format_ucn(0x4E00), "U+4E00");
        assert_eq!(format_ucn(0x20000), "U+20000");
        assert_eq!(format_ucn(0x41), "U+0041");
    }

    #[test]
    fn test_read_file_filters_fields_and_orders_rows() {
        let mut rows = UnihanRows::new();
        let fields: HashSet<&str> = ["kDefinition", "kMandarin"].into_iter().collect();

        let kept = rows
            .read_file(READINGS.as_bytes(), "Unihan_Readings.txt", &fields)
            .unwrap();
        assert_eq!(kept, 5);
        assert_eq!(rows.len(), 3);

        let collected: Vec<_> = rows.iter().collect();
        assert_eq!(collected[0].ucn(), "U+4E00");
        assert_eq!(collected[0].character(), '一');
        assert_eq!(collected[1].get("kMandarin"), Some("hǎo"));
        assert_eq!(collected[1].get("kCantonese"), None);
        assert_eq!(collected[2].ucn(), "U+20000");
        assert_eq!(collected[2].get("kMandarin"), None);
    }

    #[test]
    fn test_read_file_reports_line_number() {
        let mut rows = UnihanRows::new();
        let fields: HashSet<&str> = ["kDefinition"].into_iter().collect();
        let body = "# header\nU+4E00\tkDefinition\tone\nbroken line\n";

        let err = rows
            .read_file(body.as_bytes(), "Unihan_Readings.txt", &fields)
            .unwrap_err();
        match err {
            BootstrapError::ParseError { file, line, .. } => {
                assert_eq!(file, "Unihan_Readings.txt");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rows_merge_across_files() {
        let mut rows = UnihanRows::new();
        let fields: HashSet<&str> = ["kDefinition", "kTraditionalVariant"].into_iter().collect();
        rows.read_file("U+4E07\tkDefinition\tten thousand\n".as_bytes(), "a", &fields)
            .unwrap();
        rows.read_file("U+4E07\tkTraditionalVariant\tU+842C\n".as_bytes(), "b", &fields)
            .unwrap();

        assert_eq!(rows.len(), 1);
        let row = rows.iter().next().unwrap();
        assert_eq!(row.get("kDefinition"), Some("ten thousand"));
        assert_eq!(row.get("kTraditionalVariant"), Some("U+842C"));
    }
}
