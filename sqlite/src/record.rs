//! Rows returned from reflected tables.

use rusqlite::types::Value;

/// One row of a reflected table, with columns in table order.
///
/// # Examples
///
/// ```
/// use cihai_sqlite::Record;
/// use rusqlite::types::Value;
///
/// let record = Record::new(
///     "Unihan",
///     vec![
///         ("char".into(), Value::Text("好".into())),
///         ("kDefinition".into(), Value::Text("good, excellent".into())),
///         ("kZVariant".into(), Value::Null),
///     ],
/// );
/// assert_eq!(record.text("char"), Some("好"));
/// assert_eq!(record.non_empty().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    table: String,
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn new(table: impl Into<String>, values: Vec<(String, Value)>) -> Self {
        Self {
            table: table.into(),
            values,
        }
    }

    /// Name of the table this row came from.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Raw value of a column, if the column exists.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Text value of a column. `None` for missing columns, NULL and non-text values.
    pub fn text(&self, column: &str) -> Option<&str> {
        match self.get(column)? {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Columns holding a non-NULL, non-empty value, rendered as text.
    pub fn non_empty(&self) -> impl Iterator<Item = (&str, String)> {
        self.values.iter().filter_map(|(name, value)| {
            let rendered = render_value(value)?;
            if rendered.is_empty() {
                None
            } else {
                Some((name.as_str(), rendered))
            }
        })
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(n) => Some(n.to_string()),
        Value::Real(n) => Some(n.to_string()),
        Value::Text(text) => Some(text.clone()),
        Value::Blob(bytes) => Some(format!("<{} bytes>", bytes.len())),
    }
}
