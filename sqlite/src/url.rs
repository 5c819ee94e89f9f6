//! Parsing of `sqlite://` connection URLs.

use std::path::PathBuf;

use crate::error::{Result, SqliteError};

/// Where a [`Database`](crate::Database) lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// A private in-memory database.
    Memory,
    /// A database file on disk.
    File(PathBuf),
}

impl DatabaseUrl {
    /// Parses a SQLite connection URL.
    ///
    /// Accepted forms:
    ///
    /// - `sqlite://` and `sqlite:///:memory:` → [`DatabaseUrl::Memory`]
    /// - `sqlite:///relative.db` → relative path `relative.db`
    /// - `sqlite:////abs/path.db` → absolute path `/abs/path.db`
    ///
    /// # Examples
    ///
    /// ```
    /// use cihai_sqlite::DatabaseUrl;
    /// use std::path::PathBuf;
    ///
    /// assert_eq!(DatabaseUrl::parse("sqlite://").unwrap(), DatabaseUrl::Memory);
    /// assert_eq!(
    ///     DatabaseUrl::parse("sqlite:////var/lib/cihai.db").unwrap(),
    ///     DatabaseUrl::File(PathBuf::from("/var/lib/cihai.db")),
    /// );
    /// assert!(DatabaseUrl::parse("postgres://localhost/cihai").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let rest = raw
            .strip_prefix("sqlite://")
            .ok_or_else(|| SqliteError::UnsupportedUrl(raw.to_string()))?;

        if rest.is_empty() {
            return Ok(Self::Memory);
        }

        let path = rest
            .strip_prefix('/')
            .ok_or_else(|| SqliteError::UnsupportedUrl(raw.to_string()))?;

        match path {
            "" | ":memory:" => Ok(Self::Memory),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_forms() {
        assert_eq!(DatabaseUrl::parse("sqlite://").unwrap(), DatabaseUrl::Memory);
        assert_eq!(DatabaseUrl::parse("sqlite:///").unwrap(), DatabaseUrl::Memory);
        assert_eq!(
            DatabaseUrl::parse("sqlite:///:memory:").unwrap(),
            DatabaseUrl::Memory
        );
    }

    #[test]
    fn test_relative_and_absolute_files() {
        assert_eq!(
            DatabaseUrl::parse("sqlite:///cihai.db").unwrap(),
            DatabaseUrl::File(PathBuf::from("cihai.db"))
        );
        assert_eq!(
            DatabaseUrl::parse("sqlite:////home/u/.local/share/cihai/cihai.db").unwrap(),
            DatabaseUrl::File(PathBuf::from("/home/u/.local/share/cihai/cihai.db"))
        );
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(DatabaseUrl::parse("postgresql://localhost/db").is_err());
        assert!(DatabaseUrl::parse("cihai.db").is_err());
        assert!(DatabaseUrl::parse("sqlite:/x").is_err());
        assert!(DatabaseUrl::parse("sqlite://host/x.db").is_err());
    }
}
