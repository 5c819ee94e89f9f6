//! Options controlling the UNIHAN bootstrap.
//!
//! Read from the `unihan_options` section of the application config.
//!
//! # Example YAML
//!
//! ```yaml
//! unihan_options:
//!   source: https://www.unicode.org/Public/UNIDATA/Unihan.zip
//!   work_dir: ~/.cache/cihai/unihan
//!   fields: [kDefinition, kMandarin, kTraditionalVariant]
//!   sha256: null
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{BootstrapError, Result};
use crate::manifest;

/// Official download location of the UNIHAN archive.
pub const UNIHAN_URL: &str = "https://www.unicode.org/Public/UNIDATA/Unihan.zip";

/// File name the archive is stored under inside the work directory.
pub const ARCHIVE_NAME: &str = "Unihan.zip";

/// Bootstrap settings.
///
/// Every field has a default, so an empty mapping is a valid configuration
/// that loads every known field from the official archive.
///
/// # Examples
///
/// ```
/// use cihai_bootstrap::UnihanOptions;
///
/// let opts = UnihanOptions {
///     fields: vec!["kDefinition".into(), "kMandarin".into()],
///     ..UnihanOptions::default()
/// };
/// let plan = opts.plan().unwrap();
/// assert_eq!(plan.files, vec!["Unihan_Readings.txt"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnihanOptions {
    /// URL (`http://`, `https://`, `file://`) or local path of the archive.
    pub source: String,
    /// Where the archive is stored and extracted. Falls back to
    /// `cihai/unihan` under the user's cache directory when unset.
    pub work_dir: Option<PathBuf>,
    /// Fields to load. Empty means every known field.
    pub fields: Vec<String>,
    /// Archive members to read. Empty means whatever `fields` needs.
    pub input_files: Vec<String>,
    /// Expected SHA-256 of the archive, hex encoded.
    pub sha256: Option<String>,
}

impl Default for UnihanOptions {
    fn default() -> Self {
        Self {
            source: UNIHAN_URL.to_string(),
            work_dir: None,
            fields: Vec::new(),
            input_files: Vec::new(),
            sha256: None,
        }
    }
}

/// The concrete fields and files a bootstrap run will use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    pub fields: Vec<String>,
    pub files: Vec<String>,
}

impl UnihanOptions {
    /// Resolved work directory.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::NoWorkDir`] when `work_dir` is unset and the
    /// platform has no per-user cache directory.
    pub fn work_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.work_dir {
            return Ok(dir.clone());
        }
        dirs::cache_dir()
            .map(|cache| cache.join("cihai").join("unihan"))
            .ok_or(BootstrapError::NoWorkDir)
    }

    /// Path the archive is stored at inside the work directory.
    pub fn archive_path(&self) -> Result<PathBuf> {
        Ok(self.work_dir()?.join(ARCHIVE_NAME))
    }

    /// Works out which fields to load and which archive members to read.
    ///
    /// - neither set: every field from every file
    /// - only `fields`: the files that carry them
    /// - only `input_files`: every field those files carry
    /// - both: each field must be carried by one of the files
    ///
    /// Duplicates are dropped; order follows the first mention.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::UnknownField`],
    /// [`BootstrapError::UnknownInputFile`] or
    /// [`BootstrapError::FieldNotInFiles`].
    pub fn plan(&self) -> Result<LoadPlan> {
        let files = dedup(&self.input_files);
        for file in &files {
            if manifest::fields_in(file).is_none() {
                return Err(BootstrapError::UnknownInputFile(file.clone()));
            }
        }

        let fields = dedup(&self.fields);
        for field in &fields {
            if manifest::file_for(field).is_none() {
                return Err(BootstrapError::UnknownField(field.clone()));
            }
        }

        match (fields.is_empty(), files.is_empty()) {
            (true, true) => Ok(LoadPlan {
                fields: manifest::all_fields().map(String::from).collect(),
                files: manifest::all_files().map(String::from).collect(),
            }),
            (false, true) => {
                let files = fields
                    .iter()
                    .filter_map(|field| manifest::file_for(field))
                    .map(String::from)
                    .collect::<Vec<_>>();
                Ok(LoadPlan {
                    files: dedup(&files),
                    fields,
                })
            }
            (true, false) => {
                let fields = files
                    .iter()
                    .filter_map(|file| manifest::fields_in(file))
                    .flat_map(|fields| fields.iter().map(|f| f.to_string()))
                    .collect();
                Ok(LoadPlan { fields, files })
            }
            (false, false) => {
                for field in &fields {
                    let carried = manifest::file_for(field)
                        .is_some_and(|file| files.iter().any(|f| f == file));
                    if !carried {
                        return Err(BootstrapError::FieldNotInFiles {
                            field: field.clone(),
                        });
                    }
                }
                Ok(LoadPlan { fields, files })
            }
        }
    }
}

fn dedup(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_is_everything() {
        let plan = UnihanOptions::default().plan().unwrap();
        assert_eq!(plan.files.len(), manifest::UNIHAN_MANIFEST.len());
        assert_eq!(plan.fields.len(), manifest::all_fields().count());
    }

    #[test]
    fn test_fields_select_files() {
        let opts = UnihanOptions {
            fields: vec![
                "kDefinition".into(),
                "kTraditionalVariant".into(),
                "kMandarin".into(),
                "kDefinition".into(),
            ],
            ..UnihanOptions::default()
        };
        let plan = opts.plan().unwrap();
        assert_eq!(plan.fields, vec!["kDefinition", "kTraditionalVariant", "kMandarin"]);
        assert_eq!(plan.files, vec!["Unihan_Readings.txt", "Unihan_Variants.txt"]);
    }

    #[test]
    fn test_files_select_fields() {
        let opts = UnihanOptions {
            input_files: vec!["Unihan_NumericValues.txt".into()],
            ..UnihanOptions::default()
        };
        let plan = opts.plan().unwrap();
        assert_eq!(
            plan.fields,
            vec!["kAccountingNumeric", "kOtherNumeric", "kPrimaryNumeric"]
        );
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        let opts = UnihanOptions {
            fields: vec!["kNotAField".into()],
            ..UnihanOptions::default()
        };
        assert!(matches!(opts.plan(), Err(BootstrapError::UnknownField(_))));

        let opts = UnihanOptions {
            input_files: vec!["Unihan_Nope.txt".into()],
            ..UnihanOptions::default()
        };
        assert!(matches!(opts.plan(), Err(BootstrapError::UnknownInputFile(_))));
    }

    #[test]
    fn test_field_outside_selected_files() {
        let opts = UnihanOptions {
            fields: vec!["kDefinition".into()],
            input_files: vec!["Unihan_Variants.txt".into()],
            ..UnihanOptions::default()
        };
        assert!(matches!(
            opts.plan(),
            Err(BootstrapError::FieldNotInFiles { .. })
        ));
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let opts: UnihanOptions = serde_yaml::from_str("fields: [kDefinition]").unwrap();
        assert_eq!(opts.source, UNIHAN_URL);
        assert_eq!(opts.fields, vec!["kDefinition"]);
        assert!(opts.work_dir.is_none());
    }

    #[test]
    fn test_archive_path_under_work_dir() {
        let opts = UnihanOptions {
            work_dir: Some(PathBuf::from("/cache/unihan")),
            ..UnihanOptions::default()
        };
        assert_eq!(
            opts.archive_path().unwrap(),
            PathBuf::from("/cache/unihan/Unihan.zip")
        );
    }

    #[test]
    fn test_unset_work_dir_is_per_user() {
        let opts = UnihanOptions::default();
        match (opts.work_dir(), dirs::cache_dir()) {
            (Ok(dir), Some(cache)) => assert_eq!(dir, cache.join("cihai").join("unihan")),
            (Err(err), None) => assert!(matches!(err, BootstrapError::NoWorkDir)),
            (dir, cache) => panic!("unexpected work dir {dir:?} for cache dir {cache:?}"),
        }
    }
}
