//! Extracting UNIHAN text files from the archive.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;
use zip::result::ZipError;

use crate::error::{BootstrapError, Result};

/// Extracts `members` from `archive` into `dest` and returns the written paths.
///
/// Member names are taken as-is from the archive root, which is where
/// `Unihan.zip` keeps its files.
///
/// # Errors
///
/// Returns [`BootstrapError::MissingArchiveMember`] for a name that is not
/// in the archive, or [`BootstrapError::ZipError`] for a corrupt archive.
pub fn extract_files(archive: &Path, members: &[String], dest: &Path) -> Result<Vec<PathBuf>> {
    let reader = BufReader::new(File::open(archive)?);
    let mut zip = ZipArchive::new(reader)?;
    std::fs::create_dir_all(dest)?;

    let mut written = Vec::with_capacity(members.len());
    for name in members {
        let mut entry = match zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(BootstrapError::MissingArchiveMember(name.clone()));
            }
            Err(err) => return Err(err.into()),
        };

        let out_path = dest.join(name);
        let mut out = BufWriter::new(File::create(&out_path)?);
        let bytes = io::copy(&mut entry, &mut out)?;
        out.flush()?;

        tracing::debug!(member = %name, bytes, "extracted archive member");
        written.push(out_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_zip(path: &Path, files: &[(&str, &str)]) {
        let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
        for (name, body) in files {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extracts_requested_members_only() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("Unihan.zip");
        write_zip(
            &archive,
            &[
                ("Unihan_Readings.txt", "U+4E00\tkDefinition\tone\n"),
                ("Unihan_Variants.txt", "U+4E07\tkTraditionalVariant\tU+842C\n"),
            ],
        );

        let out = tmp.path().join("out");
        let written =
            extract_files(&archive, &["Unihan_Readings.txt".to_string()], &out).unwrap();

        assert_eq!(written, vec![out.join("Unihan_Readings.txt")]);
        assert_eq!(
            std::fs::read_to_string(&written[0]).unwrap(),
            "U+4E00\tkDefinition\tone\n"
        );
        assert!(!out.join("Unihan_Variants.txt").exists());
    }

    #[test]
    fn test_missing_member() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("Unihan.zip");
        write_zip(&archive, &[("Unihan_Readings.txt", "")]);

        let err = extract_files(&archive, &["Unihan_Variants.txt".to_string()], tmp.path())
            .unwrap_err();
        assert!(matches!(err, BootstrapError::MissingArchiveMember(ref name) if name == "Unihan_Variants.txt"));
    }

    #[test]
    fn test_corrupt_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("Unihan.zip");
        std::fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_files(&archive, &[], tmp.path()).unwrap_err();
        assert!(matches!(err, BootstrapError::ZipError(_)));
    }
}
