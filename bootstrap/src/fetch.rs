//! Fetching the UNIHAN archive into the work directory.
//!
//! An archive already present in the work directory is reused when it was
//! fetched from the configured source; the source is recorded next to the
//! archive in `Unihan.zip.source`. Otherwise the archive is downloaded
//! (`http://`, `https://`) or copied (`file://`, plain path) to a `.part`
//! file and renamed into place once complete.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::error::{BootstrapError, Result};
use crate::options::UnihanOptions;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Where the archive comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveSource {
    Http(String),
    Local(PathBuf),
}

impl ArchiveSource {
    /// Classifies a configured `source` string.
    ///
    /// # Examples
    ///
    /// ```
    /// use cihai_bootstrap::ArchiveSource;
    /// use std::path::PathBuf;
    ///
    /// assert!(matches!(ArchiveSource::parse("https://unicode.org/Unihan.zip"), ArchiveSource::Http(_)));
    /// assert_eq!(
    ///     ArchiveSource::parse("file:///data/Unihan.zip"),
    ///     ArchiveSource::Local(PathBuf::from("/data/Unihan.zip")),
    /// );
    /// ```
    pub fn parse(source: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            return Self::Http(source.to_string());
        }
        let path = source.strip_prefix("file://").unwrap_or(source);
        Self::Local(PathBuf::from(path))
    }
}

/// An archive ready for extraction.
#[derive(Debug, Clone)]
pub struct FetchedArchive {
    pub path: PathBuf,
    /// Source the archive was fetched from.
    pub source: String,
    /// Lowercase hex SHA-256 of the archive.
    pub sha256: String,
    /// `true` when the archive was already in the work directory.
    pub reused: bool,
}

/// Makes sure the archive is present in the work directory and verified.
///
/// # Errors
///
/// Returns [`BootstrapError::SourceNotFound`] for a missing local source,
/// [`BootstrapError::HttpError`] for download failures, or
/// [`BootstrapError::ChecksumMismatch`] when `options.sha256` is set and
/// does not match. A mismatching archive is deleted so the next run fetches
/// it again.
pub fn fetch_archive(options: &UnihanOptions) -> Result<FetchedArchive> {
    let work_dir = options.work_dir()?;
    fs::create_dir_all(&work_dir)?;
    let dest = options.archive_path()?;
    let origin = origin_path(&dest);

    let reused =
        dest.exists() && recorded_source(&origin).as_deref() == Some(options.source.as_str());
    if reused {
        tracing::debug!(path = %dest.display(), "reusing cached UNIHAN archive");
    } else {
        if dest.exists() {
            tracing::info!(
                path = %dest.display(),
                source = %options.source,
                "cached archive came from another source, fetching again"
            );
        }
        let part = dest.with_extension("zip.part");
        let fetched = match ArchiveSource::parse(&options.source) {
            ArchiveSource::Http(url) => download(&url, &part),
            ArchiveSource::Local(path) => copy_local(&path, &part),
        };
        if let Err(err) = fetched {
            if part.exists() {
                fs::remove_file(&part)?;
            }
            return Err(err);
        }
        if origin.exists() {
            fs::remove_file(&origin)?;
        }
        fs::rename(&part, &dest)?;
        fs::write(&origin, &options.source)?;
    }

    let sha256 = sha256_file(&dest)?;
    if let Some(expected) = &options.sha256 {
        if !expected.eq_ignore_ascii_case(&sha256) {
            tracing::warn!(path = %dest.display(), "removing archive with unexpected checksum");
            fs::remove_file(&dest)?;
            if origin.exists() {
                fs::remove_file(&origin)?;
            }
            return Err(BootstrapError::ChecksumMismatch {
                path: dest,
                expected: expected.clone(),
                actual: sha256,
            });
        }
    }

    Ok(FetchedArchive {
        path: dest,
        source: options.source.clone(),
        sha256,
        reused,
    })
}

fn origin_path(archive: &Path) -> PathBuf {
    archive.with_extension("zip.source")
}

/// Source recorded for a cached archive. `None` if nothing was recorded.
fn recorded_source(origin: &Path) -> Option<String> {
    fs::read_to_string(origin).ok()
}

fn download(url: &str, part: &Path) -> Result<()> {
    tracing::info!(url, "downloading UNIHAN archive");
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?;
    let mut response = client.get(url).send()?.error_for_status()?;

    let mut writer = BufWriter::new(File::create(part)?);
    let bytes = response.copy_to(&mut writer)?;
    writer.into_inner().map_err(|err| err.into_error())?.sync_all()?;

    tracing::info!(bytes, "download complete");
    Ok(())
}

fn copy_local(source: &Path, part: &Path) -> Result<()> {
    if !source.exists() {
        return Err(BootstrapError::SourceNotFound(source.to_path_buf()));
    }
    tracing::info!(source = %source.display(), "copying UNIHAN archive");
    fs::copy(source, part)?;
    Ok(())
}

/// Computes the lowercase hex SHA-256 digest of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    std::io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
