//! Reproducible zip packaging for the linked image.
//!
//! Entries are written in sorted walk order. When an output timestamp is
//! configured every entry mtime is forced to it, so packaging the same tree
//! twice yields byte-identical archives; without one, real file mtimes are
//! preserved. Unix permission bits ride along so launchers stay executable
//! after extraction.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Timelike, Utc};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::LinkError;

/// Parse the configured output timestamp: ISO-8601 with offset, or epoch
/// seconds. Empty and single-character values disable normalization (an
/// inherited `0` means "off", not 1970).
pub fn parse_output_timestamp(value: Option<&str>) -> Result<Option<DateTime<Utc>>, LinkError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.len() < 2 {
        return Ok(None);
    }

    let numeric = trimmed
        .strip_prefix('-')
        .unwrap_or(trimmed)
        .chars()
        .all(|c| c.is_ascii_digit());
    if numeric {
        let seconds: i64 = trimmed
            .parse()
            .map_err(|_| LinkError::InvalidOutputTimestamp(value.to_string()))?;
        return DateTime::from_timestamp(seconds, 0)
            .map(Some)
            .ok_or_else(|| LinkError::InvalidOutputTimestamp(value.to_string()));
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|stamp| Some(stamp.with_timezone(&Utc)))
        .map_err(|_| LinkError::InvalidOutputTimestamp(value.to_string()))
}

/// Zip the tree rooted at `src` into `dest`.
pub fn zip_directory(
    src: &Path,
    dest: &Path,
    timestamp: Option<DateTime<Utc>>,
) -> Result<(), LinkError> {
    let file = File::create(dest)
        .map_err(|e| LinkError::PackagingError(format!("unable to create {}: {e}", dest.display())))?;
    let mut writer = ZipWriter::new(file);

    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry =
            entry.map_err(|e| LinkError::PackagingError(format!("walking {}: {e}", src.display())))?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue, // the root itself
        };
        let name = entry_name(relative);

        let mut options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);
        let stamp = match timestamp {
            Some(configured) => Some(configured),
            None => entry_mtime(&entry),
        };
        if let Some(stamp) = stamp {
            options = options.last_modified_time(to_zip_datetime(stamp));
        }
        #[cfg(unix)]
        if let Some(mode) = unix_mode(&entry) {
            options = options.unix_permissions(mode);
        }

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            let target = fs::read_link(entry.path()).map_err(|e| {
                LinkError::PackagingError(format!("unreadable symlink {name}: {e}"))
            })?;
            writer
                .add_symlink(name.as_str(), target.to_string_lossy().as_ref(), options)
                .map_err(|e| LinkError::PackagingError(format!("adding symlink {name}: {e}")))?;
        } else if file_type.is_dir() {
            writer
                .add_directory(name.as_str(), options)
                .map_err(|e| LinkError::PackagingError(format!("adding directory {name}: {e}")))?;
        } else {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| LinkError::PackagingError(format!("adding file {name}: {e}")))?;
            let mut source = File::open(entry.path())
                .map_err(|e| LinkError::PackagingError(format!("reading {name}: {e}")))?;
            io::copy(&mut source, &mut writer)
                .map_err(|e| LinkError::PackagingError(format!("writing {name}: {e}")))?;
        }
    }

    writer
        .finish()
        .map_err(|e| LinkError::PackagingError(format!("finalizing {}: {e}", dest.display())))?;
    Ok(())
}

/// Write a `<archive>.sha256` sidecar in `sha256sum` format and return its
/// path.
pub fn write_checksum(archive: &Path) -> Result<PathBuf, LinkError> {
    let mut file = File::open(archive)
        .map_err(|e| LinkError::PackagingError(format!("unable to read {}: {e}", archive.display())))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .map_err(|e| LinkError::PackagingError(format!("hashing {}: {e}", archive.display())))?;
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();

    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sidecar = PathBuf::from(format!("{}.sha256", archive.display()));
    fs::write(&sidecar, format!("{hex}  {file_name}\n"))
        .map_err(|e| LinkError::PackagingError(format!("writing checksum: {e}")))?;
    Ok(sidecar)
}

/// Forward-slash entry names regardless of host separator.
fn entry_name(relative: &Path) -> String {
    relative
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn entry_mtime(entry: &walkdir::DirEntry) -> Option<DateTime<Utc>> {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .map(DateTime::<Utc>::from)
}

#[cfg(unix)]
fn unix_mode(entry: &walkdir::DirEntry) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    entry.metadata().ok().map(|m| m.permissions().mode() & 0o7777)
}

/// Zip stores DOS times, valid 1980..=2107; out-of-range stamps clamp to
/// the epoch of that format.
fn to_zip_datetime(stamp: DateTime<Utc>) -> zip::DateTime {
    let year = stamp.year();
    if !(1980..=2107).contains(&year) {
        println!("[WARN] timestamp {stamp} outside the zip range (1980-2107), clamping");
        return zip::DateTime::default();
    }
    zip::DateTime::from_date_and_time(
        year as u16,
        stamp.month() as u8,
        stamp.day() as u8,
        stamp.hour() as u8,
        stamp.minute() as u8,
        stamp.second() as u8,
    )
    .unwrap_or_default()
}
