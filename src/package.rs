//! Release archive assembly.
//!
//! The archive is staged in a temporary directory (binary at the root,
//! `third-party/` and `data/` beside it) and zipped into
//! `<prefix>-<version>.zip`. The zip is written to a temporary file next to
//! its destination and renamed into place once complete, so a failed run
//! never leaves a partial archive behind.

use std::fs::{self, File};
use std::io::{self, Seek, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::version::Version;

pub const THIRD_PARTY_ENTRY: &str = "third-party";
pub const DATA_ENTRY: &str = "data";

/// Returns the archive file name for `version`, e.g. `shadow-0.1.1.zip`.
pub fn archive_name(prefix: &str, version: &Version) -> String {
    format!("{}-{}.zip", prefix, version)
}

/// Packs the built binary and its runtime trees into a zip in `output_dir`.
///
/// # Returns
/// * `Ok(PathBuf)` - Path of the finished archive
/// * `Err` - If the binary or either directory is missing, or any copy or zip step fails
pub fn pack_release(config: &ReleaseConfig, version: &Version, output_dir: &Path) -> Result<PathBuf> {
    require_file(&config.release_target)?;
    require_dir(&config.third_party_dir)?;
    require_dir(&config.data_dir)?;

    // Removed on drop, including when a copy below fails
    let staging = tempfile::Builder::new()
        .prefix("shadow-release-")
        .tempdir()?;

    let binary_name = config.release_target.file_name().ok_or_else(|| {
        ReleaseError::package(format!(
            "{} has no file name",
            config.release_target.display()
        ))
    })?;
    fs::copy(&config.release_target, staging.path().join(binary_name))?;
    copy_dir_recursive(&config.third_party_dir, &staging.path().join(THIRD_PARTY_ENTRY))?;
    copy_dir_recursive(&config.data_dir, &staging.path().join(DATA_ENTRY))?;

    let archive_path = output_dir.join(archive_name(&config.archive_prefix, version));
    let partial = tempfile::NamedTempFile::new_in(output_dir)?;
    write_zip(staging.path(), partial.as_file())?;
    partial
        .persist(&archive_path)
        .map_err(|e| ReleaseError::Io(e.error))?;

    tracing::debug!(archive = %archive_path.display(), "archive written");
    Ok(archive_path)
}

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ReleaseError::package(format!(
            "release binary not found: {}",
            path.display()
        )))
    }
}

fn require_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ReleaseError::package(format!(
            "directory not found: {}",
            path.display()
        )))
    }
}

/// Recursively copy a directory tree
fn copy_dir_recursive(source: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(target)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let source_path = entry.path();
        let target_path = target.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&source_path, &target_path)?;
        } else {
            fs::copy(&source_path, &target_path)?;
        }
    }

    Ok(())
}

fn write_zip(root: &Path, file: &File) -> Result<()> {
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    add_entries(&mut zip, root, root, options)?;
    zip.finish()?;
    Ok(())
}

fn add_entries<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    root: &Path,
    dir: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = entry_name(root, &path)?;

        if entry.file_type()?.is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
            add_entries(zip, root, &path, options)?;
        } else {
            zip.start_file(name, file_options(&path, options)?)?;
            let mut source = File::open(&path)?;
            io::copy(&mut source, zip)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn file_options(path: &Path, options: SimpleFileOptions) -> Result<SimpleFileOptions> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(path)?.permissions().mode();
    Ok(options.unix_permissions(mode))
}

#[cfg(not(unix))]
fn file_options(_path: &Path, options: SimpleFileOptions) -> Result<SimpleFileOptions> {
    Ok(options)
}

/// Archive entry names are relative to the staging root and always use `/`.
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ReleaseError::package(format!("{} escapes the archive root", path.display())))?;

    let parts = relative
        .components()
        .map(|component| {
            component.as_os_str().to_str().ok_or_else(|| {
                ReleaseError::package(format!("{} is not valid UTF-8", path.display()))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join("/"))
}
