//! In-memory archive builder

use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PackageError;

/// Mode used for entries that have no file on disk to copy one from
pub const DEFAULT_MODE: u32 = 0o644;

/// A single archive entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub data: Vec<u8>,
    /// Unix permission bits
    pub mode: u32,
}

/// Archive contents keyed by `/`-separated relative path.
///
/// Inserting a path that already exists replaces the earlier entry.
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: BTreeMap<String, ArchiveEntry>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        data: impl Into<Vec<u8>>,
        mode: u32,
    ) -> Option<ArchiveEntry> {
        self.entries.insert(
            path.into(),
            ArchiveEntry {
                data: data.into(),
                mode,
            },
        )
    }

    pub fn get(&self, path: &str) -> Option<&ArchiveEntry> {
        self.entries.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add every regular file under `dir` at its path relative to `dir`.
    ///
    /// `include` sees each file's path on disk and decides whether it is
    /// added. Symlinked directories are not descended into. Returns the
    /// number of files added.
    pub fn add_directory<F>(&mut self, dir: &Path, include: F) -> Result<usize, PackageError>
    where
        F: Fn(&Path) -> bool,
    {
        let mut added = 0;

        for path in walk_files(dir)? {
            if !include(&path) {
                continue;
            }

            let relative = path
                .strip_prefix(dir)
                .map_err(|e| PackageError::Walk {
                    path: path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()),
                })?;

            let data = std::fs::read(&path).map_err(|source| PackageError::Walk {
                path: path.clone(),
                source,
            })?;

            self.insert(archive_path(relative), data, file_mode(&path));
            added += 1;
        }

        debug!(dir = %dir.display(), added, "Added directory to archive");
        Ok(added)
    }

    /// Serialize to zip bytes
    pub fn to_zip(&self) -> Result<Bytes, PackageError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for (path, entry) in &self.entries {
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .unix_permissions(entry.mode);
            zip.start_file(path.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }

        let buffer = zip.finish()?.into_inner();
        debug!(entries = self.entries.len(), size = buffer.len(), "Wrote zip archive");

        Ok(Bytes::from(buffer))
    }
}

fn walk_files(dir: &Path) -> Result<Vec<PathBuf>, PackageError> {
    let entries = std::fs::read_dir(dir).map_err(|source| PackageError::Walk {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PackageError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|source| PackageError::Walk {
            path: path.clone(),
            source,
        })?;

        if file_type.is_dir() {
            files.extend(walk_files(&path)?);
        } else if path.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}

fn archive_path(relative: &Path) -> String {
    let path = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    if relative.to_str().is_none() {
        warn!(
            path = %relative.display(),
            archive_path = %path,
            "File name is not valid UTF-8, archiving under a replacement name"
        );
    }

    path
}

#[cfg(unix)]
fn file_mode(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o777)
        .unwrap_or(DEFAULT_MODE)
}

#[cfg(not(unix))]
fn file_mode(_path: &Path) -> u32 {
    DEFAULT_MODE
}
