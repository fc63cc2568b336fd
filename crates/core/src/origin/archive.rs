//! Zip/jar container enumeration.
//!
//! The container is opened when iteration starts and closed as soon as the
//! iterator is exhausted or dropped.

use crate::error::{ResolveError, Result};
use crate::handle::CandidateEntry;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Open a zip container, mapping every failure to an open error.
pub fn open(container: &Path) -> Result<ZipArchive<File>> {
    let origin = || container.display().to_string();
    let file = File::open(container).map_err(|e| ResolveError::origin_open(origin(), e))?;
    ZipArchive::new(file).map_err(|e| ResolveError::origin_open(origin(), std::io::Error::other(e)))
}

/// Find `entry` in a container.
///
/// Returns the normalized entry name: the name itself for a file entry, or a
/// `/`-terminated prefix when `entry` names a directory (explicit or implied
/// by deeper entries). The empty entry is the container root.
pub fn lookup(container: &Path, entry: &str) -> Result<Option<String>> {
    let archive = open(container)?;
    if entry.is_empty() {
        return Ok(Some(String::new()));
    }

    let dir = format!("{}/", entry.trim_end_matches('/'));
    let mut is_dir = false;
    for name in archive.file_names() {
        if name == entry && !entry.ends_with('/') {
            return Ok(Some(entry.to_string()));
        }
        if name.starts_with(&dir) {
            is_dir = true;
        }
    }
    Ok(is_dir.then_some(dir))
}

/// Read one entry fully.
pub fn read_entry(container: &Path, entry: &str) -> std::io::Result<Vec<u8>> {
    let file = File::open(container)?;
    let mut archive = ZipArchive::new(file).map_err(std::io::Error::other)?;
    let mut zip_entry = archive.by_name(entry).map_err(std::io::Error::other)?;
    let mut bytes = Vec::new();
    zip_entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Lazy iterator over the file entries below an internal prefix.
pub struct ArchiveEntries {
    container: PathBuf,
    prefix: String,
    archive: Option<ZipArchive<File>>,
    index: usize,
    finished: bool,
}

impl ArchiveEntries {
    pub fn new(container: PathBuf, prefix: String) -> Self {
        Self {
            container,
            prefix,
            archive: None,
            index: 0,
            finished: false,
        }
    }
}

impl Iterator for ArchiveEntries {
    type Item = Result<CandidateEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if self.archive.is_none() {
            match open(&self.container) {
                Ok(archive) => self.archive = Some(archive),
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        if let Some(archive) = self.archive.as_ref() {
            while self.index < archive.len() {
                let index = self.index;
                self.index += 1;

                let Some(name) = archive.name_for_index(index) else {
                    continue;
                };
                // Directory entries
                if name.ends_with('/') {
                    continue;
                }
                let Some(relative) = name.strip_prefix(self.prefix.as_str()) else {
                    continue;
                };
                if relative.is_empty() {
                    continue;
                }

                return Some(Ok(CandidateEntry::archive_entry(
                    &self.container,
                    name.to_string(),
                    relative.to_string(),
                )));
            }
        }

        self.archive = None;
        self.finished = true;
        None
    }
}
