//! Physical-identity deduplication.
//!
//! Every candidate is canonicalized (symlinks resolved for files and archive
//! containers) and keyed by its canonical URI. The first handle seen for a URI
//! wins; later aliases of the same physical resource are dropped.

use crate::handle::{CandidateEntry, ResourceHandle, ResourceLocation};
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use url::Url;

/// Canonical handle for a physical location.
pub fn canonical_handle(location: &ResourceLocation) -> ResourceHandle {
    match location {
        ResourceLocation::File(path) => {
            let canonical = canonical_path(path);
            ResourceHandle::new(file_uri(&canonical), ResourceLocation::File(canonical))
        }
        ResourceLocation::ArchiveEntry { container, entry } => {
            let canonical = canonical_path(container);
            let uri = format!("jar:{}!/{}", file_uri(&canonical), entry);
            ResourceHandle::new(
                uri,
                ResourceLocation::ArchiveEntry {
                    container: canonical,
                    entry: entry.clone(),
                },
            )
        }
    }
}

fn canonical_path(path: &Path) -> PathBuf {
    match std::fs::canonicalize(path) {
        Ok(canonical) => canonical,
        Err(e) => {
            // Vanished between enumeration and dedup; keep the lexical path
            debug!("Cannot canonicalize {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}

fn file_uri(path: &Path) -> String {
    Url::from_file_path(path)
        .map(String::from)
        .unwrap_or_else(|_| format!("file:{}", path.display()))
}

/// Insertion-ordered set of handles keyed by canonical URI.
#[derive(Debug, Default)]
pub struct Deduplicator {
    handles: IndexMap<String, ResourceHandle>,
    duplicates: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonicalize and insert a candidate. Returns false for a duplicate.
    pub fn insert(&mut self, candidate: CandidateEntry) -> bool {
        self.insert_handle(canonical_handle(&candidate.location))
    }

    /// Insert an already canonical handle. Returns false for a duplicate.
    pub fn insert_handle(&mut self, handle: ResourceHandle) -> bool {
        match self.handles.entry(handle.uri.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(handle);
                true
            }
            Entry::Occupied(_) => {
                trace!("Dropping duplicate {}", handle.uri);
                self.duplicates += 1;
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Number of inserts rejected as duplicates.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn into_handles(self) -> Vec<ResourceHandle> {
        self.handles.into_values().collect()
    }
}
