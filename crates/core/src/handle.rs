//! Resource handles and the transient candidates they are built from.

use crate::origin::archive;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

/// Which kind of origin produced a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OriginKind {
    Filesystem,
    Archive,
}

impl OriginKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginKind::Filesystem => "filesystem",
            OriginKind::Archive => "archive",
        }
    }
}

/// Physical, openable location of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceLocation {
    File(PathBuf),
    ArchiveEntry { container: PathBuf, entry: String },
}

impl ResourceLocation {
    pub fn origin_kind(&self) -> OriginKind {
        match self {
            ResourceLocation::File(_) => OriginKind::Filesystem,
            ResourceLocation::ArchiveEntry { .. } => OriginKind::Archive,
        }
    }

    /// Last path segment (file name or entry name).
    pub fn filename(&self) -> Option<&str> {
        match self {
            ResourceLocation::File(path) => path.file_name().and_then(|n| n.to_str()),
            ResourceLocation::ArchiveEntry { entry, .. } => entry
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|name| !name.is_empty()),
        }
    }
}

/// A candidate produced while enumerating an origin; not canonical yet.
#[derive(Debug, Clone)]
pub struct CandidateEntry {
    pub origin_kind: OriginKind,
    pub location: ResourceLocation,
    /// Path relative to the origin root, `/`-separated.
    pub relative_path: String,
}

impl CandidateEntry {
    pub fn file(path: PathBuf, relative_path: String) -> Self {
        Self {
            origin_kind: OriginKind::Filesystem,
            location: ResourceLocation::File(path),
            relative_path,
        }
    }

    pub fn archive_entry(container: &Path, entry: String, relative_path: String) -> Self {
        Self {
            origin_kind: OriginKind::Archive,
            location: ResourceLocation::ArchiveEntry {
                container: container.to_path_buf(),
                entry,
            },
            relative_path,
        }
    }
}

/// A resolved resource. Identity is the canonical physical URI.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceHandle {
    pub uri: String,
    pub location: ResourceLocation,
    pub origin_kind: OriginKind,
}

impl ResourceHandle {
    /// Build a handle from an already canonical location and URI.
    pub fn new(uri: String, location: ResourceLocation) -> Self {
        let origin_kind = location.origin_kind();
        Self {
            uri,
            location,
            origin_kind,
        }
    }

    pub fn filename(&self) -> Option<&str> {
        self.location.filename()
    }

    /// Open the resource for reading.
    ///
    /// Archive entries are read fully into memory so the container handle is
    /// released before this returns.
    pub fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        match &self.location {
            ResourceLocation::File(path) => Ok(Box::new(File::open(path)?)),
            ResourceLocation::ArchiveEntry { container, entry } => {
                let bytes = archive::read_entry(container, entry)?;
                Ok(Box::new(Cursor::new(bytes)))
            }
        }
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for ResourceHandle {}

impl Hash for ResourceHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
