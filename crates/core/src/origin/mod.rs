//! Resource origins and their enumeration.
//!
//! An origin is one searchable place: a directory tree, the entry namespace
//! of an archive, or an ordered aggregate of those. Enumeration is lazy; an
//! aggregate only opens a child when iteration reaches it.

pub mod archive;
pub mod filesystem;

use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::glob::PathMatcher;
use crate::handle::{CandidateEntry, ResourceLocation};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Streaming candidate sequence produced by an origin.
pub type CandidateStream<'a> = Box<dyn Iterator<Item = Result<CandidateEntry>> + Send + 'a>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOrigin {
    Filesystem {
        base_path: PathBuf,
    },
    Archive {
        container_path: PathBuf,
        internal_prefix: String,
    },
    AggregateRoots {
        roots: Vec<ResourceOrigin>,
    },
}

impl ResourceOrigin {
    /// Origin rooted at an already resolved root resource.
    ///
    /// A plain file cannot contain anything, so it yields `None`.
    pub fn for_location(location: &ResourceLocation) -> Option<Self> {
        match location {
            ResourceLocation::File(path) if path.is_dir() => Some(ResourceOrigin::Filesystem {
                base_path: path.clone(),
            }),
            ResourceLocation::File(_) => None,
            ResourceLocation::ArchiveEntry { container, entry } => Some(ResourceOrigin::Archive {
                container_path: container.clone(),
                internal_prefix: entry.clone(),
            }),
        }
    }

    /// Origin for a logical root segment inside one physical search root.
    ///
    /// Archive roots take the segment as their internal prefix; directory
    /// roots are joined with it. Roots that do not hold the segment give `None`.
    pub fn for_search_root(
        root: &Path,
        segment: &str,
        config: &ResolverConfig,
    ) -> Result<Option<Self>> {
        let meta = match fs::metadata(root) {
            Ok(meta) => meta,
            Err(e) if is_absent(&e) => {
                debug!("Search root {} does not exist", root.display());
                return Ok(None);
            }
            Err(e) => return Err(ResolveError::origin_open(root.display().to_string(), e)),
        };

        if !meta.is_dir() {
            if meta.is_file() && config.is_archive(root) {
                return Ok(Some(ResourceOrigin::Archive {
                    container_path: root.to_path_buf(),
                    internal_prefix: segment.to_string(),
                }));
            }
            debug!("Search root {} is not a directory or archive", root.display());
            return Ok(None);
        }

        let base_path = filesystem::join_relative(root, segment);
        match fs::metadata(&base_path) {
            Ok(meta) if meta.is_dir() => Ok(Some(ResourceOrigin::Filesystem { base_path })),
            Ok(_) => Ok(None),
            Err(e) if is_absent(&e) => {
                debug!("Search root {} has no '{}'", root.display(), segment);
                Ok(None)
            }
            Err(e) => Err(ResolveError::origin_open(base_path.display().to_string(), e)),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, ResourceOrigin::AggregateRoots { .. })
    }

    /// Human readable description for logs and skip reports.
    pub fn describe(&self) -> String {
        match self {
            ResourceOrigin::Filesystem { base_path } => base_path.display().to_string(),
            ResourceOrigin::Archive {
                container_path,
                internal_prefix,
            } => format!("{}!/{}", container_path.display(), internal_prefix),
            ResourceOrigin::AggregateRoots { roots } => format!("{} roots", roots.len()),
        }
    }
}

/// Walks origins, producing candidates.
///
/// When a glob is attached, directory descent in filesystem origins is pruned
/// with [`PathMatcher::matches_start`].
/// Missing paths, and paths that run through a regular file.
pub(crate) fn is_absent(err: &io::Error) -> bool {
    matches!(err.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[derive(Clone, Copy)]
pub struct OriginEnumerator<'a> {
    config: &'a ResolverConfig,
    matcher: &'a dyn PathMatcher,
    pattern: Option<&'a str>,
}

impl<'a> OriginEnumerator<'a> {
    pub fn new(config: &'a ResolverConfig, matcher: &'a dyn PathMatcher) -> Self {
        Self {
            config,
            matcher,
            pattern: None,
        }
    }

    pub fn with_pattern(mut self, pattern: &'a str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn enumerate(self, origin: &'a ResourceOrigin) -> CandidateStream<'a> {
        debug!("Enumerating origin {}", origin.describe());
        match origin {
            ResourceOrigin::Filesystem { base_path } => {
                filesystem::walk(base_path, self.config, self.matcher, self.pattern)
            }
            ResourceOrigin::Archive {
                container_path,
                internal_prefix,
            } => Box::new(archive::ArchiveEntries::new(
                container_path.clone(),
                internal_prefix.clone(),
            )),
            ResourceOrigin::AggregateRoots { roots } => {
                Box::new(roots.iter().flat_map(move |root| self.enumerate(root)))
            }
        }
    }
}
