//! Physical search roots for `classpath*:` resolution.

use std::ffi::OsStr;
use std::path::PathBuf;

/// Supplies the physical roots that may hold a logical name.
///
/// The resolver calls [`RootProvider::roots`] once per resolution and works on
/// that snapshot, so implementations may change between calls.
pub trait RootProvider: Send + Sync {
    /// Ordered roots (directories or archive files) to search for `name`.
    fn roots(&self, name: &str) -> Vec<PathBuf>;
}

/// A fixed, ordered list of roots searched for every name.
#[derive(Debug, Clone, Default)]
pub struct StaticRootProvider {
    roots: Vec<PathBuf>,
}

impl StaticRootProvider {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
        }
    }

    /// Build from a platform search path (`a:b:c` on Unix, `a;b;c` on Windows).
    pub fn from_search_path(search_path: impl AsRef<OsStr>) -> Self {
        Self::new(
            std::env::split_paths(search_path.as_ref()).filter(|p| !p.as_os_str().is_empty()),
        )
    }

    pub fn add_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl RootProvider for StaticRootProvider {
    fn roots(&self, _name: &str) -> Vec<PathBuf> {
        self.roots.clone()
    }
}
