//! Resolver configuration.
//!
//! Every field has a default, so a config file only needs to name what it
//! overrides:
//!
//! ```json
//! { "failure_policy": "lenient", "parallel_roots": true }
//! ```

use crate::error::{ResolveError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when one origin of a multi-origin resolution fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort the whole call with the first origin error.
    #[default]
    Strict,
    /// Record the failed origin in the result and keep going.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub failure_policy: FailurePolicy,
    /// Follow symbolic links while walking directory origins.
    pub follow_links: bool,
    /// Maximum directory depth below an origin's base path (unbounded if `None`).
    pub max_depth: Option<usize>,
    /// Enumerate aggregate roots on the rayon pool.
    pub parallel_roots: bool,
    /// File extensions (without the dot) that mark a root as an archive.
    pub archive_extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Strict,
            follow_links: true,
            max_depth: None,
            parallel_roots: false,
            archive_extensions: ["jar", "zip", "war", "ear"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl ResolverConfig {
    /// Load a config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ResolveError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ResolveError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn is_lenient(&self) -> bool {
        self.failure_policy == FailurePolicy::Lenient
    }

    /// Whether `path` names an archive container by its extension.
    pub fn is_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.archive_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}
