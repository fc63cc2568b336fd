use crate::error::ResolveError;
use crate::handle::ResourceHandle;
use serde::Serialize;

/// An origin left out of a lenient resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedOrigin {
    pub origin: String,
    pub reason: String,
}

impl SkippedOrigin {
    pub fn from_error(err: &ResolveError) -> Self {
        let origin = match err {
            ResolveError::OriginOpen { origin, .. } => origin.clone(),
            ResolveError::Enumeration { path, .. } => path.display().to_string(),
            ResolveError::MalformedPattern { pattern, .. } => pattern.clone(),
            ResolveError::Config { path, .. } => path.display().to_string(),
        };
        Self {
            origin,
            reason: err.to_string(),
        }
    }
}

/// Deduplicated resources in discovery order, plus anything skipped.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ResolutionResult {
    handles: Vec<ResourceHandle>,
    skipped: Vec<SkippedOrigin>,
}

impl ResolutionResult {
    pub fn new(handles: Vec<ResourceHandle>, skipped: Vec<SkippedOrigin>) -> Self {
        Self { handles, skipped }
    }

    pub fn handles(&self) -> &[ResourceHandle] {
        &self.handles
    }

    pub fn skipped(&self) -> &[SkippedOrigin] {
        &self.skipped
    }

    /// False when a lenient resolution skipped at least one origin.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceHandle> {
        self.handles.iter()
    }

    pub fn into_handles(self) -> Vec<ResourceHandle> {
        self.handles
    }
}

impl IntoIterator for ResolutionResult {
    type Item = ResourceHandle;
    type IntoIter = std::vec::IntoIter<ResourceHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResolutionResult {
    type Item = &'a ResourceHandle;
    type IntoIter = std::slice::Iter<'a, ResourceHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.iter()
    }
}
