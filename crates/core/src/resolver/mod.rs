//! Pattern resolution orchestrator.
//!
//! ```text
//! ParsePrefix ─▶ SelectOrigins ─┬─▶ DirectLookup ──────┬─▶ Deduplicate ─▶ Return
//!                               └─▶ EnumerateAndMatch ─┘
//! ```
//!
//! Patterns without wildcards never walk a tree: they are answered by one
//! exact lookup (per physical root for `classpath*:`). Wildcard patterns
//! enumerate the origin behind their root segment and keep the candidates
//! whose relative path matches the glob suffix.

mod result;

pub use result::{ResolutionResult, SkippedOrigin};

use crate::config::ResolverConfig;
use crate::dedup::Deduplicator;
use crate::error::{ResolveError, Result};
use crate::glob::{GlobMatcher, PathMatcher};
use crate::handle::CandidateEntry;
use crate::loader::{SingleResourceLoader, lookup_in_root};
use crate::origin::{OriginEnumerator, ResourceOrigin};
use crate::pattern::{CLASSPATH_URL_PREFIX, LocationPattern, PrefixKind};
use crate::roots::RootProvider;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Resolves location patterns into deduplicated resource sets.
///
/// Immutable after construction; share it freely across threads.
pub struct PatternResolver {
    loader: Arc<dyn SingleResourceLoader>,
    root_provider: Option<Arc<dyn RootProvider>>,
    matcher: Arc<dyn PathMatcher>,
    config: ResolverConfig,
}

impl PatternResolver {
    pub fn builder(loader: Arc<dyn SingleResourceLoader>) -> PatternResolverBuilder {
        PatternResolverBuilder::new(loader)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether `classpath*:` searches every root or degrades to `classpath:`.
    pub fn supports_all_roots(&self) -> bool {
        self.root_provider.is_some()
    }

    pub fn get_resources(&self, location_pattern: &str) -> Result<ResolutionResult> {
        let start = Instant::now();
        let pattern = LocationPattern::parse(location_pattern)?;
        let mut state = Resolution::new(&self.config);

        if pattern.has_wildcard && self.matcher.is_pattern(&pattern.glob_suffix) {
            self.enumerate_and_match(&pattern, &mut state)?;
        } else {
            self.direct_lookup(&pattern, &mut state)?;
        }

        let result = state.finish();
        info!(
            "Resolved '{}': {} resources, {} skipped origins in {:?}",
            location_pattern,
            result.len(),
            result.skipped().len(),
            start.elapsed()
        );
        Ok(result)
    }

    /// Root provider to aggregate over, if the pattern asks for it and one is
    /// configured.
    fn aggregate_provider(&self, pattern: &LocationPattern) -> Option<&Arc<dyn RootProvider>> {
        if pattern.prefix_kind != PrefixKind::AllRoots {
            return None;
        }
        if self.root_provider.is_none() {
            debug!("No root provider configured; resolving classpath*: through a single root");
        }
        self.root_provider.as_ref()
    }

    /// Location handed to the single-resource loader.
    fn single_location(pattern: &LocationPattern, root_only: bool) -> String {
        match (pattern.prefix_kind, root_only) {
            (PrefixKind::AllRoots, true) => {
                format!("{}{}", CLASSPATH_URL_PREFIX, pattern.root_segment)
            }
            (PrefixKind::AllRoots, false) => format!("{}{}", CLASSPATH_URL_PREFIX, pattern.path()),
            (_, true) => pattern.root_location(),
            (_, false) => pattern.location(),
        }
    }

    fn direct_lookup(&self, pattern: &LocationPattern, state: &mut Resolution) -> Result<()> {
        let Some(provider) = self.aggregate_provider(pattern) else {
            let location = Self::single_location(pattern, false);
            if let Some(handle) = self.loader.get_resource(&location)? {
                state.dedup.insert_handle(handle);
            }
            return Ok(());
        };

        let name = pattern.path();
        for root in provider.roots(&name) {
            match lookup_in_root(&root, &name, &self.config) {
                Ok(Some(handle)) => {
                    state.dedup.insert_handle(handle);
                }
                Ok(None) => {}
                Err(e) => state.fail_or_skip(e)?,
            }
        }
        Ok(())
    }

    fn enumerate_and_match(&self, pattern: &LocationPattern, state: &mut Resolution) -> Result<()> {
        let Some(origin) = self.select_origin(pattern, state)? else {
            return Ok(());
        };

        let glob = pattern.glob_suffix.as_str();
        let aggregate = origin.is_aggregate();
        let enumerator =
            OriginEnumerator::new(&self.config, self.matcher.as_ref()).with_pattern(glob);

        match &origin {
            ResourceOrigin::AggregateRoots { roots } if self.config.parallel_roots => {
                let matcher = self.matcher.as_ref();
                let batches: Vec<Vec<Result<CandidateEntry>>> = roots
                    .par_iter()
                    .map(|root| {
                        enumerator
                            .enumerate(root)
                            .filter(|item| match item {
                                Ok(candidate) => matcher.matches(&candidate.relative_path, glob),
                                Err(_) => true,
                            })
                            .collect()
                    })
                    .collect();
                // Fan in in root order so first-seen stays deterministic
                for item in batches.into_iter().flatten() {
                    self.accept(item, glob, aggregate, state)?;
                }
            }
            _ => {
                for item in enumerator.enumerate(&origin) {
                    self.accept(item, glob, aggregate, state)?;
                }
            }
        }
        Ok(())
    }

    fn select_origin(
        &self,
        pattern: &LocationPattern,
        state: &mut Resolution,
    ) -> Result<Option<ResourceOrigin>> {
        if let Some(provider) = self.aggregate_provider(pattern) {
            let segment = pattern.root_segment.as_str();
            let mut roots = Vec::new();
            for root in provider.roots(segment) {
                match ResourceOrigin::for_search_root(&root, segment, &self.config) {
                    Ok(Some(origin)) => roots.push(origin),
                    Ok(None) => {}
                    Err(e) => state.fail_or_skip(e)?,
                }
            }
            debug!(
                "Aggregating {} origins for root segment '{}'",
                roots.len(),
                segment
            );
            return Ok(Some(ResourceOrigin::AggregateRoots { roots }));
        }

        let root_location = Self::single_location(pattern, true);
        let Some(root) = self.loader.get_resource(&root_location)? else {
            debug!("Root {} does not exist", root_location);
            return Ok(None);
        };
        let origin = ResourceOrigin::for_location(&root.location);
        if origin.is_none() {
            debug!("Root {} is not a container", root.uri);
        }
        Ok(origin)
    }

    fn accept(
        &self,
        item: Result<CandidateEntry>,
        glob: &str,
        aggregate: bool,
        state: &mut Resolution,
    ) -> Result<()> {
        match item {
            Ok(candidate) => {
                if self.matcher.matches(&candidate.relative_path, glob) {
                    state.dedup.insert(candidate);
                }
                Ok(())
            }
            // The only root of a single-origin resolution is required
            Err(e) if !aggregate && e.is_open_failure() => Err(e),
            Err(e) => state.fail_or_skip(e),
        }
    }
}

/// Per-call state: dedup set and skipped origins.
struct Resolution {
    dedup: Deduplicator,
    skipped: Vec<SkippedOrigin>,
    lenient: bool,
}

impl Resolution {
    fn new(config: &ResolverConfig) -> Self {
        Self {
            dedup: Deduplicator::new(),
            skipped: Vec::new(),
            lenient: config.is_lenient(),
        }
    }

    fn fail_or_skip(&mut self, err: ResolveError) -> Result<()> {
        if !self.lenient {
            return Err(err);
        }
        warn!("Skipping origin, result may be incomplete: {}", err);
        self.skipped.push(SkippedOrigin::from_error(&err));
        Ok(())
    }

    fn finish(self) -> ResolutionResult {
        if self.dedup.duplicates() > 0 {
            debug!("Collapsed {} duplicate resources", self.dedup.duplicates());
        }
        ResolutionResult::new(self.dedup.into_handles(), self.skipped)
    }
}

/// Builder for [`PatternResolver`]
pub struct PatternResolverBuilder {
    loader: Arc<dyn SingleResourceLoader>,
    root_provider: Option<Arc<dyn RootProvider>>,
    matcher: Option<Arc<dyn PathMatcher>>,
    config: ResolverConfig,
}

impl PatternResolverBuilder {
    pub fn new(loader: Arc<dyn SingleResourceLoader>) -> Self {
        Self {
            loader,
            root_provider: None,
            matcher: None,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_root_provider(mut self, provider: Arc<dyn RootProvider>) -> Self {
        self.root_provider = Some(provider);
        self
    }

    pub fn with_path_matcher(mut self, matcher: Arc<dyn PathMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> PatternResolver {
        PatternResolver {
            loader: self.loader,
            root_provider: self.root_provider,
            matcher: self
                .matcher
                .unwrap_or_else(|| Arc::new(GlobMatcher::new())),
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::{ResourceHandle, ResourceLocation};
    use crate::loader::FileSystemResourceLoader;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Records every location it is asked for.
    struct RecordingLoader {
        inner: FileSystemResourceLoader,
        seen: Mutex<Vec<String>>,
    }

    impl SingleResourceLoader for RecordingLoader {
        fn get_resource(&self, location: &str) -> Result<Option<ResourceHandle>> {
            self.seen.lock().unwrap().push(location.to_string());
            self.inner.get_resource(location)
        }
    }

    #[test]
    fn test_direct_lookup_uses_single_loader_call() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("conf")).unwrap();
        fs::write(temp.path().join("conf/app.cfg"), "k=v").unwrap();

        let loader = Arc::new(RecordingLoader {
            inner: FileSystemResourceLoader::new(temp.path()),
            seen: Mutex::new(Vec::new()),
        });
        let resolver = PatternResolver::builder(loader.clone()).build();

        let result = resolver.get_resources("conf/app.cfg").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(*loader.seen.lock().unwrap(), vec!["conf/app.cfg".to_string()]);
    }

    #[test]
    fn test_all_roots_degrades_without_provider() {
        let temp = tempfile::tempdir().unwrap();
        let classes = temp.path().join("classes");
        fs::create_dir_all(&classes).unwrap();
        fs::write(classes.join("app-1.cfg"), "1").unwrap();

        let loader =
            Arc::new(FileSystemResourceLoader::new(temp.path()).with_classpath_root(&classes));
        let resolver = PatternResolver::builder(loader).build();
        assert!(!resolver.supports_all_roots());

        let result = resolver.get_resources("classpath*:app-*.cfg").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.handles()[0].filename(), Some("app-1.cfg"));
    }

    #[test]
    fn test_wildcard_root_that_is_a_file_is_empty() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("plain"), "not a dir").unwrap();

        let loader = Arc::new(FileSystemResourceLoader::new(temp.path()));
        let resolver = PatternResolver::builder(loader).build();
        assert!(resolver.get_resources("plain/*.txt").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_pattern_does_no_lookup() {
        let loader = Arc::new(RecordingLoader {
            inner: FileSystemResourceLoader::new(PathBuf::from(".")),
            seen: Mutex::new(Vec::new()),
        });
        let resolver = PatternResolver::builder(loader.clone()).build();

        let err = resolver.get_resources("conf/[ab.cfg").unwrap_err();
        assert!(matches!(err, ResolveError::MalformedPattern { .. }));
        assert!(loader.seen.lock().unwrap().is_empty());
    }

    /// Matcher that only accepts exact equality.
    struct ExactMatcher;

    impl PathMatcher for ExactMatcher {
        fn is_pattern(&self, _path: &str) -> bool {
            false
        }

        fn matches(&self, path: &str, pattern: &str) -> bool {
            path == pattern
        }

        fn matches_start(&self, _dir: &str, _pattern: &str) -> bool {
            true
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_custom_matcher_decides_what_is_a_pattern() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("a*.txt"), "literal star").unwrap();
        fs::write(temp.path().join("ab.txt"), "b").unwrap();

        let loader = Arc::new(RecordingLoader {
            inner: FileSystemResourceLoader::new(temp.path()),
            seen: Mutex::new(Vec::new()),
        });
        let resolver = PatternResolver::builder(loader.clone())
            .with_path_matcher(Arc::new(ExactMatcher))
            .build();

        let result = resolver.get_resources("a*.txt").unwrap();
        assert_eq!(result.len(), 1);
        assert!(matches!(
            &result.handles()[0].location,
            ResourceLocation::File(p) if p.ends_with("a*.txt")
        ));
        // Answered by one exact lookup, no walk of the base directory
        assert_eq!(*loader.seen.lock().unwrap(), vec!["a*.txt".to_string()]);
    }

    #[test]
    fn test_config_is_exposed() {
        let loader = Arc::new(FileSystemResourceLoader::new(PathBuf::from(".")));
        let config = ResolverConfig {
            parallel_roots: true,
            ..ResolverConfig::default()
        };
        let resolver = PatternResolver::builder(loader).with_config(config).build();
        assert!(resolver.config().parallel_roots);
    }
}
