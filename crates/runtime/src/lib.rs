use rescope_core::{
    FileSystemResourceLoader, PatternResolver, ResolverConfig, StaticRootProvider,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Where a default resolver looks for resources.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    /// Base directory for plain and relative paths (defaults to the current directory).
    pub base_dir: Option<PathBuf>,
    /// Root used by `classpath:`; falls back to the first search root.
    pub classpath_root: Option<PathBuf>,
    /// Ordered roots searched by `classpath*:`.
    pub roots: Vec<PathBuf>,
}

/// Assembles a resolver over the local filesystem.
///
/// A root provider is only installed when there are roots to search, so an
/// empty context keeps `classpath*:` on single-root behaviour.
pub fn build_default_resolver(context: SearchContext, config: ResolverConfig) -> PatternResolver {
    let base_dir = context
        .base_dir
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut loader = FileSystemResourceLoader::new(base_dir).with_config(config.clone());
    if let Some(root) = context
        .classpath_root
        .or_else(|| context.roots.first().cloned())
    {
        loader = loader.with_classpath_root(root);
    }

    let mut builder = PatternResolver::builder(Arc::new(loader)).with_config(config);
    if !context.roots.is_empty() {
        tracing::debug!("Searching {} roots for classpath*:", context.roots.len());
        builder = builder.with_root_provider(Arc::new(StaticRootProvider::new(context.roots)));
    }
    builder.build()
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(rescope_core::logging::init_logging(component, to_stderr))
}
