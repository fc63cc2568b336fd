//! Location-pattern resolution over filesystem trees, archives and search roots.
//!
//! ```no_run
//! use rescope_core::{FileSystemResourceLoader, PatternResolver, StaticRootProvider};
//! use std::sync::Arc;
//!
//! let resolver = PatternResolver::builder(Arc::new(FileSystemResourceLoader::new(".")))
//!     .with_root_provider(Arc::new(StaticRootProvider::from_search_path("target/classes:lib/app.jar")))
//!     .build();
//!
//! for handle in resolver.get_resources("classpath*:conf/**/*.yml")? {
//!     println!("{}", handle);
//! }
//! # Ok::<(), rescope_core::ResolveError>(())
//! ```

pub mod config;
pub mod dedup;
pub mod error;
pub mod glob;
pub mod handle;
pub mod loader;
pub mod logging;
pub mod origin;
pub mod pattern;
pub mod resolver;
pub mod roots;

pub use config::{FailurePolicy, ResolverConfig};
pub use dedup::Deduplicator;
pub use error::{ResolveError, Result};
pub use glob::{GlobMatcher, PathMatcher};
pub use handle::{CandidateEntry, OriginKind, ResourceHandle, ResourceLocation};
pub use loader::{FileSystemResourceLoader, SingleResourceLoader};
pub use origin::{OriginEnumerator, ResourceOrigin};
pub use pattern::{LocationPattern, PrefixKind};
pub use resolver::{PatternResolver, PatternResolverBuilder, ResolutionResult, SkippedOrigin};
pub use roots::{RootProvider, StaticRootProvider};
