//! Directory tree enumeration.

use super::CandidateStream;
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::glob::PathMatcher;
use crate::handle::CandidateEntry;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Lazily walk `base`, yielding one candidate per regular file.
///
/// Failure to read `base` itself is an open error; anything below it is an
/// enumeration error.
pub fn walk<'a>(
    base: &'a Path,
    config: &ResolverConfig,
    matcher: &'a dyn PathMatcher,
    pattern: Option<&'a str>,
) -> CandidateStream<'a> {
    let mut walker = WalkDir::new(base)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .min_depth(1);
    if let Some(depth) = config.max_depth {
        walker = walker.max_depth(depth);
    }

    let prune_base = base.to_path_buf();
    Box::new(
        walker
            .into_iter()
            .filter_entry(move |entry| should_descend(entry, &prune_base, matcher, pattern))
            .filter_map(move |entry| match entry {
                Ok(entry) if is_regular_file(&entry) => Some(Ok(CandidateEntry::file(
                    entry.path().to_path_buf(),
                    relative_path(base, entry.path()),
                ))),
                Ok(_) => None,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("cannot read base directory"));
                    Some(Err(ResolveError::origin_open(
                        base.display().to_string(),
                        source,
                    )))
                }
                Err(e) => Some(Err(e.into())),
            }),
    )
}

fn should_descend(
    entry: &DirEntry,
    base: &Path,
    matcher: &dyn PathMatcher,
    pattern: Option<&str>,
) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    if !entry.file_type().is_dir() {
        return true;
    }
    matcher.matches_start(&relative_path(base, entry.path()), pattern)
}

fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// `path` relative to `base`, always `/`-separated.
pub fn relative_path(base: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a `/`-separated relative path onto `base`.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glob::GlobMatcher;
    use std::fs;

    fn collect(base: &Path, config: &ResolverConfig, pattern: Option<&str>) -> Vec<String> {
        let matcher = GlobMatcher;
        walk(base, config, &matcher, pattern)
            .map(|c| c.unwrap().relative_path)
            .collect()
    }

    #[test]
    fn test_walk_yields_files_only_in_name_order() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a/b/c")).unwrap();
        fs::write(temp.path().join("a/b/c/d.txt"), "d").unwrap();
        fs::write(temp.path().join("z.txt"), "z").unwrap();
        fs::write(temp.path().join(".hidden"), "h").unwrap();

        let files = collect(temp.path(), &ResolverConfig::default(), None);
        assert_eq!(files, vec![".hidden", "a/b/c/d.txt", "z.txt"]);
    }

    #[test]
    fn test_walk_prunes_unmatched_directories() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("keep/sub")).unwrap();
        fs::create_dir_all(temp.path().join("skip")).unwrap();
        fs::write(temp.path().join("keep/sub/x.txt"), "x").unwrap();
        fs::write(temp.path().join("skip/y.txt"), "y").unwrap();

        let files = collect(temp.path(), &ResolverConfig::default(), Some("keep/*/*.txt"));
        assert_eq!(files, vec!["keep/sub/x.txt"]);
    }

    #[test]
    fn test_max_depth() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a/b")).unwrap();
        fs::write(temp.path().join("top.txt"), "t").unwrap();
        fs::write(temp.path().join("a/b/deep.txt"), "d").unwrap();

        let config = ResolverConfig {
            max_depth: Some(1),
            ..ResolverConfig::default()
        };
        assert_eq!(collect(temp.path(), &config, None), vec!["top.txt"]);
    }

    #[test]
    fn test_missing_base_is_open_error() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing");
        let config = ResolverConfig::default();
        let matcher = GlobMatcher;

        let results: Vec<_> = walk(&missing, &config, &matcher, None).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ResolveError::OriginOpen { .. })));
    }

    #[test]
    fn test_relative_path_helpers() {
        let base = Path::new("/srv/root");
        assert_eq!(relative_path(base, Path::new("/srv/root/a/b.txt")), "a/b.txt");
        assert_eq!(
            join_relative(base, "a/b.txt"),
            PathBuf::from("/srv/root/a/b.txt")
        );
    }
}
