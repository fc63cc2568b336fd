mod common;

use common::{names, resolver, write_file};
use rescope_core::{
    FileSystemResourceLoader, OriginKind, ResolveError, ResolverConfig, SingleResourceLoader,
};
use std::io::Read;
use tempfile::tempdir;

#[test]
fn test_exact_pattern_matches_single_lookup() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "conf/app.cfg", "k=v");

    let loader = FileSystemResourceLoader::new(dir.path());
    let direct = loader.get_resource("conf/app.cfg").unwrap().unwrap();

    let result = resolver(dir.path()).get_resources("conf/app.cfg").unwrap();
    assert_eq!(result.handles(), &[direct]);
    assert!(result.is_complete());
}

#[test]
fn test_exact_pattern_finds_hidden_file() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), ".secrets/.env", "TOKEN=1");

    let result = resolver(dir.path()).get_resources(".secrets/.env").unwrap();
    assert_eq!(names(&result), vec![".env"]);
}

#[test]
fn test_no_match_is_empty_not_error() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a.txt", "a");

    let resolver = resolver(dir.path());
    assert!(resolver.get_resources("missing.txt").unwrap().is_empty());
    assert!(resolver.get_resources("*.xml").unwrap().is_empty());
    assert!(resolver.get_resources("nowhere/**/*.txt").unwrap().is_empty());
}

#[test]
fn test_globstar_versus_single_star_depth() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "a/b/c/d.txt", "d");

    let resolver = resolver(dir.path());
    let deep = resolver.get_resources("**/*.txt").unwrap();
    assert_eq!(names(&deep), vec!["d.txt"]);

    let shallow = resolver.get_resources("*/*.txt").unwrap();
    assert!(shallow.is_empty());
}

#[test]
fn test_root_segment_limits_walk() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "conf/app.yml", "a");
    write_file(dir.path(), "conf/env/prod.yml", "p");
    write_file(dir.path(), "other/ignored.yml", "i");

    let result = resolver(dir.path())
        .get_resources("conf/**/*.yml")
        .unwrap();
    assert_eq!(names(&result), vec!["app.yml", "prod.yml"]);
    assert!(result.iter().all(|h| h.origin_kind == OriginKind::Filesystem));
}

#[test]
fn test_file_url_pattern() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "data/2024.csv", "x");
    write_file(dir.path(), "data/2025.csv", "y");
    write_file(dir.path(), "data/notes.md", "z");

    let elsewhere = tempdir().unwrap();
    let pattern = format!("file:{}/data/20[0-9][0-9].csv", dir.path().display());
    let result = resolver(elsewhere.path()).get_resources(&pattern).unwrap();
    assert_eq!(names(&result), vec!["2024.csv", "2025.csv"]);
}

#[test]
fn test_handles_open_their_content() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "msg.txt", "hello");

    let result = resolver(dir.path()).get_resources("*.txt").unwrap();
    let mut body = String::new();
    result.handles()[0]
        .open()
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    assert_eq!(body, "hello");
}

#[test]
fn test_malformed_pattern_is_rejected() {
    let dir = tempdir().unwrap();
    let err = resolver(dir.path()).get_resources("conf/{a,b").unwrap_err();
    assert!(matches!(err, ResolveError::MalformedPattern { .. }));
}

#[test]
fn test_unsupported_scheme_is_open_error() {
    let dir = tempdir().unwrap();
    let err = resolver(dir.path())
        .get_resources("ftp://host/*.txt")
        .unwrap_err();
    assert!(matches!(err, ResolveError::OriginOpen { .. }));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_strict_and_lenient() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write_file(dir.path(), "ok/a.txt", "a");
    let locked = dir.path().join("locked");
    write_file(dir.path(), "locked/b.txt", "b");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Running as root ignores directory permissions
    if std::fs::read_dir(&locked).is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let strict = resolver(dir.path()).get_resources("**/*.txt");
    assert!(matches!(strict, Err(ResolveError::Enumeration { .. })));

    let lenient_config = ResolverConfig {
        failure_policy: rescope_core::FailurePolicy::Lenient,
        ..ResolverConfig::default()
    };
    let lenient = common::resolver_with_roots(dir.path(), &[], lenient_config)
        .get_resources("**/*.txt")
        .unwrap();
    assert_eq!(names(&lenient), vec!["a.txt"]);
    assert!(!lenient.is_complete());
    assert_eq!(lenient.skipped().len(), 1);

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_follow_links_controls_symlinked_directories() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("base");
    write_file(&base, "own.txt", "own");
    let shared = dir.path().join("shared");
    write_file(&shared, "linked.txt", "linked");
    std::os::unix::fs::symlink(&shared, base.join("shared")).unwrap();

    let followed = resolver(&base).get_resources("**/*.txt").unwrap();
    assert_eq!(names(&followed), vec!["own.txt", "linked.txt"]);

    let no_follow = ResolverConfig {
        follow_links: false,
        ..ResolverConfig::default()
    };
    let unfollowed = common::resolver_with_roots(&base, &[], no_follow)
        .get_resources("**/*.txt")
        .unwrap();
    assert_eq!(names(&unfollowed), vec!["own.txt"]);
}
