//! Location pattern parsing.
//!
//! Splits a raw location such as `classpath*:conf/**/app-*.yml` into its
//! prefix kind, literal root segment (`conf/`) and glob suffix
//! (`**/app-*.yml`). Pure string work, no I/O.

use crate::error::{ResolveError, Result};
use crate::glob::{self, GlobMatcher, SEPARATOR};

/// Pseudo prefix searching every physical root.
pub const CLASSPATH_ALL_URL_PREFIX: &str = "classpath*:";
/// Prefix resolving through the loader's single classpath root.
pub const CLASSPATH_URL_PREFIX: &str = "classpath:";
pub const FILE_URL_PREFIX: &str = "file:";
pub const JAR_URL_PREFIX: &str = "jar:";
/// Separates the container from the entry path in a `jar:` URL.
pub const JAR_URL_SEPARATOR: &str = "!/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixKind {
    Plain,
    SingleRoot,
    AllRoots,
    ExplicitUrl,
}

/// A parsed location pattern.
///
/// `root_segment + glob_suffix` is the normalized path portion: for the
/// `classpath:` and `classpath*:` prefixes one leading `/` is dropped, so
/// `classpath:/conf/*.yml` and `classpath:conf/*.yml` parse identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPattern {
    pub prefix_kind: PrefixKind,
    /// Literal prefix as written (`""`, `"classpath:"`, `"file:"`, ...).
    pub prefix: String,
    /// Wildcard-free leading part, ending at a separator when a glob follows.
    pub root_segment: String,
    pub glob_suffix: String,
    pub has_wildcard: bool,
}

impl LocationPattern {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(ResolveError::malformed(raw, "empty location pattern"));
        }

        let (prefix_kind, prefix, path) = split_prefix(raw);

        GlobMatcher::validate(path).map_err(|reason| ResolveError::malformed(raw, reason))?;

        let wildcard_at = glob::first_wildcard(path);

        if prefix == JAR_URL_PREFIX {
            let Some(separator) = path.find(JAR_URL_SEPARATOR) else {
                return Err(ResolveError::malformed(
                    raw,
                    "jar URL has no '!/' entry separator",
                ));
            };
            if wildcard_at.is_some_and(|at| at < separator) {
                return Err(ResolveError::malformed(
                    raw,
                    "wildcards are not allowed in the archive container path",
                ));
            }
        }

        let (root_segment, glob_suffix) = match wildcard_at {
            Some(at) => {
                let root_end = path[..at].rfind(SEPARATOR).map(|i| i + 1).unwrap_or(0);
                (&path[..root_end], &path[root_end..])
            }
            None => (path, ""),
        };

        if prefix_kind == PrefixKind::AllRoots
            && wildcard_at.is_some()
            && root_segment.is_empty()
            && glob_suffix.contains(SEPARATOR)
        {
            return Err(ResolveError::malformed(
                raw,
                "classpath*: patterns must not have wildcards before the first separator",
            ));
        }

        Ok(Self {
            prefix_kind,
            prefix: prefix.to_string(),
            root_segment: root_segment.to_string(),
            glob_suffix: glob_suffix.to_string(),
            has_wildcard: wildcard_at.is_some(),
        })
    }

    /// Path portion, without the prefix.
    pub fn path(&self) -> String {
        format!("{}{}", self.root_segment, self.glob_suffix)
    }

    /// The root segment with its prefix, suitable for a single-resource lookup.
    pub fn root_location(&self) -> String {
        format!("{}{}", self.prefix, self.root_segment)
    }

    /// The full location with its (normalized) prefix.
    pub fn location(&self) -> String {
        format!("{}{}", self.prefix, self.path())
    }
}

fn split_prefix(raw: &str) -> (PrefixKind, &str, &str) {
    if let Some(rest) = raw.strip_prefix(CLASSPATH_ALL_URL_PREFIX) {
        let rest = rest.strip_prefix(SEPARATOR).unwrap_or(rest);
        return (PrefixKind::AllRoots, CLASSPATH_ALL_URL_PREFIX, rest);
    }
    if let Some(rest) = raw.strip_prefix(CLASSPATH_URL_PREFIX) {
        let rest = rest.strip_prefix(SEPARATOR).unwrap_or(rest);
        return (PrefixKind::SingleRoot, CLASSPATH_URL_PREFIX, rest);
    }
    match scheme_len(raw) {
        Some(len) => (PrefixKind::ExplicitUrl, &raw[..=len], &raw[len + 1..]),
        None => (PrefixKind::Plain, "", raw),
    }
}

/// Length of a URL scheme before its ':'. Single letters are drive prefixes.
pub(crate) fn scheme_len(raw: &str) -> Option<usize> {
    let colon = raw.find(':')?;
    let scheme = &raw[..colon];
    let mut chars = scheme.chars();
    let valid = scheme.len() >= 2
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(colon)
}
