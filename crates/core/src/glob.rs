//! Segment-aware glob matching.
//!
//! Patterns are split on `/` and matched one segment at a time:
//!
//! - `?` matches exactly one character of a segment
//! - `*` matches zero or more characters of a segment
//! - `**` as a whole segment matches zero or more segments
//! - `[a-z]`, `[!x]` match one character from (or outside) a class
//! - `{alpha,beta}` matches any of the alternatives
//! - `\` escapes the next character
//!
//! Wildcards never cross a separator, so `a/*/c` does not match `a/b/x/c`.

pub const SEPARATOR: char = '/';

const WILDCARD_CHARS: [char; 4] = ['*', '?', '[', '{'];

/// Path matching strategy used by the resolver.
pub trait PathMatcher: Send + Sync {
    /// Whether `path` contains any pattern syntax. The resolver asks this of
    /// a location's glob suffix; `false` resolves the location literally.
    fn is_pattern(&self, path: &str) -> bool;

    /// Whether `path` matches `pattern` completely.
    fn matches(&self, path: &str, pattern: &str) -> bool;

    /// Whether some path strictly below directory `dir` could match `pattern`.
    fn matches_start(&self, dir: &str, pattern: &str) -> bool;
}

/// Default [`PathMatcher`]: classic backtracking glob, no regex compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl GlobMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Check bracket structure of a pattern, returning a description of the
    /// first problem found.
    pub fn validate(pattern: &str) -> Result<(), String> {
        for segment in pattern.split(SEPARATOR) {
            let chars: Vec<char> = segment.chars().collect();
            let mut i = 0;
            while i < chars.len() {
                match chars[i] {
                    '\\' => i += 2,
                    '[' => match parse_class(&chars[i + 1..]) {
                        Some((_, consumed)) => i += consumed + 1,
                        None => return Err(format!("unterminated '[' in segment '{}'", segment)),
                    },
                    '{' => match split_alternatives(&chars[i + 1..]) {
                        Some((_, consumed)) => i += consumed + 1,
                        None => return Err(format!("unterminated '{{' in segment '{}'", segment)),
                    },
                    _ => i += 1,
                }
            }
        }
        Ok(())
    }
}

impl PathMatcher for GlobMatcher {
    fn is_pattern(&self, path: &str) -> bool {
        has_wildcard(path)
    }

    fn matches(&self, path: &str, pattern: &str) -> bool {
        match_segments(&segments(pattern), &segments(path))
    }

    fn matches_start(&self, dir: &str, pattern: &str) -> bool {
        match_start(&segments(pattern), &segments(dir))
    }
}

/// Whether `path` contains any glob wildcard character.
pub fn has_wildcard(path: &str) -> bool {
    path.contains(WILDCARD_CHARS)
}

/// Byte index of the first wildcard character, if any.
pub fn first_wildcard(path: &str) -> Option<usize> {
    path.find(WILDCARD_CHARS)
}

fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

fn is_globstar(segment: &str) -> bool {
    segment == "**"
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((first, rest)) if is_globstar(first) => {
            let rest = skip_globstars(rest);
            if rest.is_empty() {
                return true;
            }
            // Try consuming zero segments, then one, and so on
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((first, rest)) => match path.split_first() {
            Some((head, tail)) => match_segment(first, head) && match_segments(rest, tail),
            None => false,
        },
    }
}

fn match_start(pattern: &[&str], dir: &[&str]) -> bool {
    match (pattern.split_first(), dir.split_first()) {
        (Some((first, _)), _) if is_globstar(first) => true,
        // Directory consumed: a file below it needs at least one more segment
        (_, None) => !pattern.is_empty(),
        (None, Some(_)) => false,
        (Some((first, rest)), Some((head, tail))) => {
            match_segment(first, head) && match_start(rest, tail)
        }
    }
}

fn skip_globstars<'a, 'b>(mut pattern: &'a [&'b str]) -> &'a [&'b str] {
    while let Some((first, rest)) = pattern.split_first() {
        if !is_globstar(first) {
            break;
        }
        pattern = rest;
    }
    pattern
}

fn match_segment(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let s: Vec<char> = text.chars().collect();
    expand_alternatives(&p)
        .iter()
        .any(|alternative| match_tokens(&tokenize(alternative), &s))
}

/// One single-character matcher of a segment pattern, or a star.
enum Token {
    Literal(char),
    Any,
    Star,
    Class(CharClass),
}

impl Token {
    fn accepts(&self, c: char) -> bool {
        match self {
            Token::Literal(expected) => *expected == c,
            Token::Any => true,
            Token::Class(class) => class.contains(c),
            Token::Star => false,
        }
    }
}

/// Rewrite `{a,b}` groups into one brace-free pattern per alternative.
fn expand_alternatives(p: &[char]) -> Vec<Vec<char>> {
    let mut i = 0;
    while i < p.len() {
        match p[i] {
            '\\' => i += 2,
            '[' => match parse_class(&p[i + 1..]) {
                Some((_, consumed)) => i += consumed + 1,
                None => i += 1,
            },
            '{' => match split_alternatives(&p[i + 1..]) {
                Some((alternatives, consumed)) => {
                    let head = &p[..i];
                    let tail = &p[i + 1 + consumed..];
                    return alternatives
                        .into_iter()
                        .flat_map(|alternative| {
                            let mut candidate = head.to_vec();
                            candidate.extend(alternative);
                            candidate.extend_from_slice(tail);
                            expand_alternatives(&candidate)
                        })
                        .collect();
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    vec![p.to_vec()]
}

fn tokenize(p: &[char]) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(p.len());
    let mut i = 0;
    while i < p.len() {
        match p[i] {
            '*' => {
                if !matches!(tokens.last(), Some(Token::Star)) {
                    tokens.push(Token::Star);
                }
                i += 1;
            }
            '?' => {
                tokens.push(Token::Any);
                i += 1;
            }
            '[' => match parse_class(&p[i + 1..]) {
                Some((class, consumed)) => {
                    tokens.push(Token::Class(class));
                    i += consumed + 1;
                }
                None => {
                    tokens.push(Token::Literal('['));
                    i += 1;
                }
            },
            '\\' if i + 1 < p.len() => {
                tokens.push(Token::Literal(p[i + 1]));
                i += 2;
            }
            c => {
                tokens.push(Token::Literal(c));
                i += 1;
            }
        }
    }
    tokens
}

/// Iterative star matching: on a mismatch, resume after the most recent star
/// with one more character absorbed by it. Runs in O(tokens * chars).
fn match_tokens(tokens: &[Token], s: &[char]) -> bool {
    let (mut t, mut i) = (0, 0);
    let mut resume: Option<(usize, usize)> = None;

    while i < s.len() {
        match tokens.get(t) {
            Some(Token::Star) => {
                t += 1;
                resume = Some((t, i));
                continue;
            }
            Some(token) if token.accepts(s[i]) => {
                t += 1;
                i += 1;
                continue;
            }
            _ => {}
        }
        match resume {
            Some((star_t, star_i)) => {
                t = star_t;
                i = star_i + 1;
                resume = Some((star_t, star_i + 1));
            }
            None => return false,
        }
    }
    tokens[t..].iter().all(|token| matches!(token, Token::Star))
}

struct CharClass {
    negated: bool,
    ranges: Vec<(char, char)>,
}

impl CharClass {
    fn contains(&self, c: char) -> bool {
        let hit = self.ranges.iter().any(|(lo, hi)| *lo <= c && c <= *hi);
        hit != self.negated
    }
}

/// Parse a class body following `[`. Returns the class and the number of
/// chars consumed including the closing `]`.
fn parse_class(p: &[char]) -> Option<(CharClass, usize)> {
    let mut i = 0;
    let negated = matches!(p.first(), Some('!') | Some('^'));
    if negated {
        i = 1;
    }

    let body_start = i;
    let mut ranges = Vec::new();
    while i < p.len() {
        let c = p[i];
        // A ']' first in the body is a literal
        if c == ']' && i > body_start {
            return Some((CharClass { negated, ranges }, i + 1));
        }
        if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            ranges.push((c, p[i + 2]));
            i += 3;
        } else {
            ranges.push((c, c));
            i += 1;
        }
    }
    None
}

/// Split an alternatives body following `{`. Returns the alternatives and the
/// number of chars consumed including the closing `}`.
fn split_alternatives(p: &[char]) -> Option<(Vec<Vec<char>>, usize)> {
    let mut depth = 0usize;
    let mut current = Vec::new();
    let mut alternatives = Vec::new();

    for (i, &c) in p.iter().enumerate() {
        match c {
            '{' => {
                depth += 1;
                current.push(c);
            }
            '}' if depth == 0 => {
                alternatives.push(current);
                return Some((alternatives, i + 1));
            }
            '}' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => alternatives.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    None
}
