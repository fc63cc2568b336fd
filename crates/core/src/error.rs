use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Malformed location pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },
    #[error("Cannot open origin {origin}: {source}")]
    OriginOpen {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Enumeration failed at {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl ResolveError {
    pub fn malformed(pattern: &str, reason: impl Into<String>) -> Self {
        ResolveError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub fn origin_open(origin: impl Into<String>, source: std::io::Error) -> Self {
        ResolveError::OriginOpen {
            origin: origin.into(),
            source,
        }
    }

    /// Whether this error happened while opening a root rather than walking it.
    pub fn is_open_failure(&self) -> bool {
        matches!(self, ResolveError::OriginOpen { .. })
    }
}

impl From<walkdir::Error> for ResolveError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        let message = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other(message));
        ResolveError::Enumeration { path, source }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
