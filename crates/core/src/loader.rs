//! Single-resource lookup collaborator.

use crate::config::ResolverConfig;
use crate::dedup::canonical_handle;
use crate::error::{ResolveError, Result};
use crate::handle::{ResourceHandle, ResourceLocation};
use crate::origin::{archive, filesystem, is_absent};
use crate::pattern::{
    CLASSPATH_URL_PREFIX, FILE_URL_PREFIX, JAR_URL_PREFIX, JAR_URL_SEPARATOR, scheme_len,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Resolves one exact location to at most one resource.
///
/// Directories and archive directory prefixes count as resources so that
/// they can serve as roots for pattern enumeration.
pub trait SingleResourceLoader: Send + Sync {
    fn get_resource(&self, location: &str) -> Result<Option<ResourceHandle>>;
}

/// Look up a `/`-separated `name` inside one physical root.
///
/// Directory roots are searched by path and archive files (by extension) by
/// entry name. Any other root holds nothing.
pub fn lookup_in_root(
    root: &Path,
    name: &str,
    config: &ResolverConfig,
) -> Result<Option<ResourceHandle>> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => lookup_file(&filesystem::join_relative(root, name)),
        Ok(meta) if meta.is_file() && config.is_archive(root) => lookup_archive_entry(root, name),
        Ok(_) => Ok(None),
        Err(e) if is_absent(&e) => Ok(None),
        Err(e) => Err(ResolveError::origin_open(root.display().to_string(), e)),
    }
}

fn lookup_file(path: &Path) -> Result<Option<ResourceHandle>> {
    match fs::metadata(path) {
        Ok(_) => Ok(Some(canonical_handle(&ResourceLocation::File(
            path.to_path_buf(),
        )))),
        Err(e) if is_absent(&e) => Ok(None),
        Err(e) => Err(ResolveError::origin_open(path.display().to_string(), e)),
    }
}

fn lookup_archive_entry(container: &Path, entry: &str) -> Result<Option<ResourceHandle>> {
    if !container.exists() {
        return Ok(None);
    }
    Ok(archive::lookup(container, entry)?.map(|entry| {
        canonical_handle(&ResourceLocation::ArchiveEntry {
            container: container.to_path_buf(),
            entry,
        })
    }))
}

/// Default loader over the local filesystem.
///
/// - plain paths resolve against `base_dir`
/// - `file:` URLs name a path directly (`file:///abs` or `file:rel`)
/// - `jar:file:<container>!/<entry>` names an archive entry
/// - `classpath:` resolves against the classpath root (a directory or an
///   archive), falling back to `base_dir`
pub struct FileSystemResourceLoader {
    base_dir: PathBuf,
    classpath_root: Option<PathBuf>,
    config: ResolverConfig,
}

impl FileSystemResourceLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            classpath_root: None,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_classpath_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.classpath_root = Some(root.into());
        self
    }

    /// Use the archive extensions of `config` when classifying roots.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    fn file_url_path(&self, rest: &str) -> PathBuf {
        // file:///abs and file:/abs are absolute, file:rel is relative
        let rest = rest.strip_prefix("//").unwrap_or(rest);
        self.base_dir.join(rest)
    }
}

impl SingleResourceLoader for FileSystemResourceLoader {
    fn get_resource(&self, location: &str) -> Result<Option<ResourceHandle>> {
        if let Some(rest) = location.strip_prefix(CLASSPATH_URL_PREFIX) {
            let name = rest.trim_start_matches('/');
            let root = self.classpath_root.as_deref().unwrap_or(&self.base_dir);
            return lookup_in_root(root, name, &self.config);
        }

        if let Some(rest) = location.strip_prefix(JAR_URL_PREFIX) {
            let (container, entry) = rest.split_once(JAR_URL_SEPARATOR).ok_or_else(|| {
                ResolveError::malformed(location, "jar URL has no '!/' entry separator")
            })?;
            let Some(container) = container.strip_prefix(FILE_URL_PREFIX) else {
                return Err(ResolveError::origin_open(
                    location,
                    std::io::Error::new(
                        ErrorKind::Unsupported,
                        "only file: containers are supported in jar URLs",
                    ),
                ));
            };
            return lookup_archive_entry(&self.file_url_path(container), entry);
        }

        if let Some(rest) = location.strip_prefix(FILE_URL_PREFIX) {
            return lookup_file(&self.file_url_path(rest));
        }

        if let Some(len) = scheme_len(location) {
            return Err(ResolveError::origin_open(
                location,
                std::io::Error::new(
                    ErrorKind::Unsupported,
                    format!("unsupported scheme '{}'", &location[..len]),
                ),
            ));
        }

        lookup_file(&self.base_dir.join(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_plain_and_file_urls() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("app.cfg"), "k=v").unwrap();
        let loader = FileSystemResourceLoader::new(temp.path());

        let plain = loader.get_resource("app.cfg").unwrap().unwrap();
        let absolute = format!("file://{}", temp.path().join("app.cfg").display());
        let url = loader.get_resource(&absolute).unwrap().unwrap();
        assert_eq!(plain, url);
        assert_eq!(plain.filename(), Some("app.cfg"));

        assert!(loader.get_resource("missing.cfg").unwrap().is_none());
    }

    #[test]
    fn test_directories_are_resources() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join("conf")).unwrap();
        let loader = FileSystemResourceLoader::new(temp.path());

        let handle = loader.get_resource("conf/").unwrap().unwrap();
        assert!(matches!(handle.location, ResourceLocation::File(ref p) if p.is_dir()));
    }

    #[test]
    fn test_classpath_root_archive() {
        let temp = tempfile::tempdir().unwrap();
        let jar = temp.path().join("app.jar");
        let mut writer = zip::ZipWriter::new(fs::File::create(&jar).unwrap());
        writer
            .start_file("conf/app.cfg", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"k=v").unwrap();
        writer.finish().unwrap();

        let loader = FileSystemResourceLoader::new(temp.path()).with_classpath_root(&jar);
        let handle = loader.get_resource("classpath:/conf/app.cfg").unwrap().unwrap();
        assert!(handle.uri.ends_with("app.jar!/conf/app.cfg"));

        let url = format!("jar:file:{}!/conf/app.cfg", jar.display());
        assert_eq!(loader.get_resource(&url).unwrap().unwrap(), handle);
    }

    #[test]
    fn test_unsupported_scheme() {
        let temp = tempfile::tempdir().unwrap();
        let loader = FileSystemResourceLoader::new(temp.path());
        let err = loader.get_resource("http://example.com/a.cfg").unwrap_err();
        assert!(err.is_open_failure());
    }
}
