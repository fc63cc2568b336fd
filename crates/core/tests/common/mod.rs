#![allow(dead_code)]

use rescope_core::{
    FileSystemResourceLoader, PatternResolver, ResolverConfig, StaticRootProvider,
};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use zip::write::SimpleFileOptions;

pub fn write_file(root: &Path, relative: &str, body: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, body).unwrap();
    path
}

pub fn write_jar(path: &Path, entries: &[&str]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut writer = zip::ZipWriter::new(fs::File::create(path).unwrap());
    for name in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(name.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

pub fn resolver(base: &Path) -> PatternResolver {
    PatternResolver::builder(Arc::new(FileSystemResourceLoader::new(base))).build()
}

pub fn resolver_with_roots(base: &Path, roots: &[PathBuf], config: ResolverConfig) -> PatternResolver {
    let loader = FileSystemResourceLoader::new(base).with_config(config.clone());
    PatternResolver::builder(Arc::new(loader))
        .with_root_provider(Arc::new(StaticRootProvider::new(roots.to_vec())))
        .with_config(config)
        .build()
}

/// Handle file names, in result order.
pub fn names(result: &rescope_core::ResolutionResult) -> Vec<String> {
    result
        .iter()
        .map(|h| h.filename().unwrap_or_default().to_string())
        .collect()
}
