use std::{
    collections::BTreeMap,
    io::{Cursor, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{StaxError, StaxResult};

/// Read-only file provider the asset registry pulls bytes from.
///
/// Paths are relative, `/`-separated and normalised with [`normalize_rel_path`].
pub trait AssetSource: std::fmt::Debug {
    /// Whole file contents.
    fn read_file(&self, path: &str) -> StaxResult<Vec<u8>>;

    /// Stream over the file contents.
    fn open(&self, path: &str) -> StaxResult<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.read_file(path)?)))
    }

    /// Return `true` when `path` can be read from this source.
    fn exists(&self, path: &str) -> bool;
}

/// Normalize and validate asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> StaxResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(StaxError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(StaxError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(StaxError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(StaxError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Files under a directory on disk.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory files are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> StaxResult<PathBuf> {
        let norm = normalize_rel_path(path)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl AssetSource for DirSource {
    fn read_file(&self, path: &str) -> StaxResult<Vec<u8>> {
        let full = self.resolve(path)?;
        match std::fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StaxError::not_found("asset", path))
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("read asset bytes from '{}'", full.display()))
                .into()),
        }
    }

    fn open(&self, path: &str) -> StaxResult<Box<dyn Read + '_>> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Err(StaxError::not_found("asset", path));
        }
        let f = std::fs::File::open(&full)
            .with_context(|| format!("open asset '{}'", full.display()))?;
        Ok(Box::new(std::io::BufReader::new(f)))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }
}

/// In-memory bundle, typically compiled into the binary.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: &str, bytes: impl Into<Vec<u8>>) -> StaxResult<()> {
        self.files.insert(normalize_rel_path(path)?, bytes.into());
        Ok(())
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with_file(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> StaxResult<Self> {
        self.insert(path, bytes)?;
        Ok(self)
    }

    /// Number of files in the bundle.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Return `true` for an empty bundle.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetSource for MemorySource {
    fn read_file(&self, path: &str) -> StaxResult<Vec<u8>> {
        let norm = normalize_rel_path(path)?;
        self.files
            .get(&norm)
            .cloned()
            .ok_or_else(|| StaxError::not_found("asset", path))
    }

    fn exists(&self, path: &str) -> bool {
        normalize_rel_path(path)
            .map(|norm| self.files.contains_key(&norm))
            .unwrap_or(false)
    }
}

/// Priority-ordered stack of sources; the first layer holding a file serves it.
#[derive(Debug, Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn AssetSource>>,
}

impl LayeredSource {
    /// No layers yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer with lower priority than every existing one.
    pub fn push(&mut self, layer: impl AssetSource + 'static) {
        self.layers.push(Box::new(layer));
    }

    /// Builder-style [`LayeredSource::push`].
    pub fn with_layer(mut self, layer: impl AssetSource + 'static) -> Self {
        self.push(layer);
        self
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    fn layer_for(&self, path: &str) -> StaxResult<&dyn AssetSource> {
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.exists(path) {
                return Ok(layer.as_ref());
            }
            tracing::debug!(path, layer = index, "asset layer miss");
        }
        Err(StaxError::not_found("asset", path))
    }
}

impl AssetSource for LayeredSource {
    fn read_file(&self, path: &str) -> StaxResult<Vec<u8>> {
        self.layer_for(path)?.read_file(path)
    }

    fn open(&self, path: &str) -> StaxResult<Box<dyn Read + '_>> {
        self.layer_for(path)?.open(path)
    }

    fn exists(&self, path: &str) -> bool {
        self.layers.iter().any(|l| l.exists(path))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
