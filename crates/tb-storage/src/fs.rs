//! Filesystem storage implementation.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::storage::{Asset, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Reads documentation assets from a directory on disk.
///
/// # Example
///
/// ```ignore
/// use tb_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new("public/docs");
/// let markdown = storage.read("getting-started.md")?;
/// ```
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory assets are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an asset path to a file under the root.
    ///
    /// Rejects `..` components and absolute paths so a request can never
    /// reach outside the root directory.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(path);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if escapes || path.is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(rel)
                .with_backend(BACKEND));
        }
        Ok(self.root.join(rel))
    }

    fn collect(dir: &Path, base: &Path, assets: &mut Vec<Asset>) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };

        for entry in entries.filter_map(Result::ok) {
            let name = entry.file_name();
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let rel = base.join(&name);
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                Self::collect(&entry.path(), &rel, assets);
            } else if rel.extension().is_some_and(|e| e == "md") {
                let len = entry.metadata().map_or(0, |m| m.len());
                assets.push(Asset {
                    path: rel.to_string_lossy().replace('\\', "/"),
                    len,
                });
            }
        }
    }
}

impl Storage for FsStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        let full_path = self.resolve(path)?;
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok_and(|p| p.is_file())
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let full_path = self.resolve(path)?;
        let modified = fs::metadata(&full_path)
            .and_then(|m| m.modified())
            .map_err(|e| StorageError::io(e, path).with_backend(BACKEND))?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |d| d.as_secs_f64()))
    }

    fn list(&self) -> Result<Vec<Asset>, StorageError> {
        if !self.root.is_dir() {
            return Err(StorageError::not_found(&self.root).with_backend(BACKEND));
        }

        let mut assets = Vec::new();
        Self::collect(&self.root, Path::new(""), &mut assets);
        assets.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::debug!(root = %self.root.display(), count = assets.len(), "Listed assets");
        Ok(assets)
    }
}
