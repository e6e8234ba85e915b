//! In-memory storage for tests.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::storage::{Asset, Storage, StorageError, StorageErrorKind};

const BACKEND: &str = "Mock";

/// Storage backed by in-memory maps.
///
/// Besides plain content, a path can be configured to fail with a given
/// [`StorageErrorKind`], and every `read` call is recorded so tests can
/// assert how often (and in which order) assets were fetched.
///
/// # Example
///
/// ```ignore
/// use tb_storage::{MockStorage, Storage, StorageErrorKind};
///
/// let storage = MockStorage::new()
///     .with_file("setup.md", "# Setup")
///     .with_failure("broken.md", StorageErrorKind::PermissionDenied);
///
/// assert_eq!(storage.read("setup.md").unwrap(), "# Setup");
/// assert_eq!(storage.reads(), ["setup.md"]);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    contents: RwLock<HashMap<String, String>>,
    failures: RwLock<HashMap<String, StorageErrorKind>>,
    mtimes: RwLock<HashMap<String, f64>>,
    reads: RwLock<Vec<String>>,
}

impl MockStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Make reads of `path` fail with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, path: impl Into<String>, kind: StorageErrorKind) -> Self {
        self.failures.write().unwrap().insert(path.into(), kind);
        self
    }

    /// Set the modification time reported for `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<String>, mtime: f64) -> Self {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
        self
    }

    /// Replace the content of an asset after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<String>, content: impl Into<String>) {
        self.contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Paths passed to [`Storage::read`], in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn reads(&self) -> Vec<String> {
        self.reads.read().unwrap().clone()
    }
}

impl Storage for MockStorage {
    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.reads.write().unwrap().push(path.to_owned());

        if let Some(kind) = self.failures.read().unwrap().get(path) {
            return Err(StorageError::new(*kind)
                .with_path(path)
                .with_backend(BACKEND));
        }
        self.contents
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.contents.read().unwrap().contains_key(path)
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        if !self.exists(path) {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }
        Ok(self.mtimes.read().unwrap().get(path).copied().unwrap_or(0.0))
    }

    fn list(&self) -> Result<Vec<Asset>, StorageError> {
        let mut assets: Vec<_> = self
            .contents
            .read()
            .unwrap()
            .iter()
            .filter(|(path, _)| path.ends_with(".md"))
            .map(|(path, content)| Asset {
                path: path.clone(),
                len: content.len() as u64,
            })
            .collect();
        assets.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(assets)
    }
}
