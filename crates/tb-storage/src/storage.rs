//! Storage trait and error types.
//!
//! All path parameters are **asset paths**: forward-slash separated, relative
//! to the storage root, without a leading slash (`"setup.md"`).

use std::path::PathBuf;

/// A stored asset as reported by [`Storage::list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    /// Asset path relative to the storage root.
    pub path: String,
    /// Size in bytes.
    pub len: u64,
}

/// Semantic error category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Asset does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Path escapes the storage root or is otherwise malformed.
    InvalidPath,
    /// Asset exists but is not valid UTF-8 text.
    InvalidData,
    /// Anything else.
    Other,
}

impl StorageErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidPath => "Invalid path",
            Self::InvalidData => "Invalid data",
            Self::Other => "Error",
        }
    }
}

/// Storage error with a semantic kind and an optional backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Asset path, when the error concerns one.
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g. "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Classify an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound
            | std::io::ErrorKind::IsADirectory
            | std::io::ErrorKind::NotADirectory => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }

    /// Whether the error means "nothing there" rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            StorageErrorKind::NotFound | StorageErrorKind::InvalidPath
        )
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // "[Backend] Kind: source (path: foo.md)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }
        f.write_str(self.kind.as_str())?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read access to static documentation assets.
pub trait Storage: Send + Sync {
    /// Read an asset as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the asset doesn't exist, the path is
    /// invalid, or the content can't be read.
    fn read(&self, path: &str) -> Result<String, StorageError>;

    /// Whether an asset exists. Errors count as "doesn't exist".
    fn exists(&self, path: &str) -> bool;

    /// Modification time as seconds since the Unix epoch.
    fn mtime(&self, path: &str) -> Result<f64, StorageError>;

    /// All markdown assets, sorted by path.
    fn list(&self) -> Result<Vec<Asset>, StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_full() {
        let err = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            "setup.md",
        )
        .with_backend("Fs");

        assert_eq!(err.to_string(), "[Fs] Not found: no such file (path: setup.md)");
    }

    #[test]
    fn test_display_minimal() {
        let err = StorageError::new(StorageErrorKind::InvalidPath);
        assert_eq!(err.to_string(), "Invalid path");
    }

    #[test]
    fn test_io_kind_mapping() {
        let denied = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            "a.md",
        );
        assert_eq!(denied.kind, StorageErrorKind::PermissionDenied);
        assert!(!denied.is_not_found());

        let bad = StorageError::io(
            std::io::Error::new(std::io::ErrorKind::InvalidData, "not utf-8"),
            "a.md",
        );
        assert_eq!(bad.kind, StorageErrorKind::InvalidData);

        for kind in [
            std::io::ErrorKind::IsADirectory,
            std::io::ErrorKind::NotADirectory,
        ] {
            let err = StorageError::io(std::io::Error::new(kind, "not a file"), "guides");
            assert_eq!(err.kind, StorageErrorKind::NotFound);
        }
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error as _;

        let err = StorageError::io(std::io::Error::other("boom"), "a.md");
        assert!(err.source().is_some());
        assert!(StorageError::not_found("a.md").source().is_none());
    }
}
