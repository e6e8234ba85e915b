//! Storage abstraction for static documentation assets.
//!
//! Documentation pages are plain markdown files addressed by their asset path
//! (`getting-started.md`, `guides/setup.md`). The [`Storage`] trait hides where
//! those files live so the asset server and the local document fetcher can
//! share one implementation, and tests can run without touching the disk.
//!
//! - [`FsStorage`] reads from a directory on the local filesystem
//! - [`MockStorage`] keeps assets in memory (behind the `mock` feature)

mod fs;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStorage;
pub use storage::{Asset, Storage, StorageError, StorageErrorKind};
