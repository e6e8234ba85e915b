//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use tb_storage::Storage;
use tb_viewer::DocRegistry;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Markdown assets.
    pub(crate) storage: Arc<dyn Storage>,
    /// Documentation catalog for the navigation endpoint.
    pub(crate) registry: Arc<DocRegistry>,
    /// Application version for health checks and `ETag`s.
    pub(crate) version: String,
}
