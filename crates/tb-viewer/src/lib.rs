//! Documentation viewer.
//!
//! Maps locations to documents, fetches their markdown and tracks what the
//! documentation page currently shows:
//!
//! - [`DocRegistry`]: ordered catalog of pages
//! - [`Navigator`]: location path to document id
//! - [`DocFetcher`]: raw markdown retrieval over HTTP or from storage
//! - [`DocViewState`]: `Idle -> Loading -> Loaded | Error` per navigation
//! - [`DocViewer`]: async owner that runs fetches and applies their results
//! - [`ThemePreference`]: persisted light/dark choice
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tb_viewer::{DocRegistry, DocViewer, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new("http://127.0.0.1:7979", None);
//! let mut viewer = DocViewer::new(Arc::new(DocRegistry::builtin()), Arc::new(fetcher));
//! viewer.visit("/getting-started");
//! let state = viewer.settle().await;
//! println!("{}", state.content());
//! ```

mod fetcher;
mod navigator;
mod registry;
mod state;
mod theme;
mod viewer;

pub use fetcher::{DocFetcher, FetchError, HttpFetcher, StorageFetcher};
pub use navigator::{Navigate, Navigator, resolve};
pub use registry::{DocRegistry, DocumentDescriptor, HOME_ID, NavItem, QuickLink, SourceAudit};
pub use state::{
    Completion, DocViewState, ERROR_MESSAGE, FetchRequest, RequestToken, ViewStatus,
};
pub use theme::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, THEME_KEY,
    Theme, ThemePreference, UnknownTheme,
};
pub use viewer::{DocViewer, FetchCompletion};
