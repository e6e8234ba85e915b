//! HTTP server for TaxoBuddy documentation assets.
//!
//! Serves the markdown files the viewer fetches, plus two small JSON
//! endpoints:
//!
//! - `GET /api/navigation`: the document registry in sidebar order
//! - `GET /api/health`: liveness and server version
//! - `GET /<file>`: raw markdown asset from the source directory
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use tb_server::{ServerConfig, run_server};
//! use tb_viewer::DocRegistry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 7979,
//!         source_dir: PathBuf::from("public/docs"),
//!         version: "0.1.0".to_owned(),
//!     };
//!
//!     run_server(config, DocRegistry::builtin()).await.unwrap();
//! }
//! ```

mod app;
mod assets;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tb_storage::{FsStorage, Storage};
use tb_viewer::DocRegistry;

pub use error::ServerError;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the markdown assets.
    pub source_dir: PathBuf,
    /// Application version, reported by `/api/health` and mixed into `ETag`s.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("docs"),
            version: String::new(),
        }
    }
}

impl ServerConfig {
    /// Server configuration from a loaded `tb.toml`.
    #[must_use]
    pub fn from_config(config: &tb_config::Config, version: impl Into<String>) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            source_dir: config.docs_resolved.source_dir.clone(),
            version: version.into(),
        }
    }
}

/// Build the router over any storage backend.
pub fn router(storage: Arc<dyn Storage>, registry: Arc<DocRegistry>, version: &str) -> Router {
    app::create_router(Arc::new(AppState {
        storage,
        registry,
        version: version.to_owned(),
    }))
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(config: ServerConfig, registry: DocRegistry) -> Result<(), ServerError> {
    if !config.source_dir.is_dir() {
        tracing::warn!(
            source_dir = %config.source_dir.display(),
            "Source directory does not exist, every asset request will return 404"
        );
    }

    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.source_dir.clone()));
    let app = router(storage, Arc::new(registry), &config.version);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Address(format!("{}:{}", config.host, config.port), e))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(addr, e))?;
    tracing::info!(
        address = %addr,
        source_dir = %config.source_dir.display(),
        "Starting server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Io)?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_from_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("tb.toml"),
            "[server]\nport = 9000\n\n[docs]\nsource_dir = \"public/docs\"\n",
        )
        .unwrap();
        let config = tb_config::Config::load(Some(&dir.path().join("tb.toml")), None).unwrap();

        let server = ServerConfig::from_config(&config, "1.2.3");

        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(server.port, 9000);
        assert_eq!(server.source_dir, dir.path().join("public/docs"));
        assert_eq!(server.version, "1.2.3");
    }

    #[tokio::test]
    async fn test_serves_files_from_disk() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("deployment.md"), "# Deployment").unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(dir.path()));
        let app = router(storage, Arc::new(DocRegistry::builtin()), "test");

        let response = app
            .oneshot(Request::get("/deployment.md").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"# Deployment");
    }

    #[tokio::test]
    async fn test_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("guides")).unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(dir.path()));
        let app = router(storage, Arc::new(DocRegistry::builtin()), "test");

        let response = app
            .oneshot(Request::get("/guides").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_traversal_on_disk() {
        let dir = TempDir::new().unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(dir.path().join("docs")));
        let app = router(storage, Arc::new(DocRegistry::builtin()), "test");

        let response = app
            .oneshot(Request::get("/..%2Fsecret.md").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
