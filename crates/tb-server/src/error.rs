//! Error types for the HTTP server.

use std::net::{AddrParseError, SocketAddr};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tb_storage::{StorageError, StorageErrorKind};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Host and port do not form a socket address.
    #[error("Invalid address {0}: {1}")]
    Address(String, #[source] AddrParseError),

    /// Listener could not bind.
    #[error("Failed to bind {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),

    /// Request path is not valid UTF-8 after decoding.
    #[error("Invalid asset path: {0}")]
    InvalidPath(String),

    /// Asset lookup failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// I/O error while serving.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::InvalidPath(path) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "Invalid asset path", "path": path}),
            ),
            Self::Storage(e) => match e.kind {
                StorageErrorKind::NotFound => (
                    StatusCode::NOT_FOUND,
                    json!({"error": "Asset not found", "path": storage_path(e)}),
                ),
                StorageErrorKind::InvalidPath => (
                    StatusCode::BAD_REQUEST,
                    json!({"error": "Invalid asset path", "path": storage_path(e)}),
                ),
                _ => {
                    tracing::error!(error = %e, "Failed to read asset");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({"error": "Failed to read asset"}),
                    )
                }
            },
            Self::Address(..) | Self::Bind(..) | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": self.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

fn storage_path(error: &StorageError) -> String {
    error
        .path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_storage_error_status() {
        let cases = [
            (StorageErrorKind::NotFound, StatusCode::NOT_FOUND),
            (StorageErrorKind::InvalidPath, StatusCode::BAD_REQUEST),
            (StorageErrorKind::PermissionDenied, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (kind, status) in cases {
            let response = ServerError::from(StorageError::new(kind)).into_response();
            assert_eq!(response.status(), status, "{kind:?}");
        }
    }
}
