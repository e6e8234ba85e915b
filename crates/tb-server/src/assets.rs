//! Markdown asset serving.
//!
//! Every path that isn't an API route is looked up in storage. Responses
//! carry an `ETag` so the viewer can revalidate with `If-None-Match`.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use percent_encoding::percent_decode_str;

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET /{path} for anything not matched by an API route.
pub(crate) async fn serve_asset(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response, ServerError> {
    let raw = uri.path().trim_start_matches('/');
    let path = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| ServerError::InvalidPath(raw.to_owned()))?;

    let content = state.storage.read(&path)?;
    tracing::debug!(path = %path, bytes = content.len(), "Serving asset");

    let etag = compute_etag(&state.version, &content);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response());
    }

    let mime = mime_guess::from_path(&*path).first_or_octet_stream();
    let content_type = if mime.type_() == mime_guess::mime::TEXT {
        format!("{mime}; charset=utf-8")
    } else {
        mime.to_string()
    };

    let mut response = (
        [
            (header::CONTENT_TYPE, content_type),
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "no-cache".to_owned()),
        ],
        content,
    )
        .into_response();

    if let Some(last_modified) = last_modified(&state, &path)
        && let Ok(value) = last_modified.parse()
    {
        response.headers_mut().insert(header::LAST_MODIFIED, value);
    }
    Ok(response)
}

/// `Last-Modified` value in HTTP date format, if storage knows the mtime.
fn last_modified(state: &AppState, path: &str) -> Option<String> {
    let mtime = state.storage.mtime(path).ok()?;
    if mtime <= 0.0 {
        return None;
    }
    let modified: DateTime<Utc> = (UNIX_EPOCH + Duration::from_secs_f64(mtime)).into();
    Some(modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
