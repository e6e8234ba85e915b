//! Raw markdown retrieval.
//!
//! A [`DocFetcher`] turns a descriptor into the markdown text of its source
//! file. Fetching is blocking; the async [`DocViewer`](crate::DocViewer) runs
//! it on the blocking pool. No retries and no caching: calling `fetch` twice
//! issues two requests.

use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tb_storage::{Storage, StorageError};
use ureq::Agent;

use crate::registry::DocumentDescriptor;

/// Bytes escaped inside one URL path segment (RFC 3986 `pchar`).
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Document fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The descriptor has no source file to fetch.
    #[error("document '{0}' has no source file")]
    NoSource(String),
    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },
    /// The request never produced a response (connection, DNS, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The response body couldn't be read as text.
    #[error("failed to read response from {url}: {message}")]
    Body { url: String, message: String },
    /// Local storage read failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The fetch task died before reporting a result.
    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

/// Retrieves the markdown behind a descriptor.
pub trait DocFetcher: Send + Sync {
    /// Fetch the raw markdown for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, non-success status or
    /// when the descriptor has no source file.
    fn fetch(&self, descriptor: &DocumentDescriptor) -> Result<String, FetchError>;
}

fn source_file(descriptor: &DocumentDescriptor) -> Result<&str, FetchError> {
    descriptor
        .source_file
        .as_deref()
        .ok_or_else(|| FetchError::NoSource(descriptor.id.clone()))
}

/// Fetches `GET <base_url>/<source_file>` over HTTP.
pub struct HttpFetcher {
    agent: Agent,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher rooted at `base_url`.
    ///
    /// `timeout` bounds the whole request; `None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Absolute URL of an asset, each path segment percent-encoded.
    #[must_use]
    pub fn url_for(&self, file: &str) -> String {
        let path = file
            .trim_start_matches('/')
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{path}", self.base_url)
    }
}

impl DocFetcher for HttpFetcher {
    fn fetch(&self, descriptor: &DocumentDescriptor) -> Result<String, FetchError> {
        let url = self.url_for(source_file(descriptor)?);
        tracing::info!(id = %descriptor.id, url = %url, "Fetching document");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Body {
                url,
                message: e.to_string(),
            })
    }
}

/// Reads documents straight from a [`Storage`] backend.
pub struct StorageFetcher {
    storage: Arc<dyn Storage>,
}

impl StorageFetcher {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }
}

impl DocFetcher for StorageFetcher {
    fn fetch(&self, descriptor: &DocumentDescriptor) -> Result<String, FetchError> {
        let file = source_file(descriptor)?;
        tracing::debug!(id = %descriptor.id, file, "Reading document from storage");
        Ok(self.storage.read(file.trim_start_matches('/'))?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use pretty_assertions::assert_eq;
    use tb_storage::{MockStorage, StorageErrorKind};

    use super::*;

    fn setup_doc() -> DocumentDescriptor {
        DocumentDescriptor::new("setup", "Setup", Some("setup.md"))
    }

    /// Serve one canned HTTP response and report the request line.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            write!(
                stream,
                "{status_line}\r\nContent-Type: text/markdown\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            request_line.trim_end().to_owned()
        });
        (base_url, handle)
    }

    #[test]
    fn test_url_for() {
        let fetcher = HttpFetcher::new("http://localhost:7979/", None);
        assert_eq!(fetcher.url_for("setup.md"), "http://localhost:7979/setup.md");
        assert_eq!(fetcher.url_for("/setup.md"), "http://localhost:7979/setup.md");
    }

    #[test]
    fn test_url_for_encodes_segments() {
        let fetcher = HttpFetcher::new("http://localhost:7979", None);
        assert_eq!(
            fetcher.url_for("guides/deep dive.md"),
            "http://localhost:7979/guides/deep%20dive.md"
        );
        assert_eq!(
            fetcher.url_for("réseau/q&a #1.md"),
            "http://localhost:7979/r%C3%A9seau/q&a%20%231.md"
        );
    }

    #[test]
    fn test_http_fetch_encodes_path() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "# Deep");
        let fetcher = HttpFetcher::new(base_url, Some(Duration::from_secs(5)));
        let doc = DocumentDescriptor::new("deep", "Deep", Some("guides/deep dive.md"));

        assert_eq!(fetcher.fetch(&doc).unwrap(), "# Deep");
        assert_eq!(server.join().unwrap(), "GET /guides/deep%20dive.md HTTP/1.1");
    }

    #[test]
    fn test_http_fetch_success() {
        let (base_url, server) = serve_once("HTTP/1.1 200 OK", "## Step 1\nDo X");
        let fetcher = HttpFetcher::new(base_url, Some(Duration::from_secs(5)));

        let markdown = fetcher.fetch(&setup_doc()).unwrap();

        assert_eq!(markdown, "## Step 1\nDo X");
        assert_eq!(server.join().unwrap(), "GET /setup.md HTTP/1.1");
    }

    #[test]
    fn test_http_fetch_not_found_is_error() {
        let (base_url, server) = serve_once("HTTP/1.1 404 Not Found", "missing");
        let fetcher = HttpFetcher::new(base_url, Some(Duration::from_secs(5)));

        let err = fetcher.fetch(&setup_doc()).unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }), "{err:?}");
        server.join().unwrap();
    }

    #[test]
    fn test_http_fetch_server_error() {
        let (base_url, server) = serve_once("HTTP/1.1 500 Internal Server Error", "boom");
        let fetcher = HttpFetcher::new(base_url, Some(Duration::from_secs(5)));

        let err = fetcher.fetch(&setup_doc()).unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }), "{err:?}");
        assert!(err.to_string().contains("/setup.md"));
        server.join().unwrap();
    }

    #[test]
    fn test_http_fetch_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let fetcher = HttpFetcher::new(base_url, Some(Duration::from_secs(5)));
        let err = fetcher.fetch(&setup_doc()).unwrap_err();

        assert!(matches!(err, FetchError::Transport { .. }), "{err:?}");
    }

    #[test]
    fn test_fetch_without_source_file() {
        let home = DocumentDescriptor::new("home", "Home", None);
        let fetcher = HttpFetcher::new("http://localhost:1", None);
        assert!(matches!(
            fetcher.fetch(&home),
            Err(FetchError::NoSource(id)) if id == "home"
        ));

        let storage_fetcher = StorageFetcher::new(Arc::new(MockStorage::new()));
        assert!(matches!(
            storage_fetcher.fetch(&home),
            Err(FetchError::NoSource(_))
        ));
    }

    #[test]
    fn test_storage_fetch() {
        let storage = Arc::new(MockStorage::new().with_file("setup.md", "# Setup"));
        let fetcher = StorageFetcher::new(Arc::clone(&storage) as Arc<dyn Storage>);

        assert_eq!(fetcher.fetch(&setup_doc()).unwrap(), "# Setup");
        assert_eq!(fetcher.fetch(&setup_doc()).unwrap(), "# Setup");
        assert_eq!(storage.reads(), ["setup.md", "setup.md"]);
    }

    #[test]
    fn test_storage_fetch_error() {
        let storage = MockStorage::new().with_failure("setup.md", StorageErrorKind::PermissionDenied);
        let fetcher = StorageFetcher::new(Arc::new(storage));

        let err = fetcher.fetch(&setup_doc()).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Storage(ref e) if e.kind == StorageErrorKind::PermissionDenied
        ));
    }
}
