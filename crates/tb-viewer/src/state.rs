//! Per-navigation view state machine.
//!
//! ```text
//! Idle/Loading/Loaded/Error --navigate(id with file)--> Loading
//! Idle/Loading/Loaded/Error --navigate(id without file or unknown)--> Loaded (empty)
//! Loading --fetch_succeeded(current)--> Loaded
//! Loading --fetch_failed(current)--> Error
//! ```
//!
//! Each `navigate` bumps a generation counter. The [`RequestToken`] handed
//! out with a fetch request carries that generation, and completions whose
//! token is no longer current are dropped.

use tb_renderer::{HtmlBackend, MarkdownRenderer, TocEntry};

use crate::fetcher::FetchError;
use crate::registry::{DocRegistry, DocumentDescriptor};

/// Message shown in place of a document that failed to load.
pub const ERROR_MESSAGE: &str = "Error loading documentation.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Identifies the navigation a fetch belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestToken {
    pub generation: u64,
    pub id: String,
}

/// Fetch the owner of the state must start after a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub descriptor: DocumentDescriptor,
}

/// Whether a completion changed the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Completion {
    Applied,
    Stale,
}

/// View state of the documentation page.
///
/// `content` holds rendered HTML and is non-empty only while `Loaded`.
/// `toc` lists the headings of that HTML and is cleared along with it.
#[derive(Debug)]
pub struct DocViewState {
    status: ViewStatus,
    content: String,
    toc: Vec<TocEntry>,
    active_id: Option<String>,
    generation: u64,
}

impl Default for DocViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl DocViewState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: ViewStatus::Idle,
            content: String::new(),
            toc: Vec::new(),
            active_id: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn status(&self) -> ViewStatus {
        self.status
    }

    /// Rendered HTML of the active document.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Headings of the active document, in order.
    #[must_use]
    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fallback message while in the `Error` state.
    #[must_use]
    pub fn error_message(&self) -> Option<&'static str> {
        (self.status == ViewStatus::Error).then_some(ERROR_MESSAGE)
    }

    /// Whether `token` belongs to the latest navigation.
    #[must_use]
    pub fn is_current(&self, token: &RequestToken) -> bool {
        token.generation == self.generation && self.active_id.as_deref() == Some(&token.id)
    }

    /// Start showing document `id`.
    ///
    /// Returns the fetch to start when the document has a source file. Ids
    /// without a file, and ids missing from the registry, go straight to
    /// `Loaded` with empty content.
    pub fn navigate(&mut self, registry: &DocRegistry, id: &str) -> Option<FetchRequest> {
        self.generation += 1;
        self.active_id = Some(id.to_owned());
        self.content.clear();
        self.toc.clear();

        let Some(descriptor) = registry.find(id) else {
            tracing::debug!(id, "Unknown document id, rendering nothing");
            self.status = ViewStatus::Loaded;
            return None;
        };
        if descriptor.source_file.is_none() {
            self.status = ViewStatus::Loaded;
            return None;
        }

        self.status = ViewStatus::Loading;
        Some(FetchRequest {
            token: RequestToken {
                generation: self.generation,
                id: id.to_owned(),
            },
            descriptor: descriptor.clone(),
        })
    }

    /// Apply fetched markdown for `token`.
    pub fn fetch_succeeded(&mut self, token: &RequestToken, markdown: &str) -> Completion {
        if !self.accepts(token) {
            return Completion::Stale;
        }
        let rendered = MarkdownRenderer::<HtmlBackend>::new().render_markdown(markdown);
        self.content = rendered.html;
        self.toc = rendered.toc;
        self.status = ViewStatus::Loaded;
        Completion::Applied
    }

    /// Record a failed fetch for `token`.
    pub fn fetch_failed(&mut self, token: &RequestToken, error: &FetchError) -> Completion {
        if !self.accepts(token) {
            return Completion::Stale;
        }
        tracing::warn!(id = %token.id, error = %error, "Error loading documentation");
        self.content.clear();
        self.toc.clear();
        self.status = ViewStatus::Error;
        Completion::Applied
    }

    /// Apply a fetch outcome.
    pub fn complete(
        &mut self,
        token: &RequestToken,
        result: &Result<String, FetchError>,
    ) -> Completion {
        match result {
            Ok(markdown) => self.fetch_succeeded(token, markdown),
            Err(error) => self.fetch_failed(token, error),
        }
    }

    fn accepts(&self, token: &RequestToken) -> bool {
        let accepted = self.status == ViewStatus::Loading && self.is_current(token);
        if !accepted {
            tracing::debug!(
                id = %token.id,
                generation = token.generation,
                current = self.generation,
                "Discarding stale fetch result"
            );
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn registry() -> DocRegistry {
        DocRegistry::new(
            "home",
            vec![
                DocumentDescriptor::new("home", "Home", None),
                DocumentDescriptor::new("setup", "Setup", Some("setup.md")),
                DocumentDescriptor::new("deploy", "Deploy", Some("deploy.md")),
            ],
        )
    }

    fn network_error() -> FetchError {
        FetchError::Transport {
            url: "http://localhost/setup.md".to_owned(),
            message: "connection refused".to_owned(),
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DocViewState::new();
        assert_eq!(state.status(), ViewStatus::Idle);
        assert_eq!(state.content(), "");
        assert_eq!(state.active_id(), None);
        assert_eq!(state.error_message(), None);
    }

    #[test]
    fn test_home_is_loaded_without_fetch() {
        let mut state = DocViewState::new();
        let request = state.navigate(&registry(), "home");

        assert_eq!(request, None);
        assert_eq!(state.status(), ViewStatus::Loaded);
        assert_eq!(state.content(), "");
        assert_eq!(state.active_id(), Some("home"));
    }

    #[test]
    fn test_unknown_id_is_loaded_empty() {
        let mut state = DocViewState::new();
        assert_eq!(state.navigate(&registry(), "no-such-doc"), None);
        assert_eq!(state.status(), ViewStatus::Loaded);
        assert_eq!(state.content(), "");
        assert_eq!(state.active_id(), Some("no-such-doc"));
    }

    #[test]
    fn test_navigate_with_file_starts_loading() {
        let mut state = DocViewState::new();
        let request = state.navigate(&registry(), "setup").unwrap();

        assert_eq!(state.status(), ViewStatus::Loading);
        assert_eq!(state.content(), "");
        assert_eq!(request.token.id, "setup");
        assert_eq!(request.token.generation, state.generation());
        assert_eq!(request.descriptor.source_file.as_deref(), Some("setup.md"));
    }

    #[test]
    fn test_success_renders_markdown() {
        let mut state = DocViewState::new();
        let request = state.navigate(&registry(), "setup").unwrap();

        let outcome = state.fetch_succeeded(&request.token, "## Step 1\nDo X");

        assert_eq!(outcome, Completion::Applied);
        assert_eq!(state.status(), ViewStatus::Loaded);
        assert_eq!(
            state.content(),
            r#"<h2 id="step-1">Step 1</h2><p>Do X</p>"#
        );
        let ids: Vec<_> = state.toc().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["step-1"]);
    }

    #[test]
    fn test_failure_sets_error() {
        let mut state = DocViewState::new();
        let request = state.navigate(&registry(), "setup").unwrap();

        let outcome = state.fetch_failed(&request.token, &network_error());

        assert_eq!(outcome, Completion::Applied);
        assert_eq!(state.status(), ViewStatus::Error);
        assert_eq!(state.content(), "");
        assert_eq!(state.error_message(), Some("Error loading documentation."));
    }

    #[test]
    fn test_status_error_is_fetch_failure() {
        let mut state = DocViewState::new();
        let request = state.navigate(&registry(), "setup").unwrap();
        let result = Err(FetchError::Status {
            status: 404,
            url: "http://localhost/setup.md".to_owned(),
        });

        assert_eq!(state.complete(&request.token, &result), Completion::Applied);
        assert_eq!(state.status(), ViewStatus::Error);
    }

    #[test]
    fn test_stale_success_is_discarded() {
        let registry = registry();
        let mut state = DocViewState::new();
        let first = state.navigate(&registry, "setup").unwrap();
        let second = state.navigate(&registry, "deploy").unwrap();

        // Second request completes first, then the first one arrives late.
        assert_eq!(
            state.fetch_succeeded(&second.token, "# Deploy"),
            Completion::Applied
        );
        assert_eq!(
            state.fetch_succeeded(&first.token, "# Setup"),
            Completion::Stale
        );

        assert_eq!(state.active_id(), Some("deploy"));
        assert_eq!(state.content(), r#"<h1 id="deploy">Deploy</h1>"#);
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let registry = registry();
        let mut state = DocViewState::new();
        let first = state.navigate(&registry, "setup").unwrap();
        let second = state.navigate(&registry, "deploy").unwrap();

        assert_eq!(
            state.fetch_failed(&first.token, &network_error()),
            Completion::Stale
        );
        assert_eq!(state.status(), ViewStatus::Loading);

        assert_eq!(
            state.fetch_succeeded(&second.token, "ok"),
            Completion::Applied
        );
        assert_eq!(state.status(), ViewStatus::Loaded);
    }

    #[test]
    fn test_same_id_twice_keeps_only_latest() {
        let registry = registry();
        let mut state = DocViewState::new();
        let first = state.navigate(&registry, "setup").unwrap();
        let second = state.navigate(&registry, "setup").unwrap();

        assert_ne!(first.token, second.token);
        assert_eq!(state.fetch_succeeded(&first.token, "old"), Completion::Stale);
        assert_eq!(state.fetch_succeeded(&second.token, "new"), Completion::Applied);
        assert_eq!(state.content(), "<p>new</p>");
    }

    #[test]
    fn test_late_result_after_navigating_home() {
        let registry = registry();
        let mut state = DocViewState::new();
        let request = state.navigate(&registry, "setup").unwrap();
        assert_eq!(state.navigate(&registry, "home"), None);

        assert_eq!(
            state.fetch_succeeded(&request.token, "# Setup"),
            Completion::Stale
        );
        assert_eq!(state.status(), ViewStatus::Loaded);
        assert_eq!(state.content(), "");
    }

    #[test]
    fn test_duplicate_completion_is_ignored() {
        let mut state = DocViewState::new();
        let request = state.navigate(&registry(), "setup").unwrap();

        assert_eq!(state.fetch_succeeded(&request.token, "one"), Completion::Applied);
        assert_eq!(state.fetch_failed(&request.token, &network_error()), Completion::Stale);
        assert_eq!(state.status(), ViewStatus::Loaded);
        assert_eq!(state.content(), "<p>one</p>");
    }

    #[test]
    fn test_renavigate_from_error_clears_message() {
        let registry = registry();
        let mut state = DocViewState::new();
        let request = state.navigate(&registry, "setup").unwrap();
        let _ = state.fetch_failed(&request.token, &network_error());

        let retry = state.navigate(&registry, "setup").unwrap();
        assert_eq!(state.status(), ViewStatus::Loading);
        assert_eq!(state.error_message(), None);

        let _ = state.fetch_succeeded(&retry.token, "back");
        assert_eq!(state.content(), "<p>back</p>");
    }

    #[test]
    fn test_content_empty_unless_loaded() {
        let registry = registry();
        let mut state = DocViewState::new();
        let request = state.navigate(&registry, "setup").unwrap();
        let _ = state.fetch_succeeded(&request.token, "text");
        assert!(!state.content().is_empty());

        let _ = state.navigate(&registry, "deploy");
        assert_eq!(state.status(), ViewStatus::Loading);
        assert_eq!(state.content(), "");
    }

    #[test]
    fn test_toc_cleared_with_content() {
        let registry = registry();
        let mut state = DocViewState::new();
        let request = state.navigate(&registry, "setup").unwrap();
        let _ = state.fetch_succeeded(&request.token, "# Setup\n\n## Install");
        assert_eq!(state.toc().len(), 2);
        assert_eq!(state.toc()[1].level, 2);

        let next = state.navigate(&registry, "deploy").unwrap();
        assert!(state.toc().is_empty());
        let _ = state.fetch_failed(&next.token, &network_error());
        assert!(state.toc().is_empty());
    }
}
