//! Async driver that owns the view state.
//!
//! Fetches run on tokio's blocking pool and report back over a channel. The
//! viewer applies completions one at a time, in arrival order, so the state
//! is only ever mutated by its owner.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::fetcher::{DocFetcher, FetchError};
use crate::navigator::Navigator;
use crate::registry::DocRegistry;
use crate::state::{Completion, DocViewState, FetchRequest, RequestToken};

/// Result of one fetch, tagged with the navigation it belongs to.
#[derive(Debug)]
pub struct FetchCompletion {
    pub token: RequestToken,
    pub result: Result<String, FetchError>,
}

/// Documentation page container.
///
/// Navigation is synchronous; fetches are spawned and must be collected with
/// [`next_completion`](Self::next_completion) or [`settle`](Self::settle).
/// Spawning requires a running tokio runtime.
pub struct DocViewer {
    registry: Arc<DocRegistry>,
    fetcher: Arc<dyn DocFetcher>,
    navigator: Navigator,
    state: DocViewState,
    completions_tx: mpsc::UnboundedSender<FetchCompletion>,
    completions_rx: mpsc::UnboundedReceiver<FetchCompletion>,
    in_flight: usize,
}

impl DocViewer {
    pub fn new(registry: Arc<DocRegistry>, fetcher: Arc<dyn DocFetcher>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let navigator = Navigator::new(registry.home_id());
        Self {
            registry,
            fetcher,
            navigator,
            state: DocViewState::new(),
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &DocViewState {
        &self.state
    }

    #[must_use]
    pub fn registry(&self) -> &DocRegistry {
        &self.registry
    }

    /// Fetches started but not yet collected, stale ones included.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Handle a location change: resolve the id and navigate to it.
    pub fn visit(&mut self, location: &str) {
        let event = self.navigator.location_changed(location);
        self.navigate(&event.id);
    }

    /// Show document `id`, starting a fetch when it has a source file.
    pub fn navigate(&mut self, id: &str) {
        if let Some(request) = self.state.navigate(&self.registry, id) {
            self.spawn_fetch(request);
        }
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        let FetchRequest { token, descriptor } = request;
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.completions_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || fetcher.fetch(&descriptor))
                .await
                .unwrap_or_else(|e| Err(FetchError::Aborted(e.to_string())));
            // Receiver lives as long as the viewer; a send error means it's gone.
            let _ = tx.send(FetchCompletion { token, result });
        });
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        Some(self.apply(&completion))
    }

    /// Apply every completion that has already arrived, without waiting.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.apply(&completion) == Completion::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until every outstanding fetch has reported.
    pub async fn settle(&mut self) -> &DocViewState {
        while self.next_completion().await.is_some() {}
        &self.state
    }

    fn apply(&mut self, completion: &FetchCompletion) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.state.complete(&completion.token, &completion.result)
    }
}
