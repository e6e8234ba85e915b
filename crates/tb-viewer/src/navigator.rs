//! Location to document id mapping.

/// Emitted once per location change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigate {
    pub id: String,
}

/// Resolve a location path to a document id.
///
/// Query string and fragment are dropped and every leading `/` is stripped.
/// An empty remainder is the home id; anything else is returned as-is, even
/// when no document has that id.
#[must_use]
pub fn resolve(location: &str, home_id: &str) -> String {
    let path = location
        .split_once(['?', '#'])
        .map_or(location, |(path, _)| path);
    match path.trim_start_matches('/') {
        "" => home_id.to_owned(),
        id => id.to_owned(),
    }
}

/// Tracks the current location and turns every change into a [`Navigate`].
#[derive(Debug)]
pub struct Navigator {
    home_id: String,
    current: Option<String>,
}

impl Navigator {
    pub fn new(home_id: impl Into<String>) -> Self {
        Self {
            home_id: home_id.into(),
            current: None,
        }
    }

    /// Handle a location change.
    ///
    /// Always yields exactly one event, also when the id didn't change.
    pub fn location_changed(&mut self, location: &str) -> Navigate {
        let id = resolve(location, &self.home_id);
        tracing::debug!(location, id = %id, "Location changed");
        self.current = Some(id.clone());
        Navigate { id }
    }

    /// Id of the most recent navigation.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}
