use std::path::PathBuf;

/// Content loading or validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A record parsed but breaks a content rule.
    #[error("{record}: {message}")]
    Invalid { record: String, message: String },
    #[error("failed to write sitemap: {0}")]
    Xml(String),
}

impl ContentError {
    pub(crate) fn invalid(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            record: record.into(),
            message: message.into(),
        }
    }
}

/// Reject empty or whitespace-only strings.
pub(crate) fn require(value: &str, record: &str, field: &str) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        return Err(ContentError::invalid(record, format!("{field} cannot be empty")));
    }
    Ok(())
}
