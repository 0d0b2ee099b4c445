//! Error type for capture parsing and link extraction.

use thiserror::Error;

/// Failure while turning uploaded capture content into links.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The content is not JSON, or lacks the `log.entries` list.
    #[error("malformed capture: {0}")]
    MalformedInput(String),
}

impl ExtractError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ExtractError::MalformedInput(reason.into())
    }
}
