//! Realtime error types

use feed_core::EventKind;

/// Failure to derive a consumer value from a bus event
///
/// The adapter logs and skips the event; the subscription keeps running.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Unexpected {0} event for this subscription")]
    UnexpectedEvent(EventKind),

    #[error("Failed to derive value: {0}")]
    Failed(String),
}

impl TransformError {
    /// Create a derivation failure
    pub fn failed(msg: impl std::fmt::Display) -> Self {
        Self::Failed(msg.to_string())
    }
}
