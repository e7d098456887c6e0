//! Error types for clipboard services.

/// Errors a [`ClipboardService`](crate::ClipboardService) may report.
///
/// `copy_text` logs these and carries on; they only reach callers that talk
/// to a service directly.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard backend error: {0}")]
    Backend(String),
}
