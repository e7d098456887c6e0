//! Plain-text clipboard writer.
//!
//! The clipboard is an injected [`ClipboardService`] rather than ambient
//! global state, so the writer works the same against the OS clipboard and
//! against [`MemoryClipboard`] in tests.

mod error;
mod memory;
#[cfg(all(feature = "system", not(target_os = "android")))]
mod system;

pub use error::ClipboardError;
pub use memory::MemoryClipboard;
#[cfg(all(feature = "system", not(target_os = "android")))]
pub use system::SystemClipboard;

/// Label attached to copied log text.
pub const LOG_LABEL: &str = "log";

/// MIME type of plain-text clips.
pub const MIMETYPE_TEXT_PLAIN: &str = "text/plain";

/// A labelled clipboard payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipData {
    pub label: String,
    pub mime_type: String,
    pub text: String,
}

impl ClipData {
    /// Builds a plain-text clip.
    pub fn new_plain_text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            mime_type: MIMETYPE_TEXT_PLAIN.into(),
            text: text.into(),
        }
    }
}

/// Access point to a clipboard.
pub trait ClipboardService: Send + Sync {
    /// Replaces the primary clip.
    fn set_primary_clip(&self, clip: ClipData) -> Result<(), ClipboardError>;

    /// Returns the primary clip, if any.
    fn primary_clip(&self) -> Option<ClipData>;
}

/// Replaces the clipboard content with `text` as plain text labelled `"log"`.
///
/// Synchronous: the clip is in place when this returns. Service errors are
/// logged and otherwise ignored.
pub fn copy_text<C>(clipboard: &C, text: &str)
where
    C: ClipboardService + ?Sized,
{
    let clip = ClipData::new_plain_text(LOG_LABEL, text);
    match clipboard.set_primary_clip(clip) {
        Ok(()) => tracing::debug!(len = text.len(), "copied text to clipboard"),
        Err(e) => tracing::warn!(error = %e, "failed to copy text to clipboard"),
    }
}
