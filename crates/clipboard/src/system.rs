//! Desktop OS clipboard backed by `arboard`.
//!
//! On Linux the clipboard owner is this process: contents disappear once the
//! `SystemClipboard` is dropped unless a clipboard manager picks them up. A
//! short-lived process keeps its copy alive by handing it to a helper process
//! that calls [`SystemClipboard::hold_text`].

use std::sync::Mutex;

use crate::{ClipData, ClipboardError, ClipboardService, MIMETYPE_TEXT_PLAIN};

/// The operating system clipboard.
///
/// Labels are not supported by desktop clipboards; clips read back carry an
/// empty label.
pub struct SystemClipboard {
    inner: Mutex<arboard::Clipboard>,
}

impl SystemClipboard {
    /// Opens the system clipboard.
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }

    /// Sets `text` and blocks until another owner replaces it.
    #[cfg(target_os = "linux")]
    pub fn hold_text(&self, text: String) -> Result<(), ClipboardError> {
        use arboard::SetExtLinux;

        let mut clipboard = self
            .inner
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".into()))?;
        clipboard
            .set()
            .wait()
            .text(text)
            .map_err(|e| ClipboardError::Backend(e.to_string()))
    }
}

impl ClipboardService for SystemClipboard {
    fn set_primary_clip(&self, clip: ClipData) -> Result<(), ClipboardError> {
        if clip.mime_type != MIMETYPE_TEXT_PLAIN {
            return Err(ClipboardError::Backend(format!(
                "unsupported clip type {}",
                clip.mime_type
            )));
        }

        let mut clipboard = self
            .inner
            .lock()
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".into()))?;
        clipboard
            .set_text(clip.text)
            .map_err(|e| ClipboardError::Backend(e.to_string()))
    }

    fn primary_clip(&self) -> Option<ClipData> {
        let mut clipboard = self.inner.lock().ok()?;
        let text = clipboard.get_text().ok()?;
        Some(ClipData::new_plain_text("", text))
    }
}
