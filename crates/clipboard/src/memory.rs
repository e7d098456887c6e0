//! In-process clipboard.

use std::sync::Mutex;

use crate::{ClipData, ClipboardError, ClipboardService};

/// Clipboard that lives in process memory.
///
/// Always succeeds. Useful for headless hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    clip: Mutex<Option<ClipData>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of the primary clip.
    pub fn text(&self) -> Option<String> {
        self.primary_clip().map(|clip| clip.text)
    }
}

impl ClipboardService for MemoryClipboard {
    fn set_primary_clip(&self, clip: ClipData) -> Result<(), ClipboardError> {
        match self.clip.lock() {
            Ok(mut guard) => *guard = Some(clip),
            Err(poisoned) => *poisoned.into_inner() = Some(clip),
        }
        Ok(())
    }

    fn primary_clip(&self) -> Option<ClipData> {
        self.clip.lock().ok()?.clone()
    }
}
