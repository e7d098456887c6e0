//! Bounded line queue for hosts that consume logs on their own thread.
//!
//! The worker pushes lines as they arrive; the host pulls them whenever it
//! gets around to it (once per frame, once per tick). When the host falls
//! behind, the oldest lines are dropped.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::tailer::LogReceiver;

/// Default number of lines held before the oldest is dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// A [`LogReceiver`] that buffers lines for later retrieval.
pub struct LogQueue {
    inner: Mutex<QueueState>,
    capacity: usize,
}

struct QueueState {
    lines: VecDeque<String>,
    dropped: u64,
}

impl LogQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a queue holding at most `capacity` lines (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(QueueState {
                lines: VecDeque::with_capacity(capacity.min(DEFAULT_QUEUE_CAPACITY)),
                dropped: 0,
            }),
            capacity,
        }
    }

    /// Pops the oldest queued line.
    pub fn next_log(&self) -> Option<String> {
        self.inner.lock().ok()?.lines.pop_front()
    }

    /// Takes every queued line, oldest first.
    pub fn drain(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(mut state) => state.lines.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|s| s.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns and resets the number of lines dropped since the last call.
    pub fn take_dropped(&self) -> u64 {
        match self.inner.lock() {
            Ok(mut state) => std::mem::take(&mut state.dropped),
            Err(_) => 0,
        }
    }
}

impl Default for LogQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LogReceiver for LogQueue {
    fn on_log_received(&self, line: &str) {
        let Ok(mut state) = self.inner.lock() else {
            return;
        };
        if state.lines.len() >= self.capacity {
            state.lines.pop_front();
            state.dropped += 1;
        }
        state.lines.push_back(line.to_string());
    }
}
