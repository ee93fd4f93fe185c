//! Coalescing of high-frequency input into one update per frame

use tracing::trace;

/// Holds the newest pending value of a high-frequency input (pointer
/// moves during pan/zoom). Earlier values are superseded; the owner
/// applies at most one value per animation frame via [`take`](Self::take).
#[derive(Debug, Clone)]
pub struct FrameCoalescer<T> {
    pending: Option<T>,
    superseded: u64,
}

impl<T> Default for FrameCoalescer<T> {
    fn default() -> Self {
        Self {
            pending: None,
            superseded: 0,
        }
    }
}

impl<T> FrameCoalescer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a value, replacing any value not yet taken
    pub fn submit(&mut self, value: T) {
        if self.pending.replace(value).is_some() {
            self.superseded += 1;
            trace!(superseded = self.superseded, "Coalesced pending update");
        }
    }

    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Take the value for this frame
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drop the pending value without applying it
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// How many submitted values never reached a frame
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}
