//! Selection subscriber trait

use parking_lot::Mutex;

use super::{SelectionChange, SelectionContext};

/// Trait for components that need to respond to selection changes
pub trait SelectionSubscriber: Send + Sync {
    /// Called after every selection or transform transition
    fn on_selection_change(&self, context: &SelectionContext);
}

/// Subscriber that records changes so they can be processed later on the
/// owner's thread
#[derive(Default)]
pub struct ChangeQueue {
    pending: Mutex<Vec<SelectionChange>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every change recorded since the last drain, oldest first
    pub fn drain(&self) -> Vec<SelectionChange> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl SelectionSubscriber for ChangeQueue {
    fn on_selection_change(&self, context: &SelectionContext) {
        self.pending.lock().push(context.change);
    }
}
