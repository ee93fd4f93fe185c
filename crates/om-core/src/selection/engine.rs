//! Selection engine implementation

use super::{SelectionChange, SelectionContext, SelectionState, SelectionSubscriber};
use crate::transform::ViewTransform;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use tracing::{debug, info};

/// Selection state stored internally
#[derive(Debug, Clone)]
struct EngineState {
    selection: SelectionState,
    transform: ViewTransform,
}

/// Single owner of the dashboard's selection and the timeline transform.
///
/// State only changes through the transition methods below; every
/// transition notifies live subscribers with a snapshot.
pub struct SelectionEngine {
    state: Arc<RwLock<EngineState>>,
    subscribers: Arc<RwLock<Vec<Weak<dyn SelectionSubscriber>>>>,
}

impl SelectionEngine {
    /// Create a new selection engine
    pub fn new(initial: SelectionState) -> Self {
        let state = EngineState {
            selection: initial,
            transform: ViewTransform::IDENTITY,
        };

        Self {
            state: Arc::new(RwLock::new(state)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Focus a country. Always clears the discipline and resets the
    /// timeline transform, even if the country did not change.
    pub fn select_country(&self, code: impl Into<String>, name: impl Into<String>) {
        let mut state = self.state.write();
        state.selection.selected_country_code = code.into();
        state.selection.selected_country_name = name.into();
        state.selection.selected_discipline = None;
        state.transform = ViewTransform::IDENTITY;
        info!(
            country = %state.selection.selected_country_code,
            "Selected country"
        );

        drop(state);
        self.notify_subscribers(SelectionChange::Country);
    }

    /// Filter by discipline within the current country; the transform is kept
    pub fn select_discipline(&self, discipline: Option<String>) {
        let mut state = self.state.write();
        state.selection.selected_discipline = discipline;
        info!(
            country = %state.selection.selected_country_code,
            discipline = ?state.selection.selected_discipline,
            "Selected discipline"
        );

        drop(state);
        self.notify_subscribers(SelectionChange::Discipline);
    }

    /// Replace the timeline transform (scale is clamped)
    pub fn set_transform(&self, transform: ViewTransform) {
        let mut state = self.state.write();
        state.transform = ViewTransform::new(transform.scale, transform.translate);
        debug!(scale = state.transform.scale, translate = state.transform.translate, "Transform updated");

        drop(state);
        self.notify_subscribers(SelectionChange::Transform);
    }

    pub fn selection(&self) -> SelectionState {
        self.state.read().selection.clone()
    }

    pub fn transform(&self) -> ViewTransform {
        self.state.read().transform
    }

    /// Get the current context tagged with `change`
    pub fn get_context(&self, change: SelectionChange) -> SelectionContext {
        let state = self.state.read();
        SelectionContext {
            change,
            selection: state.selection.clone(),
            transform: state.transform,
        }
    }

    /// Add a subscriber. Only a weak reference is kept.
    pub fn add_subscriber(&self, subscriber: Arc<dyn SelectionSubscriber>) {
        let mut subscribers = self.subscribers.write();
        subscribers.push(Arc::downgrade(&subscriber));
    }

    /// Number of subscribers still alive
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Notify all subscribers of a transition
    fn notify_subscribers(&self, change: SelectionChange) {
        let context = self.get_context(change);

        // Upgrade under the lock, call outside it so subscribers may read back
        let live: Vec<Arc<dyn SelectionSubscriber>> = {
            let mut subscribers = self.subscribers.write();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_selection_change(&context);
        }
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(SelectionState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::ChangeQueue;

    #[test]
    fn test_select_country_clears_discipline_and_transform() {
        let engine = SelectionEngine::default();
        engine.select_country("FRA", "France");
        engine.select_discipline(Some("Judo".to_string()));
        engine.set_transform(ViewTransform::new(4.0, -120.0));

        engine.select_country("USA", "United States");

        let selection = engine.selection();
        assert_eq!(selection.selected_country_code, "USA");
        assert_eq!(selection.selected_country_name, "United States");
        assert_eq!(selection.selected_discipline, None);
        assert!(engine.transform().is_identity());
    }

    #[test]
    fn test_reselecting_same_country_still_clears() {
        let engine = SelectionEngine::new(SelectionState::new("FRA", "France"));
        engine.select_discipline(Some("Judo".to_string()));
        engine.set_transform(ViewTransform::new(2.0, 0.0));

        engine.select_country("FRA", "France");

        assert_eq!(engine.selection().selected_discipline, None);
        assert!(engine.transform().is_identity());
    }

    #[test]
    fn test_select_discipline_keeps_country_and_transform() {
        let engine = SelectionEngine::new(SelectionState::new("JPN", "Japan"));
        let zoomed = ViewTransform::new(8.0, -300.0);
        engine.set_transform(zoomed);

        engine.select_discipline(Some("Judo".to_string()));
        engine.select_discipline(None);

        let selection = engine.selection();
        assert_eq!(selection.selected_country_code, "JPN");
        assert_eq!(selection.selected_country_name, "Japan");
        assert_eq!(selection.selected_discipline, None);
        assert_eq!(engine.transform(), zoomed);
    }

    #[test]
    fn test_transform_scale_clamped() {
        let engine = SelectionEngine::default();
        engine.set_transform(ViewTransform { scale: 64.0, translate: 0.0 });
        assert_eq!(engine.transform().scale, 32.0);
    }

    #[test]
    fn test_subscribers_receive_changes() {
        let engine = SelectionEngine::default();
        let queue = Arc::new(ChangeQueue::new());
        engine.add_subscriber(queue.clone());

        engine.select_country("FRA", "France");
        engine.select_discipline(Some("Judo".to_string()));
        engine.set_transform(ViewTransform::new(2.0, 0.0));

        assert_eq!(
            queue.drain(),
            vec![
                SelectionChange::Country,
                SelectionChange::Discipline,
                SelectionChange::Transform
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let engine = SelectionEngine::default();
        let queue = Arc::new(ChangeQueue::new());
        engine.add_subscriber(queue.clone());
        assert_eq!(engine.subscriber_count(), 1);

        drop(queue);
        engine.select_discipline(None);
        assert_eq!(engine.subscriber_count(), 0);
    }
}
