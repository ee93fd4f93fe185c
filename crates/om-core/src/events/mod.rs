use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;

/// Dashboard-wide event bus for the surrounding shell
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<std::any::TypeId, Vec<Box<dyn EventHandler>>>>>,
}

/// Event trait that all events must implement
pub trait Event: Send + Sync + 'static {
    fn as_any(&self) -> &dyn std::any::Any;
}

/// Handler trait for event handlers
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, event: &dyn Event);
}

/// Dashboard events
pub mod events {
    use super::Event;

    /// A dataset was installed
    #[derive(Debug, Clone)]
    pub struct DatasetLoaded {
        pub source_name: String,
        pub medal_rows: usize,
        pub country_rows: usize,
        pub generation: u64,
    }

    /// Loading failed; the dashboard falls back to an empty dataset
    #[derive(Debug, Clone)]
    pub struct DatasetLoadFailed {
        pub source_name: String,
        pub error: String,
    }

    /// The selected country changed
    #[derive(Debug, Clone)]
    pub struct CountrySelected {
        pub country_code: String,
        pub country_name: String,
    }

    /// The selected discipline changed
    #[derive(Debug, Clone)]
    pub struct DisciplineSelected {
        pub country_code: String,
        pub discipline: Option<String>,
    }

    // Implement Event trait for all event types
    macro_rules! impl_event {
        ($($t:ty),*) => {
            $(
                impl Event for $t {
                    fn as_any(&self) -> &dyn std::any::Any {
                        self
                    }
                }
            )*
        }
    }

    impl_event!(
        DatasetLoaded,
        DatasetLoadFailed,
        CountrySelected,
        DisciplineSelected
    );
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }

    /// Subscribe to events of a specific type
    pub fn subscribe<E: Event>(&self, handler: Box<dyn EventHandler>) {
        let type_id = std::any::TypeId::of::<E>();
        let mut handlers = self.handlers.lock();
        handlers.entry(type_id).or_insert_with(Vec::new).push(handler);
    }

    /// Publish an event
    ///
    /// Handlers run with the bus unlocked, so they may publish or subscribe.
    pub fn publish<E: Event>(&self, event: E) {
        let type_id = std::any::TypeId::of::<E>();
        let mut running = match self.handlers.lock().get_mut(&type_id) {
            Some(event_handlers) => std::mem::take(event_handlers),
            None => return,
        };

        for handler in running.iter_mut() {
            handler.handle(&event);
        }

        // Put them back ahead of any subscribed while they ran
        let mut handlers = self.handlers.lock();
        let slot = handlers.entry(type_id).or_insert_with(Vec::new);
        running.append(slot);
        *slot = running;
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&dyn Event) + Send + Sync,
{
    fn handle(&mut self, event: &dyn Event) {
        (self.handler)(event);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&dyn Event) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::events::{CountrySelected, DisciplineSelected};

    #[test]
    fn test_publish_reaches_typed_subscribers_only() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe::<CountrySelected>(handler_from_fn(move |event| {
            if let Some(selected) = event.as_any().downcast_ref::<CountrySelected>() {
                sink.lock().push(selected.country_code.clone());
            }
        }));

        bus.publish(CountrySelected {
            country_code: "FRA".to_string(),
            country_name: "France".to_string(),
        });
        bus.publish(DisciplineSelected {
            country_code: "FRA".to_string(),
            discipline: Some("Judo".to_string()),
        });

        assert_eq!(*seen.lock(), vec!["FRA".to_string()]);
    }

    #[test]
    fn test_handler_may_publish_and_subscribe() {
        let bus = Arc::new(EventBus::new());
        let disciplines = Arc::new(Mutex::new(Vec::new()));

        let sink = disciplines.clone();
        bus.subscribe::<DisciplineSelected>(handler_from_fn(move |event| {
            if let Some(selected) = event.as_any().downcast_ref::<DisciplineSelected>() {
                sink.lock().push(selected.discipline.clone());
            }
        }));

        let inner = bus.clone();
        bus.subscribe::<CountrySelected>(handler_from_fn(move |event| {
            if let Some(selected) = event.as_any().downcast_ref::<CountrySelected>() {
                inner.publish(DisciplineSelected {
                    country_code: selected.country_code.clone(),
                    discipline: None,
                });
                inner.subscribe::<CountrySelected>(handler_from_fn(|_| {}));
            }
        }));

        let country = || CountrySelected {
            country_code: "FRA".to_string(),
            country_name: "France".to_string(),
        };
        bus.publish(country());
        assert_eq!(*disciplines.lock(), vec![None]);

        // The original handler survives alongside the one added while running
        bus.publish(country());
        assert_eq!(disciplines.lock().len(), 2);
        let registered = bus.handlers.lock().get(&std::any::TypeId::of::<CountrySelected>()).map(Vec::len);
        assert_eq!(registered, Some(3));
    }
}
