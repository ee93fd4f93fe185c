//! Core functionality for the medal dashboard
//!
//! This crate provides the dataset types, the shared selection state and the
//! event plumbing that the data, view and app crates build on.

pub mod events;
pub mod frame;
pub mod model;
pub mod selection;
pub mod transform;

// Re-export commonly used types
pub use events::EventBus;
pub use frame::FrameCoalescer;
pub use model::{CountryTotal, MedalCounts, MedalRecord, MedalType, UnknownMedalType};
pub use selection::{
    ChangeQueue, SelectionChange, SelectionContext, SelectionEngine, SelectionState,
    SelectionSubscriber,
};
pub use transform::ViewTransform;
