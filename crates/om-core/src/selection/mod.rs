use serde::{Deserialize, Serialize};

use crate::transform::ViewTransform;

mod engine;
mod subscriber;

pub use engine::SelectionEngine;
pub use subscriber::{ChangeQueue, SelectionSubscriber};

/// Country selected when the dashboard first mounts
pub const DEFAULT_COUNTRY_CODE: &str = "USA";
pub const DEFAULT_COUNTRY_NAME: &str = "United States";

/// The shared country/discipline focus driving all views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_country_code: String,
    pub selected_country_name: String,
    /// `None` means all disciplines
    pub selected_discipline: Option<String>,
}

impl SelectionState {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            selected_country_code: code.into(),
            selected_country_name: name.into(),
            selected_discipline: None,
        }
    }

    pub fn discipline(&self) -> Option<&str> {
        self.selected_discipline.as_deref()
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_CODE, DEFAULT_COUNTRY_NAME)
    }
}

/// Which input of the selection engine changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionChange {
    /// Subject change: country fields set, discipline cleared, transform reset
    Country,
    /// Filter change within the current country
    Discipline,
    /// Timeline pan/zoom
    Transform,
}

/// Snapshot passed to subscribers on every transition
#[derive(Debug, Clone)]
pub struct SelectionContext {
    pub change: SelectionChange,
    pub selection: SelectionState,
    pub transform: ViewTransform,
}
