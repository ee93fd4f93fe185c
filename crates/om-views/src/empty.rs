//! Explicit empty states, so a view never shows a blank or misleading chart

use om_core::SelectionState;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing loaded, or the load failed
    NoData,
    /// The selected country has no medal records
    NoMedals { country_name: String },
    /// The discipline filter leaves nothing for the selected country
    NoMedalsInDiscipline {
        country_name: String,
        discipline: String,
    },
}

impl EmptyState {
    /// Empty state for a zero-result aggregation under `selection`
    pub fn for_selection(selection: &SelectionState) -> Self {
        let country_name = selection.selected_country_name.clone();
        match selection.discipline() {
            Some(discipline) => EmptyState::NoMedalsInDiscipline {
                country_name,
                discipline: discipline.to_string(),
            },
            None => EmptyState::NoMedals { country_name },
        }
    }

    pub fn message(&self) -> String {
        match self {
            EmptyState::NoData => "No data available".to_string(),
            EmptyState::NoMedals { country_name } => {
                format!("No medals recorded for {country_name}")
            }
            EmptyState::NoMedalsInDiscipline {
                country_name,
                discipline,
            } => format!("No {discipline} medals recorded for {country_name}"),
        }
    }
}

impl fmt::Display for EmptyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
