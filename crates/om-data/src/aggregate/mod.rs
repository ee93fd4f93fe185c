//! Aggregation engine
//!
//! Pure functions deriving each view's data from the raw records and the
//! current selection. All of them are total: empty or non-matching input
//! yields an empty (or zero-filled) result, never an error.

mod disciplines;
mod overview;
mod timeline;

use chrono::NaiveDate;
use om_core::{MedalCounts, MedalType};

pub use disciplines::{detail_matrix, discipline_matrix, top_disciplines};
pub use overview::{cell_count_domain, overview_color_domain};
pub use timeline::timeline_series;

/// Number of disciplines shown in the detail view
pub const DEFAULT_DISCIPLINE_LIMIT: usize = 12;

/// Medal counts for one date of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedCounts {
    pub date: NaiveDate,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    /// Always `gold + silver + bronze`
    pub total: u32,
}

impl DatedCounts {
    pub fn new(date: NaiveDate, counts: MedalCounts) -> Self {
        Self {
            date,
            gold: counts.gold,
            silver: counts.silver,
            bronze: counts.bronze,
            total: counts.total(),
        }
    }

    pub fn get(&self, medal_type: MedalType) -> u32 {
        match medal_type {
            MedalType::Gold => self.gold,
            MedalType::Silver => self.silver,
            MedalType::Bronze => self.bronze,
        }
    }
}

/// One (discipline, medal type) cell of the detail matrix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisciplineCell {
    pub discipline: String,
    pub medal_type: MedalType,
    pub count: u32,
}

/// Dense discipline x medal-type matrix for one country
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailMatrix {
    /// Row order, most medals first
    pub disciplines: Vec<String>,
    /// `disciplines.len() * 3` cells, row-major in [`MedalType::ALL`] order
    pub cells: Vec<DisciplineCell>,
}

impl DetailMatrix {
    pub fn is_empty(&self) -> bool {
        self.disciplines.is_empty()
    }

    pub fn count(&self, discipline: &str, medal_type: MedalType) -> Option<u32> {
        self.cells
            .iter()
            .find(|c| c.discipline == discipline && c.medal_type == medal_type)
            .map(|c| c.count)
    }

    pub fn contains(&self, discipline: &str) -> bool {
        self.disciplines.iter().any(|d| d == discipline)
    }
}
