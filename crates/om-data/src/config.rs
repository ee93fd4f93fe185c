//! Source configuration for data loading

use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Where the two medal tables live and how they are delimited
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    /// Medal-events table
    pub medals_path: PathBuf,

    /// Country-totals table
    pub totals_path: PathBuf,

    /// Field delimiter shared by both tables
    pub delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            medals_path: PathBuf::from("data/medals.csv"),
            totals_path: PathBuf::from("data/medals_total.csv"),
            delimiter: ',',
        }
    }
}

impl SourceConfig {
    pub fn new(medals_path: impl Into<PathBuf>, totals_path: impl Into<PathBuf>) -> Self {
        Self {
            medals_path: medals_path.into(),
            totals_path: totals_path.into(),
            ..Self::default()
        }
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}
