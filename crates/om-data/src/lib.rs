//! Medal data loading and aggregation

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod sources;
pub mod store;

use tokio::task::JoinError;
use thiserror::Error;

// Re-exports
pub use aggregate::{DatedCounts, DetailMatrix, DisciplineCell, DEFAULT_DISCIPLINE_LIMIT};
pub use cache::AggregationCache;
pub use config::SourceConfig;
pub use sources::{CsvMedalSource, InMemorySource, MedalSource};
pub use store::{Dataset, LoadTicket, RecordStore};

/// Errors that can occur while reading a single table
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Missing required column '{column}'")]
    MissingColumn { column: String },
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}

/// Errors surfaced by a dataset load
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data source '{source_name}' is unreachable: {message}")]
    Unreachable { source_name: String, message: String },

    #[error("Data source '{source_name}' is malformed: {message}")]
    Malformed { source_name: String, message: String },

    #[error("Load task failed: {0}")]
    Task(#[from] JoinError),
}

impl LoadError {
    /// Classify a table error for the named source
    pub fn from_data(source_name: impl Into<String>, error: DataError) -> Self {
        let source_name = source_name.into();
        match error {
            DataError::Io(e) => LoadError::Unreachable { source_name, message: e.to_string() },
            other => LoadError::Malformed { source_name, message: other.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_errors_are_unreachable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = LoadError::from_data("medals.csv", DataError::Io(io));
        assert!(matches!(err, LoadError::Unreachable { .. }));

        let err = LoadError::from_data(
            "medals.csv",
            DataError::MissingColumn { column: "country_code".to_string() },
        );
        assert!(matches!(err, LoadError::Malformed { .. }));
        assert!(err.to_string().contains("country_code"));
    }
}
