pub mod csv_source;

use async_trait::async_trait;

use crate::store::Dataset;
use crate::LoadError;

pub use csv_source::{read_medals, read_totals, CsvMedalSource, TableReport};

/// Trait for medal data sources
#[async_trait]
pub trait MedalSource: Send + Sync {
    /// Load both tables. A single attempt; callers decide whether to retry.
    async fn load(&self) -> Result<Dataset, LoadError>;

    /// Get the source name
    fn source_name(&self) -> &str;
}

/// Source backed by records already in memory
pub struct InMemorySource {
    name: String,
    dataset: Dataset,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            name: name.into(),
            dataset,
        }
    }
}

#[async_trait]
impl MedalSource for InMemorySource {
    async fn load(&self) -> Result<Dataset, LoadError> {
        Ok(self.dataset.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
