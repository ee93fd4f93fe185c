//! Aggregation result caching
//!
//! Sibling views ask for the same slices after every selection change;
//! results are memoized per selection key and dropped wholesale when a new
//! dataset is installed.

use std::sync::Arc;
use ahash::AHashMap;
use parking_lot::RwLock;
use tracing::trace;

use om_core::MedalRecord;
use crate::aggregate::{detail_matrix, timeline_series, DatedCounts, DetailMatrix};

type TimelineKey = (String, Option<String>);

/// Memoized aggregation results
pub struct AggregationCache {
    timelines: Arc<RwLock<AHashMap<TimelineKey, Arc<Vec<DatedCounts>>>>>,
    details: Arc<RwLock<AHashMap<String, Arc<DetailMatrix>>>>,
    /// Maximum number of entries per table
    max_entries: usize,
    discipline_limit: usize,
}

impl AggregationCache {
    /// Create a new aggregation cache
    pub fn new(max_entries: usize, discipline_limit: usize) -> Self {
        Self {
            timelines: Arc::new(RwLock::new(AHashMap::new())),
            details: Arc::new(RwLock::new(AHashMap::new())),
            max_entries: max_entries.max(1),
            discipline_limit,
        }
    }

    pub fn discipline_limit(&self) -> usize {
        self.discipline_limit
    }

    /// Timeline series for a selection, computed on first request
    pub fn timeline(
        &self,
        records: &[MedalRecord],
        country_code: &str,
        discipline: Option<&str>,
    ) -> Arc<Vec<DatedCounts>> {
        let key = (country_code.to_string(), discipline.map(str::to_string));
        if let Some(series) = self.timelines.read().get(&key) {
            return series.clone();
        }

        trace!(country = country_code, ?discipline, "Computing timeline series");
        let series = Arc::new(timeline_series(records, country_code, discipline));
        let mut timelines = self.timelines.write();
        if timelines.len() >= self.max_entries {
            timelines.clear();
        }
        timelines.insert(key, series.clone());
        series
    }

    /// Detail matrix for a country, computed on first request
    pub fn detail(&self, records: &[MedalRecord], country_code: &str) -> Arc<DetailMatrix> {
        if let Some(matrix) = self.details.read().get(country_code) {
            return matrix.clone();
        }

        trace!(country = country_code, "Computing detail matrix");
        let matrix = Arc::new(detail_matrix(records, country_code, self.discipline_limit));
        let mut details = self.details.write();
        if details.len() >= self.max_entries {
            details.clear();
        }
        details.insert(country_code.to_string(), matrix.clone());
        matrix
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.timelines.write().clear();
        self.details.write().clear();
    }

    /// Number of memoized results
    pub fn len(&self) -> usize {
        self.timelines.read().len() + self.details.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use om_core::MedalType;

    fn records() -> Vec<MedalRecord> {
        vec![
            MedalRecord::new(MedalType::Gold, "2024-07-28", "USA", "Swimming"),
            MedalRecord::new(MedalType::Gold, "2024-07-29", "USA", "Athletics"),
        ]
    }

    #[test]
    fn test_results_are_reused() {
        let cache = AggregationCache::new(16, 12);
        let records = records();

        let first = cache.timeline(&records, "USA", None);
        let second = cache.timeline(&records, "USA", None);
        assert!(Arc::ptr_eq(&first, &second));

        let filtered = cache.timeline(&records, "USA", Some("Swimming"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear_forgets_results() {
        let cache = AggregationCache::new(16, 12);
        let records = records();
        let matrix = cache.detail(&records, "USA");
        assert_eq!(matrix.disciplines.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        let fresh = cache.detail(&records, "USA");
        assert!(!Arc::ptr_eq(&matrix, &fresh));
        assert_eq!(*matrix, *fresh);
    }

    #[test]
    fn test_bounded_size() {
        let cache = AggregationCache::new(2, 12);
        let records = records();
        for code in ["USA", "FRA", "JPN"] {
            cache.timeline(&records, code, None);
        }
        assert!(cache.len() <= 2);
    }
}
