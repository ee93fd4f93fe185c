//! Record store: holds the loaded tables and arbitrates concurrent loads

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use parking_lot::RwLock;
use tracing::{debug, info};

use om_core::{CountryTotal, MedalRecord};
use crate::sources::MedalSource;
use crate::LoadError;

/// The two loaded tables. Read-only once installed.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub medals: Arc<[MedalRecord]>,
    pub totals: Arc<[CountryTotal]>,
}

impl Dataset {
    pub fn new(medals: Vec<MedalRecord>, totals: Vec<CountryTotal>) -> Self {
        Self {
            medals: Arc::from(medals),
            totals: Arc::from(totals),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.medals.is_empty() && self.totals.is_empty()
    }

    /// Display name for a country code, from the totals table
    pub fn country_name(&self, code: &str) -> Option<&str> {
        self.totals
            .iter()
            .find(|t| t.country_code == code)
            .map(|t| t.country_name.as_str())
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::empty()
    }
}

/// Identifies one load attempt; only the newest ticket may commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Owns the loaded dataset. Loads are stamped with a generation so that a
/// superseded load finishing late never overwrites a newer one.
pub struct RecordStore {
    source: Arc<dyn MedalSource>,
    issued: AtomicU64,
    current: RwLock<Option<(LoadTicket, Arc<Dataset>)>>,
}

impl RecordStore {
    pub fn new(source: Arc<dyn MedalSource>) -> Self {
        Self {
            source,
            issued: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Start a new load attempt, superseding any in flight
    pub fn begin_load(&self) -> LoadTicket {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, source = self.source.source_name(), "Starting load");
        LoadTicket(generation)
    }

    /// Whether `ticket` is still the newest load issued
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }

    /// Fetch from the source without installing anything
    pub async fn fetch(&self) -> Result<Dataset, LoadError> {
        self.source.load().await
    }

    /// Install `dataset` if `ticket` is still current. Returns the installed
    /// dataset, or `None` when the result was stale and discarded.
    pub fn commit(&self, ticket: LoadTicket, dataset: Dataset) -> Option<Arc<Dataset>> {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "Discarding stale load result");
            return None;
        }

        let dataset = Arc::new(dataset);
        info!(
            generation = ticket.0,
            medals = dataset.medals.len(),
            countries = dataset.totals.len(),
            "Installed dataset"
        );
        *self.current.write() = Some((ticket, dataset.clone()));
        Some(dataset)
    }

    /// Drop the installed dataset after a failed load, if `ticket` is still
    /// current. Returns whether anything was cleared.
    pub fn clear(&self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "Ignoring stale load failure");
            return false;
        }

        let previous = self.current.write().take();
        if let Some((installed, _)) = &previous {
            info!(generation = installed.0, failed = ticket.0, "Cleared dataset after failed load");
        }
        previous.is_some()
    }

    /// The installed dataset, if any
    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.current.read().as_ref().map(|(_, dataset)| dataset.clone())
    }

    /// Generation of the installed dataset
    pub fn installed_generation(&self) -> Option<u64> {
        self.current.read().as_ref().map(|(ticket, _)| ticket.0)
    }
}
