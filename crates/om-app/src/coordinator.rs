//! Dashboard coordinator
//!
//! Owns the selection engine, the record store, the aggregation cache
//! and the three views. Views only emit events; every state change goes
//! through the engine, and the coordinator re-derives exactly the views
//! whose inputs changed.

use std::sync::Arc;

use om_core::events::events::{CountrySelected, DatasetLoadFailed, DatasetLoaded, DisciplineSelected};
use om_core::{
    ChangeQueue, EventBus, FrameCoalescer, SelectionChange, SelectionEngine, SelectionState,
    ViewTransform,
};
use om_data::{AggregationCache, Dataset, LoadError, LoadTicket, MedalSource, RecordStore};
use om_views::{
    DashboardView, DataStatus, DetailView, InputContext, OverviewView, PointerInput,
    RenderDescription, TimelineView, ViewEvent, ViewInputs, ViewKind,
};
use tracing::{debug, error, info, warn};

use crate::config::DashboardConfig;

pub struct Dashboard {
    engine: Arc<SelectionEngine>,
    changes: Arc<ChangeQueue>,
    event_bus: Arc<EventBus>,

    store: RecordStore,
    cache: AggregationCache,
    status: DataStatus,

    views: Vec<Box<dyn DashboardView>>,
    pending_transform: FrameCoalescer<ViewTransform>,
}

impl Dashboard {
    pub fn new(config: &DashboardConfig, source: Arc<dyn MedalSource>) -> Self {
        let engine = Arc::new(SelectionEngine::new(config.initial_selection()));
        let changes = Arc::new(ChangeQueue::new());
        engine.add_subscriber(changes.clone());

        let views: Vec<Box<dyn DashboardView>> = vec![
            Box::new(OverviewView::new("Medal Overview", config.overview_config())),
            Box::new(TimelineView::new("Medal Timeline", config.timeline_config())),
            Box::new(DetailView::new("Disciplines", config.detail_config())),
        ];

        let mut dashboard = Self {
            engine,
            changes,
            event_bus: Arc::new(EventBus::new()),
            store: RecordStore::new(source),
            cache: AggregationCache::new(config.cache_entries, config.discipline_limit),
            status: DataStatus::NotLoaded,
            views,
            pending_transform: FrameCoalescer::new(),
        };
        dashboard.rederive(&[], true);
        dashboard
    }

    /// Load the dataset from the source and install it
    pub async fn load(&mut self) -> &DataStatus {
        let ticket = self.store.begin_load();
        let result = self.store.fetch().await;
        self.finish_load(ticket, result);
        &self.status
    }

    /// Start a load whose result arrives through [`finish_load`](Self::finish_load).
    /// Any load still in flight is superseded.
    pub fn begin_reload(&self) -> LoadTicket {
        self.store.begin_load()
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Install a load result. Stale results are discarded; returns whether
    /// the dashboard changed.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<Dataset, LoadError>) -> bool {
        if !self.store.is_current(ticket) {
            debug!(generation = ticket.generation(), "Ignoring superseded load");
            return false;
        }

        let source_name = self.store.source_name().to_string();
        match result {
            Ok(dataset) => {
                let Some(dataset) = self.store.commit(ticket, dataset) else {
                    return false;
                };
                let medal_rows = dataset.medals.len();
                let country_rows = dataset.totals.len();
                self.status = DataStatus::Loaded;
                self.sync_country_name(&dataset);
                self.event_bus.publish(DatasetLoaded {
                    source_name,
                    medal_rows,
                    country_rows,
                    generation: ticket.generation(),
                });
            }
            Err(err) => {
                error!(source = %source_name, error = %err, "Failed to load medal data");
                self.store.clear(ticket);
                self.status = DataStatus::Failed(err.to_string());
                self.event_bus.publish(DatasetLoadFailed {
                    source_name,
                    error: err.to_string(),
                });
            }
        }

        self.cache.clear();
        // Queued changes are subsumed by the full re-derivation
        self.changes.drain();
        self.rederive(&[], true);
        true
    }

    /// The configured country name may not match the code; the totals
    /// table is authoritative once loaded
    fn sync_country_name(&self, dataset: &Dataset) {
        let selection = self.engine.selection();
        let Some(name) = dataset.country_name(&selection.selected_country_code) else {
            return;
        };
        if name != selection.selected_country_name {
            info!(
                country = %selection.selected_country_code,
                from = %selection.selected_country_name,
                to = name,
                "Correcting country name from totals"
            );
            self.engine.select_country(selection.selected_country_code, name);
        }
    }

    /// Route pointer input to a view and act on the event it emits
    pub fn handle_input(&mut self, kind: ViewKind, input: PointerInput) -> Option<ViewEvent> {
        let ctx = InputContext {
            transform: self.effective_transform(),
        };
        let event = self
            .views
            .iter_mut()
            .find(|view| view.kind() == kind)?
            .handle_input(input, &ctx)?;

        self.dispatch(event.clone());
        Some(event)
    }

    /// Apply a view event. Selection changes take effect immediately;
    /// transforms wait for the next frame.
    pub fn dispatch(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SelectCountry { code, name } => {
                self.engine.select_country(code, name);
                self.process_changes();
            }
            ViewEvent::SelectDiscipline(discipline) => {
                self.engine.select_discipline(discipline);
                self.process_changes();
            }
            ViewEvent::Transform(transform) => self.pending_transform.submit(transform),
        }
    }

    /// Per-frame tick: applies the newest pending transform and any
    /// selection changes made directly on the engine. Returns whether any
    /// view was re-derived.
    pub fn on_frame(&mut self) -> bool {
        // Country changes first, so they can drop a stale pending transform
        let mut rederived = self.process_changes();
        if let Some(transform) = self.pending_transform.take() {
            self.engine.set_transform(transform);
            rederived |= self.process_changes();
        }
        rederived
    }

    fn effective_transform(&self) -> ViewTransform {
        self.pending_transform
            .peek()
            .copied()
            .unwrap_or_else(|| self.engine.transform())
    }

    fn process_changes(&mut self) -> bool {
        let changes = self.changes.drain();
        if changes.is_empty() {
            return false;
        }

        let selection = self.engine.selection();
        for change in &changes {
            match change {
                SelectionChange::Country => {
                    // A new country starts unzoomed
                    self.pending_transform.clear();
                    self.event_bus.publish(CountrySelected {
                        country_code: selection.selected_country_code.clone(),
                        country_name: selection.selected_country_name.clone(),
                    });
                }
                SelectionChange::Discipline => {
                    self.event_bus.publish(DisciplineSelected {
                        country_code: selection.selected_country_code.clone(),
                        discipline: selection.selected_discipline.clone(),
                    });
                }
                SelectionChange::Transform => {}
            }
        }

        self.rederive(&changes, false) > 0
    }

    /// Re-derive views affected by `changes`, or all of them
    fn rederive(&mut self, changes: &[SelectionChange], all: bool) -> usize {
        let selection = self.engine.selection();
        let dataset = self.dataset();
        let code = selection.selected_country_code.as_str();
        let timeline = self.cache.timeline(&dataset.medals, code, selection.discipline());
        let detail = self.cache.detail(&dataset.medals, code);

        let inputs = ViewInputs {
            status: &self.status,
            dataset: dataset.as_ref(),
            selection: &selection,
            transform: self.engine.transform(),
            timeline: timeline.as_slice(),
            detail: detail.as_ref(),
        };

        let mut updated = 0;
        for view in self.views.iter_mut() {
            if all || changes.iter().any(|change| view.depends_on(*change)) {
                view.update(&inputs);
                updated += 1;
            }
        }
        debug!(?changes, updated, "Re-derived views");
        updated
    }

    pub fn selection(&self) -> SelectionState {
        self.engine.selection()
    }

    pub fn transform(&self) -> ViewTransform {
        self.engine.transform()
    }

    /// Transform waiting for the next frame
    pub fn pending_transform(&self) -> Option<ViewTransform> {
        self.pending_transform.peek().copied()
    }

    pub fn status(&self) -> &DataStatus {
        &self.status
    }

    /// The store's installed dataset, empty when nothing is installed
    pub fn dataset(&self) -> Arc<Dataset> {
        self.store
            .dataset()
            .unwrap_or_else(|| Arc::new(Dataset::empty()))
    }

    pub fn engine(&self) -> Arc<SelectionEngine> {
        self.engine.clone()
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        self.event_bus.clone()
    }

    pub fn view(&self, kind: ViewKind) -> Option<&dyn DashboardView> {
        self.views.iter().find(|view| view.kind() == kind).map(|view| view.as_ref())
    }

    pub fn view_as<T: 'static>(&self, kind: ViewKind) -> Option<&T> {
        self.view(kind)?.as_any().downcast_ref::<T>()
    }

    pub fn render_description(&self, kind: ViewKind) -> Option<RenderDescription> {
        self.view(kind).map(|view| view.render_description())
    }

    /// Log a one-line summary of every view
    pub fn log_summary(&self) {
        for view in &self.views {
            match view.render_description().empty_state() {
                Some(state) => warn!(view = view.title(), "{state}"),
                None => info!(view = view.title(), revision = view.revision(), "Ready"),
            }
        }
    }
}
