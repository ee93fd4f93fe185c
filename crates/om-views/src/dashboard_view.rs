//! Dashboard view abstraction - base trait for the three linked views

use egui::Pos2;
use om_core::{SelectionChange, SelectionState, ViewTransform};
use om_data::{DatedCounts, Dataset, DetailMatrix};
use uuid::Uuid;

use crate::detail::DetailScene;
use crate::empty::EmptyState;
use crate::overview::OverviewScene;
use crate::timeline::TimelineScene;

/// Unique identifier for a view
pub type ViewId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Overview,
    Timeline,
    Detail,
}

/// Where the dataset stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataStatus {
    NotLoaded,
    Loaded,
    Failed(String),
}

/// Everything a view derives its render description from
pub struct ViewInputs<'a> {
    pub status: &'a DataStatus,
    pub dataset: &'a Dataset,
    pub selection: &'a SelectionState,
    pub transform: ViewTransform,
    /// Timeline series for the current country and discipline
    pub timeline: &'a [DatedCounts],
    /// Detail matrix for the current country
    pub detail: &'a DetailMatrix,
}

impl ViewInputs<'_> {
    pub fn is_loaded(&self) -> bool {
        *self.status == DataStatus::Loaded
    }
}

/// Events a view emits back to the coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    SelectCountry { code: String, name: String },
    SelectDiscipline(Option<String>),
    Transform(ViewTransform),
}

/// Pointer interaction in view coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    /// Click or tap
    Activate(Pos2),
    Hover(Pos2),
    /// Pointer left the view
    Leave,
    /// Wheel or pinch zoom around `anchor`
    Zoom { factor: f64, anchor: Pos2 },
    /// Drag along the time axis
    Pan { dx: f32 },
}

/// State an input handler may need beyond the view's own
#[derive(Debug, Clone, Copy)]
pub struct InputContext {
    /// Effective transform, including gestures not yet applied. Zoom and
    /// pan build on it; hit testing uses the transform the scene was drawn with.
    pub transform: ViewTransform,
}

/// A scene to draw, or an explicit empty state
#[derive(Debug, Clone, PartialEq)]
pub enum ViewContent<S> {
    Scene(S),
    Empty(EmptyState),
}

impl<S> ViewContent<S> {
    pub fn scene(&self) -> Option<&S> {
        match self {
            ViewContent::Scene(scene) => Some(scene),
            ViewContent::Empty(_) => None,
        }
    }

    pub fn empty_state(&self) -> Option<&EmptyState> {
        match self {
            ViewContent::Scene(_) => None,
            ViewContent::Empty(state) => Some(state),
        }
    }
}

/// Render-ready output handed to the drawing layer
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDescription {
    Overview(ViewContent<OverviewScene>),
    Timeline(ViewContent<TimelineScene>),
    Detail(ViewContent<DetailScene>),
}

impl RenderDescription {
    pub fn empty_state(&self) -> Option<&EmptyState> {
        match self {
            RenderDescription::Overview(content) => content.empty_state(),
            RenderDescription::Timeline(content) => content.empty_state(),
            RenderDescription::Detail(content) => content.empty_state(),
        }
    }
}

/// Base trait for the dashboard views
pub trait DashboardView: Send + Sync {
    /// Get the unique ID of this view
    fn id(&self) -> ViewId;

    fn title(&self) -> &str;

    fn kind(&self) -> ViewKind;

    /// Whether a change of this kind affects what the view shows
    fn depends_on(&self, change: SelectionChange) -> bool;

    /// Re-derive the render description from fresh inputs
    fn update(&mut self, inputs: &ViewInputs<'_>);

    /// Handle pointer input, possibly emitting an event
    fn handle_input(&mut self, _input: PointerInput, _ctx: &InputContext) -> Option<ViewEvent> {
        None
    }

    fn render_description(&self) -> RenderDescription;

    /// Incremented on every `update`
    fn revision(&self) -> u64;

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;

    /// Get as any mut for downcasting
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
