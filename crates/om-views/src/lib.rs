//! View controllers for the medal dashboard
//!
//! Each view is a pure function of the aggregated data, the selection and
//! the timeline transform, producing a render description for the drawing
//! layer and emitting selection events on interaction.

mod dashboard_view;
pub mod colors;
pub mod detail;
pub mod empty;
pub mod overview;
pub mod timeline;

pub use dashboard_view::{
    DashboardView, DataStatus, InputContext, PointerInput, RenderDescription, ViewContent,
    ViewEvent, ViewId, ViewInputs, ViewKind,
};
pub use detail::{DetailConfig, DetailScene, DetailView, HeatCell};
pub use empty::EmptyState;
pub use overview::{OverviewConfig, OverviewScene, OverviewView, TreemapLeaf};
pub use timeline::{AreaBand, BandPoint, HoverReadout, TimelineConfig, TimelineScene, TimelineView};
