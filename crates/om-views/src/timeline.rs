//! Stacked-area medal timeline for the selected country
//! Zoomable along the time axis

use chrono::NaiveDate;
use egui::{pos2, vec2, Color32, Rect};
use om_core::{MedalType, SelectionChange, ViewTransform};
use om_data::DatedCounts;
use tracing::debug;
use uuid::Uuid;

use crate::colors::medal_color;
use crate::dashboard_view::{
    DashboardView, InputContext, PointerInput, RenderDescription, ViewContent, ViewEvent, ViewId,
    ViewInputs, ViewKind,
};
use crate::empty::EmptyState;

/// Configuration for the timeline view
#[derive(Debug, Clone)]
pub struct TimelineConfig {
    /// Plot area
    pub bounds: Rect,
    /// Stacking order, bottom band first
    pub stack_order: [MedalType; 3],
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::from_min_size(pos2(0.0, 0.0), vec2(960.0, 320.0)),
            stack_order: [MedalType::Bronze, MedalType::Silver, MedalType::Gold],
        }
    }
}

/// One stacked sample: `y0` is the band's lower edge, `y1` its upper edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub x: f32,
    pub y0: f32,
    pub y1: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaBand {
    pub medal_type: MedalType,
    pub color: Color32,
    pub points: Vec<BandPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineScene {
    pub bounds: Rect,
    pub bands: Vec<AreaBand>,
    pub date_domain: (NaiveDate, NaiveDate),
    /// Top of the y axis
    pub max_total: u32,
    pub transform: ViewTransform,
    pub caption: String,
}

/// Counts at the date nearest the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverReadout {
    /// Screen x of the resolved date
    pub x: f32,
    pub entry: DatedCounts,
}

/// Timeline plot view
pub struct TimelineView {
    id: ViewId,
    title: String,
    pub config: TimelineConfig,

    series: Vec<DatedCounts>,
    transform: ViewTransform,
    content: ViewContent<TimelineScene>,
    hover: Option<HoverReadout>,
    revision: u64,
}

impl TimelineView {
    pub fn new(title: impl Into<String>, config: TimelineConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            config,
            series: Vec::new(),
            transform: ViewTransform::IDENTITY,
            content: ViewContent::Empty(EmptyState::NoData),
            hover: None,
            revision: 0,
        }
    }

    pub fn content(&self) -> &ViewContent<TimelineScene> {
        &self.content
    }

    pub fn hover(&self) -> Option<&HoverReadout> {
        self.hover.as_ref()
    }

    fn span_days(&self) -> i64 {
        match (self.series.first(), self.series.last()) {
            (Some(first), Some(last)) => (last.date - first.date).num_days(),
            _ => 0,
        }
    }

    /// Untransformed offset of `date` from the left edge
    fn base_offset(&self, date: NaiveDate) -> f64 {
        let width = self.config.bounds.width() as f64;
        let span = self.span_days();
        match self.series.first() {
            Some(first) if span > 0 => (date - first.date).num_days() as f64 / span as f64 * width,
            _ => width / 2.0,
        }
    }

    fn screen_x(&self, date: NaiveDate, transform: &ViewTransform) -> f32 {
        self.config.bounds.left() + transform.apply(self.base_offset(date)) as f32
    }

    /// Nearest series entry to screen `x` under the drawn transform, by
    /// binary search over dates
    pub fn nearest_entry(&self, x: f32) -> Option<&DatedCounts> {
        let first = self.series.first()?;
        let span = self.span_days();
        if span == 0 {
            return Some(first);
        }

        let width = self.config.bounds.width() as f64;
        let base = self.transform.invert((x - self.config.bounds.left()) as f64);
        let target = base / width * span as f64;
        let day_of = |entry: &DatedCounts| (entry.date - first.date).num_days() as f64;

        let idx = self.series.partition_point(|entry| day_of(entry) < target);
        let after = self.series.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.series.get(i));

        match (before, after) {
            (Some(b), Some(a)) => {
                if target - day_of(b) <= day_of(a) - target {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (Some(b), None) => Some(b),
            (None, a) => a,
        }
    }

    fn build_scene(&self, inputs: &ViewInputs<'_>) -> ViewContent<TimelineScene> {
        if !inputs.is_loaded() {
            return ViewContent::Empty(EmptyState::NoData);
        }
        let (Some(first), Some(last)) = (self.series.first(), self.series.last()) else {
            return ViewContent::Empty(EmptyState::for_selection(inputs.selection));
        };

        let bounds = self.config.bounds;
        let max_total = self.series.iter().map(|e| e.total).max().unwrap_or(0).max(1);
        let y_of = |value: u32| bounds.bottom() - value as f32 / max_total as f32 * bounds.height();

        let mut baseline = vec![0u32; self.series.len()];
        let bands = self
            .config
            .stack_order
            .iter()
            .map(|&medal_type| {
                let points = self
                    .series
                    .iter()
                    .zip(baseline.iter_mut())
                    .map(|(entry, base)| {
                        let lower = *base;
                        *base += entry.get(medal_type);
                        BandPoint {
                            x: self.screen_x(entry.date, &self.transform),
                            y0: y_of(lower),
                            y1: y_of(*base),
                        }
                    })
                    .collect();
                AreaBand {
                    medal_type,
                    color: medal_color(medal_type),
                    points,
                }
            })
            .collect();

        let selection = inputs.selection;
        let caption = match selection.discipline() {
            Some(discipline) => format!("{} medals in {}", selection.selected_country_name, discipline),
            None => format!("{} medals", selection.selected_country_name),
        };

        ViewContent::Scene(TimelineScene {
            bounds,
            bands,
            date_domain: (first.date, last.date),
            max_total,
            transform: self.transform,
            caption,
        })
    }
}

impl DashboardView for TimelineView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Timeline
    }

    fn depends_on(&self, _change: SelectionChange) -> bool {
        true
    }

    fn update(&mut self, inputs: &ViewInputs<'_>) {
        self.series = inputs.timeline.to_vec();
        self.transform = inputs.transform;
        self.hover = None;
        self.content = self.build_scene(inputs);
        self.revision += 1;
        debug!(
            revision = self.revision,
            entries = self.series.len(),
            scale = self.transform.scale,
            "Timeline re-derived"
        );
    }

    fn handle_input(&mut self, input: PointerInput, ctx: &InputContext) -> Option<ViewEvent> {
        let bounds = self.config.bounds;
        let width = bounds.width() as f64;

        match input {
            PointerInput::Zoom { factor, anchor } => {
                let anchor = (anchor.x - bounds.left()) as f64;
                let next = ctx.transform.zoom_at(factor, anchor).constrained(width);
                (next != ctx.transform).then_some(ViewEvent::Transform(next))
            }
            PointerInput::Pan { dx } => {
                let next = ctx.transform.pan(dx as f64).constrained(width);
                (next != ctx.transform).then_some(ViewEvent::Transform(next))
            }
            PointerInput::Hover(pos) => {
                self.hover = if pos.x >= bounds.left() && pos.x <= bounds.right() {
                    self.nearest_entry(pos.x).map(|entry| HoverReadout {
                        x: self.screen_x(entry.date, &self.transform),
                        entry: *entry,
                    })
                } else {
                    None
                };
                None
            }
            PointerInput::Leave => {
                self.hover = None;
                None
            }
            PointerInput::Activate(_) => None,
        }
    }

    fn render_description(&self) -> RenderDescription {
        RenderDescription::Timeline(self.content.clone())
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
