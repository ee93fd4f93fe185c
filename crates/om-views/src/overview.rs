//! Treemap overview of every country's medal total

use egui::{pos2, vec2, Color32, Pos2, Rect};
use om_core::SelectionChange;
use tracing::debug;
use uuid::Uuid;

use crate::colors::{ColorScheme, SequentialScale};
use crate::dashboard_view::{
    DashboardView, InputContext, PointerInput, RenderDescription, ViewContent, ViewEvent, ViewId,
    ViewInputs, ViewKind,
};
use crate::empty::EmptyState;
use om_data::aggregate::overview_color_domain;

/// Treemap configuration
#[derive(Debug, Clone)]
pub struct OverviewConfig {
    /// Area the treemap partitions
    pub bounds: Rect,
    /// Gap left around each leaf
    pub padding: f32,
    /// Min leaf width to show labels
    pub label_threshold: f32,
    pub color_scheme: ColorScheme,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::from_min_size(Pos2::ZERO, vec2(960.0, 480.0)),
            padding: 1.0,
            label_threshold: 40.0,
            color_scheme: ColorScheme::Viridis,
        }
    }
}

/// One country rectangle
#[derive(Debug, Clone, PartialEq)]
pub struct TreemapLeaf {
    pub country_code: String,
    pub country_name: String,
    pub total: u32,
    pub rect: Rect,
    pub color: Color32,
    /// Matches the selected country
    pub highlighted: bool,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewScene {
    pub bounds: Rect,
    pub leaves: Vec<TreemapLeaf>,
    pub color_domain: (u32, u32),
}

impl OverviewScene {
    /// Leaf under `pos`
    pub fn leaf_at(&self, pos: Pos2) -> Option<&TreemapLeaf> {
        self.leaves.iter().find(|leaf| leaf.rect.contains(pos))
    }
}

/// Squarified layout of `values` (sorted descending) inside `rect`.
/// Returns one rectangle per value, in input order.
pub fn squarify(values: &[f64], rect: Rect) -> Vec<Rect> {
    let mut rects = vec![Rect::NOTHING; values.len()];
    let mut remaining = rect;
    let mut remaining_value: f64 = values.iter().sum();
    let mut start = 0;

    while start < values.len() {
        if remaining_value <= 0.0 || remaining.width() <= 0.0 || remaining.height() <= 0.0 {
            break;
        }

        // Area per unit of value in what is left
        let scale = remaining.width() as f64 * remaining.height() as f64 / remaining_value;
        let side = remaining.width().min(remaining.height()) as f64;

        let mut end = start + 1;
        let mut row_value = values[start];
        let mut worst = worst_aspect_ratio(&values[start..end], row_value, side, scale);

        // Grow the row while that improves its worst aspect ratio
        while end < values.len() {
            let next_value = row_value + values[end];
            let next_worst = worst_aspect_ratio(&values[start..=end], next_value, side, scale);
            if next_worst > worst {
                break;
            }
            worst = next_worst;
            row_value = next_value;
            end += 1;
        }

        remaining = layout_row(&values[start..end], row_value, scale, remaining, &mut rects[start..end]);
        remaining_value -= row_value;
        start = end;
    }

    rects
}

fn worst_aspect_ratio(row: &[f64], row_value: f64, side: f64, scale: f64) -> f64 {
    let thickness = row_value * scale / side;
    if thickness <= 0.0 {
        return f64::INFINITY;
    }

    row.iter()
        .map(|value| {
            let length = value * scale / thickness;
            if length <= 0.0 {
                f64::INFINITY
            } else {
                (length / thickness).max(thickness / length)
            }
        })
        .fold(0.0, f64::max)
}

/// Place one row along the short side of `remaining`; returns what is left
fn layout_row(row: &[f64], row_value: f64, scale: f64, remaining: Rect, out: &mut [Rect]) -> Rect {
    let area = row_value * scale;

    if remaining.width() >= remaining.height() {
        // Column strip along the left edge
        let thickness = (area / remaining.height() as f64) as f32;
        let mut y = remaining.top();
        for (value, slot) in row.iter().zip(out.iter_mut()) {
            let height = (value * scale / thickness as f64) as f32;
            *slot = Rect::from_min_size(pos2(remaining.left(), y), vec2(thickness, height));
            y += height;
        }
        Rect::from_min_max(pos2(remaining.left() + thickness, remaining.top()), remaining.max)
    } else {
        // Row strip along the top edge
        let thickness = (area / remaining.width() as f64) as f32;
        let mut x = remaining.left();
        for (value, slot) in row.iter().zip(out.iter_mut()) {
            let width = (value * scale / thickness as f64) as f32;
            *slot = Rect::from_min_size(pos2(x, remaining.top()), vec2(width, thickness));
            x += width;
        }
        Rect::from_min_max(pos2(remaining.left(), remaining.top() + thickness), remaining.max)
    }
}

/// Treemap view
pub struct OverviewView {
    id: ViewId,
    title: String,
    pub config: OverviewConfig,

    content: ViewContent<OverviewScene>,
    hovered: Option<String>,
    revision: u64,
}

impl OverviewView {
    pub fn new(title: impl Into<String>, config: OverviewConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            config,
            content: ViewContent::Empty(EmptyState::NoData),
            hovered: None,
            revision: 0,
        }
    }

    pub fn content(&self) -> &ViewContent<OverviewScene> {
        &self.content
    }

    /// Leaf under the pointer, for a tooltip
    pub fn hovered(&self) -> Option<&TreemapLeaf> {
        let code = self.hovered.as_deref()?;
        self.content
            .scene()?
            .leaves
            .iter()
            .find(|leaf| leaf.country_code == code)
    }

    fn build_scene(&self, inputs: &ViewInputs<'_>) -> ViewContent<OverviewScene> {
        if !inputs.is_loaded() {
            return ViewContent::Empty(EmptyState::NoData);
        }
        let Some(color_domain) = overview_color_domain(&inputs.dataset.totals) else {
            return ViewContent::Empty(EmptyState::NoData);
        };

        // Zero-total countries have no area to show
        let mut countries: Vec<_> = inputs.dataset.totals.iter().filter(|t| t.total > 0).collect();
        if countries.is_empty() {
            return ViewContent::Empty(EmptyState::NoData);
        }
        countries.sort_by(|a, b| b.total.cmp(&a.total));

        let values: Vec<f64> = countries.iter().map(|t| t.total as f64).collect();
        let rects = squarify(&values, self.config.bounds);
        let scale = SequentialScale::new(color_domain, self.config.color_scheme);
        let selected = inputs.selection.selected_country_code.as_str();

        let leaves = countries
            .into_iter()
            .zip(rects)
            .map(|(country, rect)| {
                let padding = self.config.padding;
                let rect = if rect.width() > 2.0 * padding && rect.height() > 2.0 * padding {
                    rect.shrink(padding)
                } else {
                    rect
                };
                TreemapLeaf {
                    country_code: country.country_code.clone(),
                    country_name: country.country_name.clone(),
                    total: country.total,
                    color: scale.color(country.total as f64),
                    highlighted: country.country_code == selected,
                    show_label: rect.width() >= self.config.label_threshold
                        && rect.height() >= self.config.label_threshold / 2.0,
                    rect,
                }
            })
            .collect();

        ViewContent::Scene(OverviewScene {
            bounds: self.config.bounds,
            leaves,
            color_domain,
        })
    }
}

impl DashboardView for OverviewView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Overview
    }

    fn depends_on(&self, change: SelectionChange) -> bool {
        // Only the highlight follows the selection; discipline and zoom don't apply
        matches!(change, SelectionChange::Country)
    }

    fn update(&mut self, inputs: &ViewInputs<'_>) {
        self.content = self.build_scene(inputs);
        self.revision += 1;
        debug!(revision = self.revision, "Overview re-derived");
    }

    fn handle_input(&mut self, input: PointerInput, _ctx: &InputContext) -> Option<ViewEvent> {
        match input {
            PointerInput::Activate(pos) => {
                let leaf = self.content.scene()?.leaf_at(pos)?;
                Some(ViewEvent::SelectCountry {
                    code: leaf.country_code.clone(),
                    name: leaf.country_name.clone(),
                })
            }
            PointerInput::Hover(pos) => {
                self.hovered = self
                    .content
                    .scene()
                    .and_then(|scene| scene.leaf_at(pos))
                    .map(|leaf| leaf.country_code.clone());
                None
            }
            PointerInput::Leave => {
                self.hovered = None;
                None
            }
            PointerInput::Zoom { .. } | PointerInput::Pan { .. } => None,
        }
    }

    fn render_description(&self) -> RenderDescription {
        RenderDescription::Overview(self.content.clone())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;
    use om_core::{SelectionState, ViewTransform};

    #[test]
    fn test_squarify_areas_are_proportional() {
        let bounds = Rect::from_min_size(Pos2::ZERO, vec2(600.0, 400.0));
        let values = [60.0, 30.0, 20.0, 10.0, 5.0, 5.0];
        let rects = squarify(&values, bounds);
        let sum: f64 = values.iter().sum();

        assert_eq!(rects.len(), values.len());
        for (rect, value) in rects.iter().zip(values) {
            let expected = bounds.area() as f64 * value / sum;
            assert!((rect.area() as f64 - expected).abs() < 1.0, "{rect:?} vs {expected}");
            assert!(bounds.expand(0.01).contains_rect(*rect));
        }
    }

    #[test]
    fn test_squarify_empty() {
        assert!(squarify(&[], Rect::from_min_size(Pos2::ZERO, vec2(10.0, 10.0))).is_empty());
    }

    #[test]
    fn test_one_leaf_per_country_with_highlight() {
        let fixture = Fixture::olympics(SelectionState::new("FRA", "France"));
        let mut view = OverviewView::new("Overview", OverviewConfig::default());
        view.update(&fixture.inputs(ViewTransform::IDENTITY));

        let scene = view.content().scene().unwrap();
        assert_eq!(scene.leaves.len(), fixture.dataset.totals.len());
        assert_eq!(scene.color_domain, (3, 126));
        let highlighted: Vec<_> = scene.leaves.iter().filter(|l| l.highlighted).collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].country_code, "FRA");
        assert_eq!(scene.leaves[0].country_code, "USA");
    }

    #[test]
    fn test_activation_selects_country() {
        let fixture = Fixture::olympics(SelectionState::default());
        let mut view = OverviewView::new("Overview", OverviewConfig::default());
        view.update(&fixture.inputs(ViewTransform::IDENTITY));

        let france = view
            .content()
            .scene()
            .and_then(|scene| scene.leaves.iter().find(|l| l.country_code == "FRA"))
            .map(|leaf| leaf.rect.center())
            .unwrap();
        let ctx = InputContext { transform: ViewTransform::IDENTITY };

        assert_eq!(
            view.handle_input(PointerInput::Activate(france), &ctx),
            Some(ViewEvent::SelectCountry {
                code: "FRA".to_string(),
                name: "France".to_string()
            })
        );

        view.handle_input(PointerInput::Hover(france), &ctx);
        assert_eq!(view.hovered().map(|l| l.total), Some(64));

        let outside = pos2(-10.0, -10.0);
        assert_eq!(view.handle_input(PointerInput::Activate(outside), &ctx), None);
    }

    #[test]
    fn test_not_loaded_shows_no_data() {
        let fixture = Fixture::not_loaded();
        let mut view = OverviewView::new("Overview", OverviewConfig::default());
        view.update(&fixture.inputs(ViewTransform::IDENTITY));
        assert_eq!(view.content().empty_state(), Some(&EmptyState::NoData));
    }

    #[test]
    fn test_ignores_discipline_changes() {
        let view = OverviewView::new("Overview", OverviewConfig::default());
        assert!(view.depends_on(SelectionChange::Country));
        assert!(!view.depends_on(SelectionChange::Discipline));
        assert!(!view.depends_on(SelectionChange::Transform));
    }
}
