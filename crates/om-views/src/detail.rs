//! Discipline x medal-type heatmap for the selected country

use egui::{pos2, vec2, Color32, Pos2, Rect, Vec2};
use om_core::{MedalType, SelectionChange};
use om_data::aggregate::cell_count_domain;
use tracing::debug;
use uuid::Uuid;

use crate::colors::{ColorScheme, SequentialScale};
use crate::dashboard_view::{
    DashboardView, InputContext, PointerInput, RenderDescription, ViewContent, ViewEvent, ViewId,
    ViewInputs, ViewKind,
};
use crate::empty::EmptyState;

#[derive(Debug, Clone)]
pub struct DetailConfig {
    /// Top-left corner of the row labels
    pub origin: Pos2,
    pub cell_size: Vec2,
    /// Width of the discipline label column
    pub label_width: f32,
    pub color_scheme: ColorScheme,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            origin: pos2(0.0, 0.0),
            cell_size: vec2(80.0, 28.0),
            label_width: 140.0,
            color_scheme: ColorScheme::Plasma,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub discipline: String,
    pub medal_type: MedalType,
    pub count: u32,
    pub rect: Rect,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailScene {
    /// Discipline rows, most medals first
    pub rows: Vec<String>,
    pub columns: [MedalType; 3],
    pub cells: Vec<HeatCell>,
    pub count_domain: (u32, u32),
    /// Labels plus grid
    pub bounds: Rect,
}

impl DetailScene {
    /// Row index under `pos`, labels included
    pub fn row_at(&self, pos: Pos2, cell_height: f32) -> Option<usize> {
        if !self.bounds.contains(pos) || cell_height <= 0.0 {
            return None;
        }
        let row = ((pos.y - self.bounds.top()) / cell_height) as usize;
        (row < self.rows.len()).then_some(row)
    }
}

/// Heatmap view
pub struct DetailView {
    id: ViewId,
    title: String,
    pub config: DetailConfig,

    selected_discipline: Option<String>,
    content: ViewContent<DetailScene>,
    revision: u64,
}

impl DetailView {
    pub fn new(title: impl Into<String>, config: DetailConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            config,
            selected_discipline: None,
            content: ViewContent::Empty(EmptyState::NoData),
            revision: 0,
        }
    }

    pub fn content(&self) -> &ViewContent<DetailScene> {
        &self.content
    }

    fn build_scene(&self, inputs: &ViewInputs<'_>) -> ViewContent<DetailScene> {
        if !inputs.is_loaded() {
            return ViewContent::Empty(EmptyState::NoData);
        }
        let matrix = inputs.detail;
        if matrix.is_empty() {
            return ViewContent::Empty(EmptyState::NoMedals {
                country_name: inputs.selection.selected_country_name.clone(),
            });
        }

        let count_domain = cell_count_domain(&matrix.cells);
        let scale = SequentialScale::new(count_domain, self.config.color_scheme);
        let grid_left = self.config.origin.x + self.config.label_width;
        let size = self.config.cell_size;

        let cells = matrix
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let row = i / MedalType::ALL.len();
                let min = pos2(
                    grid_left + cell.medal_type.index() as f32 * size.x,
                    self.config.origin.y + row as f32 * size.y,
                );
                HeatCell {
                    discipline: cell.discipline.clone(),
                    medal_type: cell.medal_type,
                    count: cell.count,
                    rect: Rect::from_min_size(min, size),
                    color: scale.color(cell.count as f64),
                }
            })
            .collect();

        let bounds = Rect::from_min_size(
            self.config.origin,
            vec2(
                self.config.label_width + size.x * MedalType::ALL.len() as f32,
                size.y * matrix.disciplines.len() as f32,
            ),
        );

        ViewContent::Scene(DetailScene {
            rows: matrix.disciplines.clone(),
            columns: MedalType::ALL,
            cells,
            count_domain,
            bounds,
        })
    }
}

impl DashboardView for DetailView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Detail
    }

    fn depends_on(&self, change: SelectionChange) -> bool {
        matches!(change, SelectionChange::Country | SelectionChange::Discipline)
    }

    fn update(&mut self, inputs: &ViewInputs<'_>) {
        self.selected_discipline = inputs.selection.selected_discipline.clone();
        self.content = self.build_scene(inputs);
        self.revision += 1;
        debug!(revision = self.revision, "Detail re-derived");
    }

    fn handle_input(&mut self, input: PointerInput, _ctx: &InputContext) -> Option<ViewEvent> {
        let PointerInput::Activate(pos) = input else {
            return None;
        };
        let scene = self.content.scene()?;

        match scene.row_at(pos, self.config.cell_size.y) {
            Some(row) => {
                let discipline = &scene.rows[row];
                // Activating the active discipline clears the filter
                if self.selected_discipline.as_deref() == Some(discipline.as_str()) {
                    Some(ViewEvent::SelectDiscipline(None))
                } else {
                    Some(ViewEvent::SelectDiscipline(Some(discipline.clone())))
                }
            }
            None if self.selected_discipline.is_some() => Some(ViewEvent::SelectDiscipline(None)),
            None => None,
        }
    }

    fn render_description(&self) -> RenderDescription {
        RenderDescription::Detail(self.content.clone())
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

    fn view_for(selection: SelectionState) -> DetailView {
        let fixture = Fixture::olympics(selection);
        let mut view = DetailView::new("Detail", DetailConfig::default());
        view.update(&fixture.inputs(ViewTransform::IDENTITY));
        view
    }

    fn ctx() -> InputContext {
        InputContext {
            transform: ViewTransform::IDENTITY,
        }
    }

    fn row_center(view: &DetailView, row: usize) -> Pos2 {
        let config = &view.config;
        pos2(
            config.origin.x + config.label_width + config.cell_size.x * 1.5,
            config.origin.y + config.cell_size.y * (row as f32 + 0.5),
        )
    }

    #[test]
    fn test_dense_grid_in_row_order() {
        let view = view_for(SelectionState::new("FRA", "France"));
        let scene = view.content().scene().unwrap();

        assert_eq!(scene.rows, vec!["Judo".to_string(), "Cycling Road".to_string()]);
        assert_eq!(scene.cells.len(), 6);
        assert_eq!(scene.count_domain, (0, 1));

        let judo_bronze = &scene.cells[2];
        assert_eq!(judo_bronze.discipline, "Judo");
        assert_eq!(judo_bronze.medal_type, MedalType::Bronze);
        assert_eq!(judo_bronze.count, 1);

        let cycling_gold = &scene.cells[3];
        assert_eq!(cycling_gold.count, 0);
        assert_eq!(cycling_gold.rect.top(), view.config.cell_size.y);
        assert_ne!(cycling_gold.color, judo_bronze.color);
    }

    #[test]
    fn test_activation_toggles_discipline() {
        let mut view = view_for(SelectionState::new("FRA", "France"));
        let pos = row_center(&view, 0);
        assert_eq!(
            view.handle_input(PointerInput::Activate(pos), &ctx()),
            Some(ViewEvent::SelectDiscipline(Some("Judo".to_string())))
        );

        let mut selection = SelectionState::new("FRA", "France");
        selection.selected_discipline = Some("Judo".to_string());
        let mut view = view_for(selection);
        assert_eq!(
            view.handle_input(PointerInput::Activate(pos), &ctx()),
            Some(ViewEvent::SelectDiscipline(None))
        );

        // Row label also selects
        let label = pos2(view.config.origin.x + 5.0, row_center(&view, 1).y);
        assert_eq!(
            view.handle_input(PointerInput::Activate(label), &ctx()),
            Some(ViewEvent::SelectDiscipline(Some("Cycling Road".to_string())))
        );
    }

    #[test]
    fn test_activation_outside_grid() {
        let mut view = view_for(SelectionState::new("FRA", "France"));
        let outside = pos2(-10.0, -10.0);
        assert_eq!(view.handle_input(PointerInput::Activate(outside), &ctx()), None);

        let mut selection = SelectionState::new("FRA", "France");
        selection.selected_discipline = Some("Judo".to_string());
        let mut view = view_for(selection);
        assert_eq!(
            view.handle_input(PointerInput::Activate(outside), &ctx()),
            Some(ViewEvent::SelectDiscipline(None))
        );
    }

    #[test]
    fn test_empty_states() {
        let view = view_for(SelectionState::new("EGY", "Egypt"));
        assert_eq!(
            view.content().empty_state().map(|s| s.message()),
            Some("No medals recorded for Egypt".to_string())
        );

        let fixture = Fixture::not_loaded();
        let mut view = DetailView::new("Detail", DetailConfig::default());
        view.update(&fixture.inputs(ViewTransform::IDENTITY));
        assert_eq!(view.content().empty_state(), Some(&EmptyState::NoData));
    }

    #[test]
    fn test_ignores_transform_changes() {
        let view = DetailView::new("Detail", DetailConfig::default());
        assert!(view.depends_on(SelectionChange::Country));
        assert!(view.depends_on(SelectionChange::Discipline));
        assert!(!view.depends_on(SelectionChange::Transform));
    }
}
