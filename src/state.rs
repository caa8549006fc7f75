use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::color::SpeciesColors;
use crate::data::filter::{SpeciesSelection, all_species, filter_by_species};
use crate::data::histogram::Histogram;
use crate::data::model::{Attribute, PenguinDataset, Species};
use crate::data::sort::{SortKey, sort_rows};
use crate::data::writer;
use crate::reactive::{DependencyGraph, Memo, NodeId};
use crate::views::{self, SpeciesPoints};

pub const DEFAULT_BIN_COUNT: u32 = 5;
/// Range of the numeric bin-count input.
pub const PLOTLY_BIN_RANGE: std::ops::RangeInclusive<u32> = 1..=100;
/// Range of the bin-count slider.
pub const SEABORN_BIN_RANGE: std::ops::RangeInclusive<u32> = 0..=20;

// ---------------------------------------------------------------------------
// Inputs – the sidebar controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub selected_attribute: Attribute,
    pub plotly_bin_count: u32,
    pub seaborn_bin_count: u32,
    pub selected_species: SpeciesSelection,
    pub grid_sort: Option<SortKey>,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            selected_attribute: Attribute::default(),
            plotly_bin_count: DEFAULT_BIN_COUNT,
            seaborn_bin_count: DEFAULT_BIN_COUNT,
            selected_species: all_species(),
            grid_sort: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramTab {
    #[default]
    Plotly,
    Seaborn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataTab {
    #[default]
    Grid,
    Table,
}

// ---------------------------------------------------------------------------
// Reactive wiring
// ---------------------------------------------------------------------------

/// Graph node ids, one per input and per derived value.
#[derive(Debug, Clone, Copy)]
pub struct Nodes {
    pub selected_attribute: NodeId,
    pub plotly_bin_count: NodeId,
    pub seaborn_bin_count: NodeId,
    pub selected_species: NodeId,
    pub grid_sort: NodeId,
    pub filtered_data: NodeId,
    pub scatterplot: NodeId,
    pub plotly_histogram: NodeId,
    pub seaborn_histogram: NodeId,
    pub data_grid: NodeId,
    pub data_table: NodeId,
}

impl Nodes {
    fn wire(graph: &mut DependencyGraph) -> Self {
        let n = Nodes {
            selected_attribute: graph.add_node("selected_attribute"),
            plotly_bin_count: graph.add_node("plotly_bin_count"),
            seaborn_bin_count: graph.add_node("seaborn_bin_count"),
            selected_species: graph.add_node("selected_species"),
            grid_sort: graph.add_node("grid_sort"),
            filtered_data: graph.add_node("filtered_data"),
            scatterplot: graph.add_node("scatterplot"),
            plotly_histogram: graph.add_node("plotly_histogram"),
            seaborn_histogram: graph.add_node("seaborn_histogram"),
            data_grid: graph.add_node("data_grid"),
            data_table: graph.add_node("data_table"),
        };
        let edges = [
            (n.selected_species, n.filtered_data),
            (n.filtered_data, n.scatterplot),
            (n.filtered_data, n.plotly_histogram),
            (n.filtered_data, n.seaborn_histogram),
            (n.filtered_data, n.data_grid),
            (n.filtered_data, n.data_table),
            (n.selected_attribute, n.plotly_histogram),
            (n.selected_attribute, n.seaborn_histogram),
            (n.plotly_bin_count, n.plotly_histogram),
            (n.seaborn_bin_count, n.seaborn_histogram),
            (n.grid_sort, n.data_grid),
        ];
        for (upstream, downstream) in edges {
            if let Err(e) = graph.add_edge(upstream, downstream) {
                // Fixed acyclic wiring; only reachable if the table above is edited badly.
                log::error!("reactive wiring: {e}");
            }
        }
        // Inputs hold no cached value, so they are never dirty.
        for input in [
            n.selected_attribute,
            n.plotly_bin_count,
            n.seaborn_bin_count,
            n.selected_species,
            n.grid_sort,
        ] {
            graph.mark_clean(input);
        }
        n
    }
}

/// Cached outputs, each bound to its node.
#[derive(Debug)]
struct Memos {
    filtered_data: Memo<Vec<usize>>,
    scatterplot: Memo<Vec<SpeciesPoints>>,
    plotly_histogram: Memo<Histogram>,
    seaborn_histogram: Memo<Histogram>,
    data_grid: Memo<Vec<[String; 8]>>,
    data_table: Memo<Vec<[String; 8]>>,
}

impl Memos {
    fn new(n: &Nodes) -> Self {
        Memos {
            filtered_data: Memo::new(n.filtered_data),
            scatterplot: Memo::new(n.scatterplot),
            plotly_histogram: Memo::new(n.plotly_histogram),
            seaborn_histogram: Memo::new(n.seaborn_histogram),
            data_grid: Memo::new(n.data_grid),
            data_table: Memo::new(n.data_table),
        }
    }
}

/// Pull the filtered row indices, recomputing them if the selection changed.
fn pull_filtered<'a>(
    graph: &mut DependencyGraph,
    memo: &'a mut Memo<Vec<usize>>,
    dataset: &PenguinDataset,
    selected: &SpeciesSelection,
) -> &'a [usize] {
    memo.get(graph, || filter_by_species(dataset, selected))
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded once at startup, never mutated.
    dataset: Arc<PenguinDataset>,

    /// Current sidebar values. Change them through the setters so the
    /// dependent outputs are invalidated.
    inputs: Inputs,

    graph: DependencyGraph,
    nodes: Nodes,
    memos: Memos,

    pub colors: SpeciesColors,
    pub histogram_tab: HistogramTab,
    pub data_tab: DataTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<PenguinDataset>) -> Self {
        let mut graph = DependencyGraph::new();
        let nodes = Nodes::wire(&mut graph);
        let memos = Memos::new(&nodes);
        Self {
            dataset,
            inputs: Inputs::default(),
            graph,
            nodes,
            memos,
            colors: SpeciesColors::default(),
            histogram_tab: HistogramTab::default(),
            data_tab: DataTab::default(),
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &Arc<PenguinDataset> {
        &self.dataset
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    pub fn nodes(&self) -> &Nodes {
        &self.nodes
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    // ---- input setters ----

    fn changed(&mut self, node: NodeId) {
        self.graph.invalidate(node);
    }

    pub fn set_attribute(&mut self, attribute: Attribute) {
        if self.inputs.selected_attribute != attribute {
            self.inputs.selected_attribute = attribute;
            self.changed(self.nodes.selected_attribute);
        }
    }

    pub fn set_plotly_bin_count(&mut self, bins: u32) {
        let bins = bins.clamp(*PLOTLY_BIN_RANGE.start(), *PLOTLY_BIN_RANGE.end());
        if self.inputs.plotly_bin_count != bins {
            self.inputs.plotly_bin_count = bins;
            self.changed(self.nodes.plotly_bin_count);
        }
    }

    pub fn set_seaborn_bin_count(&mut self, bins: u32) {
        let bins = bins.min(*SEABORN_BIN_RANGE.end());
        if self.inputs.seaborn_bin_count != bins {
            self.inputs.seaborn_bin_count = bins;
            self.changed(self.nodes.seaborn_bin_count);
        }
    }

    pub fn set_selected_species(&mut self, selected: SpeciesSelection) {
        if self.inputs.selected_species != selected {
            self.inputs.selected_species = selected;
            self.changed(self.nodes.selected_species);
        }
    }

    /// Tick or untick one species checkbox.
    pub fn set_species_checked(&mut self, species: Species, checked: bool) {
        let mut selected = self.inputs.selected_species.clone();
        if checked {
            selected.insert(species);
        } else {
            selected.remove(&species);
        }
        self.set_selected_species(selected);
    }

    /// Header click in the data grid.
    pub fn toggle_grid_sort(&mut self, column: usize) {
        self.inputs.grid_sort = Some(SortKey::toggled(self.inputs.grid_sort, column));
        self.changed(self.nodes.grid_sort);
    }

    // ---- reactive outputs ----

    /// Indices of the rows whose species is selected.
    pub fn filtered_rows(&mut self) -> &[usize] {
        pull_filtered(
            &mut self.graph,
            &mut self.memos.filtered_data,
            &self.dataset,
            &self.inputs.selected_species,
        )
    }

    pub fn scatterplot(&mut self) -> &[SpeciesPoints] {
        let rows = pull_filtered(
            &mut self.graph,
            &mut self.memos.filtered_data,
            &self.dataset,
            &self.inputs.selected_species,
        );
        let dataset = &self.dataset;
        self.memos
            .scatterplot
            .get(&mut self.graph, || views::scatter_series(dataset, rows))
    }

    pub fn plotly_histogram(&mut self) -> &Histogram {
        let rows = pull_filtered(
            &mut self.graph,
            &mut self.memos.filtered_data,
            &self.dataset,
            &self.inputs.selected_species,
        );
        let (dataset, inputs) = (&self.dataset, &self.inputs);
        self.memos.plotly_histogram.get(&mut self.graph, || {
            views::attribute_histogram(
                dataset,
                rows,
                inputs.selected_attribute,
                inputs.plotly_bin_count as usize,
            )
        })
    }

    pub fn seaborn_histogram(&mut self) -> &Histogram {
        let rows = pull_filtered(
            &mut self.graph,
            &mut self.memos.filtered_data,
            &self.dataset,
            &self.inputs.selected_species,
        );
        let (dataset, inputs) = (&self.dataset, &self.inputs);
        self.memos.seaborn_histogram.get(&mut self.graph, || {
            views::attribute_histogram(
                dataset,
                rows,
                inputs.selected_attribute,
                inputs.seaborn_bin_count as usize,
            )
        })
    }

    /// Filtered rows in grid sort order, pre-formatted.
    pub fn data_grid(&mut self) -> &[[String; 8]] {
        let rows = pull_filtered(
            &mut self.graph,
            &mut self.memos.filtered_data,
            &self.dataset,
            &self.inputs.selected_species,
        );
        let (dataset, sort) = (&self.dataset, self.inputs.grid_sort);
        self.memos.data_grid.get(&mut self.graph, || {
            views::table_cells(dataset, &sort_rows(dataset, rows, sort))
        })
    }

    /// Filtered rows in dataset order, pre-formatted.
    pub fn data_table(&mut self) -> &[[String; 8]] {
        let rows = pull_filtered(
            &mut self.graph,
            &mut self.memos.filtered_data,
            &self.dataset,
            &self.inputs.selected_species,
        );
        let dataset = &self.dataset;
        self.memos
            .data_table
            .get(&mut self.graph, || views::table_cells(dataset, rows))
    }

    pub fn summary(&mut self) -> String {
        let rows = pull_filtered(
            &mut self.graph,
            &mut self.memos.filtered_data,
            &self.dataset,
            &self.inputs.selected_species,
        );
        views::selection_summary(&self.dataset, rows, &self.inputs.selected_species)
    }

    /// Write the currently visible rows to `path` (format from extension).
    pub fn export_filtered(&mut self, path: &Path) -> Result<usize> {
        let rows = self.filtered_rows().to_vec();
        let dataset = Arc::clone(&self.dataset);
        writer::write_file(path, rows.iter().filter_map(|&i| dataset.get(i)))
    }
}

#[cfg(test)]
impl AppState {
    /// How often each derived value has been computed, by node name.
    fn evaluation_counts(&self) -> [(&'static str, u64); 6] {
        let m = &self.memos;
        [
            ("filtered_data", m.filtered_data.evaluations()),
            ("scatterplot", m.scatterplot.evaluations()),
            ("plotly_histogram", m.plotly_histogram.evaluations()),
            ("seaborn_histogram", m.seaborn_histogram.evaluations()),
            ("data_grid", m.data_grid.evaluations()),
            ("data_table", m.data_table.evaluations()),
        ]
    }

    fn evaluations(&self, name: &str) -> u64 {
        self.evaluation_counts()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map_or(0, |(_, c)| c)
    }

    fn filter_evaluations(&self) -> u64 {
        self.evaluations("filtered_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Island, Penguin};
    use crate::data::sample::{DEFAULT_SEED, synthetic_penguins};

    fn penguin(species: Species, bill_length: f64) -> Penguin {
        Penguin {
            species,
            island: Island::Biscoe,
            bill_length_mm: Some(bill_length),
            bill_depth_mm: Some(16.0),
            flipper_length_mm: Some(210.0),
            body_mass_g: Some(4500.0),
            sex: None,
            year: Some(2008),
        }
    }

    /// 3 Adelie, 2 Gentoo, 0 Chinstrap.
    fn small_state() -> AppState {
        let rows = vec![
            penguin(Species::Adelie, 38.0),
            penguin(Species::Gentoo, 47.0),
            penguin(Species::Adelie, 39.0),
            penguin(Species::Gentoo, 49.0),
            penguin(Species::Adelie, 40.0),
        ];
        AppState::new(Arc::new(PenguinDataset::from_rows(rows)))
    }

    #[test]
    fn defaults_match_sidebar() {
        let state = small_state();
        let inputs = state.inputs();
        assert_eq!(inputs.selected_attribute, Attribute::BillLengthMm);
        assert_eq!(inputs.plotly_bin_count, 5);
        assert_eq!(inputs.seaborn_bin_count, 5);
        assert_eq!(inputs.selected_species, all_species());
    }

    #[test]
    fn gentoo_selection_yields_two_gentoo_rows() {
        let mut state = small_state();
        state.set_selected_species([Species::Gentoo].into_iter().collect());
        let rows = state.filtered_rows().to_vec();
        assert_eq!(rows.len(), 2);
        let ds = state.dataset().clone();
        assert!(rows.iter().all(|&i| ds.rows()[i].species == Species::Gentoo));
        assert_eq!(state.data_table().len(), 2);
    }

    #[test]
    fn attribute_change_leaves_filter_alone() {
        let mut state = small_state();
        let before = state.filtered_rows().to_vec();
        state.plotly_histogram();
        assert_eq!(state.filter_evaluations(), 1);

        state.set_attribute(Attribute::BodyMassG);
        assert!(!state.graph().is_dirty(state.nodes().filtered_data));
        assert!(state.graph().is_dirty(state.nodes().plotly_histogram));
        state.plotly_histogram();
        assert_eq!(state.filtered_rows(), before.as_slice());
        assert_eq!(state.filter_evaluations(), 1);
        assert_eq!(state.evaluations("plotly_histogram"), 2);
    }

    #[test]
    fn species_change_reaches_every_output_before_next_read() {
        let mut state = small_state();
        assert_eq!(state.plotly_histogram().total(), 5);
        assert_eq!(state.data_grid().len(), 5);

        state.set_species_checked(Species::Adelie, false);
        for node in [
            state.nodes().filtered_data,
            state.nodes().scatterplot,
            state.nodes().plotly_histogram,
            state.nodes().seaborn_histogram,
            state.nodes().data_grid,
            state.nodes().data_table,
        ] {
            assert!(state.graph().is_dirty(node), "{}", state.graph().name(node));
        }
        assert_eq!(state.plotly_histogram().total(), 2);
        assert_eq!(state.seaborn_histogram().total(), 2);
        assert_eq!(state.data_grid().len(), 2);
        assert_eq!(state.scatterplot().len(), 1);
    }

    #[test]
    fn bin_count_only_touches_its_histogram() {
        let mut state = small_state();
        state.plotly_histogram();
        state.seaborn_histogram();

        state.set_seaborn_bin_count(3);
        assert!(!state.graph().is_dirty(state.nodes().plotly_histogram));
        assert_eq!(state.seaborn_histogram().bins(), 3);
        assert_eq!(state.plotly_histogram().bins(), 5);
        assert_eq!(state.evaluations("plotly_histogram"), 1);
    }

    #[test]
    fn setting_same_value_does_not_invalidate() {
        let mut state = small_state();
        state.data_table();
        state.set_selected_species(all_species());
        state.set_attribute(Attribute::BillLengthMm);
        state.data_table();
        assert_eq!(state.evaluations("data_table"), 1);
    }

    #[test]
    fn empty_selection_degrades_to_empty_outputs() {
        let mut state = small_state();
        for sp in Species::ALL {
            state.set_species_checked(sp, false);
        }
        assert!(state.filtered_rows().is_empty());
        assert!(state.scatterplot().is_empty());
        assert!(state.plotly_histogram().is_empty());
        assert!(state.data_grid().is_empty());
        assert_eq!(state.summary(), "0 of 5 rows (no species selected)");
    }

    #[test]
    fn bin_inputs_are_clamped() {
        let mut state = small_state();
        state.set_plotly_bin_count(0);
        assert_eq!(state.inputs().plotly_bin_count, 1);
        state.set_seaborn_bin_count(99);
        assert_eq!(state.inputs().seaborn_bin_count, 20);
        state.set_seaborn_bin_count(0);
        assert!(state.seaborn_histogram().is_empty());
    }

    #[test]
    fn grid_sort_reorders_without_refiltering() {
        let mut state = small_state();
        state.data_grid();
        let bill_length = 2;
        state.toggle_grid_sort(bill_length);
        state.toggle_grid_sort(bill_length);
        let first = state.data_grid()[0][bill_length].clone();
        assert_eq!(first, "49");
        assert_eq!(state.filter_evaluations(), 1);
        assert_eq!(state.evaluations("data_table"), 0);
    }

    #[test]
    fn export_writes_visible_rows_only() {
        let mut state = small_state();
        state.set_selected_species([Species::Gentoo].into_iter().collect());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gentoo.csv");
        assert_eq!(state.export_filtered(&path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1..].iter().all(|l| l.starts_with("Gentoo,")));
    }

    #[test]
    fn sample_dataset_full_selection_is_everything() {
        let mut state = AppState::new(Arc::new(synthetic_penguins(DEFAULT_SEED)));
        assert_eq!(state.filtered_rows().len(), 344);
    }
}
