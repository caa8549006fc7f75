use std::collections::BTreeSet;

use super::model::{PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Species selection
// ---------------------------------------------------------------------------

/// The species currently ticked in the sidebar.
pub type SpeciesSelection = BTreeSet<Species>;

/// Every species selected (the startup state).
pub fn all_species() -> SpeciesSelection {
    Species::ALL.into_iter().collect()
}

/// Return indices of rows whose species is in `selected`, in dataset order.
///
/// An empty selection matches nothing.
pub fn filter_by_species(dataset: &PenguinDataset, selected: &SpeciesSelection) -> Vec<usize> {
    if selected.is_empty() {
        return Vec::new();
    }
    dataset
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, p)| selected.contains(&p.species))
        .map(|(i, _)| i)
        .collect()
}
