use crate::data::filter::SpeciesSelection;
use crate::data::histogram::Histogram;
use crate::data::model::{Attribute, PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Scatterplot: body mass vs bill depth, one series per species
// ---------------------------------------------------------------------------

pub const SCATTER_X: Attribute = Attribute::BodyMassG;
pub const SCATTER_Y: Attribute = Attribute::BillDepthMm;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesPoints {
    pub species: Species,
    pub points: Vec<[f64; 2]>,
}

/// Group the filtered rows into per-species point series. Rows missing
/// either coordinate are skipped; species without points are omitted.
pub fn scatter_series(dataset: &PenguinDataset, rows: &[usize]) -> Vec<SpeciesPoints> {
    Species::ALL
        .into_iter()
        .map(|species| SpeciesPoints {
            species,
            points: rows
                .iter()
                .filter_map(|&i| dataset.get(i))
                .filter(|p| p.species == species)
                .filter_map(|p| Some([SCATTER_X.value_of(p)?, SCATTER_Y.value_of(p)?]))
                .collect(),
        })
        .filter(|s| !s.points.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Histogram of `attribute` over the filtered rows.
pub fn attribute_histogram(
    dataset: &PenguinDataset,
    rows: &[usize],
    attribute: Attribute,
    bins: usize,
) -> Histogram {
    Histogram::from_values(
        rows.iter()
            .filter_map(|&i| dataset.get(i))
            .filter_map(|p| attribute.value_of(p)),
        bins,
    )
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Pre-formatted cells of the given rows, in the given order.
pub fn table_cells(dataset: &PenguinDataset, rows: &[usize]) -> Vec<[String; 8]> {
    rows.iter()
        .filter_map(|&i| dataset.get(i))
        .map(|p| p.cells())
        .collect()
}

/// One-line summary used above the tables, e.g. `"120 of 344 rows (Adelie, Gentoo)"`.
pub fn selection_summary(dataset: &PenguinDataset, rows: &[usize], selected: &SpeciesSelection) -> String {
    let names: Vec<&str> = selected.iter().map(|s| s.as_str()).collect();
    let which = if names.is_empty() {
        "no species selected".to_string()
    } else {
        names.join(", ")
    };
    format!("{} of {} rows ({which})", rows.len(), dataset.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Island, Penguin};

    fn penguin(species: Species, mass: Option<f64>, depth: Option<f64>) -> Penguin {
        Penguin {
            species,
            island: Island::Dream,
            bill_length_mm: Some(45.0),
            bill_depth_mm: depth,
            flipper_length_mm: Some(200.0),
            body_mass_g: mass,
            sex: None,
            year: None,
        }
    }

    fn dataset() -> PenguinDataset {
        PenguinDataset::from_rows(vec![
            penguin(Species::Adelie, Some(3600.0), Some(18.0)),
            penguin(Species::Gentoo, Some(5200.0), Some(15.0)),
            penguin(Species::Adelie, None, Some(17.0)),
            penguin(Species::Gentoo, Some(4900.0), Some(14.5)),
        ])
    }

    #[test]
    fn scatter_groups_by_species_and_skips_missing() {
        let ds = dataset();
        let series = scatter_series(&ds, &[0, 1, 2, 3]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].species, Species::Adelie);
        assert_eq!(series[0].points, vec![[3600.0, 18.0]]);
        assert_eq!(series[1].points, vec![[5200.0, 15.0], [4900.0, 14.5]]);
    }

    #[test]
    fn scatter_of_empty_view_is_empty() {
        assert!(scatter_series(&dataset(), &[]).is_empty());
    }

    #[test]
    fn histogram_uses_only_filtered_rows() {
        let ds = dataset();
        let h = attribute_histogram(&ds, &[1, 3], Attribute::BodyMassG, 5);
        assert_eq!(h.bins(), 5);
        assert_eq!(h.total(), 2);
        assert_eq!(h.edges.first(), Some(&4900.0));
        assert_eq!(h.edges.last(), Some(&5200.0));
    }

    #[test]
    fn summary_names_selection() {
        let ds = dataset();
        let selected: SpeciesSelection = [Species::Gentoo].into_iter().collect();
        assert_eq!(selection_summary(&ds, &[1, 3], &selected), "2 of 4 rows (Gentoo)");
        assert_eq!(
            selection_summary(&ds, &[], &SpeciesSelection::new()),
            "0 of 4 rows (no species selected)"
        );
    }
}
