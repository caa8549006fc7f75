use std::cmp::Ordering;

use super::model::{COLUMNS, Penguin, PenguinDataset};

/// Sort order of the data grid: column index into [`COLUMNS`] and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: usize,
    pub ascending: bool,
}

impl SortKey {
    pub fn ascending(column: usize) -> Self {
        SortKey {
            column,
            ascending: true,
        }
    }

    /// Header click: same column flips direction, another column starts ascending.
    pub fn toggled(current: Option<SortKey>, column: usize) -> SortKey {
        match current {
            Some(key) if key.column == column => SortKey {
                column,
                ascending: !key.ascending,
            },
            _ => SortKey::ascending(column),
        }
    }

    pub fn column_name(&self) -> &'static str {
        COLUMNS.get(self.column).copied().unwrap_or("?")
    }
}

/// Missing values always go last, whatever the direction.
fn cmp_opt<T: PartialOrd>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if ascending { ord } else { ord.reverse() }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(a: &Penguin, b: &Penguin, key: SortKey) -> Ordering {
    let asc = key.ascending;
    match key.column {
        0 => cmp_opt(Some(a.species), Some(b.species), asc),
        1 => cmp_opt(Some(a.island), Some(b.island), asc),
        2 => cmp_opt(a.bill_length_mm, b.bill_length_mm, asc),
        3 => cmp_opt(a.bill_depth_mm, b.bill_depth_mm, asc),
        4 => cmp_opt(a.flipper_length_mm, b.flipper_length_mm, asc),
        5 => cmp_opt(a.body_mass_g, b.body_mass_g, asc),
        6 => cmp_opt(a.sex, b.sex, asc),
        7 => cmp_opt(a.year, b.year, asc),
        _ => Ordering::Equal,
    }
}

/// Reorder `rows` (indices into `dataset`) by `key`. Stable, so ties keep
/// dataset order.
pub fn sort_rows(dataset: &PenguinDataset, rows: &[usize], key: Option<SortKey>) -> Vec<usize> {
    let mut sorted = rows.to_vec();
    if let Some(key) = key {
        sorted.sort_by(|&a, &b| match (dataset.get(a), dataset.get(b)) {
            (Some(pa), Some(pb)) => compare(pa, pb, key),
            _ => Ordering::Equal,
        });
    }
    sorted
}
