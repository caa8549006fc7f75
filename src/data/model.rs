use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Parse errors for the closed categorical columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown species '{0}'")]
    Species(String),
    #[error("unknown island '{0}'")]
    Island(String),
    #[error("unknown sex '{0}'")]
    Sex(String),
}

// ---------------------------------------------------------------------------
// Species / Island / Sex
// ---------------------------------------------------------------------------

/// Penguin species. The order of the variants is the order used for legends
/// and colour assignment; the sidebar uses [`Species::CHECKBOX_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Chinstrap, Species::Gentoo];

    /// Order of the sidebar checkbox group.
    pub const CHECKBOX_ORDER: [Species; 3] = [Species::Adelie, Species::Gentoo, Species::Chinstrap];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Chinstrap => "Chinstrap",
            Species::Gentoo => "Gentoo",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Adelie" => Ok(Species::Adelie),
            "Chinstrap" => Ok(Species::Chinstrap),
            "Gentoo" => Ok(Species::Gentoo),
            other => Err(ParseError::Species(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Island {
    Biscoe,
    Dream,
    Torgersen,
}

impl Island {
    pub fn as_str(self) -> &'static str {
        match self {
            Island::Biscoe => "Biscoe",
            Island::Dream => "Dream",
            Island::Torgersen => "Torgersen",
        }
    }
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Island {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Biscoe" => Ok(Island::Biscoe),
            "Dream" => Ok(Island::Dream),
            "Torgersen" => Ok(Island::Torgersen),
            other => Err(ParseError::Island(other.to_string())),
        }
    }
}

/// Sex as recorded in the field notes. Missing entries are `None` on the
/// record rather than a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" => Ok(Sex::Female),
            "male" => Ok(Sex::Male),
            _ => Err(ParseError::Sex(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute – the numeric columns offered by the histogram selector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Attribute {
    #[default]
    BillLengthMm,
    BillDepthMm,
    FlipperLengthMm,
    BodyMassG,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::BillLengthMm,
        Attribute::BillDepthMm,
        Attribute::FlipperLengthMm,
        Attribute::BodyMassG,
    ];

    /// Column name as it appears in the data files.
    pub fn column(self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "bill_length_mm",
            Attribute::BillDepthMm => "bill_depth_mm",
            Attribute::FlipperLengthMm => "flipper_length_mm",
            Attribute::BodyMassG => "body_mass_g",
        }
    }

    /// Human readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "Bill Length (mm)",
            Attribute::BillDepthMm => "Bill Depth (mm)",
            Attribute::FlipperLengthMm => "Flipper Length (mm)",
            Attribute::BodyMassG => "Body Mass (g)",
        }
    }

    pub fn value_of(self, penguin: &Penguin) -> Option<f64> {
        match self {
            Attribute::BillLengthMm => penguin.bill_length_mm,
            Attribute::BillDepthMm => penguin.bill_depth_mm,
            Attribute::FlipperLengthMm => penguin.flipper_length_mm,
            Attribute::BodyMassG => penguin.body_mass_g,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Penguin – one row of the dataset
// ---------------------------------------------------------------------------

/// A single observation. Measurements may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penguin {
    pub species: Species,
    pub island: Island,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<Sex>,
    pub year: Option<i32>,
}

/// Column headers in file and table order.
pub const COLUMNS: [&str; 8] = [
    "species",
    "island",
    "bill_length_mm",
    "bill_depth_mm",
    "flipper_length_mm",
    "body_mass_g",
    "sex",
    "year",
];

impl Penguin {
    /// Display text for every column, `NA` for missing cells.
    pub fn cells(&self) -> [String; 8] {
        fn opt<T: fmt::Display>(v: Option<T>) -> String {
            v.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())
        }
        [
            self.species.to_string(),
            self.island.to_string(),
            opt(self.bill_length_mm),
            opt(self.bill_depth_mm),
            opt(self.flipper_length_mm),
            opt(self.body_mass_g),
            opt(self.sex),
            opt(self.year),
        ]
    }
}

// ---------------------------------------------------------------------------
// PenguinDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full dataset. Built once at startup and only ever read afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PenguinDataset {
    rows: Vec<Penguin>,
}

impl PenguinDataset {
    pub fn from_rows(rows: Vec<Penguin>) -> Self {
        PenguinDataset { rows }
    }

    pub fn rows(&self) -> &[Penguin] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Penguin> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Per-species row counts, in `Species::ALL` order.
    pub fn species_counts(&self) -> [(Species, usize); 3] {
        Species::ALL.map(|sp| (sp, self.rows.iter().filter(|p| p.species == sp).count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn species_parse_and_display_agree() {
        for sp in Species::ALL {
            assert_eq!(sp.to_string().parse::<Species>(), Ok(sp));
        }
        assert_eq!(
            "Emperor".parse::<Species>(),
            Err(ParseError::Species("Emperor".into()))
        );
    }

    #[test]
    fn attribute_reads_its_own_column() {
        let p = Penguin {
            species: Species::Adelie,
            island: Island::Dream,
            bill_length_mm: Some(39.5),
            bill_depth_mm: Some(17.4),
            flipper_length_mm: Some(186.0),
            body_mass_g: None,
            sex: Some(Sex::Female),
            year: Some(2007),
        };
        assert_eq!(Attribute::default(), Attribute::BillLengthMm);
        assert_eq!(Attribute::BillDepthMm.value_of(&p), Some(17.4));
        assert_eq!(Attribute::BodyMassG.value_of(&p), None);
        assert_eq!(Attribute::FlipperLengthMm.to_string(), "flipper_length_mm");
    }

    #[test]
    fn checkbox_order_covers_every_species() {
        assert_eq!(
            Species::CHECKBOX_ORDER.map(Species::as_str),
            ["Adelie", "Gentoo", "Chinstrap"]
        );
        let mut sorted = Species::CHECKBOX_ORDER;
        sorted.sort();
        assert_eq!(sorted, Species::ALL);
    }

    #[test]
    fn sex_parse_is_case_insensitive() {
        assert_eq!("MALE".parse::<Sex>(), Ok(Sex::Male));
        assert_eq!(" female ".parse::<Sex>(), Ok(Sex::Female));
        assert!("NA".parse::<Sex>().is_err());
    }

    #[test]
    fn cells_render_missing_as_na() {
        let p = Penguin {
            species: Species::Gentoo,
            island: Island::Biscoe,
            bill_length_mm: Some(46.1),
            bill_depth_mm: None,
            flipper_length_mm: Some(211.0),
            body_mass_g: None,
            sex: None,
            year: Some(2007),
        };
        let cells = p.cells();
        assert_eq!(cells[0], "Gentoo");
        assert_eq!(cells[2], "46.1");
        assert_eq!(cells[3], "NA");
        assert_eq!(cells[4], "211");
        assert_eq!(cells[6], "NA");
        assert_eq!(cells[7], "2007");
    }
}
