use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Island, Penguin, PenguinDataset, Sex, Species};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a penguin dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per field, numeric columns Float or Int
/// * `.json`    – `[{ "species": "Adelie", "bill_length_mm": 39.1, ... }, ...]`
/// * `.csv`     – header row, missing cells written as `NA` or left empty
pub fn load_file(path: &Path) -> Result<PenguinDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            read_csv(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("Loaded {} penguins from {}", dataset.len(), path.display());
    Ok(dataset)
}

// -- Cell helpers shared by the text formats --

fn is_missing(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan")
}

fn parse_opt_f64(s: &str, row: usize, col: &str) -> Result<Option<f64>> {
    if is_missing(s) {
        return Ok(None);
    }
    s.trim()
        .parse::<f64>()
        .map(Some)
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

fn parse_opt_year(s: &str, row: usize) -> Result<Option<i32>> {
    if is_missing(s) {
        return Ok(None);
    }
    s.trim()
        .parse::<i32>()
        .map(Some)
        .with_context(|| format!("Row {row}, year: '{s}' is not an integer"))
}

fn parse_opt_sex(s: &str) -> Option<Sex> {
    if is_missing(s) {
        return None;
    }
    // Anything unrecognised (e.g. ".") counts as not recorded.
    s.parse().ok()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the standard column names, in any order.
/// `species` and `island` are required; every other column may be absent.
pub fn read_csv<R: Read>(reader: R) -> Result<PenguinDataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: HashMap<String, usize> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let species_idx = *headers.get("species").context("CSV missing 'species' column")?;
    let island_idx = *headers.get("island").context("CSV missing 'island' column")?;

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |name: &str| csv_cell(&record, &headers, name).to_string();

        let species: Species = record
            .get(species_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("CSV row {row_no}"))?;
        let island: Island = record
            .get(island_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("CSV row {row_no}"))?;

        rows.push(Penguin {
            species,
            island,
            bill_length_mm: parse_opt_f64(&cell("bill_length_mm"), row_no, "bill_length_mm")?,
            bill_depth_mm: parse_opt_f64(&cell("bill_depth_mm"), row_no, "bill_depth_mm")?,
            flipper_length_mm: parse_opt_f64(
                &cell("flipper_length_mm"),
                row_no,
                "flipper_length_mm",
            )?,
            body_mass_g: parse_opt_f64(&cell("body_mass_g"), row_no, "body_mass_g")?,
            sex: parse_opt_sex(&cell("sex")),
            year: parse_opt_year(&cell("year"), row_no)?,
        });
    }

    Ok(PenguinDataset::from_rows(rows))
}

/// Cell text for a named column; absent columns read as empty (missing).
fn csv_cell<'a>(
    record: &'a csv::StringRecord,
    headers: &HashMap<String, usize>,
    name: &str,
) -> &'a str {
    headers
        .get(name)
        .and_then(|&i| record.get(i))
        .unwrap_or("")
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "Adelie", "island": "Torgersen", "bill_length_mm": 39.1,
///     "bill_depth_mm": 18.7, "flipper_length_mm": 181, "body_mass_g": 3750,
///     "sex": "male", "year": 2007 },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<PenguinDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let text_field = |key: &str| -> Result<String> {
            obj.get(key)
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .with_context(|| format!("Row {i}: missing or invalid '{key}'"))
        };
        let number_field = |key: &str| -> Result<Option<f64>> {
            match obj.get(key) {
                None | Some(JsonValue::Null) => Ok(None),
                Some(JsonValue::Number(n)) => Ok(n.as_f64()),
                Some(JsonValue::String(s)) => parse_opt_f64(s, i, key),
                Some(other) => bail!("Row {i}, {key}: expected a number, got {other}"),
            }
        };

        let species: Species = text_field("species")?
            .parse()
            .with_context(|| format!("Row {i}"))?;
        let island: Island = text_field("island")?
            .parse()
            .with_context(|| format!("Row {i}"))?;

        rows.push(Penguin {
            species,
            island,
            bill_length_mm: number_field("bill_length_mm")?,
            bill_depth_mm: number_field("bill_depth_mm")?,
            flipper_length_mm: number_field("flipper_length_mm")?,
            body_mass_g: number_field("body_mass_g")?,
            sex: obj.get("sex").and_then(|v| v.as_str()).and_then(parse_opt_sex),
            year: number_field("year")?.map(|y| y as i32),
        });
    }

    Ok(PenguinDataset::from_rows(rows))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of penguins.
///
/// Expected schema:
/// - `species`, `island`, `sex`: Utf8 / LargeUtf8
/// - measurements and `year`: any of Float64, Float32, Int64, Int32
///
/// Works with files written by **Pandas**, **Polars** and the bundled
/// `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<PenguinDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let column = |name: &str| schema.index_of(name).ok().map(|i| batch.column(i));

        let species_col = column("species").context("Parquet file missing 'species' column")?;
        let island_col = column("island").context("Parquet file missing 'island' column")?;

        for row in 0..batch.num_rows() {
            let species: Species = extract_str(species_col, row)?
                .context("null species")?
                .parse()
                .with_context(|| format!("Row {row}"))?;
            let island: Island = extract_str(island_col, row)?
                .context("null island")?
                .parse()
                .with_context(|| format!("Row {row}"))?;

            let number = |name: &str| -> Result<Option<f64>> {
                match column(name) {
                    Some(col) => extract_f64(col, row)
                        .with_context(|| format!("Row {row}: failed to read '{name}'")),
                    None => Ok(None),
                }
            };
            let sex = match column("sex") {
                Some(col) => extract_str(col, row)?.and_then(|s| parse_opt_sex(&s)),
                None => None,
            };

            rows.push(Penguin {
                species,
                island,
                bill_length_mm: number("bill_length_mm")?,
                bill_depth_mm: number("bill_depth_mm")?,
                flipper_length_mm: number("flipper_length_mm")?,
                body_mass_g: number("body_mass_g")?,
                sex,
                year: number("year")?.map(|y| y as i32),
            });
        }
    }

    Ok(PenguinDataset::from_rows(rows))
}

// -- Parquet / Arrow helpers --

/// Extract an optional string from a Utf8 or LargeUtf8 column.
fn extract_str(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(Some(arr.value(row).to_string()))
        }
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => bail!("Expected string column, got {other:?}"),
    }
}

/// Extract an optional number from any float or integer column.
fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        other => bail!("Expected numeric column, got {other:?}"),
    };
    let value = value.context("column type does not match its array")?;
    Ok((!value.is_nan()).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::synthetic_penguins;
    use crate::data::writer;

    const CSV: &str = "\
species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year
Adelie,Torgersen,39.1,18.7,181,3750,male,2007
Adelie,Torgersen,NA,NA,NA,NA,NA,2007
Gentoo,Biscoe,46.1,13.2,211,4500,female,2007
Chinstrap,Dream,46.5,17.9,192,3500,female,2007
Gentoo,Biscoe,44.5,15.7,217,4875,.,2009
";

    #[test]
    fn csv_with_na_cells() {
        let ds = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 5);
        let first = &ds.rows()[0];
        assert_eq!(first.species, Species::Adelie);
        assert_eq!(first.flipper_length_mm, Some(181.0));
        assert_eq!(first.sex, Some(Sex::Male));

        let missing = &ds.rows()[1];
        assert_eq!(missing.bill_length_mm, None);
        assert_eq!(missing.body_mass_g, None);
        assert_eq!(missing.sex, None);
        assert_eq!(missing.year, Some(2007));

        let dotted = &ds.rows()[4];
        assert_eq!(dotted.sex, None);
        assert_eq!(dotted.body_mass_g, Some(4875.0));
    }

    #[test]
    fn csv_unknown_species_fails() {
        let text = "species,island\nEmperor,Dream\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(format!("{err:#}").contains("Emperor"));
    }

    #[test]
    fn csv_without_species_column_fails() {
        assert!(read_csv("island\nDream\n".as_bytes()).is_err());
    }

    #[test]
    fn json_records() {
        let text = r#"[
            {"species": "Gentoo", "island": "Biscoe", "bill_length_mm": 46.1,
             "bill_depth_mm": 13.2, "flipper_length_mm": 211, "body_mass_g": 4500,
             "sex": "female", "year": 2007},
            {"species": "Adelie", "island": "Dream", "bill_length_mm": null,
             "sex": null, "year": 2009}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].body_mass_g, Some(4500.0));
        assert_eq!(ds.rows()[1].bill_length_mm, None);
        assert_eq!(ds.rows()[1].flipper_length_mm, None);
        assert_eq!(ds.rows()[1].year, Some(2009));
    }

    #[test]
    fn json_must_be_array() {
        assert!(parse_json(r#"{"species": "Adelie"}"#).is_err());
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = load_file(Path::new("penguins.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn files_written_by_writer_load_back() {
        let ds = synthetic_penguins(3);
        let dir = tempfile::tempdir().unwrap();
        for name in ["p.parquet", "p.csv", "p.json"] {
            let path = dir.path().join(name);
            writer::write_file(&path, ds.rows().iter()).unwrap();
            let loaded = load_file(&path).unwrap();
            assert_eq!(loaded, ds, "{name}");
        }
    }

    #[test]
    fn json_export_keeps_exact_measurements() {
        let p = Penguin {
            species: Species::Gentoo,
            island: Island::Biscoe,
            bill_length_mm: Some(0.1 + 0.2),
            bill_depth_mm: Some(38.300000000000004),
            flipper_length_mm: Some(1.0 / 3.0),
            body_mass_g: Some(4875.0),
            sex: Some(Sex::Female),
            year: Some(2008),
        };
        let mut out = Vec::new();
        writer::write_json(&mut out, &[&p]).unwrap();
        let loaded = parse_json(std::str::from_utf8(&out).unwrap()).unwrap();
        assert_eq!(loaded.rows(), std::slice::from_ref(&p));
    }
}
