use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{ArrayRef, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::model::{COLUMNS, Penguin};

/// Write rows to `path`, choosing the format from the extension
/// (`.csv`, `.json`, `.parquet`/`.pq`). Returns the number of rows written.
pub fn write_file<'a>(path: &Path, rows: impl IntoIterator<Item = &'a Penguin>) -> Result<usize> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let rows: Vec<&Penguin> = rows.into_iter().collect();

    let file = || std::fs::File::create(path).with_context(|| format!("creating {}", path.display()));
    match ext.as_str() {
        "csv" => write_csv(file()?, &rows)?,
        "json" => write_json(file()?, &rows)?,
        "parquet" | "pq" => write_parquet(file()?, &rows)?,
        other => bail!("Unsupported export extension: .{other}"),
    }

    log::info!("Wrote {} penguins to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// CSV with the standard header; missing cells are written as `NA`.
pub fn write_csv<W: Write>(writer: W, rows: &[&Penguin]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(COLUMNS).context("writing CSV header")?;
    for p in rows {
        w.write_record(p.cells()).context("writing CSV row")?;
    }
    w.flush().context("flushing CSV")?;
    Ok(())
}

/// Records-oriented JSON array, `null` for missing values.
pub fn write_json<W: Write>(writer: W, rows: &[&Penguin]) -> Result<()> {
    serde_json::to_writer_pretty(writer, rows).context("writing JSON")?;
    Ok(())
}

pub fn write_parquet<W: Write + Send>(writer: W, rows: &[&Penguin]) -> Result<()> {
    let text = |f: fn(&Penguin) -> Option<String>| -> ArrayRef {
        Arc::new(rows.iter().map(|p| f(p)).collect::<StringArray>())
    };
    let number = |f: fn(&Penguin) -> Option<f64>| -> ArrayRef {
        Arc::new(rows.iter().map(|p| f(p)).collect::<Float64Array>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
        Field::new("bill_length_mm", DataType::Float64, true),
        Field::new("bill_depth_mm", DataType::Float64, true),
        Field::new("flipper_length_mm", DataType::Float64, true),
        Field::new("body_mass_g", DataType::Float64, true),
        Field::new("sex", DataType::Utf8, true),
        Field::new("year", DataType::Int32, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|p| Some(p.species.to_string())),
            text(|p| Some(p.island.to_string())),
            number(|p| p.bill_length_mm),
            number(|p| p.bill_depth_mm),
            number(|p| p.flipper_length_mm),
            number(|p| p.body_mass_g),
            text(|p| p.sex.map(|s| s.to_string())),
            Arc::new(rows.iter().map(|p| p.year).collect::<Int32Array>()),
        ],
    )
    .context("building record batch")?;

    let mut writer = ArrowWriter::try_new(writer, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Island, Sex, Species};

    fn adelie() -> Penguin {
        Penguin {
            species: Species::Adelie,
            island: Island::Torgersen,
            bill_length_mm: Some(39.1),
            bill_depth_mm: Some(18.7),
            flipper_length_mm: Some(181.0),
            body_mass_g: None,
            sex: Some(Sex::Male),
            year: Some(2007),
        }
    }

    #[test]
    fn csv_output_uses_na() {
        let p = adelie();
        let mut out = Vec::new();
        write_csv(&mut out, &[&p]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("species,island,bill_length_mm,bill_depth_mm,flipper_length_mm,body_mass_g,sex,year")
        );
        assert_eq!(lines.next(), Some("Adelie,Torgersen,39.1,18.7,181,NA,male,2007"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn json_output_uses_null() {
        let p = adelie();
        let mut out = Vec::new();
        write_json(&mut out, &[&p]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["species"], "Adelie");
        assert_eq!(value[0]["sex"], "male");
        assert!(value[0]["body_mass_g"].is_null());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = adelie();
        assert!(write_file(&dir.path().join("out.txt"), [&p]).is_err());
    }
}
