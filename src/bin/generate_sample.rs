use std::path::PathBuf;

use anyhow::Result;
use penguin_explorer::data::sample::{DEFAULT_SEED, synthetic_penguins};
use penguin_explorer::data::writer;

/// Write the built-in sample dataset to disk.
///
/// Usage: `generate_sample [OUTPUT] [SEED]`, output format from the extension
/// (`.parquet`, `.csv`, `.json`).
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "penguins_sample.parquet".to_string()),
    );
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => DEFAULT_SEED,
    };

    let dataset = synthetic_penguins(seed);
    let written = writer::write_file(&output_path, dataset.rows())?;

    let counts = dataset
        .species_counts()
        .iter()
        .map(|(sp, n)| format!("{sp}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Wrote {written} penguins ({counts}) to {}", output_path.display());
    Ok(())
}
