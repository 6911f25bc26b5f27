//! Inspect command - summarize an exported map file

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexmap_core::{Biome, TileRecord};

#[derive(Args)]
pub struct InspectArgs {
    /// Exported map JSON file
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let records: Vec<TileRecord> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let mut biomes: BTreeMap<Biome, usize> = BTreeMap::new();
    let mut rivers = 0usize;
    let mut lakes = 0usize;
    let mut both = 0usize;
    for record in &records {
        *biomes.entry(record.biome).or_insert(0) += 1;
        if record.is_river {
            rivers += 1;
        }
        if record.is_lake {
            lakes += 1;
        }
        if record.is_river && record.is_lake {
            both += 1;
        }
    }

    println!("{}: {} tiles", args.input.display(), records.len());
    println!("  river: {rivers}  lake: {lakes}  both: {both}");
    for (biome, count) in &biomes {
        println!("  {:24} {}", biome.display_name(), count);
    }

    Ok(())
}
