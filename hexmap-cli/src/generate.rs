//! Generate command - run the tessellation pipeline end to end
//!
//! Stages run individually here (rather than through `build_map`) so each
//! one gets a progress spinner and a timing entry in the run report.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::info;

use hexmap_core::{
    snap_lakes, snap_rivers, Biome, HexMap, MapRequest, SnapResult, SpatialIndex, TileSet,
};

use crate::input;

#[derive(Args)]
pub struct GenerateArgs {
    /// Classification grid JSON file ({"bounds": {...}, "codes": [[...]]})
    #[arg(long, value_name = "FILE")]
    pub grid: PathBuf,

    /// River polylines JSON file (array of {"coordinates": [[lon, lat], ...]})
    #[arg(long, value_name = "FILE")]
    pub rivers: Option<PathBuf>,

    /// Lake polygons JSON file (array of {"coordinates": [ring, ...]})
    #[arg(long, value_name = "FILE")]
    pub lakes: Option<PathBuf>,

    /// Center latitude
    #[arg(long)]
    pub lat: f64,

    /// Center longitude
    #[arg(long)]
    pub lon: f64,

    /// Target area width in meters
    #[arg(long, default_value = "1000")]
    pub width_m: f64,

    /// Target area height in meters
    #[arg(long, default_value = "1000")]
    pub height_m: f64,

    /// Desired tile size in meters
    #[arg(long, default_value = "10")]
    pub tile_size_m: f64,

    /// Output JSON file
    #[arg(long, default_value = "hex_map.json")]
    pub output: PathBuf,

    /// Include each tile's boundary polygon in the output
    #[arg(long)]
    pub include_boundary: bool,

    /// Write a <output>.report.json with counts and stage timings
    #[arg(long)]
    pub report: bool,

    /// Extra land-cover codes to repair away (besides built-up and water)
    #[arg(long, value_name = "CODE")]
    pub fill: Vec<u16>,
}

#[derive(Serialize)]
struct RunReport {
    generated_at: DateTime<Utc>,
    center: [f64; 2],
    tile_size_m: f64,
    tiles: usize,
    river_tiles: usize,
    lake_tiles: usize,
    timings_s: Timings,
}

#[derive(Serialize)]
struct Timings {
    load: f64,
    repair: f64,
    tessellate: f64,
    snap_rivers: f64,
    snap_lakes: f64,
    export: f64,
    total: f64,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let request = MapRequest {
        center_lat: args.lat,
        center_lon: args.lon,
        width_m: args.width_m,
        height_m: args.height_m,
        tile_size_m: args.tile_size_m,
    };

    let mut disallowed = Biome::default_disallowed().to_vec();
    for &code in &args.fill {
        let biome = Biome::from_code(code).context("bad --fill code")?;
        if !disallowed.contains(&biome) {
            disallowed.push(biome);
        }
    }

    let t_start = Instant::now();

    // Load inputs
    let t = Instant::now();
    let grid = input::load_grid(&args.grid)?;
    let rivers = match &args.rivers {
        Some(path) => input::load_rivers(path)?,
        None => Vec::new(),
    };
    let lakes = match &args.lakes {
        Some(path) => input::load_lakes(path)?,
        None => Vec::new(),
    };
    let load_s = t.elapsed().as_secs_f64();
    info!(
        grid = %args.grid.display(),
        rivers = rivers.len(),
        lakes = lakes.len(),
        "loaded inputs"
    );

    // Repair + tessellate
    let t = Instant::now();
    let repaired = grid.repair(&disallowed)?;
    let repair_s = t.elapsed().as_secs_f64();

    let t = Instant::now();
    let tiles = TileSet::tessellate(&repaired, &request)?;
    let index = SpatialIndex::build(&tiles);
    let tessellate_s = t.elapsed().as_secs_f64();

    let lat_correction = request.lat_correction();
    let edge_m = tiles.edge_length_m();

    // Snap water features
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("snapping {} rivers", rivers.len()));
    let t = Instant::now();
    let river_tiles = snap_rivers(&rivers, &index, edge_m, lat_correction);
    let snap_rivers_s = t.elapsed().as_secs_f64();
    pb.finish_with_message(format!("rivers: {} tiles", river_tiles.len()));

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("snapping {} lakes", lakes.len()));
    let t = Instant::now();
    let lake_tiles = snap_lakes(&lakes, &index, edge_m, lat_correction);
    let snap_lakes_s = t.elapsed().as_secs_f64();
    pb.finish_with_message(format!("lakes: {} tiles", lake_tiles.len()));

    let map = HexMap::new(
        tiles,
        SnapResult {
            river_tiles,
            lake_tiles,
        },
    );

    // Export
    let t = Instant::now();
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    map.write_json(BufWriter::new(file), args.include_boundary)?;
    let export_s = t.elapsed().as_secs_f64();

    let total_s = t_start.elapsed().as_secs_f64();

    println!(
        "Wrote {} tiles ({} river, {} lake) to {}",
        map.tile_count(),
        map.river_count(),
        map.lake_count(),
        args.output.display()
    );

    if args.report {
        let report = RunReport {
            generated_at: Utc::now(),
            center: [args.lat, args.lon],
            tile_size_m: args.tile_size_m,
            tiles: map.tile_count(),
            river_tiles: map.river_count(),
            lake_tiles: map.lake_count(),
            timings_s: Timings {
                load: load_s,
                repair: repair_s,
                tessellate: tessellate_s,
                snap_rivers: snap_rivers_s,
                snap_lakes: snap_lakes_s,
                export: export_s,
                total: total_s,
            },
        };
        let report_path = args.output.with_extension("report.json");
        let file = File::create(&report_path)
            .with_context(|| format!("creating {}", report_path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        println!("Report: {}", report_path.display());
    }

    Ok(())
}
