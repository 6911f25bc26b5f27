//! End-to-end map pipeline
//!
//! repair -> tessellate -> index -> snap rivers -> snap lakes. Pure function
//! of its inputs; the latitude correction is derived once from the request
//! center and threaded read-only into both snappers.

use h3o::CellIndex;
use rustc_hash::FxHashSet;
use tracing::info;

use crate::biome::Biome;
use crate::error::MapError;
use crate::geometry::{Lake, River};
use crate::grid::ClassificationGrid;
use crate::snap::lines::snap_rivers;
use crate::snap::polygons::snap_lakes;
use crate::spatial::SpatialIndex;
use crate::tessellate::{MapRequest, TileSet};

/// Water tiles produced by the snappers. A tile may appear in both sets;
/// lake membership takes precedence when rendered.
#[derive(Clone, Debug, Default)]
pub struct SnapResult {
    pub river_tiles: FxHashSet<CellIndex>,
    pub lake_tiles: FxHashSet<CellIndex>,
}

/// Finished hex map: classified tiles plus water flags
#[derive(Clone, Debug)]
pub struct HexMap {
    tiles: TileSet,
    water: SnapResult,
}

impl HexMap {
    pub fn new(tiles: TileSet, water: SnapResult) -> Self {
        Self { tiles, water }
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn river_count(&self) -> usize {
        self.water.river_tiles.len()
    }

    pub fn lake_count(&self) -> usize {
        self.water.lake_tiles.len()
    }

    pub fn is_river(&self, cell: CellIndex) -> bool {
        self.water.river_tiles.contains(&cell)
    }

    pub fn is_lake(&self, cell: CellIndex) -> bool {
        self.water.lake_tiles.contains(&cell)
    }

    pub fn biome(&self, cell: CellIndex) -> Option<Biome> {
        self.tiles.biome(cell)
    }
}

/// Run the full pipeline.
///
/// Structural errors (degenerate grid, bad bounds or parameters) abort the
/// run with no partial result; per-segment bridge failures inside the
/// snappers degrade locally and never surface here.
pub fn build_map(
    grid: &ClassificationGrid,
    disallowed: &[Biome],
    request: &MapRequest,
    rivers: &[River],
    lakes: &[Lake],
) -> Result<HexMap, MapError> {
    let repaired = grid.repair(disallowed)?;
    let tiles = TileSet::tessellate(&repaired, request)?;
    let index = SpatialIndex::build(&tiles);

    let lat_correction = request.lat_correction();
    let edge_m = tiles.edge_length_m();
    let river_tiles = snap_rivers(rivers, &index, edge_m, lat_correction);
    let lake_tiles = snap_lakes(lakes, &index, edge_m, lat_correction);

    info!(
        tiles = tiles.len(),
        river_tiles = river_tiles.len(),
        lake_tiles = lake_tiles.len(),
        "built hex map"
    );

    Ok(HexMap::new(
        tiles,
        SnapResult {
            river_tiles,
            lake_tiles,
        },
    ))
}
