//! Hexagonal tessellation of a classified raster
//!
//! Builds the disk of H3 cells covering the requested area and assigns each
//! tile the class sampled at its center's grid projection.

use h3o::{CellIndex, LatLng, Resolution};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biome::Biome;
use crate::error::MapError;
use crate::grid::ClassificationGrid;

/// Tessellation request: center point, covered area, desired tile size
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRequest {
    pub center_lat: f64,
    pub center_lon: f64,
    pub width_m: f64,
    pub height_m: f64,
    pub tile_size_m: f64,
}

impl MapRequest {
    pub fn validate(&self) -> Result<(), MapError> {
        if !self.center_lat.is_finite() || !self.center_lon.is_finite() {
            return Err(MapError::InvalidParameters {
                reason: format!(
                    "non-finite center ({}, {})",
                    self.center_lat, self.center_lon
                ),
            });
        }
        if !(self.width_m.is_finite() && self.width_m > 0.0)
            || !(self.height_m.is_finite() && self.height_m > 0.0)
        {
            return Err(MapError::InvalidParameters {
                reason: format!("non-positive area {}x{} m", self.width_m, self.height_m),
            });
        }
        if !(self.tile_size_m.is_finite() && self.tile_size_m > 0.0) {
            return Err(MapError::InvalidParameters {
                reason: format!("non-positive tile size {} m", self.tile_size_m),
            });
        }
        Ok(())
    }

    /// Anisotropic correction factor: meters-per-degree-longitude relative to
    /// meters-per-degree-latitude at the map center. Derived once per run.
    pub fn lat_correction(&self) -> f64 {
        self.center_lat.to_radians().cos()
    }
}

/// H3 resolution for a desired tile size in meters.
///
/// Fixed breakpoint table: callers get one of a small number of supported
/// granularities, not continuous control.
pub fn resolution_for_tile_size(tile_size_m: f64) -> Result<Resolution, MapError> {
    if !(tile_size_m.is_finite() && tile_size_m > 0.0) {
        return Err(MapError::InvalidParameters {
            reason: format!("non-positive tile size {} m", tile_size_m),
        });
    }
    Ok(if tile_size_m >= 50.0 {
        Resolution::Ten
    } else if tile_size_m >= 20.0 {
        Resolution::Eleven
    } else if tile_size_m >= 7.0 {
        Resolution::Twelve
    } else if tile_size_m >= 2.0 {
        Resolution::Thirteen
    } else {
        Resolution::Fourteen
    })
}

/// Disk radius in rings covering the requested area.
///
/// The 1.5 edge factor plus the final +1 guarantee the rectangle is fully
/// inside the circular disk, at the cost of some overshoot.
pub fn ring_count(width_m: f64, height_m: f64, resolution: Resolution) -> u32 {
    let radius_m = width_m.max(height_m) / 2.0;
    (radius_m / (resolution.edge_length_m() * 1.5)).ceil() as u32 + 1
}

/// Disk of hex tiles, each carrying exactly one land-cover class
#[derive(Clone, Debug)]
pub struct TileSet {
    tiles: FxHashMap<CellIndex, Biome>,
    resolution: Resolution,
}

impl TileSet {
    /// Tessellate the grid's area into a hex disk around the request center.
    ///
    /// Tiles whose centers fall outside the grid's bounding box clamp to the
    /// nearest edge cell; every enumerated tile gets exactly one class.
    pub fn tessellate(
        grid: &ClassificationGrid,
        request: &MapRequest,
    ) -> Result<TileSet, MapError> {
        request.validate()?;
        let resolution = resolution_for_tile_size(request.tile_size_m)?;
        let rings = ring_count(request.width_m, request.height_m, resolution);

        let center = LatLng::new(request.center_lat, request.center_lon)
            .map_err(|e| MapError::InvalidParameters {
                reason: format!("invalid center coordinate: {e}"),
            })?
            .to_cell(resolution);

        let cells: Vec<CellIndex> = center.grid_disk(rings);
        let mut tiles = FxHashMap::default();
        for cell in cells {
            let ll = LatLng::from(cell);
            tiles.insert(cell, grid.sample(ll.lat(), ll.lng()));
        }

        info!(
            resolution = u8::from(resolution),
            rings,
            tiles = tiles.len(),
            "tessellated hex disk"
        );

        Ok(TileSet { tiles, resolution })
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Average hexagon edge length at this set's resolution, meters
    pub fn edge_length_m(&self) -> f64 {
        self.resolution.edge_length_m()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, cell: CellIndex) -> bool {
        self.tiles.contains_key(&cell)
    }

    pub fn biome(&self, cell: CellIndex) -> Option<Biome> {
        self.tiles.get(&cell).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, Biome)> + '_ {
        self.tiles.iter().map(|(&cell, &biome)| (cell, biome))
    }

    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.tiles.keys().copied()
    }
}
