//! Per-tile export records
//!
//! The serialization itself is a thin concern; downstream collaborators
//! (API layer, renderers) consume these records as a JSON array.

use std::io::Write;

use h3o::LatLng;
use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::error::MapError;
use crate::pipeline::HexMap;

/// Water classification for rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterKind {
    River,
    Lake,
}

/// One exported tile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    pub hex_id: String,
    pub lat: f64,
    pub lon: f64,
    pub biome: Biome,
    pub is_river: bool,
    pub is_lake: bool,
    /// Cell boundary as [lat, lon] pairs, on request only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary: Option<Vec<[f64; 2]>>,
}

impl TileRecord {
    /// Rendering hint. Lake takes precedence when a tile carries both flags.
    pub fn water_kind(&self) -> Option<WaterKind> {
        if self.is_lake {
            Some(WaterKind::Lake)
        } else if self.is_river {
            Some(WaterKind::River)
        } else {
            None
        }
    }
}

impl HexMap {
    /// Records for every tile, sorted by hex id for stable output
    pub fn records(&self, include_boundary: bool) -> Vec<TileRecord> {
        let mut records: Vec<TileRecord> = self
            .tiles()
            .iter()
            .map(|(cell, biome)| {
                let center = LatLng::from(cell);
                let boundary = include_boundary.then(|| {
                    cell.boundary()
                        .iter()
                        .map(|v| [v.lat(), v.lng()])
                        .collect()
                });
                TileRecord {
                    hex_id: cell.to_string(),
                    lat: center.lat(),
                    lon: center.lng(),
                    biome,
                    is_river: self.is_river(cell),
                    is_lake: self.is_lake(cell),
                    boundary,
                }
            })
            .collect();
        records.sort_by(|a, b| a.hex_id.cmp(&b.hex_id));
        records
    }

    /// Write the records as a pretty-printed JSON array
    pub fn write_json<W: Write>(&self, writer: W, include_boundary: bool) -> Result<(), MapError> {
        serde_json::to_writer_pretty(writer, &self.records(include_boundary))?;
        Ok(())
    }
}
