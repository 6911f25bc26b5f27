//! HEXMAP Core - Land-cover hex tessellation engine
//!
//! This crate converts a classified land-cover raster and vector water
//! features into a hexagonal tile map:
//! - Grid repair (majority-vote flood fill of disallowed classes)
//! - Hexagonal tessellation over a bounding disk with raster sampling
//! - Anisotropic nearest-neighbor index over tile centers
//! - River polyline snapping with adaptive sampling and gap bridging
//! - Lake polygon snapping via boundary tracing and interior fill

pub mod biome;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod pipeline;
pub mod snap;
pub mod spatial;
pub mod tessellate;

// Re-exports for convenient access
pub use biome::{Biome, ALL_BIOMES};
pub use error::MapError;
pub use export::{TileRecord, WaterKind};
pub use geometry::{GeoBounds, Lake, River, Vertex};
pub use grid::ClassificationGrid;
pub use pipeline::{build_map, HexMap, SnapResult};
pub use snap::lines::snap_rivers;
pub use snap::polygons::snap_lakes;
pub use spatial::{Envelope, SpatialIndex};
pub use tessellate::{resolution_for_tile_size, MapRequest, TileSet};

// The tile key type comes straight from the indexing scheme
pub use h3o::{CellIndex, Resolution};
