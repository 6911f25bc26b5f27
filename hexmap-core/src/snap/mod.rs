//! Snapping vector water features onto the hex tile set
//!
//! Both snappers walk interpolated samples along their geometry, resolve each
//! sample to the nearest tile, and bridge small hex-grid gaps between
//! consecutive snaps so a line never breaks into disconnected runs. Gaps
//! wider than `MAX_BRIDGE_DISTANCE` are genuine (the geometry left the
//! covered area) and stay unbridged.

pub mod lines;
pub mod polygons;

use h3o::CellIndex;
use rustc_hash::FxHashSet;

use crate::geometry::Vertex;
use crate::spatial::{Envelope, SpatialIndex};

/// Meters per degree of latitude (and of longitude at the equator)
pub(crate) const METERS_PER_DEGREE: f64 = 111_320.0;

/// Longest hex-grid gap that still gets bridged between consecutive samples
pub(crate) const MAX_BRIDGE_DISTANCE: i32 = 3;

/// Sample spacing as a fraction of the average hexagon edge length
pub(crate) const SAMPLE_EDGE_FACTOR: f64 = 0.3;

/// Floor on samples per segment, so short segments still land several hits
pub(crate) const MIN_SEGMENT_SAMPLES: usize = 10;

/// Approximate ground length of a segment in meters
pub(crate) fn segment_length_m(a: Vertex, b: Vertex, lat_correction: f64) -> f64 {
    let dx = (b.lon - a.lon) * METERS_PER_DEGREE * lat_correction;
    let dy = (b.lat - a.lat) * METERS_PER_DEGREE;
    (dx * dx + dy * dy).sqrt()
}

/// Samples per segment: denser than the tile size, so no tile-sized gap can
/// be skipped by a single sample jump
pub(crate) fn sample_count(length_m: f64, edge_m: f64) -> usize {
    MIN_SEGMENT_SAMPLES.max((length_m / (edge_m * SAMPLE_EDGE_FACTOR)) as usize)
}

/// Add every tile on the shortest hex-grid path between two snapped tiles.
///
/// Cells too far apart, or any grid distance/path failure (cells from
/// different hierarchical levels), mean no bridge; never an error.
pub(crate) fn bridge(from: CellIndex, to: CellIndex, out: &mut FxHashSet<CellIndex>) {
    match from.grid_distance(to) {
        Ok(dist) if dist <= MAX_BRIDGE_DISTANCE => {
            if let Ok(path) = from.grid_path_cells(to) {
                if let Ok(cells) = path.collect::<Result<Vec<_>, _>>() {
                    out.extend(cells);
                }
            }
        }
        _ => {}
    }
}

/// Walks one segment at a time, snapping samples and bridging between them.
///
/// The previous-tile tracker starts fresh on every segment and is cleared
/// whenever a sample leaves the bounds envelope, so no bridge spans an
/// excluded region.
pub(crate) struct SegmentTracer<'a> {
    index: &'a SpatialIndex,
    bounds: Option<Envelope>,
    edge_m: f64,
    lat_correction: f64,
    prev: Option<CellIndex>,
}

impl<'a> SegmentTracer<'a> {
    /// Tracer that skips samples outside the index envelope (river snapping)
    pub(crate) fn bounded(index: &'a SpatialIndex, edge_m: f64, lat_correction: f64) -> Self {
        Self {
            index,
            bounds: Some(index.envelope()),
            edge_m,
            lat_correction,
            prev: None,
        }
    }

    /// Tracer that snaps every sample to the candidate set (ring tracing)
    pub(crate) fn unbounded(index: &'a SpatialIndex, edge_m: f64, lat_correction: f64) -> Self {
        Self {
            index,
            bounds: None,
            edge_m,
            lat_correction,
            prev: None,
        }
    }

    /// Sample the segment from `a` to `b`. Touched tiles and bridge paths go
    /// into `out` when `record` is set; hole rings trace with `record` off.
    pub(crate) fn trace_segment(
        &mut self,
        a: Vertex,
        b: Vertex,
        record: bool,
        out: &mut FxHashSet<CellIndex>,
    ) {
        self.prev = None;
        let length_m = segment_length_m(a, b, self.lat_correction);
        let samples = sample_count(length_m, self.edge_m);

        for j in 0..=samples {
            let t = j as f64 / samples as f64;
            let lon = a.lon + t * (b.lon - a.lon);
            let lat = a.lat + t * (b.lat - a.lat);

            if let Some(env) = &self.bounds {
                if !env.contains(lat, lon) {
                    self.prev = None;
                    continue;
                }
            }

            let Some(cell) = self.index.nearest(lat, lon, self.lat_correction) else {
                self.prev = None;
                continue;
            };

            if record {
                out.insert(cell);
                if let Some(prev) = self.prev {
                    if prev != cell {
                        bridge(prev, cell, out);
                    }
                }
            }
            self.prev = Some(cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::geometry::GeoBounds;
    use crate::grid::ClassificationGrid;
    use crate::tessellate::{MapRequest, TileSet};

    const CENTER_LAT: f64 = 48.6974;
    const CENTER_LON: f64 = 21.2818;

    pub(crate) fn test_tiles(width_m: f64, height_m: f64) -> TileSet {
        let bounds = GeoBounds::new(
            CENTER_LAT - 0.05,
            CENTER_LAT + 0.05,
            CENTER_LON - 0.05,
            CENTER_LON + 0.05,
        )
        .unwrap();
        let grid = ClassificationGrid::new(vec![vec![Biome::Grassland; 4]; 4], bounds).unwrap();
        let request = MapRequest {
            center_lat: CENTER_LAT,
            center_lon: CENTER_LON,
            width_m,
            height_m,
            tile_size_m: 10.0,
        };
        TileSet::tessellate(&grid, &request).unwrap()
    }

    #[test]
    fn test_segment_length() {
        // One degree of latitude is ~111.32 km regardless of correction
        let a = Vertex::new(21.0, 48.0);
        let b = Vertex::new(21.0, 49.0);
        let len = segment_length_m(a, b, 0.66);
        assert!((len - METERS_PER_DEGREE).abs() < 1e-6);

        // Longitude shrinks by the correction factor
        let c = Vertex::new(22.0, 48.0);
        let len = segment_length_m(a, c, 0.5);
        assert!((len - METERS_PER_DEGREE * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_sample_count_floor() {
        assert_eq!(sample_count(0.0, 10.0), MIN_SEGMENT_SAMPLES);
        assert_eq!(sample_count(1.0, 10.0), MIN_SEGMENT_SAMPLES);
        // 300m at 10m edges: 300 / 3 = 100 samples
        assert_eq!(sample_count(300.0, 10.0), 100);
    }

    #[test]
    fn test_bridge_fills_small_gap() {
        let tiles = test_tiles(200.0, 200.0);
        let index = SpatialIndex::build(&tiles);
        let center = index
            .nearest(CENTER_LAT, CENTER_LON, CENTER_LAT.to_radians().cos())
            .unwrap();

        // Pick a tile exactly 3 steps out, bridge, and expect a connected path
        let far = tiles
            .cells()
            .find(|&c| center.grid_distance(c).map_or(false, |d| d == 3))
            .unwrap();
        let mut out = FxHashSet::default();
        bridge(center, far, &mut out);
        assert!(out.contains(&center));
        assert!(out.contains(&far));
        assert_eq!(out.len(), 4); // path of grid distance 3 has 4 cells
    }

    #[test]
    fn test_bridge_refuses_long_gap() {
        let tiles = test_tiles(500.0, 500.0);
        let index = SpatialIndex::build(&tiles);
        let center = index
            .nearest(CENTER_LAT, CENTER_LON, CENTER_LAT.to_radians().cos())
            .unwrap();
        let far = tiles
            .cells()
            .find(|&c| {
                center
                    .grid_distance(c)
                    .map_or(false, |d| d == MAX_BRIDGE_DISTANCE + 1)
            })
            .unwrap();
        let mut out = FxHashSet::default();
        bridge(center, far, &mut out);
        assert!(out.is_empty());
    }
}
