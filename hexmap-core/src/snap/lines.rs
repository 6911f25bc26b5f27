//! River polyline snapping

use h3o::CellIndex;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::geometry::River;
use crate::snap::SegmentTracer;
use crate::spatial::SpatialIndex;

/// Snap river polylines onto tiles.
///
/// Segments with both endpoints outside the tile set's envelope are skipped
/// outright; everything else is sampled adaptively and bridged per
/// [`crate::snap`]. Vertex traversal order is the geometry's stored order.
pub fn snap_rivers(
    rivers: &[River],
    index: &SpatialIndex,
    edge_m: f64,
    lat_correction: f64,
) -> FxHashSet<CellIndex> {
    let env = index.envelope();
    let mut out = FxHashSet::default();
    let mut tracer = SegmentTracer::bounded(index, edge_m, lat_correction);

    for river in rivers {
        for pair in river.vertices().windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let a_in = env.contains(a.lat, a.lon);
            let b_in = env.contains(b.lat, b.lon);
            if !a_in && !b_in {
                continue;
            }
            tracer.trace_segment(a, b, true, &mut out);
        }
    }

    debug!(rivers = rivers.len(), tiles = out.len(), "snapped rivers");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;
    use crate::snap::tests::test_tiles;
    use h3o::LatLng;

    const CENTER_LAT: f64 = 48.6974;
    const CENTER_LON: f64 = 21.2818;

    fn correction() -> f64 {
        CENTER_LAT.to_radians().cos()
    }

    #[test]
    fn test_river_outside_envelope_snaps_nothing() {
        let tiles = test_tiles(200.0, 200.0);
        let index = SpatialIndex::build(&tiles);
        let river = River::new(vec![
            Vertex::new(CENTER_LON, CENTER_LAT + 1.0),
            Vertex::new(CENTER_LON + 0.5, CENTER_LAT + 1.0),
        ])
        .unwrap();
        let out = snap_rivers(&[river], &index, tiles.edge_length_m(), correction());
        assert!(out.is_empty());
    }

    #[test]
    fn test_same_tile_segment_is_singleton() {
        let tiles = test_tiles(200.0, 200.0);
        let index = SpatialIndex::build(&tiles);
        let home = LatLng::new(CENTER_LAT, CENTER_LON)
            .unwrap()
            .to_cell(tiles.resolution());
        let center = LatLng::from(home);

        // Two vertices a hair apart, both mapping to the center tile
        let river = River::new(vec![
            Vertex::new(center.lng() - 1e-6, center.lat()),
            Vertex::new(center.lng() + 1e-6, center.lat()),
        ])
        .unwrap();
        let out = snap_rivers(&[river], &index, tiles.edge_length_m(), correction());
        assert_eq!(out.len(), 1);
        assert!(out.contains(&home));
    }

    #[test]
    fn test_crossing_river_forms_connected_chain() {
        let tiles = test_tiles(300.0, 300.0);
        let index = SpatialIndex::build(&tiles);
        let env = index.envelope();

        // Straight west-east river through the middle of the disk
        let river = River::new(vec![
            Vertex::new(env.lon_min, CENTER_LAT),
            Vertex::new(env.lon_max, CENTER_LAT),
        ])
        .unwrap();
        let out = snap_rivers(&[river], &index, tiles.edge_length_m(), correction());
        assert!(out.len() > 5);

        // Every snapped tile has a snapped hex neighbor: no isolated gaps
        for &cell in &out {
            if out.len() == 1 {
                break;
            }
            let connected = out.iter().any(|&other| {
                other != cell && cell.grid_distance(other).map_or(false, |d| d == 1)
            });
            assert!(connected, "tile {cell} has no snapped neighbor");
        }
    }

    #[test]
    fn test_partial_river_snaps_inside_portion() {
        let tiles = test_tiles(200.0, 200.0);
        let index = SpatialIndex::build(&tiles);
        let env = index.envelope();

        // Starts far outside, ends at the center: only the covered part lands
        let river = River::new(vec![
            Vertex::new(CENTER_LON, CENTER_LAT + 1.0),
            Vertex::new(CENTER_LON, CENTER_LAT),
        ])
        .unwrap();
        let out = snap_rivers(&[river], &index, tiles.edge_length_m(), correction());
        assert!(!out.is_empty());
        for &cell in &out {
            let ll = LatLng::from(cell);
            assert!(env.contains(ll.lat(), ll.lng()));
        }
    }
}
