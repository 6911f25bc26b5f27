//! Lake polygon snapping
//!
//! Exterior rings are traced like river segments; interiors are filled by an
//! even-odd ray cast over the candidate tiles. Hole rings are traced for
//! sampling but never recorded, and tiles inside a hole are excluded from the
//! fill.

use h3o::CellIndex;
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::geometry::{Lake, Vertex};
use crate::snap::SegmentTracer;
use crate::spatial::SpatialIndex;

/// Snap lake polygons onto tiles
pub fn snap_lakes(
    lakes: &[Lake],
    index: &SpatialIndex,
    edge_m: f64,
    lat_correction: f64,
) -> FxHashSet<CellIndex> {
    let env = index.envelope();
    let mut out = FxHashSet::default();

    for lake in lakes {
        let (lat_min, lat_max, lon_min, lon_max) = lake.bounds();
        if env.disjoint(lat_min, lat_max, lon_min, lon_max) {
            continue;
        }

        // Search-space pruning: only tiles inside the lake's bounding box
        // can be boundary or interior tiles.
        let candidates = index.restrict_to(lat_min, lat_max, lon_min, lon_max);
        if candidates.is_empty() {
            continue;
        }

        let mut tracer = SegmentTracer::unbounded(&candidates, edge_m, lat_correction);
        trace_ring(&mut tracer, lake.exterior(), true, &mut out);
        for hole in lake.holes() {
            trace_ring(&mut tracer, hole, false, &mut out);
        }

        // Interior fill: inside the exterior ring and inside no hole
        for (cell, lat, lon) in candidates.positions() {
            if out.contains(&cell) {
                continue;
            }
            if !point_in_ring(lon, lat, lake.exterior()) {
                continue;
            }
            if lake.holes().iter().any(|h| point_in_ring(lon, lat, h)) {
                continue;
            }
            out.insert(cell);
        }
    }

    debug!(lakes = lakes.len(), tiles = out.len(), "snapped lakes");
    out
}

/// Trace a closed ring edge by edge, wrapping back to the first vertex
fn trace_ring(
    tracer: &mut SegmentTracer<'_>,
    ring: &[Vertex],
    record: bool,
    out: &mut FxHashSet<CellIndex>,
) {
    let n = ring.len();
    for i in 0..n {
        tracer.trace_segment(ring[i], ring[(i + 1) % n], record, out);
    }
}

/// Even-odd ray cast: horizontal ray from the point toward increasing
/// longitude.
///
/// An edge toggles when its latitude span strictly brackets the point and the
/// intersection longitude lies at or past the point; vertical edges always
/// toggle when bracketed. Points exactly on a vertex or edge follow whatever
/// the toggles compute, consistently within a run.
pub(crate) fn point_in_ring(lon: f64, lat: f64, ring: &[Vertex]) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut p1 = ring[0];

    for i in 1..=n {
        let p2 = ring[i % n];
        let (min_lat, max_lat) = if p1.lat < p2.lat {
            (p1.lat, p2.lat)
        } else {
            (p2.lat, p1.lat)
        };
        if lat > min_lat && lat <= max_lat && lon <= p1.lon.max(p2.lon) {
            if p1.lon == p2.lon {
                inside = !inside;
            } else {
                // min < lat <= max rules out horizontal edges, so the slope
                // is well defined here
                let xinters = (lat - p1.lat) * (p2.lon - p1.lon) / (p2.lat - p1.lat) + p1.lon;
                if lon <= xinters {
                    inside = !inside;
                }
            }
        }
        p1 = p2;
    }

    inside
}
