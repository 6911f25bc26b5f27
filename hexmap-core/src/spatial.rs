//! Anisotropic nearest-neighbor index over tile centers
//!
//! Distances are squared planar degrees with longitude scaled by the
//! latitude-correction factor. `nearest` is a linear scan: tile counts stay
//! in the low thousands for the supported area sizes, so a spatial bucket
//! structure would buy nothing here. Replace behind the same contract if
//! requirements ever change.

use h3o::{CellIndex, LatLng};

use crate::tessellate::TileSet;

/// Min/max tile-center coordinates, degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Envelope {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.lat_min <= lat && lat <= self.lat_max && self.lon_min <= lon && lon <= self.lon_max
    }

    /// True when this envelope and the given box share no area
    pub fn disjoint(&self, lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> bool {
        lat_max < self.lat_min
            || lat_min > self.lat_max
            || lon_max < self.lon_min
            || lon_min > self.lon_max
    }

    fn from_positions(positions: &[(CellIndex, f64, f64)]) -> Self {
        let mut env = Envelope {
            lat_min: f64::INFINITY,
            lat_max: f64::NEG_INFINITY,
            lon_min: f64::INFINITY,
            lon_max: f64::NEG_INFINITY,
        };
        for &(_, lat, lon) in positions {
            env.lat_min = env.lat_min.min(lat);
            env.lat_max = env.lat_max.max(lat);
            env.lon_min = env.lon_min.min(lon);
            env.lon_max = env.lon_max.max(lon);
        }
        env
    }
}

/// Precomputed tile-center positions for nearest-tile queries
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    positions: Vec<(CellIndex, f64, f64)>,
    envelope: Envelope,
}

impl SpatialIndex {
    pub fn build(tiles: &TileSet) -> Self {
        let positions: Vec<(CellIndex, f64, f64)> = tiles
            .cells()
            .map(|cell| {
                let ll = LatLng::from(cell);
                (cell, ll.lat(), ll.lng())
            })
            .collect();
        let envelope = Envelope::from_positions(&positions);
        Self {
            positions,
            envelope,
        }
    }

    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = (CellIndex, f64, f64)> + '_ {
        self.positions.iter().copied()
    }

    /// Tile whose center minimizes the anisotropic squared distance
    pub fn nearest(&self, lat: f64, lon: f64, lat_correction: f64) -> Option<CellIndex> {
        let mut best: Option<(CellIndex, f64)> = None;
        for &(cell, c_lat, c_lon) in &self.positions {
            let dlon = (c_lon - lon) * lat_correction;
            let dlat = c_lat - lat;
            let d2 = dlon * dlon + dlat * dlat;
            match best {
                Some((_, b)) if b <= d2 => {}
                _ => best = Some((cell, d2)),
            }
        }
        best.map(|(cell, _)| cell)
    }

    /// Candidate subset whose centers fall in the given box
    pub fn restrict_to(
        &self,
        lat_min: f64,
        lat_max: f64,
        lon_min: f64,
        lon_max: f64,
    ) -> SpatialIndex {
        let positions: Vec<(CellIndex, f64, f64)> = self
            .positions
            .iter()
            .filter(|&&(_, lat, lon)| {
                lat_min <= lat && lat <= lat_max && lon_min <= lon && lon <= lon_max
            })
            .copied()
            .collect();
        let envelope = Envelope::from_positions(&positions);
        Self {
            positions,
            envelope,
        }
    }
}
