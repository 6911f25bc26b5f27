//! Geographic bounds and water-feature geometries
//!
//! Vertices are stored longitude-first because that is the order the vector
//! sources deliver them in. Validation happens at construction: a `River` or
//! `Lake` that exists is structurally sound, so the snappers never re-check.

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Geographic bounding box in WGS84 degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn new(south: f64, north: f64, west: f64, east: f64) -> Result<Self, MapError> {
        let finite =
            south.is_finite() && north.is_finite() && west.is_finite() && east.is_finite();
        if !finite || south >= north || west >= east {
            return Err(MapError::InvalidBounds {
                south,
                north,
                west,
                east,
            });
        }
        Ok(Self {
            south,
            north,
            west,
            east,
        })
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }
}

/// A geometry vertex in WGS84 degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub lon: f64,
    pub lat: f64,
}

impl Vertex {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

/// River polyline; ordered vertices, possibly extending outside the map area
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct River {
    vertices: Vec<Vertex>,
}

impl River {
    /// A polyline needs at least two vertices.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self, MapError> {
        if vertices.len() < 2 {
            return Err(MapError::EmptyGeometry {
                reason: format!("river polyline with {} vertices", vertices.len()),
            });
        }
        Ok(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }
}

/// Lake polygon: one exterior ring plus zero or more hole rings.
///
/// Rings are ordered and implicitly closed; the first vertex is not required
/// to repeat as the last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lake {
    exterior: Vec<Vertex>,
    holes: Vec<Vec<Vertex>>,
}

impl Lake {
    /// Every ring needs at least three vertices.
    pub fn new(exterior: Vec<Vertex>, holes: Vec<Vec<Vertex>>) -> Result<Self, MapError> {
        if exterior.len() < 3 {
            return Err(MapError::EmptyGeometry {
                reason: format!("lake exterior ring with {} vertices", exterior.len()),
            });
        }
        for (i, hole) in holes.iter().enumerate() {
            if hole.len() < 3 {
                return Err(MapError::EmptyGeometry {
                    reason: format!("lake hole ring {} with {} vertices", i, hole.len()),
                });
            }
        }
        Ok(Self { exterior, holes })
    }

    pub fn exterior(&self) -> &[Vertex] {
        &self.exterior
    }

    pub fn holes(&self) -> &[Vec<Vertex>] {
        &self.holes
    }

    /// Vertex bounding box of the exterior ring: (lat_min, lat_max, lon_min, lon_max)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut lat_min = f64::INFINITY;
        let mut lat_max = f64::NEG_INFINITY;
        let mut lon_min = f64::INFINITY;
        let mut lon_max = f64::NEG_INFINITY;
        for v in &self.exterior {
            lat_min = lat_min.min(v.lat);
            lat_max = lat_max.max(v.lat);
            lon_min = lon_min.min(v.lon);
            lon_max = lon_max.max(v.lon);
        }
        (lat_min, lat_max, lon_min, lon_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_validation() {
        assert!(GeoBounds::new(48.0, 49.0, 21.0, 22.0).is_ok());
        assert!(GeoBounds::new(49.0, 48.0, 21.0, 22.0).is_err());
        assert!(GeoBounds::new(48.0, 48.0, 21.0, 22.0).is_err());
        assert!(GeoBounds::new(48.0, 49.0, 22.0, 21.0).is_err());
        assert!(GeoBounds::new(f64::NAN, 49.0, 21.0, 22.0).is_err());
    }

    #[test]
    fn test_river_needs_two_vertices() {
        assert!(River::new(vec![Vertex::new(21.0, 48.0)]).is_err());
        assert!(River::new(vec![Vertex::new(21.0, 48.0), Vertex::new(21.1, 48.1)]).is_ok());
    }

    #[test]
    fn test_lake_ring_sizes() {
        let tri = vec![
            Vertex::new(21.0, 48.0),
            Vertex::new(21.1, 48.0),
            Vertex::new(21.05, 48.1),
        ];
        assert!(Lake::new(tri.clone(), vec![]).is_ok());
        assert!(Lake::new(tri[..2].to_vec(), vec![]).is_err());
        assert!(Lake::new(tri.clone(), vec![tri[..2].to_vec()]).is_err());
    }

    #[test]
    fn test_lake_bounds() {
        let lake = Lake::new(
            vec![
                Vertex::new(21.0, 48.0),
                Vertex::new(21.2, 48.0),
                Vertex::new(21.2, 48.1),
                Vertex::new(21.0, 48.1),
            ],
            vec![],
        )
        .unwrap();
        assert_eq!(lake.bounds(), (48.0, 48.1, 21.0, 21.2));
    }
}
