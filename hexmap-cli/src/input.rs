//! Input file formats for the generate command
//!
//! These files are the materialized stand-ins for the upstream fetchers: a
//! grid file with raw raster codes and bounding box, plus river/lake
//! geometry files shaped like the features the vector services return.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use hexmap_core::{ClassificationGrid, GeoBounds, Lake, River, Vertex};

#[derive(Deserialize)]
struct GridFile {
    bounds: BoundsFile,
    codes: Vec<Vec<u16>>,
}

#[derive(Deserialize)]
struct BoundsFile {
    south: f64,
    north: f64,
    west: f64,
    east: f64,
}

/// Line feature: `{"coordinates": [[lon, lat], ...]}`
#[derive(Deserialize)]
struct LineFeature {
    coordinates: Vec<[f64; 2]>,
}

/// Polygon feature: `{"coordinates": [exterior, hole, ...]}` with each ring
/// a list of [lon, lat] pairs
#[derive(Deserialize)]
struct PolygonFeature {
    coordinates: Vec<Vec<[f64; 2]>>,
}

fn vertices(coords: &[[f64; 2]]) -> Vec<Vertex> {
    coords.iter().map(|&[lon, lat]| Vertex::new(lon, lat)).collect()
}

pub fn load_grid(path: &Path) -> Result<ClassificationGrid> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading grid file {}", path.display()))?;
    let file: GridFile = serde_json::from_str(&content)
        .with_context(|| format!("parsing grid file {}", path.display()))?;
    let bounds = GeoBounds::new(
        file.bounds.south,
        file.bounds.north,
        file.bounds.west,
        file.bounds.east,
    )?;
    let grid = ClassificationGrid::from_codes(&file.codes, bounds)?;
    Ok(grid)
}

pub fn load_rivers(path: &Path) -> Result<Vec<River>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading rivers file {}", path.display()))?;
    let features: Vec<LineFeature> = serde_json::from_str(&content)
        .with_context(|| format!("parsing rivers file {}", path.display()))?;
    features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            River::new(vertices(&f.coordinates))
                .with_context(|| format!("river feature {} in {}", i, path.display()))
        })
        .collect()
}

pub fn load_lakes(path: &Path) -> Result<Vec<Lake>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading lakes file {}", path.display()))?;
    let features: Vec<PolygonFeature> = serde_json::from_str(&content)
        .with_context(|| format!("parsing lakes file {}", path.display()))?;
    features
        .iter()
        .enumerate()
        .map(|(i, f)| {
            let mut rings = f.coordinates.iter().map(|r| vertices(r));
            let exterior = rings
                .next()
                .with_context(|| format!("lake feature {} has no rings", i))?;
            let holes: Vec<_> = rings.collect();
            Lake::new(exterior, holes)
                .with_context(|| format!("lake feature {} in {}", i, path.display()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_feature() {
        let json = r#"[{"coordinates": [[21.0, 48.0], [21.1, 48.1]]}]"#;
        let features: Vec<LineFeature> = serde_json::from_str(json).unwrap();
        assert_eq!(features.len(), 1);
        let verts = vertices(&features[0].coordinates);
        assert_eq!(verts[0], Vertex::new(21.0, 48.0));
        assert_eq!(verts[1].lat, 48.1);
    }

    #[test]
    fn test_parse_polygon_feature() {
        let json = r#"[{"coordinates": [
            [[21.0, 48.0], [21.2, 48.0], [21.2, 48.2], [21.0, 48.2]],
            [[21.05, 48.05], [21.15, 48.05], [21.15, 48.15]]
        ]}]"#;
        let features: Vec<PolygonFeature> = serde_json::from_str(json).unwrap();
        assert_eq!(features[0].coordinates.len(), 2);
        let lake = Lake::new(
            vertices(&features[0].coordinates[0]),
            features[0].coordinates[1..]
                .iter()
                .map(|r| vertices(r))
                .collect(),
        )
        .unwrap();
        assert_eq!(lake.holes().len(), 1);
    }

    #[test]
    fn test_parse_grid_file() {
        let json = r#"{
            "bounds": {"south": 48.0, "north": 48.1, "west": 21.0, "east": 21.1},
            "codes": [[10, 30], [90, 100]]
        }"#;
        let file: GridFile = serde_json::from_str(json).unwrap();
        let bounds = GeoBounds::new(
            file.bounds.south,
            file.bounds.north,
            file.bounds.west,
            file.bounds.east,
        )
        .unwrap();
        let grid = ClassificationGrid::from_codes(&file.codes, bounds).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
    }
}
