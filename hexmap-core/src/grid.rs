//! Classification raster and majority-vote grid repair

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::biome::Biome;
use crate::error::MapError;
use crate::geometry::GeoBounds;

/// Row-major raster of land-cover classes with its geographic bounding box
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationGrid {
    cells: Vec<Biome>,
    width: usize,
    height: usize,
    bounds: GeoBounds,
}

impl ClassificationGrid {
    /// Build a grid from rows of classes. All rows must have equal length.
    pub fn new(rows: Vec<Vec<Biome>>, bounds: GeoBounds) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(MapError::MalformedGrid {
                reason: "grid has no cells".to_string(),
            });
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MapError::MalformedGrid {
                    reason: format!("row {} has {} cells, expected {}", i, row.len(), width),
                });
            }
        }
        let cells = rows.into_iter().flatten().collect();
        Ok(Self {
            cells,
            width,
            height,
            bounds,
        })
    }

    /// Build a grid from raw raster codes
    pub fn from_codes(rows: &[Vec<u16>], bounds: GeoBounds) -> Result<Self, MapError> {
        let decoded = rows
            .iter()
            .map(|row| row.iter().map(|&code| Biome::from_code(code)).collect())
            .collect::<Result<Vec<Vec<Biome>>, _>>()?;
        Self::new(decoded, bounds)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    pub fn get(&self, row: usize, col: usize) -> Biome {
        self.cells[row * self.width + col]
    }

    /// Class at the grid projection of a geographic point.
    ///
    /// Linear interpolation over the bounding box, clamped to valid indices:
    /// points outside the box take the nearest edge cell, never a miss.
    pub fn sample(&self, lat: f64, lon: f64) -> Biome {
        let row = (1.0 - (lat - self.bounds.south) / self.bounds.lat_span()) * self.height as f64;
        let col = (lon - self.bounds.west) / self.bounds.lon_span() * self.width as f64;
        let row = (row.floor() as isize).clamp(0, self.height as isize - 1) as usize;
        let col = (col.floor() as isize).clamp(0, self.width as isize - 1) as usize;
        self.get(row, col)
    }

    /// Replace every disallowed cell with the most frequent allowed label
    /// among its up-to-8 neighbors.
    ///
    /// Worklist passes in fixed (row, col) order: a cell with no allowed
    /// neighbor yet stays pending and is retried as the clean labels
    /// propagate inward. Ties pick the lowest raster code so repeated runs
    /// produce identical grids. A pass that resolves nothing while cells
    /// remain pending means the whole grid is disallowed.
    pub fn repair(&self, disallowed: &[Biome]) -> Result<ClassificationGrid, MapError> {
        let mut cells = self.cells.clone();
        let mut pending: Vec<(usize, usize)> = (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| (row, col)))
            .filter(|&(row, col)| disallowed.contains(&self.get(row, col)))
            .collect();

        let mut pass = 0usize;
        while !pending.is_empty() {
            let before = pending.len();
            let mut unresolved = Vec::new();

            for &(row, col) in &pending {
                match self.majority_neighbor(&cells, row, col, disallowed) {
                    Some(label) => cells[row * self.width + col] = label,
                    None => unresolved.push((row, col)),
                }
            }

            pass += 1;
            debug!(
                pass,
                resolved = before - unresolved.len(),
                pending = unresolved.len(),
                "grid repair pass"
            );

            if unresolved.len() == before {
                return Err(MapError::DegenerateGrid {
                    pending: unresolved.len(),
                });
            }
            pending = unresolved;
        }

        Ok(Self {
            cells,
            width: self.width,
            height: self.height,
            bounds: self.bounds,
        })
    }

    /// Most frequent allowed label among the 8 neighbors, lowest code on ties
    fn majority_neighbor(
        &self,
        cells: &[Biome],
        row: usize,
        col: usize,
        disallowed: &[Biome],
    ) -> Option<Biome> {
        let mut counts: FxHashMap<Biome, usize> = FxHashMap::default();
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let nr = row as isize + dr;
                let nc = col as isize + dc;
                if nr < 0 || nr >= self.height as isize || nc < 0 || nc >= self.width as isize {
                    continue;
                }
                let label = cells[nr as usize * self.width + nc as usize];
                if !disallowed.contains(&label) {
                    *counts.entry(label).or_insert(0) += 1;
                }
            }
        }

        let mut best: Option<(Biome, usize)> = None;
        for (label, count) in counts {
            best = match best {
                None => Some((label, count)),
                Some((b, c)) if count > c || (count == c && label.code() < b.code()) => {
                    Some((label, count))
                }
                keep => keep,
            };
        }
        best.map(|(label, _)| label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GeoBounds {
        GeoBounds::new(48.0, 49.0, 21.0, 22.0).unwrap()
    }

    fn uniform(width: usize, height: usize, biome: Biome) -> ClassificationGrid {
        ClassificationGrid::new(vec![vec![biome; width]; height], bounds()).unwrap()
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![Biome::Grassland; 3], vec![Biome::Grassland; 2]];
        assert!(matches!(
            ClassificationGrid::new(rows, bounds()),
            Err(MapError::MalformedGrid { .. })
        ));
        assert!(ClassificationGrid::new(vec![], bounds()).is_err());
    }

    #[test]
    fn test_repair_is_noop_on_clean_grid() {
        let grid = uniform(4, 4, Biome::Grassland);
        let repaired = grid.repair(&Biome::default_disallowed()).unwrap();
        assert_eq!(repaired, grid);
    }

    #[test]
    fn test_repair_corner_cell() {
        // 4x4 grid, built-up at (0,0), grassland everywhere else
        let mut rows = vec![vec![Biome::Grassland; 4]; 4];
        rows[0][0] = Biome::BuiltUp;
        let grid = ClassificationGrid::new(rows, bounds()).unwrap();
        let repaired = grid.repair(&Biome::default_disallowed()).unwrap();
        assert_eq!(repaired.get(0, 0), Biome::Grassland);
    }

    #[test]
    fn test_repair_propagates_inward() {
        // Only the left column is clean; the fill must walk right across passes.
        let rows: Vec<Vec<Biome>> = (0..4)
            .map(|_| {
                let mut row = vec![Biome::Water; 6];
                row[0] = Biome::TreeCover;
                row
            })
            .collect();
        let grid = ClassificationGrid::new(rows, bounds()).unwrap();
        let repaired = grid.repair(&Biome::default_disallowed()).unwrap();
        for row in 0..4 {
            for col in 0..6 {
                assert_eq!(repaired.get(row, col), Biome::TreeCover);
            }
        }
    }

    #[test]
    fn test_repair_majority_vote() {
        // Center cell surrounded by 5 tree cover and 3 cropland
        let rows = vec![
            vec![Biome::TreeCover, Biome::TreeCover, Biome::TreeCover],
            vec![Biome::Cropland, Biome::BuiltUp, Biome::TreeCover],
            vec![Biome::Cropland, Biome::Cropland, Biome::TreeCover],
        ];
        let grid = ClassificationGrid::new(rows, bounds()).unwrap();
        let repaired = grid.repair(&Biome::default_disallowed()).unwrap();
        assert_eq!(repaired.get(1, 1), Biome::TreeCover);
    }

    #[test]
    fn test_repair_tie_breaks_by_code() {
        // 4 tree cover (code 10) vs 4 cropland (code 40) around the center
        let rows = vec![
            vec![Biome::TreeCover, Biome::TreeCover, Biome::Cropland],
            vec![Biome::TreeCover, Biome::BuiltUp, Biome::Cropland],
            vec![Biome::TreeCover, Biome::Cropland, Biome::Cropland],
        ];
        let grid = ClassificationGrid::new(rows, bounds()).unwrap();
        let repaired = grid.repair(&Biome::default_disallowed()).unwrap();
        assert_eq!(repaired.get(1, 1), Biome::TreeCover);
    }

    #[test]
    fn test_repair_degenerate_grid() {
        let grid = uniform(4, 4, Biome::Water);
        assert!(matches!(
            grid.repair(&Biome::default_disallowed()),
            Err(MapError::DegenerateGrid { pending: 16 })
        ));
    }

    #[test]
    fn test_sample_clamps_to_grid() {
        let mut rows = vec![vec![Biome::Grassland; 4]; 4];
        rows[0][3] = Biome::TreeCover; // north-east corner cell
        let grid = ClassificationGrid::new(rows, bounds()).unwrap();

        // Far outside the box to the north-east: clamps to row 0, col 3
        assert_eq!(grid.sample(50.0, 23.0), Biome::TreeCover);
        // Far south-west clamps to row 3, col 0
        assert_eq!(grid.sample(47.0, 20.0), Biome::Grassland);
    }

    #[test]
    fn test_sample_projection() {
        // Two-row grid: north row tree cover, south row water
        let rows = vec![vec![Biome::TreeCover; 2], vec![Biome::Water; 2]];
        let grid = ClassificationGrid::new(rows, bounds()).unwrap();
        assert_eq!(grid.sample(48.75, 21.5), Biome::TreeCover);
        assert_eq!(grid.sample(48.25, 21.5), Biome::Water);
    }

    #[test]
    fn test_from_codes() {
        let grid = ClassificationGrid::from_codes(&[vec![10, 30], vec![100, 90]], bounds()).unwrap();
        assert_eq!(grid.get(0, 0), Biome::TreeCover);
        assert_eq!(grid.get(1, 1), Biome::BuiltUp);
        assert!(ClassificationGrid::from_codes(&[vec![10, 13]], bounds()).is_err());
    }
}
