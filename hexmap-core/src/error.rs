//! Error taxonomy for the tessellation pipeline
//!
//! Structural errors are fatal and raised immediately; geometric edge cases
//! local to a single segment (bridge path failures) are handled in place by
//! the snappers and never surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    /// Grid repair cannot converge: every cell carries a disallowed label.
    #[error("grid repair cannot converge: all {pending} remaining cells carry disallowed labels")]
    DegenerateGrid { pending: usize },

    /// Bounding box violates south < north, west < east, or is non-finite.
    #[error("invalid bounding box: south={south} north={north} west={west} east={east}")]
    InvalidBounds {
        south: f64,
        north: f64,
        west: f64,
        east: f64,
    },

    /// Non-positive or non-finite tessellation parameters.
    #[error("invalid tessellation parameters: {reason}")]
    InvalidParameters { reason: String },

    /// A polyline with fewer than 2 vertices or a ring with fewer than 3.
    #[error("empty geometry: {reason}")]
    EmptyGeometry { reason: String },

    /// Ragged rows or an empty classification grid.
    #[error("malformed classification grid: {reason}")]
    MalformedGrid { reason: String },

    /// Raster code with no corresponding land-cover class.
    #[error("unknown land-cover code: {0}")]
    UnknownLandCover(u16),

    /// Export serialization failure.
    #[error("export failed: {0}")]
    Export(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MapError::UnknownLandCover(13);
        assert_eq!(err.to_string(), "unknown land-cover code: 13");

        let err = MapError::DegenerateGrid { pending: 16 };
        assert!(err.to_string().contains("16"));
    }
}
