//! Coordinates and sampling grids

mod coordinate;
mod sample_grid;

pub use coordinate::Coordinate;
pub use sample_grid::{build_grid, AreaParams, SampleGrid, MAX_GRID_SIDE};

/// Approximate length of one degree of latitude in meters
pub const METERS_PER_DEGREE: f64 = 111_000.0;
