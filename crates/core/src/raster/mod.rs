//! Raster data structures and neighborhood access

mod grid;
mod neighborhood;

pub use grid::{Raster, RasterStatistics};
pub use neighborhood::{Cardinal, CardinalNeighbors};
