//! # avarisk core
//!
//! Core types, grid construction and collaborator contracts for avalanche
//! risk mapping.
//!
//! This crate provides:
//! - `Coordinate` and `SampleGrid`: the square lattice of points to assess
//! - `Raster<T>`: a grid-aligned 2D array with an explicit undefined sentinel
//! - `ElevationProvider` / `WeatherProvider`: contracts for external data
//! - Algorithm traits for consistent API

pub mod error;
pub mod geo;
pub mod provider;
pub mod raster;

pub use error::{Error, Result};
pub use geo::{build_grid, AreaParams, Coordinate, SampleGrid};
pub use provider::{ElevationProvider, WeatherProvider, WeatherReading};
pub use raster::{Cardinal, CardinalNeighbors, Raster};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geo::{build_grid, AreaParams, Coordinate, SampleGrid};
    pub use crate::provider::{ElevationProvider, WeatherProvider, WeatherReading};
    pub use crate::raster::{Cardinal, CardinalNeighbors, Raster};
    pub use crate::Algorithm;
}

/// Core trait for raster algorithms.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
