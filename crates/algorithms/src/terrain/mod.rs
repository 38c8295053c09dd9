//! Terrain derivatives
//!
//! Slope angle and compass aspect for each interior cell of an elevation
//! grid sampled on latitude/longitude.

mod slope_aspect;

pub use slope_aspect::{
    cell_derivatives, slope_aspect, SlopeAspect, SlopeAspectCell, SlopeAspectParams, SlopeAspectRaster,
};
