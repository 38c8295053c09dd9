//! # avarisk algorithms
//!
//! Terrain derivatives and avalanche risk for sample grids.
//!
//! ## Modules
//!
//! - **terrain**: slope and aspect by central differences on a geographic grid
//! - **risk**: risk model, level classification, raster assembly and the
//!   end-to-end [`risk::assess_area`] pipeline
//!
//! Row-level work runs on rayon when the `parallel` feature (on by default)
//! is enabled.

mod maybe_rayon;

pub mod risk;
pub mod terrain;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::risk::{
        assemble, assess_area, classify, AreaAssessment, AssessmentRequest, GroupReduction,
        ReductionPreset, RiskInputs, RiskLevel, RiskModel, RiskRaster,
    };
    pub use crate::terrain::{slope_aspect, SlopeAspect, SlopeAspectCell, SlopeAspectParams, SlopeAspectRaster};
    pub use avarisk_core::prelude::*;
}
