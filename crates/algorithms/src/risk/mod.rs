//! Avalanche risk scoring, classification and raster assembly

mod assemble;
mod classify;
mod model;
mod pipeline;

pub use assemble::{assemble, LevelCounts, RiskAssembly, RiskCell, RiskRaster};
pub use classify::{classify, RiskLevel};
pub use model::{
    AspectBias, GroupReduction, PointAssessment, ReductionPreset, RiskFactors, RiskInputs, RiskModel,
};
pub use pipeline::{assess_area, AreaAssessment, AssessmentRequest};
