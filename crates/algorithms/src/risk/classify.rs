//! Risk score classification

use avarisk_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal avalanche risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    Considerable,
    High,
}

impl RiskLevel {
    /// All levels, lowest first
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::Considerable,
        RiskLevel::High,
    ];

    /// Numeric code for color mapping: Low = 1 ... High = 4
    pub fn code(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Moderate => 2,
            RiskLevel::Considerable => 3,
            RiskLevel::High => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Considerable => "Considerable",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds (inclusive) of Moderate, Considerable and High
const CLASS_BREAKS: [(f64, RiskLevel); 3] = [
    (3.5, RiskLevel::High),
    (2.5, RiskLevel::Considerable),
    (1.5, RiskLevel::Moderate),
];

/// Classify a risk score on half-open intervals:
///
/// | score         | level        |
/// |---------------|--------------|
/// | `< 1.5`       | Low          |
/// | `[1.5, 2.5)`  | Moderate     |
/// | `[2.5, 3.5)`  | Considerable |
/// | `>= 3.5`      | High         |
///
/// # Errors
/// [`Error::InvalidScore`] for NaN or negative scores. The risk model never
/// produces these, so this indicates a bug upstream.
pub fn classify(score: f64) -> Result<RiskLevel> {
    if score.is_nan() || score < 0.0 {
        return Err(Error::InvalidScore { score, cell: None });
    }

    Ok(CLASS_BREAKS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map_or(RiskLevel::Low, |&(_, level)| level))
}
