//! Error types for avarisk

use crate::raster::Cardinal;
use thiserror::Error;

/// Main error type for avarisk operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {name} = {value} ({reason})")]
    InvalidConfiguration {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Missing elevation for {neighbor} neighbor of cell ({row}, {col})")]
    MissingElevation {
        row: usize,
        col: usize,
        neighbor: Cardinal,
    },

    #[error("Elevation unavailable: {0}")]
    ElevationUnavailable(String),

    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(String),

    #[error("Invalid risk score {score}{}", cell_suffix(.cell))]
    InvalidScore {
        score: f64,
        cell: Option<(usize, usize)>,
    },

    #[error("Invalid parameter: {name} = {value} ({reason}){}", cell_suffix(.cell))]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
        cell: Option<(usize, usize)>,
    },

    #[error("Non-finite terrain gradient at cell ({row}, {col})")]
    NonFiniteGradient { row: usize, col: usize },

    #[error("Invalid raster dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn config(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Attach cell indices to an [`Error::InvalidScore`] or
    /// [`Error::InvalidParameter`]; other errors pass through
    pub fn at_cell(self, row: usize, col: usize) -> Self {
        match self {
            Error::InvalidScore { score, .. } => Error::InvalidScore {
                score,
                cell: Some((row, col)),
            },
            Error::InvalidParameter { name, value, reason, .. } => Error::InvalidParameter {
                name,
                value,
                reason,
                cell: Some((row, col)),
            },
            other => other,
        }
    }

    /// Shorthand for [`Error::InvalidParameter`]
    pub fn parameter(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
            cell: None,
        }
    }
}

fn cell_suffix(cell: &Option<(usize, usize)>) -> String {
    match cell {
        Some((row, col)) => format!(" at cell ({}, {})", row, col),
        None => String::new(),
    }
}

/// Result type alias for avarisk operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_score_cell_context() {
        let err = Error::InvalidScore { score: -1.0, cell: None };
        assert_eq!(err.to_string(), "Invalid risk score -1");

        let err = err.at_cell(2, 3);
        assert_eq!(err.to_string(), "Invalid risk score -1 at cell (2, 3)");
    }

    #[test]
    fn test_invalid_parameter_cell_context() {
        let err = Error::parameter("slope_deg", f64::NAN, "must be within 0-90 degrees");
        assert_eq!(err.to_string(), "Invalid parameter: slope_deg = NaN (must be within 0-90 degrees)");

        let err = err.at_cell(4, 7);
        assert!(matches!(err, Error::InvalidParameter { cell: Some((4, 7)), .. }));
        assert!(err.to_string().ends_with(" at cell (4, 7)"));
    }

    #[test]
    fn test_at_cell_leaves_other_errors() {
        let err = Error::WeatherUnavailable("timeout".into()).at_cell(1, 1);
        assert!(matches!(err, Error::WeatherUnavailable(_)));
    }

    #[test]
    fn test_missing_elevation_message() {
        let err = Error::MissingElevation {
            row: 4,
            col: 1,
            neighbor: Cardinal::West,
        };
        assert_eq!(err.to_string(), "Missing elevation for west neighbor of cell (4, 1)");
    }
}
