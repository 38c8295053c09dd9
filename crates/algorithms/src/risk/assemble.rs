//! Risk raster assembly
//!
//! Scores and classifies every interior cell of a slope/aspect raster under
//! a single weather reading. Border cells stay undefined.

use super::classify::{classify, RiskLevel};
use super::model::{RiskInputs, RiskModel};
use crate::maybe_rayon::*;
use crate::terrain::SlopeAspectRaster;
use avarisk_core::{Error, Raster, Result, SampleGrid, WeatherReading};
use ndarray::Array2;
use serde::Serialize;

/// Score and level of one interior cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskCell {
    pub score: f64,
    pub level: RiskLevel,
}

/// Per-cell risk aligned with the sample grid
#[derive(Debug, Clone, PartialEq)]
pub struct RiskRaster {
    cells: Raster<RiskCell>,
}

impl RiskRaster {
    pub fn cells(&self) -> &Raster<RiskCell> {
        &self.cells
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.shape()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Option<RiskCell>> {
        self.cells.get(row, col)
    }

    /// Risk scores; undefined where no risk was computed
    pub fn scores(&self) -> Raster<f64> {
        self.cells.map(|c| c.score)
    }

    /// Risk levels; undefined where no risk was computed
    pub fn levels(&self) -> Raster<RiskLevel> {
        self.cells.map(|c| c.level)
    }

    /// Level codes for color mapping (Low = 1 ... High = 4).
    ///
    /// Undefined cells stay undefined and must be drawn as "no data",
    /// never as Low.
    pub fn level_codes(&self) -> Raster<f64> {
        self.cells.map(|c| c.level.code() as f64)
    }

    /// Number of computed cells per level
    pub fn level_counts(&self) -> LevelCounts {
        let mut counts = LevelCounts::default();
        for (_, _, cell) in self.cells.iter_defined() {
            *counts.get_mut(cell.level) += 1;
        }
        counts
    }

    /// Highest level among computed cells
    pub fn highest_level(&self) -> Option<RiskLevel> {
        self.cells.iter_defined().map(|(_, _, c)| c.level).max()
    }
}

/// Cell count for each risk level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub low: usize,
    pub moderate: usize,
    pub considerable: usize,
    pub high: usize,
}

impl LevelCounts {
    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::Considerable => self.considerable,
            RiskLevel::High => self.high,
        }
    }

    fn get_mut(&mut self, level: RiskLevel) -> &mut usize {
        match level {
            RiskLevel::Low => &mut self.low,
            RiskLevel::Moderate => &mut self.moderate,
            RiskLevel::Considerable => &mut self.considerable,
            RiskLevel::High => &mut self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.moderate + self.considerable + self.high
    }
}

/// An assembled risk raster and the number of cells it defines
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssembly {
    pub raster: RiskRaster,
    /// Cells with a computed score; 1 on a minimal 3×3 grid
    pub computed: usize,
}

/// Score and classify every interior cell.
///
/// # Errors
/// - [`Error::SizeMismatch`] if `slope_aspect` is not shaped like `grid`
/// - [`Error::InvalidParameter`] (with cell indices) if a slope, the weather
///   reading or the group size is out of domain
/// - [`Error::InvalidScore`] (with cell indices) if the model yields a NaN or negative score
///
/// When several cells fail, the error names the first one in row-major order.
pub fn assemble(
    grid: &SampleGrid,
    slope_aspect: &SlopeAspectRaster,
    weather: &WeatherReading,
    group_size: u32,
    model: &RiskModel,
) -> Result<RiskAssembly> {
    let (rows, cols) = grid.shape();
    if slope_aspect.shape() != (rows, cols) {
        let (ar, ac) = slope_aspect.shape();
        return Err(Error::SizeMismatch { er: rows, ec: cols, ar, ac });
    }

    let output_rows: Vec<Vec<Option<RiskCell>>> = (0..rows)
        .into_par_iter()
        .map(|row| -> Result<Vec<Option<RiskCell>>> {
            let mut row_data = vec![None; cols];
            if row == 0 || row + 1 >= rows {
                return Ok(row_data);
            }

            for col in 1..cols.saturating_sub(1) {
                let Some(terrain) = slope_aspect.get(row, col)? else {
                    continue;
                };
                let inputs = RiskInputs::new(terrain.slope_deg, terrain.aspect, weather, group_size);
                let cell = model
                    .score(&inputs)
                    .and_then(|score| Ok(RiskCell { score, level: classify(score)? }))
                    .map_err(|e| e.at_cell(row, col))?;
                row_data[col] = Some(cell);
            }

            Ok(row_data)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<_>>()?;

    let data: Vec<Option<RiskCell>> = output_rows.into_iter().flatten().collect();
    let computed = data.iter().filter(|c| c.is_some()).count();
    let array = Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(RiskAssembly {
        raster: RiskRaster {
            cells: Raster::from_array(array),
        },
        computed,
    })
}
