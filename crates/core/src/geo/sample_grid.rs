//! Square sampling grids around a center point

use crate::error::{Error, Result};
use crate::geo::{Coordinate, METERS_PER_DEGREE};
use serde::{Deserialize, Serialize};

/// Extent and spacing of the area to sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaParams {
    /// Side length of the square area in kilometers
    pub area_km: f64,
    /// Distance between adjacent samples in kilometers
    pub spacing_km: f64,
}

impl Default for AreaParams {
    fn default() -> Self {
        Self {
            area_km: 3.0,
            spacing_km: 0.3,
        }
    }
}

impl AreaParams {
    /// Build the sampling grid for these parameters around `center`
    pub fn build(&self, center: Coordinate) -> Result<SampleGrid> {
        build_grid(center, self.area_km, self.spacing_km)
    }
}

/// A square, north-up lattice of sample coordinates.
///
/// Row 0 is the northernmost row and column 0 the westernmost column, so
/// latitudes strictly decrease down the rows and longitudes strictly
/// increase along the columns. Cells are addressed row-major, matching the
/// order of [`SampleGrid::coordinates`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleGrid {
    center: Coordinate,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
}

impl SampleGrid {
    /// Side length `n` of the `n × n` grid
    pub fn size(&self) -> usize {
        self.latitudes.len()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.latitudes.len(), self.longitudes.len())
    }

    /// Total number of sample points
    pub fn len(&self) -> usize {
        self.latitudes.len() * self.longitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Row latitudes, north to south
    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    /// Column longitudes, west to east
    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// Coordinate at (row, col)
    pub fn coordinate(&self, row: usize, col: usize) -> Option<Coordinate> {
        let lat = *self.latitudes.get(row)?;
        let lon = *self.longitudes.get(col)?;
        Some(Coordinate::new(lat, lon))
    }

    /// All sample coordinates in row-major order
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.latitudes
            .iter()
            .flat_map(|&lat| self.longitudes.iter().map(move |&lon| Coordinate::new(lat, lon)))
            .collect()
    }

    /// Geographic bounds (west, south, east, north) of the sample points
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let n = self.size();
        (
            self.longitudes[0],
            self.latitudes[n - 1],
            self.longitudes[n - 1],
            self.latitudes[0],
        )
    }
}

/// Build an `n × n` sample grid covering a square area centered on `center`.
///
/// `n = max(3, round(area_km / spacing_km) + 1)`. Both axes span the same
/// angular width, `area_km` converted at 111 km per degree, centered on the
/// point.
///
/// # Errors
/// [`Error::InvalidConfiguration`] if the area or spacing is not a positive
/// finite number, the center is not a valid coordinate, the area would
/// reach a pole or cross the antimeridian, or the spacing is too fine for
/// adjacent samples to differ.
pub fn build_grid(center: Coordinate, area_km: f64, spacing_km: f64) -> Result<SampleGrid> {
    if !(area_km.is_finite() && area_km > 0.0) {
        return Err(Error::config("area_km", area_km, "must be a positive number of kilometers"));
    }
    if !(spacing_km.is_finite() && spacing_km > 0.0) {
        return Err(Error::config("spacing_km", spacing_km, "must be a positive number of kilometers"));
    }
    if !center.is_valid() {
        return Err(Error::config("center", center, "latitude/longitude out of range"));
    }

    let steps = (area_km / spacing_km).round();
    if !steps.is_finite() || steps >= MAX_GRID_SIDE as f64 {
        return Err(Error::config(
            "spacing_km",
            spacing_km,
            format!("grid side would exceed {} samples", MAX_GRID_SIDE),
        ));
    }
    let n = (steps as usize + 1).max(3);

    let half_extent = area_km * 1000.0 / METERS_PER_DEGREE / 2.0;
    if center.lat.abs() + half_extent >= 90.0 {
        return Err(Error::config("center", center, "sampled area would reach a pole"));
    }
    if center.lon.abs() + half_extent > 180.0 {
        return Err(Error::config("center", center, "sampled area would cross the antimeridian"));
    }

    let latitudes = linspace(center.lat + half_extent, center.lat - half_extent, n);
    let longitudes = linspace(center.lon - half_extent, center.lon + half_extent, n);

    // Spacing below f64 resolution at the center collapses adjacent samples
    let strictly_monotonic =
        latitudes.windows(2).all(|w| w[0] > w[1]) && longitudes.windows(2).all(|w| w[0] < w[1]);
    if !strictly_monotonic {
        return Err(Error::config(
            "spacing_km",
            spacing_km,
            "too fine to separate adjacent samples at this center",
        ));
    }

    Ok(SampleGrid {
        center,
        latitudes,
        longitudes,
    })
}

/// Upper bound on grid side length
pub const MAX_GRID_SIDE: usize = 10_000;

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    let step = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
}
