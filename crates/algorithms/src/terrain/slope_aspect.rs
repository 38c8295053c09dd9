//! Slope angle and aspect from a geographic elevation grid
//!
//! Uses centered finite differences over the four edge-adjacent neighbors
//! of each interior cell. Sample spacing is converted from degrees to
//! meters per cell, with longitudinal spacing shrunk by `cos(latitude)`.

use crate::maybe_rayon::*;
use avarisk_core::geo::{SampleGrid, METERS_PER_DEGREE};
use avarisk_core::raster::{Cardinal, CardinalNeighbors, Raster};
use avarisk_core::{Algorithm, Error, Result};
use ndarray::Array2;
use serde::Serialize;

/// Terrain derivatives of one interior cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlopeAspectCell {
    /// Slope angle in degrees (0-90)
    pub slope_deg: f64,
    /// Aspect angle in degrees (0-360)
    pub aspect_deg: f64,
    /// Aspect bucketed to a compass quadrant
    pub aspect: Cardinal,
}

/// Per-cell slope/aspect; border cells are undefined
pub type SlopeAspectRaster = Raster<SlopeAspectCell>;

/// Parameters for slope/aspect derivation
#[derive(Debug, Clone)]
pub struct SlopeAspectParams {
    /// Meters per degree of latitude (and of longitude at the equator)
    pub meters_per_degree: f64,
}

impl Default for SlopeAspectParams {
    fn default() -> Self {
        Self {
            meters_per_degree: METERS_PER_DEGREE,
        }
    }
}

/// Slope/aspect algorithm
#[derive(Debug, Clone, Default)]
pub struct SlopeAspect;

impl Algorithm for SlopeAspect {
    type Input = (SampleGrid, Raster<f64>);
    type Output = SlopeAspectRaster;
    type Params = SlopeAspectParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "SlopeAspect"
    }

    fn description(&self) -> &'static str {
        "Derive slope angle and compass aspect from a lat/lon elevation grid using centered differences"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (grid, dem) = input;
        slope_aspect(&grid, &dem, &params)
    }
}

/// Compute slope and aspect for every interior cell of `dem`.
///
/// For cell (i, j) with neighbors N = (i-1, j), S = (i+1, j),
/// E = (i, j+1), W = (i, j-1):
/// ```text
/// Δlat_m = (lat[i-1] - lat[i+1]) · m/deg
/// Δlon_m = (lon[j+1] - lon[j-1]) · m/deg · cos(lat[i])
/// dz/dx  = (E - W) / Δlon_m
/// dz/dy  = (N - S) / Δlat_m
/// slope  = atan(√(dz/dx² + dz/dy²))
/// aspect = atan2(dz/dy, -dz/dx) mapped to [0, 360)
/// ```
/// A zero gradient yields slope 0 and aspect 0 (north).
///
/// # Errors
/// - [`Error::SizeMismatch`] if `dem` is not shaped like `grid`
/// - [`Error::MissingElevation`] if any interior cell lacks a finite neighbor value
/// - [`Error::NonFiniteGradient`] if the spacing is degenerate
///
/// When several cells fail, the error names the first one in row-major order.
pub fn slope_aspect(
    grid: &SampleGrid,
    dem: &Raster<f64>,
    params: &SlopeAspectParams,
) -> Result<SlopeAspectRaster> {
    let (rows, cols) = grid.shape();
    if dem.shape() != (rows, cols) {
        let (ar, ac) = dem.shape();
        return Err(Error::SizeMismatch { er: rows, ec: cols, ar, ac });
    }
    let mpd = params.meters_per_degree;
    if !(mpd.is_finite() && mpd > 0.0) {
        return Err(Error::parameter("meters_per_degree", mpd, "must be positive"));
    }

    let lats = grid.latitudes();
    let lons = grid.longitudes();

    let output_rows: Vec<Vec<Option<SlopeAspectCell>>> = (0..rows)
        .into_par_iter()
        .map(|row| -> Result<Vec<Option<SlopeAspectCell>>> {
            let mut row_data = vec![None; cols];
            if row == 0 || row + 1 >= rows {
                return Ok(row_data);
            }

            let dlat_m = (lats[row - 1] - lats[row + 1]) * mpd;
            let cos_lat = lats[row].to_radians().cos();

            for col in 1..cols.saturating_sub(1) {
                let neighbors = match dem.cardinal_neighbors(row, col) {
                    Some(n) => n
                        .map(|z| z.filter(|v| v.is_finite()))
                        .complete()
                        .map_err(|neighbor| Error::MissingElevation { row, col, neighbor })?,
                    None => continue,
                };
                let dlon_m = (lons[col + 1] - lons[col - 1]) * mpd * cos_lat;
                let cell = cell_derivatives(&neighbors, dlat_m, dlon_m)
                    .ok_or(Error::NonFiniteGradient { row, col })?;
                row_data[col] = Some(cell);
            }

            Ok(row_data)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect::<Result<_>>()?;

    let data = output_rows.into_iter().flatten().collect();
    let array = Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;

    Ok(Raster::from_array(array))
}

/// Slope and aspect from four neighbor elevations and the metric spacing
/// between opposite neighbors.
///
/// Returns `None` when the gradient is not finite, e.g. for zero spacing.
pub fn cell_derivatives(n: &CardinalNeighbors<f64>, dlat_m: f64, dlon_m: f64) -> Option<SlopeAspectCell> {
    let dz_dx = (n.east - n.west) / dlon_m;
    let dz_dy = (n.north - n.south) / dlat_m;

    let slope_deg = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan().to_degrees();

    // atan2(0, -0) is π in IEEE arithmetic, so pin the flat case explicitly
    let aspect_deg = if dz_dx == 0.0 && dz_dy == 0.0 {
        0.0
    } else {
        (dz_dy.atan2(-dz_dx).to_degrees() + 360.0) % 360.0
    };

    if !slope_deg.is_finite() {
        return None;
    }

    Some(SlopeAspectCell {
        slope_deg,
        aspect_deg,
        aspect: Cardinal::from_azimuth(aspect_deg)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use avarisk_core::geo::{build_grid, Coordinate};

    fn grid(n_km: f64, lat: f64) -> SampleGrid {
        // spacing 0.5 km → n = 2 * n_km + 1
        build_grid(Coordinate::new(lat, 10.0), n_km, 0.5).unwrap()
    }

    fn dem_from<F: Fn(usize, usize) -> f64>(grid: &SampleGrid, f: F) -> Raster<f64> {
        let (rows, cols) = grid.shape();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Raster::from_vec(data, rows, cols).unwrap()
    }

    #[test]
    fn test_flat_surface_is_level_and_north() {
        let g = grid(3.0, 46.0);
        let dem = Raster::filled(7, 7, 2500.0);
        let result = slope_aspect(&g, &dem, &SlopeAspectParams::default()).unwrap();

        for r in 1..6 {
            for c in 1..6 {
                let cell = result.get(r, c).unwrap().expect("interior cell defined");
                assert_eq!(cell.slope_deg, 0.0);
                assert_eq!(cell.aspect_deg, 0.0);
                assert_eq!(cell.aspect, Cardinal::North);
            }
        }
    }

    #[test]
    fn test_border_cells_undefined() {
        let g = grid(2.0, 46.0);
        let dem = dem_from(&g, |r, c| (r * 3 + c) as f64);
        let result = slope_aspect(&g, &dem, &SlopeAspectParams::default()).unwrap();

        for r in 0..5 {
            for c in 0..5 {
                let border = r == 0 || c == 0 || r == 4 || c == 4;
                assert_eq!(result.get(r, c).unwrap().is_none(), border, "cell ({}, {})", r, c);
            }
        }
        assert_eq!(result.defined_count(), 9);
    }

    #[test]
    fn test_gradient_direction_buckets() {
        let g = grid(2.0, 46.0);
        let params = SlopeAspectParams::default();

        // Rising to the north: dz/dy > 0 → 90°
        let dem = dem_from(&g, |r, _| (4 - r) as f64 * 10.0);
        let cell = slope_aspect(&g, &dem, &params).unwrap().get(2, 2).unwrap().unwrap();
        assert_relative_eq!(cell.aspect_deg, 90.0, epsilon = 1e-9);
        assert_eq!(cell.aspect, Cardinal::East);

        // Rising to the east: dz/dx > 0 → 180°
        let dem = dem_from(&g, |_, c| c as f64 * 10.0);
        let cell = slope_aspect(&g, &dem, &params).unwrap().get(2, 2).unwrap().unwrap();
        assert_relative_eq!(cell.aspect_deg, 180.0, epsilon = 1e-9);
        assert_eq!(cell.aspect, Cardinal::South);

        // Rising to the south → 270°
        let dem = dem_from(&g, |r, _| r as f64 * 10.0);
        let cell = slope_aspect(&g, &dem, &params).unwrap().get(2, 2).unwrap().unwrap();
        assert_relative_eq!(cell.aspect_deg, 270.0, epsilon = 1e-9);
        assert_eq!(cell.aspect, Cardinal::West);

        // Rising to the west → 0°
        let dem = dem_from(&g, |_, c| (4 - c) as f64 * 10.0);
        let cell = slope_aspect(&g, &dem, &params).unwrap().get(2, 2).unwrap().unwrap();
        assert_relative_eq!(cell.aspect_deg, 0.0, epsilon = 1e-9);
        assert_eq!(cell.aspect, Cardinal::North);
    }

    #[test]
    fn test_slope_angle_matches_gradient() {
        let g = grid(1.0, 46.0);
        let dem = dem_from(&g, |r, _| if r == 0 { 300.0 } else { 0.0 });
        let result = slope_aspect(&g, &dem, &SlopeAspectParams::default()).unwrap();
        let cell = result.get(1, 1).unwrap().unwrap();

        let lats = g.latitudes();
        let dlat_m = (lats[0] - lats[2]) * METERS_PER_DEGREE;
        let expected = (300.0 / dlat_m).atan().to_degrees();

        assert_relative_eq!(cell.slope_deg, expected, epsilon = 1e-9);
        // 300 m over 1 km
        assert_relative_eq!(cell.slope_deg, (0.3f64).atan().to_degrees(), epsilon = 1e-9);
    }

    #[test]
    fn test_longitude_spacing_shrinks_with_latitude() {
        let params = SlopeAspectParams::default();

        let g0 = grid(1.0, 0.0);
        let dem0 = dem_from(&g0, |_, c| c as f64 * 50.0);
        let equator = slope_aspect(&g0, &dem0, &params).unwrap().get(1, 1).unwrap().unwrap();

        let g60 = grid(1.0, 60.0);
        let dem60 = dem_from(&g60, |_, c| c as f64 * 50.0);
        let north = slope_aspect(&g60, &dem60, &params).unwrap().get(1, 1).unwrap().unwrap();

        let ratio = north.slope_deg.to_radians().tan() / equator.slope_deg.to_radians().tan();
        assert_relative_eq!(ratio, 1.0 / 60f64.to_radians().cos(), epsilon = 1e-9);
    }

    #[test]
    fn test_missing_neighbor_aborts() {
        let g = grid(1.0, 46.0);
        let mut dem = Raster::filled(3, 3, 100.0);
        dem.clear(0, 1).unwrap();

        let err = slope_aspect(&g, &dem, &SlopeAspectParams::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingElevation { row: 1, col: 1, neighbor: Cardinal::North }
        ));
    }

    #[test]
    fn test_corner_and_center_holes_are_not_needed() {
        let g = grid(1.0, 46.0);
        let mut dem = Raster::filled(3, 3, 100.0);
        dem.clear(0, 0).unwrap();
        dem.clear(1, 1).unwrap();

        let result = slope_aspect(&g, &dem, &SlopeAspectParams::default()).unwrap();
        assert_eq!(result.get(1, 1).unwrap().unwrap().slope_deg, 0.0);
    }

    #[test]
    fn test_size_mismatch() {
        let g = grid(1.0, 46.0);
        let dem = Raster::filled(4, 4, 100.0);
        let err = slope_aspect(&g, &dem, &SlopeAspectParams::default()).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { er: 3, ec: 3, ar: 4, ac: 4 }));
    }

    #[test]
    fn test_algorithm_trait() {
        let g = grid(1.0, 46.0);
        let dem = Raster::filled(3, 3, 100.0);
        let algo = SlopeAspect;
        assert_eq!(algo.name(), "SlopeAspect");

        let result = algo.execute_default((g, dem)).unwrap();
        assert_eq!(result.defined_count(), 1);
    }

    #[test]
    fn test_first_missing_cell_in_row_order_is_reported() {
        let g = grid(4.0, 46.0);
        let mut dem = Raster::filled(9, 9, 100.0);
        // (2, 1) is the first interior cell, in row-major order, touching a hole
        dem.clear(6, 4).unwrap();
        dem.clear(3, 1).unwrap();
        dem.clear(8, 7).unwrap();

        for _ in 0..20 {
            let err = slope_aspect(&g, &dem, &SlopeAspectParams::default()).unwrap_err();
            assert!(matches!(
                err,
                Error::MissingElevation { row: 2, col: 1, neighbor: Cardinal::South }
            ));
        }
    }

    #[test]
    fn test_degenerate_spacing_has_no_derivatives() {
        let neighbors = CardinalNeighbors {
            north: 100.0,
            east: 100.0,
            south: 100.0,
            west: 100.0,
        };
        assert!(cell_derivatives(&neighbors, 0.0, 0.0).is_none());
        assert!(cell_derivatives(&neighbors, 0.0, 10.0).is_none());

        let level = cell_derivatives(&neighbors, 10.0, 10.0).unwrap();
        assert_eq!(level.slope_deg, 0.0);
        assert_eq!(level.aspect, Cardinal::North);
    }
}
