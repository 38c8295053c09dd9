//! End-to-end area assessment: grid, weather, elevations, terrain, risk.

use super::assemble::{assemble, RiskRaster};
use super::model::RiskModel;
use crate::terrain::{slope_aspect, SlopeAspectParams, SlopeAspectRaster};
use avarisk_core::provider::{fetch_elevations, fetch_weather, weather_or_default};
use avarisk_core::{AreaParams, Coordinate, ElevationProvider, Raster, Result, SampleGrid, WeatherProvider, WeatherReading};
use std::time::Instant;
use tracing::{debug, info};

/// What to assess and for whom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssessmentRequest {
    pub center: Coordinate,
    pub area: AreaParams,
    pub group_size: u32,
    /// Reading to use when the weather provider fails. `None` makes a
    /// weather failure fatal.
    pub fallback_weather: Option<WeatherReading>,
}

impl AssessmentRequest {
    /// Default 3 km area sampled every 300 m, no weather fallback
    pub fn new(center: Coordinate, group_size: u32) -> Self {
        Self {
            center,
            area: AreaParams::default(),
            group_size,
            fallback_weather: None,
        }
    }

    pub fn with_area(mut self, area: AreaParams) -> Self {
        self.area = area;
        self
    }

    pub fn with_fallback_weather(mut self, fallback: WeatherReading) -> Self {
        self.fallback_weather = Some(fallback);
        self
    }
}

/// Everything produced while assessing an area
#[derive(Debug, Clone)]
pub struct AreaAssessment {
    pub grid: SampleGrid,
    pub weather: WeatherReading,
    pub elevations: Raster<f64>,
    pub slope_aspect: SlopeAspectRaster,
    pub risk: RiskRaster,
    /// Interior cells with a computed risk
    pub computed: usize,
}

/// Assess avalanche risk over the area around `request.center`.
///
/// Elevation holes are fatal only where an interior cell needs them.
///
/// # Errors
/// - invalid area, spacing, center or group size
/// - [`avarisk_core::Error::ElevationUnavailable`] if the elevation provider fails
/// - [`avarisk_core::Error::WeatherUnavailable`] if the weather provider fails and no fallback was given
/// - [`avarisk_core::Error::MissingElevation`] if an interior cell lacks a neighbor
pub fn assess_area<E, W>(
    request: &AssessmentRequest,
    elevation: &E,
    weather: &W,
    model: &RiskModel,
) -> Result<AreaAssessment>
where
    E: ElevationProvider + ?Sized,
    W: WeatherProvider + ?Sized,
{
    let start = Instant::now();
    let grid = request.area.build(request.center)?;
    debug!(center = %request.center, size = grid.size(), "built sample grid");

    let reading = match request.fallback_weather {
        Some(fallback) => weather_or_default(weather, request.center, fallback),
        None => fetch_weather(weather, request.center)?,
    };

    let elevations = fetch_elevations(elevation, &grid)?;
    let terrain = slope_aspect(&grid, &elevations, &SlopeAspectParams::default())?;
    let assembly = assemble(&grid, &terrain, &reading, request.group_size, model)?;

    info!(
        center = %request.center,
        size = grid.size(),
        computed = assembly.computed,
        snowfall_cm = reading.snowfall_cm,
        wind_speed_kmh = reading.wind_speed_kmh,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "assessed area"
    );

    Ok(AreaAssessment {
        grid,
        weather: reading,
        elevations,
        slope_aspect: terrain,
        risk: assembly.raster,
        computed: assembly.computed,
    })
}
