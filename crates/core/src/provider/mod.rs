//! Contracts for the elevation and weather services the engine depends on.
//!
//! Implementations live outside this crate (HTTP clients, files, test
//! doubles). The engine only sees these traits, and never substitutes data
//! on its own: a missing elevation is an error, and a weather fallback must
//! be requested explicitly through [`weather_or_default`].

mod traced;
mod weather;

pub use traced::Traced;
pub use weather::{ProviderWeather, WeatherReading};

use crate::error::{Error, Result};
use crate::geo::{Coordinate, SampleGrid};
use crate::raster::Raster;
use tracing::warn;

/// Bulk elevation lookup.
///
/// Must return exactly one entry per input coordinate, in input order.
/// `None` (or a non-finite value) marks a hole in the returned data; a
/// provider that cannot answer at all fails with
/// [`Error::ElevationUnavailable`].
pub trait ElevationProvider {
    fn fetch_bulk(&self, coordinates: &[Coordinate]) -> Result<Vec<Option<f64>>>;
}

/// Current-conditions lookup at a single point
pub trait WeatherProvider {
    fn fetch(&self, center: Coordinate) -> Result<ProviderWeather>;
}

impl<P: ElevationProvider + ?Sized> ElevationProvider for &P {
    fn fetch_bulk(&self, coordinates: &[Coordinate]) -> Result<Vec<Option<f64>>> {
        (**self).fetch_bulk(coordinates)
    }
}

impl<P: WeatherProvider + ?Sized> WeatherProvider for &P {
    fn fetch(&self, center: Coordinate) -> Result<ProviderWeather> {
        (**self).fetch(center)
    }
}

/// Fetch elevations for every grid point and shape them into a raster.
///
/// # Errors
/// [`Error::ElevationUnavailable`] if the provider fails or returns a
/// different number of samples than the grid has points.
pub fn fetch_elevations<P: ElevationProvider + ?Sized>(
    provider: &P,
    grid: &SampleGrid,
) -> Result<Raster<f64>> {
    let coordinates = grid.coordinates();
    let samples = provider.fetch_bulk(&coordinates).map_err(|e| match e {
        Error::ElevationUnavailable(_) => e,
        other => Error::ElevationUnavailable(other.to_string()),
    })?;

    if samples.len() != coordinates.len() {
        return Err(Error::ElevationUnavailable(format!(
            "expected {} elevations, provider returned {}",
            coordinates.len(),
            samples.len()
        )));
    }

    let (rows, cols) = grid.shape();
    Raster::from_samples(samples, rows, cols)
}

/// Fetch weather at `center` and convert it to engine units.
///
/// # Errors
/// [`Error::WeatherUnavailable`] if the provider fails or delivers a reading
/// outside the physical range.
pub fn fetch_weather<P: WeatherProvider + ?Sized>(provider: &P, center: Coordinate) -> Result<WeatherReading> {
    provider
        .fetch(center)
        .and_then(ProviderWeather::to_reading)
        .map_err(|e| match e {
            Error::WeatherUnavailable(_) => e,
            other => Error::WeatherUnavailable(other.to_string()),
        })
}

/// Fetch weather, substituting `fallback` if the provider fails.
///
/// The substitution is logged at `warn` level together with the provider
/// error.
pub fn weather_or_default<P: WeatherProvider + ?Sized>(
    provider: &P,
    center: Coordinate,
    fallback: WeatherReading,
) -> WeatherReading {
    match fetch_weather(provider, center) {
        Ok(reading) => reading,
        Err(e) => {
            warn!(
                error = %e,
                %center,
                snowfall_cm = fallback.snowfall_cm,
                wind_speed_kmh = fallback.wind_speed_kmh,
                "weather unavailable, substituting fallback reading"
            );
            fallback
        }
    }
}
