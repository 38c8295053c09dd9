//! Tracing wrapper around collaborator calls

use super::{ElevationProvider, ProviderWeather, WeatherProvider};
use crate::error::Result;
use crate::geo::Coordinate;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Wraps a provider and emits structured `tracing` events around each call.
///
/// ```ignore
/// let elevation = Traced::new("open-elevation", client);
/// let dem = fetch_elevations(&elevation, &grid)?;
/// ```
#[derive(Debug, Clone)]
pub struct Traced<P> {
    name: &'static str,
    inner: P,
}

impl<P> Traced<P> {
    pub fn new(name: &'static str, inner: P) -> Self {
        Self { name, inner }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<P: ElevationProvider> ElevationProvider for Traced<P> {
    fn fetch_bulk(&self, coordinates: &[Coordinate]) -> Result<Vec<Option<f64>>> {
        debug!(provider = self.name, points = coordinates.len(), "requesting elevations");
        let start = Instant::now();

        match self.inner.fetch_bulk(coordinates) {
            Ok(samples) => {
                let holes = samples.iter().filter(|s| !s.is_some_and(f64::is_finite)).count();
                info!(
                    provider = self.name,
                    returned = samples.len(),
                    holes,
                    elapsed = ?start.elapsed(),
                    "elevations received"
                );
                Ok(samples)
            }
            Err(e) => {
                warn!(provider = self.name, error = %e, "elevation request failed");
                Err(e)
            }
        }
    }
}

impl<P: WeatherProvider> WeatherProvider for Traced<P> {
    fn fetch(&self, center: Coordinate) -> Result<ProviderWeather> {
        debug!(provider = self.name, %center, "requesting weather");
        let start = Instant::now();

        match self.inner.fetch(center) {
            Ok(weather) => {
                info!(
                    provider = self.name,
                    snowfall_mm = weather.snowfall_mm,
                    wind_speed_ms = weather.wind_speed_ms,
                    elapsed = ?start.elapsed(),
                    "weather received"
                );
                Ok(weather)
            }
            Err(e) => {
                warn!(provider = self.name, error = %e, "weather request failed");
                Err(e)
            }
        }
    }
}
