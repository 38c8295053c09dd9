//! Weather readings and provider unit conversion

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Weather observed at the area center, applied uniformly to every cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Recent snowfall in centimeters
    pub snowfall_cm: f64,
    /// Wind speed in kilometers per hour
    pub wind_speed_kmh: f64,
}

impl WeatherReading {
    /// Create a reading, rejecting negative or non-finite values
    pub fn new(snowfall_cm: f64, wind_speed_kmh: f64) -> Result<Self> {
        check_non_negative("snowfall_cm", snowfall_cm)?;
        check_non_negative("wind_speed_kmh", wind_speed_kmh)?;
        Ok(Self {
            snowfall_cm,
            wind_speed_kmh,
        })
    }

    /// Zero snowfall and zero wind
    pub const fn calm() -> Self {
        Self {
            snowfall_cm: 0.0,
            wind_speed_kmh: 0.0,
        }
    }

    /// Convert provider units (snowfall in mm, wind in m/s)
    pub fn from_provider_units(snowfall_mm: f64, wind_speed_ms: f64) -> Result<Self> {
        Self::new(snowfall_mm / 10.0, wind_speed_ms * 3.6)
    }
}

/// A weather observation as delivered by a provider, in provider units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProviderWeather {
    /// Snowfall over the last hour in millimeters
    pub snowfall_mm: f64,
    /// Wind speed in meters per second
    pub wind_speed_ms: f64,
}

impl ProviderWeather {
    pub fn to_reading(self) -> Result<WeatherReading> {
        WeatherReading::from_provider_units(self.snowfall_mm, self.wind_speed_ms)
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::parameter(name, value, "must be a non-negative number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_provider_unit_conversion() {
        let reading = ProviderWeather {
            snowfall_mm: 250.0,
            wind_speed_ms: 10.0,
        }
        .to_reading()
        .unwrap();
        assert_relative_eq!(reading.snowfall_cm, 25.0);
        assert_relative_eq!(reading.wind_speed_kmh, 36.0);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(WeatherReading::new(-1.0, 0.0).is_err());
        assert!(WeatherReading::new(0.0, f64::NAN).is_err());
        assert!(matches!(
            WeatherReading::new(0.0, -3.0),
            Err(Error::InvalidParameter { name: "wind_speed_kmh", .. })
        ));
    }

    #[test]
    fn test_calm_is_zero() {
        assert_eq!(WeatherReading::calm(), WeatherReading::new(0.0, 0.0).unwrap());
    }
}
