//! Multiplicative avalanche risk model
//!
//! ```text
//! risk = (slope × aspect × snowfall × wind) / group_reduction
//! ```
//! Each factor is a step function of one input. The same [`RiskModel`]
//! scores single points and every cell of a grid.

use super::classify::{classify, RiskLevel};
use avarisk_core::raster::Cardinal;
use avarisk_core::{Error, Result, WeatherReading};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Thresholds and multipliers for the terrain and weather factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    /// Slopes steeper than this (degrees) are penalized
    pub steep_slope_deg: f64,
    pub steep_slope_factor: f64,
    /// Snowfall above this (cm) is penalized
    pub heavy_snowfall_cm: f64,
    pub snowfall_factor: f64,
    /// Wind above this (km/h) is penalized
    pub strong_wind_kmh: f64,
    pub wind_factor: f64,
}

impl Default for RiskFactors {
    fn default() -> Self {
        Self {
            steep_slope_deg: 30.0,
            steep_slope_factor: 1.5,
            heavy_snowfall_cm: 20.0,
            snowfall_factor: 1.5,
            strong_wind_kmh: 30.0,
            wind_factor: 1.4,
        }
    }
}

impl RiskFactors {
    /// Every multiplier must be at least 1 and every threshold finite
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("steep_slope_factor", self.steep_slope_factor),
            ("snowfall_factor", self.snowfall_factor),
            ("wind_factor", self.wind_factor),
        ] {
            if !(value.is_finite() && value >= 1.0) {
                return Err(Error::parameter(name, value, "multiplier must be at least 1"));
            }
        }
        for (name, value) in [
            ("steep_slope_deg", self.steep_slope_deg),
            ("heavy_snowfall_cm", self.heavy_snowfall_cm),
            ("strong_wind_kmh", self.strong_wind_kmh),
        ] {
            if !value.is_finite() {
                return Err(Error::parameter(name, value, "threshold must be finite"));
            }
        }
        Ok(())
    }

    fn slope(&self, slope_deg: f64) -> f64 {
        step(slope_deg > self.steep_slope_deg, self.steep_slope_factor)
    }

    fn snowfall(&self, snowfall_cm: f64) -> f64 {
        step(snowfall_cm > self.heavy_snowfall_cm, self.snowfall_factor)
    }

    fn wind(&self, wind_speed_kmh: f64) -> f64 {
        step(wind_speed_kmh > self.strong_wind_kmh, self.wind_factor)
    }
}

fn step(exceeded: bool, factor: f64) -> f64 {
    if exceeded {
        factor
    } else {
        1.0
    }
}

/// Risk multiplier for each slope aspect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectBias {
    pub north: f64,
    pub east: f64,
    pub south: f64,
    pub west: f64,
}

impl AspectBias {
    /// North and east aspects weighted 1.3, south and west 1.0
    pub const NORTHERN_HEMISPHERE: AspectBias = AspectBias {
        north: 1.3,
        east: 1.3,
        south: 1.0,
        west: 1.0,
    };

    pub fn factor(&self, aspect: Cardinal) -> f64 {
        match aspect {
            Cardinal::North => self.north,
            Cardinal::East => self.east,
            Cardinal::South => self.south,
            Cardinal::West => self.west,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for dir in Cardinal::ALL {
            let value = self.factor(dir);
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::parameter("aspect_bias", value, format!("{} multiplier must be positive", dir)));
            }
        }
        Ok(())
    }
}

impl Default for AspectBias {
    fn default() -> Self {
        Self::NORTHERN_HEMISPHERE
    }
}

/// Group-size divisor applied to the combined factors.
///
/// Groups of up to `small_group_max` people use `small`, larger groups use
/// `large`. There is no `Default`: pick a preset or supply a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupReduction {
    pub small_group_max: u32,
    pub small: f64,
    pub large: f64,
}

impl GroupReduction {
    /// Groups of four or fewer divide by 1.1, larger groups by 0.8
    pub const SMALL_GROUP_ADVANTAGE: GroupReduction = GroupReduction {
        small_group_max: 4,
        small: 1.1,
        large: 0.8,
    };

    /// The inverse table: small groups divide by 0.8, larger groups by 1.1
    pub const SMALL_GROUP_PENALTY: GroupReduction = GroupReduction {
        small_group_max: 4,
        small: 0.8,
        large: 1.1,
    };

    /// Divisor for a party of `group_size` people
    pub fn factor(&self, group_size: u32) -> f64 {
        if group_size <= self.small_group_max {
            self.small
        } else {
            self.large
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("small", self.small), ("large", self.large)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::parameter(name, value, "group reduction must be positive"));
            }
        }
        Ok(())
    }
}

/// Named [`GroupReduction`] presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionPreset {
    SmallGroupAdvantage,
    SmallGroupPenalty,
}

impl ReductionPreset {
    pub fn table(self) -> GroupReduction {
        match self {
            ReductionPreset::SmallGroupAdvantage => GroupReduction::SMALL_GROUP_ADVANTAGE,
            ReductionPreset::SmallGroupPenalty => GroupReduction::SMALL_GROUP_PENALTY,
        }
    }
}

impl FromStr for ReductionPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "small-group-advantage" | "advantage" => Ok(ReductionPreset::SmallGroupAdvantage),
            "small-group-penalty" | "penalty" => Ok(ReductionPreset::SmallGroupPenalty),
            _ => Err(format!(
                "Unknown reduction preset: {}. Use small-group-advantage or small-group-penalty.",
                s
            )),
        }
    }
}

impl fmt::Display for ReductionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReductionPreset::SmallGroupAdvantage => "small-group-advantage",
            ReductionPreset::SmallGroupPenalty => "small-group-penalty",
        })
    }
}

/// Inputs for scoring one location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskInputs {
    pub slope_deg: f64,
    pub aspect: Cardinal,
    pub snowfall_cm: f64,
    pub wind_speed_kmh: f64,
    pub group_size: u32,
}

impl RiskInputs {
    pub fn new(slope_deg: f64, aspect: Cardinal, weather: &WeatherReading, group_size: u32) -> Self {
        Self {
            slope_deg,
            aspect,
            snowfall_cm: weather.snowfall_cm,
            wind_speed_kmh: weather.wind_speed_kmh,
            group_size,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.slope_deg.is_finite() && (0.0..=90.0).contains(&self.slope_deg)) {
            return Err(Error::parameter("slope_deg", self.slope_deg, "must be within 0-90 degrees"));
        }
        if !(self.snowfall_cm.is_finite() && self.snowfall_cm >= 0.0) {
            return Err(Error::parameter("snowfall_cm", self.snowfall_cm, "must be non-negative"));
        }
        if !(self.wind_speed_kmh.is_finite() && self.wind_speed_kmh >= 0.0) {
            return Err(Error::parameter("wind_speed_kmh", self.wind_speed_kmh, "must be non-negative"));
        }
        if self.group_size == 0 {
            return Err(Error::parameter("group_size", self.group_size, "must be at least 1"));
        }
        Ok(())
    }
}

/// Score and level of a single location
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointAssessment {
    pub score: f64,
    pub level: RiskLevel,
}

/// The risk model: factor tables plus the caller's group reduction policy.
///
/// Deserialization goes through [`RiskModel::with_tables`], so a stored
/// model is validated like a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RiskTables")]
pub struct RiskModel {
    factors: RiskFactors,
    aspect_bias: AspectBias,
    reduction: GroupReduction,
}

#[derive(Deserialize)]
struct RiskTables {
    factors: RiskFactors,
    aspect_bias: AspectBias,
    reduction: GroupReduction,
}

impl TryFrom<RiskTables> for RiskModel {
    type Error = Error;

    fn try_from(tables: RiskTables) -> Result<Self> {
        Self::with_tables(tables.factors, tables.aspect_bias, tables.reduction)
    }
}

impl RiskModel {
    /// Model with default factors and aspect bias and the given reduction table
    pub fn new(reduction: GroupReduction) -> Result<Self> {
        Self::with_tables(RiskFactors::default(), AspectBias::default(), reduction)
    }

    pub fn with_tables(factors: RiskFactors, aspect_bias: AspectBias, reduction: GroupReduction) -> Result<Self> {
        factors.validate()?;
        aspect_bias.validate()?;
        reduction.validate()?;
        Ok(Self {
            factors,
            aspect_bias,
            reduction,
        })
    }

    pub fn factors(&self) -> &RiskFactors {
        &self.factors
    }

    pub fn aspect_bias(&self) -> &AspectBias {
        &self.aspect_bias
    }

    pub fn reduction(&self) -> &GroupReduction {
        &self.reduction
    }

    /// Risk score for one location.
    ///
    /// # Errors
    /// [`Error::InvalidParameter`] if the slope is outside 0-90°, weather
    /// values are negative or non-finite, or the group is empty.
    pub fn score(&self, inputs: &RiskInputs) -> Result<f64> {
        inputs.validate()?;

        let combined = self.factors.slope(inputs.slope_deg)
            * self.aspect_bias.factor(inputs.aspect)
            * self.factors.snowfall(inputs.snowfall_cm)
            * self.factors.wind(inputs.wind_speed_kmh);

        Ok(combined / self.reduction.factor(inputs.group_size))
    }

    /// Positional form of [`RiskModel::score`]
    pub fn compute_risk(
        &self,
        slope_deg: f64,
        aspect: Cardinal,
        snowfall_cm: f64,
        wind_speed_kmh: f64,
        group_size: u32,
    ) -> Result<f64> {
        self.score(&RiskInputs {
            slope_deg,
            aspect,
            snowfall_cm,
            wind_speed_kmh,
            group_size,
        })
    }

    /// Score and classify one location
    pub fn assess(&self, inputs: &RiskInputs) -> Result<PointAssessment> {
        let score = self.score(inputs)?;
        let level = classify(score)?;
        Ok(PointAssessment { score, level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn advantage() -> RiskModel {
        RiskModel::new(GroupReduction::SMALL_GROUP_ADVANTAGE).unwrap()
    }

    #[test]
    fn test_worst_case_small_group() {
        let model = advantage();
        let risk = model.compute_risk(35.0, Cardinal::North, 25.0, 35.0, 3).unwrap();
        assert_relative_eq!(risk, 1.5 * 1.3 * 1.5 * 1.4 / 1.1, epsilon = 1e-12);
        assert_relative_eq!(risk, 3.7227, epsilon = 1e-4);

        let point = model
            .assess(&RiskInputs {
                slope_deg: 35.0,
                aspect: Cardinal::North,
                snowfall_cm: 25.0,
                wind_speed_kmh: 35.0,
                group_size: 3,
            })
            .unwrap();
        assert_eq!(point.level, RiskLevel::High);
    }

    #[test]
    fn test_benign_conditions() {
        let model = advantage();
        let risk = model.compute_risk(10.0, Cardinal::South, 0.0, 0.0, 2).unwrap();
        assert_relative_eq!(risk, 1.0 / 1.1, epsilon = 1e-12);
        let risk = model.compute_risk(10.0, Cardinal::West, 0.0, 0.0, 6).unwrap();
        assert_relative_eq!(risk, 1.0 / 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let model = advantage();
        let at = model.compute_risk(30.0, Cardinal::South, 20.0, 30.0, 4).unwrap();
        let above = model.compute_risk(30.001, Cardinal::South, 20.001, 30.001, 4).unwrap();
        assert_relative_eq!(at, 1.0 / 1.1, epsilon = 1e-12);
        assert_relative_eq!(above, 1.5 * 1.5 * 1.4 / 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_aspect_bias() {
        let model = advantage();
        let north = model.compute_risk(10.0, Cardinal::North, 0.0, 0.0, 5).unwrap();
        let east = model.compute_risk(10.0, Cardinal::East, 0.0, 0.0, 5).unwrap();
        let south = model.compute_risk(10.0, Cardinal::South, 0.0, 0.0, 5).unwrap();
        assert_relative_eq!(north, east);
        assert_relative_eq!(north / south, 1.3, epsilon = 1e-12);
    }

    #[test]
    fn test_reduction_presets_differ() {
        let penalty = RiskModel::new(GroupReduction::SMALL_GROUP_PENALTY).unwrap();
        let small = penalty.compute_risk(10.0, Cardinal::South, 0.0, 0.0, 4).unwrap();
        let large = penalty.compute_risk(10.0, Cardinal::South, 0.0, 0.0, 5).unwrap();
        assert_relative_eq!(small, 1.0 / 0.8, epsilon = 1e-12);
        assert_relative_eq!(large, 1.0 / 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_monotone_in_each_input() {
        let model = advantage();
        let steps: Vec<f64> = (0..=90).map(|v| v as f64).collect();

        for aspect in Cardinal::ALL {
            for group in [1, 4, 5, 12] {
                let by_slope: Vec<f64> = steps
                    .iter()
                    .map(|&s| model.compute_risk(s, aspect, 10.0, 10.0, group).unwrap())
                    .collect();
                let by_snow: Vec<f64> = steps
                    .iter()
                    .map(|&s| model.compute_risk(20.0, aspect, s, 10.0, group).unwrap())
                    .collect();
                let by_wind: Vec<f64> = steps
                    .iter()
                    .map(|&s| model.compute_risk(20.0, aspect, 10.0, s, group).unwrap())
                    .collect();

                for series in [&by_slope, &by_snow, &by_wind] {
                    assert!(series.windows(2).all(|w| w[0] <= w[1]), "risk decreased: {:?}", series);
                }
            }
        }
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let model = advantage();
        assert!(model.compute_risk(-1.0, Cardinal::North, 0.0, 0.0, 1).is_err());
        assert!(model.compute_risk(91.0, Cardinal::North, 0.0, 0.0, 1).is_err());
        assert!(model.compute_risk(10.0, Cardinal::North, -5.0, 0.0, 1).is_err());
        assert!(model.compute_risk(10.0, Cardinal::North, 0.0, f64::NAN, 1).is_err());
        assert!(matches!(
            model.compute_risk(10.0, Cardinal::North, 0.0, 0.0, 0),
            Err(Error::InvalidParameter { name: "group_size", .. })
        ));
    }

    #[test]
    fn test_rejects_decreasing_factors() {
        let factors = RiskFactors {
            wind_factor: 0.9,
            ..RiskFactors::default()
        };
        let result = RiskModel::with_tables(factors, AspectBias::default(), GroupReduction::SMALL_GROUP_ADVANTAGE);
        assert!(matches!(result, Err(Error::InvalidParameter { name: "wind_factor", .. })));

        let reduction = GroupReduction {
            small_group_max: 4,
            small: 0.0,
            large: 1.0,
        };
        assert!(RiskModel::new(reduction).is_err());
    }

    #[test]
    fn test_parse_preset() {
        assert_eq!(
            "small-group-advantage".parse::<ReductionPreset>(),
            Ok(ReductionPreset::SmallGroupAdvantage)
        );
        assert_eq!("Small_Group_Penalty".parse::<ReductionPreset>(), Ok(ReductionPreset::SmallGroupPenalty));
        assert!("none".parse::<ReductionPreset>().is_err());
        assert_eq!(ReductionPreset::SmallGroupPenalty.table(), GroupReduction::SMALL_GROUP_PENALTY);
    }

    #[test]
    fn test_tables_are_kept() {
        let factors = RiskFactors {
            wind_factor: 2.0,
            ..RiskFactors::default()
        };
        let bias = AspectBias {
            south: 1.2,
            ..AspectBias::NORTHERN_HEMISPHERE
        };
        let model = RiskModel::with_tables(factors, bias, GroupReduction::SMALL_GROUP_PENALTY).unwrap();

        assert_eq!(model.factors(), &factors);
        assert_eq!(model.aspect_bias(), &bias);
        assert_eq!(model.reduction(), &GroupReduction::SMALL_GROUP_PENALTY);
    }

    #[test]
    fn test_deserialize_validates_tables() {
        let model = RiskModel::new(GroupReduction::SMALL_GROUP_ADVANTAGE).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let restored: RiskModel = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, model);

        let broken = json.replace("\"small\":1.1", "\"small\":0.0");
        assert_ne!(broken, json);
        assert!(serde_json::from_str::<RiskModel>(&broken).is_err());
    }
}
