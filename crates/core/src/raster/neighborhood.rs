//! Cardinal directions and fixed-shape four-neighbor sampling

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four compass directions.
///
/// Used both to name the edge-adjacent neighbors of a cell and as the
/// bucketed aspect a slope faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinal {
    North,
    East,
    South,
    West,
}

impl Cardinal {
    /// All directions, clockwise from north
    pub const ALL: [Cardinal; 4] = [Cardinal::North, Cardinal::East, Cardinal::South, Cardinal::West];

    /// (row_offset, col_offset) on a north-up raster
    pub fn offset(self) -> (isize, isize) {
        match self {
            Cardinal::North => (-1, 0),
            Cardinal::East => (0, 1),
            Cardinal::South => (1, 0),
            Cardinal::West => (0, -1),
        }
    }

    /// Bucket an azimuth in degrees into a compass quadrant.
    ///
    /// Buckets are closed at their lower bound:
    /// `[0, 45) ∪ [315, 360]` north, `[45, 135)` east, `[135, 225)` south,
    /// `[225, 315)` west. Angles outside `[0, 360]` are wrapped first.
    /// Returns `None` for non-finite angles.
    pub fn from_azimuth(degrees: f64) -> Option<Self> {
        if !degrees.is_finite() {
            return None;
        }
        let deg = if (0.0..=360.0).contains(&degrees) {
            degrees
        } else {
            degrees.rem_euclid(360.0)
        };

        Some(if deg < 45.0 || deg >= 315.0 {
            Cardinal::North
        } else if deg < 135.0 {
            Cardinal::East
        } else if deg < 225.0 {
            Cardinal::South
        } else {
            Cardinal::West
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Cardinal::North => "north",
            Cardinal::East => "east",
            Cardinal::South => "south",
            Cardinal::West => "west",
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Ok(Cardinal::North),
            "east" | "e" => Ok(Cardinal::East),
            "south" | "s" => Ok(Cardinal::South),
            "west" | "w" => Ok(Cardinal::West),
            _ => Err(format!("Unknown direction: {}. Use north, east, south, or west.", s)),
        }
    }
}

/// Values sampled at the four edge-adjacent neighbors of a cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardinalNeighbors<T> {
    pub north: T,
    pub east: T,
    pub south: T,
    pub west: T,
}

impl<T> CardinalNeighbors<T> {
    /// Build by evaluating `f` for each direction
    pub fn from_fn<F: FnMut(Cardinal) -> T>(mut f: F) -> Self {
        Self {
            north: f(Cardinal::North),
            east: f(Cardinal::East),
            south: f(Cardinal::South),
            west: f(Cardinal::West),
        }
    }

    /// Apply `f` to each of the four values
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> CardinalNeighbors<U> {
        CardinalNeighbors {
            north: f(self.north),
            east: f(self.east),
            south: f(self.south),
            west: f(self.west),
        }
    }
}

impl<T> CardinalNeighbors<Option<T>> {
    /// All four values, or the first direction (clockwise from north) that is missing
    pub fn complete(self) -> Result<CardinalNeighbors<T>, Cardinal> {
        Ok(CardinalNeighbors {
            north: self.north.ok_or(Cardinal::North)?,
            east: self.east.ok_or(Cardinal::East)?,
            south: self.south.ok_or(Cardinal::South)?,
            west: self.west.ok_or(Cardinal::West)?,
        })
    }
}
