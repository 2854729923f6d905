//! Tournament points stored as whole half-points.
//!
//! Every chess result is worth 0, ½ or 1 point, so a score is kept as an
//! integer count of half-points. Arithmetic is exact and ordering is total.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Errors produced when converting a decimal into a [`Score`].
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    #[error("score must not be negative, got {0}")]
    Negative(f64),

    #[error("score must be a multiple of 0.5, got {0}")]
    NotHalfPoint(f64),
}

/// A non-negative number of points in 0.5 increments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const HALF: Score = Score(1);
    pub const ONE: Score = Score(2);

    /// Creates a score from a number of half-points.
    #[inline]
    pub const fn from_halves(halves: u32) -> Self {
        Score(halves)
    }

    /// Returns the score as a number of half-points.
    #[inline]
    pub const fn halves(self) -> u32 {
        self.0
    }

    /// Returns the score as a decimal number of points.
    #[inline]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    /// Parses a decimal point value, rejecting negatives and non-half values.
    pub fn try_from_f64(points: f64) -> Result<Self, ScoreError> {
        if points < 0.0 {
            return Err(ScoreError::Negative(points));
        }
        let halves = points * 2.0;
        if !halves.is_finite() || halves.fract() != 0.0 || halves > f64::from(u32::MAX) {
            return Err(ScoreError::NotHalfPoint(points));
        }
        Ok(Score(halves as u32))
    }

    /// Adds a signed number of half-points, returning `None` if the result
    /// would be negative or overflow.
    pub fn checked_add_halves(self, delta: i32) -> Option<Self> {
        self.0.checked_add_signed(delta).map(Score)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let points = f64::deserialize(deserializer)?;
        Score::try_from_f64(points).map_err(serde::de::Error::custom)
    }
}
