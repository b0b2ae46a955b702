use core::fmt;

use crate::error::{ErrorSeverity, GameError};

/// Errors raised while constructing geometry values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("interval minimum {min} is greater than its maximum {max}")]
    InvertedInterval { min: i32, max: i32 },
}

impl GameError for GeometryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvertedInterval { .. } => "GEOMETRY_INVERTED_INTERVAL",
        }
    }
}

/// Closed integer range `[min, max]` with `min <= max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    min: i32,
    max: i32,
}

impl Interval {
    /// Creates a new interval, rejecting inverted bounds.
    pub fn new(min: i32, max: i32) -> Result<Self, GeometryError> {
        if min > max {
            return Err(GeometryError::InvertedInterval { min, max });
        }
        Ok(Self { min, max })
    }

    /// Builds an interval from bounds that are known to be ordered.
    ///
    /// Reserved for the game's fixed range constants.
    pub(crate) const fn fixed(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn min(&self) -> i32 {
        self.min
    }

    pub const fn max(&self) -> i32 {
        self.max
    }

    pub const fn includes(&self, value: i32) -> bool {
        self.min <= value && value <= self.max
    }

    /// True when the whole interval lies strictly below `value`.
    pub const fn is_wholly_below(&self, value: i32) -> bool {
        value > self.max
    }

    /// True when the whole interval lies strictly above `value`.
    pub const fn is_wholly_above(&self, value: i32) -> bool {
        value < self.min
    }

    #[must_use]
    pub const fn with_offset(&self, offset: i32) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Smallest interval covering both operands.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Overlap of both operands, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(Self { min, max })
    }

    /// Distance from `value` to the nearest point of the interval.
    pub fn distance_to(&self, value: i32) -> i64 {
        if self.is_wholly_above(value) {
            i64::from(self.min) - i64::from(value)
        } else if self.is_wholly_below(value) {
            i64::from(value) - i64::from(self.max)
        } else {
            0
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
