//! Tick-based time spans.
//!
//! Keyframe times and clip durations are stored as signed 100-nanosecond
//! ticks, exactly as they appear in the binary asset layout. Integer ticks
//! give keyframe ordering an exact total order, which floating-point seconds
//! would not.

use std::fmt;
use std::ops::{Add, Sub};

/// Number of ticks in one second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// A signed time span measured in 100-nanosecond ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpan(i64);

impl TimeSpan {
    pub const ZERO: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self(ticks)
    }

    /// Converts seconds to ticks, truncating toward zero.
    #[inline]
    #[must_use]
    pub fn from_secs_f64(seconds: f64) -> Self {
        Self((seconds * TICKS_PER_SECOND as f64) as i64)
    }

    #[inline]
    #[must_use]
    pub fn from_secs_f32(seconds: f32) -> Self {
        Self::from_secs_f64(f64::from(seconds))
    }

    #[inline]
    #[must_use]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    #[inline]
    #[must_use]
    pub fn as_secs_f32(self) -> f32 {
        self.as_secs_f64() as f32
    }

    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Add for TimeSpan {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for TimeSpan {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}s", self.as_secs_f64())
    }
}
