// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Millisecond instants on the Unix epoch axis.
//!
//! [`Instant`] is the point type every snap strategy consumes and produces.
//! It is a plain `i64` count of milliseconds, so it is `Copy`, totally
//! ordered and cheap to compare on every drag tick.
//!
//! Adding a [`Duration`] is overflow-safe: the `checked_*` methods return
//! `None` when the result leaves the `i64` range (or chrono's calendar range
//! for month/year durations), and the operator forms saturate at
//! [`Instant::MIN`] / [`Instant::MAX`].

use crate::duration::Duration;
use chrono::{DateTime, Datelike, Months, Utc};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Instant
// ═══════════════════════════════════════════════════════════════════════════

/// Milliseconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Instant(i64);

impl Instant {
    pub const EPOCH: Instant = Instant(0);
    pub const MIN: Instant = Instant(i64::MIN);
    pub const MAX: Instant = Instant(i64::MAX);

    // ── constructors / accessors ──────────────────────────────────────

    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        Instant(millis)
    }

    #[inline]
    pub const fn millis(&self) -> i64 {
        self.0
    }

    // ── UTC helpers ───────────────────────────────────────────────────

    /// Convert to a `chrono::DateTime<Utc>`.
    ///
    /// Returns `None` if the value falls outside chrono's representable range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }

    /// Build an instant from a `chrono::DateTime<Utc>`, truncating to the
    /// millisecond.
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        Instant(datetime.timestamp_millis())
    }

    // ── arithmetic ────────────────────────────────────────────────────

    /// `self + duration`, or `None` when the result is not representable.
    ///
    /// Calendar durations go through chrono month arithmetic, clamping the
    /// day of month (January 31st plus one month is the last day of
    /// February).
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use tempoch_snap::{Duration, Instant};
    ///
    /// let jan31 = Instant::from_utc(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
    /// let feb29 = Instant::from_utc(Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    /// assert_eq!(jan31.checked_add(Duration::months(1)), Some(feb29));
    /// assert_eq!(Instant::MAX.checked_add(Duration::milliseconds(1)), None);
    /// ```
    pub fn checked_add(self, duration: Duration) -> Option<Instant> {
        if duration.is_fixed() {
            let ms = duration.as_millis()?;
            return self.0.checked_add(ms).map(Instant);
        }
        let months = duration.as_months()?;
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        let utc = self.to_utc()?;
        let shifted = if months >= 0 {
            utc.checked_add_months(magnitude)?
        } else {
            utc.checked_sub_months(magnitude)?
        };
        Some(Instant::from_utc(shifted))
    }

    pub fn checked_sub(self, duration: Duration) -> Option<Instant> {
        self.checked_add(duration.negate())
    }

    /// `self + duration`, clamped to [`Instant::MIN`] / [`Instant::MAX`].
    pub fn saturating_add(self, duration: Duration) -> Instant {
        self.checked_add(duration).unwrap_or(if duration.signum() < 0 {
            Instant::MIN
        } else {
            Instant::MAX
        })
    }

    pub fn saturating_sub(self, duration: Duration) -> Instant {
        self.saturating_add(duration.negate())
    }

    /// Millisecond distance `self - earlier`, saturating.
    #[inline]
    pub const fn since(self, earlier: Instant) -> Duration {
        Duration::milliseconds(self.0.saturating_sub(earlier.0))
    }

    /// Absolute millisecond distance between two instants, saturating.
    #[inline]
    pub const fn distance(self, other: Instant) -> i64 {
        let d = self.0.abs_diff(other.0);
        if d > i64::MAX as u64 {
            i64::MAX
        } else {
            d as i64
        }
    }

    /// Largest whole number of calendar months `m` such that
    /// `origin + m months <= self`.
    ///
    /// Returns `None` when either instant lies outside chrono's range.
    pub fn months_since(self, origin: Instant) -> Option<i64> {
        let from = origin.to_utc()?;
        let to = self.to_utc()?;
        let mut months = (to.year() as i64 - from.year() as i64) * 12
            + (to.month() as i64 - from.month() as i64);
        // Day-of-month clamping can leave the estimate one month off in
        // either direction.
        while origin.checked_add(Duration::months(months))? > self {
            months -= 1;
        }
        while origin.checked_add(Duration::months(months + 1))? <= self {
            months += 1;
        }
        Some(months)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Trait implementations
// ═══════════════════════════════════════════════════════════════════════════

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_utc() {
            Some(utc) => write!(f, "{}", utc.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "{} ms", self.0),
        }
    }
}

impl Add<Duration> for Instant {
    type Output = Instant;
    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl AddAssign<Duration> for Instant {
    #[inline]
    fn add_assign(&mut self, rhs: Duration) {
        *self = self.saturating_add(rhs);
    }
}

impl Sub<Duration> for Instant {
    type Output = Instant;
    #[inline]
    fn sub(self, rhs: Duration) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl SubAssign<Duration> for Instant {
    #[inline]
    fn sub_assign(&mut self, rhs: Duration) {
        *self = self.saturating_sub(rhs);
    }
}

impl Sub for Instant {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.since(rhs)
    }
}

impl From<i64> for Instant {
    #[inline]
    fn from(millis: i64) -> Self {
        Instant(millis)
    }
}

impl From<Instant> for i64 {
    #[inline]
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

impl From<DateTime<Utc>> for Instant {
    #[inline]
    fn from(datetime: DateTime<Utc>) -> Self {
        Instant::from_utc(datetime)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TimeInstant trait
// ═══════════════════════════════════════════════════════════════════════════

/// Trait for types that represent a point in time.
///
/// Types implementing this trait can be used as endpoints of an
/// [`Interval`](crate::Interval), which the span merger and the set
/// operations are generic over.
pub trait TimeInstant: Copy + Clone + PartialEq + PartialOrd + Sized {
    /// The duration type used for arithmetic operations.
    type Duration;

    /// Convert this time instant to UTC DateTime.
    fn to_utc(&self) -> Option<DateTime<Utc>>;

    /// Create a time instant from UTC DateTime.
    fn from_utc(datetime: DateTime<Utc>) -> Self;

    /// Compute the difference between two time instants.
    fn difference(&self, other: &Self) -> Self::Duration;

    /// Add a duration to this time instant.
    fn add_duration(&self, duration: Self::Duration) -> Self;

    /// Subtract a duration from this time instant.
    fn sub_duration(&self, duration: Self::Duration) -> Self;
}

impl TimeInstant for Instant {
    type Duration = Duration;

    #[inline]
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        Instant::to_utc(self)
    }

    #[inline]
    fn from_utc(datetime: DateTime<Utc>) -> Self {
        Instant::from_utc(datetime)
    }

    #[inline]
    fn difference(&self, other: &Self) -> Self::Duration {
        *self - *other
    }

    #[inline]
    fn add_duration(&self, duration: Self::Duration) -> Self {
        *self + duration
    }

    #[inline]
    fn sub_duration(&self, duration: Self::Duration) -> Self {
        *self - duration
    }
}

impl TimeInstant for DateTime<Utc> {
    type Duration = chrono::Duration;

    fn to_utc(&self) -> Option<DateTime<Utc>> {
        Some(*self)
    }

    fn from_utc(datetime: DateTime<Utc>) -> Self {
        datetime
    }

    fn difference(&self, other: &Self) -> Self::Duration {
        *self - *other
    }

    fn add_duration(&self, duration: Self::Duration) -> Self {
        *self + duration
    }

    fn sub_duration(&self, duration: Self::Duration) -> Self {
        *self - duration
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
