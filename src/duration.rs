// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Unit-tagged signed durations.
//!
//! A [`Duration`] keeps the unit it was written in. Units from
//! [`TimeUnit::Millisecond`] to [`TimeUnit::Week`] have a fixed length in
//! milliseconds; [`TimeUnit::Month`] and [`TimeUnit::Year`] are calendar
//! relative and only make sense once anchored to an [`Instant`].
//!
//! Two durations are *convertible* when they belong to the same family:
//! both fixed (compared in milliseconds) or both calendar (compared in
//! months, with one year being twelve months). Mixing families fails with
//! [`TimeError::InconvertibleUnits`].
//!
//! [`Instant`]: crate::Instant

use crate::error::{Result, TimeError};
use qtty::{Day, Days, Second, Seconds};
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// TimeUnit
// ═══════════════════════════════════════════════════════════════════════════

/// The unit a [`Duration`] amount is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Length of one unit in milliseconds, `None` for calendar units.
    pub const fn fixed_millis(self) -> Option<i64> {
        match self {
            TimeUnit::Millisecond => Some(1),
            TimeUnit::Second => Some(1_000),
            TimeUnit::Minute => Some(60_000),
            TimeUnit::Hour => Some(3_600_000),
            TimeUnit::Day => Some(86_400_000),
            TimeUnit::Week => Some(604_800_000),
            TimeUnit::Month | TimeUnit::Year => None,
        }
    }

    /// Length of one unit in months, `None` for fixed units.
    pub const fn calendar_months(self) -> Option<i64> {
        match self {
            TimeUnit::Month => Some(1),
            TimeUnit::Year => Some(12),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_fixed(self) -> bool {
        self.fixed_millis().is_some()
    }

    const fn label(self, plural: bool) -> &'static str {
        match (self, plural) {
            (TimeUnit::Millisecond, false) => "millisecond",
            (TimeUnit::Millisecond, true) => "milliseconds",
            (TimeUnit::Second, false) => "second",
            (TimeUnit::Second, true) => "seconds",
            (TimeUnit::Minute, false) => "minute",
            (TimeUnit::Minute, true) => "minutes",
            (TimeUnit::Hour, false) => "hour",
            (TimeUnit::Hour, true) => "hours",
            (TimeUnit::Day, false) => "day",
            (TimeUnit::Day, true) => "days",
            (TimeUnit::Week, false) => "week",
            (TimeUnit::Week, true) => "weeks",
            (TimeUnit::Month, false) => "month",
            (TimeUnit::Month, true) => "months",
            (TimeUnit::Year, false) => "year",
            (TimeUnit::Year, true) => "years",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label(true))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════════════════════════════════════

/// A signed amount of a [`TimeUnit`].
///
/// Equality is structural: `60 seconds` and `1 minute` are different values
/// that [`compare`](Duration::compare) as equal.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use tempoch_snap::{Duration, TimeError, TimeUnit};
///
/// let hour = Duration::hours(1);
/// assert_eq!(hour.compare(&Duration::minutes(60)), Ok(Ordering::Equal));
/// assert_eq!(Duration::years(1).compare(&Duration::months(13)), Ok(Ordering::Less));
/// assert_eq!(
///     hour.compare(&Duration::months(1)),
///     Err(TimeError::InconvertibleUnits { lhs: TimeUnit::Hour, rhs: TimeUnit::Month })
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Duration {
    amount: i64,
    unit: TimeUnit,
}

/// Base representation used for comparisons and mixed-unit arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    Millis(i128),
    Months(i128),
}

impl Duration {
    pub const ZERO: Duration = Duration::milliseconds(0);

    // ── constructors ──────────────────────────────────────────────────

    #[inline]
    pub const fn new(amount: i64, unit: TimeUnit) -> Self {
        Self { amount, unit }
    }

    pub const fn milliseconds(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Millisecond)
    }

    pub const fn seconds(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Second)
    }

    pub const fn minutes(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Minute)
    }

    pub const fn hours(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Hour)
    }

    pub const fn days(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Day)
    }

    pub const fn weeks(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Week)
    }

    pub const fn months(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Month)
    }

    pub const fn years(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Year)
    }

    // ── accessors ─────────────────────────────────────────────────────

    #[inline]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    #[inline]
    pub const fn unit(&self) -> TimeUnit {
        self.unit
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    #[inline]
    pub const fn is_fixed(&self) -> bool {
        self.unit.is_fixed()
    }

    /// `-1`, `0` or `1` following the sign of the amount.
    #[inline]
    pub const fn signum(&self) -> i64 {
        self.amount.signum()
    }

    // ── sign manipulation ─────────────────────────────────────────────

    /// Flips the sign. `d.negate().negate() == d` for every amount above
    /// `i64::MIN`, which saturates.
    #[inline]
    pub const fn negate(self) -> Self {
        Self::new(self.amount.saturating_neg(), self.unit)
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self::new(self.amount.saturating_abs(), self.unit)
    }

    /// Same magnitude, sign taken from `sign` (zero keeps it positive).
    pub const fn with_sign(self, sign: i64) -> Self {
        if sign < 0 {
            self.abs().negate()
        } else {
            self.abs()
        }
    }

    // ── conversions ───────────────────────────────────────────────────

    /// Length in milliseconds, `None` for calendar units or on overflow.
    pub fn as_millis(&self) -> Option<i64> {
        self.unit
            .fixed_millis()
            .and_then(|ms| self.amount.checked_mul(ms))
    }

    /// Length in milliseconds, failing for calendar units.
    pub fn to_millis(&self) -> Result<i64> {
        let per_unit = self
            .unit
            .fixed_millis()
            .ok_or(TimeError::InconvertibleUnits {
                lhs: self.unit,
                rhs: TimeUnit::Millisecond,
            })?;
        self.amount
            .checked_mul(per_unit)
            .ok_or(TimeError::Overflow)
    }

    /// Length in whole months, `None` for fixed units or on overflow.
    pub fn as_months(&self) -> Option<i64> {
        self.unit
            .calendar_months()
            .and_then(|m| self.amount.checked_mul(m))
    }

    /// Length as a [`Seconds`] quantity, `None` for calendar units.
    pub fn as_seconds(&self) -> Option<Seconds> {
        self.as_millis().map(|ms| Seconds::new(ms as f64 / 1_000.0))
    }

    /// Length as a [`Days`] quantity, `None` for calendar units.
    pub fn as_days(&self) -> Option<Days> {
        self.as_seconds().map(|s| s.to::<Day>())
    }

    fn base(&self) -> Base {
        let amount = i128::from(self.amount);
        match self.unit.fixed_millis() {
            Some(ms) => Base::Millis(amount * i128::from(ms)),
            None => Base::Months(amount * i128::from(self.unit.calendar_months().unwrap_or(1))),
        }
    }

    // ── comparison & arithmetic ───────────────────────────────────────

    pub fn is_convertible_with(&self, other: &Duration) -> bool {
        self.is_fixed() == other.is_fixed()
    }

    /// Orders two durations of the same family.
    pub fn compare(&self, other: &Duration) -> Result<Ordering> {
        match (self.base(), other.base()) {
            (Base::Millis(a), Base::Millis(b)) | (Base::Months(a), Base::Months(b)) => Ok(a.cmp(&b)),
            _ => Err(self.inconvertible(other)),
        }
    }

    /// Sum of two durations of the same family.
    ///
    /// Keeps the unit when both share it; otherwise the result is expressed
    /// in milliseconds (fixed) or months (calendar).
    pub fn checked_add(&self, other: &Duration) -> Result<Duration> {
        if self.unit == other.unit {
            let amount = self
                .amount
                .checked_add(other.amount)
                .ok_or(TimeError::Overflow)?;
            return Ok(Duration::new(amount, self.unit));
        }
        let (sum, unit) = match (self.base(), other.base()) {
            (Base::Millis(a), Base::Millis(b)) => (a + b, TimeUnit::Millisecond),
            (Base::Months(a), Base::Months(b)) => (a + b, TimeUnit::Month),
            _ => return Err(self.inconvertible(other)),
        };
        let amount = i64::try_from(sum).map_err(|_| TimeError::Overflow)?;
        Ok(Duration::new(amount, unit))
    }

    pub fn checked_sub(&self, other: &Duration) -> Result<Duration> {
        self.checked_add(&other.negate())
    }

    fn inconvertible(&self, other: &Duration) -> TimeError {
        TimeError::InconvertibleUnits {
            lhs: self.unit,
            rhs: other.unit,
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::ZERO
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.amount,
            self.unit.label(self.amount.unsigned_abs() != 1)
        )
    }
}

// ── qtty interop ──────────────────────────────────────────────────────────

impl From<Seconds> for Duration {
    /// Rounds to the nearest millisecond.
    fn from(seconds: Seconds) -> Self {
        Duration::milliseconds((seconds.value() * 1_000.0).round() as i64)
    }
}

impl From<Days> for Duration {
    fn from(days: Days) -> Self {
        Duration::from(days.to::<Second>())
    }
}
