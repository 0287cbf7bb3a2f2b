// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time span / interval implementation.
//!
//! This module provides:
//! - [`Interval<T>`]: generic interval over any [`TimeInstant`]
//! - [`Span`]: millisecond alias for `Interval<Instant>`
//! - [`complement_within`] and [`intersect_spans`] over sorted span lists
//!
//! Every overlap test in the crate goes through [`Interval::overlaps`], which
//! treats intervals as half-open `[start, end)`: spans that merely touch do
//! not overlap. Merging is looser and also joins touching spans, see
//! [`Interval::touches_or_overlaps`].

use crate::duration::Duration;
use crate::error::{Result, TimeError};
use crate::instant::{Instant, TimeInstant};
use chrono::{DateTime, Utc};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents an interval between two instants.
///
/// An `Interval` is defined by a start and end time instant of type `T`,
/// where `T` implements the `TimeInstant` trait. `new` does not check the
/// order of the endpoints, so a snap target may be built reversed; use
/// [`Interval::ordered`] or [`Span::try_new`] when order matters.
///
/// # Examples
///
/// ```
/// use tempoch_snap::{Duration, Instant, Span};
///
/// let span = Span::new(Instant::from_millis(1_000), Instant::from_millis(4_000));
/// assert_eq!(span.duration(), Duration::milliseconds(3_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T: TimeInstant> {
    pub start: T,
    pub end: T,
}

/// Millisecond span.
pub type Span = Interval<Instant>;

/// UTC interval alias.
pub type UtcSpan = Interval<DateTime<Utc>>;

impl<T: TimeInstant> Interval<T> {
    /// Creates a new interval between two time instants.
    pub fn new(start: T, end: T) -> Self {
        Interval { start, end }
    }

    /// Creates an interval from two instants in either order.
    pub fn ordered(a: T, b: T) -> Self {
        if b < a {
            Interval::new(b, a)
        } else {
            Interval::new(a, b)
        }
    }

    /// Returns the duration of the interval as the difference between end and start.
    pub fn duration(&self) -> T::Duration {
        self.end.difference(&self.start)
    }

    /// Whether the two intervals share a stretch of time.
    ///
    /// Half-open test: `[0, 5)` and `[5, 8)` do not overlap. A zero-width
    /// interval overlaps another only when it lies strictly inside it.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether the two intervals overlap or share an endpoint.
    #[inline]
    pub fn touches_or_overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Half-open membership: `start <= t < end`.
    #[inline]
    pub fn contains(&self, t: T) -> bool {
        self.start <= t && t < self.end
    }

    /// The smallest interval covering both, defined only when they overlap
    /// or touch.
    pub fn union(&self, other: &Self) -> Option<Self> {
        if !self.touches_or_overlaps(other) {
            return None;
        }
        let start = if self.start <= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end >= other.end {
            self.end
        } else {
            other.end
        };
        Some(Self::new(start, end))
    }

    /// Returns the overlapping sub-interval between `self` and `other`.
    ///
    /// If one interval ends exactly when the other starts, the intersection
    /// is empty and `None` is returned.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = if self.start >= other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end <= other.end {
            self.end
        } else {
            other.end
        };

        if start < end {
            Some(Self::new(start, end))
        } else {
            None
        }
    }
}

// Display implementation
impl<T: TimeInstant + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

// Specific implementation for millisecond spans
impl Interval<Instant> {
    /// Creates a span, rejecting `start > end`.
    pub fn try_new(start: Instant, end: Instant) -> Result<Self> {
        if start > end {
            return Err(TimeError::InvalidSpan { start, end });
        }
        Ok(Self::new(start, end))
    }

    /// The span of length `length` that ends at `end`.
    pub fn ending_at(end: Instant, length: Duration) -> Self {
        Self::new(end - length, end)
    }

    /// The span of length `length` that starts at `start`.
    pub fn starting_at(start: Instant, length: Duration) -> Self {
        Self::new(start, start + length)
    }

    /// Length in milliseconds, saturating.
    pub fn duration_millis(&self) -> i64 {
        self.end.millis().saturating_sub(self.start.millis())
    }

    /// Converts both endpoints to UTC, `None` if either is out of range.
    pub fn to_utc(&self) -> Option<UtcSpan> {
        Some(Interval::new(self.start.to_utc()?, self.end.to_utc()?))
    }
}

/// Returns the gaps (complement) of `spans` within the bounding `outer` span.
///
/// Given a sorted, non-overlapping list of sub-spans and a bounding span,
/// this returns the time intervals NOT covered by any sub-span. With the
/// skipped intervals as input this yields the parts of the loop span the
/// active span may occupy.
///
/// Both `outer` and every element of `spans` must have `start <= end`.
/// The function runs in O(n) time with a single pass.
pub fn complement_within<T: TimeInstant>(
    outer: Interval<T>,
    spans: &[Interval<T>],
) -> Vec<Interval<T>> {
    let mut gaps = Vec::new();
    let mut cursor = outer.start;
    for p in spans {
        if p.start > cursor {
            let end = if p.start < outer.end {
                p.start
            } else {
                outer.end
            };
            if cursor < end {
                gaps.push(Interval::new(cursor, end));
            }
        }
        if p.end > cursor {
            cursor = p.end;
        }
    }
    if cursor < outer.end {
        gaps.push(Interval::new(cursor, outer.end));
    }
    gaps
}

/// Returns the intersection of two sorted, non-overlapping span lists.
///
/// Uses an O(n+m) merge to find all overlapping stretches, in chronological
/// order.
pub fn intersect_spans<T: TimeInstant>(a: &[Interval<T>], b: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if let Some(overlap) = a[i].intersection(&b[j]) {
            result.push(overlap);
        }
        if a[i].end <= b[j].end {
            i += 1;
        } else {
            j += 1;
        }
    }
    result
}
