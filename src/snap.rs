// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Snap strategies.
//!
//! Every strategy answers the same question: given the instant a handle was
//! dragged to and a [`RoundingMode`], where should the boundary actually
//! land? [`SnapFunction`] is the closed set of strategies; its
//! [`snap`](SnapFunction::snap) method is the single dispatch point.
//!
//! | Variant | Policy |
//! |---------|--------|
//! | [`SnapFunction::NoOp`] | leave the time alone |
//! | [`SnapFunction::Resolution`] | round to the pixel grid |
//! | [`SnapFunction::Duration`] | round to multiples of a duration from a reference |
//! | [`SnapFunction::Selectable`] | pick one of a set of allowed span lengths |
//! | [`SnapFunction::MaxDuration`] | delegate, then clamp to a maximum length |
//! | [`SnapFunction::ActiveSpanEnd`] | translate the active span around skipped intervals |
//! | [`SnapFunction::ActiveDurationEnd`] | resize the active span, refusing skipped intervals |
//!
//! All strategies are pure and total. `Floor` and `Ceiling` are idempotent:
//! snapping an already snapped instant in the same mode returns it unchanged.

use crate::composite::{ActiveDurationEndSnap, ActiveSpanEndSnap};
use crate::duration::Duration;
use crate::instant::Instant;
use crate::round::RoundingMode;
use qtty::Seconds;
use std::cmp::Ordering;

// ═══════════════════════════════════════════════════════════════════════════
// SnapFunction
// ═══════════════════════════════════════════════════════════════════════════

/// A snapping strategy, possibly composed of other strategies.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SnapFunction {
    #[default]
    NoOp,
    Resolution(ResolutionSnap),
    Duration(DurationSnap),
    Selectable(SelectableSnap),
    MaxDuration(MaxDurationSnap),
    ActiveSpanEnd(ActiveSpanEndSnap),
    ActiveDurationEnd(ActiveDurationEndSnap),
}

impl SnapFunction {
    /// The instant `time` snaps to under `mode`.
    pub fn snap(&self, time: Instant, mode: RoundingMode) -> Instant {
        match self {
            SnapFunction::NoOp => time,
            SnapFunction::Resolution(s) => s.snap(time, mode),
            SnapFunction::Duration(s) => s.snap(time, mode),
            SnapFunction::Selectable(s) => s.snap(time, mode),
            SnapFunction::MaxDuration(s) => s.snap(time, mode),
            SnapFunction::ActiveSpanEnd(s) => s.snap(time, mode),
            SnapFunction::ActiveDurationEnd(s) => s.snap(time, mode),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Resolution
// ═══════════════════════════════════════════════════════════════════════════

/// Rounds to a grid of `pixels * millis_per_pixel` milliseconds anchored at
/// the epoch.
///
/// A missing, zero, negative or non-finite resolution makes this a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionSnap {
    pub millis_per_pixel: Option<f64>,
    pub pixels: u32,
}

impl ResolutionSnap {
    pub fn new(millis_per_pixel: Option<f64>, pixels: u32) -> Self {
        Self {
            millis_per_pixel,
            pixels,
        }
    }

    /// Builds the grid from a per-pixel [`Seconds`] quantity.
    pub fn from_seconds_per_pixel(seconds: Seconds, pixels: u32) -> Self {
        Self::new(Some(seconds.value() * 1_000.0), pixels)
    }

    /// Grid step in whole milliseconds, `None` when snapping is disabled.
    pub fn step_millis(&self) -> Option<i64> {
        let mpp = self.millis_per_pixel.filter(|v| v.is_finite() && *v > 0.0)?;
        let step = (f64::from(self.pixels) * mpp).round();
        (step >= 1.0 && step < i64::MAX as f64).then_some(step as i64)
    }

    pub fn snap(&self, time: Instant, mode: RoundingMode) -> Instant {
        match self.step_millis() {
            Some(step) => Instant::from_millis(mode.round_to_multiple(time.millis(), step)),
            None => time,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Duration
// ═══════════════════════════════════════════════════════════════════════════

/// Rounds to whole multiples of `duration` counted from `reference`.
///
/// `Floor` lands on the start of the containing bucket and `Ceiling` on its
/// last millisecond; `HalfUp` picks whichever bucket boundary is nearer.
/// Month and year durations count calendar months instead of dividing
/// milliseconds. The sign of `duration` is ignored; a zero duration is a
/// no-op.
///
/// # Examples
///
/// ```
/// use tempoch_snap::{Duration, DurationSnap, Instant, RoundingMode};
///
/// let snap = DurationSnap::new(Instant::EPOCH, Duration::seconds(1));
/// let t = Instant::from_millis(2_500);
/// assert_eq!(snap.snap(t, RoundingMode::Floor).millis(), 2_000);
/// assert_eq!(snap.snap(t, RoundingMode::Ceiling).millis(), 2_999);
/// assert_eq!(snap.snap(t, RoundingMode::HalfUp).millis(), 3_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationSnap {
    pub reference: Instant,
    pub duration: Duration,
}

impl DurationSnap {
    pub fn new(reference: Instant, duration: Duration) -> Self {
        Self {
            reference,
            duration,
        }
    }

    /// The bucket `[lo, hi)` containing `time`.
    pub fn bucket(&self, time: Instant) -> Option<(Instant, Instant)> {
        let step = self.duration.abs();
        if step.is_zero() {
            return None;
        }
        if let Some(step_ms) = step.as_millis() {
            let delta = i128::from(time.millis()) - i128::from(self.reference.millis());
            let lo = i128::from(time.millis()) - delta.rem_euclid(i128::from(step_ms));
            let lo = Instant::from_millis(i64::try_from(lo).ok()?);
            return Some((lo, lo.checked_add(step)?));
        }
        let step_months = step.as_months()?;
        let months = time.months_since(self.reference)?;
        let floor = months - months.rem_euclid(step_months);
        let lo = self.reference.checked_add(Duration::months(floor))?;
        let hi = self
            .reference
            .checked_add(Duration::months(floor.checked_add(step_months)?))?;
        Some((lo, hi))
    }

    pub fn snap(&self, time: Instant, mode: RoundingMode) -> Instant {
        let Some((lo, hi)) = self.bucket(time) else {
            return time;
        };
        match mode {
            RoundingMode::Floor => lo,
            RoundingMode::Ceiling => hi - Duration::milliseconds(1),
            RoundingMode::HalfUp if time.distance(lo) >= hi.distance(time) => hi,
            RoundingMode::HalfUp => lo,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Selectable
// ═══════════════════════════════════════════════════════════════════════════

/// Snaps the moving end of a span so the span length is one of `available`.
///
/// `anchor` is the fixed end and `origin` the moving end before the drag.
/// When the drag lengthens the span the largest allowed length not beyond
/// the dragged position is chosen; when it shortens, the smallest allowed
/// length not below it. Lengths are given the sign of `origin - anchor`.
/// Durations that cannot be compared with a millisecond length are skipped.
///
/// If nothing qualifies the result is `origin`. `Floor` also returns
/// `origin` when the snapped end would be farther from it than the dragged
/// position, and `HalfUp` when it would be more than twice as far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableSnap {
    pub available: Vec<Duration>,
    pub anchor: Instant,
    pub origin: Instant,
}

impl SelectableSnap {
    pub fn new(available: Vec<Duration>, anchor: Instant, origin: Instant) -> Self {
        Self {
            available,
            anchor,
            origin,
        }
    }

    /// The allowed length the drag to `time` selects, sign-matched.
    pub fn select(&self, time: Instant) -> Option<Duration> {
        let start = self.origin - self.anchor;
        let candidate = time - self.anchor;
        let sign = match start.signum() {
            0 => candidate.signum(),
            s => s,
        };
        // Orders durations by magnitude along the drag direction.
        let along = |ord: Ordering| if sign < 0 { ord.reverse() } else { ord };
        let lengthening = along(candidate.compare(&start).ok()?) != Ordering::Less;

        let mut best: Option<Duration> = None;
        for d in &self.available {
            let d = d.with_sign(sign);
            if d.is_zero() {
                continue;
            }
            let fits = match d.compare(&candidate) {
                Ok(ord) if lengthening => along(ord) != Ordering::Greater,
                Ok(ord) => along(ord) != Ordering::Less,
                Err(err) => {
                    tracing::debug!(duration = %d, %err, "skipping inconvertible snap duration");
                    continue;
                }
            };
            if !fits {
                continue;
            }
            let better = match best {
                None => true,
                Some(b) => match d.compare(&b) {
                    Ok(ord) if lengthening => along(ord) == Ordering::Greater,
                    Ok(ord) => along(ord) == Ordering::Less,
                    Err(_) => false,
                },
            };
            if better {
                best = Some(d);
            }
        }
        best
    }

    pub fn snap(&self, time: Instant, mode: RoundingMode) -> Instant {
        let Some(length) = self.select(time) else {
            tracing::debug!(%time, "no selectable duration qualifies");
            return self.origin;
        };
        let destination = self.anchor + length;
        let snapped = i128::from(destination.distance(self.origin));
        let raw = i128::from(time.distance(self.origin));
        match mode {
            RoundingMode::Floor if snapped > raw => self.origin,
            RoundingMode::HalfUp if snapped > 2 * raw => self.origin,
            RoundingMode::Floor | RoundingMode::Ceiling | RoundingMode::HalfUp => destination,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MaxDuration
// ═══════════════════════════════════════════════════════════════════════════

/// Delegates to `wrapped`, then limits the span between `anchor` and the
/// result to `cap`.
///
/// The cap takes the sign of `origin - anchor`. A result that cannot be
/// compared with the cap (a calendar cap against a millisecond length) is
/// clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxDurationSnap {
    pub cap: Duration,
    pub wrapped: Box<SnapFunction>,
    pub anchor: Instant,
    pub origin: Instant,
}

impl MaxDurationSnap {
    pub fn new(cap: Duration, wrapped: SnapFunction, anchor: Instant, origin: Instant) -> Self {
        Self {
            cap,
            wrapped: Box::new(wrapped),
            anchor,
            origin,
        }
    }

    pub fn snap(&self, time: Instant, mode: RoundingMode) -> Instant {
        let end = self.wrapped.snap(time, mode);
        let implied = end - self.anchor;
        let sign = match (self.origin - self.anchor).signum() {
            0 => implied.signum(),
            s => s,
        };
        let exceeds = match implied.abs().compare(&self.cap.abs()) {
            Ok(ord) => ord == Ordering::Greater,
            Err(err) => {
                tracing::debug!(cap = %self.cap, %err, "clamping to incomparable cap");
                true
            }
        };
        if exceeds {
            self.anchor + self.cap.with_sign(sign)
        } else {
            end
        }
    }
}
