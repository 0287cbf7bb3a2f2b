// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Per-call snapping configuration.
//!
//! The timeline UI reads its current state (zoom level, selected data-load
//! duration, skipped intervals, ...) into a [`SnapContext`] right before a
//! drag tick and asks it for the [`SnapFunction`] matching the handle being
//! dragged. The context is a plain value: nothing in the engine keeps it
//! around after the call.

use crate::composite::{ActiveDurationEndSnap, ActiveSpanEndSnap};
use crate::duration::Duration;
use crate::instant::Instant;
use crate::merge::IntervalSet;
use crate::snap::{DurationSnap, MaxDurationSnap, ResolutionSnap, SelectableSnap, SnapFunction};
use crate::span::{complement_within, Span};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Snapping constraints currently in effect.
///
/// # Examples
///
/// ```
/// use tempoch_snap::{Duration, Instant, RoundingMode, SnapContext};
///
/// let ctx = SnapContext::default()
///     .with_data_load_duration(Some(Duration::hours(1)))
///     .with_snap_to_data_boundaries(true);
/// let snap = ctx.loop_span_end();
/// let t = Instant::from_millis(5_400_000); // 01:30
/// assert_eq!(snap.snap(t, RoundingMode::Floor).millis(), 3_600_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnapContext {
    /// Milliseconds covered by one pixel of the timeline, if known.
    pub millis_per_pixel: Option<f64>,
    /// Pixel granularity of resolution snapping.
    pub resolution_pixels: u32,
    /// Duration of one data-load window.
    pub data_load_duration: Option<Duration>,
    pub snap_to_data_boundaries: bool,
    /// Span lengths the active span may be resized to.
    pub available_durations: Vec<Duration>,
    pub max_duration: Option<Duration>,
    /// Intervals the active span must not cover.
    pub skipped: Vec<Span>,
}

impl Default for SnapContext {
    fn default() -> Self {
        Self {
            millis_per_pixel: None,
            resolution_pixels: 1,
            data_load_duration: None,
            snap_to_data_boundaries: false,
            available_durations: Vec::new(),
            max_duration: None,
            skipped: Vec::new(),
        }
    }
}

impl SnapContext {
    pub fn new() -> Self {
        Self::default()
    }

    // ── builder ───────────────────────────────────────────────────────

    pub fn with_millis_per_pixel(mut self, millis_per_pixel: Option<f64>) -> Self {
        self.millis_per_pixel = millis_per_pixel;
        self
    }

    pub fn with_resolution_pixels(mut self, pixels: u32) -> Self {
        self.resolution_pixels = pixels;
        self
    }

    pub fn with_data_load_duration(mut self, duration: Option<Duration>) -> Self {
        self.data_load_duration = duration;
        self
    }

    pub fn with_snap_to_data_boundaries(mut self, enabled: bool) -> Self {
        self.snap_to_data_boundaries = enabled;
        self
    }

    pub fn with_available_durations<I>(mut self, durations: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        self.available_durations = durations.into_iter().collect();
        self
    }

    pub fn with_max_duration(mut self, cap: Option<Duration>) -> Self {
        self.max_duration = cap;
        self
    }

    pub fn with_skipped<I>(mut self, skipped: I) -> Self
    where
        I: IntoIterator<Item = Span>,
    {
        self.skipped = skipped.into_iter().collect();
        self
    }

    // ── queries ───────────────────────────────────────────────────────

    /// The load duration to snap to, when boundary snapping applies.
    pub fn boundary_duration(&self) -> Option<Duration> {
        self.data_load_duration
            .filter(|d| self.snap_to_data_boundaries && !d.is_zero())
    }

    /// Whether `span` overlaps any skipped interval.
    pub fn is_skipped(&self, span: &Span) -> bool {
        self.skipped.iter().any(|s| s.overlaps(span))
    }

    /// The parts of `outer` not covered by skipped intervals.
    pub fn free_windows(&self, outer: Span) -> Vec<Span> {
        let skipped: IntervalSet<Instant> = self.skipped.iter().copied().collect();
        complement_within(outer, skipped.spans())
    }

    // ── snap functions ────────────────────────────────────────────────

    /// Pixel-grid snapping, or no-op when the resolution is unusable.
    pub fn resolution_snap(&self) -> SnapFunction {
        let resolution = ResolutionSnap::new(self.millis_per_pixel, self.resolution_pixels);
        match resolution.step_millis() {
            Some(_) => SnapFunction::Resolution(resolution),
            None => SnapFunction::NoOp,
        }
    }

    /// Snapping for either end of the loop span.
    ///
    /// Data-load boundaries from the epoch when boundary snapping is on and
    /// a load duration is selected, the pixel grid otherwise.
    pub fn loop_span_end(&self) -> SnapFunction {
        match self.boundary_duration() {
            Some(duration) => SnapFunction::Duration(DurationSnap::new(Instant::EPOCH, duration)),
            None => self.resolution_snap(),
        }
    }

    /// Snapping for an end of the active span while the whole span is moved.
    pub fn active_span_end(&self, active: Span) -> SnapFunction {
        SnapFunction::ActiveSpanEnd(ActiveSpanEndSnap::new(
            self.loop_span_end(),
            active.duration(),
            self.skipped.clone(),
        ))
    }

    /// Snapping for the end of the active span being resized, `anchor` being
    /// the fixed end and `origin` the dragged end before the drag.
    pub fn active_duration_end(&self, anchor: Instant, origin: Instant) -> SnapFunction {
        let base = match self.boundary_duration() {
            Some(duration) => SnapFunction::Duration(DurationSnap::new(Instant::EPOCH, duration)),
            None => SnapFunction::Selectable(SelectableSnap::new(
                self.available_durations.clone(),
                anchor,
                origin,
            )),
        };
        let base = match self.max_duration {
            Some(cap) => SnapFunction::MaxDuration(MaxDurationSnap::new(cap, base, anchor, origin)),
            None => base,
        };
        SnapFunction::ActiveDurationEnd(ActiveDurationEndSnap::new(
            base,
            anchor,
            origin,
            self.skipped.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::RoundingMode;

    const HOUR: i64 = 3_600_000;

    fn at(ms: i64) -> Instant {
        Instant::from_millis(ms)
    }

    fn span(start: i64, end: i64) -> Span {
        Span::new(at(start), at(end))
    }

    #[test]
    fn test_default_context_is_noop() {
        let ctx = SnapContext::new();
        assert_eq!(ctx.resolution_pixels, 1);
        assert_eq!(ctx.loop_span_end(), SnapFunction::NoOp);
    }

    #[test]
    fn test_loop_span_end_prefers_data_boundaries() {
        let ctx = SnapContext::new()
            .with_millis_per_pixel(Some(1_000.0))
            .with_data_load_duration(Some(Duration::hours(1)));
        assert!(matches!(ctx.loop_span_end(), SnapFunction::Resolution(_)));

        let ctx = ctx.with_snap_to_data_boundaries(true);
        assert!(matches!(ctx.loop_span_end(), SnapFunction::Duration(_)));
        assert_eq!(
            ctx.loop_span_end().snap(at(HOUR + 5), RoundingMode::Ceiling),
            at(2 * HOUR - 1)
        );
    }

    #[test]
    fn test_zero_load_duration_falls_back_to_resolution() {
        let ctx = SnapContext::new()
            .with_millis_per_pixel(Some(10.0))
            .with_data_load_duration(Some(Duration::ZERO))
            .with_snap_to_data_boundaries(true);
        assert!(matches!(ctx.loop_span_end(), SnapFunction::Resolution(_)));
        assert_eq!(ctx.loop_span_end().snap(at(1_234), RoundingMode::Floor), at(1_230));
    }

    #[test]
    fn test_active_span_end_avoids_skipped() {
        let ctx = SnapContext::new().with_skipped([span(100, 200)]);
        let snap = ctx.active_span_end(span(20, 70));
        assert_eq!(snap.snap(at(120), RoundingMode::Floor), at(100));
        assert_eq!(snap.snap(at(120), RoundingMode::Ceiling), at(250));
    }

    #[test]
    fn test_active_duration_end_uses_selectable() {
        let ctx = SnapContext::new()
            .with_available_durations([Duration::hours(1), Duration::days(1)]);
        let snap = ctx.active_duration_end(Instant::EPOCH, at(HOUR));
        assert_eq!(snap.snap(at(25 * HOUR), RoundingMode::Floor), at(24 * HOUR));
    }

    #[test]
    fn test_active_duration_end_uses_boundaries() {
        let ctx = SnapContext::new()
            .with_available_durations([Duration::days(1)])
            .with_data_load_duration(Some(Duration::hours(6)))
            .with_snap_to_data_boundaries(true);
        let snap = ctx.active_duration_end(Instant::EPOCH, at(HOUR));
        assert_eq!(snap.snap(at(7 * HOUR), RoundingMode::Floor), at(6 * HOUR));
    }

    #[test]
    fn test_active_duration_end_applies_cap() {
        let ctx = SnapContext::new()
            .with_available_durations([Duration::hours(1), Duration::days(1)])
            .with_max_duration(Some(Duration::hours(12)));
        let snap = ctx.active_duration_end(Instant::EPOCH, at(HOUR));
        assert_eq!(snap.snap(at(25 * HOUR), RoundingMode::Ceiling), at(12 * HOUR));
    }

    #[test]
    fn test_active_duration_end_refuses_skipped() {
        let ctx = SnapContext::new()
            .with_available_durations([Duration::hours(1), Duration::days(1)])
            .with_skipped([span(10 * HOUR, 11 * HOUR)]);
        let snap = ctx.active_duration_end(Instant::EPOCH, at(HOUR));
        assert_eq!(snap.snap(at(25 * HOUR), RoundingMode::Ceiling), at(HOUR));
    }

    #[test]
    fn test_is_skipped() {
        let ctx = SnapContext::new().with_skipped([span(100, 200)]);
        assert!(ctx.is_skipped(&span(150, 250)));
        assert!(!ctx.is_skipped(&span(200, 250)));
    }

    #[test]
    fn test_free_windows_merges_unsorted_skipped() {
        let ctx = SnapContext::new().with_skipped([span(60, 80), span(10, 20), span(15, 30)]);
        assert_eq!(
            ctx.free_windows(span(0, 100)),
            vec![span(0, 10), span(30, 60), span(80, 100)]
        );
    }
}
