// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Composite snap functions for the active span.
//!
//! Both wrap a base strategy and add the skipped-interval rule:
//!
//! - [`ActiveSpanEndSnap`] moves the whole active span (its length is
//!   fixed) and searches outward for the nearest placement that clears every
//!   skipped interval.
//! - [`ActiveDurationEndSnap`] moves one end with the other anchored and
//!   simply refuses a result that would cover a skipped interval.

use crate::duration::Duration;
use crate::instant::Instant;
use crate::round::RoundingMode;
use crate::snap::SnapFunction;
use crate::span::Span;

/// Pushes two probe spans of length `length`, both initially ending at
/// `candidate`, away from every skipped interval they overlap.
///
/// Returns `(left, right)`: `left` only ever moves earlier (its end lands on
/// a skipped start), `right` only later (its start lands on a skipped end).
/// Neither overlaps any span in `skipped` on return.
///
/// # Examples
///
/// ```
/// use tempoch_snap::{avoid_skipped, Duration, Instant, Span};
///
/// let skipped = [Span::new(Instant::from_millis(100), Instant::from_millis(200))];
/// let (left, right) = avoid_skipped(Instant::from_millis(120), Duration::milliseconds(50), &skipped);
/// assert_eq!(left.end, Instant::from_millis(100));
/// assert_eq!(right, Span::new(Instant::from_millis(200), Instant::from_millis(250)));
/// ```
pub fn avoid_skipped(candidate: Instant, length: Duration, skipped: &[Span]) -> (Span, Span) {
    let length = length.abs();
    let mut left = Span::ending_at(candidate, length);
    let mut right = left;

    // Each skipped interval can push each probe at most once.
    for _ in 0..=2 * skipped.len() {
        let mut moved = false;
        for s in skipped {
            if s.overlaps(&left) {
                left = Span::ending_at(s.start, length);
                moved = true;
            }
            if s.overlaps(&right) {
                right = Span::starting_at(s.end, length);
                moved = true;
            }
        }
        if !moved {
            return (left, right);
        }
    }

    tracing::warn!(
        %candidate,
        skipped = skipped.len(),
        "skipped-interval avoidance did not settle"
    );
    (left, right)
}

// ═══════════════════════════════════════════════════════════════════════════
// ActiveSpanEnd
// ═══════════════════════════════════════════════════════════════════════════

/// Snaps the end of the active span while it is translated.
///
/// `base` snaps the raw time; the span `[candidate - span_duration,
/// candidate]` is then moved clear of `skipped`. `Floor` takes the earlier
/// placement, `Ceiling` the later one, and `HalfUp` the one whose end is
/// nearer the candidate (ties go to the earlier).
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSpanEndSnap {
    pub base: Box<SnapFunction>,
    pub span_duration: Duration,
    pub skipped: Vec<Span>,
}

impl ActiveSpanEndSnap {
    pub fn new(base: SnapFunction, span_duration: Duration, skipped: Vec<Span>) -> Self {
        Self {
            base: Box::new(base),
            span_duration,
            skipped,
        }
    }

    pub fn snap(&self, time: Instant, mode: RoundingMode) -> Instant {
        let candidate = self.base.snap(time, mode);
        if self.skipped.is_empty() {
            return candidate;
        }
        let (left, right) = avoid_skipped(candidate, self.span_duration, &self.skipped);
        match mode {
            RoundingMode::Floor => left.end,
            RoundingMode::Ceiling => right.end,
            RoundingMode::HalfUp if candidate.distance(left.end) > right.end.distance(candidate) => {
                right.end
            }
            RoundingMode::HalfUp => left.end,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ActiveDurationEnd
// ═══════════════════════════════════════════════════════════════════════════

/// Snaps one end of the active span while the other end, `anchor`, stays put.
///
/// If the span between `anchor` and the snapped end overlaps a skipped
/// interval the drag is refused and `origin` (the end before the drag) is
/// returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDurationEndSnap {
    pub base: Box<SnapFunction>,
    pub anchor: Instant,
    pub origin: Instant,
    pub skipped: Vec<Span>,
}

impl ActiveDurationEndSnap {
    pub fn new(base: SnapFunction, anchor: Instant, origin: Instant, skipped: Vec<Span>) -> Self {
        Self {
            base: Box::new(base),
            anchor,
            origin,
            skipped,
        }
    }

    pub fn snap(&self, time: Instant, mode: RoundingMode) -> Instant {
        let candidate = self.base.snap(time, mode);
        let span = Span::ordered(self.anchor, candidate);
        match self.skipped.iter().find(|s| s.overlaps(&span)) {
            Some(blocking) => {
                tracing::debug!(%candidate, %blocking, "resize refused by skipped interval");
                self.origin
            }
            None => candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::{DurationSnap, SelectableSnap};

    fn at(ms: i64) -> Instant {
        Instant::from_millis(ms)
    }

    fn span(start: i64, end: i64) -> Span {
        Span::new(at(start), at(end))
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    #[test]
    fn test_avoid_single_skipped_interval() {
        let (left, right) = avoid_skipped(at(120), ms(50), &[span(100, 200)]);
        assert_eq!(left, span(50, 100));
        assert_eq!(right, span(200, 250));
    }

    #[test]
    fn test_avoid_without_overlap_keeps_candidate() {
        let (left, right) = avoid_skipped(at(90), ms(50), &[span(100, 200)]);
        assert_eq!(left, span(40, 90));
        assert_eq!(right, left);
    }

    #[test]
    fn test_avoid_touching_is_not_overlap() {
        let (left, right) = avoid_skipped(at(100), ms(50), &[span(100, 200)]);
        assert_eq!(left, span(50, 100));
        assert_eq!(right, span(50, 100));
    }

    #[test]
    fn test_avoid_chained_intervals() {
        // Gaps between skipped intervals are too narrow for the span.
        let skipped = [span(100, 200), span(220, 300), span(60, 90)];
        let (left, right) = avoid_skipped(at(150), ms(50), &skipped);
        assert_eq!(left, span(10, 60));
        assert_eq!(right, span(300, 350));
        for s in &skipped {
            assert!(!s.overlaps(&left));
            assert!(!s.overlaps(&right));
        }
    }

    #[test]
    fn test_avoid_zero_length_span() {
        let (left, right) = avoid_skipped(at(150), ms(0), &[span(100, 200)]);
        assert_eq!(left, span(100, 100));
        assert_eq!(right, span(200, 200));
    }

    #[test]
    fn test_active_span_end_modes() {
        let snap = ActiveSpanEndSnap::new(SnapFunction::NoOp, ms(50), vec![span(100, 200)]);
        assert_eq!(snap.snap(at(120), RoundingMode::Floor), at(100));
        assert_eq!(snap.snap(at(120), RoundingMode::Ceiling), at(250));
        assert_eq!(snap.snap(at(120), RoundingMode::HalfUp), at(100));
        // Candidate 190: left end 100 (90 away), right end 250 (60 away).
        assert_eq!(snap.snap(at(190), RoundingMode::HalfUp), at(250));
    }

    #[test]
    fn test_active_span_end_half_up_tie_goes_left() {
        // Candidate 175: left end 100 (75 away), right end 250 (75 away).
        let snap = ActiveSpanEndSnap::new(SnapFunction::NoOp, ms(50), vec![span(100, 200)]);
        assert_eq!(snap.snap(at(175), RoundingMode::HalfUp), at(100));
    }

    #[test]
    fn test_active_span_end_applies_base_first() {
        let base = SnapFunction::Duration(DurationSnap::new(Instant::EPOCH, ms(100)));
        let snap = ActiveSpanEndSnap::new(base, ms(50), vec![span(180, 260)]);
        // 230 floors to 200, which lands inside the skipped interval.
        assert_eq!(snap.snap(at(230), RoundingMode::Floor), at(180));
        // 30 ceils to 99, clear of everything.
        assert_eq!(snap.snap(at(30), RoundingMode::Ceiling), at(99));
    }

    #[test]
    fn test_active_span_end_without_skipped() {
        let snap = ActiveSpanEndSnap::new(SnapFunction::NoOp, ms(50), vec![]);
        for mode in RoundingMode::ALL {
            assert_eq!(snap.snap(at(123), mode), at(123));
        }
    }

    #[test]
    fn test_active_duration_end_refuses_skipped() {
        let base = SnapFunction::Selectable(SelectableSnap::new(
            vec![ms(100), ms(300)],
            at(0),
            at(100),
        ));
        let snap = ActiveDurationEndSnap::new(base, at(0), at(100), vec![span(150, 200)]);
        assert_eq!(snap.snap(at(350), RoundingMode::Ceiling), at(100));
    }

    #[test]
    fn test_active_duration_end_accepts_clear_span() {
        let base = SnapFunction::Selectable(SelectableSnap::new(
            vec![ms(100), ms(300)],
            at(0),
            at(100),
        ));
        let snap = ActiveDurationEndSnap::new(base, at(0), at(100), vec![span(400, 500)]);
        assert_eq!(snap.snap(at(350), RoundingMode::Ceiling), at(300));
    }

    #[test]
    fn test_active_duration_end_checks_reversed_span() {
        let snap = ActiveDurationEndSnap::new(
            SnapFunction::NoOp,
            at(500),
            at(450),
            vec![span(100, 200)],
        );
        assert_eq!(snap.snap(at(150), RoundingMode::Floor), at(450));
        assert_eq!(snap.snap(at(250), RoundingMode::Floor), at(250));
    }
}
