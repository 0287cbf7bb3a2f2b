// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Timeline snapping engine
//!
//! This crate decides where a dragged timeline handle should land. Given a
//! candidate [`Instant`] and a [`RoundingMode`], a [`SnapFunction`] honours
//! any mix of pixel resolution, duration multiples, a set of allowed span
//! lengths, a maximum length and a set of skipped intervals. It also merges
//! load intervals into a minimal sorted list.
//!
//! # Core types
//!
//! - [`Instant`] — millisecond timestamp on the Unix epoch axis.
//! - [`Duration`] — signed amount tagged with a [`TimeUnit`]; month and year
//!   durations are calendar relative.
//! - [`Interval<T>`] — a generic interval over any [`TimeInstant`].
//! - [`Span`] — type alias for `Interval<Instant>`.
//! - [`SnapFunction`] — closed set of snap strategies.
//! - [`SnapContext`] — the constraints in effect for one drag tick.
//! - [`IntervalSet`] — sorted disjoint spans that merge on insertion.
//!
//! # Snap strategies
//!
//! | Strategy | Type |
//! |----------|------|
//! | pixel grid | [`ResolutionSnap`] |
//! | duration multiples | [`DurationSnap`] |
//! | allowed span lengths | [`SelectableSnap`] |
//! | maximum span length | [`MaxDurationSnap`] |
//! | translate around skipped intervals | [`ActiveSpanEndSnap`] |
//! | resize refusing skipped intervals | [`ActiveDurationEndSnap`] |
//!
//! # Interval conventions
//!
//! Overlap is half-open: `[0, 5)` and `[5, 8)` do not overlap, so a span
//! may end exactly where a skipped interval starts. Merging also joins
//! spans that only touch.
//!
//! # Logging
//!
//! The engine emits [`tracing`] events (debug when a candidate is rejected,
//! warn if skipped-interval avoidance hits its pass limit) and installs no
//! subscriber of its own.

mod composite;
mod context;
mod duration;
mod error;
pub(crate) mod instant;
mod merge;
mod round;
mod snap;
pub(crate) mod span;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use composite::{avoid_skipped, ActiveDurationEndSnap, ActiveSpanEndSnap};
pub use context::SnapContext;
pub use duration::{Duration, TimeUnit};
pub use error::{Result, TimeError};
pub use instant::{Instant, TimeInstant};
pub use merge::{merge_spans, replacements, IntervalSet, Replacement};
pub use round::RoundingMode;
pub use snap::{DurationSnap, MaxDurationSnap, ResolutionSnap, SelectableSnap, SnapFunction};
pub use span::{complement_within, intersect_spans, Interval, Span, UtcSpan};
