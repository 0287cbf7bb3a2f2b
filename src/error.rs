// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error type shared by the duration, span and rounding modules.

use crate::duration::TimeUnit;
use crate::instant::Instant;
use thiserror::Error;

/// Failures raised by fallible time arithmetic.
///
/// The snap engine itself never returns these: inconvertible comparisons are
/// caught where they happen and turned into "candidate rejected" or "clamp".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// A fixed-length duration was combined with a calendar-relative one.
    #[error("cannot convert between {lhs} and {rhs}")]
    InconvertibleUnits { lhs: TimeUnit, rhs: TimeUnit },

    /// The result does not fit in a millisecond `i64`.
    #[error("time arithmetic overflowed")]
    Overflow,

    /// A span whose start is after its end.
    #[error("invalid span: start {start} is after end {end}")]
    InvalidSpan { start: Instant, end: Instant },

    #[error("unsupported rounding mode: {0:?}")]
    UnsupportedRoundingMode(String),
}

pub type Result<T> = std::result::Result<T, TimeError>;
