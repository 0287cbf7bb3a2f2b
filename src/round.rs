// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Rounding direction used by every snap strategy.

use crate::error::TimeError;
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which side of a snap boundary to pick.
///
/// # Examples
///
/// ```
/// use tempoch_snap::RoundingMode;
///
/// let mode: RoundingMode = "half-up".parse().unwrap();
/// assert_eq!(mode, RoundingMode::HalfUp);
/// assert!("half-even".parse::<RoundingMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingMode {
    /// Toward negative infinity (the earlier boundary).
    Floor,
    /// Toward positive infinity (the later boundary).
    Ceiling,
    /// To the nearest boundary, ties toward the later one.
    HalfUp,
}

impl RoundingMode {
    pub const ALL: [RoundingMode; 3] = [Self::Floor, Self::Ceiling, Self::HalfUp];

    /// Rounds `value` to a multiple of `step` (`step > 0`).
    ///
    /// Uses Euclidean division so negative values floor toward negative
    /// infinity. Saturates instead of overflowing near the `i64` bounds.
    pub(crate) fn round_to_multiple(self, value: i64, step: i64) -> i64 {
        debug_assert!(step > 0);
        let rem = value.rem_euclid(step);
        let floor = value.saturating_sub(rem);
        match self {
            RoundingMode::Floor => floor,
            RoundingMode::Ceiling if rem == 0 => value,
            RoundingMode::Ceiling => floor.saturating_add(step),
            RoundingMode::HalfUp if rem >= step - rem => floor.saturating_add(step),
            RoundingMode::HalfUp => floor,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoundingMode::Floor => "floor",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::HalfUp => "half-up",
        };
        f.write_str(name)
    }
}

impl FromStr for RoundingMode {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "floor" => Ok(RoundingMode::Floor),
            "ceiling" | "ceil" => Ok(RoundingMode::Ceiling),
            "half-up" | "half_up" | "halfup" => Ok(RoundingMode::HalfUp),
            _ => Err(TimeError::UnsupportedRoundingMode(s.to_string())),
        }
    }
}
