// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Union-merging of sorted span lists.
//!
//! Load intervals are kept as a sorted list of disjoint spans. Adding a new
//! one goes through [`merge_spans`], and [`replacements`] turns the result
//! into "replace these originals with this span" operations so the owner of
//! the list can apply each change atomically. [`IntervalSet`] bundles both.

use crate::instant::TimeInstant;
use crate::span::Interval;

/// Inserts `insert` into `sorted` and merges every pair of spans that
/// overlap or touch.
///
/// `sorted` must be ordered by start and pairwise disjoint. The result is a
/// new list, sorted and pairwise non-touching, covering exactly the instants
/// of `sorted` plus `insert`. A reversed `insert` is reordered first.
///
/// # Examples
///
/// ```
/// use tempoch_snap::{merge_spans, Instant, Span};
///
/// let s = |a, b| Span::new(Instant::from_millis(a), Instant::from_millis(b));
/// assert_eq!(merge_spans(&[s(10, 20), s(30, 40)], s(15, 35)), vec![s(10, 40)]);
/// assert_eq!(
///     merge_spans(&[s(10, 20), s(50, 60)], s(25, 45)),
///     vec![s(10, 20), s(25, 45), s(50, 60)]
/// );
/// ```
pub fn merge_spans<T: TimeInstant>(sorted: &[Interval<T>], insert: Interval<T>) -> Vec<Interval<T>> {
    let insert = Interval::ordered(insert.start, insert.end);
    let mut spans = sorted.to_vec();
    let at = spans.partition_point(|s| s.start <= insert.start);
    spans.insert(at, insert);

    let mut i = 1;
    while i < spans.len() {
        match spans[i - 1].union(&spans[i]) {
            Some(joined) => {
                spans[i - 1] = joined;
                spans.remove(i);
                i = (i - 1).max(1);
            }
            None => i += 1,
        }
    }
    tracing::trace!(before = sorted.len(), after = spans.len(), "merged span list");
    spans
}

/// One atomic change to a span list: `replaced` spans give way to `with`.
///
/// An empty `replaced` is a plain addition.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement<T: TimeInstant> {
    pub replaced: Vec<Interval<T>>,
    pub with: Interval<T>,
}

/// Diffs a merge result against the list it was computed from.
///
/// For every span of `merged` not already present in `original`, reports the
/// originals it swallows (those it overlaps or touches, excluding any span
/// equal to it).
pub fn replacements<T: TimeInstant>(
    original: &[Interval<T>],
    merged: &[Interval<T>],
) -> Vec<Replacement<T>> {
    merged
        .iter()
        .filter(|m| !original.contains(m))
        .map(|m| Replacement {
            replaced: original
                .iter()
                .filter(|o| *o != m && o.touches_or_overlaps(m))
                .copied()
                .collect(),
            with: *m,
        })
        .collect()
}

/// A sorted list of disjoint spans that merges on insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalSet<T: TimeInstant> {
    spans: Vec<Interval<T>>,
}

impl<T: TimeInstant> IntervalSet<T> {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Adds `span`, merging as needed, and returns the changes applied.
    ///
    /// Returns an empty list when `span` was already covered.
    pub fn insert(&mut self, span: Interval<T>) -> Vec<Replacement<T>> {
        let merged = merge_spans(&self.spans, span);
        let changes = replacements(&self.spans, &merged);
        self.spans = merged;
        changes
    }

    pub fn spans(&self) -> &[Interval<T>] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval<T>> {
        self.spans.iter()
    }

    /// The span containing `t`, if any.
    pub fn find(&self, t: T) -> Option<Interval<T>> {
        self.spans.iter().find(|s| s.contains(t)).copied()
    }

    pub fn contains(&self, t: T) -> bool {
        self.find(t).is_some()
    }

    pub fn into_vec(self) -> Vec<Interval<T>> {
        self.spans
    }
}

impl<T: TimeInstant> Default for IntervalSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeInstant> FromIterator<Interval<T>> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = Interval<T>>>(iter: I) -> Self {
        let mut set = IntervalSet::new();
        for span in iter {
            set.insert(span);
        }
        set
    }
}

impl<'a, T: TimeInstant> IntoIterator for &'a IntervalSet<T> {
    type Item = &'a Interval<T>;
    type IntoIter = std::slice::Iter<'a, Interval<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}
