// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::config::CountMinConfig;
use crate::hash::HashFunction;
use crate::traits::{ElementQuery, Sketch, SketchError};
use serde::Serialize;

/// Count-Min Sketch - Frequency Estimation
///
/// A matrix of counters with one row per hash function. Every insertion bumps
/// exactly one counter in every row; a query returns the smallest of the
/// element's counters.
///
/// # Key Properties
///
/// - **Fixed Memory**: `rows` × `width` × 8 bytes, regardless of the number of distinct elements.
/// - **Conservative**: Frequencies are never underestimated, but may be overestimated due to collisions.
/// - **Saturating**: A counter that reaches `u64::MAX` stays there. The sketch
///   records this in [`CountMinStats::saturated`] instead of wrapping around.
///
/// # Example
///
/// ```
/// use sketch_engines::{CountMinSketch, Sketch};
///
/// let mut cms = CountMinSketch::with_hashes(100, &["xxh3", "murmur", "city"]).unwrap();
/// cms.insert("apple");
/// cms.insert("apple");
/// cms.insert("banana");
///
/// assert!(cms.estimate_frequency("apple") >= 2);
/// assert!(cms.estimate_frequency("banana") >= 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMinSketch {
    /// Number of counters per row
    width: usize,
    /// One hash function per row
    hashes: Vec<HashFunction>,
    /// The matrix of counters, row-major
    matrix: Vec<Vec<u64>>,
    /// Insert calls since the last (re)configuration
    total: u64,
    /// Set once an increment was dropped at `u64::MAX`
    saturated: bool,
}

/// Point estimate together with the first row that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyEstimate {
    pub value: u64,
    pub min_row: usize,
}

/// Snapshot of a Count-Min sketch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountMinStats {
    pub width: usize,
    pub rows: usize,
    pub hash_functions: Vec<HashFunction>,
    pub total_insertions: u64,
    pub saturated: bool,
    /// `e / width`: overcount bound as a fraction of all insertions.
    pub epsilon: f64,
    /// `e^-rows`: probability that a single estimate exceeds the bound.
    pub delta: f64,
    /// `epsilon * total_insertions`
    pub error_bound: u64,
}

impl CountMinSketch {
    pub fn new(config: CountMinConfig) -> Result<Self, SketchError> {
        let hashes = config.validate()?;
        tracing::debug!(
            "Configured Count-Min sketch: width={}, rows={:?}",
            config.width,
            hashes
        );
        Ok(Self {
            width: config.width,
            matrix: vec![vec![0; config.width]; hashes.len()],
            hashes,
            total: 0,
            saturated: false,
        })
    }

    pub fn with_hashes<S: AsRef<str>>(width: usize, hashes: &[S]) -> Result<Self, SketchError> {
        Self::new(CountMinConfig::new(width, hashes))
    }

    /// Replaces width and row hashes, discarding the whole matrix.
    ///
    /// On error the sketch is left untouched.
    pub fn configure(&mut self, config: CountMinConfig) -> Result<(), SketchError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// `(row, column)` of every counter `element` touches.
    pub fn cells(&self, element: &str) -> Vec<(usize, usize)> {
        self.hashes
            .iter()
            .enumerate()
            .map(|(row, hash)| (row, hash.index(element, self.width)))
            .collect()
    }

    /// Minimum of the element's counters across all rows.
    pub fn estimate_frequency(&self, element: &str) -> u64 {
        self.estimate_detailed(element).value
    }

    /// Like [`estimate_frequency`](Self::estimate_frequency), also reporting
    /// the first row holding the minimum.
    pub fn estimate_detailed(&self, element: &str) -> FrequencyEstimate {
        let mut best = FrequencyEstimate {
            value: u64::MAX,
            min_row: 0,
        };
        for (row, hash) in self.hashes.iter().enumerate() {
            let count = self.matrix[row][hash.index(element, self.width)];
            if count < best.value {
                best = FrequencyEstimate { value: count, min_row: row };
            }
        }
        best
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> usize {
        self.hashes.len()
    }

    pub fn hash_functions(&self) -> &[HashFunction] {
        &self.hashes
    }

    pub fn counters(&self) -> &[Vec<u64>] {
        &self.matrix
    }

    pub fn total_insertions(&self) -> u64 {
        self.total
    }

    pub fn is_saturated(&self) -> bool {
        self.saturated
    }

    pub fn epsilon(&self) -> f64 {
        std::f64::consts::E / self.width as f64
    }

    pub fn delta(&self) -> f64 {
        (-(self.hashes.len() as f64)).exp()
    }

    /// Merges another CountMinSketch into this one by summing counters.
    ///
    /// Width and row hashes must match. Not idempotent: merging the same
    /// sketch twice doubles its counts.
    pub fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.width != other.width || self.hashes != other.hashes {
            return Err(SketchError::IncompatibleMerge(format!(
                "Count-Min shape mismatch: width {} rows {:?} vs width {} rows {:?}",
                self.width, self.hashes, other.width, other.hashes
            )));
        }

        for (mine, theirs) in self.matrix.iter_mut().zip(other.matrix.iter()) {
            for (c, &t) in mine.iter_mut().zip(theirs.iter()) {
                *c = saturating_bump(*c, t, &mut self.saturated);
            }
        }
        self.total = self.total.saturating_add(other.total);
        self.saturated |= other.saturated;
        tracing::debug!("Merged Count-Min sketch: total_insertions={}", self.total);
        Ok(())
    }
}

fn saturating_bump(counter: u64, by: u64, saturated: &mut bool) -> u64 {
    match counter.checked_add(by) {
        Some(next) => next,
        None => {
            if !*saturated {
                tracing::warn!("Count-Min counter saturated at u64::MAX; further increments are dropped");
            }
            *saturated = true;
            u64::MAX
        }
    }
}

impl Sketch for CountMinSketch {
    type Stats = CountMinStats;

    fn insert(&mut self, element: &str) {
        for (row, hash) in self.hashes.iter().enumerate() {
            let col = hash.index(element, self.width);
            let cell = &mut self.matrix[row][col];
            *cell = saturating_bump(*cell, 1, &mut self.saturated);
        }
        self.total = self.total.saturating_add(1);
        tracing::trace!("Count-Min insert {:?}: total={}", element, self.total);
    }

    fn stats(&self) -> CountMinStats {
        let epsilon = self.epsilon();
        CountMinStats {
            width: self.width,
            rows: self.hashes.len(),
            hash_functions: self.hashes.clone(),
            total_insertions: self.total,
            saturated: self.saturated,
            epsilon,
            delta: self.delta(),
            error_bound: (epsilon * self.total as f64) as u64,
        }
    }

    fn clear(&mut self) {
        for row in &mut self.matrix {
            row.iter_mut().for_each(|c| *c = 0);
        }
        self.total = 0;
        self.saturated = false;
    }

    fn is_empty(&self) -> bool {
        self.matrix.iter().all(|row| row.iter().all(|&x| x == 0))
    }
}

impl ElementQuery for CountMinSketch {
    type Output = u64;

    fn query(&self, element: &str) -> u64 {
        self.estimate_frequency(element)
    }
}

#[cfg(test)]
impl CountMinSketch {
    /// Forces a counter value, for exercising saturation without 2^64 inserts.
    pub(crate) fn set_counter(&mut self, row: usize, col: usize, value: u64) {
        self.matrix[row][col] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_saturates_instead_of_wrapping() {
        let mut cms = CountMinSketch::with_hashes(4, &["xxh3", "murmur"]).unwrap();
        for (row, col) in cms.cells("hot") {
            cms.set_counter(row, col, u64::MAX - 1);
        }
        assert!(!cms.is_saturated());

        cms.insert("hot");
        assert_eq!(cms.estimate_frequency("hot"), u64::MAX);
        assert!(!cms.is_saturated());

        cms.insert("hot");
        assert_eq!(cms.estimate_frequency("hot"), u64::MAX);
        assert!(cms.is_saturated());
        assert!(cms.stats().saturated);
    }

    #[test]
    fn test_clear_resets_saturation() {
        let mut cms = CountMinSketch::with_hashes(2, &["md5"]).unwrap();
        cms.set_counter(0, 0, u64::MAX);
        cms.set_counter(0, 1, u64::MAX);
        cms.insert("anything");
        assert!(cms.is_saturated());

        cms.clear();
        assert!(!cms.is_saturated());
        assert!(cms.is_empty());
    }
}
