// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::config::HyperLogLogConfig;
use crate::hash::{Lane64, HASH_SPACE, LANE_BITS};
use crate::traits::{Sketch, SketchError};
use serde::Serialize;

/// Highest rank a register can hold: the width of the rank lane.
pub const MAX_RANK: u8 = LANE_BITS as u8;

/// Ceiling for reported cardinalities: the size of the 32-bit hash space.
pub const MAX_CARDINALITY: u64 = 1 << LANE_BITS;

/// Raw estimates at or below `SMALL_RANGE_FACTOR * m` use linear counting.
const SMALL_RANGE_FACTOR: f64 = 2.5;

/// Raw estimates above `HASH_SPACE / LARGE_RANGE_DIVISOR` get the
/// hash-collision correction.
const LARGE_RANGE_DIVISOR: f64 = 30.0;

/// HyperLogLog - Cardinality Estimation
///
/// A probabilistic data structure for estimating the number of unique elements (cardinality)
/// in a stream. Each element is hashed into two 32-bit lanes: the first picks a
/// register, the second's leading-zero run (plus one) is the element's rank.
/// Every register keeps the highest rank it has seen.
///
/// # Key Properties
///
/// - **Fixed Memory**: One byte per register, regardless of the number of elements.
/// - **Accuracy**: Relative standard error is about `1.04 / sqrt(m)`.
/// - **Idempotent**: Adding the same element multiple times does not change the state.
///
/// # Example
///
/// ```
/// use sketch_engines::{HyperLogLog, Sketch};
///
/// let mut hll = HyperLogLog::with_buckets(1024).unwrap();
/// hll.insert("user1");
/// hll.insert("user2");
/// hll.insert("user3");
/// hll.insert("user1"); // Duplicate
///
/// let count = hll.estimate_cardinality();
/// assert!(count >= 2 && count <= 4); // Approximate count
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HyperLogLog {
    /// Max rank per bucket, each in `0..=MAX_RANK`
    registers: Vec<u8>,
    /// Insert calls since the last (re)configuration
    inserted: u64,
}

/// Where an element lands and the rank it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterUpdate {
    pub bucket: usize,
    pub rank: u8,
}

/// Which branch of the estimator produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateRange {
    /// Linear counting over empty registers.
    Small,
    /// Plain harmonic mean.
    Normal,
    /// Hash-collision correction near the top of the hash space.
    Large,
    /// Clamped to [`MAX_CARDINALITY`].
    Saturated,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardinalityEstimate {
    /// `alpha * m^2 / sum(2^-r)` before any correction
    pub raw: f64,
    pub value: u64,
    pub range: EstimateRange,
}

/// Snapshot of a HyperLogLog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HyperLogLogStats {
    pub buckets: usize,
    pub zero_registers: usize,
    pub max_register: u8,
    pub inserted_count: u64,
    pub cardinality: u64,
    pub raw_estimate: f64,
    pub range: EstimateRange,
    pub relative_standard_error: f64,
}

impl HyperLogLog {
    pub fn new(config: HyperLogLogConfig) -> Result<Self, SketchError> {
        config.validate()?;
        tracing::debug!("Configured HyperLogLog: buckets={}", config.buckets);
        Ok(Self {
            registers: vec![0u8; config.buckets],
            inserted: 0,
        })
    }

    pub fn with_buckets(buckets: usize) -> Result<Self, SketchError> {
        Self::new(HyperLogLogConfig::new(buckets))
    }

    /// Replaces the bucket count, discarding every register.
    ///
    /// On error the estimator is left untouched.
    pub fn configure(&mut self, config: HyperLogLogConfig) -> Result<(), SketchError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Bucket and rank for `element`, without touching any register.
    pub fn locate(&self, element: &str) -> RegisterUpdate {
        let (h1, h2) = Lane64::hash(element);
        let bucket = (h1 as u64 % self.registers.len() as u64) as usize;
        RegisterUpdate {
            bucket,
            rank: rank(h2),
        }
    }

    /// Estimate the cardinality (number of unique elements)
    pub fn estimate_cardinality(&self) -> u64 {
        self.estimate_detailed().value
    }

    /// Estimate with the raw harmonic mean and the correction branch taken.
    pub fn estimate_detailed(&self) -> CardinalityEstimate {
        let m = self.registers.len() as f64;
        let alpha = 0.7213 / (1.0 + 1.079 / m);

        let mut sum = 0.0;
        let mut zeros = 0usize;
        for &r in &self.registers {
            if r == 0 {
                zeros += 1;
            }
            sum += (-f64::from(r)).exp2();
        }

        // Every term is at least 2^-MAX_RANK, so sum > 0.
        let raw = alpha * m * m / sum;

        let (estimate, range) = if raw <= SMALL_RANGE_FACTOR * m {
            if zeros > 0 {
                (m * (m / zeros as f64).ln(), EstimateRange::Small)
            } else {
                (raw, EstimateRange::Normal)
            }
        } else if raw > HASH_SPACE / LARGE_RANGE_DIVISOR {
            if raw >= HASH_SPACE {
                (f64::INFINITY, EstimateRange::Large)
            } else {
                (-HASH_SPACE * (1.0 - raw / HASH_SPACE).ln(), EstimateRange::Large)
            }
        } else {
            (raw, EstimateRange::Normal)
        };

        let rounded = estimate.round();
        if !rounded.is_finite() || rounded > MAX_CARDINALITY as f64 {
            tracing::warn!(
                "HyperLogLog estimate saturated: raw={}, clamped to {}",
                raw,
                MAX_CARDINALITY
            );
            return CardinalityEstimate {
                raw,
                value: MAX_CARDINALITY,
                range: EstimateRange::Saturated,
            };
        }

        CardinalityEstimate {
            raw,
            value: rounded.max(0.0) as u64,
            range,
        }
    }

    /// `1.04 / sqrt(m)`
    pub fn relative_standard_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }

    /// Bucket holding the highest register, lowest index on ties.
    ///
    /// `None` while every register is zero.
    pub fn peak_bucket(&self) -> Option<(usize, u8)> {
        self.registers
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, r)| r > 0)
            .fold(None, |best, (i, r)| match best {
                Some((_, top)) if top >= r => best,
                _ => Some((i, r)),
            })
    }

    pub fn buckets(&self) -> usize {
        self.registers.len()
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    pub fn inserted_count(&self) -> u64 {
        self.inserted
    }

    /// Merge another HyperLogLog into this one (register-wise max).
    pub fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.registers.len() != other.registers.len() {
            return Err(SketchError::IncompatibleMerge(format!(
                "HyperLogLog bucket mismatch: {} vs {}",
                self.registers.len(),
                other.registers.len()
            )));
        }
        for (mine, &theirs) in self.registers.iter_mut().zip(other.registers.iter()) {
            if theirs > *mine {
                *mine = theirs;
            }
        }
        self.inserted = self.inserted.saturating_add(other.inserted);
        tracing::debug!("Merged HyperLogLog: buckets={}", self.registers.len());
        Ok(())
    }
}

impl Sketch for HyperLogLog {
    type Stats = HyperLogLogStats;

    fn insert(&mut self, element: &str) {
        let RegisterUpdate { bucket, rank } = self.locate(element);
        let register = &mut self.registers[bucket];
        if rank > *register {
            *register = rank;
        }
        self.inserted = self.inserted.saturating_add(1);
        tracing::trace!("HyperLogLog insert {:?}: bucket={}, rank={}", element, bucket, rank);
    }

    fn stats(&self) -> HyperLogLogStats {
        let estimate = self.estimate_detailed();
        HyperLogLogStats {
            buckets: self.registers.len(),
            zero_registers: self.registers.iter().filter(|&&r| r == 0).count(),
            max_register: self.registers.iter().copied().max().unwrap_or(0),
            inserted_count: self.inserted,
            cardinality: estimate.value,
            raw_estimate: estimate.raw,
            range: estimate.range,
            relative_standard_error: self.relative_standard_error(),
        }
    }

    fn clear(&mut self) {
        self.registers.iter_mut().for_each(|r| *r = 0);
        self.inserted = 0;
    }

    fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }
}

#[cfg(test)]
impl HyperLogLog {
    pub(crate) fn fill_registers(&mut self, value: u8) {
        self.registers.iter_mut().for_each(|r| *r = value);
    }
}

/// Position of the leftmost set bit, counted from 1.
fn rank(h2: u32) -> u8 {
    // clz(0) + 1 would be LANE_BITS + 1
    (h2.leading_zeros() + 1).min(LANE_BITS) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_of_zero_lane_is_capped() {
        assert_eq!(rank(0), MAX_RANK);
        assert_eq!(rank(1), 32);
        assert_eq!(rank(1 << 30), 2);
        assert_eq!(rank(1 << 31), 1);
        assert_eq!(rank(u32::MAX), 1);
    }

    #[test]
    fn test_empty_estimate_goes_through_linear_counting() {
        for m in [1usize, 2, 16, 64, 4096] {
            let hll = HyperLogLog::with_buckets(m).unwrap();
            let estimate = hll.estimate_detailed();
            // sum = m, so raw = alpha * m
            assert!(estimate.raw.is_finite());
            assert_eq!(estimate.range, EstimateRange::Small);
            assert_eq!(estimate.value, 0);
        }
    }

    #[test]
    fn test_all_registers_at_max_saturate() {
        let mut hll = HyperLogLog::with_buckets(64).unwrap();
        hll.fill_registers(MAX_RANK);
        let estimate = hll.estimate_detailed();
        assert_eq!(estimate.range, EstimateRange::Saturated);
        assert_eq!(estimate.value, MAX_CARDINALITY);
    }

    #[test]
    fn test_single_bucket_at_max_uses_large_range_correction() {
        let mut hll = HyperLogLog::with_buckets(1).unwrap();
        hll.fill_registers(MAX_RANK);
        let estimate = hll.estimate_detailed();
        // alpha(1) * 2^32 is below 2^32 but above 2^32 / 30
        assert_eq!(estimate.range, EstimateRange::Large);
        assert!(estimate.value > estimate.raw as u64);
        assert!(estimate.value < MAX_CARDINALITY);
    }

    #[test]
    fn test_full_registers_without_zeros_keep_raw_estimate() {
        let mut hll = HyperLogLog::with_buckets(64).unwrap();
        hll.fill_registers(1);
        let estimate = hll.estimate_detailed();
        // raw = alpha * m^2 / (m / 2) = 2 * alpha * m, under 2.5m with no zero registers
        assert_eq!(estimate.range, EstimateRange::Normal);
        assert_eq!(estimate.value, estimate.raw.round() as u64);
    }

    #[test]
    fn test_rank_is_bounded_by_lane_width() {
        let hll = HyperLogLog::with_buckets(8).unwrap();
        for i in 0..10_000 {
            let update = hll.locate(&format!("probe-{}", i));
            assert!(update.rank >= 1 && update.rank <= MAX_RANK);
            assert!(update.bucket < 8);
        }
    }
}
