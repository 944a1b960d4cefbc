// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::config::BloomConfig;
use crate::hash::HashFunction;
use crate::traits::{ElementQuery, Sketch, SketchError};
use serde::Serialize;

/// Bloom Filter - Approximate Set Membership
///
/// A fixed-size bit vector probed by `k` hash functions. Inserting an element
/// sets the `k` bits it hashes to; a query answers "maybe present" only if all
/// of them are set.
///
/// # Key Properties
///
/// - **No False Negatives**: An inserted element is always reported as present.
/// - **False Positives**: Unrelated insertions can cover every bit of an element that was never added.
/// - **Grow-only**: Bits are never cleared except by reconfiguration; there is no delete.
///
/// # Example
///
/// ```
/// use sketch_engines::{BloomFilter, Sketch};
///
/// let mut bloom = BloomFilter::with_hashes(32, &["murmur3", "fnv1a"]).unwrap();
/// bloom.insert("apple");
///
/// assert!(bloom.might_contain("apple"));
/// assert!(bloom.estimate_false_positive_rate() > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    bits: Vec<bool>,
    hashes: Vec<HashFunction>,
    /// Number of `true` entries in `bits`, maintained on insert.
    set_bits: usize,
    /// Insert calls since the last (re)configuration. Diagnostic only.
    inserted_count: u64,
}

/// Snapshot of a Bloom filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BloomStats {
    pub size: usize,
    pub hash_functions: Vec<HashFunction>,
    pub set_bits: usize,
    pub inserted_count: u64,
    pub fill_ratio: f64,
    pub false_positive_rate: f64,
}

impl BloomFilter {
    pub fn new(config: BloomConfig) -> Result<Self, SketchError> {
        let hashes = config.validate()?;
        tracing::debug!("Configured Bloom filter: size={}, hashes={:?}", config.size, hashes);
        Ok(Self {
            bits: vec![false; config.size],
            hashes,
            set_bits: 0,
            inserted_count: 0,
        })
    }

    pub fn with_hashes<S: AsRef<str>>(size: usize, hashes: &[S]) -> Result<Self, SketchError> {
        Self::new(BloomConfig::new(size, hashes))
    }

    /// Replaces size and hash selection, discarding every bit.
    ///
    /// On error the filter is left untouched.
    pub fn configure(&mut self, config: BloomConfig) -> Result<(), SketchError> {
        *self = Self::new(config)?;
        Ok(())
    }

    /// Bit positions `element` maps to, one per hash function, in hash order.
    pub fn positions(&self, element: &str) -> Vec<usize> {
        self.hashes
            .iter()
            .map(|hash| hash.index(element, self.bits.len()))
            .collect()
    }

    /// Returns `false` if `element` was definitely never inserted, `true` if it may have been.
    pub fn might_contain(&self, element: &str) -> bool {
        self.hashes
            .iter()
            .all(|hash| self.bits[hash.index(element, self.bits.len())])
    }

    /// `1 - (1 - set_bits/size)^k`
    pub fn estimate_false_positive_rate(&self) -> f64 {
        let k = self.hashes.len() as i32;
        1.0 - (1.0 - self.fill_ratio()).powi(k)
    }

    /// Fraction of bits currently set.
    pub fn fill_ratio(&self) -> f64 {
        self.set_bits as f64 / self.bits.len() as f64
    }

    pub fn size(&self) -> usize {
        self.bits.len()
    }

    pub fn hash_functions(&self) -> &[HashFunction] {
        &self.hashes
    }

    pub fn set_bits(&self) -> usize {
        self.set_bits
    }

    pub fn inserted_count(&self) -> u64 {
        self.inserted_count
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Merges another filter into this one (bitwise OR).
    ///
    /// Both filters must share size and hash selection.
    pub fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        if self.bits.len() != other.bits.len() || self.hashes != other.hashes {
            return Err(SketchError::IncompatibleMerge(format!(
                "Bloom filter shape mismatch: {} bits {:?} vs {} bits {:?}",
                self.bits.len(),
                self.hashes,
                other.bits.len(),
                other.hashes
            )));
        }

        for (bit, &theirs) in self.bits.iter_mut().zip(other.bits.iter()) {
            *bit |= theirs;
        }
        self.set_bits = self.bits.iter().filter(|&&b| b).count();
        self.inserted_count = self.inserted_count.saturating_add(other.inserted_count);
        tracing::debug!("Merged Bloom filter: set_bits={}", self.set_bits);
        Ok(())
    }
}

impl Sketch for BloomFilter {
    type Stats = BloomStats;

    fn insert(&mut self, element: &str) {
        let size = self.bits.len();
        for hash in &self.hashes {
            let bit = &mut self.bits[hash.index(element, size)];
            if !*bit {
                *bit = true;
                self.set_bits += 1;
            }
        }
        self.inserted_count = self.inserted_count.saturating_add(1);
        tracing::trace!("Bloom insert {:?}: set_bits={}", element, self.set_bits);
    }

    fn stats(&self) -> BloomStats {
        BloomStats {
            size: self.bits.len(),
            hash_functions: self.hashes.clone(),
            set_bits: self.set_bits,
            inserted_count: self.inserted_count,
            fill_ratio: self.fill_ratio(),
            false_positive_rate: self.estimate_false_positive_rate(),
        }
    }

    fn clear(&mut self) {
        self.bits.iter_mut().for_each(|bit| *bit = false);
        self.set_bits = 0;
        self.inserted_count = 0;
    }

    fn is_empty(&self) -> bool {
        self.set_bits == 0
    }
}

impl ElementQuery for BloomFilter {
    type Output = bool;

    fn query(&self, element: &str) -> bool {
        self.might_contain(element)
    }
}
