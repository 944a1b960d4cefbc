// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Exact-tracking decorator
//!
//! [`Audited`] keeps an exact count of every element next to a sketch, so that
//! approximate answers can be compared with the truth. The exact map lives
//! beside the estimator and never feeds into it.

use crate::bloom_filter::BloomFilter;
use crate::count_min_sketch::CountMinSketch;
use crate::hyperloglog::HyperLogLog;
use crate::traits::{Sketch, SketchError};
use serde::Serialize;
use std::collections::HashMap;

/// A sketch plus the exact multiset of everything inserted into it.
///
/// # Example
///
/// ```
/// use sketch_engines::{Audited, BloomFilter, MembershipCheck};
///
/// let mut audited = Audited::new(BloomFilter::with_hashes(32, &["murmur3", "fnv1a"]).unwrap());
/// assert!(audited.insert("apple"));
/// assert!(!audited.insert("apple"));
///
/// assert_eq!(audited.check("apple"), MembershipCheck::Confirmed);
/// ```
#[derive(Debug, Clone)]
pub struct Audited<S> {
    sketch: S,
    exact: HashMap<String, u64>,
    total: u64,
}

impl<S: Sketch> Audited<S> {
    pub fn new(sketch: S) -> Self {
        Self {
            sketch,
            exact: HashMap::new(),
            total: 0,
        }
    }

    /// Inserts into both the sketch and the exact map.
    ///
    /// Returns `true` if this is the first occurrence of `element`.
    pub fn insert(&mut self, element: &str) -> bool {
        self.sketch.insert(element);
        self.total = self.total.saturating_add(1);
        let count = self.exact.entry(element.to_string()).or_insert(0);
        *count += 1;
        *count == 1
    }

    pub fn insert_all<I, T>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        for element in elements {
            self.insert(element.as_ref());
        }
    }

    /// Inserts only elements not seen before; repeats are rejected and leave
    /// both the sketch and the exact map untouched.
    pub fn insert_unique(&mut self, element: &str) -> Result<(), SketchError> {
        if self.exact.contains_key(element) {
            return Err(SketchError::DuplicateElement(element.to_string()));
        }
        self.insert(element);
        Ok(())
    }

    pub fn seen(&self, element: &str) -> bool {
        self.exact.contains_key(element)
    }

    pub fn exact_count(&self, element: &str) -> u64 {
        self.exact.get(element).copied().unwrap_or(0)
    }

    pub fn exact_distinct(&self) -> usize {
        self.exact.len()
    }

    pub fn exact_total(&self) -> u64 {
        self.total
    }

    /// Distinct elements inserted so far, in no particular order.
    pub fn elements(&self) -> impl Iterator<Item = &str> {
        self.exact.keys().map(String::as_str)
    }

    pub fn sketch(&self) -> &S {
        &self.sketch
    }

    pub fn into_inner(self) -> S {
        self.sketch
    }

    /// Swaps in a freshly configured sketch and forgets every tracked element.
    pub fn replace(&mut self, sketch: S) -> S {
        self.exact.clear();
        self.total = 0;
        std::mem::replace(&mut self.sketch, sketch)
    }

    pub fn clear(&mut self) {
        self.sketch.clear();
        self.exact.clear();
        self.total = 0;
    }
}

/// Outcome of a Bloom query checked against the exact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipCheck {
    /// Filter says no. Always correct.
    DefinitelyAbsent,
    /// Filter says maybe, element was never inserted.
    FalsePositive,
    /// Filter says maybe, element was inserted.
    Confirmed,
}

impl Audited<BloomFilter> {
    pub fn check(&self, element: &str) -> MembershipCheck {
        let in_filter = self.sketch.might_contain(element);
        let in_set = self.seen(element);
        debug_assert!(in_filter || !in_set, "Bloom filter false negative for {:?}", element);
        match (in_filter, in_set) {
            (false, _) => MembershipCheck::DefinitelyAbsent,
            (true, false) => MembershipCheck::FalsePositive,
            (true, true) => MembershipCheck::Confirmed,
        }
    }
}

/// Count-Min estimate next to the true count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyCheck {
    pub estimated: u64,
    pub exact: u64,
}

impl FrequencyCheck {
    /// How far the sketch overshoots. Zero when the estimate is exact.
    pub fn overestimate(&self) -> u64 {
        self.estimated.saturating_sub(self.exact)
    }
}

impl Audited<CountMinSketch> {
    pub fn compare(&self, element: &str) -> FrequencyCheck {
        FrequencyCheck {
            estimated: self.sketch.estimate_frequency(element),
            exact: self.exact_count(element),
        }
    }
}

/// HyperLogLog estimate next to the true distinct count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CardinalityCheck {
    pub estimated: u64,
    pub exact: u64,
}

impl CardinalityCheck {
    /// `(estimated - exact) / exact`; `None` while nothing was inserted.
    pub fn relative_error(&self) -> Option<f64> {
        if self.exact == 0 {
            return None;
        }
        Some((self.estimated as f64 - self.exact as f64) / self.exact as f64)
    }
}

impl Audited<HyperLogLog> {
    pub fn compare(&self) -> CardinalityCheck {
        CardinalityCheck {
            estimated: self.sketch.estimate_cardinality(),
            exact: self.exact.len() as u64,
        }
    }
}
