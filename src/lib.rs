// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! # sketch-engines
//!
//! Three independent probabilistic data structures for large or streaming data:
//!
//! - [`BloomFilter`]: approximate set membership, no false negatives.
//! - [`CountMinSketch`]: frequency estimation that never under-counts.
//! - [`HyperLogLog`]: distinct-count estimation with small and large range correction.
//!
//! Each engine is built from an explicit configuration, mutated only by
//! inserting strings, and read through side-effect-free queries and
//! [`Sketch::stats`] snapshots. Hash functions come from the closed
//! [`HashFunction`] catalog and are chosen at configuration time.
//!
//! ```
//! use sketch_engines::{BloomFilter, CountMinSketch, HyperLogLog, Sketch};
//!
//! let mut bloom = BloomFilter::with_hashes(64, &["murmur3", "fnv1a"]).unwrap();
//! let mut cms = CountMinSketch::with_hashes(32, &["xxh3", "murmur", "city"]).unwrap();
//! let mut hll = HyperLogLog::with_buckets(64).unwrap();
//!
//! for word in ["apple", "banana", "apple"] {
//!     bloom.insert(word);
//!     cms.insert(word);
//!     hll.insert(word);
//! }
//!
//! assert!(bloom.might_contain("apple"));
//! assert!(cms.estimate_frequency("apple") >= 2);
//! assert!(hll.estimate_cardinality() >= 1);
//! ```

pub mod audit;
pub mod bloom_filter;
pub mod config;
pub mod count_min_sketch;
pub mod enums;
pub mod hash;
pub mod hyperloglog;
pub mod shared;
pub mod traits;

// Re-export core traits
pub use traits::{ElementQuery, Sketch, SketchError};

pub use audit::{Audited, CardinalityCheck, FrequencyCheck, MembershipCheck};
pub use bloom_filter::{BloomFilter, BloomStats};
pub use config::{BloomConfig, CountMinConfig, HyperLogLogConfig, SketchConfig};
pub use count_min_sketch::{CountMinSketch, CountMinStats, FrequencyEstimate};
pub use enums::{AnySketch, ElementAnswer, SketchKind, SketchStats};
pub use hash::{HashFunction, Lane64};
pub use hyperloglog::{
    CardinalityEstimate, EstimateRange, HyperLogLog, HyperLogLogStats, RegisterUpdate,
};
pub use shared::Shared;
