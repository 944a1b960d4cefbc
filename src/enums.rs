// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::bloom_filter::{BloomFilter, BloomStats};
use crate::config::SketchConfig;
use crate::count_min_sketch::{CountMinSketch, CountMinStats};
use crate::hyperloglog::{HyperLogLog, HyperLogLogStats};
use crate::traits::{Sketch, SketchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumeration of the supported sketch engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SketchKind {
    BloomFilter,
    CountMinSketch,
    HyperLogLog,
}

impl fmt::Display for SketchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchKind::BloomFilter => write!(f, "BloomFilter"),
            SketchKind::CountMinSketch => write!(f, "CountMinSketch"),
            SketchKind::HyperLogLog => write!(f, "HyperLogLog"),
        }
    }
}

impl FromStr for SketchKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['_', '-', ' '], "").to_lowercase().as_str() {
            "bloomfilter" | "bloom" => Ok(SketchKind::BloomFilter),
            "countminsketch" | "countmin" | "cms" => Ok(SketchKind::CountMinSketch),
            "hyperloglog" | "hll" => Ok(SketchKind::HyperLogLog),
            _ => Err(SketchError::InvalidConfig(format!("Unknown sketch kind: {}", s))),
        }
    }
}

/// Any of the three engines, built from a [`SketchConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnySketch {
    BloomFilter(BloomFilter),
    CountMinSketch(CountMinSketch),
    HyperLogLog(HyperLogLog),
}

/// Stats of whichever engine is inside an [`AnySketch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SketchStats {
    BloomFilter(BloomStats),
    CountMinSketch(CountMinStats),
    #[serde(rename = "hyperloglog")]
    HyperLogLog(HyperLogLogStats),
}

/// Per-element answer; HyperLogLog has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementAnswer {
    MightContain(bool),
    EstimatedFrequency(u64),
}

impl AnySketch {
    pub fn from_config(config: SketchConfig) -> Result<Self, SketchError> {
        Ok(match config {
            SketchConfig::BloomFilter(c) => AnySketch::BloomFilter(BloomFilter::new(c)?),
            SketchConfig::CountMinSketch(c) => AnySketch::CountMinSketch(CountMinSketch::new(c)?),
            SketchConfig::HyperLogLog(c) => AnySketch::HyperLogLog(HyperLogLog::new(c)?),
        })
    }

    /// Parses a JSON configuration document and builds the engine it describes.
    pub fn from_json(text: &str) -> Result<Self, SketchError> {
        Self::from_config(SketchConfig::from_json(text)?)
    }

    pub fn kind(&self) -> SketchKind {
        match self {
            AnySketch::BloomFilter(_) => SketchKind::BloomFilter,
            AnySketch::CountMinSketch(_) => SketchKind::CountMinSketch,
            AnySketch::HyperLogLog(_) => SketchKind::HyperLogLog,
        }
    }

    pub fn query(&self, element: &str) -> Option<ElementAnswer> {
        match self {
            AnySketch::BloomFilter(s) => Some(ElementAnswer::MightContain(s.might_contain(element))),
            AnySketch::CountMinSketch(s) => {
                Some(ElementAnswer::EstimatedFrequency(s.estimate_frequency(element)))
            }
            AnySketch::HyperLogLog(_) => None,
        }
    }
}

impl Sketch for AnySketch {
    type Stats = SketchStats;

    fn insert(&mut self, element: &str) {
        match self {
            AnySketch::BloomFilter(s) => s.insert(element),
            AnySketch::CountMinSketch(s) => s.insert(element),
            AnySketch::HyperLogLog(s) => s.insert(element),
        }
    }

    fn stats(&self) -> SketchStats {
        match self {
            AnySketch::BloomFilter(s) => SketchStats::BloomFilter(s.stats()),
            AnySketch::CountMinSketch(s) => SketchStats::CountMinSketch(s.stats()),
            AnySketch::HyperLogLog(s) => SketchStats::HyperLogLog(s.stats()),
        }
    }

    fn clear(&mut self) {
        match self {
            AnySketch::BloomFilter(s) => s.clear(),
            AnySketch::CountMinSketch(s) => s.clear(),
            AnySketch::HyperLogLog(s) => s.clear(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            AnySketch::BloomFilter(s) => s.is_empty(),
            AnySketch::CountMinSketch(s) => s.is_empty(),
            AnySketch::HyperLogLog(s) => s.is_empty(),
        }
    }
}
