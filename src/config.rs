// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Engine configuration
//!
//! Configurations name their hash functions as catalog strings so that a bad
//! name surfaces as [`SketchError::HashCatalogMiss`] when the engine is built,
//! never on first insertion.

use crate::hash::HashFunction;
use crate::traits::SketchError;
use serde::{Deserialize, Serialize};

fn names(hashes: &[HashFunction]) -> Vec<String> {
    hashes.iter().map(|h| h.name().to_string()).collect()
}

/// Bloom filter configuration: bit count and hash selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomConfig {
    pub size: usize,
    pub hashes: Vec<String>,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            size: 32,
            hashes: names(&HashFunction::BLOOM_DEFAULTS),
        }
    }
}

impl BloomConfig {
    pub fn new<S: AsRef<str>>(size: usize, hashes: &[S]) -> Self {
        Self {
            size,
            hashes: hashes.iter().map(|h| h.as_ref().to_string()).collect(),
        }
    }

    /// Checks the bounds and resolves the hash names.
    pub fn validate(&self) -> Result<Vec<HashFunction>, SketchError> {
        if self.size < 1 {
            return Err(SketchError::InvalidConfig("Bloom filter size must be at least 1".into()));
        }
        if self.hashes.is_empty() {
            return Err(SketchError::InvalidConfig(
                "Bloom filter needs at least one hash function".into(),
            ));
        }
        HashFunction::resolve(&self.hashes)
    }
}

/// Count-Min sketch configuration: row width and one hash per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountMinConfig {
    pub width: usize,
    pub hashes: Vec<String>,
}

impl Default for CountMinConfig {
    fn default() -> Self {
        Self {
            width: 8,
            hashes: names(&HashFunction::COUNT_MIN_DEFAULTS),
        }
    }
}

impl CountMinConfig {
    pub fn new<S: AsRef<str>>(width: usize, hashes: &[S]) -> Self {
        Self {
            width,
            hashes: hashes.iter().map(|h| h.as_ref().to_string()).collect(),
        }
    }

    pub fn validate(&self) -> Result<Vec<HashFunction>, SketchError> {
        if self.width < 1 {
            return Err(SketchError::InvalidConfig("Count-Min width must be at least 1".into()));
        }
        if self.hashes.is_empty() {
            return Err(SketchError::InvalidConfig(
                "Count-Min sketch needs at least one hash function".into(),
            ));
        }
        HashFunction::resolve(&self.hashes)
    }
}

/// HyperLogLog configuration. Powers of two are recommended but not required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperLogLogConfig {
    pub buckets: usize,
}

impl Default for HyperLogLogConfig {
    fn default() -> Self {
        Self { buckets: 64 }
    }
}

impl HyperLogLogConfig {
    pub fn new(buckets: usize) -> Self {
        Self { buckets }
    }

    pub fn validate(&self) -> Result<(), SketchError> {
        if self.buckets < 1 {
            return Err(SketchError::InvalidConfig(
                "HyperLogLog bucket count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Tagged configuration for any engine, e.g.
/// `{"kind": "bloom_filter", "size": 64, "hashes": ["murmur3", "djb2"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SketchConfig {
    BloomFilter(BloomConfig),
    CountMinSketch(CountMinConfig),
    #[serde(rename = "hyperloglog")]
    HyperLogLog(HyperLogLogConfig),
}

impl SketchConfig {
    /// Parses a configuration document.
    pub fn from_json(text: &str) -> Result<Self, SketchError> {
        serde_json::from_str(text).map_err(|e| SketchError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, SketchError> {
        serde_json::to_string(self).map_err(|e| SketchError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_demo_layout() {
        let bloom = BloomConfig::default();
        assert_eq!(bloom.size, 32);
        assert_eq!(bloom.hashes, vec!["murmur3", "fnv1a"]);

        let cms = CountMinConfig::default();
        assert_eq!(cms.width, 8);
        assert_eq!(cms.hashes.len(), 7);

        assert_eq!(HyperLogLogConfig::default().buckets, 64);
    }

    #[test]
    fn test_validation_rejects_zero_sizes() {
        assert!(matches!(
            BloomConfig::new(0, &["murmur3"]).validate(),
            Err(SketchError::InvalidConfig(_))
        ));
        assert!(matches!(
            CountMinConfig::new(0, &["xxh3"]).validate(),
            Err(SketchError::InvalidConfig(_))
        ));
        assert!(matches!(
            HyperLogLogConfig::new(0).validate(),
            Err(SketchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validation_rejects_empty_hash_selection() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            BloomConfig::new(8, &empty).validate(),
            Err(SketchError::InvalidConfig(_))
        ));
        assert!(matches!(
            CountMinConfig::new(8, &empty).validate(),
            Err(SketchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validation_reports_catalog_miss() {
        assert_eq!(
            BloomConfig::new(8, &["murmur3", "nope"]).validate(),
            Err(SketchError::HashCatalogMiss("nope".into()))
        );
    }

    #[test]
    fn test_parse_tagged_config() {
        let config =
            SketchConfig::from_json(r#"{"kind": "bloom_filter", "size": 64, "hashes": ["djb2"]}"#)
                .unwrap();
        assert_eq!(config, SketchConfig::BloomFilter(BloomConfig::new(64, &["djb2"])));

        let config = SketchConfig::from_json(r#"{"kind": "hyperloglog"}"#).unwrap();
        assert_eq!(config, SketchConfig::HyperLogLog(HyperLogLogConfig::default()));

        let config = SketchConfig::from_json(r#"{"kind": "count_min_sketch", "width": 16}"#).unwrap();
        match config {
            SketchConfig::CountMinSketch(c) => {
                assert_eq!(c.width, 16);
                assert_eq!(c.hashes.len(), 7);
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_malformed_document_is_config_error() {
        assert!(matches!(
            SketchConfig::from_json(r#"{"kind": "cuckoo_filter"}"#),
            Err(SketchError::Config(_))
        ));
        assert!(matches!(SketchConfig::from_json("not json"), Err(SketchError::Config(_))));
    }
}
