// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Hash function catalog
//!
//! A closed set of small, deterministic, non-cryptographic string hashers.
//! Several entries borrow the names of well-known algorithms (MD5, SHA-1, ...)
//! but are only cheap multiplicative imitations of them: none of these
//! functions offers any cryptographic guarantee.
//!
//! All 32-bit hashers walk the UTF-16 code units of the input and return a
//! value in `[0, 2^32)`. Each entry uses its own seed and multiplier so that a
//! selection of several entries behaves as a family of roughly independent
//! hashes.

use crate::traits::SketchError;
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;

/// Width in bits of every hash lane produced by this module.
pub const LANE_BITS: u32 = 32;

/// Size of the 32-bit hash space, `2^32`.
pub const HASH_SPACE: f64 = (1u64 << LANE_BITS) as f64;

/// Enumeration of the supported 32-bit hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    Murmur3,
    Fnv1a,
    Djb2,
    Xxh3,
    Murmur,
    City,
    Farm,
    Md5,
    Sha1,
    Sha256,
    SipHash13,
}

impl HashFunction {
    /// Every catalog entry, in declaration order.
    pub const ALL: [HashFunction; 11] = [
        HashFunction::Murmur3,
        HashFunction::Fnv1a,
        HashFunction::Djb2,
        HashFunction::Xxh3,
        HashFunction::Murmur,
        HashFunction::City,
        HashFunction::Farm,
        HashFunction::Md5,
        HashFunction::Sha1,
        HashFunction::Sha256,
        HashFunction::SipHash13,
    ];

    /// Default selection for a Bloom filter.
    pub const BLOOM_DEFAULTS: [HashFunction; 2] = [HashFunction::Murmur3, HashFunction::Fnv1a];

    /// Default rows of a Count-Min sketch, one per entry.
    pub const COUNT_MIN_DEFAULTS: [HashFunction; 7] = [
        HashFunction::Xxh3,
        HashFunction::Murmur,
        HashFunction::City,
        HashFunction::Farm,
        HashFunction::Md5,
        HashFunction::Sha1,
        HashFunction::Sha256,
    ];

    /// Canonical catalog name.
    pub fn name(&self) -> &'static str {
        match self {
            HashFunction::Murmur3 => "murmur3",
            HashFunction::Fnv1a => "fnv1a",
            HashFunction::Djb2 => "djb2",
            HashFunction::Xxh3 => "xxh3",
            HashFunction::Murmur => "murmur",
            HashFunction::City => "city",
            HashFunction::Farm => "farm",
            HashFunction::Md5 => "md5",
            HashFunction::Sha1 => "sha1",
            HashFunction::Sha256 => "sha256",
            HashFunction::SipHash13 => "siphash13",
        }
    }

    /// Resolves a list of catalog names, failing on the first unknown one.
    pub fn resolve<S: AsRef<str>>(names: &[S]) -> Result<Vec<HashFunction>, SketchError> {
        names.iter().map(|name| name.as_ref().parse()).collect()
    }

    /// Hashes `input` to a value in `[0, 2^32)`.
    pub fn hash(&self, input: &str) -> u32 {
        match self {
            HashFunction::Murmur3 => murmur3(input),
            HashFunction::Fnv1a => fnv1a(input),
            HashFunction::Djb2 => djb2(input),
            HashFunction::Xxh3 => multiplicative(input, 0xdeadbeef, 0x9e3779b1),
            HashFunction::Murmur => murmur(input),
            HashFunction::City => multiplicative(input, 0x2f90404f, 0xeb382d69),
            HashFunction::Farm => multiplicative(input, 0x97cb3127, 0xed558ccd),
            HashFunction::Md5 => md5(input),
            HashFunction::Sha1 => multiplicative(input, 0x67452301, 0x5a827999),
            HashFunction::Sha256 => multiplicative(input, 0xc1059ed8, 0x1b873593),
            HashFunction::SipHash13 => siphash13(input),
        }
    }

    /// Slot of `input` in a table of `modulus` entries.
    ///
    /// `modulus` must be non-zero; engines guarantee this at configuration time.
    #[inline]
    pub fn index(&self, input: &str, modulus: usize) -> usize {
        (self.hash(input) as u64 % modulus as u64) as usize
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashFunction {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let stem = lowered
            .strip_suffix("-like")
            .or_else(|| lowered.strip_suffix("_like"))
            .unwrap_or(&lowered);
        match stem.replace(['-', '_'], "").as_str() {
            "murmur3" => Ok(HashFunction::Murmur3),
            "fnv1a" => Ok(HashFunction::Fnv1a),
            "djb2" => Ok(HashFunction::Djb2),
            "xxh3" | "xxhash" => Ok(HashFunction::Xxh3),
            "murmur" | "murmurhash" => Ok(HashFunction::Murmur),
            "city" | "cityhash" => Ok(HashFunction::City),
            "farm" | "farmhash" => Ok(HashFunction::Farm),
            "md5" => Ok(HashFunction::Md5),
            "sha1" => Ok(HashFunction::Sha1),
            "sha256" => Ok(HashFunction::Sha256),
            "siphash13" | "sip13" => Ok(HashFunction::SipHash13),
            _ => Err(SketchError::HashCatalogMiss(s.to_string())),
        }
    }
}

/// 64-bit hasher producing two 32-bit lanes, used for HyperLogLog bucketing.
///
/// The first lane selects a bucket, the second supplies the rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lane64;

impl Lane64 {
    /// Hashes `input` to `(h1, h2)`: `h1` picks the bucket, `h2` gives the rank.
    pub fn hash(input: &str) -> (u32, u32) {
        let mut h1: u32 = 0xdeadbeef;
        let mut h2: u32 = 0x41c6ce57;
        for unit in units(input) {
            h1 = (h1 ^ unit).wrapping_mul(2654435761);
            h2 = (h2 ^ unit).wrapping_mul(1597334677);
        }
        h1 = (h1 ^ (h1 >> 16)).wrapping_mul(2246822507);
        h1 ^= (h2 ^ (h2 >> 13)).wrapping_mul(3266489909);
        h2 = (h2 ^ (h2 >> 16)).wrapping_mul(2246822507);
        h2 ^= (h1 ^ (h1 >> 13)).wrapping_mul(3266489909);
        (h1, h2)
    }
}

#[inline]
fn units(input: &str) -> impl Iterator<Item = u32> + '_ {
    input.encode_utf16().map(u32::from)
}

/// Magnitude of the state read as a signed 32-bit integer.
#[inline]
fn magnitude(h: u32) -> u32 {
    (h as i32).unsigned_abs()
}

/// Murmur3 finalizer. Multiplication alone only carries entropy upwards, so
/// the single-lane hashers need this before their low bits are used as a slot.
#[inline]
fn avalanche(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^ (h >> 16)
}

fn murmur3(input: &str) -> u32 {
    let mut h1: u32 = 0xdeadbeef;
    let mut h2: u32 = 0x41c6ce57;
    for unit in units(input) {
        h1 = (h1 ^ unit).wrapping_mul(0x85ebca77);
        h2 = (h2 ^ unit).wrapping_mul(0xc2b2ae3d);
    }
    h1 ^= (h1 ^ (h2 >> 15)).wrapping_mul(0x735a2d97);
    magnitude(h1)
}

fn fnv1a(input: &str) -> u32 {
    units(input).fold(0x811c9dc5u32, |h, unit| (h ^ unit).wrapping_mul(16777619))
}

fn djb2(input: &str) -> u32 {
    magnitude(units(input).fold(5381u32, |h, unit| h.wrapping_mul(33).wrapping_add(unit)))
}

fn md5(input: &str) -> u32 {
    let h = units(input).fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit));
    magnitude(avalanche(h))
}

fn murmur(input: &str) -> u32 {
    let mut h: u32 = 0xdeadbeef;
    for unit in units(input) {
        h = (h ^ unit).wrapping_mul(0x5bd1e995);
        h ^= h >> 13;
    }
    magnitude(avalanche(h))
}

fn multiplicative(input: &str, seed: u32, multiplier: u32) -> u32 {
    let h = units(input).fold(seed, |h, unit| (h ^ unit).wrapping_mul(multiplier));
    magnitude(avalanche(h))
}

fn siphash13(input: &str) -> u32 {
    let mut hasher = SipHasher13::new();
    hasher.write(input.as_bytes());
    let h = hasher.finish();
    (h ^ (h >> 32)) as u32
}
