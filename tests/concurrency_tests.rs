// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use sketch_engines::*;
use std::thread;

const WORKERS: usize = 8;
const PER_WORKER: usize = 250;

fn element(worker: usize, i: usize) -> String {
    // Overlapping key space so that workers hit the same slots.
    format!("key-{}", (worker * 31 + i) % 600)
}

fn hammer<S>(shared: &Shared<S>)
where
    S: Sketch + Send + 'static,
{
    let handles: Vec<_> = (0..WORKERS)
        .map(|w| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..PER_WORKER {
                    shared.insert(&element(w, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

fn sequential<S: Sketch>(mut sketch: S) -> S {
    for w in 0..WORKERS {
        for i in 0..PER_WORKER {
            sketch.insert(&element(w, i));
        }
    }
    sketch
}

#[test]
fn test_concurrent_bloom_matches_sequential() {
    let config = BloomConfig::new(512, &["murmur3", "fnv1a", "djb2"]);
    let shared = Shared::new(BloomFilter::new(config.clone()).unwrap());
    hammer(&shared);

    let expected = sequential(BloomFilter::new(config).unwrap());
    assert_eq!(shared.snapshot(), expected);
    assert!(shared.query(&element(3, 17)));
}

#[test]
fn test_concurrent_count_min_matches_sequential() {
    let config = CountMinConfig::new(64, &["xxh3", "murmur", "city", "farm"]);
    let shared = Shared::new(CountMinSketch::new(config.clone()).unwrap());
    hammer(&shared);

    let expected = sequential(CountMinSketch::new(config).unwrap());
    assert_eq!(shared.snapshot(), expected);
    assert_eq!(shared.stats().total_insertions, (WORKERS * PER_WORKER) as u64);
}

#[test]
fn test_concurrent_hyperloglog_matches_sequential() {
    let shared = Shared::new(HyperLogLog::with_buckets(256).unwrap());
    hammer(&shared);

    let expected = sequential(HyperLogLog::with_buckets(256).unwrap());
    assert_eq!(shared.snapshot(), expected);
    assert_eq!(shared.stats().cardinality, expected.estimate_cardinality());
}

#[test]
fn test_sharded_instances_merge_into_single_view() {
    let shards: Vec<Shared<HyperLogLog>> = (0..4)
        .map(|_| Shared::new(HyperLogLog::with_buckets(128).unwrap()))
        .collect();

    let handles: Vec<_> = (0..WORKERS)
        .map(|w| {
            let shards = shards.clone();
            thread::spawn(move || {
                for i in 0..PER_WORKER {
                    let e = element(w, i);
                    let shard = Lane64::hash(&e).0 as usize % shards.len();
                    shards[shard].insert(&e);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut merged = HyperLogLog::with_buckets(128).unwrap();
    for shard in &shards {
        shard.with(|hll| merged.merge(hll)).unwrap();
    }
    let expected = sequential(HyperLogLog::with_buckets(128).unwrap());
    assert_eq!(merged.registers(), expected.registers());
}

#[test]
fn test_batch_insert_and_clear() {
    let shared = Shared::new(CountMinSketch::with_hashes(16, &["md5", "sha1"]).unwrap());
    shared.insert_all(["a", "b", "a"]);
    assert!(shared.query("a") >= 2);

    let rows = shared.with_mut(|cms| {
        cms.insert("c");
        cms.rows()
    });
    assert_eq!(rows, 2);
    assert_eq!(shared.stats().total_insertions, 4);

    shared.clear();
    assert!(shared.with(|cms| cms.is_empty()));
}
