// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use criterion::{criterion_group, criterion_main, Criterion};
use sketch_engines::*;
use std::hint::black_box;

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("Query");
    for n in [1000, 10000].iter() {
        let mut bloom = BloomFilter::with_hashes(4096, &["murmur3", "fnv1a"]).unwrap();
        let mut cms = CountMinSketch::with_hashes(256, &["xxh3", "murmur", "city"]).unwrap();
        for i in 0..*n {
            let word = format!("word_{}", i % 500);
            bloom.insert(&word);
            cms.insert(&word);
        }

        group.bench_function(format!("BloomFilter might_contain (N={})", n), |bencher| {
            bencher.iter(|| bloom.might_contain(black_box("word_42")))
        });

        group.bench_function(format!("BloomFilter stats (N={})", n), |bencher| {
            bencher.iter(|| bloom.stats())
        });

        group.bench_function(format!("CountMinSketch estimate (N={})", n), |bencher| {
            bencher.iter(|| cms.estimate_frequency(black_box("word_42")))
        });
    }
    group.finish();
}

fn bench_cardinality(c: &mut Criterion) {
    let mut group = c.benchmark_group("Cardinality");
    for buckets in [64, 1024, 16384].iter() {
        let mut hll = HyperLogLog::with_buckets(*buckets).unwrap();
        for i in 0..10_000 {
            hll.insert(&format!("visitor_{}", i));
        }

        group.bench_function(format!("estimate (m={})", buckets), |bencher| {
            bencher.iter(|| black_box(&hll).estimate_cardinality())
        });

        let other = hll.clone();
        group.bench_function(format!("merge (m={})", buckets), |bencher| {
            bencher.iter(|| {
                let mut merged = hll.clone();
                merged.merge(black_box(&other)).unwrap();
                merged
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_queries, bench_cardinality);
criterion_main!(benches);
