// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use criterion::{criterion_group, criterion_main, Criterion};
use sketch_engines::*;
use std::hint::black_box;

fn words(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("word_{}", i)).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert");
    for n in [100, 1000].iter() {
        let input = words(*n);

        group.bench_function(format!("BloomFilter 1024/3 (N={})", n), |bencher| {
            bencher.iter(|| {
                let mut bloom =
                    BloomFilter::with_hashes(1024, &["murmur3", "fnv1a", "djb2"]).unwrap();
                bloom.insert_all(black_box(&input));
                bloom
            })
        });

        group.bench_function(format!("CountMinSketch default (N={})", n), |bencher| {
            bencher.iter(|| {
                let mut cms = CountMinSketch::new(CountMinConfig::default()).unwrap();
                cms.insert_all(black_box(&input));
                cms
            })
        });

        group.bench_function(format!("HyperLogLog 1024 (N={})", n), |bencher| {
            bencher.iter(|| {
                let mut hll = HyperLogLog::with_buckets(1024).unwrap();
                hll.insert_all(black_box(&input));
                hll
            })
        });
    }
    group.finish();
}

fn bench_hashes(c: &mut Criterion) {
    let mut group = c.benchmark_group("Hash Catalog");
    let input = "the quick brown fox jumps over the lazy dog";
    for hash in HashFunction::ALL {
        group.bench_function(hash.name(), |bencher| {
            bencher.iter(|| hash.hash(black_box(input)))
        });
    }
    group.bench_function("lane64", |bencher| {
        bencher.iter(|| Lane64::hash(black_box(input)))
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_hashes);
criterion_main!(benches);
