// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Walks through the three engines with a handful of named elements and a
//! bulk load of random strings, printing stats after each step.
//!
//! Run with `RUST_LOG=sketch_engines=debug cargo run --example walkthrough`.

use rand::distr::Alphanumeric;
use rand::Rng;
use sketch_engines::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Constants & Config
// ============================================================================

const BULK_COUNT: usize = 10_000;
const BULK_LEN: usize = 8;

const CONFIGS: [&str; 3] = [
    r#"{"kind": "bloom_filter", "size": 32, "hashes": ["murmur3", "fnv1a"]}"#,
    r#"{"kind": "count_min_sketch", "width": 8, "hashes": ["xxh3", "murmur", "city"]}"#,
    r#"{"kind": "hyperloglog", "buckets": 64}"#,
];

const NAMED: [&str; 6] = ["apple", "banana", "cherry", "apple", "date", "apple"];
const PROBES: [&str; 3] = ["apple", "cherry", "fig"];

fn random_string(rng: &mut impl Rng) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(BULK_LEN)
        .map(char::from)
        .collect()
}

fn print_stats(label: &str, sketch: &AnySketch) -> Result<(), Box<dyn std::error::Error>> {
    println!("{} -> {}", label, serde_json::to_string_pretty(&sketch.stats())?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketch_engines=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut rng = rand::rng();

    for config in CONFIGS {
        let mut audited = Audited::new(AnySketch::from_json(config)?);
        let kind = audited.sketch().kind();
        println!("==== {} ====", kind);

        audited.insert_all(NAMED);
        for probe in PROBES {
            match audited.sketch().query(probe) {
                Some(answer) => println!(
                    "{:>8}: {:?} (exact count {})",
                    probe,
                    answer,
                    audited.exact_count(probe)
                ),
                None => break,
            }
        }
        print_stats("named", audited.sketch())?;

        for _ in 0..BULK_COUNT {
            audited.insert(&random_string(&mut rng));
        }
        print_stats("bulk", audited.sketch())?;
        println!(
            "exact: {} distinct of {} inserted",
            audited.exact_distinct(),
            audited.exact_total()
        );
    }

    // A mistyped hash name is rejected before any state exists.
    match AnySketch::from_json(r#"{"kind": "bloom_filter", "size": 8, "hashes": ["crc32"]}"#) {
        Ok(_) => println!("unexpectedly accepted crc32"),
        Err(e) => println!("rejected: {}", e),
    }

    Ok(())
}
