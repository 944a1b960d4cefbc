// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use serde::Serialize;
use thiserror::Error;

/// Error type for sketch configuration and combination.
///
/// Insertion and per-element queries are total and never produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SketchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown hash function: {0}")]
    HashCatalogMiss(String),
    #[error("Incompatible merge: {0}")]
    IncompatibleMerge(String),
    #[error("Duplicate element: {0}")]
    DuplicateElement(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Core sketch trait - the global surface shared by all three engines.
///
/// Every engine is a deterministic state machine: a fresh engine is built from
/// a configuration, mutated only through [`Sketch::insert`], and read through
/// [`Sketch::stats`] (plus [`ElementQuery::query`] where a per-element answer
/// exists).
///
/// # Requirements
///
/// Implementations must satisfy the following properties:
/// - **Order independence**: any permutation of the same multiset of
///   insertions yields identical state.
/// - **Monotonicity**: insertion never lowers a bit, counter or register.
/// - **Read-only queries**: `stats` and `query` never mutate state.
pub trait Sketch {
    /// Snapshot type returned by [`Sketch::stats`].
    type Stats: Serialize;

    /// Records one occurrence of `element`.
    fn insert(&mut self, element: &str);

    /// Structural summary plus the derived estimate, recomputed from current state.
    fn stats(&self) -> Self::Stats;

    /// Discards all accumulated state while keeping the configuration.
    fn clear(&mut self);

    /// Returns true if nothing has been recorded since the last (re)configuration.
    fn is_empty(&self) -> bool;

    /// Inserts every element of `elements` in iteration order.
    ///
    /// The resulting state does not depend on that order.
    fn insert_all<I, T>(&mut self, elements: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
        Self: Sized,
    {
        for element in elements {
            self.insert(element.as_ref());
        }
    }
}

/// Per-element query, for engines that can answer one.
///
/// HyperLogLog has no per-element answer and does not implement this.
pub trait ElementQuery: Sketch {
    type Output;

    fn query(&self, element: &str) -> Self::Output;
}
