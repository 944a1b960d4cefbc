// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::traits::{ElementQuery, Sketch};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Thread-safe handle to a single sketch, one lock per instance.
///
/// Clones share the same sketch. Every operation takes the lock for the
/// duration of one insert or query.
///
/// # Example
///
/// ```
/// use sketch_engines::{HyperLogLog, Shared};
/// use std::thread;
///
/// let shared = Shared::new(HyperLogLog::with_buckets(256).unwrap());
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let shared = shared.clone();
///         thread::spawn(move || {
///             for i in 0..100 {
///                 shared.insert(&format!("worker{}-{}", t, i));
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert!(shared.stats().cardinality > 0);
/// ```
#[derive(Debug)]
pub struct Shared<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for Shared<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Sketch> Shared<S> {
    pub fn new(sketch: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sketch)),
        }
    }

    // Every mutation leaves the sketch valid, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, element: &str) {
        self.lock().insert(element);
    }

    /// Inserts a batch under a single lock acquisition.
    pub fn insert_all<I, T>(&self, elements: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut guard = self.lock();
        for element in elements {
            guard.insert(element.as_ref());
        }
    }

    pub fn stats(&self) -> S::Stats {
        self.lock().stats()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Runs `f` against the sketch while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.lock())
    }

    /// Runs `f` against the sketch mutably while holding the lock.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> S
    where
        S: Clone,
    {
        self.lock().clone()
    }
}

impl<S: ElementQuery> Shared<S> {
    pub fn query(&self, element: &str) -> S::Output {
        self.lock().query(element)
    }
}
