//! Sharded floating-point score accumulator.
//!
//! Parallel scoring updates per-document relevance from many rayon tasks at
//! once. A single mutex around one map would serialize them, so the key space
//! is partitioned into [`SHARD_COUNT`](crate::config::SHARD_COUNT) buckets by
//! `id mod S`, each behind its own `parking_lot::Mutex`. Obtaining a value
//! returns a guard that keeps the owning shard locked for its lifetime, so a
//! read-modify-write like `*acc.at(id) += w` is a single critical section and
//! no atomic float operations are needed.

use crate::config::SHARD_COUNT;
use crate::document::DocumentId;
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

type Shard = BTreeMap<DocumentId, f64>;

/// Concurrent `DocumentId → f64` accumulator partitioned into independently
/// locked shards.
#[derive(Debug)]
pub struct ShardedAccumulator {
    shards: Vec<Mutex<Shard>>,
}

/// Exclusive handle to one accumulator value.
///
/// Holds the owning shard's lock until dropped.
pub struct ScoreRef<'a> {
    guard: MappedMutexGuard<'a, f64>,
}

impl Deref for ScoreRef<'_> {
    type Target = f64;

    fn deref(&self) -> &f64 {
        &self.guard
    }
}

impl DerefMut for ScoreRef<'_> {
    fn deref_mut(&mut self) -> &mut f64 {
        &mut self.guard
    }
}

impl ShardedAccumulator {
    /// Creates an accumulator with `shard_count` shards.
    pub fn new(shard_count: usize) -> Self {
        assert!(shard_count > 0, "shard count must be positive");
        Self {
            shards: (0..shard_count).map(|_| Mutex::new(Shard::new())).collect(),
        }
    }

    fn shard_for(&self, key: DocumentId) -> &Mutex<Shard> {
        let index = (key as i64).rem_euclid(self.shards.len() as i64) as usize;
        &self.shards[index]
    }

    /// Locks the shard owning `key` and returns a handle to its value,
    /// inserting `0.0` if the key is absent.
    pub fn at(&self, key: DocumentId) -> ScoreRef<'_> {
        let guard = self.shard_for(key).lock();
        ScoreRef {
            guard: MutexGuard::map(guard, |shard| shard.entry(key).or_insert(0.0)),
        }
    }

    /// Removes `key` from its shard if present.
    pub fn erase(&self, key: DocumentId) {
        self.shard_for(key).lock().remove(&key);
    }

    /// Consumes the accumulator and unions the shards into one ordered map.
    ///
    /// Shards partition the key space, so the union is disjoint. Taking `self`
    /// by value guarantees no other thread still holds a handle.
    pub fn into_map(self) -> BTreeMap<DocumentId, f64> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            merged.extend(shard.into_inner());
        }
        merged
    }
}

impl Default for ShardedAccumulator {
    fn default() -> Self {
        Self::new(SHARD_COUNT)
    }
}
