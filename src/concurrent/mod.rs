//! Concurrency primitives used by the parallel search paths.

/// Sharded concurrent score accumulator.
pub mod accumulator;

pub use accumulator::{ScoreRef, ShardedAccumulator};
