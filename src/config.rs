//! Global configuration constants for docsearch.
//!
//! All ranking parameters and structural limits are defined here as
//! compile-time constants.

/// Maximum number of results returned by a ranked search.
pub const MAX_RESULTS: usize = 5;

/// Tolerance for comparing relevance scores in the ranking order.
///
/// Two relevances closer than this are considered tied and fall back to the
/// rating comparison. Keeps the top-K stable across sequential and parallel
/// scoring, whose floating-point sums may differ in addition order.
pub const RELEVANCE_EPSILON: f64 = 1e-6;

/// Number of independently locked shards in the concurrent score accumulator.
pub const SHARD_COUNT: usize = 32;

/// Size of the sliding window tracked by [`RequestQueue`](crate::requests::RequestQueue),
/// in queries. One query per minute for a day.
pub const REQUEST_WINDOW: usize = 1440;
