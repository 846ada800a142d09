//! # docsearch
//!
//! Embeddable in-memory full-text search engine. Documents are tokenized
//! into an inverted index and ranked by TF-IDF relevance; queries support
//! required plus-terms, forbidden minus-terms, and stop-word filtering.
//! Search, match, and removal each come in sequential and rayon-parallel
//! variants over the same immutable-after-insertion index.

/// Batch query driver: many queries against one index in parallel.
pub mod batch;
/// Concurrency primitives: the sharded score accumulator.
pub mod concurrent;
/// Global configuration constants: result limits and tuning parameters.
pub mod config;
/// Duplicate-document detection and removal.
pub mod dedup;
/// Core document types: ids, statuses, and scored results.
pub mod document;
/// Library error type.
pub mod error;
/// The inverted index and its ranked retrieval operations.
pub mod index;
/// Fixed-size pagination of result slices.
pub mod paginator;
/// Query parsing: plus-terms, minus-terms, stop-word filtering.
pub mod query;
/// Sliding-window tracker of empty-result searches.
pub mod requests;
/// Whitespace tokenizer shared by indexing and querying.
pub mod tokenizer;
