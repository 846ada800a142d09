//! Batch query driver: evaluates many queries against one index in parallel.

use crate::document::Document;
use crate::error::SearchError;
use crate::index::SearchIndex;
use rayon::prelude::*;

/// Runs every query through [`SearchIndex::find_top_documents`] on the rayon
/// pool. The result preserves query order: `results[i]` belongs to
/// `queries[i]`. The first failing query aborts the batch.
pub fn process_queries(
    index: &SearchIndex,
    queries: &[String],
) -> Result<Vec<Vec<Document>>, SearchError> {
    queries
        .par_iter()
        .map(|query| index.find_top_documents(query))
        .collect()
}

/// Like [`process_queries`], but flattens the per-query lists into one
/// sequence, still in query order.
pub fn process_queries_joined(
    index: &SearchIndex,
    queries: &[String],
) -> Result<Vec<Document>, SearchError> {
    Ok(process_queries(index, queries)?
        .into_iter()
        .flatten()
        .collect())
}
