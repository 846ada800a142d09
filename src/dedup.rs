//! Duplicate-document removal.
//!
//! Two documents are duplicates when their term *sets* are equal; term
//! frequencies are ignored. The earliest id wins.

use crate::document::DocumentId;
use crate::error::SearchError;
use crate::index::SearchIndex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Removes every document whose term set was already seen at a smaller id.
///
/// Returns the removed ids in ascending order.
pub fn remove_duplicates(index: &mut SearchIndex) -> Result<Vec<DocumentId>, SearchError> {
    let mut seen: HashSet<Vec<Arc<str>>> = HashSet::new();
    let mut duplicates = Vec::new();

    for id in index.ids() {
        // word_frequencies iterates in term order, so the key vector is a
        // canonical form of the term set.
        let words: Vec<Arc<str>> = index.word_frequencies(id).keys().cloned().collect();
        if !seen.insert(words) {
            duplicates.push(id);
        }
    }

    for &id in &duplicates {
        info!(document_id = id, "found duplicate document");
        index.remove_document(id)?;
    }
    Ok(duplicates)
}
