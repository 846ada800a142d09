//! Core document types: identifiers, moderation status, and the scored
//! result record returned by ranked search.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-supplied document identifier.
///
/// Signed so that a negative id can be rejected with
/// [`SearchError::InvalidId`](crate::error::SearchError::InvalidId) instead of
/// silently wrapping.
pub type DocumentId = i32;

/// Moderation status attached to a document at insertion.
///
/// Ranked search filters on `Actual` unless the caller supplies another
/// status or a custom predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Live document, included by the default search filter.
    Actual,
    /// Kept in the index but excluded from default search.
    Irrelevant,
    /// Excluded by moderation.
    Banned,
    /// Scheduled for deletion.
    Removed,
}

/// A scored search result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier of the matched document.
    pub id: DocumentId,
    /// TF-IDF relevance accumulated over the query's plus-terms.
    pub relevance: f64,
    /// Truncated integer mean of the ratings supplied at insertion.
    pub rating: i32,
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ document_id = {}, relevance = {}, rating = {} }}",
            self.id, self.relevance, self.rating
        )
    }
}
