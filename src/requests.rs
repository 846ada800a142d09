//! Request-rate tracker: counts queries with empty results over a sliding
//! window of the most recent [`REQUEST_WINDOW`] searches.

use crate::config::REQUEST_WINDOW;
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::SearchError;
use crate::index::SearchIndex;
use std::collections::VecDeque;

/// Wraps an index and records, per search, whether it returned no documents.
pub struct RequestQueue<'a> {
    index: &'a SearchIndex,
    // One entry per tracked request: `true` if the result list was empty.
    requests: VecDeque<bool>,
    no_result_count: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self {
            index,
            requests: VecDeque::new(),
            no_result_count: 0,
        }
    }

    /// Searches with the default status filter and records the outcome.
    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        let results = self.index.find_top_documents(raw_query)?;
        self.record(&results);
        Ok(results)
    }

    /// Searches with a status filter and records the outcome.
    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        let results = self
            .index
            .find_top_documents_with_status(raw_query, status)?;
        self.record(&results);
        Ok(results)
    }

    /// Searches with a custom predicate and records the outcome.
    pub fn add_find_request_by<P>(
        &mut self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let results = self.index.find_top_documents_by(raw_query, predicate)?;
        self.record(&results);
        Ok(results)
    }

    /// Number of empty-result searches currently inside the window.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_count
    }

    fn record(&mut self, results: &[Document]) {
        let empty = results.is_empty();
        self.requests.push_back(empty);
        if empty {
            self.no_result_count += 1;
        }
        if self.requests.len() > REQUEST_WINDOW {
            let expired = self.requests.pop_front();
            if expired == Some(true) {
                self.no_result_count -= 1;
            }
        }
    }
}
