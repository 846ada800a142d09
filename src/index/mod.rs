//! In-memory inverted index over caller-supplied documents.
//!
//! [`SearchIndex`] owns three maps kept in lockstep:
//!
//! - `postings`: term → (document id → term frequency),
//! - `doc_terms`: document id → (term → term frequency), the forward index
//!   that makes removal O(document size) and backs [`SearchIndex::word_frequencies`],
//! - `docs`: ordered registry of id → rating/status.
//!
//! A term appears in `postings[t][d]` iff it appears in `doc_terms[d][t]` with
//! the same value, and every id in any posting list is present in `docs`.
//! Term keys are interned `Arc<str>`s shared by both maps, so each distinct
//! term is stored once and posting keys never outlive their text.
//!
//! Mutating operations take `&mut self` and are therefore exclusive; read
//! operations take `&self` and may run concurrently from many threads.

/// Ranked TF-IDF retrieval over the index.
pub mod scorer;

use crate::document::{DocumentId, DocumentStatus};
use crate::error::SearchError;
use crate::query::Query;
use crate::tokenizer::{is_valid_word, split_into_words};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

pub(crate) struct DocumentData {
    pub(crate) rating: i32,
    pub(crate) status: DocumentStatus,
}

/// In-memory full-text index with TF-IDF ranked retrieval.
#[derive(Default)]
pub struct SearchIndex {
    pub(crate) stop_words: BTreeSet<String>,
    pub(crate) postings: HashMap<Arc<str>, BTreeMap<DocumentId, f64>>,
    pub(crate) doc_terms: HashMap<DocumentId, BTreeMap<Arc<str>, f64>>,
    pub(crate) docs: BTreeMap<DocumentId, DocumentData>,
}

impl SearchIndex {
    /// Creates an index with the given stop words.
    ///
    /// Empty entries are dropped. Fails with [`SearchError::InvalidStopWord`]
    /// if any stop word contains a control character.
    pub fn new<I, S>(stop_words: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in stop_words {
            let word = word.as_ref();
            if !is_valid_word(word) {
                return Err(SearchError::InvalidStopWord(word.to_string()));
            }
            if !word.is_empty() {
                set.insert(word.to_string());
            }
        }
        Ok(Self {
            stop_words: set,
            ..Self::default()
        })
    }

    /// Creates an index from a space-separated stop-word string.
    pub fn from_stop_words_text(text: &str) -> Result<Self, SearchError> {
        Self::new(split_into_words(text))
    }

    /// Adds a document.
    ///
    /// Fails with [`SearchError::InvalidId`] if `document_id` is negative or
    /// already present, and with [`SearchError::InvalidDocument`] if any word
    /// of `document` contains a control character. A failed add leaves the
    /// index unchanged.
    pub fn add_document(
        &mut self,
        document_id: DocumentId,
        document: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<(), SearchError> {
        if document_id < 0 || self.docs.contains_key(&document_id) {
            return Err(SearchError::InvalidId(document_id));
        }
        let words = self.split_into_words_no_stop(document)?;

        self.docs.insert(
            document_id,
            DocumentData {
                rating: Self::compute_average_rating(ratings),
                status,
            },
        );

        let inv_word_count = 1.0 / words.len() as f64;
        for word in words {
            let term: Arc<str> = match self.postings.get_key_value(word) {
                Some((interned, _)) => Arc::clone(interned),
                None => Arc::from(word),
            };
            *self
                .postings
                .entry(Arc::clone(&term))
                .or_default()
                .entry(document_id)
                .or_insert(0.0) += inv_word_count;
            *self
                .doc_terms
                .entry(document_id)
                .or_default()
                .entry(term)
                .or_insert(0.0) += inv_word_count;
        }
        debug!(document_id, "document added");
        Ok(())
    }

    /// Removes a document, pruning posting lists that become empty.
    ///
    /// Fails with [`SearchError::UnknownId`] if the id is not present.
    pub fn remove_document(&mut self, document_id: DocumentId) -> Result<(), SearchError> {
        if self.docs.remove(&document_id).is_none() {
            return Err(SearchError::UnknownId(document_id));
        }
        if let Some(freqs) = self.doc_terms.remove(&document_id) {
            for term in freqs.keys() {
                if let Some(postings) = self.postings.get_mut(term) {
                    postings.remove(&document_id);
                    if postings.is_empty() {
                        self.postings.remove(term);
                    }
                }
            }
        }
        debug!(document_id, "document removed");
        Ok(())
    }

    /// [`SearchIndex::remove_document`] with the posting-entry erasures spread
    /// across the rayon pool. Identical observable semantics.
    pub fn remove_document_parallel(&mut self, document_id: DocumentId) -> Result<(), SearchError> {
        if self.docs.remove(&document_id).is_none() {
            return Err(SearchError::UnknownId(document_id));
        }
        if let Some(freqs) = self.doc_terms.remove(&document_id) {
            // Posting lists are distinct values of the outer map, so mutable
            // references to them can be erased from in parallel.
            let mut affected: Vec<&mut BTreeMap<DocumentId, f64>> = self
                .postings
                .iter_mut()
                .filter(|(term, _)| freqs.contains_key(*term))
                .map(|(_, postings)| postings)
                .collect();
            affected
                .par_iter_mut()
                .for_each(|postings| {
                    postings.remove(&document_id);
                });
            self.postings.retain(|_, postings| !postings.is_empty());
        }
        debug!(document_id, "document removed");
        Ok(())
    }

    /// Number of indexed documents.
    pub fn document_count(&self) -> usize {
        self.docs.len()
    }

    /// Document ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.docs.keys().copied()
    }

    /// Term frequencies of one document, ordered by term.
    ///
    /// Returns an empty map for an unknown id or a document with no indexed
    /// terms; never fails.
    pub fn word_frequencies(&self, document_id: DocumentId) -> &BTreeMap<Arc<str>, f64> {
        static EMPTY: BTreeMap<Arc<str>, f64> = BTreeMap::new();
        self.doc_terms.get(&document_id).unwrap_or(&EMPTY)
    }

    /// Returns the query words contained in document `document_id`, sorted
    /// and deduplicated, together with the document's status.
    ///
    /// If any minus-term of the query occurs in the document, the word list
    /// is empty.
    pub fn match_document<'q>(
        &self,
        raw_query: &'q str,
        document_id: DocumentId,
    ) -> Result<(Vec<&'q str>, DocumentStatus), SearchError> {
        let query = Query::parse(raw_query, &self.stop_words, true)?;
        let status = self.document_status(document_id)?;

        for word in &query.minus_words {
            if self.word_occurs_in(word, document_id) {
                return Ok((Vec::new(), status));
            }
        }
        let matched: Vec<&str> = query
            .plus_words
            .iter()
            .copied()
            .filter(|word| self.word_occurs_in(word, document_id))
            .collect();
        Ok((matched, status))
    }

    /// [`SearchIndex::match_document`] with the minus-term check and the
    /// plus-term filter run on the rayon pool. Same result; the word list is
    /// sorted and deduplicated after the parallel filter.
    pub fn match_document_parallel<'q>(
        &self,
        raw_query: &'q str,
        document_id: DocumentId,
    ) -> Result<(Vec<&'q str>, DocumentStatus), SearchError> {
        let query = Query::parse(raw_query, &self.stop_words, false)?;
        let status = self.document_status(document_id)?;

        if query
            .minus_words
            .par_iter()
            .any(|word| self.word_occurs_in(word, document_id))
        {
            return Ok((Vec::new(), status));
        }
        let mut matched: Vec<&str> = query
            .plus_words
            .par_iter()
            .copied()
            .filter(|word| self.word_occurs_in(word, document_id))
            .collect();
        matched.par_sort_unstable();
        matched.dedup();
        Ok((matched, status))
    }

    fn document_status(&self, document_id: DocumentId) -> Result<DocumentStatus, SearchError> {
        self.docs
            .get(&document_id)
            .map(|data| data.status)
            .ok_or(SearchError::UnknownId(document_id))
    }

    fn word_occurs_in(&self, word: &str, document_id: DocumentId) -> bool {
        self.postings
            .get(word)
            .is_some_and(|postings| postings.contains_key(&document_id))
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>, SearchError> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(SearchError::InvalidDocument(word.to_string()));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    fn compute_average_rating(ratings: &[i32]) -> i32 {
        if ratings.is_empty() {
            return 0;
        }
        let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        (sum / ratings.len() as i64) as i32
    }
}
