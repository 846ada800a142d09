//! TF-IDF ranked retrieval.
//!
//! The public entry points come in sequential and `_parallel` pairs sharing
//! the same scoring rule: for every plus-term present in the index,
//! `idf = ln(document_count / documents_containing_term)` and each admitted
//! document accumulates `tf * idf`; documents containing any minus-term are
//! then dropped. Results are ordered by relevance descending, with ties
//! (within [`RELEVANCE_EPSILON`]) broken by rating descending, and truncated
//! to [`MAX_RESULTS`].
//!
//! The parallel scorer fans plus- and minus-terms out over the rayon pool and
//! accumulates into a [`ShardedAccumulator`] so concurrent per-document
//! updates do not contend on a single map. Plus-term accumulation completes
//! before any minus-term erasure starts, so both paths admit and exclude the
//! same documents; only the floating-point addition order may differ, which
//! the ε-aware ordering absorbs.

use super::SearchIndex;
use crate::concurrent::ShardedAccumulator;
use crate::config::{MAX_RESULTS, RELEVANCE_EPSILON, SHARD_COUNT};
use crate::document::{Document, DocumentId, DocumentStatus};
use crate::error::SearchError;
use crate::query::Query;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Ranking order: relevance descending with ε tolerance, then rating
/// descending. Documents tied on both may appear in any relative order.
fn ranking_order(lhs: &Document, rhs: &Document) -> Ordering {
    if (lhs.relevance - rhs.relevance).abs() < RELEVANCE_EPSILON {
        rhs.rating.cmp(&lhs.rating)
    } else {
        rhs.relevance.total_cmp(&lhs.relevance)
    }
}

impl SearchIndex {
    /// Ranked search over documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Ranked search over documents with the given status.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_by(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Ranked search admitting documents for which `predicate(id, status,
    /// rating)` returns `true`. Returns at most [`MAX_RESULTS`] documents.
    pub fn find_top_documents_by<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let query = Query::parse(raw_query, &self.stop_words, true)?;
        let mut matched = self.find_all_documents(&query, predicate);
        matched.sort_by(ranking_order);
        matched.truncate(MAX_RESULTS);
        Ok(matched)
    }

    /// Parallel twin of [`SearchIndex::find_top_documents`].
    pub fn find_top_documents_parallel(
        &self,
        raw_query: &str,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_with_status_parallel(raw_query, DocumentStatus::Actual)
    }

    /// Parallel twin of [`SearchIndex::find_top_documents_with_status`].
    pub fn find_top_documents_with_status_parallel(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>, SearchError> {
        self.find_top_documents_by_parallel(raw_query, move |_, document_status, _| {
            document_status == status
        })
    }

    /// Parallel twin of [`SearchIndex::find_top_documents_by`].
    pub fn find_top_documents_by_parallel<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>, SearchError>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words, true)?;
        let mut matched = self.find_all_documents_parallel(&query, predicate);
        matched.par_sort_by(ranking_order);
        matched.truncate(MAX_RESULTS);
        Ok(matched)
    }

    fn inverse_document_freq(&self, documents_containing: usize) -> f64 {
        (self.docs.len() as f64 / documents_containing as f64).ln()
    }

    fn build_results(&self, document_to_relevance: BTreeMap<DocumentId, f64>) -> Vec<Document> {
        document_to_relevance
            .into_iter()
            .map(|(id, relevance)| Document {
                id,
                relevance,
                rating: self.docs[&id].rating,
            })
            .collect()
    }

    fn find_all_documents<P>(&self, query: &Query<'_>, predicate: P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<DocumentId, f64> = BTreeMap::new();

        for word in &query.plus_words {
            let Some(postings) = self.postings.get(*word) else {
                continue;
            };
            let inverse_document_freq = self.inverse_document_freq(postings.len());
            for (&document_id, &term_freq) in postings {
                let data = &self.docs[&document_id];
                if predicate(document_id, data.status, data.rating) {
                    *document_to_relevance.entry(document_id).or_insert(0.0) +=
                        term_freq * inverse_document_freq;
                }
            }
        }

        for word in &query.minus_words {
            let Some(postings) = self.postings.get(*word) else {
                continue;
            };
            for document_id in postings.keys() {
                document_to_relevance.remove(document_id);
            }
        }

        self.build_results(document_to_relevance)
    }

    fn find_all_documents_parallel<P>(&self, query: &Query<'_>, predicate: P) -> Vec<Document>
    where
        P: Fn(DocumentId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance = ShardedAccumulator::new(SHARD_COUNT);

        query.plus_words.par_iter().for_each(|word| {
            if let Some(postings) = self.postings.get(*word) {
                let inverse_document_freq = self.inverse_document_freq(postings.len());
                for (&document_id, &term_freq) in postings {
                    let data = &self.docs[&document_id];
                    if predicate(document_id, data.status, data.rating) {
                        *document_to_relevance.at(document_id) +=
                            term_freq * inverse_document_freq;
                    }
                }
            }
        });

        query.minus_words.par_iter().for_each(|word| {
            if let Some(postings) = self.postings.get(*word) {
                for &document_id in postings.keys() {
                    document_to_relevance.erase(document_id);
                }
            }
        });

        self.build_results(document_to_relevance.into_map())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> SearchIndex {
        let mut idx = SearchIndex::new(["и", "в", "на"]).unwrap();
        idx.add_document(1, "белый кот и модный ошейник", DocumentStatus::Actual, &[8, -3])
            .unwrap();
        idx.add_document(2, "пушистый кот пушистый хвост", DocumentStatus::Actual, &[7, 2, 7])
            .unwrap();
        idx.add_document(3, "ухоженный пёс выразительные глаза", DocumentStatus::Actual, &[5, -12, 2, 1])
            .unwrap();
        idx
    }

    #[test]
    fn test_ranked_order() {
        let idx = corpus();
        let results = idx.find_top_documents("пушистый ухоженный кот").unwrap();
        let ids: Vec<DocumentId> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn test_relevance_values() {
        let idx = corpus();
        let results = idx.find_top_documents("пушистый ухоженный кот").unwrap();
        // Doc 2: "пушистый" tf=1/2 idf=ln(3/1), "кот" tf=1/4 idf=ln(3/2)
        let expected = 0.5 * (3.0_f64).ln() + 0.25 * (1.5_f64).ln();
        assert!((results[0].relevance - expected).abs() < 1e-12);
        assert_eq!(results[0].rating, 5); // (7 + 2 + 7) / 3
    }

    #[test]
    fn test_minus_word_excludes() {
        let idx = corpus();
        let results = idx.find_top_documents("пушистый -ошейник").unwrap();
        let ids: Vec<DocumentId> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, [2]);
    }

    #[test]
    fn test_status_filter() {
        let mut idx = corpus();
        idx.add_document(4, "пушистый пёс", DocumentStatus::Banned, &[9]).unwrap();
        let results = idx
            .find_top_documents_with_status("пушистый", DocumentStatus::Banned)
            .unwrap();
        let ids: Vec<DocumentId> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, [4]);
    }

    #[test]
    fn test_predicate_filter() {
        let idx = corpus();
        let results = idx
            .find_top_documents_by("пушистый ухоженный кот", |id, _, _| id % 2 == 1)
            .unwrap();
        let ids: Vec<DocumentId> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, [3, 1]);
    }

    #[test]
    fn test_equal_relevance_breaks_ties_by_rating() {
        let mut idx = SearchIndex::new(["x"]).unwrap();
        let ratings: [&[i32]; 5] = [&[1, 1], &[1, 2], &[1, 3], &[1, 4], &[1, 5]];
        for (i, r) in ratings.iter().enumerate() {
            idx.add_document(i as DocumentId, "same words here", DocumentStatus::Actual, r)
                .unwrap();
        }
        let results = idx.find_top_documents("words").unwrap();
        let ratings: Vec<i32> = results.iter().map(|d| d.rating).collect();
        assert_eq!(ratings, [3, 2, 2, 1, 1]); // truncated means of [1,n]
        let ids: Vec<DocumentId> = results.iter().map(|d| d.id).collect();
        assert_eq!(ids, [4, 2, 3, 0, 1]);
    }

    #[test]
    fn test_truncates_to_max_results() {
        let mut idx = SearchIndex::new(Vec::<String>::new()).unwrap();
        for id in 0..8 {
            idx.add_document(id, "common word", DocumentStatus::Actual, &[id])
                .unwrap();
        }
        let results = idx.find_top_documents("common").unwrap();
        assert_eq!(results.len(), MAX_RESULTS);
        // Equal relevance everywhere: top ratings win
        let ratings: Vec<i32> = results.iter().map(|d| d.rating).collect();
        assert_eq!(ratings, [7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let idx = corpus();
        assert!(idx.find_top_documents("собака").unwrap().is_empty());
        assert!(idx.find_top_documents("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_query_propagates() {
        let idx = corpus();
        assert!(matches!(
            idx.find_top_documents("пушистый --кот"),
            Err(SearchError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_parallel_agrees_with_sequential() {
        let idx = corpus();
        for query in [
            "пушистый ухоженный кот",
            "пушистый -ошейник",
            "кот -хвост",
            "белый кот",
            "никого",
        ] {
            let sequential = idx.find_top_documents(query).unwrap();
            let parallel = idx.find_top_documents_parallel(query).unwrap();
            assert_eq!(sequential.len(), parallel.len(), "query {query:?}");
            for (s, p) in sequential.iter().zip(&parallel) {
                assert_eq!(s.id, p.id, "query {query:?}");
                assert_eq!(s.rating, p.rating);
                assert!((s.relevance - p.relevance).abs() < RELEVANCE_EPSILON);
            }
        }
    }

    #[test]
    fn test_parallel_predicate_filter() {
        let idx = corpus();
        let sequential = idx
            .find_top_documents_by("пушистый ухоженный кот", |_, _, rating| rating > 0)
            .unwrap();
        let parallel = idx
            .find_top_documents_by_parallel("пушистый ухоженный кот", |_, _, rating| rating > 0)
            .unwrap();
        let seq_ids: Vec<DocumentId> = sequential.iter().map(|d| d.id).collect();
        let par_ids: Vec<DocumentId> = parallel.iter().map(|d| d.id).collect();
        assert_eq!(seq_ids, par_ids);
    }
}
