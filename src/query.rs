//! Query parsing: raw query text → plus-terms and minus-terms.
//!
//! A minus-term is written `-word` and excludes every document containing the
//! word. Stop words are dropped from both lists. Parsed terms borrow from the
//! raw query text.

use crate::error::SearchError;
use crate::tokenizer::{is_valid_word, split_into_words};
use std::collections::BTreeSet;

/// A parsed query: required plus-terms and forbidden minus-terms.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query<'a> {
    pub plus_words: Vec<&'a str>,
    pub minus_words: Vec<&'a str>,
}

struct QueryWord<'a> {
    data: &'a str,
    is_minus: bool,
    is_stop: bool,
}

fn parse_query_word<'a>(
    raw: &'a str,
    stop_words: &BTreeSet<String>,
) -> Result<QueryWord<'a>, SearchError> {
    if !is_valid_word(raw) {
        return Err(SearchError::InvalidQuery(raw.to_string()));
    }
    let (word, is_minus) = match raw.strip_prefix('-') {
        Some(stripped) => (stripped, true),
        None => (raw, false),
    };
    if word.is_empty() || word.starts_with('-') {
        return Err(SearchError::InvalidQuery(raw.to_string()));
    }
    Ok(QueryWord {
        data: word,
        is_minus,
        is_stop: stop_words.contains(word),
    })
}

impl<'a> Query<'a> {
    /// Parse `text` against the given stop-word set.
    ///
    /// With `sort_and_dedup` both term lists are sorted and uniquified, which
    /// the ranked-search scorer relies on for deterministic iteration. The
    /// parallel match path parses unsorted and tolerates duplicates because
    /// any-hit short-circuits.
    pub fn parse(
        text: &'a str,
        stop_words: &BTreeSet<String>,
        sort_and_dedup: bool,
    ) -> Result<Self, SearchError> {
        let mut query = Query::default();
        for word in split_into_words(text) {
            let parsed = parse_query_word(word, stop_words)?;
            if !parsed.is_stop {
                if parsed.is_minus {
                    query.minus_words.push(parsed.data);
                } else {
                    query.plus_words.push(parsed.data);
                }
            }
        }
        if sort_and_dedup {
            query.plus_words.sort_unstable();
            query.plus_words.dedup();
            query.minus_words.sort_unstable();
            query.minus_words.dedup();
        }
        Ok(query)
    }
}
