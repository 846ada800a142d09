//! Library error type.
//!
//! Every fallible operation surfaces one of these variants to the caller;
//! nothing is retried or masked internally. A syntactically valid query that
//! matches no document is *not* an error — it returns an empty result list.

use crate::document::DocumentId;

/// Errors raised by the search engine.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// A stop word passed to the constructor contains a control character.
    #[error("stop word contains characters from 0x00 to 0x1F: {0:?}")]
    InvalidStopWord(String),

    /// Document id is negative, or already present on insert.
    #[error("invalid document id: {0}")]
    InvalidId(DocumentId),

    /// Document text contains a control character.
    #[error("document word contains characters from 0x00 to 0x1F: {0:?}")]
    InvalidDocument(String),

    /// Query contains a control character or a malformed minus-term
    /// (`-`, `--word`, or a bare `-` before a space).
    #[error("invalid query word: {0:?}")]
    InvalidQuery(String),

    /// The document id is not present in the index.
    #[error("document with id = {0} does not exist")]
    UnknownId(DocumentId),
}
