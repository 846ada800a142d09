//! Whitespace tokenizer shared by indexing and query parsing.
//!
//! Terms are maximal runs of non-space bytes; the sole delimiter is the ASCII
//! space. Case is preserved and no normalization is applied — terms compare
//! as byte sequences. The tokenizer itself performs no validation; callers
//! reject words containing control characters via [`is_valid_word`].

/// Split `text` into words on ASCII spaces, skipping empty runs.
///
/// Returned slices borrow from `text` and appear in source order.
pub fn split_into_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|word| !word.is_empty())
}

/// Returns `true` if `word` contains no control characters (bytes < 0x20).
pub fn is_valid_word(word: &str) -> bool {
    word.bytes().all(|b| b >= 0x20)
}
