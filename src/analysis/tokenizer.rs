//! Word splitting and validation.
//!
//! The separator is a single byte: ASCII space (0x20). Runs of spaces,
//! including leading and trailing ones, produce no empty tokens. A word is
//! valid iff none of its bytes is a control byte (< 0x20); UTF-8
//! continuation bytes are all >= 0x80, so multi-byte text passes untouched.

/// Split `text` on runs of ASCII spaces.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ').filter(|word| !word.is_empty())
}

/// A word may not contain control bytes, anywhere.
pub fn is_valid_word(word: &str) -> bool {
    word.bytes().all(|b| b >= 0x20)
}

/// The body of a minus word (after the leading `-` is stripped) must be
/// non-empty and must not itself start with `-`.
pub fn is_valid_minus_word(body: &str) -> bool {
    !body.is_empty() && !body.starts_with('-')
}
