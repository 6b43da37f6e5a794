use std::collections::BTreeSet;

use crate::analysis::tokenizer::{is_valid_word, split_words};
use crate::core::error::{Error, Result};

/// Ordered set of words excluded from indexing and from non-introspective
/// queries. Fixed for the lifetime of the engine that owns it.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: BTreeSet<String>,
}

impl StopWordSet {
    /// Build the set from a space-separated string.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_words(split_words(text))
    }

    /// Build the set from individual words. Empty strings are discarded;
    /// a word with a control byte rejects the whole collection.
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            if !is_valid_word(word) {
                return Err(Error::invalid_argument(format!(
                    "stop word {:?} contains a control character",
                    word
                )));
            }
            if !word.is_empty() {
                set.insert(word.to_string());
            }
        }
        Ok(StopWordSet { words: set })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Space-joined, ascending.
    pub fn joined(&self) -> String {
        self.words
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
