use std::collections::BTreeSet;

use crate::analysis::stopwords::StopWordSet;
use crate::analysis::tokenizer::{is_valid_minus_word, is_valid_word, split_words};
use crate::core::error::{Error, Result};

/// A parsed query: two disjoint word sets. A body listed both with and
/// without the minus prefix ends up in `minus_words` only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub plus_words: BTreeSet<String>,
    pub minus_words: BTreeSet<String>,
}

#[derive(Debug)]
struct QueryWord {
    data: String,
    is_minus: bool,
    is_stop: bool,
}

/// Classifies raw query tokens against a stop-word set.
pub struct QueryParser<'a> {
    stop_words: &'a StopWordSet,
}

impl<'a> QueryParser<'a> {
    pub fn new(stop_words: &'a StopWordSet) -> Self {
        QueryParser { stop_words }
    }

    /// Parse a raw query. With `all_words` set, stop words are kept (match
    /// introspection wants them); otherwise they are dropped.
    pub fn parse(&self, text: &str, all_words: bool) -> Result<Query> {
        let mut query = Query::default();
        for word in split_words(text) {
            let query_word = self.parse_word(word)?;
            if query_word.is_stop && !all_words {
                continue;
            }
            if query_word.is_minus {
                query.minus_words.insert(query_word.data);
            } else {
                query.plus_words.insert(query_word.data);
            }
        }
        // Minus wins when a body appears on both sides
        for word in &query.minus_words {
            query.plus_words.remove(word);
        }
        Ok(query)
    }

    fn parse_word(&self, text: &str) -> Result<QueryWord> {
        if !is_valid_word(text) {
            return Err(Error::invalid_argument(format!(
                "query word {:?} contains a control character",
                text
            )));
        }
        let (data, is_minus) = match text.strip_prefix('-') {
            Some(body) => (body, true),
            None => (text, false),
        };
        if is_minus && !is_valid_minus_word(data) {
            return Err(Error::invalid_argument(format!(
                "{:?} is not a valid minus word",
                text
            )));
        }
        Ok(QueryWord {
            data: data.to_string(),
            is_minus,
            is_stop: self.stop_words.contains(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    fn parse(stop_words: &str, text: &str, all_words: bool) -> Result<Query> {
        let stop_words = StopWordSet::parse(stop_words).unwrap();
        QueryParser::new(&stop_words).parse(text, all_words)
    }

    fn words(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_plus_and_minus_classification() {
        let query = parse("", "cat -city tail", false).unwrap();
        assert_eq!(words(&query.plus_words), vec!["cat", "tail"]);
        assert_eq!(words(&query.minus_words), vec!["city"]);
    }

    #[test]
    fn test_stop_words_dropped_unless_all_words() {
        let query = parse("in the", "cat in the city", false).unwrap();
        assert_eq!(words(&query.plus_words), vec!["cat", "city"]);

        let query = parse("in the", "cat in the city", true).unwrap();
        assert_eq!(words(&query.plus_words), vec!["cat", "city", "in", "the"]);
    }

    #[test]
    fn test_minus_stop_word_dropped() {
        let query = parse("in", "cat -in city", false).unwrap();
        assert_eq!(words(&query.plus_words), vec!["cat", "city"]);
        assert!(query.minus_words.is_empty());
    }

    #[test]
    fn test_interior_minus_is_not_a_prefix() {
        let query = parse("", "cat big-city", false).unwrap();
        assert_eq!(words(&query.plus_words), vec!["big-city", "cat"]);
        assert!(query.minus_words.is_empty());
    }

    #[test]
    fn test_plus_minus_disjoint_minus_wins() {
        let query = parse("", "cat city -city", false).unwrap();
        assert_eq!(words(&query.plus_words), vec!["cat"]);
        assert_eq!(words(&query.minus_words), vec!["city"]);
    }

    #[test]
    fn test_empty_query() {
        let query = parse("", "", false).unwrap();
        assert!(query.plus_words.is_empty());
        assert!(query.minus_words.is_empty());
    }

    #[test]
    fn test_double_minus_rejected() {
        let err = parse("", "cat --city", false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_bare_minus_rejected() {
        let err = parse("", "cat - city", false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_control_byte_rejected() {
        let err = parse("", "cat ci\x12ty", false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
        // A control byte inside a minus word is caught on the raw token
        let err = parse("", "-ci\x12ty", false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
