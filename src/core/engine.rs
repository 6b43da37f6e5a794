use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analysis::stopwords::StopWordSet;
use crate::analysis::tokenizer::{is_valid_word, split_words};
use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::core::types::{DocId, Document, DocumentStatus};
use crate::index::inverted::InvertedIndex;
use crate::query::cache::{CacheStats, QueryCache, QueryKey};
use crate::query::parser::QueryParser;
use crate::scoring::scorer::TfIdfScorer;

/// Ranked result lists are cut to this many documents.
pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;

/// The search engine: owns the stop-word set, the inverted index, and a
/// result cache.
///
/// Reads (`find_top_documents*`, `match_document*`, accessors) take `&self`
/// and may run concurrently; mutations take `&mut self`, so exclusive
/// access is enforced by the borrow checker rather than internal locks.
#[derive(Debug)]
pub struct SearchEngine {
    config: Config,
    stop_words: StopWordSet,
    index: InvertedIndex,
    cache: QueryCache,
}

/// Point-in-time counters for monitoring.
#[derive(Debug, Clone)]
pub struct EngineStats {
    pub document_count: usize,
    pub distinct_words: usize,
    pub cache: CacheStats,
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::with_config(StopWordSet::default(), Config::default())
    }
}

impl SearchEngine {
    /// Construct from a space-separated stop-word string.
    pub fn new(stop_words: &str) -> Result<Self> {
        Ok(SearchEngine::with_config(
            StopWordSet::parse(stop_words)?,
            Config::default(),
        ))
    }

    /// Construct from individual stop words.
    pub fn with_stop_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(SearchEngine::with_config(
            StopWordSet::from_words(words)?,
            Config::default(),
        ))
    }

    pub fn with_config(stop_words: StopWordSet, config: Config) -> Self {
        let cache = QueryCache::new(config.query_cache_size);
        SearchEngine {
            config,
            stop_words,
            index: InvertedIndex::new(),
            cache,
        }
    }

    /// Index a document. Fails on a negative id, an id already present, or
    /// a body word containing a control byte. Nothing is modified on
    /// failure: the word-frequency map is fully built before any insert.
    pub fn add_document(
        &mut self,
        id: DocId,
        body: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if id.value() < 0 {
            return Err(Error::invalid_argument(format!(
                "document id {} is negative",
                id
            )));
        }
        if self.index.contains(id) {
            return Err(Error::invalid_argument(format!(
                "document id {} already exists",
                id
            )));
        }

        let words = self.split_into_words_no_stop(body)?;
        let mut word_frequency: BTreeMap<String, f64> = BTreeMap::new();
        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            for word in words {
                *word_frequency.entry(word.to_string()).or_insert(0.0) += inv_word_count;
            }
        }

        let rating = average_rating(ratings);
        let word_count = word_frequency.len();
        self.index.insert_document(id, word_frequency, status, rating);
        self.cache.clear();
        debug!(%id, words = word_count, "document indexed");
        Ok(())
    }

    /// Top documents with status `Actual`.
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status(raw_query, DocumentStatus::Actual)
    }

    /// Top documents with the given status. Results are cached per
    /// (query, status) until the next mutation.
    pub fn find_top_documents_with_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let key = QueryKey {
            query: raw_query.to_string(),
            status,
        };
        if let Some(documents) = self.cache.get(&key) {
            return Ok(documents);
        }
        let documents = self.find_top_documents_by(raw_query, |_, st, _| st == status)?;
        self.cache.put(key, documents.clone());
        Ok(documents)
    }

    /// Top documents passing an arbitrary predicate over (id, status,
    /// rating). Predicate results are not cached.
    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let query = QueryParser::new(&self.stop_words).parse(raw_query, false)?;
        let mut documents = TfIdfScorer::new(&self.index).score(&query, predicate);
        documents.sort_by(Document::compare_relevance);
        documents.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(documents)
    }

    /// Parallel counterpart of [`find_top_documents`].
    pub fn find_top_documents_par(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_with_status_par(raw_query, DocumentStatus::Actual)
    }

    /// Parallel counterpart of [`find_top_documents_with_status`].
    pub fn find_top_documents_with_status_par(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let key = QueryKey {
            query: raw_query.to_string(),
            status,
        };
        if let Some(documents) = self.cache.get(&key) {
            return Ok(documents);
        }
        let documents =
            self.find_top_documents_by_par(raw_query, |_, st, _| st == status)?;
        self.cache.put(key, documents.clone());
        Ok(documents)
    }

    /// Parallel counterpart of [`find_top_documents_by`]: plus words are
    /// scored on the rayon pool into a sharded accumulator and the final
    /// ordering uses a parallel sort.
    pub fn find_top_documents_by_par<P>(
        &self,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = QueryParser::new(&self.stop_words).parse(raw_query, false)?;
        let mut documents =
            TfIdfScorer::new(&self.index).score_par(&query, predicate, self.config.shard_count);
        documents.par_sort_by(Document::compare_relevance);
        documents.truncate(MAX_RESULT_DOCUMENT_COUNT);
        Ok(documents)
    }

    /// Which plus words of `raw_query` occur in the document, sorted
    /// lexicographically, along with the document's status. Stop words are
    /// kept. If any minus word occurs in the document the word list is
    /// empty.
    pub fn match_document(
        &self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = QueryParser::new(&self.stop_words).parse(raw_query, true)?;
        let status = self.document_status(id)?;

        let has_minus = query
            .minus_words
            .iter()
            .any(|word| self.index.doc_contains_word(id, word));
        if has_minus {
            return Ok((Vec::new(), status));
        }

        // BTreeSet iteration is ascending, so the result is already sorted
        let words: Vec<String> = query
            .plus_words
            .iter()
            .filter(|word| self.index.doc_contains_word(id, word.as_str()))
            .cloned()
            .collect();
        Ok((words, status))
    }

    /// Parallel counterpart of [`match_document`].
    pub fn match_document_par(
        &self,
        raw_query: &str,
        id: DocId,
    ) -> Result<(Vec<String>, DocumentStatus)> {
        let query = QueryParser::new(&self.stop_words).parse(raw_query, true)?;
        let status = self.document_status(id)?;

        let has_minus = query
            .minus_words
            .par_iter()
            .any(|word| self.index.doc_contains_word(id, word));
        if has_minus {
            return Ok((Vec::new(), status));
        }

        let mut words: Vec<String> = query
            .plus_words
            .par_iter()
            .filter(|word| self.index.doc_contains_word(id, word.as_str()))
            .cloned()
            .collect();
        words.sort_unstable();
        Ok((words, status))
    }

    /// Drop a document from the index. Unknown ids are ignored.
    pub fn remove_document(&mut self, id: DocId) {
        if self.index.remove_document(id) {
            self.cache.clear();
            debug!(%id, "document removed");
        }
    }

    /// Parallel counterpart of [`remove_document`].
    pub fn remove_document_par(&mut self, id: DocId) {
        if self.index.remove_document_par(id) {
            self.cache.clear();
            debug!(%id, "document removed");
        }
    }

    pub fn document_count(&self) -> usize {
        self.index.document_count()
    }

    /// The document's word → term-frequency map; empty for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<String, f64> {
        self.index.word_frequencies(id)
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.index.ids()
    }

    /// Positional id accessor over the ascending id sequence.
    pub fn document_id_at(&self, index: i32) -> Result<DocId> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.index.id_at(index))
            .ok_or_else(|| {
                Error::out_of_range(format!(
                    "index {} out of range for {} documents",
                    index,
                    self.index.document_count()
                ))
            })
    }

    /// Stop words, space-joined and ascending.
    pub fn stop_words(&self) -> String {
        self.stop_words.joined()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            document_count: self.index.document_count(),
            distinct_words: self.index.word_count(),
            cache: self.cache.stats(),
        }
    }

    fn document_status(&self, id: DocId) -> Result<DocumentStatus> {
        self.index
            .meta(id)
            .map(|meta| meta.status)
            .ok_or_else(|| Error::out_of_range(format!("no document with id {}", id)))
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_words(text) {
            if !is_valid_word(word) {
                return Err(Error::invalid_argument(format!(
                    "word {:?} contains a control character",
                    word
                )));
            }
            if !self.stop_words.contains(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}

/// Integer average of the ratings, truncated toward zero; 0 when empty.
/// The sum is widened to i64 so pathological rating vectors cannot
/// overflow.
fn average_rating(ratings: &[i32]) -> i32 {
    if ratings.is_empty() {
        return 0;
    }
    let sum: i64 = ratings.iter().map(|&rating| i64::from(rating)).sum();
    (sum / ratings.len() as i64) as i32
}
