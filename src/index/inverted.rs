use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::core::types::{DocId, DocumentMeta, DocumentStatus};

static EMPTY_WORD_FREQUENCY: BTreeMap<String, f64> = BTreeMap::new();

/// In-memory inverted index.
///
/// Three structures are kept consistent across every mutation:
/// - the forward map `word → (doc id → term frequency)`;
/// - per-document metadata, whose `word_frequency` mirrors the forward map;
/// - the ordered set of live document ids.
///
/// A word is present in the forward map iff at least one live document
/// contains it.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    word_docs: BTreeMap<String, BTreeMap<DocId, f64>>,
    documents: BTreeMap<DocId, DocumentMeta>,
    ids: BTreeSet<DocId>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document whose word frequencies have already been computed.
    /// The caller guarantees `id` is not present.
    pub fn insert_document(
        &mut self,
        id: DocId,
        word_frequency: BTreeMap<String, f64>,
        status: DocumentStatus,
        rating: i32,
    ) {
        for (word, freq) in &word_frequency {
            self.word_docs
                .entry(word.clone())
                .or_default()
                .insert(id, *freq);
        }
        self.documents.insert(
            id,
            DocumentMeta {
                rating,
                status,
                word_frequency,
            },
        );
        self.ids.insert(id);
    }

    /// Erase a document from all three structures. Returns false (and does
    /// nothing) when the id is unknown.
    pub fn remove_document(&mut self, id: DocId) -> bool {
        let meta = match self.documents.remove(&id) {
            Some(meta) => meta,
            None => return false,
        };
        for word in meta.word_frequency.keys() {
            if let Some(postings) = self.word_docs.get_mut(word) {
                postings.remove(&id);
                if postings.is_empty() {
                    self.word_docs.remove(word);
                }
            }
        }
        self.ids.remove(&id);
        true
    }

    /// Parallel removal: per-word posting erasures run on the rayon pool
    /// over disjoint mutable borrows, then emptied words are pruned
    /// sequentially so the forward map stays minimal.
    pub fn remove_document_par(&mut self, id: DocId) -> bool {
        let meta = match self.documents.remove(&id) {
            Some(meta) => meta,
            None => return false,
        };
        let doc_words: HashSet<&str> =
            meta.word_frequency.keys().map(String::as_str).collect();

        let mut postings: Vec<&mut BTreeMap<DocId, f64>> = self
            .word_docs
            .iter_mut()
            .filter(|(word, _)| doc_words.contains(word.as_str()))
            .map(|(_, postings)| postings)
            .collect();
        postings.par_iter_mut().for_each(|postings| {
            postings.remove(&id);
        });

        for word in meta.word_frequency.keys() {
            if self.word_docs.get(word).is_some_and(BTreeMap::is_empty) {
                self.word_docs.remove(word);
            }
        }
        self.ids.remove(&id);
        true
    }

    pub fn contains(&self, id: DocId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Number of live documents.
    pub fn document_count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ascending iteration over live document ids.
    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.ids.iter().copied()
    }

    /// Positional id lookup, ascending order. O(n); kept for callers that
    /// address documents by insertion-ordered rank.
    pub fn id_at(&self, index: usize) -> Option<DocId> {
        self.ids.iter().nth(index).copied()
    }

    pub fn meta(&self, id: DocId) -> Option<&DocumentMeta> {
        self.documents.get(&id)
    }

    /// The document's reverse map, or an empty map for an unknown id.
    pub fn word_frequencies(&self, id: DocId) -> &BTreeMap<String, f64> {
        self.documents
            .get(&id)
            .map(|meta| &meta.word_frequency)
            .unwrap_or(&EMPTY_WORD_FREQUENCY)
    }

    pub fn postings(&self, word: &str) -> Option<&BTreeMap<DocId, f64>> {
        self.word_docs.get(word)
    }

    /// Number of documents containing `word`.
    pub fn document_frequency(&self, word: &str) -> usize {
        self.word_docs.get(word).map_or(0, BTreeMap::len)
    }

    /// `ln(N / df(word))`. The caller guarantees the word is indexed.
    pub fn inverse_document_frequency(&self, word: &str) -> f64 {
        (self.documents.len() as f64 / self.document_frequency(word) as f64).ln()
    }

    pub fn doc_contains_word(&self, id: DocId, word: &str) -> bool {
        self.word_docs
            .get(word)
            .is_some_and(|postings| postings.contains_key(&id))
    }

    /// Number of distinct indexed words.
    pub fn word_count(&self) -> usize {
        self.word_docs.len()
    }
}
