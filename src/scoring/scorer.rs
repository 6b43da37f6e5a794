use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::core::types::{DocId, Document, DocumentStatus};
use crate::index::inverted::InvertedIndex;
use crate::parallel::concurrent_map::ConcurrentMap;
use crate::query::parser::Query;

/// TF-IDF scoring over a borrowed index.
///
/// Both paths follow the same plan: accumulate `tf · idf` per candidate
/// document over the plus words (the predicate gates accumulation), then
/// drop every candidate containing a minus word. The caller sorts and
/// truncates.
pub struct TfIdfScorer<'a> {
    index: &'a InvertedIndex,
}

impl<'a> TfIdfScorer<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        TfIdfScorer { index }
    }

    pub fn score<P>(&self, query: &Query, predicate: P) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut document_to_relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let postings = match self.index.postings(word) {
                Some(postings) => postings,
                None => continue,
            };
            let idf = self.index.inverse_document_frequency(word);
            for (&doc_id, &term_freq) in postings {
                if let Some(meta) = self.index.meta(doc_id) {
                    if predicate(doc_id, meta.status, meta.rating) {
                        *document_to_relevance.entry(doc_id).or_insert(0.0) +=
                            term_freq * idf;
                    }
                }
            }
        }

        for word in &query.minus_words {
            let postings = match self.index.postings(word) {
                Some(postings) => postings,
                None => continue,
            };
            for &doc_id in postings.keys() {
                document_to_relevance.remove(&doc_id);
            }
        }

        self.collect_documents(document_to_relevance)
    }

    /// Parallel scoring: each plus word is an independent task accumulating
    /// into a sharded map keyed by document id. Minus pruning runs
    /// sequentially once the fan-out has joined.
    pub fn score_par<P>(&self, query: &Query, predicate: P, shard_count: usize) -> Vec<Document>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let document_to_relevance: ConcurrentMap<DocId, f64> =
            ConcurrentMap::new(shard_count);

        let words: Vec<&str> = query
            .plus_words
            .iter()
            .map(String::as_str)
            .filter(|word| self.index.postings(word).is_some())
            .collect();

        words.par_iter().for_each(|word| {
            let postings = match self.index.postings(word) {
                Some(postings) => postings,
                None => return,
            };
            let idf = self.index.inverse_document_frequency(word);
            for (&doc_id, &term_freq) in postings {
                if let Some(meta) = self.index.meta(doc_id) {
                    if predicate(doc_id, meta.status, meta.rating) {
                        *document_to_relevance.access(doc_id) += term_freq * idf;
                    }
                }
            }
        });

        for word in &query.minus_words {
            let postings = match self.index.postings(word) {
                Some(postings) => postings,
                None => continue,
            };
            for &doc_id in postings.keys() {
                document_to_relevance.erase(doc_id);
            }
        }

        self.collect_documents(document_to_relevance.snapshot())
    }

    fn collect_documents(&self, relevance: BTreeMap<DocId, f64>) -> Vec<Document> {
        relevance
            .into_iter()
            .filter_map(|(doc_id, relevance)| {
                self.index
                    .meta(doc_id)
                    .map(|meta| Document::new(doc_id, relevance, meta.rating))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DocumentStatus;

    fn sample_index() -> InvertedIndex {
        // Three documents over a four-word vocabulary:
        //   1: cat 0.5, tail 0.5     rating 3
        //   2: dog 1.0               rating 1
        //   3: cat 0.25, city 0.75   rating 5
        let mut index = InvertedIndex::new();
        index.insert_document(
            DocId(1),
            [("cat".to_string(), 0.5), ("tail".to_string(), 0.5)].into(),
            DocumentStatus::Actual,
            3,
        );
        index.insert_document(
            DocId(2),
            [("dog".to_string(), 1.0)].into(),
            DocumentStatus::Actual,
            1,
        );
        index.insert_document(
            DocId(3),
            [("cat".to_string(), 0.25), ("city".to_string(), 0.75)].into(),
            DocumentStatus::Banned,
            5,
        );
        index
    }

    fn query(plus: &[&str], minus: &[&str]) -> Query {
        Query {
            plus_words: plus.iter().map(|w| w.to_string()).collect(),
            minus_words: minus.iter().map(|w| w.to_string()).collect(),
        }
    }

    fn accept_all(_: DocId, _: DocumentStatus, _: i32) -> bool {
        true
    }

    #[test]
    fn test_score_accumulates_tf_idf() {
        let index = sample_index();
        let scorer = TfIdfScorer::new(&index);
        let docs = scorer.score(&query(&["cat"], &[]), accept_all);

        // idf(cat) = ln(3/2)
        let idf = (3.0f64 / 2.0).ln();
        assert_eq!(docs.len(), 2);
        let doc1 = docs.iter().find(|d| d.id == DocId(1)).unwrap();
        assert!((doc1.relevance - 0.5 * idf).abs() < 1e-12);
        let doc3 = docs.iter().find(|d| d.id == DocId(3)).unwrap();
        assert!((doc3.relevance - 0.25 * idf).abs() < 1e-12);
    }

    #[test]
    fn test_predicate_gates_candidates() {
        let index = sample_index();
        let scorer = TfIdfScorer::new(&index);
        let docs = scorer.score(&query(&["cat"], &[]), |_, status, _| {
            status == DocumentStatus::Actual
        });
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, DocId(1));
    }

    #[test]
    fn test_minus_prunes_after_accumulation() {
        let index = sample_index();
        let scorer = TfIdfScorer::new(&index);
        let docs = scorer.score(&query(&["cat"], &["tail"]), accept_all);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, DocId(3));
    }

    #[test]
    fn test_absent_minus_word_is_noop() {
        let index = sample_index();
        let scorer = TfIdfScorer::new(&index);
        let docs = scorer.score(&query(&["cat"], &["unicorn"]), accept_all);
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_par_matches_sequential() {
        let index = sample_index();
        let scorer = TfIdfScorer::new(&index);
        let q = query(&["cat", "dog", "city"], &["tail"]);

        let mut seq = scorer.score(&q, accept_all);
        let mut par = scorer.score_par(&q, accept_all, 4);
        seq.sort_by_key(|d| d.id);
        par.sort_by_key(|d| d.id);

        assert_eq!(seq.len(), par.len());
        for (s, p) in seq.iter().zip(&par) {
            assert_eq!(s.id, p.id);
            assert!((s.relevance - p.relevance).abs() < 1e-9);
        }
    }
}
