use rayon::prelude::*;

use crate::core::engine::SearchEngine;
use crate::core::error::Result;
use crate::core::types::Document;

/// Run a batch of queries on the rayon pool. The output preserves input
/// order: `result[i]` is the top list for `queries[i]`. The first invalid
/// query fails the whole batch.
pub fn process_queries(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Vec<Document>>> {
    queries
        .par_iter()
        .map(|query| engine.find_top_documents(query))
        .collect()
}

/// Like [`process_queries`], flattened: query order and intra-query ranking
/// order are both preserved.
pub fn process_queries_joined(
    engine: &SearchEngine,
    queries: &[String],
) -> Result<Vec<Document>> {
    Ok(process_queries(engine, queries)?
        .into_iter()
        .flatten()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DocId, DocumentStatus};

    fn sample_engine() -> SearchEngine {
        let mut engine = SearchEngine::default();
        engine
            .add_document(DocId(1), "cat in the city", DocumentStatus::Actual, &[3])
            .unwrap();
        engine
            .add_document(DocId(2), "dog in the garden", DocumentStatus::Actual, &[5])
            .unwrap();
        engine
            .add_document(DocId(3), "parrot on a branch", DocumentStatus::Actual, &[1])
            .unwrap();
        engine
    }

    fn owned(queries: &[&str]) -> Vec<String> {
        queries.iter().map(|q| q.to_string()).collect()
    }

    #[test]
    fn test_output_order_matches_input_order() {
        let engine = sample_engine();
        let queries = owned(&["dog", "parrot", "cat"]);
        let results = process_queries(&engine, &queries).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0][0].id, DocId(2));
        assert_eq!(results[1][0].id, DocId(3));
        assert_eq!(results[2][0].id, DocId(1));
    }

    #[test]
    fn test_queries_without_matches_yield_empty_lists() {
        let engine = sample_engine();
        let queries = owned(&["unicorn", "cat"]);
        let results = process_queries(&engine, &queries).unwrap();
        assert!(results[0].is_empty());
        assert_eq!(results[1].len(), 1);
    }

    #[test]
    fn test_joined_preserves_both_orders() {
        let engine = sample_engine();
        let queries = owned(&["in", "parrot"]);
        let joined = process_queries_joined(&engine, &queries).unwrap();
        // "in": docs 1 and 2 tie on relevance, doc 2 wins on rating
        let ids: Vec<i32> = joined.iter().map(|doc| doc.id.value()).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_invalid_query_fails_the_batch() {
        let engine = sample_engine();
        let queries = owned(&["cat", "--dog"]);
        assert!(process_queries(&engine, &queries).is_err());
    }
}
