use std::collections::VecDeque;

use crate::core::engine::SearchEngine;
use crate::core::error::Result;
use crate::core::types::{DocId, Document, DocumentStatus};

/// One slot per minute of the day.
const REQUESTS_PER_DAY: usize = 1440;

/// Rolling window over the most recent day of find requests, tracking how
/// many returned nothing. Failed requests are not recorded.
pub struct RequestQueue<'a> {
    engine: &'a SearchEngine,
    requests: VecDeque<QueryResult>,
}

struct QueryResult {
    matched: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(engine: &'a SearchEngine) -> Self {
        RequestQueue {
            engine,
            requests: VecDeque::new(),
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        let documents = self.engine.find_top_documents(raw_query)?;
        self.record(documents.len());
        Ok(documents)
    }

    pub fn add_find_request_with_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        let documents = self
            .engine
            .find_top_documents_with_status(raw_query, status)?;
        self.record(documents.len());
        Ok(documents)
    }

    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let documents = self.engine.find_top_documents_by(raw_query, predicate)?;
        self.record(documents.len());
        Ok(documents)
    }

    /// Requests in the current window that matched nothing.
    pub fn no_result_requests(&self) -> usize {
        self.requests
            .iter()
            .filter(|result| result.matched == 0)
            .count()
    }

    fn record(&mut self, matched: usize) {
        self.requests.push_back(QueryResult { matched });
        if self.requests.len() > REQUESTS_PER_DAY {
            self.requests.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_one_document() -> SearchEngine {
        let mut engine = SearchEngine::new("and in at").unwrap();
        engine
            .add_document(
                DocId(1),
                "curly dog and fancy collar",
                DocumentStatus::Actual,
                &[1, 2, 3],
            )
            .unwrap();
        engine
    }

    #[test]
    fn test_empty_results_are_counted() {
        let engine = engine_with_one_document();
        let mut queue = RequestQueue::new(&engine);

        for _ in 0..5 {
            queue.add_find_request("empty query").unwrap();
        }
        queue.add_find_request("curly dog").unwrap();
        assert_eq!(queue.no_result_requests(), 5);
    }

    #[test]
    fn test_window_evicts_day_old_requests() {
        let engine = engine_with_one_document();
        let mut queue = RequestQueue::new(&engine);

        for _ in 0..1439 {
            queue.add_find_request("empty query").unwrap();
        }
        assert_eq!(queue.no_result_requests(), 1439);

        // This request fills the window without evicting anything
        queue.add_find_request("curly dog").unwrap();
        assert_eq!(queue.no_result_requests(), 1439);
        // From here every request evicts the oldest empty one
        queue.add_find_request("big collar").unwrap();
        assert_eq!(queue.no_result_requests(), 1438);
        // An empty result replaces an evicted empty result
        queue.add_find_request("sparrow").unwrap();
        assert_eq!(queue.no_result_requests(), 1438);
    }

    #[test]
    fn test_failed_requests_are_not_recorded() {
        let engine = engine_with_one_document();
        let mut queue = RequestQueue::new(&engine);
        assert!(queue.add_find_request("--dog").is_err());
        assert_eq!(queue.no_result_requests(), 0);
    }

    #[test]
    fn test_predicate_requests_pass_through() {
        let engine = engine_with_one_document();
        let mut queue = RequestQueue::new(&engine);
        let documents = queue
            .add_find_request_by("curly dog", |_, _, rating| rating > 0)
            .unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(queue.no_result_requests(), 0);
    }
}
