use std::collections::BTreeMap;
use tracing::info;

use crate::core::engine::SearchEngine;
use crate::core::types::DocId;

/// Two documents are duplicates when their surviving word *sets* are equal,
/// regardless of per-word frequencies.
fn same_word_set(lhs: &BTreeMap<String, f64>, rhs: &BTreeMap<String, f64>) -> bool {
    lhs.len() == rhs.len() && lhs.keys().eq(rhs.keys())
}

/// Scan documents in ascending id order and collect every later document
/// whose word set equals an earlier one's. The returned ids are sorted.
pub fn find_duplicate_ids(engine: &SearchEngine) -> Vec<DocId> {
    let ids: Vec<DocId> = engine.document_ids().collect();
    let mut duplicates: Vec<DocId> = Vec::new();

    for (position, &lhs_id) in ids.iter().enumerate() {
        if duplicates.contains(&lhs_id) {
            continue;
        }
        let lhs = engine.word_frequencies(lhs_id);
        for &rhs_id in &ids[position + 1..] {
            if same_word_set(lhs, engine.word_frequencies(rhs_id)) {
                duplicates.push(rhs_id);
            }
        }
    }

    duplicates.sort_unstable();
    duplicates
}

/// Remove every duplicate found by [`find_duplicate_ids`].
pub fn remove_duplicates(engine: &mut SearchEngine) {
    for id in find_duplicate_ids(engine) {
        info!("Found duplicate document id {}", id);
        engine.remove_document(id);
    }
}
