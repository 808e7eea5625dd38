//! Incremental text filter over the record list.
//!
//! A record matches when its lower-cased "repo title author branch" text
//! contains the lower-cased query. Results keep the input order.

use crate::types::Record;

/// Whether `record` matches `query`. The empty query matches everything.
pub fn matches(record: &Record, query: &str) -> bool {
    query.is_empty() || record.search_text().contains(&query.to_lowercase())
}

/// Indices into `records` of every match, in order.
pub fn matching_indices(records: &[Record], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..records.len()).collect();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.search_text().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

/// The matching records themselves, in order.
pub fn filter(records: &[Record], query: &str) -> Vec<Record> {
    matching_indices(records, query)
        .into_iter()
        .map(|i| records[i].clone())
        .collect()
}
