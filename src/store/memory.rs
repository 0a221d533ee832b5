//! In-memory reference implementation of the [`Store`] contract.
//!
//! `MemoryStore` keeps each collection as a BTreeMap sorted by
//! (row, family, qualifier), which gives range scans the same ordering
//! semantics as a remote sorted store. Pages are materialized up front —
//! this is a reference implementation for tests, doc examples, and small
//! datasets, not a persistence engine.

use std::collections::BTreeMap;

use super::{Record, ScanPages, Store};
use crate::error::Result;

/// Default number of records per scan page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Sorted cell key within one collection.
type CellKey = (String, String, String);

/// BTreeMap-backed store, sorted by (row, family, qualifier).
///
/// # Examples
///
/// ```
/// use recomendar::store::{MemoryStore, Store};
///
/// let mut store = MemoryStore::new();
/// store.write_rating("ml", "user_1", "item_10", "5");
/// store.write_rating("ml", "user_2", "item_10", "4");
///
/// // The reverse index row for item_10 names both raters.
/// let pages = store
///     .batch_scan_rows("ml", &["item_10".to_string()])
///     .unwrap();
/// let entities: Vec<String> = pages
///     .flat_map(|page| page.unwrap())
///     .map(|r| r.qualifier)
///     .collect();
/// assert_eq!(entities, vec!["user_1", "user_2"]);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStore {
    collections: BTreeMap<String, BTreeMap<CellKey, Record>>,
    page_size: usize,
    clock: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store with the default page size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: BTreeMap::new(),
            page_size: DEFAULT_PAGE_SIZE,
            clock: 0,
        }
    }

    /// Set the number of records per page (minimum 1).
    ///
    /// Small page sizes are useful in tests to exercise the paging loop.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Write one cell, overwriting any previous value at the same
    /// (row, family, qualifier). Timestamps are a monotonic counter.
    pub fn put(&mut self, collection: &str, row: &str, family: &str, qualifier: &str, value: &str) {
        self.clock += 1;
        let record = Record {
            row: row.to_string(),
            family: family.to_string(),
            qualifier: qualifier.to_string(),
            timestamp: self.clock,
            value: value.to_string(),
        };
        self.collections.entry(collection.to_string()).or_default().insert(
            (row.to_string(), family.to_string(), qualifier.to_string()),
            record,
        );
    }

    /// Record a rating with the dual-write layout the recommender reads.
    ///
    /// Writes a forward entry (`user` row, `item` qualifier) and a reverse
    /// index entry (`item` row, `user` qualifier), both carrying the rating
    /// text. The reverse entry is what makes candidate discovery work.
    pub fn write_rating(&mut self, collection: &str, user: &str, item: &str, rating: &str) {
        self.put(collection, user, "rating", item, rating);
        self.put(collection, item, "rating", user, rating);
    }

    fn row_records(&self, collection: &str, start: &str, end: &str) -> Vec<Record> {
        let Some(cells) = self.collections.get(collection) else {
            return Vec::new();
        };
        let from = (start.to_string(), String::new(), String::new());
        cells
            .range(from..)
            .take_while(|((row, _, _), _)| row.as_str() < end)
            .map(|(_, record)| record.clone())
            .collect()
    }

    fn paged(&self, records: Vec<Record>) -> ScanPages<'_> {
        let pages: Vec<Vec<Record>> = records
            .chunks(self.page_size)
            .map(<[Record]>::to_vec)
            .collect();
        Box::new(pages.into_iter().map(Ok))
    }
}

impl Store for MemoryStore {
    fn scan_range(&self, collection: &str, start: &str, end: &str) -> Result<ScanPages<'_>> {
        Ok(self.paged(self.row_records(collection, start, end)))
    }

    fn batch_scan_rows(&self, collection: &str, rows: &[String]) -> Result<ScanPages<'_>> {
        let mut records = Vec::new();
        for row in rows {
            records.extend(self.row_records(collection, row, &super::row_upper_bound(row)));
        }
        Ok(self.paged(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancelToken;
    use crate::store::{drain_pages, row_upper_bound};

    fn scan_all(store: &MemoryStore, collection: &str, start: &str, end: &str) -> Vec<Record> {
        let pages = store.scan_range(collection, start, end).expect("scan");
        drain_pages(pages, &CancelToken::new()).expect("drain")
    }

    #[test]
    fn test_scan_range_is_half_open() {
        let mut store = MemoryStore::new();
        store.put("t", "a", "f", "q", "1");
        store.put("t", "b", "f", "q", "2");
        store.put("t", "c", "f", "q", "3");

        let records = scan_all(&store, "t", "a", "c");
        let rows: Vec<&str> = records.iter().map(|r| r.row.as_str()).collect();
        assert_eq!(rows, vec!["a", "b"]);
    }

    #[test]
    fn test_null_byte_bound_selects_exactly_one_row() {
        let mut store = MemoryStore::new();
        store.put("t", "user_1", "f", "q1", "1");
        store.put("t", "user_10", "f", "q", "x");
        store.put("t", "user_1a", "f", "q", "y");

        let records = scan_all(&store, "t", "user_1", &row_upper_bound("user_1"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].row, "user_1");
    }

    #[test]
    fn test_put_overwrites_same_cell() {
        let mut store = MemoryStore::new();
        store.put("t", "r", "f", "q", "old");
        store.put("t", "r", "f", "q", "new");

        let records = scan_all(&store, "t", "r", &row_upper_bound("r"));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, "new");
    }

    #[test]
    fn test_paging_splits_records() {
        let mut store = MemoryStore::new().with_page_size(2);
        for q in ["a", "b", "c", "d", "e"] {
            store.put("t", "row", "f", q, "1");
        }

        let pages: Vec<Vec<Record>> = store
            .scan_range("t", "row", &row_upper_bound("row"))
            .expect("scan")
            .map(|p| p.expect("page"))
            .collect();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].len(), 2);
        assert_eq!(pages[2].len(), 1);
    }

    #[test]
    fn test_batch_scan_unions_rows_and_skips_missing() {
        let mut store = MemoryStore::new();
        store.write_rating("ml", "user_1", "item_10", "5");
        store.write_rating("ml", "user_2", "item_11", "3");

        let rows = vec![
            "item_10".to_string(),
            "item_11".to_string(),
            "item_99".to_string(),
        ];
        let pages = store.batch_scan_rows("ml", &rows).expect("scan");
        let records = drain_pages(pages, &CancelToken::new()).expect("drain");
        let entities: Vec<&str> = records.iter().map(|r| r.qualifier.as_str()).collect();
        assert_eq!(entities, vec!["user_1", "user_2"]);
    }

    #[test]
    fn test_unknown_collection_scans_empty() {
        let store = MemoryStore::new();
        assert!(scan_all(&store, "missing", "a", "z").is_empty());
    }

    #[test]
    fn test_write_rating_dual_write() {
        let mut store = MemoryStore::new();
        store.write_rating("ml", "user_1", "item_10", "5");

        let forward = scan_all(&store, "ml", "user_1", &row_upper_bound("user_1"));
        assert_eq!(forward[0].qualifier, "item_10");
        assert_eq!(forward[0].value, "5");

        let reverse = scan_all(&store, "ml", "item_10", &row_upper_bound("item_10"));
        assert_eq!(reverse[0].qualifier, "user_1");
        assert_eq!(reverse[0].value, "5");
    }
}
