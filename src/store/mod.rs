//! Sorted key-value store access: records, the scan contract, and paging.
//!
//! The recommendation core never talks to a concrete store directly. It
//! consumes the [`Store`] trait — range scans and batched multi-row scans,
//! both delivered in pages — and a handle implementing it is passed into
//! every operation. There is no process-wide connection state.
//!
//! Two layout conventions from the backing tables matter here:
//!
//! - An entity's sparse feature vector lives under its row key: one record
//!   per feature, the feature id in the column qualifier.
//! - The *reverse index*: a row keyed by feature id whose column qualifiers
//!   enumerate the entities possessing that feature.
//!
//! # Examples
//!
//! ```
//! use recomendar::store::{row_upper_bound, MemoryStore, Store};
//! use recomendar::cancel::CancelToken;
//! use recomendar::store::drain_pages;
//!
//! let mut store = MemoryStore::new();
//! store.write_rating("ml", "user_1", "item_10", "5");
//!
//! let pages = store.scan_range("ml", "user_1", &row_upper_bound("user_1")).unwrap();
//! let records = drain_pages(pages, &CancelToken::new()).unwrap();
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].qualifier, "item_10");
//! ```

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::{RecomendarError, Result};

pub mod memory;

pub use memory::MemoryStore;

/// One cell returned by a scan.
///
/// Mirrors the sorted-store data model: a row key, a column (family and
/// qualifier), a version timestamp, and a text value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Row key (an entity id, or a feature id in the reverse index)
    pub row: String,
    /// Column family
    pub family: String,
    /// Column qualifier (a feature id, or an entity id in the reverse index)
    pub qualifier: String,
    /// Version timestamp, milliseconds
    pub timestamp: i64,
    /// Cell value as text
    pub value: String,
}

/// A paged scan result: each item is one page of records.
///
/// An exhausted iterator ends the scan. A page-level error aborts it.
pub type ScanPages<'a> = Box<dyn Iterator<Item = Result<Vec<Record>>> + 'a>;

/// The scan contract the recommendation core consumes.
///
/// Both scans block until the store returns a page; callers loop over
/// [`ScanPages`] until exhaustion. Failure to establish a scan surfaces as
/// [`RecomendarError::StoreUnavailable`]; no retry is performed.
pub trait Store {
    /// Scan records with row keys in the half-open range `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::StoreUnavailable`] if the scan cannot be
    /// established.
    fn scan_range(&self, collection: &str, start: &str, end: &str) -> Result<ScanPages<'_>>;

    /// Scan all columns under each of the given row keys.
    ///
    /// Semantically the union of single-row scans for each key; rows absent
    /// from the store contribute nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::StoreUnavailable`] if the scan cannot be
    /// established.
    fn batch_scan_rows(&self, collection: &str, rows: &[String]) -> Result<ScanPages<'_>>;
}

/// Exclusive upper bound that selects exactly one row.
///
/// Appends a null byte: `row + "\0"` sorts strictly after `row` and strictly
/// before `row + x` for any non-empty `x`, so `[row, row_upper_bound(row))`
/// scans that row and nothing else.
#[must_use]
pub fn row_upper_bound(row: &str) -> String {
    format!("{row}\0")
}

/// Pull every page of a scan into one record list.
///
/// The cancel token is checked between pages; this is the only suspension
/// point of the blocking scan loop.
///
/// # Errors
///
/// Propagates page-level store errors unchanged, and returns
/// [`RecomendarError::Cancelled`] if the token fires between pages.
pub fn drain_pages(pages: ScanPages<'_>, cancel: &CancelToken) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for page in pages {
        if cancel.is_cancelled() {
            return Err(RecomendarError::Cancelled);
        }
        records.extend(page?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_upper_bound_orders_between_row_and_extensions() {
        let row = "user_1";
        let bound = row_upper_bound(row);
        assert!(bound.as_str() > row);
        assert!(bound.as_str() < "user_10");
        assert!(bound.as_str() < "user_1a");
    }

    #[test]
    fn test_drain_pages_concatenates_pages() {
        let rec = |row: &str| Record {
            row: row.to_string(),
            family: "rating".to_string(),
            qualifier: "q".to_string(),
            timestamp: 0,
            value: "1".to_string(),
        };
        let pages: ScanPages<'_> =
            Box::new(vec![Ok(vec![rec("a"), rec("b")]), Ok(vec![rec("c")])].into_iter());
        let records = drain_pages(pages, &CancelToken::new()).expect("pages drain");
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].row, "c");
    }

    #[test]
    fn test_drain_pages_stops_on_cancel() {
        let token = CancelToken::new();
        token.cancel();
        let pages: ScanPages<'_> = Box::new(std::iter::once(Ok(Vec::new())));
        let err = drain_pages(pages, &token).expect_err("cancelled");
        assert!(matches!(err, RecomendarError::Cancelled));
    }

    #[test]
    fn test_drain_pages_propagates_page_error() {
        let pages: ScanPages<'_> = Box::new(std::iter::once(Err(
            RecomendarError::store_unavailable("tablet server down"),
        )));
        let err = drain_pages(pages, &CancelToken::new()).expect_err("store error");
        assert!(matches!(err, RecomendarError::StoreUnavailable { .. }));
    }

    #[test]
    fn test_record_serde_round_trip() {
        let rec = Record {
            row: "user_1".to_string(),
            family: "rating".to_string(),
            qualifier: "item_10".to_string(),
            timestamp: 42,
            value: "5".to_string(),
        };
        let json = serde_json::to_string(&rec).expect("serialize");
        let back: Record = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(rec, back);
    }
}
