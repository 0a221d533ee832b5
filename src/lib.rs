//! Recomendar: collaborative filtering over a sorted key-value store.
//!
//! Recomendar implements item/user-based collaborative filtering on top of
//! any store exposing range and batched row scans. Feature vectors are
//! sparse and text-valued, reconstructed per request from the store;
//! neighbors are discovered through a reverse index, scored with cosine
//! similarity, and selected with a bounded, periodically compacted top-k
//! list, so memory stays O(k + batch) even for very large candidate sets.
//!
//! # Quick Start
//!
//! ```
//! use recomendar::prelude::*;
//!
//! // A sorted in-memory store standing in for the remote one.
//! let mut store = MemoryStore::new();
//! store.write_rating("ml", "user_1", "item_10", "5");
//! store.write_rating("ml", "user_1", "item_11", "3");
//! store.write_rating("ml", "user_2", "item_10", "4");
//! store.write_rating("ml", "user_2", "item_12", "2");
//!
//! let filter = CollaborativeFilter::new(&store, "ml");
//! let neighbors = filter.nearest_neighbors("user_1", 10).unwrap();
//! assert_eq!(neighbors[0].entity, "user_2");
//!
//! let predicted = predict_score(&neighbors, "item_12").unwrap();
//! assert_eq!(predicted, 2.0);
//! ```
//!
//! # Modules
//!
//! - [`store`]: the scan contract ([`store::Store`], [`store::Record`]) and
//!   the in-memory reference store
//! - [`vector`]: sparse text-valued feature vectors
//! - [`similarity`]: cosine similarity
//! - [`topk`]: streaming top-k accumulation with compaction
//! - [`recommend`]: the collaborative filter and score prediction
//! - [`cancel`]: cooperative cancellation between scan pages
//! - [`error`]: error taxonomy and the crate [`Result`] alias

pub mod cancel;
pub mod error;
pub mod prelude;
pub mod recommend;
pub mod similarity;
pub mod store;
pub mod topk;
pub mod vector;

pub use error::{RecomendarError, Result};
