//! Recommendation systems.
//!
//! This module provides collaborative filtering over a sorted key-value
//! store: neighbors are found by scanning a reverse index, scored with
//! cosine similarity, kept in a bounded top-k list, and used to predict
//! ratings by averaging.
//!
//! # Quick Start
//!
//! ```
//! use recomendar::recommend::CollaborativeFilter;
//! use recomendar::store::MemoryStore;
//!
//! let mut store = MemoryStore::new();
//! store.write_rating("ml", "user_1", "item_10", "5");
//! store.write_rating("ml", "user_1", "item_11", "3");
//! store.write_rating("ml", "user_2", "item_10", "4");
//! store.write_rating("ml", "user_2", "item_12", "2");
//!
//! let filter = CollaborativeFilter::new(&store, "ml");
//!
//! // user_2 shares item_10 with user_1
//! let neighbors = filter.nearest_neighbors("user_1", 5).unwrap();
//! assert_eq!(neighbors.len(), 1);
//! assert_eq!(neighbors[0].entity, "user_2");
//!
//! // predict user_1's rating of item_12 from the neighborhood
//! let score = filter.recommend("user_1", "item_12", 5).unwrap();
//! assert_eq!(score, 2.0);
//! ```

pub mod collaborative;

pub use collaborative::{predict_score, CollaborativeFilter, FetchFailure};
