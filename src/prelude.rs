//! Convenient re-exports for common usage.
//!
//! ```
//! use recomendar::prelude::*;
//!
//! let store = MemoryStore::new();
//! let filter = CollaborativeFilter::new(&store, "ml");
//! assert!(filter.nearest_neighbors("user_1", 5).unwrap().is_empty());
//! ```

pub use crate::cancel::CancelToken;
pub use crate::error::{RecomendarError, Result};
pub use crate::recommend::{predict_score, CollaborativeFilter, FetchFailure};
pub use crate::similarity::cosine_similarity;
pub use crate::store::{row_upper_bound, MemoryStore, Record, Store};
pub use crate::topk::{Neighbor, TopK};
pub use crate::vector::FeatureVector;
