//! Bounded best-k accumulation with periodic compaction.
//!
//! Candidate similarities stream in one at a time; [`TopK`] appends them to
//! a working list and, every `compaction_batch` pushes, sorts descending by
//! similarity and truncates to `k`. Peak memory is O(k + batch) instead of
//! O(candidates), and the final result is the exact top-k regardless of
//! arrival order: compaction always retains the best k seen so far, and a
//! new item is never dropped before a compaction has evaluated it.
//!
//! A size-k heap would be equally correct and slightly cheaper; the
//! append-then-compact shape is kept because it matches the selection
//! strategy this crate models.
//!
//! # Examples
//!
//! ```
//! use recomendar::topk::{Neighbor, TopK};
//! use recomendar::vector::FeatureVector;
//!
//! let mut topk = TopK::new(2);
//! for (sim, entity) in [(0.3, "a"), (0.9, "b"), (0.5, "c")] {
//!     topk.push(Neighbor {
//!         similarity: sim,
//!         entity: entity.to_string(),
//!         features: FeatureVector::new(),
//!     });
//! }
//!
//! let best = topk.finish();
//! assert_eq!(best.len(), 2);
//! assert_eq!(best[0].entity, "b");
//! assert_eq!(best[1].entity, "c");
//! ```

use std::cmp::Ordering;

use crate::vector::FeatureVector;

/// Default number of pushes between compactions.
pub const DEFAULT_COMPACTION_BATCH: usize = 100;

/// One scored neighbor: similarity, entity id, and the entity's features.
///
/// The features ride along so the score predictor can read the target
/// feature without going back to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    /// Cosine similarity to the query entity
    pub similarity: f64,
    /// Neighbor entity id
    pub entity: String,
    /// The neighbor's full feature vector
    pub features: FeatureVector,
}

/// Streaming top-k accumulator.
///
/// Ties in similarity keep insertion order: compaction uses a stable sort,
/// an explicit design choice rather than a guarantee of any secondary key.
#[derive(Debug, Clone)]
pub struct TopK {
    k: usize,
    compaction_batch: usize,
    pushed: usize,
    working: Vec<Neighbor>,
}

impl TopK {
    /// Create an accumulator keeping the best `k` neighbors.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            compaction_batch: DEFAULT_COMPACTION_BATCH,
            pushed: 0,
            working: Vec::new(),
        }
    }

    /// Set the number of pushes between compactions (minimum 1).
    #[must_use]
    pub fn with_compaction_batch(mut self, batch: usize) -> Self {
        self.compaction_batch = batch.max(1);
        self
    }

    /// Append one scored neighbor, compacting when the batch fills.
    pub fn push(&mut self, neighbor: Neighbor) {
        self.working.push(neighbor);
        self.pushed += 1;
        if self.pushed % self.compaction_batch == 0 {
            self.compact();
        }
    }

    /// Sort the working list descending by similarity and cut to `k`.
    fn compact(&mut self) {
        // Stable sort; similarities are finite (checked upstream).
        self.working.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        self.working.truncate(self.k);
    }

    /// Merge another accumulator into this one (parallel reduce step).
    #[must_use]
    pub fn merge(mut self, other: TopK) -> Self {
        self.working.extend(other.working);
        self.pushed += other.pushed;
        self.compact();
        self
    }

    /// Final compaction; yields at most `k` neighbors, best first.
    #[must_use]
    pub fn finish(mut self) -> Vec<Neighbor> {
        self.compact();
        self.working
    }

    /// Current working-list length (may exceed `k` between compactions).
    #[must_use]
    pub fn len(&self) -> usize {
        self.working.len()
    }

    /// Whether nothing has been retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor(similarity: f64, entity: &str) -> Neighbor {
        Neighbor {
            similarity,
            entity: entity.to_string(),
            features: FeatureVector::new(),
        }
    }

    #[test]
    fn test_finish_sorts_descending_and_truncates() {
        let mut topk = TopK::new(3);
        for (s, e) in [(0.1, "a"), (0.7, "b"), (0.4, "c"), (0.9, "d"), (0.2, "e")] {
            topk.push(neighbor(s, e));
        }
        let best = topk.finish();
        let entities: Vec<&str> = best.iter().map(|n| n.entity.as_str()).collect();
        assert_eq!(entities, vec!["d", "b", "c"]);
    }

    #[test]
    fn test_fewer_candidates_than_k() {
        let mut topk = TopK::new(10);
        topk.push(neighbor(0.5, "only"));
        let best = topk.finish();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].entity, "only");
    }

    #[test]
    fn test_k_zero_keeps_nothing() {
        let mut topk = TopK::new(0);
        topk.push(neighbor(0.9, "a"));
        assert!(topk.finish().is_empty());
    }

    #[test]
    fn test_working_list_is_bounded_by_k_plus_batch() {
        let mut topk = TopK::new(2).with_compaction_batch(5);
        for i in 0..1000 {
            topk.push(neighbor(f64::from(i) / 1000.0, "e"));
            assert!(topk.len() <= 2 + 5);
        }
    }

    #[test]
    fn test_compaction_never_evicts_a_true_top_k_member() {
        // Best items arrive first, then a long tail; compaction must keep them.
        let mut topk = TopK::new(2).with_compaction_batch(3);
        topk.push(neighbor(0.99, "best"));
        topk.push(neighbor(0.98, "second"));
        for i in 0..50 {
            topk.push(neighbor(0.01 + f64::from(i) * 0.001, "tail"));
        }
        let best = topk.finish();
        assert_eq!(best[0].entity, "best");
        assert_eq!(best[1].entity, "second");
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut topk = TopK::new(2);
        topk.push(neighbor(0.5, "first"));
        topk.push(neighbor(0.5, "second"));
        topk.push(neighbor(0.5, "third"));
        let best = topk.finish();
        assert_eq!(best[0].entity, "first");
        assert_eq!(best[1].entity, "second");
    }

    #[test]
    fn test_merge_combines_accumulators() {
        let mut left = TopK::new(2);
        left.push(neighbor(0.9, "a"));
        left.push(neighbor(0.1, "b"));
        let mut right = TopK::new(2);
        right.push(neighbor(0.8, "c"));
        right.push(neighbor(0.7, "d"));

        let best = left.merge(right).finish();
        let entities: Vec<&str> = best.iter().map(|n| n.entity.as_str()).collect();
        assert_eq!(entities, vec!["a", "c"]);
    }
}
