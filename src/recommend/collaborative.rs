//! Item/user-based collaborative filtering against an injected store handle.
//!
//! The filter walks a bipartite interaction graph laid out in two row
//! conventions (see [`crate::store`]): entity rows carry feature vectors,
//! feature rows form the reverse index used for candidate discovery. No
//! type tag distinguishes users from items; callers encode it in the id
//! prefix (`"user_"`, `"item_"`), so the same filter serves both
//! user-based and item-based filtering.

use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::error::{RecomendarError, Result};
use crate::similarity::cosine_similarity;
use crate::store::{drain_pages, row_upper_bound, Store};
use crate::topk::{Neighbor, TopK, DEFAULT_COMPACTION_BATCH};
use crate::vector::{parse_value, FeatureVector};

/// What to do when a candidate's feature fetch fails mid-selection.
///
/// The system this crate models aborts the whole selection; `Skip` trades
/// completeness of the neighbor pool for resilience. Cancellation is not a
/// fetch failure and always aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchFailure {
    /// Fail the whole selection on the first fetch error (default).
    #[default]
    Abort,
    /// Drop the candidate and keep going.
    Skip,
}

/// Collaborative filter over one store collection.
///
/// Holds a borrowed store handle and per-call configuration. All state is
/// local to one call; nothing is cached across invocations.
///
/// # Examples
///
/// ```
/// use recomendar::recommend::{CollaborativeFilter, FetchFailure};
/// use recomendar::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// let filter = CollaborativeFilter::new(&store, "ml")
///     .with_compaction_batch(50)
///     .with_fetch_failure(FetchFailure::Skip);
/// ```
#[derive(Debug)]
pub struct CollaborativeFilter<'a, S: Store> {
    store: &'a S,
    collection: String,
    compaction_batch: usize,
    fetch_failure: FetchFailure,
    cancel: CancelToken,
}

impl<'a, S: Store> CollaborativeFilter<'a, S> {
    /// Create a filter reading from `collection` through the given handle.
    #[must_use]
    pub fn new(store: &'a S, collection: &str) -> Self {
        Self {
            store,
            collection: collection.to_string(),
            compaction_batch: DEFAULT_COMPACTION_BATCH,
            fetch_failure: FetchFailure::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Set the top-k compaction batch (minimum 1, default 100).
    #[must_use]
    pub fn with_compaction_batch(mut self, batch: usize) -> Self {
        self.compaction_batch = batch.max(1);
        self
    }

    /// Set the candidate fetch-failure policy.
    #[must_use]
    pub fn with_fetch_failure(mut self, policy: FetchFailure) -> Self {
        self.fetch_failure = policy;
        self
    }

    /// Attach a cancel token, checked between scan pages.
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fetch an entity's full sparse feature vector.
    ///
    /// Scans exactly that row via the null-byte upper bound. Duplicate
    /// qualifiers are not expected from the store; if they occur, the last
    /// scanned wins.
    ///
    /// # Errors
    ///
    /// [`RecomendarError::StoreUnavailable`] on scan failure,
    /// [`RecomendarError::Cancelled`] if the token fires between pages.
    pub fn features_of(&self, entity: &str) -> Result<FeatureVector> {
        let pages = self
            .store
            .scan_range(&self.collection, entity, &row_upper_bound(entity))?;
        let mut features = FeatureVector::new();
        for record in drain_pages(pages, &self.cancel)? {
            features.insert(&record.qualifier, &record.value);
        }
        Ok(features)
    }

    /// Entities sharing at least one feature with the given vector.
    ///
    /// One batched scan over the reverse-index rows named by the vector's
    /// feature ids; each returned qualifier is an entity possessing that
    /// feature. The result is deduplicated and never contains `exclude`
    /// (the query shares every feature with itself). Callers must be
    /// prepared for candidate sets much larger than k.
    ///
    /// # Errors
    ///
    /// As [`Self::features_of`].
    pub fn candidates_for(
        &self,
        features: &FeatureVector,
        exclude: &str,
    ) -> Result<BTreeSet<String>> {
        if features.is_empty() {
            return Ok(BTreeSet::new());
        }
        let rows: Vec<String> = features.features().map(str::to_string).collect();
        let pages = self.store.batch_scan_rows(&self.collection, &rows)?;
        let mut candidates: BTreeSet<String> = drain_pages(pages, &self.cancel)?
            .into_iter()
            .map(|record| record.qualifier)
            .collect();
        candidates.remove(exclude);
        Ok(candidates)
    }

    /// The k entities most similar to `entity` under cosine similarity.
    ///
    /// Fetches the query's features, discovers candidates through the
    /// reverse index, scores each candidate, and keeps the best k via the
    /// compacting [`TopK`] accumulator. The result is sorted descending by
    /// similarity and has length `min(k, candidates)`; an entity with no
    /// features has no candidates and yields an empty result.
    ///
    /// # Errors
    ///
    /// Store and cancellation errors as [`Self::features_of`];
    /// [`RecomendarError::InvalidFeatureValue`] or
    /// [`RecomendarError::DegenerateVector`] from scoring. A candidate
    /// fetch failure follows the configured [`FetchFailure`] policy.
    pub fn nearest_neighbors(&self, entity: &str, k: usize) -> Result<Vec<Neighbor>> {
        let query = self.features_of(entity)?;
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let candidates = self.candidates_for(&query, entity)?;

        let mut topk = TopK::new(k).with_compaction_batch(self.compaction_batch);
        for candidate in candidates {
            if let Some(neighbor) = self.score_candidate(&query, candidate)? {
                topk.push(neighbor);
            }
        }
        Ok(topk.finish())
    }

    /// Parallel variant of [`Self::nearest_neighbors`].
    ///
    /// Candidates are fetched and scored concurrently; each worker folds
    /// into a local [`TopK`] and the locals are merged, so compaction never
    /// runs on shared state. The result is identical to the serial path.
    #[cfg(feature = "parallel")]
    pub fn nearest_neighbors_parallel(&self, entity: &str, k: usize) -> Result<Vec<Neighbor>>
    where
        S: Sync,
    {
        let query = self.features_of(entity)?;
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let candidates: Vec<String> = self.candidates_for(&query, entity)?.into_iter().collect();

        let topk = candidates
            .into_par_iter()
            .try_fold(
                || TopK::new(k).with_compaction_batch(self.compaction_batch),
                |mut acc, candidate| {
                    if let Some(neighbor) = self.score_candidate(&query, candidate)? {
                        acc.push(neighbor);
                    }
                    Ok::<_, RecomendarError>(acc)
                },
            )
            .try_reduce(
                || TopK::new(k).with_compaction_batch(self.compaction_batch),
                |left, right| Ok(left.merge(right)),
            )?;
        Ok(topk.finish())
    }

    /// Fetch and score one candidate. `Ok(None)` means skipped under
    /// [`FetchFailure::Skip`].
    fn score_candidate(&self, query: &FeatureVector, candidate: String) -> Result<Option<Neighbor>> {
        let features = match self.features_of(&candidate) {
            Ok(features) => features,
            Err(err @ RecomendarError::Cancelled) => return Err(err),
            Err(err) => match self.fetch_failure {
                FetchFailure::Abort => return Err(err),
                FetchFailure::Skip => return Ok(None),
            },
        };
        let similarity = cosine_similarity(query, &features)?;
        Ok(Some(Neighbor {
            similarity,
            entity: candidate,
            features,
        }))
    }

    /// Predict `entity`'s value for `target_feature` from its k nearest
    /// neighbors. Convenience composition of [`Self::nearest_neighbors`]
    /// and [`predict_score`].
    ///
    /// # Errors
    ///
    /// As [`Self::nearest_neighbors`] and [`predict_score`].
    pub fn recommend(&self, entity: &str, target_feature: &str, k: usize) -> Result<f64> {
        let neighbors = self.nearest_neighbors(entity, k)?;
        predict_score(&neighbors, target_feature)
    }
}

/// Predict a value for `target_feature` by averaging across the neighbors
/// that possess it.
///
/// The mean is unweighted — similarity does not enter the average, a known
/// simplification of the modeled system kept as specified. Zero matching
/// neighbors is not an error: the prediction is `0.0`.
///
/// # Errors
///
/// [`RecomendarError::InvalidFeatureValue`] if a matching neighbor's value
/// fails to parse.
///
/// # Examples
///
/// ```
/// use recomendar::recommend::predict_score;
/// use recomendar::topk::Neighbor;
/// use recomendar::vector::FeatureVector;
///
/// let neighbors = vec![
///     Neighbor {
///         similarity: 0.9,
///         entity: "user_2".to_string(),
///         features: FeatureVector::from_pairs(&[("X", "4")]),
///     },
///     Neighbor {
///         similarity: 0.5,
///         entity: "user_3".to_string(),
///         features: FeatureVector::from_pairs(&[("X", "2")]),
///     },
/// ];
/// assert_eq!(predict_score(&neighbors, "X").unwrap(), 3.0);
/// assert_eq!(predict_score(&neighbors, "Y").unwrap(), 0.0);
/// ```
pub fn predict_score(neighbors: &[Neighbor], target_feature: &str) -> Result<f64> {
    let mut sum = 0.0;
    let mut matched = 0_usize;
    for neighbor in neighbors {
        if let Some(value) = neighbor.features.get(target_feature) {
            sum += parse_value(target_feature, value)?;
            matched += 1;
        }
    }
    if matched == 0 {
        return Ok(0.0);
    }
    let count = matched as f64;
    Ok(sum / count)
}
