//! Sparse feature vectors with text-encoded values.
//!
//! One entity's row in the store becomes a [`FeatureVector`]: a mapping
//! from feature id to value. Values travel as text (the store is untyped)
//! and are parsed to `f64` on demand; a non-numeric value surfaces as
//! [`RecomendarError::InvalidFeatureValue`] at the point of use, not at
//! construction.
//!
//! # Examples
//!
//! ```
//! use recomendar::vector::FeatureVector;
//!
//! let mut features = FeatureVector::new();
//! features.insert("item_10", "5");
//! features.insert("item_11", "3");
//!
//! assert_eq!(features.len(), 2);
//! assert_eq!(features.parsed("item_10").unwrap(), Some(5.0));
//! assert_eq!(features.parsed("item_99").unwrap(), None);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RecomendarError, Result};

/// Sparse mapping of feature id to text value for one entity.
///
/// Keys are unique; inserting an existing key overwrites (last wins, the
/// same policy the store client applies to duplicate qualifiers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector(BTreeMap<String, String>);

impl FeatureVector {
    /// Create an empty vector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from (feature, value) pairs. Later pairs win on duplicate keys.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut fv = Self::new();
        for (feature, value) in pairs {
            fv.insert(feature, value);
        }
        fv
    }

    /// Insert or overwrite a feature value.
    pub fn insert(&mut self, feature: &str, value: &str) {
        self.0.insert(feature.to_string(), value.to_string());
    }

    /// Raw text value for a feature, if present.
    #[must_use]
    pub fn get(&self, feature: &str) -> Option<&str> {
        self.0.get(feature).map(String::as_str)
    }

    /// Whether the feature is present.
    #[must_use]
    pub fn contains(&self, feature: &str) -> bool {
        self.0.contains_key(feature)
    }

    /// Parsed value for a feature: `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::InvalidFeatureValue`] if the stored text
    /// is not a number.
    pub fn parsed(&self, feature: &str) -> Result<Option<f64>> {
        match self.0.get(feature) {
            None => Ok(None),
            Some(value) => parse_value(feature, value).map(Some),
        }
    }

    /// Iterate (feature, value) pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate feature ids in key order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Euclidean norm over this vector's own values.
    ///
    /// # Errors
    ///
    /// Returns [`RecomendarError::InvalidFeatureValue`] on the first
    /// non-numeric value.
    pub fn magnitude(&self) -> Result<f64> {
        let mut sum = 0.0;
        for (feature, value) in self.iter() {
            let v = parse_value(feature, value)?;
            sum += v * v;
        }
        Ok(sum.sqrt())
    }
}

/// Parse one feature value, attaching the feature id to the error.
pub(crate) fn parse_value(feature: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| RecomendarError::InvalidFeatureValue {
            feature: feature.to_string(),
            value: value.to_string(),
        })
}
