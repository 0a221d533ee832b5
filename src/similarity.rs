//! Cosine similarity over sparse feature vectors.
//!
//! `dot(a, b) / (|a| * |b|)` with one deliberate quirk inherited from the
//! system this crate models: the dot product iterates **`a`'s keys only**.
//! Features present only in `b` contribute nothing, which is correct for
//! cosine (their `a`-side factor is zero), so the formula is still
//! symmetric in value — but the iteration contract is directional and
//! callers should pass the query vector as `a`.
//!
//! # Examples
//!
//! ```
//! use recomendar::similarity::cosine_similarity;
//! use recomendar::vector::FeatureVector;
//!
//! let a = FeatureVector::from_pairs(&[("item_10", "5"), ("item_11", "3")]);
//! let b = FeatureVector::from_pairs(&[("item_10", "4")]);
//!
//! let sim = cosine_similarity(&a, &b).unwrap();
//! assert!((sim - 0.857).abs() < 1e-3);
//! ```

use crate::error::{RecomendarError, Result};
use crate::vector::{parse_value, FeatureVector};

/// Cosine similarity between two sparse vectors.
///
/// Magnitudes are Euclidean norms over each vector's own values, not
/// restricted to the shared-key set. Ratings are non-negative in practice,
/// so results land in `[0, 1]`; signed values can reach `[-1, 1]`.
///
/// # Errors
///
/// - [`RecomendarError::InvalidFeatureValue`] if any value fails to parse.
/// - [`RecomendarError::DegenerateVector`] if either magnitude is zero
///   (including either vector being empty). The system this models divides
///   by zero here; that is a defect, not a behavior to keep.
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> Result<f64> {
    let mag_a = a.magnitude()?;
    let mag_b = b.magnitude()?;
    if mag_a == 0.0 || mag_b == 0.0 {
        return Err(RecomendarError::DegenerateVector);
    }

    let mut dot = 0.0;
    for (feature, value) in a.iter() {
        if let Some(other) = b.parsed(feature)? {
            dot += parse_value(feature, value)? * other;
        }
    }
    Ok(dot / (mag_a * mag_b))
}
