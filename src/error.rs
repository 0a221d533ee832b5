//! Error types for Recomendar operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Recomendar operations.
///
/// Covers store/transport failures, malformed feature values, and
/// degenerate inputs to the similarity engine.
///
/// # Examples
///
/// ```
/// use recomendar::error::RecomendarError;
///
/// let err = RecomendarError::InvalidFeatureValue {
///     feature: "item_10".to_string(),
///     value: "five".to_string(),
/// };
/// assert!(err.to_string().contains("item_10"));
/// ```
#[derive(Debug)]
pub enum RecomendarError {
    /// The store connection failed or a scan could not be established.
    ///
    /// Fatal to the current call; no retry is attempted.
    StoreUnavailable {
        /// Transport-level failure description
        message: String,
    },

    /// A feature value could not be parsed as a number.
    InvalidFeatureValue {
        /// Feature id whose value failed to parse
        feature: String,
        /// The offending text value
        value: String,
    },

    /// A zero-magnitude vector was passed to cosine similarity.
    DegenerateVector,

    /// The operation was cancelled via its [`CancelToken`](crate::cancel::CancelToken).
    Cancelled,

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for RecomendarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecomendarError::StoreUnavailable { message } => {
                write!(f, "Store unavailable: {message}")
            }
            RecomendarError::InvalidFeatureValue { feature, value } => {
                write!(f, "Invalid feature value: {feature} = {value:?}, expected a number")
            }
            RecomendarError::DegenerateVector => {
                write!(f, "Degenerate vector: zero magnitude in cosine similarity")
            }
            RecomendarError::Cancelled => write!(f, "Operation cancelled"),
            RecomendarError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for RecomendarError {}

impl From<&str> for RecomendarError {
    fn from(msg: &str) -> Self {
        RecomendarError::Other(msg.to_string())
    }
}

impl From<String> for RecomendarError {
    fn from(msg: String) -> Self {
        RecomendarError::Other(msg)
    }
}

impl RecomendarError {
    /// Create a store failure from any transport error's message.
    #[must_use]
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, RecomendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_display() {
        let err = RecomendarError::store_unavailable("connection refused");
        assert!(err.to_string().contains("Store unavailable"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_invalid_feature_value_display() {
        let err = RecomendarError::InvalidFeatureValue {
            feature: "item_42".to_string(),
            value: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("item_42"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("number"));
    }

    #[test]
    fn test_degenerate_vector_display() {
        let err = RecomendarError::DegenerateVector;
        assert!(err.to_string().contains("zero magnitude"));
    }

    #[test]
    fn test_cancelled_display() {
        assert!(RecomendarError::Cancelled.to_string().contains("cancelled"));
    }

    #[test]
    fn test_from_str() {
        let err: RecomendarError = "test error".into();
        assert!(matches!(err, RecomendarError::Other(_)));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_from_string() {
        let err: RecomendarError = "test error".to_string().into();
        assert!(matches!(err, RecomendarError::Other(_)));
    }

    #[test]
    fn test_error_debug_impl() {
        let err = RecomendarError::Cancelled;
        assert!(format!("{err:?}").contains("Cancelled"));
    }
}
