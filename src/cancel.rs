//! Cooperative cancellation for long-running scans.
//!
//! Store scans are blocking and paged; a [`CancelToken`] is checked between
//! pages so a caller on another thread can abort a selection that is
//! walking a large candidate set.
//!
//! # Examples
//!
//! ```
//! use recomendar::cancel::CancelToken;
//!
//! let token = CancelToken::new();
//! let handle = token.clone();
//!
//! assert!(!token.is_cancelled());
//! handle.cancel();
//! assert!(token.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag, cheap to clone across threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe the flag.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
