//! Error types for the bulkhead pattern.

use breakwater_core::ResilienceError;
use std::time::Duration;

pub use breakwater_core::RegistryError;

/// Errors returned by [`Bulkhead::execute`](crate::Bulkhead::execute).
///
/// `E` is the wrapped work's own error type, forwarded unchanged in the
/// [`Inner`](BulkheadError::Inner) variant after rejection bookkeeping.
#[derive(Debug, thiserror::Error)]
pub enum BulkheadError<E> {
    /// The work did not complete within the configured deadline.
    ///
    /// The work itself is not cancelled; it keeps its slot until it finishes
    /// on its own. Only the caller's wait is abandoned.
    #[error("operation in bulkhead '{name}' exceeded the {timeout:?} deadline")]
    Timeout {
        /// Name of the bulkhead that enforced the deadline.
        name: String,
        /// The configured deadline.
        timeout: Duration,
    },

    /// The bulkhead has been shut down and no longer accepts submissions.
    #[error("bulkhead '{name}' is shut down")]
    ShutDown {
        /// Name of the bulkhead.
        name: String,
    },

    /// The work itself failed; its error is forwarded unchanged.
    #[error("work in bulkhead failed: {0}")]
    Inner(E),
}

impl<E> BulkheadError<E> {
    /// Returns true if the caller's deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BulkheadError::Timeout { .. })
    }

    /// Returns the work's own error, if that is what this is.
    pub fn into_inner(self) -> Option<E> {
        match self {
            BulkheadError::Inner(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<BulkheadError<E>> for ResilienceError<E> {
    fn from(err: BulkheadError<E>) -> Self {
        match err {
            BulkheadError::Timeout { name, timeout } => ResilienceError::Timeout { name, timeout },
            BulkheadError::ShutDown { name } => ResilienceError::ShutDown { name },
            BulkheadError::Inner(e) => ResilienceError::Application(e),
        }
    }
}
