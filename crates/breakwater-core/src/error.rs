//! Shared error envelope for composed resilience patterns.
//!
//! A call wrapped in both a circuit breaker and a bulkhead can fail in three
//! distinct ways: the breaker refused it, the bulkhead gave up on it, or the
//! work itself returned an error. [`ResilienceError`] flattens these into one
//! enum so callers composing patterns do not write conversion boilerplate.
//! The pattern crates provide the `From` implementations for their own error
//! types; this crate only defines the envelope.

use std::time::Duration;
use thiserror::Error;

/// The error type returned by the composition helpers in the umbrella crate.
///
/// `E` is the error type of the wrapped work, carried unchanged in the
/// [`Application`](ResilienceError::Application) variant.
#[derive(Debug, Clone, Error)]
pub enum ResilienceError<E> {
    /// The bulkhead gave up waiting for the work to complete.
    #[error("bulkhead '{name}' timed out after {timeout:?}")]
    Timeout {
        /// Name of the bulkhead that enforced the deadline.
        name: String,
        /// The configured per-call deadline.
        timeout: Duration,
    },

    /// The circuit breaker is open; the work was never invoked.
    #[error("circuit breaker '{name}' is open")]
    CircuitOpen {
        /// Name of the refusing breaker.
        name: String,
    },

    /// The bulkhead is shut down and no longer accepts submissions.
    #[error("bulkhead '{name}' is shut down")]
    ShutDown {
        /// Name of the bulkhead.
        name: String,
    },

    /// The wrapped work itself returned an error, forwarded unchanged.
    #[error("application error: {0}")]
    Application(E),
}

impl<E> ResilienceError<E> {
    /// Returns true if this is a bulkhead timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ResilienceError::Timeout { .. })
    }

    /// Returns true if the circuit breaker refused the call.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, ResilienceError::CircuitOpen { .. })
    }

    /// Returns true if the error came from the wrapped work.
    pub fn is_application(&self) -> bool {
        matches!(self, ResilienceError::Application(_))
    }

    /// Returns the wrapped work's error, if that is what this is.
    pub fn into_application(self) -> Option<E> {
        match self {
            ResilienceError::Application(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors returned by registry lookups.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// No instance is registered under the requested name.
    #[error("no instance registered under name '{name}'")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },
}
