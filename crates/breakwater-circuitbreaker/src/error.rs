//! Error types for the circuit breaker pattern.

use breakwater_core::ResilienceError;
use thiserror::Error;

pub use breakwater_core::RegistryError;

/// Errors returned by [`CircuitBreaker::call`](crate::CircuitBreaker::call).
#[derive(Debug, Error)]
pub enum CircuitBreakerError<E> {
    /// The circuit is open; the work was never invoked.
    #[error("circuit breaker '{name}' is open; call not permitted")]
    OpenCircuit {
        /// Name of the refusing breaker.
        name: String,
    },

    /// The work itself failed; its error is forwarded unchanged.
    #[error("work failed: {0}")]
    Inner(E),
}

impl<E> CircuitBreakerError<E> {
    /// Returns true if this rejection came from an open circuit.
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, CircuitBreakerError::OpenCircuit { .. })
    }

    /// Returns the work's own error, if that is what this is.
    pub fn into_inner(self) -> Option<E> {
        match self {
            CircuitBreakerError::Inner(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<CircuitBreakerError<E>> for ResilienceError<E> {
    fn from(err: CircuitBreakerError<E>) -> Self {
        match err {
            CircuitBreakerError::OpenCircuit { name } => ResilienceError::CircuitOpen { name },
            CircuitBreakerError::Inner(e) => ResilienceError::Application(e),
        }
    }
}
