//! Higher-order composition of resilience patterns.
//!
//! These helpers take a unit of work and pattern references and return the
//! wrapped invocation, normalizing all failures to [`ResilienceError`]. They
//! replace ad-hoc wrapping at every call site: handlers pick instances out of
//! the [`ResilienceContext`](crate::ResilienceContext) and pass their work
//! through one of these functions.

use breakwater_bulkhead::Bulkhead;
use breakwater_circuitbreaker::{CircuitBreaker, CircuitBreakerError};
use breakwater_core::ResilienceError;
use std::future::Future;

/// Runs `work` inside `bulkhead`, normalizing the error.
pub async fn with_bulkhead<F, Fut, T, E>(
    bulkhead: &Bulkhead,
    work: F,
) -> Result<T, ResilienceError<E>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    bulkhead.execute(work).await.map_err(ResilienceError::from)
}

/// Runs `work` under `breaker`'s admission policy, normalizing the error.
pub async fn with_circuit_breaker<F, Fut, T, E>(
    breaker: &CircuitBreaker,
    work: F,
) -> Result<T, ResilienceError<E>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    breaker.call(work).await.map_err(ResilienceError::from)
}

/// Runs `work` behind both patterns: the breaker decides *whether* the call
/// is attempted, the bulkhead decides *how many* run and *for how long*.
///
/// The breaker is outermost, so a bulkhead timeout or shutdown counts as a
/// breaker failure; enough of them will open the circuit, which is exactly
/// the cascade the combination is meant to stop.
pub async fn protect<F, Fut, T, E>(
    breaker: &CircuitBreaker,
    bulkhead: &Bulkhead,
    work: F,
) -> Result<T, ResilienceError<E>>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let bulkhead = bulkhead.clone();
    match breaker
        .call(move || async move { bulkhead.execute(work).await })
        .await
    {
        Ok(value) => Ok(value),
        Err(CircuitBreakerError::OpenCircuit { name }) => {
            Err(ResilienceError::CircuitOpen { name })
        }
        Err(CircuitBreakerError::Inner(bulkhead_error)) => Err(bulkhead_error.into()),
    }
}
