//! Public circuit breaker handle.

use crate::circuit::{Circuit, CircuitState, CircuitStats};
use crate::config::CircuitBreakerConfig;
use crate::error::CircuitBreakerError;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Failure-triggered call blocking for one downstream dependency.
///
/// Cloning is cheap and every clone shares the same state machine. The
/// admission check and the outcome recording each take the per-instance lock;
/// the wrapped work runs outside it so a slow call does not block concurrent
/// admission checks. An outcome recorded after a concurrent transition only
/// extends the open window, it cannot reopen a recovered circuit spuriously.
#[derive(Clone)]
pub struct CircuitBreaker {
    config: Arc<CircuitBreakerConfig>,
    circuit: Arc<Mutex<Circuit>>,
    state_atomic: Arc<AtomicU8>,
}

impl CircuitBreaker {
    /// Creates a breaker from its configuration, starting closed.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let state_atomic = Arc::new(AtomicU8::new(CircuitState::Closed as u8));

        #[cfg(feature = "tracing")]
        tracing::info!(
            breaker = %config.name,
            failure_threshold = config.failure_threshold,
            open_duration = ?config.open_duration,
            half_open_duration = ?config.half_open_duration,
            "circuit breaker created"
        );

        Self {
            circuit: Arc::new(Mutex::new(Circuit::new(Arc::clone(&state_atomic)))),
            state_atomic,
            config: Arc::new(config),
        }
    }

    /// Name of this breaker.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Current state, read without locking.
    pub fn state(&self) -> CircuitState {
        CircuitState::from_u8(self.state_atomic.load(Ordering::Acquire))
    }

    /// Runs `work` under this breaker's admission policy.
    ///
    /// If the circuit is open (and the open duration has not yet elapsed) the
    /// work is never invoked and the call fails with
    /// [`CircuitBreakerError::OpenCircuit`]; the rejection is recorded as a
    /// failure in the cumulative totals. Otherwise the outcome of `work`
    /// drives the state machine and any error is forwarded unchanged.
    pub async fn call<F, Fut, T, E>(&self, work: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        {
            let mut circuit = self.circuit.lock().await;
            if !circuit.try_acquire(&self.config) {
                return Err(CircuitBreakerError::OpenCircuit {
                    name: self.config.name.clone(),
                });
            }
        }

        // Lock released while the work runs.
        match work().await {
            Ok(value) => {
                self.circuit.lock().await.record_success(&self.config);
                Ok(value)
            }
            Err(error) => {
                self.circuit.lock().await.record_failure(&self.config);
                Err(CircuitBreakerError::Inner(error))
            }
        }
    }

    /// Returns a snapshot of this breaker's state and counters.
    pub async fn stats(&self) -> CircuitStats {
        self.circuit.lock().await.stats(&self.config)
    }

    /// Forces the circuit closed, clearing the consecutive counters and the
    /// failure timestamp. Cumulative totals are untouched.
    pub async fn reset(&self) {
        self.circuit.lock().await.reset(&self.config);
    }
}
