//! Process-wide resilience context.

use breakwater_bulkhead::BulkheadRegistry;
use breakwater_circuitbreaker::CircuitBreakerRegistry;

/// The single shared-ownership handle to every bulkhead and circuit breaker
/// in the process.
///
/// Constructed once at startup and passed by clone to every component that
/// creates or looks up an instance; there is no hidden global. Cloning is
/// cheap and every clone sees the same registries.
///
/// ```rust
/// use breakwater::ResilienceContext;
/// use breakwater::{BulkheadConfig, CircuitBreakerConfig};
/// use std::time::Duration;
///
/// let ctx = ResilienceContext::new();
///
/// // Startup wiring: the application decides names and limits.
/// ctx.bulkheads().create(
///     BulkheadConfig::builder()
///         .name("products")
///         .capacity(10)
///         .timeout(Duration::from_secs(3))
///         .build(),
/// );
/// ctx.circuit_breakers().create(
///     CircuitBreakerConfig::builder()
///         .name("payments")
///         .failure_threshold(3)
///         .build(),
/// );
///
/// // Request handlers look instances up by name.
/// let products = ctx.bulkheads().get("products").unwrap();
/// assert_eq!(products.capacity(), 10);
/// ```
#[derive(Clone, Default)]
pub struct ResilienceContext {
    bulkheads: BulkheadRegistry,
    circuit_breakers: CircuitBreakerRegistry,
}

impl ResilienceContext {
    /// Creates a context with empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bulkhead registry.
    pub fn bulkheads(&self) -> &BulkheadRegistry {
        &self.bulkheads
    }

    /// The circuit breaker registry.
    pub fn circuit_breakers(&self) -> &CircuitBreakerRegistry {
        &self.circuit_breakers
    }

    /// Process teardown: shuts down every bulkhead.
    ///
    /// With `wait = true` this returns only once all in-flight work has
    /// drained. Circuit breakers hold no resources and need no teardown.
    pub async fn shutdown(&self, wait: bool) {
        self.bulkheads.shutdown_all(wait).await;
    }
}
