//! Resilience patterns for processes hosting multiple logical services.
//!
//! A process composing several downstream dependencies of mixed reliability
//! needs two guarantees: a saturated service must not starve the others, and
//! a failing one must not drag the rest down with it. This crate bundles the
//! two patterns that provide them:
//!
//! - [`Bulkhead`]: per-service concurrency isolation with a fixed slot pool
//!   and a per-call deadline ([`breakwater_bulkhead`]).
//! - [`CircuitBreaker`]: failure-triggered call blocking with half-open
//!   recovery probing ([`breakwater_circuitbreaker`]).
//!
//! plus the glue applications actually wire up:
//!
//! - [`ResilienceContext`]: the explicit, clonable handle holding both
//!   named-instance registries; built once at startup, no global state.
//! - [`compose`]: higher-order helpers wrapping a unit of work in one or both
//!   patterns with a single normalized error type, [`ResilienceError`].
//!
//! # Example
//!
//! ```rust
//! use breakwater::{compose, BulkheadConfig, CircuitBreakerConfig, ResilienceContext};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ResilienceContext::new();
//! ctx.bulkheads().create(
//!     BulkheadConfig::builder()
//!         .name("products")
//!         .capacity(10)
//!         .timeout(Duration::from_secs(3))
//!         .build(),
//! );
//! ctx.circuit_breakers().create(
//!     CircuitBreakerConfig::builder()
//!         .name("products")
//!         .failure_threshold(3)
//!         .build(),
//! );
//!
//! let bulkhead = ctx.bulkheads().get("products")?;
//! let breaker = ctx.circuit_breakers().get("products")?;
//!
//! let response = compose::protect(&breaker, &bulkhead, || async {
//!     // Call the products service here.
//!     Ok::<_, std::io::Error>("catalog page")
//! })
//! .await;
//! # let _ = response;
//!
//! // Teardown drains in-flight work.
//! ctx.shutdown(true).await;
//! # Ok(())
//! # }
//! ```

pub mod compose;
pub mod context;

pub use breakwater_bulkhead::{
    Bulkhead, BulkheadConfig, BulkheadError, BulkheadEvent, BulkheadRegistry, BulkheadStats,
};
pub use breakwater_circuitbreaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitBreakerEvent,
    CircuitBreakerRegistry, CircuitState, CircuitStats,
};
pub use breakwater_core::{RegistryError, ResilienceError};
pub use context::ResilienceContext;
