//! Circuit breaker pattern: failure-triggered call blocking.
//!
//! A [`CircuitBreaker`] watches consecutive failures against a downstream
//! dependency. Once the failure threshold is reached the circuit opens and
//! calls fail fast without touching the dependency. After the configured open
//! duration the next call probes recovery in the half-open state: two
//! consecutive successes close the circuit again, one failure reopens it.
//!
//! # Basic Example
//!
//! ```rust
//! use breakwater_circuitbreaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let breaker = CircuitBreaker::new(
//!     CircuitBreakerConfig::builder()
//!         .name("payments")
//!         .failure_threshold(3)
//!         .open_duration(Duration::from_secs(60))
//!         .build(),
//! );
//!
//! let result = breaker
//!     .call(|| async {
//!         // Call the flaky dependency here.
//!         Ok::<_, std::io::Error>("response")
//!     })
//!     .await;
//! # let _ = result;
//! assert_eq!(breaker.state(), CircuitState::Closed);
//! # }
//! ```
//!
//! # Monitoring state transitions
//!
//! ```rust
//! use breakwater_circuitbreaker::{CircuitBreaker, CircuitBreakerConfig};
//!
//! let breaker = CircuitBreaker::new(
//!     CircuitBreakerConfig::builder()
//!         .name("inventory")
//!         .on_state_transition(|from, to| {
//!             eprintln!("inventory breaker: {:?} -> {:?}", from, to);
//!         })
//!         .build(),
//! );
//! # let _ = breaker;
//! ```

pub mod breaker;
pub mod circuit;
pub mod config;
pub mod error;
pub mod events;
pub mod registry;

pub use breaker::CircuitBreaker;
pub use circuit::{CircuitState, CircuitStats};
pub use config::{CircuitBreakerConfig, CircuitBreakerConfigBuilder};
pub use error::{CircuitBreakerError, RegistryError};
pub use events::CircuitBreakerEvent;
pub use registry::CircuitBreakerRegistry;
