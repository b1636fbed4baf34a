//! Bulkhead pattern: per-service concurrency isolation.
//!
//! A [`Bulkhead`] bounds how many work items for one logical service run at
//! once and how long a caller waits for any one of them. Independent
//! bulkheads share nothing, so a saturated or failing service cannot starve
//! the slots belonging to another.
//!
//! # Basic Example
//!
//! ```rust
//! use breakwater_bulkhead::{Bulkhead, BulkheadConfig};
//! use std::time::Duration;
//!
//! # async fn example() {
//! let bulkhead = Bulkhead::new(
//!     BulkheadConfig::builder()
//!         .name("products")
//!         .capacity(10)
//!         .timeout(Duration::from_secs(3))
//!         .build(),
//! );
//!
//! let result = bulkhead
//!     .execute(|| async {
//!         // Call the downstream service here.
//!         Ok::<_, std::io::Error>("response")
//!     })
//!     .await;
//! # let _ = result;
//! # }
//! ```
//!
//! # Registry
//!
//! Applications usually hold bulkheads in a [`BulkheadRegistry`], populated
//! once at startup and looked up by name from request handlers:
//!
//! ```rust
//! use breakwater_bulkhead::{BulkheadConfig, BulkheadRegistry};
//!
//! let registry = BulkheadRegistry::new();
//! registry.create(BulkheadConfig::builder().name("orders").capacity(5).build());
//!
//! let orders = registry.get("orders").unwrap();
//! assert_eq!(orders.capacity(), 5);
//! ```
//!
//! # Timeouts are cooperative
//!
//! When a call exceeds its deadline the caller stops waiting, but the work is
//! not cancelled; it keeps its slot until it completes on its own. See
//! [`BulkheadError::Timeout`].

pub mod bulkhead;
pub mod config;
pub mod error;
pub mod events;
pub mod registry;

pub use bulkhead::{Bulkhead, BulkheadStats};
pub use config::{BulkheadConfig, BulkheadConfigBuilder};
pub use error::{BulkheadError, RegistryError};
pub use events::BulkheadEvent;
pub use registry::BulkheadRegistry;
