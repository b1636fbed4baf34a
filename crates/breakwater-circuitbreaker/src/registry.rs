//! Named registry of circuit breakers.

use crate::breaker::CircuitBreaker;
use crate::circuit::CircuitStats;
use crate::config::CircuitBreakerConfig;
use crate::error::RegistryError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-wide collection of named [`CircuitBreaker`]s.
///
/// Like the bulkhead registry, this is a cheap-to-clone handle over shared
/// state; the surrounding application constructs one at startup and hands it
/// to whatever needs to create or look up breakers.
#[derive(Clone, Default)]
pub struct CircuitBreakerRegistry {
    inner: Arc<RwLock<HashMap<String, CircuitBreaker>>>,
}

impl CircuitBreakerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the breaker registered under `config.name()`, creating it
    /// from `config` if absent.
    ///
    /// Creation is first-writer-wins: if the name is already registered, the
    /// existing instance is returned and `config` is discarded.
    pub fn create(&self, config: CircuitBreakerConfig) -> CircuitBreaker {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.entry(config.name().to_string())
            .or_insert_with(|| CircuitBreaker::new(config))
            .clone()
    }

    /// Looks up a breaker by name.
    pub fn get(&self, name: &str) -> Result<CircuitBreaker, RegistryError> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(name).cloned().ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    /// Snapshot of every registered breaker's stats, keyed by name.
    pub async fn all_stats(&self) -> HashMap<String, CircuitStats> {
        let breakers = self.snapshot();
        let mut stats = HashMap::with_capacity(breakers.len());
        for breaker in breakers {
            stats.insert(breaker.name().to_string(), breaker.stats().await);
        }
        stats
    }

    /// Resets every registered breaker to closed.
    pub async fn reset_all(&self) {
        for breaker in self.snapshot() {
            breaker.reset().await;
        }
    }

    fn snapshot(&self) -> Vec<CircuitBreaker> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.values().cloned().collect()
    }
}
