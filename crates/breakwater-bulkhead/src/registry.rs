//! Named registry of bulkheads.

use crate::bulkhead::{Bulkhead, BulkheadStats};
use crate::config::BulkheadConfig;
use crate::error::RegistryError;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Process-wide collection of named [`Bulkhead`]s.
///
/// The registry is a cheap-to-clone handle; every clone shares the same
/// underlying map. The surrounding application constructs one at startup and
/// passes it wherever bulkheads are created or looked up.
#[derive(Clone, Default)]
pub struct BulkheadRegistry {
    inner: Arc<RwLock<HashMap<String, Bulkhead>>>,
}

impl BulkheadRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bulkhead registered under `config.name()`, creating it
    /// from `config` if absent.
    ///
    /// Creation is first-writer-wins: if the name is already registered, the
    /// existing instance is returned and `config` is discarded.
    pub fn create(&self, config: BulkheadConfig) -> Bulkhead {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.entry(config.name().to_string())
            .or_insert_with(|| Bulkhead::new(config))
            .clone()
    }

    /// Looks up a bulkhead by name.
    pub fn get(&self, name: &str) -> Result<Bulkhead, RegistryError> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(name).cloned().ok_or_else(|| RegistryError::NotFound {
            name: name.to_string(),
        })
    }

    /// Snapshot of every registered bulkhead's stats, keyed by name.
    pub fn all_stats(&self) -> HashMap<String, BulkheadStats> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.iter()
            .map(|(name, bulkhead)| (name.clone(), bulkhead.stats()))
            .collect()
    }

    /// Shuts down every registered bulkhead.
    ///
    /// With `wait = true` this returns only once all in-flight work has
    /// drained from every bulkhead.
    pub async fn shutdown_all(&self, wait: bool) {
        let bulkheads: Vec<Bulkhead> = {
            let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
            map.values().cloned().collect()
        };
        for bulkhead in bulkheads {
            bulkhead.shutdown(wait).await;
        }
    }
}
