//! Configuration for the bulkhead pattern.

use crate::events::BulkheadEvent;
use breakwater_core::events::EventListeners;
use std::time::Duration;

/// Configuration for a [`Bulkhead`](crate::Bulkhead).
///
/// Values arrive as plain constructor arguments; the bulkhead reads no
/// environment or external configuration source.
#[derive(Clone)]
pub struct BulkheadConfig {
    /// Unique name of this bulkhead within a registry.
    pub(crate) name: String,
    /// Maximum number of concurrently running work items.
    pub(crate) capacity: usize,
    /// Deadline on the caller's wait, covering queueing plus execution.
    pub(crate) timeout: Duration,
    /// Event listeners.
    pub(crate) event_listeners: EventListeners<BulkheadEvent>,
}

impl BulkheadConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> BulkheadConfigBuilder {
        BulkheadConfigBuilder::new()
    }

    /// Name of the bulkhead this configuration describes.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`BulkheadConfig`].
pub struct BulkheadConfigBuilder {
    name: String,
    capacity: usize,
    timeout: Duration,
    event_listeners: EventListeners<BulkheadEvent>,
}

impl BulkheadConfigBuilder {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self {
            name: "bulkhead".to_string(),
            capacity: 5,
            timeout: Duration::from_secs(30),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the name of this bulkhead instance.
    ///
    /// Default: "bulkhead"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the maximum number of concurrently running work items.
    ///
    /// Submissions above this level queue for a free slot; the queue itself
    /// is unbounded, the enforced bound is running slots.
    ///
    /// Default: 5
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the per-call deadline.
    ///
    /// The deadline covers the caller's whole wait: time queued for a slot
    /// plus execution time.
    ///
    /// Default: 30 seconds
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Registers a callback for calls admitted into an execution slot.
    ///
    /// The callback receives the number of occupied slots after admission,
    /// between 1 and `capacity`.
    pub fn on_call_permitted<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &BulkheadEvent| {
            if let BulkheadEvent::CallPermitted {
                concurrent_calls, ..
            } = event
            {
                f(*concurrent_calls);
            }
        });
        self
    }

    /// Registers a callback for rejected calls (deadline elapsed or
    /// bulkhead shut down). The callback receives the configured capacity.
    pub fn on_call_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &BulkheadEvent| {
            if let BulkheadEvent::CallRejected { capacity, .. } = event {
                f(*capacity);
            }
        });
        self
    }

    /// Registers a callback for calls that completed successfully, with the
    /// call's wall-clock duration.
    pub fn on_call_finished<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &BulkheadEvent| {
            if let BulkheadEvent::CallFinished { duration, .. } = event {
                f(*duration);
            }
        });
        self
    }

    /// Registers a callback for calls whose work returned an error, with the
    /// call's wall-clock duration.
    pub fn on_call_failed<F>(mut self, f: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &BulkheadEvent| {
            if let BulkheadEvent::CallFailed { duration, .. } = event {
                f(*duration);
            }
        });
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> BulkheadConfig {
        BulkheadConfig {
            name: self.name,
            capacity: self.capacity,
            timeout: self.timeout,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for BulkheadConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
