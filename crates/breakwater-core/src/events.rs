//! Event system for resilience patterns.
//!
//! Each pattern emits a small enum of events (call permitted, call rejected,
//! state transition, ...) through an [`EventListeners`] collection. Listeners
//! are plain closures or types implementing [`EventListener`]; the surrounding
//! application hooks them up at construction time through the config builders.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// An event emitted by a resilience pattern instance.
pub trait ResilienceEvent: Send + Sync + fmt::Debug {
    /// Short machine-readable kind, e.g. `"call_rejected"`.
    fn event_type(&self) -> &'static str;

    /// When the event occurred.
    fn timestamp(&self) -> Instant;

    /// Name of the pattern instance that emitted the event.
    fn pattern_name(&self) -> &str;
}

/// Receives events from a pattern instance.
///
/// Implemented for any `Fn(&E)` closure, so most call sites just pass a
/// closure to [`EventListeners::add`].
pub trait EventListener<E: ResilienceEvent>: Send + Sync {
    /// Called synchronously on the emitting task for every event.
    fn on_event(&self, event: &E);
}

impl<E, F> EventListener<E> for F
where
    E: ResilienceEvent,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        self(event)
    }
}

/// A cloneable collection of event listeners.
pub struct EventListeners<E: ResilienceEvent> {
    listeners: Vec<Arc<dyn EventListener<E>>>,
}

impl<E: ResilienceEvent> Clone for EventListeners<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: self.listeners.clone(),
        }
    }
}

impl<E: ResilienceEvent> EventListeners<E> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Emits an event to every registered listener.
    ///
    /// A panicking listener does not prevent the remaining listeners from
    /// running.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener.on_event(event);
            }));
        }
    }

    /// Returns true if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: ResilienceEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}
