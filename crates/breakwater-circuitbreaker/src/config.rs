//! Configuration for the circuit breaker pattern.

use crate::circuit::CircuitState;
use crate::events::CircuitBreakerEvent;
use breakwater_core::events::EventListeners;
use std::time::Duration;

/// Configuration for a [`CircuitBreaker`](crate::CircuitBreaker).
#[derive(Clone)]
pub struct CircuitBreakerConfig {
    /// Unique name of this breaker within a registry.
    pub(crate) name: String,
    /// Consecutive failures that trip the circuit open.
    pub(crate) failure_threshold: u32,
    /// How long the circuit stays open before a probe is allowed.
    pub(crate) open_duration: Duration,
    /// Length of the half-open probe window. Accepted for call-site parity
    /// with common breaker configurations; recovery is currently decided by
    /// consecutive probe outcomes, not elapsed time.
    pub(crate) half_open_duration: Duration,
    /// Event listeners.
    pub(crate) event_listeners: EventListeners<CircuitBreakerEvent>,
}

impl CircuitBreakerConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CircuitBreakerConfigBuilder {
        CircuitBreakerConfigBuilder::new()
    }

    /// Name of the breaker this configuration describes.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for [`CircuitBreakerConfig`].
pub struct CircuitBreakerConfigBuilder {
    name: String,
    failure_threshold: u32,
    open_duration: Duration,
    half_open_duration: Duration,
    event_listeners: EventListeners<CircuitBreakerEvent>,
}

impl CircuitBreakerConfigBuilder {
    /// Creates a builder with default values.
    pub fn new() -> Self {
        Self {
            name: "circuit-breaker".to_string(),
            failure_threshold: 3,
            open_duration: Duration::from_secs(60),
            half_open_duration: Duration::from_secs(30),
            event_listeners: EventListeners::new(),
        }
    }

    /// Sets the name of this breaker instance.
    ///
    /// Default: "circuit-breaker"
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets how many consecutive failures trip the circuit open.
    ///
    /// Default: 3
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.failure_threshold = threshold;
        self
    }

    /// Sets how long the circuit stays open before the next call may probe.
    ///
    /// The transition is evaluated lazily at call time, not by a timer.
    ///
    /// Default: 60 seconds
    pub fn open_duration(mut self, duration: Duration) -> Self {
        self.open_duration = duration;
        self
    }

    /// Sets the half-open probe window.
    ///
    /// Recovery is currently decided by two consecutive probe successes; the
    /// window length is recorded but not evaluated.
    ///
    /// Default: 30 seconds
    pub fn half_open_duration(mut self, duration: Duration) -> Self {
        self.half_open_duration = duration;
        self
    }

    /// Registers a callback for state transitions, with the old and new
    /// states.
    pub fn on_state_transition<F>(mut self, f: F) -> Self
    where
        F: Fn(CircuitState, CircuitState) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &CircuitBreakerEvent| {
            if let CircuitBreakerEvent::StateTransition {
                from_state,
                to_state,
                ..
            } = event
            {
                f(*from_state, *to_state);
            }
        });
        self
    }

    /// Registers a callback for calls refused because the circuit is open.
    pub fn on_call_rejected<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &CircuitBreakerEvent| {
            if let CircuitBreakerEvent::CallRejected { .. } = event {
                f();
            }
        });
        self
    }

    /// Registers a callback for successful admitted calls, with the state
    /// the outcome was recorded in.
    pub fn on_success<F>(mut self, f: F) -> Self
    where
        F: Fn(CircuitState) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &CircuitBreakerEvent| {
            if let CircuitBreakerEvent::SuccessRecorded { state, .. } = event {
                f(*state);
            }
        });
        self
    }

    /// Registers a callback for failed admitted calls, with the state the
    /// outcome was recorded in.
    pub fn on_failure<F>(mut self, f: F) -> Self
    where
        F: Fn(CircuitState) + Send + Sync + 'static,
    {
        self.event_listeners.add(move |event: &CircuitBreakerEvent| {
            if let CircuitBreakerEvent::FailureRecorded { state, .. } = event {
                f(*state);
            }
        });
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            name: self.name,
            failure_threshold: self.failure_threshold,
            open_duration: self.open_duration,
            half_open_duration: self.half_open_duration,
            event_listeners: self.event_listeners,
        }
    }
}

impl Default for CircuitBreakerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
