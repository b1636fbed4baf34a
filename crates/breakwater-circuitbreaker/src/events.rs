//! Event types for the circuit breaker pattern.

use crate::circuit::CircuitState;
use breakwater_core::events::ResilienceEvent;
use std::time::Instant;

/// Events emitted by a [`CircuitBreaker`](crate::CircuitBreaker).
#[derive(Debug, Clone)]
pub enum CircuitBreakerEvent {
    /// The breaker moved between states.
    StateTransition {
        /// Name of the breaker instance.
        pattern_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// State before the transition.
        from_state: CircuitState,
        /// State after the transition.
        to_state: CircuitState,
    },
    /// A call was admitted (circuit closed or half-open).
    CallPermitted {
        /// Name of the breaker instance.
        pattern_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// State at admission time.
        state: CircuitState,
    },
    /// A call was refused without invoking the work (circuit open).
    CallRejected {
        /// Name of the breaker instance.
        pattern_name: String,
        /// When the event occurred.
        timestamp: Instant,
    },
    /// An admitted call succeeded.
    SuccessRecorded {
        /// Name of the breaker instance.
        pattern_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// State when the outcome was recorded.
        state: CircuitState,
    },
    /// An admitted call failed.
    FailureRecorded {
        /// Name of the breaker instance.
        pattern_name: String,
        /// When the event occurred.
        timestamp: Instant,
        /// State when the outcome was recorded.
        state: CircuitState,
    },
}

impl ResilienceEvent for CircuitBreakerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CircuitBreakerEvent::StateTransition { .. } => "state_transition",
            CircuitBreakerEvent::CallPermitted { .. } => "call_permitted",
            CircuitBreakerEvent::CallRejected { .. } => "call_rejected",
            CircuitBreakerEvent::SuccessRecorded { .. } => "success_recorded",
            CircuitBreakerEvent::FailureRecorded { .. } => "failure_recorded",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CircuitBreakerEvent::StateTransition { timestamp, .. }
            | CircuitBreakerEvent::CallPermitted { timestamp, .. }
            | CircuitBreakerEvent::CallRejected { timestamp, .. }
            | CircuitBreakerEvent::SuccessRecorded { timestamp, .. }
            | CircuitBreakerEvent::FailureRecorded { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            CircuitBreakerEvent::StateTransition { pattern_name, .. }
            | CircuitBreakerEvent::CallPermitted { pattern_name, .. }
            | CircuitBreakerEvent::CallRejected { pattern_name, .. }
            | CircuitBreakerEvent::SuccessRecorded { pattern_name, .. }
            | CircuitBreakerEvent::FailureRecorded { pattern_name, .. } => pattern_name,
        }
    }
}
