//! Circuit breaker state machine.
//!
//! The [`Circuit`] struct holds all mutable breaker state and is driven
//! entirely by its owner under a per-instance lock. Transitions:
//!
//! - Closed -> Open: consecutive failures reach the threshold.
//! - Open -> HalfOpen: the open duration has elapsed since the last failure,
//!   evaluated lazily at the next admission check.
//! - HalfOpen -> Closed: two consecutive probe successes.
//! - HalfOpen -> Open: a single probe failure.

use crate::config::CircuitBreakerConfig;
use crate::events::CircuitBreakerEvent;
#[cfg(feature = "metrics")]
use metrics::{counter, gauge};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Consecutive half-open successes required to close the circuit.
const HALF_OPEN_SUCCESSES_TO_CLOSE: u32 = 2;

/// The state of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum CircuitState {
    /// Normal operation; calls are admitted.
    Closed = 0,
    /// All calls are refused without invoking the work.
    Open = 1,
    /// Limited trial operation while probing recovery.
    HalfOpen = 2,
}

impl CircuitState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => CircuitState::Open,
            2 => CircuitState::HalfOpen,
            _ => CircuitState::Closed,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time snapshot of a breaker's state and counters.
///
/// Cumulative totals are monotonic and survive [`reset`](crate::CircuitBreaker::reset).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CircuitStats {
    /// Name of the breaker.
    pub name: String,
    /// Current state.
    pub state: CircuitState,
    /// Every call seen, admitted or refused.
    pub total_calls: u64,
    /// Admitted calls that succeeded.
    pub total_successes: u64,
    /// Failed calls. Open-circuit rejections are counted here too: a refused
    /// call is reported as a failure, matching the failure-rate statistic
    /// downstream dashboards expect.
    pub total_failures: u64,
    /// `total_successes / total_calls * 100`; 0.0 when no calls yet.
    pub success_rate: f64,
    /// Current consecutive-failure streak.
    pub consecutive_failures: u32,
    /// Configured threshold that trips the circuit.
    pub failure_threshold: u32,
}

pub(crate) struct Circuit {
    state: CircuitState,
    state_atomic: Arc<AtomicU8>,
    consecutive_failures: u32,
    consecutive_successes: u32,
    last_failure_time: Option<Instant>,
    total_calls: u64,
    total_successes: u64,
    total_failures: u64,
}

impl Circuit {
    pub(crate) fn new(state_atomic: Arc<AtomicU8>) -> Self {
        Self {
            state: CircuitState::Closed,
            state_atomic,
            consecutive_failures: 0,
            consecutive_successes: 0,
            last_failure_time: None,
            total_calls: 0,
            total_successes: 0,
            total_failures: 0,
        }
    }

    pub(crate) fn state(&self) -> CircuitState {
        self.state
    }

    /// Admission check for one call: bumps the call counter, applies the
    /// lazy Open -> HalfOpen transition, and decides whether the work may be
    /// invoked. A refusal is recorded as a failure.
    pub(crate) fn try_acquire(&mut self, config: &CircuitBreakerConfig) -> bool {
        self.total_calls += 1;

        if self.state == CircuitState::Open {
            let elapsed = self
                .last_failure_time
                .map(|t| t.elapsed())
                .unwrap_or_default();
            if elapsed >= config.open_duration {
                self.transition_to(CircuitState::HalfOpen, config);
            }
        }

        match self.state {
            CircuitState::Open => {
                self.total_failures += 1;
                config.event_listeners.emit(&CircuitBreakerEvent::CallRejected {
                    pattern_name: config.name.clone(),
                    timestamp: Instant::now(),
                });

                #[cfg(feature = "tracing")]
                tracing::warn!(breaker = %config.name, "call rejected, circuit open");

                #[cfg(feature = "metrics")]
                counter!("circuitbreaker_calls_rejected_total", "circuitbreaker" => config.name.clone())
                    .increment(1);

                false
            }
            CircuitState::Closed | CircuitState::HalfOpen => {
                config.event_listeners.emit(&CircuitBreakerEvent::CallPermitted {
                    pattern_name: config.name.clone(),
                    timestamp: Instant::now(),
                    state: self.state,
                });
                true
            }
        }
    }

    pub(crate) fn record_success(&mut self, config: &CircuitBreakerConfig) {
        self.total_successes += 1;
        self.consecutive_successes += 1;
        self.consecutive_failures = 0;

        config.event_listeners.emit(&CircuitBreakerEvent::SuccessRecorded {
            pattern_name: config.name.clone(),
            timestamp: Instant::now(),
            state: self.state,
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(
            breaker = %config.name,
            streak = self.consecutive_successes,
            "call succeeded"
        );

        #[cfg(feature = "metrics")]
        counter!("circuitbreaker_calls_total", "circuitbreaker" => config.name.clone(), "outcome" => "success")
            .increment(1);

        if self.state == CircuitState::HalfOpen
            && self.consecutive_successes >= HALF_OPEN_SUCCESSES_TO_CLOSE
        {
            self.transition_to(CircuitState::Closed, config);
        }
    }

    pub(crate) fn record_failure(&mut self, config: &CircuitBreakerConfig) {
        self.total_failures += 1;
        self.consecutive_failures += 1;
        self.consecutive_successes = 0;
        self.last_failure_time = Some(Instant::now());

        config.event_listeners.emit(&CircuitBreakerEvent::FailureRecorded {
            pattern_name: config.name.clone(),
            timestamp: Instant::now(),
            state: self.state,
        });

        #[cfg(feature = "tracing")]
        tracing::warn!(
            breaker = %config.name,
            streak = self.consecutive_failures,
            threshold = config.failure_threshold,
            "call failed"
        );

        #[cfg(feature = "metrics")]
        counter!("circuitbreaker_calls_total", "circuitbreaker" => config.name.clone(), "outcome" => "failure")
            .increment(1);

        match self.state {
            CircuitState::HalfOpen => self.transition_to(CircuitState::Open, config),
            CircuitState::Closed if self.consecutive_failures >= config.failure_threshold => {
                self.transition_to(CircuitState::Open, config)
            }
            // A straggler failure recorded while already open extends the
            // open window via last_failure_time.
            _ => {}
        }
    }

    /// Forces the circuit closed and clears the consecutive counters and the
    /// failure timestamp. Cumulative totals are untouched.
    pub(crate) fn reset(&mut self, config: &CircuitBreakerConfig) {
        #[cfg(feature = "tracing")]
        tracing::info!(breaker = %config.name, "manual reset");

        self.transition_to(CircuitState::Closed, config);
        self.consecutive_failures = 0;
        self.consecutive_successes = 0;
        self.last_failure_time = None;
    }

    pub(crate) fn stats(&self, config: &CircuitBreakerConfig) -> CircuitStats {
        let success_rate = if self.total_calls > 0 {
            self.total_successes as f64 / self.total_calls as f64 * 100.0
        } else {
            0.0
        };

        CircuitStats {
            name: config.name.clone(),
            state: self.state,
            total_calls: self.total_calls,
            total_successes: self.total_successes,
            total_failures: self.total_failures,
            success_rate,
            consecutive_failures: self.consecutive_failures,
            failure_threshold: config.failure_threshold,
        }
    }

    fn transition_to(&mut self, state: CircuitState, config: &CircuitBreakerConfig) {
        if self.state == state {
            return;
        }

        let from_state = self.state;
        config.event_listeners.emit(&CircuitBreakerEvent::StateTransition {
            pattern_name: config.name.clone(),
            timestamp: Instant::now(),
            from_state,
            to_state: state,
        });

        #[cfg(feature = "tracing")]
        tracing::info!(
            breaker = %config.name,
            from = from_state.as_str(),
            to = state.as_str(),
            "circuit state transition"
        );

        #[cfg(feature = "metrics")]
        {
            counter!(
                "circuitbreaker_transitions_total",
                "circuitbreaker" => config.name.clone(),
                "from" => from_state.as_str(),
                "to" => state.as_str()
            )
            .increment(1);

            gauge!("circuitbreaker_state", "circuitbreaker" => config.name.clone())
                .set(state as u8 as f64);
        }

        self.state = state;
        self.state_atomic.store(state as u8, Ordering::Release);

        match state {
            // Probe window starts with a clean success streak.
            CircuitState::HalfOpen => self.consecutive_successes = 0,
            // Recovery clears the failure streak.
            CircuitState::Closed => self.consecutive_failures = 0,
            CircuitState::Open => {}
        }
    }
}
