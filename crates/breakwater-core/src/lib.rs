//! Core infrastructure for breakwater.
//!
//! This crate provides the pieces shared by every breakwater pattern:
//! - Event system for observability
//! - [`ResilienceError`], the error envelope used when composing patterns

pub mod error;
pub mod events;

pub use error::{RegistryError, ResilienceError};
pub use events::{EventListener, EventListeners, ResilienceEvent};
