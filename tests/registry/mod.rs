//! Registry and context tests.
//!
//! Test organization:
//! - idempotence.rs: get-or-create is first-writer-wins
//! - context.rs: the shared context handle and pattern composition
