//! Circuit breaker behavior tests.
//!
//! Test organization:
//! - thresholds.rs: opening on consecutive failures, streak resets
//! - half_open.rs: lazy probing and recovery/relapse
//! - reset.rs: manual reset semantics
//! - accounting.rs: stats math and the rejection-counting policy
//! - concurrency.rs: no lost updates under parallel callers

mod concurrency;
