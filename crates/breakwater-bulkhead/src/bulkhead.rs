//! Bulkhead implementation.
//!
//! A bulkhead owns a fixed-size set of execution slots guarded by a
//! [`tokio::sync::Semaphore`]. Work is spawned onto the runtime and the
//! caller waits for it under a deadline. Timed-out work is *not* cancelled:
//! the task keeps its slot until it finishes on its own schedule, so a
//! timed-out slot may still be occupied afterwards. Only the caller's wait is
//! abandoned.

use crate::config::BulkheadConfig;
use crate::error::BulkheadError;
use crate::events::BulkheadEvent;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, OwnedSemaphorePermit, Semaphore};

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

/// Point-in-time snapshot of a bulkhead's counters.
///
/// Counters are monotonic; `active_count` never exceeds `capacity`. Intended
/// to be surfaced verbatim by the surrounding application's monitoring
/// endpoint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BulkheadStats {
    /// Name of the bulkhead.
    pub name: String,
    /// Configured number of execution slots.
    pub capacity: usize,
    /// Number of currently occupied slots.
    pub active_count: usize,
    /// Total submissions, including rejected ones.
    pub total_requests: u64,
    /// Submissions that timed out, failed, or were refused at shutdown.
    pub rejected_requests: u64,
    /// `(total - rejected) / total * 100`; 100.0 when no requests yet.
    pub success_rate: f64,
}

struct Shared {
    config: BulkheadConfig,
    semaphore: Arc<Semaphore>,
    /// Occupied slots; watch so `shutdown(wait = true)` can park on drain.
    active: watch::Sender<usize>,
    total_requests: AtomicU64,
    rejected_requests: AtomicU64,
    accepting: AtomicBool,
}

impl Shared {
    fn emit(&self, event: BulkheadEvent) {
        self.config.event_listeners.emit(&event);
    }

    fn record_rejection(&self) {
        self.rejected_requests.fetch_add(1, Ordering::Relaxed);
        self.emit(BulkheadEvent::CallRejected {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            capacity: self.config.capacity,
        });

        #[cfg(feature = "metrics")]
        counter!("bulkhead_calls_rejected_total", "bulkhead" => self.config.name.clone())
            .increment(1);
    }
}

/// Occupied execution slot. Dropping it releases the slot on every exit path,
/// including a panicking work item.
struct SlotGuard {
    shared: Arc<Shared>,
    _permit: OwnedSemaphorePermit,
}

impl SlotGuard {
    fn acquire(shared: Arc<Shared>, permit: OwnedSemaphorePermit) -> (Self, usize) {
        let mut now_active = 0;
        shared.active.send_modify(|n| {
            *n += 1;
            now_active = *n;
        });

        #[cfg(feature = "metrics")]
        gauge!("bulkhead_concurrent_calls", "bulkhead" => shared.config.name.clone())
            .set(now_active as f64);

        (
            Self {
                shared,
                _permit: permit,
            },
            now_active,
        )
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut now_active = 0;
        self.shared.active.send_modify(|n| {
            *n -= 1;
            now_active = *n;
        });

        #[cfg(feature = "metrics")]
        gauge!("bulkhead_concurrent_calls", "bulkhead" => self.shared.config.name.clone())
            .set(now_active as f64);
        #[cfg(not(feature = "metrics"))]
        let _ = now_active;
    }
}

/// Concurrency isolation for one logical service.
///
/// Cloning is cheap and every clone shares the same slots and counters.
#[derive(Clone)]
pub struct Bulkhead {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Bulkhead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bulkhead")
            .field("name", &self.shared.config.name)
            .finish_non_exhaustive()
    }
}

impl Bulkhead {
    /// Creates a bulkhead from its configuration.
    pub fn new(config: BulkheadConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.capacity));

        #[cfg(feature = "tracing")]
        tracing::info!(
            bulkhead = %config.name,
            capacity = config.capacity,
            timeout = ?config.timeout,
            "bulkhead created"
        );

        Self {
            shared: Arc::new(Shared {
                semaphore,
                active: watch::Sender::new(0),
                total_requests: AtomicU64::new(0),
                rejected_requests: AtomicU64::new(0),
                accepting: AtomicBool::new(true),
                config,
            }),
        }
    }

    /// Name of this bulkhead.
    pub fn name(&self) -> &str {
        &self.shared.config.name
    }

    /// Configured number of execution slots.
    pub fn capacity(&self) -> usize {
        self.shared.config.capacity
    }

    /// Configured per-call deadline.
    pub fn timeout(&self) -> Duration {
        self.shared.config.timeout
    }

    /// Runs `work` in one of this bulkhead's execution slots.
    ///
    /// At most `capacity` work items run at once; submissions above that
    /// queue for a free slot. The queue is unbounded, the enforced bound is
    /// running slots. The caller waits at most `timeout` for the result,
    /// measured from submission, so queue time counts against the deadline.
    ///
    /// On timeout the work is left running (see the module docs) and the call
    /// fails with [`BulkheadError::Timeout`]. An error returned by the work
    /// is counted as a rejection and forwarded unchanged in
    /// [`BulkheadError::Inner`].
    pub async fn execute<F, Fut, T, E>(&self, work: F) -> Result<T, BulkheadError<E>>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        shared.total_requests.fetch_add(1, Ordering::Relaxed);

        if !shared.accepting.load(Ordering::Acquire) {
            shared.record_rejection();
            return Err(BulkheadError::ShutDown {
                name: shared.config.name.clone(),
            });
        }

        let start = Instant::now();
        let worker = Arc::clone(&shared);
        let handle = tokio::spawn(async move {
            let permit = match Arc::clone(&worker.semaphore).acquire_owned().await {
                Ok(permit) => permit,
                // Shut down while queued for a slot.
                Err(_) => return None,
            };
            let (guard, now_active) = SlotGuard::acquire(Arc::clone(&worker), permit);

            worker.emit(BulkheadEvent::CallPermitted {
                pattern_name: worker.config.name.clone(),
                timestamp: Instant::now(),
                concurrent_calls: now_active,
            });

            #[cfg(feature = "tracing")]
            tracing::debug!(
                bulkhead = %worker.config.name,
                active = now_active,
                capacity = worker.config.capacity,
                "executing work"
            );

            #[cfg(feature = "metrics")]
            counter!("bulkhead_calls_permitted_total", "bulkhead" => worker.config.name.clone())
                .increment(1);

            let result = work().await;
            drop(guard);
            Some(result)
        });

        match tokio::time::timeout(shared.config.timeout, handle).await {
            Ok(Ok(Some(Ok(value)))) => {
                shared.emit(BulkheadEvent::CallFinished {
                    pattern_name: shared.config.name.clone(),
                    timestamp: Instant::now(),
                    duration: start.elapsed(),
                });

                #[cfg(feature = "metrics")]
                counter!("bulkhead_calls_finished_total", "bulkhead" => shared.config.name.clone())
                    .increment(1);

                Ok(value)
            }
            Ok(Ok(Some(Err(error)))) => {
                shared.rejected_requests.fetch_add(1, Ordering::Relaxed);
                shared.emit(BulkheadEvent::CallFailed {
                    pattern_name: shared.config.name.clone(),
                    timestamp: Instant::now(),
                    duration: start.elapsed(),
                });

                #[cfg(feature = "tracing")]
                tracing::warn!(bulkhead = %shared.config.name, "work failed");

                #[cfg(feature = "metrics")]
                counter!("bulkhead_calls_failed_total", "bulkhead" => shared.config.name.clone())
                    .increment(1);

                Err(BulkheadError::Inner(error))
            }
            Ok(Ok(None)) => {
                shared.record_rejection();
                Err(BulkheadError::ShutDown {
                    name: shared.config.name.clone(),
                })
            }
            Ok(Err(join_error)) => {
                if join_error.is_panic() {
                    std::panic::resume_unwind(join_error.into_panic());
                }
                // Runtime is shutting down.
                shared.record_rejection();
                Err(BulkheadError::ShutDown {
                    name: shared.config.name.clone(),
                })
            }
            Err(_) => {
                shared.record_rejection();

                #[cfg(feature = "tracing")]
                tracing::warn!(
                    bulkhead = %shared.config.name,
                    timeout = ?shared.config.timeout,
                    "caller deadline elapsed, abandoning wait"
                );

                Err(BulkheadError::Timeout {
                    name: shared.config.name.clone(),
                    timeout: shared.config.timeout,
                })
            }
        }
    }

    /// Returns a snapshot of this bulkhead's counters.
    ///
    /// Read-only and safe to call concurrently with [`execute`](Self::execute).
    pub fn stats(&self) -> BulkheadStats {
        let total = self.shared.total_requests.load(Ordering::Relaxed);
        let rejected = self.shared.rejected_requests.load(Ordering::Relaxed);
        let success_rate = if total > 0 {
            (total - rejected) as f64 / total as f64 * 100.0
        } else {
            100.0
        };

        BulkheadStats {
            name: self.shared.config.name.clone(),
            capacity: self.shared.config.capacity,
            active_count: *self.shared.active.borrow(),
            total_requests: total,
            rejected_requests: rejected,
            success_rate,
        }
    }

    /// Stops accepting new submissions.
    ///
    /// Submissions still queued for a slot fail with
    /// [`BulkheadError::ShutDown`]; in-flight work runs to completion. With
    /// `wait = true` this blocks until every occupied slot has drained.
    pub async fn shutdown(&self, wait: bool) {
        self.shared.accepting.store(false, Ordering::Release);
        self.shared.semaphore.close();

        #[cfg(feature = "tracing")]
        tracing::info!(bulkhead = %self.shared.config.name, wait, "shutting down bulkhead");

        if wait {
            let mut active = self.shared.active.subscribe();
            // The sender lives as long as `self`, so this cannot fail.
            let _ = active.wait_for(|&n| n == 0).await;
        }
    }
}
