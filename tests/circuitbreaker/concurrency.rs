use breakwater_circuitbreaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 20 parallel failing callers against a threshold of 5: the circuit opens
/// exactly once, and no more than `threshold` failures are ever recorded
/// while the circuit is still closed (no lost update lets the streak cross
/// the threshold without tripping).
#[tokio::test(flavor = "multi_thread")]
async fn failure_storm_trips_the_circuit_exactly_once() {
    let threshold = 5;
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let closed_failures = Arc::new(AtomicUsize::new(0));

    let sink = Arc::clone(&transitions);
    let counted = Arc::clone(&closed_failures);
    let breaker = CircuitBreaker::new(
        CircuitBreakerConfig::builder()
            .name("stormy")
            .failure_threshold(threshold)
            .open_duration(Duration::from_secs(60))
            .on_state_transition(move |from, to| {
                sink.lock().unwrap().push((from, to));
            })
            .on_failure(move |state| {
                if state == CircuitState::Closed {
                    counted.fetch_add(1, Ordering::SeqCst);
                }
            })
            .build(),
    );

    let mut handles = vec![];
    for _ in 0..20 {
        let breaker = breaker.clone();
        handles.push(tokio::spawn(async move {
            breaker.call(|| async { Err::<(), _>("down") }).await
        }));
    }
    for result in join_all(handles).await {
        assert!(result.unwrap().is_err());
    }

    assert_eq!(breaker.state(), CircuitState::Open);
    assert_eq!(
        transitions.lock().unwrap().as_slice(),
        &[(CircuitState::Closed, CircuitState::Open)],
        "the circuit must open exactly once"
    );
    assert!(
        closed_failures.load(Ordering::SeqCst) as u32 <= threshold,
        "failure streak overshot the threshold before opening"
    );
}

/// Parallel successful callers share one streak without corrupting totals.
#[tokio::test(flavor = "multi_thread")]
async fn parallel_successes_keep_totals_consistent() {
    let breaker = CircuitBreaker::new(
        CircuitBreakerConfig::builder()
            .name("busy")
            .failure_threshold(3)
            .build(),
    );

    let mut handles = vec![];
    for _ in 0..50 {
        let breaker = breaker.clone();
        handles.push(tokio::spawn(async move {
            breaker.call(|| async { Ok::<_, &str>(()) }).await
        }));
    }
    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    let stats = breaker.stats().await;
    assert_eq!(stats.total_calls, 50);
    assert_eq!(stats.total_successes, 50);
    assert_eq!(stats.total_failures, 0);
    assert_eq!(stats.success_rate, 100.0);
    assert_eq!(breaker.state(), CircuitState::Closed);
}
