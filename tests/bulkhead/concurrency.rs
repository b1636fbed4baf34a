use breakwater_bulkhead::{Bulkhead, BulkheadConfig};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// 50 parallel callers against 5 slots: observed concurrency never exceeds
/// capacity and every call eventually completes.
#[tokio::test(flavor = "multi_thread")]
async fn slot_ceiling_holds_under_parallel_load() {
    let capacity = 5;
    let bulkhead = Bulkhead::new(
        BulkheadConfig::builder()
            .name("hammered")
            .capacity(capacity)
            .timeout(Duration::from_secs(30))
            .build(),
    );

    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for _ in 0..50 {
        let bulkhead = bulkhead.clone();
        let in_flight = Arc::clone(&in_flight);
        let peak = Arc::clone(&peak);
        handles.push(tokio::spawn(async move {
            bulkhead
                .execute(move || async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, &str>(())
                })
                .await
        }));
    }

    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    assert!(
        peak.load(Ordering::SeqCst) <= capacity,
        "observed {} concurrent executions with capacity {}",
        peak.load(Ordering::SeqCst),
        capacity
    );

    let stats = bulkhead.stats();
    assert_eq!(stats.total_requests, 50);
    assert_eq!(stats.rejected_requests, 0);
    assert_eq!(stats.active_count, 0);
}

/// The reported active_count never exceeds capacity while under load.
#[tokio::test(flavor = "multi_thread")]
async fn reported_active_count_stays_within_capacity() {
    let bulkhead = Bulkhead::new(
        BulkheadConfig::builder()
            .name("watched")
            .capacity(3)
            .timeout(Duration::from_secs(10))
            .build(),
    );

    let mut handles = vec![];
    for _ in 0..10 {
        let bulkhead = bulkhead.clone();
        handles.push(tokio::spawn(async move {
            bulkhead
                .execute(|| async {
                    sleep(Duration::from_millis(50)).await;
                    Ok::<_, &str>(())
                })
                .await
        }));
    }

    for _ in 0..20 {
        assert!(bulkhead.stats().active_count <= 3);
        sleep(Duration::from_millis(10)).await;
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(bulkhead.stats().active_count, 0);
}
