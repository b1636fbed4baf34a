use breakwater_bulkhead::{Bulkhead, BulkheadConfig, BulkheadError, BulkheadRegistry};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// shutdown(wait = true) blocks until in-flight work drains.
#[tokio::test(flavor = "multi_thread")]
async fn waiting_shutdown_drains_in_flight_work() {
    let bulkhead = Bulkhead::new(BulkheadConfig::builder().name("draining").capacity(2).build());

    let worker = {
        let bulkhead = bulkhead.clone();
        tokio::spawn(async move {
            bulkhead
                .execute(|| async {
                    sleep(Duration::from_millis(200)).await;
                    Ok::<_, &str>(())
                })
                .await
        })
    };
    sleep(Duration::from_millis(30)).await;
    assert_eq!(bulkhead.stats().active_count, 1);

    let start = Instant::now();
    bulkhead.shutdown(true).await;
    assert!(
        start.elapsed() >= Duration::from_millis(100),
        "shutdown returned before the in-flight call finished"
    );
    assert_eq!(bulkhead.stats().active_count, 0);

    worker.await.unwrap().unwrap();
}

/// shutdown(wait = false) returns promptly while work continues behind it.
#[tokio::test(flavor = "multi_thread")]
async fn prompt_shutdown_does_not_wait() {
    let bulkhead = Bulkhead::new(BulkheadConfig::builder().name("prompt").capacity(1).build());

    let worker = {
        let bulkhead = bulkhead.clone();
        tokio::spawn(async move {
            bulkhead
                .execute(|| async {
                    sleep(Duration::from_millis(300)).await;
                    Ok::<_, &str>("late result")
                })
                .await
        })
    };
    sleep(Duration::from_millis(30)).await;

    let start = Instant::now();
    bulkhead.shutdown(false).await;
    assert!(start.elapsed() < Duration::from_millis(100));

    // The in-flight call still completes normally.
    assert_eq!(worker.await.unwrap().unwrap(), "late result");
}

/// Submissions after shutdown are refused.
#[tokio::test]
async fn submissions_after_shutdown_are_refused() {
    let bulkhead = Bulkhead::new(BulkheadConfig::builder().name("closed").build());
    bulkhead.shutdown(true).await;

    let err = bulkhead
        .execute(|| async { Ok::<_, &str>(()) })
        .await
        .unwrap_err();
    assert!(matches!(err, BulkheadError::ShutDown { .. }));

    let stats = bulkhead.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.rejected_requests, 1);
}

/// A submission still queued for a slot is refused when shutdown lands.
#[tokio::test(flavor = "multi_thread")]
async fn queued_submissions_are_refused_at_shutdown() {
    let bulkhead = Bulkhead::new(
        BulkheadConfig::builder()
            .name("mid-queue")
            .capacity(1)
            .timeout(Duration::from_secs(10))
            .build(),
    );

    let occupant = {
        let bulkhead = bulkhead.clone();
        tokio::spawn(async move {
            bulkhead
                .execute(|| async {
                    sleep(Duration::from_millis(200)).await;
                    Ok::<_, &str>(())
                })
                .await
        })
    };
    sleep(Duration::from_millis(30)).await;

    let queued = {
        let bulkhead = bulkhead.clone();
        tokio::spawn(async move {
            bulkhead.execute(|| async { Ok::<_, &str>(()) }).await
        })
    };
    sleep(Duration::from_millis(30)).await;

    bulkhead.shutdown(false).await;

    let err = queued.await.unwrap().unwrap_err();
    assert!(matches!(err, BulkheadError::ShutDown { .. }));
    occupant.await.unwrap().unwrap();
}

/// Registry-wide shutdown covers every instance.
#[tokio::test]
async fn registry_shutdown_covers_all_bulkheads() {
    let registry = BulkheadRegistry::new();
    let a = registry.create(BulkheadConfig::builder().name("a").build());
    let b = registry.create(BulkheadConfig::builder().name("b").build());

    registry.shutdown_all(true).await;

    assert!(a.execute(|| async { Ok::<_, &str>(()) }).await.is_err());
    assert!(b.execute(|| async { Ok::<_, &str>(()) }).await.is_err());
}
