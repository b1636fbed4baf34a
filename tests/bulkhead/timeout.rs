use breakwater_bulkhead::{Bulkhead, BulkheadConfig, BulkheadError};
use std::time::Duration;
use tokio::time::sleep;

/// The reference deadline scenario, scaled from seconds to milliseconds:
/// a 300ms deadline fed tasks of {100, 250, 500, 1000}ms yields exactly two
/// successes and two timeouts.
#[tokio::test(flavor = "multi_thread")]
async fn two_of_four_tasks_exceed_the_deadline() {
    let bulkhead = Bulkhead::new(
        BulkheadConfig::builder()
            .name("deadline")
            .capacity(4)
            .timeout(Duration::from_millis(300))
            .build(),
    );

    let mut timeouts = 0;
    let mut successes = 0;
    for task_ms in [100u64, 250, 500, 1000] {
        let result = bulkhead
            .execute(move || async move {
                sleep(Duration::from_millis(task_ms)).await;
                Ok::<_, &str>(task_ms)
            })
            .await;
        match result {
            Ok(_) => successes += 1,
            Err(BulkheadError::Timeout { .. }) => timeouts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 2);
    assert_eq!(timeouts, 2);

    let stats = bulkhead.stats();
    assert_eq!(stats.total_requests, 4);
    assert_eq!(stats.rejected_requests, 2);
    assert_eq!(stats.success_rate, 50.0);
}

/// The timeout error names the bulkhead and its configured deadline.
#[tokio::test]
async fn timeout_error_names_the_bulkhead() {
    let bulkhead = Bulkhead::new(
        BulkheadConfig::builder()
            .name("orders")
            .capacity(1)
            .timeout(Duration::from_millis(50))
            .build(),
    );

    let err = bulkhead
        .execute(|| async {
            sleep(Duration::from_millis(500)).await;
            Ok::<_, &str>(())
        })
        .await
        .unwrap_err();

    match err {
        BulkheadError::Timeout { name, timeout } => {
            assert_eq!(name, "orders");
            assert_eq!(timeout, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {other}"),
    }
}

/// Time spent queued for a slot counts against the caller's deadline.
#[tokio::test(flavor = "multi_thread")]
async fn queue_wait_counts_against_the_deadline() {
    let bulkhead = Bulkhead::new(
        BulkheadConfig::builder()
            .name("queued")
            .capacity(1)
            .timeout(Duration::from_millis(100))
            .build(),
    );

    // Occupy the single slot well past the second caller's deadline. The
    // occupant blows its own deadline too, but its work keeps the slot.
    let occupant = {
        let bulkhead = bulkhead.clone();
        tokio::spawn(async move {
            bulkhead
                .execute(|| async {
                    sleep(Duration::from_millis(400)).await;
                    Ok::<_, &str>(())
                })
                .await
        })
    };
    sleep(Duration::from_millis(20)).await;

    // Fast work, but it never gets a slot in time.
    let err = bulkhead
        .execute(|| async { Ok::<_, &str>(()) })
        .await
        .unwrap_err();
    assert!(err.is_timeout());

    assert!(occupant.await.unwrap().unwrap_err().is_timeout());
}

/// A timed-out work item is abandoned, not cancelled: it still runs to
/// completion and only then releases its slot.
#[tokio::test(flavor = "multi_thread")]
async fn abandoned_work_keeps_its_slot_until_done() {
    let bulkhead = Bulkhead::new(
        BulkheadConfig::builder()
            .name("cooperative")
            .capacity(1)
            .timeout(Duration::from_millis(50))
            .build(),
    );

    let err = bulkhead
        .execute(|| async {
            sleep(Duration::from_millis(300)).await;
            Ok::<_, &str>(())
        })
        .await
        .unwrap_err();
    assert!(err.is_timeout());

    // The caller gave up but the slot is still occupied.
    assert_eq!(bulkhead.stats().active_count, 1);

    sleep(Duration::from_millis(350)).await;
    assert_eq!(bulkhead.stats().active_count, 0);
}
