//! End-to-end tests with Zenoh pub/sub.
//!
//! These tests verify that `points` events can be published and received
//! through Zenoh.
//!
//! Note: Zenoh requires multi-thread tokio runtime.
//! Each test uses a unique key prefix to avoid interference.

use std::time::Duration;

use livechart_common::{Format, KeyExprBuilder, Label, UpdateMessage, decode_update, publish};

/// Generate a unique test prefix to avoid test interference.
fn unique_prefix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("test_{}", nanos)
}

fn sample_update() -> UpdateMessage {
    UpdateMessage::new(vec![Label::Timestamp(1000.0), Label::Timestamp(2000.0)])
        .with_series("CPU", [Some(10.5), None])
}

/// Publish an update and receive it on the points wildcard.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zenoh_points_pubsub() {
    let keys = KeyExprBuilder::with_prefix(unique_prefix());

    let session = zenoh::open(zenoh::Config::default())
        .await
        .expect("Failed to open Zenoh session");

    let subscriber = session
        .declare_subscriber(keys.points_wildcard())
        .await
        .expect("Failed to create subscriber");

    // Give subscriber time to set up
    tokio::time::sleep(Duration::from_millis(100)).await;

    let msg = sample_update();
    publish(&session, &keys.points_key("status"), &msg, Format::Json)
        .await
        .expect("Failed to publish");

    let received = tokio::time::timeout(Duration::from_secs(5), subscriber.recv_async())
        .await
        .expect("Timeout waiting for message")
        .expect("Failed to receive message");

    let parsed = keys
        .parse(received.key_expr().as_str())
        .expect("Unexpected key");
    assert_eq!(parsed.chart, "status");
    assert_eq!(parsed.event, "points");

    let payload = received.payload().to_bytes();
    let decoded = decode_update(&payload).expect("Failed to decode");
    assert_eq!(decoded, msg);

    drop(subscriber);
    session.close().await.expect("Failed to close session");
}

/// CBOR payloads are auto-detected on the receiving side.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zenoh_cbor_encoding() {
    let keys = KeyExprBuilder::with_prefix(unique_prefix());

    let session = zenoh::open(zenoh::Config::default())
        .await
        .expect("Failed to open Zenoh session");

    let subscriber = session
        .declare_subscriber(keys.points_wildcard())
        .await
        .expect("Failed to create subscriber");

    tokio::time::sleep(Duration::from_millis(100)).await;

    let msg = sample_update();
    publish(&session, &keys.points_key("status"), &msg, Format::Cbor)
        .await
        .expect("Failed to publish");

    let received = tokio::time::timeout(Duration::from_secs(5), subscriber.recv_async())
        .await
        .expect("Timeout")
        .expect("Failed to receive");

    let payload = received.payload().to_bytes();
    let decoded = decode_update(&payload).expect("Failed to auto-decode CBOR");
    assert_eq!(decoded.points["CPU"], vec![Some(10.5), None]);

    drop(subscriber);
    session.close().await.expect("Failed to close session");
}

/// Updates for several charts arrive on one wildcard subscriber.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_zenoh_multiple_charts() {
    let keys = KeyExprBuilder::with_prefix(unique_prefix());

    let session = zenoh::open(zenoh::Config::default())
        .await
        .expect("Failed to open session");

    let subscriber = session
        .declare_subscriber(keys.points_wildcard())
        .await
        .expect("Failed to create subscriber");

    tokio::time::sleep(Duration::from_millis(100)).await;

    let charts = ["chart1", "chart2", "chart3"];
    for chart in &charts {
        publish(&session, &keys.points_key(chart), &sample_update(), Format::Json)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let mut received_charts = Vec::new();
    for _ in 0..3 {
        match tokio::time::timeout(Duration::from_secs(5), subscriber.recv_async()).await {
            Ok(Ok(sample)) => {
                let key = sample.key_expr().as_str().to_string();
                let parsed = keys.parse(&key).expect("Unexpected key");
                received_charts.push(parsed.chart.to_string());
            }
            Ok(Err(e)) => panic!("Receive error: {}", e),
            Err(_) => break,
        }
    }

    received_charts.sort();
    assert_eq!(received_charts, vec!["chart1", "chart2", "chart3"]);

    drop(subscriber);
    session.close().await.expect("Failed to close session");
}
