//! End-to-end poll cycles against a loopback validator

use crate::server::{Action, TestValidator};
use price_monitor::feed::{Feed, FeedRegistry};
use price_monitor::monitor::{CycleOutcome, PriceMonitor};
use price_monitor::ws::{Connection, RetryPolicy, TransportMode, ValidatorEndpoints, WsTransport};
use std::time::Duration;

const ADA_RESPONSE: &str = r#"{"error": null, "data": [{"ADA-USD": [1.00, 1.03]}]}"#;

async fn validator(poll_reply: &'static str) -> TestValidator {
    TestValidator::start(move |path, _| {
        if path.ends_with("/price_monitor/") {
            Action::Reply(poll_reply.to_string())
        } else {
            Action::Reply("{}".to_string())
        }
    })
    .await
}

fn monitor(base_uri: &str, ada_threshold: f64) -> PriceMonitor<WsTransport> {
    let registry = FeedRegistry::new(vec![Feed::new("ADA-USD", ada_threshold)], 2.0).unwrap();
    let connection = Connection::new(
        WsTransport::new(TransportMode::Insecure).unwrap(),
        ValidatorEndpoints::from_base(base_uri),
        RetryPolicy::immediate(),
    );
    PriceMonitor::new(connection, registry).polling_interval(Duration::from_millis(50))
}

#[tokio::test]
async fn test_cycle_requests_update_over_threshold() {
    let server = validator(ADA_RESPONSE).await;

    let outcome = monitor(&server.base_uri, 1.0).run_cycle().await.unwrap();
    assert_eq!(outcome.requested_feeds(), ["ADA-USD".to_string()]);

    let received = server.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].payload, r#"{"feed_ids":["ADA-USD"]}"#);
    assert_eq!(received[1].path, "/ws/validate/");
    assert_eq!(received[1].payload, r#"{"feeds":["ADA-USD"]}"#);
}

#[tokio::test]
async fn test_cycle_under_threshold_sends_nothing_more() {
    let server = validator(ADA_RESPONSE).await;

    let outcome = monitor(&server.base_uri, 5.0).run_cycle().await.unwrap();
    assert!(matches!(outcome, CycleOutcome::NothingToRequest));
    assert_eq!(server.received().len(), 1);
}

#[tokio::test]
async fn test_cycle_service_error() {
    let server = validator(r#"{"error": "server busy", "data": []}"#).await;

    let outcome = monitor(&server.base_uri, 1.0).run_cycle().await.unwrap();
    assert!(matches!(outcome, CycleOutcome::ServiceError(ref e) if e == "server busy"));
    assert_eq!(server.received().len(), 1);
}

#[tokio::test]
async fn test_run_until_shutdown() {
    let server = validator(r#"{"error": null, "data": [{"ADA-USD": [1.0, 1.0]}]}"#).await;
    let monitor = monitor(&server.base_uri, 1.0);

    tokio::time::timeout(
        Duration::from_secs(5),
        monitor.run(tokio::time::sleep(Duration::from_millis(120))),
    )
    .await
    .expect("monitor did not stop")
    .unwrap();

    let polls = server
        .received()
        .iter()
        .filter(|r| r.path == "/ws/price_monitor/")
        .count();
    assert!(polls >= 1);
}
