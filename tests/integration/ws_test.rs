//! Integration tests for the WebSocket transport and connection

use crate::server::{unused_base_uri, Action, TestValidator};
use price_monitor::ws::{
    Connection, Endpoint, RetryPolicy, Transport, TransportMode, ValidatorEndpoints, WsError,
    WsTransport, USER_AGENT,
};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_transport_round_trip() {
    let server = TestValidator::start(|_, _| Action::Reply(r#"{"error":null,"data":[]}"#.into())).await;
    let endpoints = ValidatorEndpoints::from_base(&server.base_uri);
    let transport = WsTransport::new(TransportMode::Insecure).unwrap();

    let reply = transport
        .send_and_receive(&endpoints.monitor_uri, r#"{"feed_ids":["ADA-USD"]}"#)
        .await
        .unwrap();

    assert_eq!(reply, r#"{"error":null,"data":[]}"#);

    let received = server.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].path, "/ws/price_monitor/");
    assert_eq!(received[0].user_agent.as_deref(), Some(USER_AGENT));
    assert_eq!(received[0].payload, r#"{"feed_ids":["ADA-USD"]}"#);
}

#[tokio::test]
async fn test_clean_close_degrades_to_empty_reply() {
    let server = TestValidator::start(|_, _| Action::CloseNormally).await;
    let transport = WsTransport::new(TransportMode::Insecure).unwrap();
    let connection = Connection::new(
        transport,
        ValidatorEndpoints::from_base(&server.base_uri),
        RetryPolicy::immediate().max_attempts(1),
    );

    let value = connection.exchange(Endpoint::Monitor, "{}").await.unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_raw_text_reply() {
    let server = TestValidator::start(|_, _| Action::Reply("accepted".into())).await;
    let transport = WsTransport::new(TransportMode::Insecure).unwrap();
    let connection = Connection::new(
        transport,
        ValidatorEndpoints::from_base(&server.base_uri),
        RetryPolicy::immediate(),
    );

    let value = connection
        .exchange(Endpoint::UpdateRequest, r#"{"feeds":["ADA-USD"]}"#)
        .await
        .unwrap();
    assert_eq!(value, json!("accepted"));
}

#[tokio::test]
async fn test_refused_update_request_is_not_fatal() {
    let transport = WsTransport::new(TransportMode::Insecure).unwrap();
    let connection = Connection::new(
        transport,
        ValidatorEndpoints::from_base(&unused_base_uri().await),
        RetryPolicy::immediate().max_attempts(1),
    );

    let value = connection
        .exchange(Endpoint::UpdateRequest, r#"{"feeds":["ADA-USD"]}"#)
        .await
        .unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_refused_monitor_is_retried() {
    let transport = WsTransport::new(TransportMode::Insecure).unwrap();
    let connection = Connection::new(
        transport,
        ValidatorEndpoints::from_base(&unused_base_uri().await),
        RetryPolicy::immediate().max_attempts(3),
    );

    let err = connection.exchange(Endpoint::Monitor, "{}").await.unwrap_err();
    assert!(matches!(err, WsError::RetriesExhausted { attempts: 3, .. }));
}

#[tokio::test]
async fn test_unset_base_uri_is_fatal() {
    let transport = WsTransport::new(TransportMode::Secure).unwrap();
    let connection = Connection::new(
        transport,
        ValidatorEndpoints::from_base("None"),
        RetryPolicy::immediate(),
    );

    let err = connection.exchange(Endpoint::Monitor, "{}").await.unwrap_err();
    assert!(matches!(err, WsError::InvalidEndpoint { .. }), "got {err:?}");
}

#[tokio::test(start_paused = true)]
async fn test_silent_server_times_out() {
    let server = TestValidator::start(|_, _| Action::Silent).await;
    let endpoints = ValidatorEndpoints::from_base(&server.base_uri);
    let transport = WsTransport::new(TransportMode::Insecure)
        .unwrap()
        .reply_timeout(Duration::from_secs(5));

    let result = tokio::time::timeout(
        Duration::from_secs(3600),
        transport.send_and_receive(&endpoints.monitor_uri, "{}"),
    )
    .await
    .expect("exchange should give up on a silent server");

    match result {
        Err(WsError::ConnectionDropped { reason, .. }) => {
            assert!(reason.contains("no reply within"), "got {reason}")
        }
        other => panic!("expected a dropped connection, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_silent_monitor_is_retried_until_exhausted() {
    let server = TestValidator::start(|_, _| Action::Silent).await;
    let transport = WsTransport::new(TransportMode::Insecure)
        .unwrap()
        .reply_timeout(Duration::from_secs(5));
    let connection = Connection::new(
        transport,
        ValidatorEndpoints::from_base(&server.base_uri),
        RetryPolicy::immediate().max_attempts(2),
    );

    let err = tokio::time::timeout(
        Duration::from_secs(3600),
        connection.exchange(Endpoint::Monitor, "{}"),
    )
    .await
    .expect("monitor exchange should give up on a silent server")
    .unwrap_err();
    assert!(matches!(err, WsError::RetriesExhausted { attempts: 2, .. }), "got {err:?}");

    let value = tokio::time::timeout(
        Duration::from_secs(3600),
        connection.exchange(Endpoint::UpdateRequest, r#"{"feeds":["ADA-USD"]}"#),
    )
    .await
    .expect("update exchange should give up on a silent server")
    .unwrap();
    assert_eq!(value, json!({}));
}
