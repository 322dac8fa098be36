//! Proxy selection against real proxy environment variables.
//!
//! Kept to a single test: it mutates process-wide environment and the proxy
//! configuration is read when clients are built.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use hookcast::delivery::DeliveryClient;
use hookcast_protocol::Event;
use serde_json::json;

use common::spawn_collector;

fn event() -> Event {
    Event {
        source_app: "demo".to_string(),
        session_id: "s-1".to_string(),
        hook_event_type: "Notification".to_string(),
        payload: json!({"message": "hello"}),
        timestamp: 1,
        chat: None,
        summary: None,
    }
}

#[tokio::test]
async fn loopback_bypasses_proxy_and_remote_hosts_use_it() {
    let proxy = spawn_collector(StatusCode::BAD_GATEWAY).await;
    let collector = spawn_collector(StatusCode::OK).await;

    for key in ["NO_PROXY", "no_proxy", "ALL_PROXY", "all_proxy", "http_proxy"] {
        std::env::remove_var(key);
    }
    std::env::set_var("HTTP_PROXY", format!("http://{}", proxy.addr));

    let client = DeliveryClient::new(Duration::from_secs(5));

    let local = format!("http://127.0.0.1:{}/events", collector.addr.port());
    let delivery = client.send(&local, &event()).await.unwrap();
    assert!(delivery.is_success());
    assert_eq!(collector.received().len(), 1);
    assert!(proxy.received().is_empty());

    let local = format!("http://localhost:{}/events", collector.addr.port());
    let delivery = client.send(&local, &event()).await.unwrap();
    assert!(delivery.is_success());
    assert_eq!(collector.received().len(), 2);
    assert!(proxy.received().is_empty());

    let delivery = client
        .send("http://collector.invalid/events", &event())
        .await
        .unwrap();
    assert_eq!(delivery.status, 502);
    assert!(!delivery.is_success());

    let proxied = proxy.received();
    assert_eq!(proxied.len(), 1);
    assert_eq!(proxied[0].uri.host(), Some("collector.invalid"));
    assert_eq!(collector.received().len(), 2);
}
