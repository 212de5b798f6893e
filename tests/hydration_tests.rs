// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the hydration client.
//!
//! These tests drive the client through a counting mock transport and check the
//! request it builds, the caching rules and the error paths.

mod common;

use chrono::Utc;
use common::{envelope, init_tracing, populated_config, test_options, MockConfig, MockTransport};
use hydracfg::domain::ConfigError;
use hydracfg::ports::{TransportResponse, JSON_CONTENT_TYPE};
use hydracfg::service::{HydrationClient, API_KEY_HEADER};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_LIFETIME: Duration = Duration::from_secs(300);

fn client_over(
    transport: &Arc<MockTransport>,
    lifetime: Duration,
) -> HydrationClient<MockConfig> {
    init_tracing();
    HydrationClient::builder()
        .options(test_options("https://test.com", lifetime))
        .shared_transport(transport.clone())
        .build()
        .unwrap()
}

#[test]
fn test_schema_lists_every_leaf() {
    let transport = Arc::new(MockTransport::ok(&MockConfig::default()));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    assert_eq!(
        client.schema().to_wire(),
        vec![
            "TimeToLive",
            "ApiVersion",
            "Child.Value1",
            "Child.Value2",
            "Child.Child2.Value1",
            "Child.Child2.Value2",
            "Child1.Value1",
            "Child1.Value2",
        ]
    );
}

#[test]
fn test_request_carries_key_version_and_schema() {
    let transport = Arc::new(MockTransport::ok(&MockConfig::default()));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    client.hydrate().unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.uri, "https://test.com");
    assert_eq!(request.header(API_KEY_HEADER), Some("rpri_testkey"));
    assert_eq!(request.header("content-type"), Some(JSON_CONTENT_TYPE));

    let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["Version"], "1.0.0.0");
    let schema: Vec<String> = serde_json::from_value(body["Schema"].clone()).unwrap();
    assert_eq!(schema, client.schema().to_wire());
}

#[test]
fn test_fresh_cache_sends_one_request() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    let first = client.hydrate().unwrap().unwrap();
    client.hydrate().unwrap();
    let third = client.hydrate().unwrap().unwrap();

    assert_eq!(transport.count(), 1);
    assert_eq!(*first, populated_config());
    assert!(Arc::ptr_eq(&first, &third));
}

#[test]
fn test_zero_lifetime_sends_every_time() {
    let transport = Arc::new(MockTransport::ok(&MockConfig::default()));
    let client = client_over(&transport, Duration::ZERO);

    client.hydrate().unwrap();
    client.hydrate().unwrap();
    client.hydrate().unwrap();

    assert_eq!(transport.count(), 3);
}

#[test]
fn test_elapsed_lifetime_fetches_again() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = client_over(&transport, Duration::from_millis(100));

    client.hydrate().unwrap();
    client.hydrate().unwrap();
    assert_eq!(transport.count(), 1);

    std::thread::sleep(Duration::from_millis(150));
    assert!(!client.is_fresh());
    client.hydrate().unwrap();
    assert_eq!(transport.count(), 2);
}

#[tokio::test]
async fn test_async_elapsed_lifetime_fetches_again() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = client_over(&transport, Duration::from_millis(100));

    client.hydrate_async().await.unwrap();
    client.hydrate_async().await.unwrap();
    assert_eq!(transport.count(), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    client.hydrate_async().await.unwrap();
    assert_eq!(transport.count(), 2);
}

#[test]
fn test_expiry_follows_client_lifetime() {
    let transport = Arc::new(MockTransport::ok(&MockConfig {
        time_to_live: 5,
        ..MockConfig::default()
    }));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    assert!(client.expiry().is_none());
    let before = Utc::now();
    client.hydrate().unwrap();
    let expiry = client.expiry().unwrap();

    let lifetime = expiry - before;
    assert!(lifetime >= chrono::Duration::seconds(290));
    assert!(lifetime <= chrono::Duration::seconds(310));
}

#[test]
fn test_null_data_returns_none_and_keeps_cache_empty() {
    let transport = Arc::new(MockTransport::new(TransportResponse::new(
        200,
        r#"{"Data":null}"#,
    )));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    assert!(client.hydrate().unwrap().is_none());
    assert!(client.expiry().is_none());

    // Nothing was cached, so the next call asks again
    assert!(client.hydrate().unwrap().is_none());
    assert_eq!(transport.count(), 2);
}

#[test]
fn test_null_data_after_success_returns_previous_value() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = client_over(&transport, Duration::ZERO);

    client.hydrate().unwrap();
    let expiry = client.expiry();

    transport.set_response(TransportResponse::new(200, r#"{"Data":null}"#));
    let value = client.hydrate().unwrap().unwrap();

    assert_eq!(*value, populated_config());
    assert_eq!(client.expiry(), expiry);
}

#[test]
fn test_missing_data_member_is_treated_as_null() {
    let transport = Arc::new(MockTransport::new(TransportResponse::new(200, "{}")));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    assert!(client.hydrate().unwrap().is_none());
}

#[test]
fn test_member_names_match_ignoring_case() {
    let body = r#"{"data":{"timetolive":60,"APIVERSION":"9","child1":{"value1":"a","VALUE2":"b"}}}"#;
    let transport = Arc::new(MockTransport::new(TransportResponse::new(200, body)));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    let config = client.hydrate().unwrap().unwrap();
    assert_eq!(config.time_to_live, 60);
    assert_eq!(config.api_version.as_deref(), Some("9"));
    let child1 = config.child1.as_ref().unwrap();
    assert_eq!(child1.value1, "a");
    assert_eq!(child1.value2, "b");
    assert!(config.child.is_none());
}

#[test]
fn test_error_status_fails_without_caching() {
    let transport = Arc::new(MockTransport::new(
        TransportResponse::new(503, "maintenance").with_reason("Service Unavailable"),
    ));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    match client.hydrate() {
        Err(ConfigError::HydrationTransport { status, reason }) => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service Unavailable");
        }
        other => panic!("expected transport status error, got {:?}", other),
    }
    assert!(client.expiry().is_none());
    assert!(client.cached().is_none());
}

#[test]
fn test_error_after_success_keeps_previous_entry() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = client_over(&transport, Duration::ZERO);

    client.hydrate().unwrap();
    let expiry = client.expiry();

    transport.set_response(TransportResponse::new(500, ""));
    assert!(client.hydrate().is_err());
    assert_eq!(client.expiry(), expiry);
    assert_eq!(*client.cached().unwrap(), populated_config());
}

#[test]
fn test_success_after_error_updates_cache() {
    let transport = Arc::new(MockTransport::new(TransportResponse::new(500, "down")));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    assert!(matches!(
        client.hydrate(),
        Err(ConfigError::HydrationTransport { status: 500, .. })
    ));
    assert!(client.expiry().is_none());

    transport.set_response(TransportResponse::new(200, envelope(&populated_config())));
    let value = client.hydrate().unwrap().unwrap();

    assert_eq!(*value, populated_config());
    assert!(client.expiry().is_some());
    assert!(client.is_fresh());
    assert_eq!(transport.count(), 2);
}

#[test]
fn test_malformed_body_is_parse_error() {
    let transport = Arc::new(MockTransport::new(TransportResponse::new(200, "not json")));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    assert!(matches!(
        client.hydrate(),
        Err(ConfigError::HydrationParse { .. })
    ));
}

#[test]
fn test_mistyped_data_is_parse_error() {
    let body = r#"{"Data":{"TimeToLive":"soon"}}"#;
    let transport = Arc::new(MockTransport::new(TransportResponse::new(200, body)));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    assert!(matches!(
        client.hydrate(),
        Err(ConfigError::HydrationParse { .. })
    ));
    assert!(client.expiry().is_none());
}

#[test]
fn test_blank_settings_fail_before_any_request() {
    let transport = Arc::new(MockTransport::ok(&MockConfig::default()));

    let missing_key = HydrationClient::<MockConfig>::builder()
        .uri("https://test.com")
        .shared_transport(transport.clone())
        .build();
    assert!(missing_key.unwrap_err().is_configuration_error());

    let missing_uri = HydrationClient::<MockConfig>::builder()
        .api_key("rpri_testkey")
        .shared_transport(transport.clone())
        .build();
    assert!(missing_uri.unwrap_err().is_configuration_error());

    assert_eq!(transport.count(), 0);
}

#[tokio::test]
async fn test_async_fresh_cache_sends_one_request() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    client.hydrate_async().await.unwrap();
    client.hydrate_async().await.unwrap();
    client.hydrate_async().await.unwrap();

    assert_eq!(transport.count(), 1);
}

#[tokio::test]
async fn test_async_zero_lifetime_sends_every_time() {
    let transport = Arc::new(MockTransport::ok(&MockConfig::default()));
    let client = client_over(&transport, Duration::ZERO);

    for _ in 0..3 {
        client.hydrate_async().await.unwrap();
    }

    assert_eq!(transport.count(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_callers_see_whole_entries() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = Arc::new(client_over(&transport, DEFAULT_LIFETIME));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move { client.hydrate_async().await }));
    }

    for handle in handles {
        let value = handle.await.unwrap().unwrap().unwrap();
        assert_eq!(*value, populated_config());
    }

    // Without single-flight every caller that saw an empty cache fetched
    let count = transport.count();
    assert!((1..=8).contains(&count));
    assert!(client.is_fresh());
}

#[test]
fn test_sync_and_async_share_the_cache() {
    let transport = Arc::new(MockTransport::ok(&populated_config()));
    let client = client_over(&transport, DEFAULT_LIFETIME);

    client.hydrate().unwrap();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let value = runtime.block_on(client.hydrate_async()).unwrap().unwrap();

    assert_eq!(*value, populated_config());
    assert_eq!(transport.count(), 1);
}
