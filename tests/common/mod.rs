// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

use async_trait::async_trait;
use hydracfg::domain::{ConfigShape, HydrationOptions, Result, Shape};
use hydracfg::ports::{HydrationTransport, TransportRequest, TransportResponse};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

static TRACING: Once = Once::new();

/// Installs a test-friendly tracing subscriber once per test binary.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GrandChild {
    pub value1: String,
    pub value2: String,
}

impl ConfigShape for GrandChild {
    fn shape() -> Shape {
        Shape::of::<Self>().string("Value1").string("Value2")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MockChild {
    pub value1: String,
    pub value2: String,
    pub child2: Option<GrandChild>,
}

impl ConfigShape for MockChild {
    fn shape() -> Shape {
        Shape::of::<Self>()
            .string("Value1")
            .string("Value2")
            .composite::<GrandChild>("Child2")
    }
}

/// Configuration with two levels of nesting and eight leaves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MockConfig {
    pub time_to_live: i64,
    pub api_version: Option<String>,
    pub child: Option<MockChild>,
    pub child1: Option<GrandChild>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            time_to_live: 300,
            api_version: None,
            child: None,
            child1: None,
        }
    }
}

impl ConfigShape for MockConfig {
    fn shape() -> Shape {
        Shape::of::<Self>()
            .integer("TimeToLive")
            .string("ApiVersion")
            .composite::<MockChild>("Child")
            .composite::<GrandChild>("Child1")
    }
}

/// A fully populated `MockConfig`.
#[allow(dead_code)]
pub fn populated_config() -> MockConfig {
    MockConfig {
        time_to_live: 300,
        api_version: Some("123".to_string()),
        child: Some(MockChild {
            value1: "Hello".to_string(),
            value2: "World".to_string(),
            child2: Some(GrandChild {
                value1: "I".to_string(),
                value2: "Am".to_string(),
            }),
        }),
        child1: Some(GrandChild {
            value1: "Ripe".to_string(),
            value2: "Config".to_string(),
        }),
    }
}

/// Wraps a value in the response envelope.
#[allow(dead_code)]
pub fn envelope<T: Serialize>(data: &T) -> String {
    serde_json::json!({ "Data": data }).to_string()
}

/// Options pointing at `uri` with the test key and version.
#[allow(dead_code)]
pub fn test_options(uri: &str, cache_expiry: Duration) -> HydrationOptions {
    HydrationOptions::new(uri, "rpri_testkey")
        .with_version("1.0.0.0")
        .with_cache_expiry(cache_expiry)
}

/// Transport that answers every request with a fixed response and counts calls.
pub struct MockTransport {
    response: Mutex<TransportResponse>,
    count: AtomicUsize,
    last: Mutex<Option<TransportRequest>>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn new(response: TransportResponse) -> Self {
        Self {
            response: Mutex::new(response),
            count: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    /// Responds 200 with `data` in the envelope.
    pub fn ok<T: Serialize>(data: &T) -> Self {
        Self::new(TransportResponse::new(200, envelope(data)))
    }

    pub fn set_response(&self, response: TransportResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl HydrationTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.count.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request);
        Ok(self.response.lock().unwrap().clone())
    }
}
