// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hydration transport trait definition.
//!
//! The hydration client never talks to the network itself. It hands a fully built
//! request to a `HydrationTransport` and interprets the response it gets back. The
//! `http` feature provides a `reqwest`-backed adapter; tests plug in their own.

use crate::domain::Result;
use async_trait::async_trait;

/// Content type of every hydration request.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// An outgoing hydration request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportRequest {
    /// The endpoint to post to
    pub uri: String,
    /// Header name/value pairs, in the order they should be sent
    pub headers: Vec<(String, String)>,
    /// The JSON body
    pub body: String,
}

impl TransportRequest {
    /// Returns the first header value with the given name, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response received from the configuration service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    /// The HTTP status code
    pub status: u16,
    /// The status reason phrase, if the transport knows one
    ///
    /// Transports may report the standard phrase for the status code rather than
    /// the phrase the server actually sent; `ReqwestTransport` does.
    pub reason: Option<String>,
    /// The response body
    pub body: String,
}

impl TransportResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    /// Sets the reason phrase.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the reason phrase, or the status code as text when there is none.
    pub fn reason_phrase(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| format!("status {}", self.status))
    }
}

/// A trait for delivering hydration requests.
///
/// Implementations perform one POST per call and report any non-network outcome,
/// including error statuses, as a `TransportResponse`. Only failures to deliver the
/// request or read the response are returned as errors.
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use hydracfg::domain::Result;
/// use hydracfg::ports::{HydrationTransport, TransportRequest, TransportResponse};
///
/// struct Canned;
///
/// #[async_trait]
/// impl HydrationTransport for Canned {
///     fn name(&self) -> &str {
///         "canned"
///     }
///
///     async fn post(&self, _request: TransportRequest) -> Result<TransportResponse> {
///         Ok(TransportResponse::new(200, r#"{"Data":null}"#))
///     }
/// }
/// ```
#[async_trait]
pub trait HydrationTransport: Send + Sync {
    /// Returns the name of this transport, used in logs and errors.
    fn name(&self) -> &str;

    /// Posts a request and returns the response.
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse>;
}
