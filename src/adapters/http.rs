// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP transport adapter backed by `reqwest`.
//!
//! This adapter posts hydration requests over HTTPS using rustls. Error statuses are
//! returned as responses so the client can report them with their reason phrase;
//! only connection and body-read failures become [`ConfigError::Transport`].
//!
//! The reported reason is the standard phrase for the status code. A custom phrase
//! sent by the server is not preserved, and statuses without a standard phrase
//! are reported as `status <code>`.

use crate::domain::{ConfigError, Result};
use crate::ports::{HydrationTransport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use std::time::Duration;

const TRANSPORT_NAME: &str = "reqwest";

/// Hydration transport over `reqwest`.
///
/// # Examples
///
/// ```rust
/// use hydracfg::adapters::ReqwestTransport;
/// use hydracfg::ports::HydrationTransport;
/// use std::time::Duration;
///
/// let transport = ReqwestTransport::with_timeout(Duration::from_secs(10)).unwrap();
/// assert_eq!(transport.name(), "reqwest");
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with `reqwest`'s default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(transport_error)?;
        Ok(Self { client })
    }

    /// Creates a transport whose requests time out after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_error)?;
        Ok(Self { client })
    }

    /// Wraps an existing client, sharing its connection pool.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HydrationTransport for ReqwestTransport {
    fn name(&self) -> &str {
        TRANSPORT_NAME
    }

    async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self.client.post(&request.uri);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        tracing::debug!(
            "POST {} returned {} ({} bytes)",
            request.uri,
            status.as_u16(),
            body.len()
        );

        // reqwest does not expose the phrase on the wire, only the standard one
        let mut result = TransportResponse::new(status.as_u16(), body);
        if let Some(reason) = status.canonical_reason() {
            result = result.with_reason(reason);
        }
        Ok(result)
    }
}

fn transport_error(err: reqwest::Error) -> ConfigError {
    ConfigError::Transport {
        transport: TRANSPORT_NAME.to_string(),
        message: err.to_string(),
        source: Some(Box::new(err)),
    }
}
