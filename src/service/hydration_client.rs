// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hydration client implementation.
//!
//! This module provides [`HydrationClient`], which fetches a typed configuration
//! object from the configuration service and serves it from cache until its expiry.
//!
//! # Caching
//!
//! A client holds one cache entry: the last object hydrated with data and the moment
//! it expires. A call made before that moment is answered from cache without any
//! network activity. A call made at or after it posts a new request. Nothing is
//! refreshed in the background.
//!
//! The expiry is always `now + cache_expiry` from the client options; the service
//! has no say in it.
//!
//! # Concurrency
//!
//! The entry is replaced as a whole under a lock that is never held across the
//! network call. Concurrent callers that all find the cache stale each send their
//! own request and the last response to arrive wins. There is no single-flight
//! coalescing. Create one client per configuration shape and share it.

use crate::domain::envelope::{parse_response, HydrationRequest};
use crate::domain::{
    derive_schema, ConfigError, ConfigShape, HydrationOptions, Result, Schema, Shape,
};
use crate::ports::{HydrationTransport, TransportRequest, TransportResponse, JSON_CONTENT_TYPE};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-ripe-key";

/// Shared runtime that drives the async path for blocking callers.
static BLOCKING_RUNTIME: OnceCell<tokio::runtime::Runtime> = OnceCell::new();

fn blocking_runtime() -> Result<&'static tokio::runtime::Runtime> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(ConfigError::Runtime {
            message: "blocking hydrate called from within an async runtime; use hydrate_async"
                .to_string(),
        });
    }

    BLOCKING_RUNTIME
        .get_or_try_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("hydracfg-blocking")
                .enable_all()
                .build()
        })
        .map_err(|e| ConfigError::Runtime {
            message: format!("failed to create blocking runtime: {}", e),
        })
}

struct CacheEntry<T> {
    value: Arc<T>,
    expiry: DateTime<Utc>,
}

/// Client for a hosted configuration service.
///
/// # Examples
///
/// ```rust,no_run
/// use hydracfg::domain::{ConfigShape, Shape};
/// use hydracfg::service::HydrationClient;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// #[serde(rename_all = "PascalCase")]
/// struct AppConfig {
///     api_version: String,
/// }
///
/// impl ConfigShape for AppConfig {
///     fn shape() -> Shape {
///         Shape::of::<Self>().string("ApiVersion")
///     }
/// }
///
/// # fn main() -> hydracfg::domain::Result<()> {
/// let client = HydrationClient::<AppConfig>::builder()
///     .uri("https://config.example.com/hydrate")
///     .api_key("rpri_key")
///     .version("1.0.0")
///     .build()?;
///
/// if let Some(config) = client.hydrate()? {
///     println!("api version {}", config.api_version);
/// }
/// # Ok(())
/// # }
/// ```
pub struct HydrationClient<T> {
    options: HydrationOptions,
    shape: Shape,
    schema: Schema,
    headers: Vec<(String, String)>,
    transport: Arc<dyn HydrationTransport>,
    cache: RwLock<Option<CacheEntry<T>>>,
}

impl<T> HydrationClient<T>
where
    T: ConfigShape + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a client over the given transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Configuration`] if the URI or API key is blank and
    /// [`ConfigError::CyclicShape`] if `T`'s shape contains itself.
    pub fn new(options: HydrationOptions, transport: Arc<dyn HydrationTransport>) -> Result<Self> {
        options.validate()?;

        let shape = T::shape();
        let schema = derive_schema(&shape)?;
        let headers = vec![
            (API_KEY_HEADER.to_string(), options.api_key.clone()),
            ("content-type".to_string(), JSON_CONTENT_TYPE.to_string()),
        ];

        tracing::debug!(
            "Created hydration client for '{}' with {} schema paths over transport '{}'",
            shape.name(),
            schema.len(),
            transport.name()
        );

        Ok(Self {
            options,
            shape,
            schema,
            headers,
            transport,
            cache: RwLock::new(None),
        })
    }

    /// Creates a client over the default HTTP transport.
    #[cfg(feature = "http")]
    pub fn from_options(options: HydrationOptions) -> Result<Self> {
        options.validate()?;
        let transport = crate::adapters::ReqwestTransport::new()?;
        Self::new(options, Arc::new(transport))
    }

    /// Creates a new client builder.
    pub fn builder() -> HydrationClientBuilder<T> {
        HydrationClientBuilder::new()
    }

    /// Returns the options this client was built with.
    pub fn options(&self) -> &HydrationOptions {
        &self.options
    }

    /// Returns the descriptor of `T`.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the schema sent with every request.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns when the cached object expires, or `None` before the first
    /// hydration that carried data.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.read_cache().as_ref().map(|entry| entry.expiry)
    }

    /// Returns the cached object regardless of its expiry.
    pub fn cached(&self) -> Option<Arc<T>> {
        self.read_cache()
            .as_ref()
            .map(|entry| Arc::clone(&entry.value))
    }

    /// Returns true if a cached object exists and has not expired.
    pub fn is_fresh(&self) -> bool {
        self.fresh().is_some()
    }

    /// Returns the configuration, fetching it if the cache is empty or expired.
    ///
    /// This blocks the calling thread for the duration of the request. It must not
    /// be called from inside an async runtime; use [`Self::hydrate_async`] there.
    ///
    /// Returns `Ok(None)` only if the service has never returned data.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::HydrationTransport`] for a non-success status
    /// - [`ConfigError::HydrationParse`] for an unreadable response
    /// - [`ConfigError::Transport`] if the request could not be delivered
    /// - [`ConfigError::Runtime`] if called from inside an async runtime
    ///
    /// On error the cache is left as it was.
    pub fn hydrate(&self) -> Result<Option<Arc<T>>> {
        if let Some(value) = self.fresh() {
            return Ok(Some(value));
        }
        blocking_runtime()?.block_on(self.hydrate_async())
    }

    /// Returns the configuration, fetching it if the cache is empty or expired.
    ///
    /// Behaves exactly like [`Self::hydrate`] but suspends while the request is in
    /// flight.
    pub async fn hydrate_async(&self) -> Result<Option<Arc<T>>> {
        if let Some(value) = self.fresh() {
            tracing::debug!("Serving cached configuration for '{}'", self.shape.name());
            return Ok(Some(value));
        }

        let request = self.build_request()?;
        tracing::debug!(
            "Requesting hydration of {} paths from '{}'",
            self.schema.len(),
            self.options.uri
        );

        let response = self.transport.post(request).await.map_err(|e| {
            tracing::warn!("Hydration request to '{}' failed: {}", self.options.uri, e);
            e
        })?;

        self.apply_response(response)
    }

    fn build_request(&self) -> Result<TransportRequest> {
        let body = HydrationRequest {
            version: self.options.version.clone(),
            schema: self.schema.to_wire(),
        }
        .to_body()?;

        Ok(TransportRequest {
            uri: self.options.uri.clone(),
            headers: self.headers.clone(),
            body,
        })
    }

    fn apply_response(&self, response: TransportResponse) -> Result<Option<Arc<T>>> {
        if !response.is_success() {
            tracing::warn!(
                "Hydration from '{}' returned status {}: {}",
                self.options.uri,
                response.status,
                response.body
            );
            return Err(ConfigError::HydrationTransport {
                status: response.status,
                reason: response.reason_phrase(),
            });
        }

        let data = parse_response::<T>(&response.body, &self.shape).map_err(|e| {
            tracing::warn!("Hydration response from '{}' unreadable: {}", self.options.uri, e);
            e
        })?;

        match data {
            Some(value) => {
                let value = Arc::new(value);
                let expiry = self.next_expiry();
                *self.write_cache() = Some(CacheEntry {
                    value: Arc::clone(&value),
                    expiry,
                });
                tracing::debug!(
                    "Hydrated '{}', cached until {}",
                    self.shape.name(),
                    expiry
                );
                Ok(Some(value))
            }
            None => {
                tracing::debug!(
                    "Hydration response for '{}' carried no data; keeping cache",
                    self.shape.name()
                );
                Ok(self.cached())
            }
        }
    }

    fn next_expiry(&self) -> DateTime<Utc> {
        expiry_from(Utc::now(), self.options.cache_expiry)
    }
}

impl<T> HydrationClient<T> {
    fn fresh(&self) -> Option<Arc<T>> {
        let now = Utc::now();
        self.read_cache()
            .as_ref()
            .filter(|entry| now < entry.expiry)
            .map(|entry| Arc::clone(&entry.value))
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Option<CacheEntry<T>>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Option<CacheEntry<T>>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> std::fmt::Debug for HydrationClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydrationClient")
            .field("options", &self.options)
            .field("shape", &self.shape.name())
            .field("schema", &self.schema.to_wire())
            .field("transport", &self.transport.name())
            .field("expiry", &self.read_cache().as_ref().map(|e| e.expiry))
            .finish()
    }
}

/// Adds a lifetime to a moment, saturating at the latest representable time.
fn expiry_from(now: DateTime<Utc>, lifetime: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(lifetime)
        .ok()
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Builder for constructing a [`HydrationClient`].
///
/// # Examples
///
/// ```rust
/// use async_trait::async_trait;
/// use hydracfg::domain::{ConfigShape, Result, Shape};
/// use hydracfg::ports::{HydrationTransport, TransportRequest, TransportResponse};
/// use hydracfg::service::HydrationClient;
/// use serde::Deserialize;
/// use std::time::Duration;
///
/// #[derive(Deserialize)]
/// struct Empty {}
///
/// impl ConfigShape for Empty {
///     fn shape() -> Shape {
///         Shape::of::<Self>()
///     }
/// }
///
/// struct Offline;
///
/// #[async_trait]
/// impl HydrationTransport for Offline {
///     fn name(&self) -> &str {
///         "offline"
///     }
///
///     async fn post(&self, _request: TransportRequest) -> Result<TransportResponse> {
///         Ok(TransportResponse::new(200, r#"{"Data":null}"#))
///     }
/// }
///
/// let client = HydrationClient::<Empty>::builder()
///     .uri("https://test.com")
///     .api_key("rpri_testkey")
///     .cache_expiry(Duration::from_secs(30))
///     .transport(Offline)
///     .build()
///     .unwrap();
///
/// assert!(client.schema().is_empty());
/// ```
pub struct HydrationClientBuilder<T> {
    options: HydrationOptions,
    transport: Option<Arc<dyn HydrationTransport>>,
    _config: PhantomData<fn() -> T>,
}

impl<T> HydrationClientBuilder<T>
where
    T: ConfigShape + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: HydrationOptions::default(),
            transport: None,
            _config: PhantomData,
        }
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: HydrationOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the service URI.
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.options.uri = uri.into();
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.options.api_key = api_key.into();
        self
    }

    /// Sets the application version.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.options.version = version.into();
        self
    }

    /// Sets the cache lifetime.
    pub fn cache_expiry(mut self, cache_expiry: Duration) -> Self {
        self.options.cache_expiry = cache_expiry;
        self
    }

    /// Sets the transport.
    pub fn transport(self, transport: impl HydrationTransport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Sets a transport that is shared with other owners.
    pub fn shared_transport(mut self, transport: Arc<dyn HydrationTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    ///
    /// Without an explicit transport the default HTTP transport is used when the
    /// `http` feature is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Configuration`] for missing settings, or when no
    /// transport is available.
    pub fn build(self) -> Result<HydrationClient<T>> {
        self.options.validate()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };
        HydrationClient::new(self.options, transport)
    }
}

impl<T> Default for HydrationClientBuilder<T>
where
    T: ConfigShape + DeserializeOwned + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
fn default_transport() -> Result<Arc<dyn HydrationTransport>> {
    Ok(Arc::new(crate::adapters::ReqwestTransport::new()?))
}

#[cfg(not(feature = "http"))]
fn default_transport() -> Result<Arc<dyn HydrationTransport>> {
    Err(ConfigError::configuration(
        "a transport is required when the `http` feature is disabled",
    ))
}
