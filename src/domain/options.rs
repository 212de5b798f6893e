// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hydration client options.
//!
//! Options can be set in code or read from any [`ConfigSource`], for example
//! environment variables through the `env` feature.

use crate::domain::errors::{ConfigError, Result};
use crate::ports::ConfigSource;
use std::time::Duration;

/// Default cache lifetime in seconds.
pub const DEFAULT_CACHE_EXPIRY_SECS: u64 = 300;

/// Key holding the service URI when options are read from a source.
pub const URI_KEY: &str = "uri";
/// Key holding the API key when options are read from a source.
pub const API_KEY_KEY: &str = "api.key";
/// Key holding the application version when options are read from a source.
pub const VERSION_KEY: &str = "version";
/// Key holding the cache lifetime in seconds when options are read from a source.
pub const CACHE_EXPIRY_KEY: &str = "cache.expiry";

/// Settings for connecting to the configuration service.
///
/// # Examples
///
/// ```
/// use hydracfg::domain::HydrationOptions;
/// use std::time::Duration;
///
/// let options = HydrationOptions::new("https://config.example.com/hydrate", "rpri_key")
///     .with_version("1.0.0")
///     .with_cache_expiry(Duration::from_secs(60));
///
/// assert!(options.validate().is_ok());
/// assert_eq!(options.cache_expiry, Duration::from_secs(60));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct HydrationOptions {
    /// The endpoint the hydration request is posted to
    pub uri: String,
    /// The key identifying the caller's environment
    pub api_key: String,
    /// The caller's application version, sent with every request
    pub version: String,
    /// How long a hydrated object is served from cache
    pub cache_expiry: Duration,
}

impl HydrationOptions {
    /// Creates options with the required settings and defaults for the rest.
    pub fn new(uri: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Sets the application version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the cache lifetime.
    pub fn with_cache_expiry(mut self, cache_expiry: Duration) -> Self {
        self.cache_expiry = cache_expiry;
        self
    }

    /// Checks that the required settings are present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Configuration`] if the API key or URI is blank.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::configuration("api_key is required"));
        }
        if self.uri.trim().is_empty() {
            return Err(ConfigError::configuration("uri is required"));
        }
        Ok(())
    }

    /// Reads options from a configuration source.
    ///
    /// Looks up [`URI_KEY`], [`API_KEY_KEY`], [`VERSION_KEY`] and
    /// [`CACHE_EXPIRY_KEY`]. Missing keys keep their defaults; the result is not
    /// validated here.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or the cache lifetime is not a whole
    /// number of seconds.
    pub fn from_source(source: &dyn ConfigSource) -> Result<Self> {
        let mut options = Self::default();

        if let Some(uri) = source.get(URI_KEY)? {
            options.uri = uri.into();
        }
        if let Some(api_key) = source.get(API_KEY_KEY)? {
            options.api_key = api_key.into();
        }
        if let Some(version) = source.get(VERSION_KEY)? {
            options.version = version.into();
        }
        if let Some(expiry) = source.get(CACHE_EXPIRY_KEY)? {
            options.cache_expiry = Duration::from_secs(expiry.as_u64(CACHE_EXPIRY_KEY)?);
        }

        tracing::debug!(
            "Read hydration options from source '{}' (uri set={}, version={:?})",
            source.name(),
            !options.uri.is_empty(),
            options.version
        );

        Ok(options)
    }

    /// Reads options from environment variables with the given prefix.
    ///
    /// With the prefix `HYDRATE_` the variables are `HYDRATE_URI`,
    /// `HYDRATE_API_KEY`, `HYDRATE_VERSION` and `HYDRATE_CACHE_EXPIRY`.
    #[cfg(feature = "env")]
    pub fn from_env(prefix: impl Into<String>) -> Result<Self> {
        use crate::adapters::EnvVarAdapter;
        let source = EnvVarAdapter::with_prefix(prefix).lowercase_keys(true);
        Self::from_source(&source)
    }
}

impl Default for HydrationOptions {
    fn default() -> Self {
        Self {
            uri: String::new(),
            api_key: String::new(),
            version: String::new(),
            cache_expiry: Duration::from_secs(DEFAULT_CACHE_EXPIRY_SECS),
        }
    }
}

impl std::fmt::Debug for HydrationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydrationOptions")
            .field("uri", &self.uri)
            .field("api_key", &"<redacted>")
            .field("version", &self.version)
            .field("cache_expiry", &self.cache_expiry)
            .finish()
    }
}
