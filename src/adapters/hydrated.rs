// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value source over a hydration client.
//!
//! [`HydratedSource`] hydrates its client, flattens the result and answers
//! colon-joined lookups such as `Child:Value1` from the flattened projection.

use crate::domain::{flatten, ConfigError, ConfigShape, ConfigValue, FlatProjection, Result};
use crate::ports::ConfigSource;
use crate::service::HydrationClient;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// A [`ConfigSource`] backed by hydrated configuration.
///
/// Values are captured at load time; [`ConfigSource::reload`] hydrates again,
/// which is served from the client's cache while it is fresh. Before the service
/// has ever returned data the source is empty.
///
/// # Examples
///
/// ```rust,no_run
/// use hydracfg::adapters::HydratedSource;
/// use hydracfg::domain::{ConfigShape, Shape};
/// use hydracfg::ports::ConfigSource;
/// use hydracfg::service::HydrationClient;
/// use serde::{Deserialize, Serialize};
/// use std::sync::Arc;
///
/// #[derive(Serialize, Deserialize)]
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
///     .build()?;
///
/// let source = HydratedSource::new(Arc::new(client))?;
/// println!("{:?}", source.get("ApiVersion")?);
/// # Ok(())
/// # }
/// ```
pub struct HydratedSource<T> {
    client: Arc<HydrationClient<T>>,
    data: FlatProjection,
}

impl<T> HydratedSource<T>
where
    T: ConfigShape + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a source and hydrates it immediately.
    ///
    /// Blocks the calling thread; use [`Self::new_async`] inside a runtime.
    pub fn new(client: Arc<HydrationClient<T>>) -> Result<Self> {
        let mut source = Self::unloaded(client);
        source.load()?;
        Ok(source)
    }

    /// Creates a source and hydrates it without blocking.
    pub async fn new_async(client: Arc<HydrationClient<T>>) -> Result<Self> {
        let mut source = Self::unloaded(client);
        source.reload_async().await?;
        Ok(source)
    }

    fn unloaded(client: Arc<HydrationClient<T>>) -> Self {
        Self {
            client,
            data: FlatProjection::new(),
        }
    }

    /// Hydrates and replaces the captured values.
    pub fn load(&mut self) -> Result<()> {
        let hydrated = self.client.hydrate()?;
        self.replace(hydrated.as_deref())
    }

    /// Hydrates and replaces the captured values without blocking.
    pub async fn reload_async(&mut self) -> Result<()> {
        let hydrated = self.client.hydrate_async().await?;
        self.replace(hydrated.as_deref())
    }

    fn replace(&mut self, hydrated: Option<&T>) -> Result<()> {
        self.data = match hydrated {
            Some(config) => flatten(config)?,
            None => FlatProjection::new(),
        };
        tracing::debug!(
            "Loaded {} hydrated keys for '{}'",
            self.data.len(),
            self.client.shape().name()
        );
        Ok(())
    }
}

impl<T> HydratedSource<T> {
    /// Returns the captured projection.
    pub fn projection(&self) -> &FlatProjection {
        &self.data
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &Arc<HydrationClient<T>> {
        &self.client
    }

    /// Returns the value for a key, failing if it is absent.
    pub fn require(&self, key: &str) -> Result<&ConfigValue> {
        self.data.get(key).ok_or_else(|| ConfigError::ConfigKeyNotFound {
            key: key.to_string(),
        })
    }
}

impl<T> std::fmt::Debug for HydratedSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydratedSource")
            .field("client", &self.client)
            .field("keys", &self.data.len())
            .finish()
    }
}

impl<T> ConfigSource for HydratedSource<T>
where
    T: ConfigShape + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        "hydration"
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        Ok(self.data.get(key).cloned())
    }

    fn all_keys(&self) -> Result<Vec<String>> {
        Ok(self.data.keys().map(str::to_string).collect())
    }

    fn reload(&mut self) -> Result<()> {
        self.load()
    }
}
