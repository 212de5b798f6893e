// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! Used to read [`HydrationOptions`](crate::domain::HydrationOptions) from the
//! process environment, and usable on its own as a [`ConfigSource`].

use crate::domain::{ConfigValue, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;
use std::env;
use std::sync::{PoisonError, RwLock};

/// Maximum length for environment variable keys
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Configuration source adapter for environment variables.
///
/// Supports prefix filtering (only variables starting with e.g. `HYDRATE_`) and key
/// transformation (lowercasing, underscores to dots). Variables are read lazily on
/// first access and kept until [`ConfigSource::reload`].
///
/// # Examples
///
/// ```rust
/// use hydracfg::adapters::EnvVarAdapter;
/// use hydracfg::ports::ConfigSource;
///
/// // HYDRATE_API_KEY is exposed as "api.key"
/// let adapter = EnvVarAdapter::with_prefix("HYDRATE_").lowercase_keys(true);
/// assert_eq!(adapter.name(), "env");
/// ```
#[derive(Debug)]
pub struct EnvVarAdapter {
    prefix: Option<String>,
    lowercase_keys: bool,
    replace_underscores: bool,
    /// Loaded variables; `None` until first access or after a reload
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl EnvVarAdapter {
    /// Creates an adapter over every environment variable.
    pub fn new() -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            replace_underscores: true,
            cache: RwLock::new(None),
        }
    }

    /// Creates an adapter that only reads variables starting with `prefix`.
    ///
    /// The prefix is stripped from the exposed keys.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// Sets whether keys are lowercased.
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Sets whether underscores in keys become dots. Enabled by default.
    pub fn replace_underscores(mut self, enabled: bool) -> Self {
        self.replace_underscores = enabled;
        self
    }

    /// Creates an adapter over fixed values instead of the process environment.
    ///
    /// Keys are used exactly as given. Intended for tests.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hydracfg::adapters::EnvVarAdapter;
    /// use hydracfg::domain::HydrationOptions;
    /// use std::collections::HashMap;
    ///
    /// let mut values = HashMap::new();
    /// values.insert("uri".to_string(), "https://test.com".to_string());
    /// values.insert("api.key".to_string(), "rpri_testkey".to_string());
    ///
    /// let options = HydrationOptions::from_source(&EnvVarAdapter::with_values(values)).unwrap();
    /// assert_eq!(options.uri, "https://test.com");
    /// ```
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: None,
            lowercase_keys: false,
            replace_underscores: false,
            cache: RwLock::new(Some(values)),
        }
    }

    fn transform_key(&self, key: String) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str())?.to_string(),
            None => key,
        };

        let mut key = key;
        if self.lowercase_keys {
            key = key.to_lowercase();
        }
        if self.replace_underscores {
            key = key.replace('_', ".");
        }
        Some(key)
    }

    fn load(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();

        for (key, value) in env::vars() {
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={}",
                    key.len(),
                    value.len()
                );
                continue;
            }

            if let Some(key) = self.transform_key(key) {
                values.insert(key, value);
            }
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?}, lowercase={}, replace_underscores={})",
            values.len(),
            self.prefix,
            self.lowercase_keys,
            self.replace_underscores
        );

        values
    }

    fn with_cache<R>(&self, f: impl FnOnce(&HashMap<String, String>) -> R) -> R {
        {
            let guard = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(values) = guard.as_ref() {
                return f(values);
            }
        }

        let mut guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let values = guard.get_or_insert_with(|| self.load());
        f(values)
    }
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
        Ok(self.with_cache(|values| values.get(key).map(|v| ConfigValue::from(v.as_str()))))
    }

    fn all_keys(&self) -> Result<Vec<String>> {
        Ok(self.with_cache(|values| values.keys().cloned().collect()))
    }

    fn reload(&mut self) -> Result<()> {
        *self.cache.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
