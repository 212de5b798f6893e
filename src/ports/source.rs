// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port through which generic
//! configuration consumers read string-keyed values. The hydrated source exposes the
//! flattened projection of a hydrated object through it, and the environment adapter
//! exposes process environment variables.

use crate::domain::{ConfigValue, FieldPath, Result};

/// A trait for string-keyed configuration sources.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use hydracfg::ports::ConfigSource;
/// use hydracfg::domain::{ConfigValue, Result};
///
/// struct MySource;
///
/// impl ConfigSource for MySource {
///     fn name(&self) -> &str {
///         "my-source"
///     }
///
///     fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
///         Ok((key == "ApiVersion").then(|| ConfigValue::from("123")))
///     }
///
///     fn all_keys(&self) -> Result<Vec<String>> {
///         Ok(vec!["ApiVersion".to_string()])
///     }
///
///     fn reload(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
///
/// let source = MySource;
/// assert_eq!(source.get("ApiVersion").unwrap().unwrap().as_str(), "123");
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this configuration source.
    ///
    /// This name is used for logging and error messages.
    fn name(&self) -> &str;

    /// Retrieves the value stored under a key.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(ConfigValue))` - The value was found
    /// * `Ok(None)` - The key does not exist in this source
    /// * `Err(ConfigError)` - An error occurred
    fn get(&self, key: &str) -> Result<Option<ConfigValue>>;

    /// Returns every key available in this source.
    fn all_keys(&self) -> Result<Vec<String>>;

    /// Refreshes the source from its backing store.
    ///
    /// Sources that cannot change may implement this as a no-op.
    fn reload(&mut self) -> Result<()>;

    /// Retrieves the value stored under a field path, using the colon-joined form.
    fn get_path(&self, path: &FieldPath) -> Result<Option<ConfigValue>> {
        self.get(&path.to_key_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestSource {
        name: String,
        reloads: usize,
    }

    impl ConfigSource for TestSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn get(&self, key: &str) -> Result<Option<ConfigValue>> {
            Ok((key == "Child:Value1").then(|| ConfigValue::from("Hello")))
        }

        fn all_keys(&self) -> Result<Vec<String>> {
            Ok(vec!["Child:Value1".to_string()])
        }

        fn reload(&mut self) -> Result<()> {
            self.reloads += 1;
            Ok(())
        }
    }

    fn source() -> TestSource {
        TestSource {
            name: "test-source".to_string(),
            reloads: 0,
        }
    }

    #[test]
    fn test_config_source_name() {
        assert_eq!(source().name(), "test-source");
    }

    #[test]
    fn test_get_path_uses_colon_form() {
        let source = source();
        let path = FieldPath::from_segments(["Child", "Value1"]);
        let value = source.get_path(&path).unwrap();
        assert_eq!(value.unwrap().as_str(), "Hello");
    }

    #[test]
    fn test_get_missing_returns_none() {
        assert!(source().get("Child.Value1").unwrap().is_none());
    }

    #[test]
    fn test_reload() {
        let mut source = source();
        source.reload().unwrap();
        assert_eq!(source.reloads, 1);
        assert_eq!(source.all_keys().unwrap().len(), 1);
    }

    #[test]
    fn test_config_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn ConfigSource>>();
    }
}
