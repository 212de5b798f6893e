// SPDX-License-Identifier: MIT OR Apache-2.0

//! Projected configuration value with type-safe conversions.
//!
//! Every leaf of a hydrated configuration is rendered to text when it is projected
//! into the flat key/value view. `ConfigValue` holds that text and converts it back
//! into Rust types at the point of use.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Text rendered for a leaf whose value is null or absent.
pub const NULL_PLACEHOLDER: &str = "";

/// A leaf value of the flattened projection.
///
/// # Examples
///
/// ```
/// use hydracfg::domain::ConfigValue;
/// use serde_json::json;
///
/// let value = ConfigValue::from_json(&json!(300));
/// assert_eq!(value.as_str(), "300");
/// assert_eq!(value.as_i64("TimeToLive").unwrap(), 300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Renders a JSON leaf to its projected text form.
    ///
    /// Strings render as themselves, numbers and booleans in their natural text
    /// form, null as [`NULL_PLACEHOLDER`]. Objects and arrays (map-valued leaves)
    /// render as a single compact JSON document.
    ///
    /// # Examples
    ///
    /// ```
    /// use hydracfg::domain::ConfigValue;
    /// use serde_json::json;
    ///
    /// assert_eq!(ConfigValue::from_json(&json!("Hello")).as_str(), "Hello");
    /// assert_eq!(ConfigValue::from_json(&json!(true)).as_str(), "true");
    /// assert_eq!(ConfigValue::from_json(&json!(null)).as_str(), "");
    /// assert_eq!(ConfigValue::from_json(&json!({"a": 1})).as_str(), r#"{"a":1}"#);
    /// ```
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ConfigValue(NULL_PLACEHOLDER.to_string()),
            Value::String(s) => ConfigValue(s.clone()),
            Value::Bool(b) => ConfigValue(b.to_string()),
            Value::Number(n) => ConfigValue(n.to_string()),
            Value::Array(_) | Value::Object(_) => ConfigValue(value.to_string()),
        }
    }

    /// Returns the placeholder value used for null leaves.
    pub fn placeholder() -> Self {
        ConfigValue(NULL_PLACEHOLDER.to_string())
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an owned copy of the text.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Returns true when this value is the null placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.0 == NULL_PLACEHOLDER
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following values (case-insensitive):
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => self
                .0
                .parse::<bool>()
                .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        self.0
            .parse::<i64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to a `u64`.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        self.0
            .parse::<u64>()
            .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e))
    }

    /// Converts the value to an `f64`.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        self.0
            .parse::<f64>()
            .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e))
    }

    /// Reads a map-valued leaf back into its entries.
    ///
    /// The null placeholder reads as an empty map. Nested values are rendered with
    /// the same rules as [`ConfigValue::from_json`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hydracfg::domain::ConfigValue;
    ///
    /// let value = ConfigValue::from(r#"{"region":"eu","replicas":3}"#);
    /// let map = value.as_map("Features").unwrap();
    /// assert_eq!(map["region"].as_str(), "eu");
    /// assert_eq!(map["replicas"].as_str(), "3");
    /// ```
    pub fn as_map(&self, key: &str) -> Result<BTreeMap<String, ConfigValue>> {
        if self.is_placeholder() {
            return Ok(BTreeMap::new());
        }

        let parsed: serde_json::Map<String, Value> =
            serde_json::from_str(&self.0).map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: "map".to_string(),
                source: Box::new(e),
            })?;

        Ok(parsed
            .iter()
            .map(|(k, v)| (k.clone(), ConfigValue::from_json(v)))
            .collect())
    }

    /// Parses the value into any type that implements `FromStr`.
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversionError {
                key: key.to_string(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::IpAddr;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(ConfigValue::from_json(&json!("Hello")).as_str(), "Hello");
        assert_eq!(ConfigValue::from_json(&json!(300)).as_str(), "300");
        assert_eq!(ConfigValue::from_json(&json!(-7)).as_str(), "-7");
        assert_eq!(ConfigValue::from_json(&json!(1.5)).as_str(), "1.5");
        assert_eq!(ConfigValue::from_json(&json!(false)).as_str(), "false");
    }

    #[test]
    fn test_from_json_null_is_placeholder() {
        let value = ConfigValue::from_json(&Value::Null);
        assert!(value.is_placeholder());
        assert_eq!(value, ConfigValue::placeholder());
    }

    #[test]
    fn test_from_json_map_is_compact_json() {
        let value = ConfigValue::from_json(&json!({"b": "x", "a": 2}));
        let reparsed: Value = serde_json::from_str(value.as_str()).unwrap();
        assert_eq!(reparsed, json!({"a": 2, "b": "x"}));
        assert!(!value.as_str().contains(' '));
    }

    #[test]
    fn test_as_bool_round_trips_projected_booleans() {
        assert!(ConfigValue::from_json(&json!(true)).as_bool("k").unwrap());
        assert!(!ConfigValue::from_json(&json!(false)).as_bool("k").unwrap());
    }

    #[test]
    fn test_as_bool_variants() {
        for val in ["True", "YES", "1", "on"] {
            assert!(ConfigValue::from(val).as_bool("k").unwrap(), "{}", val);
        }
        for val in ["False", "no", "0", "OFF"] {
            assert!(!ConfigValue::from(val).as_bool("k").unwrap(), "{}", val);
        }
        assert!(ConfigValue::from("maybe").as_bool("k").is_err());
    }

    #[test]
    fn test_as_i64_and_u64() {
        let value = ConfigValue::from("300");
        assert_eq!(value.as_i64("TimeToLive").unwrap(), 300);
        assert_eq!(value.as_u64("TimeToLive").unwrap(), 300);
        assert!(ConfigValue::from("-1").as_u64("k").is_err());
        assert!(ConfigValue::from("1.5").as_i64("k").is_err());
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(ConfigValue::from("1.25").as_f64("k").unwrap(), 1.25);
        assert!(ConfigValue::from("abc").as_f64("k").is_err());
    }

    #[test]
    fn test_as_map() {
        let value = ConfigValue::from_json(&json!({"region": "eu", "nested": {"x": 1}}));
        let map = value.as_map("Features").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["region"].as_str(), "eu");
        assert_eq!(map["nested"].as_str(), r#"{"x":1}"#);
    }

    #[test]
    fn test_as_map_placeholder_is_empty() {
        assert!(ConfigValue::placeholder().as_map("k").unwrap().is_empty());
    }

    #[test]
    fn test_as_map_rejects_non_map() {
        let err = ConfigValue::from("plain").as_map("Features").unwrap_err();
        assert!(err.to_string().contains("map"));
    }

    #[test]
    fn test_parse_custom_type() {
        let value = ConfigValue::from("127.0.0.1");
        let ip: IpAddr = value.parse("Host").unwrap();
        assert_eq!(ip.to_string(), "127.0.0.1");
        assert!(ConfigValue::from("nope").parse::<IpAddr>("Host").is_err());
    }

    #[test]
    fn test_conversions() {
        let value = ConfigValue::from("test".to_string());
        assert_eq!(format!("{}", value), "test");
        let s: &str = value.as_ref();
        assert_eq!(s, "test");
        let owned: String = value.into();
        assert_eq!(owned, "test");
    }
}
