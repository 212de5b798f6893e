// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat key/value projection of hydrated configuration.
//!
//! Generic configuration consumers look values up by string key rather than through
//! the typed object. The projector walks a configuration instance alongside its
//! [`Shape`] and renders every leaf at its colon-joined path, using the same naming
//! rules (declared name or rename override) as the schema walker.

use crate::domain::config_value::ConfigValue;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::field_path::FieldPath;
use crate::domain::schema::Ancestry;
use crate::domain::shape::{ConfigShape, FieldKind, Shape};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// An ordered mapping of colon-joined field paths to leaf values.
///
/// Entries keep the order in which the leaves were declared. Inserting an existing
/// key replaces its value and keeps its position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatProjection {
    entries: Vec<(String, ConfigValue)>,
    index: HashMap<String, usize>,
}

impl FlatProjection {
    /// Creates an empty projection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous value for the same key.
    pub fn insert(&mut self, key: String, value: ConfigValue) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = value;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, value));
        }
    }

    /// Returns the value stored under a colon-joined key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Returns the value stored under a field path.
    pub fn get_path(&self, path: &FieldPath) -> Option<&ConfigValue> {
        self.get(&path.to_key_string())
    }

    /// Returns true if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for FlatProjection {
    type Item = (String, ConfigValue);
    type IntoIter = std::vec::IntoIter<(String, ConfigValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Flattens a typed configuration instance.
///
/// The instance is serialized with serde and then projected against
/// `T::shape()`; see [`flatten_value`] for the rendering rules.
///
/// # Examples
///
/// ```
/// use hydracfg::domain::{flatten, ConfigShape, Shape};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "PascalCase")]
/// struct Child {
///     value1: String,
///     value2: String,
/// }
///
/// impl ConfigShape for Child {
///     fn shape() -> Shape {
///         Shape::of::<Self>().string("Value1").string("Value2")
///     }
/// }
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "PascalCase")]
/// struct AppConfig {
///     api_version: String,
///     child: Child,
/// }
///
/// impl ConfigShape for AppConfig {
///     fn shape() -> Shape {
///         Shape::of::<Self>().string("ApiVersion").composite::<Child>("Child")
///     }
/// }
///
/// let config = AppConfig {
///     api_version: "123".into(),
///     child: Child { value1: "Hello".into(), value2: "World".into() },
/// };
/// let flat = flatten(&config).unwrap();
/// assert_eq!(flat.get("ApiVersion").unwrap().as_str(), "123");
/// assert_eq!(flat.get("Child:Value1").unwrap().as_str(), "Hello");
/// assert_eq!(flat.get("Child:Value2").unwrap().as_str(), "World");
/// ```
pub fn flatten<T>(config: &T) -> Result<FlatProjection>
where
    T: ConfigShape + Serialize,
{
    let value = serde_json::to_value(config)?;
    flatten_value(&T::shape(), &value)
}

/// Flattens a JSON value against a shape.
///
/// Leaves render through [`ConfigValue::from_json`]: strings as themselves,
/// numbers and booleans in their text form, maps as compact JSON, and null or
/// missing values as the empty placeholder. A null or missing composite renders
/// the placeholder for every leaf beneath it, so the key set always matches the
/// shape's schema. Field names are matched exactly first, then ignoring case.
///
/// # Errors
///
/// Returns [`ConfigError::Configuration`] if a composite (or the root) holds
/// something other than an object or null, and [`ConfigError::CyclicShape`] if
/// the shape contains itself.
pub fn flatten_value(shape: &Shape, value: &Value) -> Result<FlatProjection> {
    let mut out = FlatProjection::new();
    let mut ancestry = Ancestry::new(shape);
    let root = FieldPath::root();
    let object = as_object(value, &root)?;
    project(shape, object, &root, &mut ancestry, &mut out)?;
    Ok(out)
}

fn project(
    shape: &Shape,
    object: Option<&Map<String, Value>>,
    parent: &FieldPath,
    ancestry: &mut Ancestry,
    out: &mut FlatProjection,
) -> Result<()> {
    for field in shape.fields() {
        let path = parent.child(field.outward_name());
        let value = object.and_then(|o| lookup(o, field.outward_name()));

        match field.kind() {
            FieldKind::Scalar(_) | FieldKind::Map => {
                let rendered = value
                    .map(ConfigValue::from_json)
                    .unwrap_or_else(ConfigValue::placeholder);
                out.insert(path.to_key_string(), rendered);
            }
            FieldKind::Composite(nested) => {
                let nested = nested();
                ancestry.enter(&nested, &path)?;
                let inner = match value {
                    Some(v) => as_object(v, &path)?,
                    None => None,
                };
                project(&nested, inner, &path, ancestry, out)?;
                ancestry.leave();
            }
        }
    }
    Ok(())
}

fn as_object<'a>(value: &'a Value, path: &FieldPath) -> Result<Option<&'a Map<String, Value>>> {
    match value {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(ConfigError::configuration(format!(
            "expected an object at '{}', found {}",
            if path.is_root() { "<root>".to_string() } else { path.to_schema_string() },
            json_type_name(other)
        ))),
    }
}

/// Finds a member by exact name, falling back to a case-insensitive match.
pub(crate) fn lookup<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(name) {
        return Some(value);
    }
    let wanted = name.to_lowercase();
    object
        .iter()
        .find(|(k, _)| k.to_lowercase() == wanted)
        .map(|(_, v)| v)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
