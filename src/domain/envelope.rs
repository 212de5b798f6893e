// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire envelopes exchanged with the configuration service.
//!
//! The request carries the application version and the schema. The response wraps
//! the hydrated object in a `Data` member. Member names in the response are matched
//! without regard to case, both for the envelope and for the configuration fields.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::projection::{json_type_name, lookup};
use crate::domain::shape::{FieldKind, Shape};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Body of a hydration request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HydrationRequest {
    /// The caller's application version, empty when unset
    #[serde(rename = "Version")]
    pub version: String,
    /// The dotted leaf paths to hydrate
    #[serde(rename = "Schema")]
    pub schema: Vec<String>,
}

impl HydrationRequest {
    /// Serializes the request to its JSON body.
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Name of the member wrapping the hydrated object.
const DATA_MEMBER: &str = "Data";

/// Parses a hydration response body.
///
/// Returns `Ok(None)` when `Data` is null or absent.
///
/// # Errors
///
/// Returns [`ConfigError::HydrationParse`] if the body is not JSON, is not an
/// object, or `Data` does not deserialize into `T`.
pub fn parse_response<T>(body: &str, shape: &Shape) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    let envelope: Value = serde_json::from_str(body).map_err(|e| ConfigError::HydrationParse {
        message: format!("response body is not valid JSON: {}", e),
        source: Some(Box::new(e)),
    })?;

    let object = match &envelope {
        Value::Object(map) => map,
        other => {
            return Err(ConfigError::HydrationParse {
                message: format!("expected an object envelope, found {}", json_type_name(other)),
                source: None,
            })
        }
    };

    let data = match lookup(object, DATA_MEMBER) {
        None | Some(Value::Null) => return Ok(None),
        Some(data) => normalize(shape, data),
    };

    serde_json::from_value(data)
        .map(Some)
        .map_err(|e| ConfigError::HydrationParse {
            message: format!("data does not match the configuration shape: {}", e),
            source: Some(Box::new(e)),
        })
}

/// Rewrites member names that match a field ignoring case to the field's outward
/// name, recursing into composites. Members the shape does not know are kept.
pub(crate) fn normalize(shape: &Shape, value: &Value) -> Value {
    let Value::Object(object) = value else {
        return value.clone();
    };

    let mut out: Map<String, Value> = object.clone();
    for field in shape.fields() {
        let name = field.outward_name();
        let Some((found_key, found)) = find_member(object, name) else {
            continue;
        };

        let rewritten = match field.kind() {
            FieldKind::Composite(nested) if found.is_object() => normalize(&nested(), found),
            _ => found.clone(),
        };

        if found_key != name {
            out.remove(found_key);
        }
        out.insert(name.to_string(), rewritten);
    }
    Value::Object(out)
}

fn find_member<'a>(
    object: &'a Map<String, Value>,
    name: &str,
) -> Option<(&'a String, &'a Value)> {
    if let Some(found) = object.get_key_value(name) {
        return Some(found);
    }
    let wanted = name.to_lowercase();
    object.iter().find(|(k, _)| k.to_lowercase() == wanted)
}
