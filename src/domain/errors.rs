// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the hydration crate.
//!
//! This module defines the errors that can occur while describing a configuration
//! shape, hydrating it from the remote service, or reading the flattened projection.
//! All errors use `thiserror` for proper error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for hydration operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use hydracfg::domain::errors::ConfigError;
///
/// fn check_key(key: &str) -> Result<(), ConfigError> {
///     if key.trim().is_empty() {
///         return Err(ConfigError::Configuration {
///             message: "api_key is required".to_string(),
///         });
///     }
///     Ok(())
/// }
///
/// assert!(check_key("  ").unwrap_err().is_configuration_error());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Required client settings are missing or a shape does not fit its value.
    ///
    /// This is a fatal mistake in how the client was set up. No network activity
    /// happens before it is reported.
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },

    /// A configuration shape contains itself, directly or transitively.
    #[error("Configuration shape '{shape}' is cyclic at '{path}'")]
    CyclicShape {
        /// The name of the shape that was entered twice
        shape: String,
        /// The dotted path at which the cycle was detected
        path: String,
    },

    /// The configuration service answered with a non-success status.
    #[error("Hydration returned a bad status code {status}: {reason}")]
    HydrationTransport {
        /// The HTTP status code
        status: u16,
        /// The status reason phrase
        reason: String,
    },

    /// The response body could not be read as a hydration envelope.
    #[error("Failed to parse hydration response: {message}")]
    HydrationParse {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request could not be delivered or the response could not be read.
    #[error("Transport '{transport}' error: {message}")]
    Transport {
        /// The name of the transport that failed
        transport: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The hydration request could not be serialized.
    #[error("Failed to serialize hydration request: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blocking bridge onto the async transport is unavailable.
    #[error("Runtime error: {message}")]
    Runtime {
        /// The error message
        message: String,
    },

    /// The requested key is not present in the flattened projection.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversionError {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigError {
    /// Returns true for errors caused by how the client or shape was declared.
    ///
    /// These errors are never fixed by retrying.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ConfigError::Configuration { .. } | ConfigError::CyclicShape { .. }
        )
    }

    /// Creates a `Configuration` error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        ConfigError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a TypeConversionError from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "decimal".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversionError from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversionError {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }
}

/// A specialized Result type for hydration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
