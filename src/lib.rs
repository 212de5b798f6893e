// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture client for hosted configuration services.
//!
//! This crate fetches a strongly typed configuration object from a remote service.
//! The client describes what it wants as a list of dotted field paths derived from
//! the shape of the configuration type, caches the answer for a configured lifetime,
//! and can flatten the result into colon-joined key/value pairs for consumers that
//! look configuration up by string key.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Shapes, the schema walker, the flat projector, wire envelopes,
//!   options and errors
//! - **Ports**: Trait definitions for the outside world (`HydrationTransport`,
//!   `ConfigSource`)
//! - **Adapters**: The `reqwest` transport, the hydrated key/value source and the
//!   environment variable source
//! - **Service**: The hydration client that owns the cache
//!
//! # Feature Flags
//!
//! - `http`: Enable the `reqwest` transport (default)
//! - `env`: Enable environment variable support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hydracfg::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Child {
//!     value1: String,
//!     value2: String,
//! }
//!
//! impl ConfigShape for Child {
//!     fn shape() -> Shape {
//!         Shape::of::<Self>().string("Value1").string("Value2")
//!     }
//! }
//!
//! #[derive(Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct AppConfig {
//!     api_version: String,
//!     child: Child,
//! }
//!
//! impl ConfigShape for AppConfig {
//!     fn shape() -> Shape {
//!         Shape::of::<Self>().string("ApiVersion").composite::<Child>("Child")
//!     }
//! }
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let client = HydrationClient::<AppConfig>::builder()
//!     .options(HydrationOptions::from_env("HYDRATE_")?)
//!     .build()?;
//!
//! // Sends {"Version": "...", "Schema": ["ApiVersion", "Child.Value1", "Child.Value2"]}
//! if let Some(config) = client.hydrate()? {
//!     let flat = flatten(config.as_ref())?;
//!     println!("Child:Value1 = {}", flat.get("Child:Value1").map(|v| v.as_str()).unwrap_or(""));
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        derive_schema, flatten, ConfigError, ConfigShape, ConfigValue, FieldPath,
        FlatProjection, HydrationOptions, Result, Schema, Shape,
    };
    pub use crate::ports::{ConfigSource, HydrationTransport};
    pub use crate::service::{HydrationClient, HydrationClientBuilder};

    pub use crate::adapters::HydratedSource;
    // Re-export adapters based on feature flags
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "http")]
    pub use crate::adapters::ReqwestTransport;
}
