// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module holds the shape descriptors, the schema walker, the flat projector
//! and the wire envelopes. It performs no I/O; the hydration client in the service
//! layer drives it through the transport port.

pub mod config_value;
pub mod envelope;
pub mod errors;
pub mod field_path;
pub mod options;
pub mod projection;
pub mod schema;
pub mod shape;

// Re-export commonly used types
pub use config_value::ConfigValue;
pub use envelope::HydrationRequest;
pub use errors::{ConfigError, Result};
pub use field_path::FieldPath;
pub use options::HydrationOptions;
pub use projection::{flatten, flatten_value, FlatProjection};
pub use schema::{derive_schema, Schema};
pub use shape::{ConfigShape, Field, FieldKind, ScalarKind, Shape};
