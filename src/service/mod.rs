// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the hydration client.
//!
//! This module contains [`HydrationClient`], which ties the domain (shape, schema,
//! envelopes) to a transport and owns the configuration cache.

pub mod hydration_client;

// Re-export commonly used types
pub use hydration_client::{HydrationClient, HydrationClientBuilder, API_KEY_HEADER};
