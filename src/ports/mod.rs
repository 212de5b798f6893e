// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the hydration engine and the outside world: the transport that carries
//! hydration requests, and the key/value source read by configuration consumers.

pub mod source;
pub mod transport;

// Re-export commonly used types
pub use source::ConfigSource;
pub use transport::{HydrationTransport, TransportRequest, TransportResponse, JSON_CONTENT_TYPE};
