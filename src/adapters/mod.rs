// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing transport and source implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer: the `reqwest` transport that carries hydration requests, the hydrated
//! key/value source, and the environment variable source used for client settings.

#[cfg(feature = "env")]
pub mod env_var;
#[cfg(feature = "http")]
pub mod http;
pub mod hydrated;

// Re-export adapters based on feature flags
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
#[cfg(feature = "http")]
pub use http::ReqwestTransport;
pub use hydrated::HydratedSource;
