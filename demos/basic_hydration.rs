// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic hydration example.
//!
//! This example demonstrates:
//! - Declaring a configuration shape, including a renamed field
//! - Reading client options from environment variables
//! - Hydrating the configuration and serving it from cache
//! - Looking values up through the flattened key/value source
//!
//! To run this example:
//! ```bash
//! export HYDRATE_URI="https://config.example.com/hydrate"
//! export HYDRATE_API_KEY="rpri_yourkey"
//! export HYDRATE_VERSION="1.0.0"
//! export HYDRATE_CACHE_EXPIRY="60"
//!
//! cargo run --example basic_hydration
//! ```

use hydracfg::prelude::*;
use hydracfg::domain::Field;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Database {
    #[serde(rename = "conn")]
    connection: Option<String>,
    pool_size: Option<u32>,
}

impl ConfigShape for Database {
    fn shape() -> Shape {
        Shape::of::<Self>()
            .field(Field::string("Connection").renamed("conn"))
            .integer("PoolSize")
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AppConfig {
    api_version: Option<String>,
    database: Option<Database>,
}

impl ConfigShape for AppConfig {
    fn shape() -> Shape {
        Shape::of::<Self>()
            .string("ApiVersion")
            .composite::<Database>("Database")
    }
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== hydracfg: Basic Hydration ===\n");

    let options = HydrationOptions::from_env("HYDRATE_")?;
    let client = Arc::new(
        HydrationClient::<AppConfig>::builder()
            .options(options)
            .build()?,
    );

    println!("--- Schema sent to the service ---");
    for path in client.schema() {
        println!("  {}", path);
    }

    println!("\n--- Typed configuration ---");
    match client.hydrate()? {
        Some(config) => println!("  {:?}", config),
        None => println!("  The service has no data for this schema yet"),
    }
    if let Some(expiry) = client.expiry() {
        println!("  Cached until {}", expiry);
    }

    // A second call inside the cache lifetime does not touch the network
    client.hydrate()?;

    println!("\n--- Flattened keys ---");
    let source = HydratedSource::new(Arc::clone(&client))?;
    for key in source.all_keys()? {
        let value = source.get(&key)?.unwrap_or_else(ConfigValue::placeholder);
        println!("  {} = {:?}", key, value.as_str());
    }

    Ok(())
}
