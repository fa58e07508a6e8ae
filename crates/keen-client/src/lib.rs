// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keen IO SDK for Rust.
//!
//! This crate pairs the request/response core in `keen-core` with a reqwest
//! transport: publishing events, running aggregate queries, maintenance
//! operations, and the access-key / saved-query / cached-dataset resource
//! facades.
//!
//! # Example
//!
//! ```ignore
//! use keen_client::{AnalysisType, KeenClient, QueryParams};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), keen_client::KeenError> {
//!     let client = KeenClient::builder()
//!         .project_id("5c3f...")
//!         .write_key("e4f5...")
//!         .read_key("a1b2...")
//!         .build()?;
//!
//!     // Publish an event
//!     client.publish("signups", json!({"name": "Bob", "plan": "pro"})).await?;
//!
//!     // Count this week's signups
//!     let count = client
//!         .query(
//!             AnalysisType::Count,
//!             Some("signups"),
//!             QueryParams::new().insert("timeframe", "this_7_days"),
//!         )
//!         .await?;
//!     println!("signups this week: {count}");
//!
//!     Ok(())
//! }
//! ```
//!
//! No operation is retried; every failure surfaces immediately as a
//! [`KeenError`]. The fire-and-forget publish variants deliver their
//! outcome through the returned join handle instead.

mod access_keys;
mod cached_datasets;
mod client;
mod http;
mod saved_queries;

pub use access_keys::AccessKeys;
pub use cached_datasets::CachedDatasets;
pub use client::{KeenClient, KeenClientBuilder, QueryOptions};
pub use saved_queries::SavedQueries;

// Re-export core types so most callers only depend on this crate.
pub use keen_core::{
	AnalysisType, ClientConfig, KeenError, KeyTier, QueryParams, Result, ScopedKey,
};
