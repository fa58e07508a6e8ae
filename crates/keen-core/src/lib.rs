// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core request/response machinery for the Keen IO event-analytics API.
//!
//! This crate carries everything below the transport: client configuration
//! and credential guards, the query/publish parameter codec, request path
//! and header construction, status-code-driven response interpretation, and
//! the scoped-key cipher. It performs no I/O; the `keen-client` crate pairs
//! it with an HTTP transport.

mod config;
mod error;
mod params;
mod request;
mod response;
mod scoped_key;

pub use config::{ClientConfig, KeyTier, DEFAULT_API_URL, DEFAULT_API_VERSION};
pub use error::{KeenError, Result};
pub use params::{strip_null_values, QueryParams};
pub use request::{
	user_agent, AnalysisType, ApiRequest, RequestBuilder, RequestMode, Resource, SDK_NAME,
	SDK_VERSION,
};
pub use response::{interpret, unwrap_result, ResultFormat};
pub use scoped_key::{KeyScheme, ScopedKey, IV_LEN};

// The http crate's types form the seam to the transport; re-exported so the
// client crate and the core always agree on versions.
pub use http::{HeaderMap, Method};
