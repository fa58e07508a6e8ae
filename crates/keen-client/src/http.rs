// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP client construction from the client configuration.
//!
//! Timeouts and proxy settings flow from `ClientConfig`; everything else is
//! reqwest defaults. The User-Agent is set per request (it reports the
//! sync/async mode), not on the client.

use keen_core::{ClientConfig, KeenError, Result};

/// Builds the reqwest client for a configuration.
///
/// The read timeout caps the whole request; the open timeout caps connection
/// establishment only.
pub(crate) fn build_client(config: &ClientConfig) -> Result<reqwest::Client> {
	let mut builder = reqwest::Client::builder();

	if let Some(timeout) = config.read_timeout {
		builder = builder.timeout(timeout);
	}
	if let Some(timeout) = config.open_timeout {
		builder = builder.connect_timeout(timeout);
	}

	if let Some(url) = &config.proxy_url {
		let proxy = match config.proxy_type.as_deref() {
			Some("http") => reqwest::Proxy::http(url),
			Some("https") => reqwest::Proxy::https(url),
			_ => reqwest::Proxy::all(url),
		}
		.map_err(|error| KeenError::Configuration {
			message: format!("invalid proxy url: {error}"),
		})?;
		builder = builder.proxy(proxy);
	}

	builder.build().map_err(|error| KeenError::Configuration {
		message: format!("failed to build HTTP client: {error}"),
	})
}
