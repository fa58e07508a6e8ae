// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration: project id, credential tiers, endpoint settings.
//!
//! Every facade operation runs the relevant guard (`ensure_project_id`, then
//! the tier-specific `ensure_*_key`) before a request is built, so a missing
//! credential never reaches the network.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{KeenError, Result};

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.keen.io";

/// Default API version path segment.
pub const DEFAULT_API_VERSION: &str = "3.0";

/// The credential tier an operation authenticates with.
///
/// - `Write`: publish events only
/// - `Read`: run queries and fetch results
/// - `Master`: delete/update, collection inspection, key and query management
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyTier {
	/// Write key for publishing events.
	Write,
	/// Read key for analytic queries.
	Read,
	/// Master key for maintenance and administrative operations.
	Master,
}

impl KeyTier {
	/// Returns the string representation ("write", "read" or "master").
	pub fn as_str(&self) -> &'static str {
		match self {
			KeyTier::Write => "write",
			KeyTier::Read => "read",
			KeyTier::Master => "master",
		}
	}
}

impl std::fmt::Display for KeyTier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

/// Configuration for a Keen IO client.
///
/// Created once, mutated only through explicit setters, and treated as
/// immutable while requests are in flight. There is no internal locking;
/// concurrent mutation is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct ClientConfig {
	pub project_id: Option<String>,
	pub write_key: Option<String>,
	pub read_key: Option<String>,
	pub master_key: Option<String>,
	pub api_url: String,
	pub api_version: String,
	pub proxy_url: Option<String>,
	/// Proxy scheme hint: "http", "https", or anything else for all traffic.
	pub proxy_type: Option<String>,
	/// Total per-request timeout.
	pub read_timeout: Option<Duration>,
	/// Connection-establishment timeout.
	pub open_timeout: Option<Duration>,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			project_id: None,
			write_key: None,
			read_key: None,
			master_key: None,
			api_url: DEFAULT_API_URL.to_string(),
			api_version: DEFAULT_API_VERSION.to_string(),
			proxy_url: None,
			proxy_type: None,
			read_timeout: None,
			open_timeout: None,
		}
	}
}

impl ClientConfig {
	/// Creates a configuration with default endpoint settings and no
	/// credentials.
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_project_id(&mut self, project_id: impl Into<String>) -> &mut Self {
		self.project_id = Some(project_id.into());
		self
	}

	pub fn set_write_key(&mut self, write_key: impl Into<String>) -> &mut Self {
		self.write_key = Some(write_key.into());
		self
	}

	pub fn set_read_key(&mut self, read_key: impl Into<String>) -> &mut Self {
		self.read_key = Some(read_key.into());
		self
	}

	pub fn set_master_key(&mut self, master_key: impl Into<String>) -> &mut Self {
		self.master_key = Some(master_key.into());
		self
	}

	pub fn set_api_url(&mut self, api_url: impl Into<String>) -> &mut Self {
		self.api_url = api_url.into();
		self
	}

	pub fn set_api_version(&mut self, api_version: impl Into<String>) -> &mut Self {
		self.api_version = api_version.into();
		self
	}

	/// Fails with a `Configuration` error unless a project id is set.
	pub fn ensure_project_id(&self) -> Result<&str> {
		non_empty(&self.project_id).ok_or_else(|| KeenError::configuration("Project ID must be set"))
	}

	/// Fails with a `Configuration` error unless a write key is set.
	pub fn ensure_write_key(&self) -> Result<&str> {
		non_empty(&self.write_key)
			.ok_or_else(|| KeenError::configuration("Write Key must be set for publishing events"))
	}

	/// Fails with a `Configuration` error unless a read key is set.
	pub fn ensure_read_key(&self) -> Result<&str> {
		non_empty(&self.read_key)
			.ok_or_else(|| KeenError::configuration("Read Key must be set for queries"))
	}

	/// Fails with a `Configuration` error unless a master key is set.
	pub fn ensure_master_key(&self) -> Result<&str> {
		non_empty(&self.master_key)
			.ok_or_else(|| KeenError::configuration("Master Key must be set for maintenance operations"))
	}

	/// Resolves the credential for the given tier, failing if it is unset.
	pub fn ensure_key(&self, tier: KeyTier) -> Result<&str> {
		match tier {
			KeyTier::Write => self.ensure_write_key(),
			KeyTier::Read => self.ensure_read_key(),
			KeyTier::Master => self.ensure_master_key(),
		}
	}
}

fn non_empty(field: &Option<String>) -> Option<&str> {
	field.as_deref().filter(|value| !value.is_empty())
}
