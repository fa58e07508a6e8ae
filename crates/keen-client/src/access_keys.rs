// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access-key management: scoped credentials issued and revoked server-side.
//!
//! All operations require the master key. Key bodies are opaque mappings;
//! this facade only handles paths, credentials, and status interpretation.

use serde_json::Value;

use keen_core::{KeenError, KeyTier, Method, RequestMode, Resource, Result};

use crate::client::KeenClient;

/// Access-key operations, borrowed from a [`KeenClient`].
#[derive(Debug, Clone, Copy)]
pub struct AccessKeys<'a> {
	client: &'a KeenClient,
}

impl<'a> AccessKeys<'a> {
	pub(crate) fn new(client: &'a KeenClient) -> Self {
		Self { client }
	}

	/// Lists every access key in the project.
	pub async fn all(&self) -> Result<Value> {
		self.send(Method::GET, Resource::AccessKeys, None).await
	}

	/// Fetches a single access key.
	pub async fn get(&self, key: &str) -> Result<Value> {
		check_key(key)?;
		self.send(Method::GET, Resource::AccessKey(key), None).await
	}

	/// Creates an access key from a definition body.
	pub async fn create(&self, key_body: Value) -> Result<Value> {
		let body = serde_json::to_string(&key_body)?;
		self.send(Method::POST, Resource::AccessKeys, Some(body)).await
	}

	/// Replaces an access key's definition.
	pub async fn update(&self, key: &str, key_body: Value) -> Result<Value> {
		check_key(key)?;
		let body = serde_json::to_string(&key_body)?;
		self.send(Method::POST, Resource::AccessKey(key), Some(body))
			.await
	}

	/// Revokes a key without deleting it.
	pub async fn revoke(&self, key: &str) -> Result<Value> {
		check_key(key)?;
		self.send(Method::POST, Resource::AccessKeyRevoke(key), None)
			.await
	}

	/// Restores a previously revoked key.
	pub async fn unrevoke(&self, key: &str) -> Result<Value> {
		check_key(key)?;
		self.send(Method::POST, Resource::AccessKeyUnrevoke(key), None)
			.await
	}

	/// Permanently deletes a key. The API answers 204, surfaced as `true`.
	pub async fn delete(&self, key: &str) -> Result<Value> {
		check_key(key)?;
		self.send(Method::DELETE, Resource::AccessKey(key), None)
			.await
	}

	async fn send(
		&self,
		method: Method,
		resource: Resource<'_>,
		body: Option<String>,
	) -> Result<Value> {
		let request = self.client.request_builder().build(
			method,
			resource,
			KeyTier::Master,
			None,
			body,
			RequestMode::Sync,
		)?;
		self.client.execute(request).await
	}
}

fn check_key(key: &str) -> Result<()> {
	if key.is_empty() {
		return Err(KeenError::invalid_argument("access key can not be empty"));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_key_is_rejected_before_any_request() {
		let client = KeenClient::builder()
			.project_id("project-id")
			.master_key("mk")
			.build()
			.unwrap();
		let result = tokio_test::block_on(client.access_keys().revoke(""));
		assert!(matches!(result, Err(KeenError::InvalidArgument { .. })));
	}
}
