// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Saved-query management.
//!
//! Definition reads and writes use the master key; fetching a saved query's
//! cached result uses the read key, matching the service's credential rules.

use serde_json::Value;

use keen_core::{strip_null_values, KeenError, KeyTier, Method, RequestMode, Resource, Result};

use crate::client::KeenClient;

/// Saved-query operations, borrowed from a [`KeenClient`].
#[derive(Debug, Clone, Copy)]
pub struct SavedQueries<'a> {
	client: &'a KeenClient,
}

impl<'a> SavedQueries<'a> {
	pub(crate) fn new(client: &'a KeenClient) -> Self {
		Self { client }
	}

	/// Lists every saved query definition.
	pub async fn all(&self) -> Result<Value> {
		self.send(Method::GET, Resource::SavedQueries, KeyTier::Master, None)
			.await
	}

	/// Fetches a saved query definition, or with `results` its latest
	/// result (read-key operation).
	pub async fn get(&self, query_name: &str, results: bool) -> Result<Value> {
		check_name(query_name)?;
		if results {
			self.send(
				Method::GET,
				Resource::SavedQueryResult(query_name),
				KeyTier::Read,
				None,
			)
			.await
		} else {
			self.send(
				Method::GET,
				Resource::SavedQuery(query_name),
				KeyTier::Master,
				None,
			)
			.await
		}
	}

	/// Creates a saved query. Nil-valued attributes are stripped; the API
	/// treats missing attributes as nil anyway.
	pub async fn create(&self, query_name: &str, query_body: Value) -> Result<Value> {
		check_name(query_name)?;
		let body = serde_json::to_string(&strip_null_values(&query_body))?;
		self.send(
			Method::PUT,
			Resource::SavedQuery(query_name),
			KeyTier::Master,
			Some(body),
		)
		.await
	}

	/// Replaces a saved query definition. Same request shape as `create`.
	pub async fn update(&self, query_name: &str, query_body: Value) -> Result<Value> {
		self.create(query_name, query_body).await
	}

	/// Deletes a saved query. The API answers 204, surfaced as `true`.
	pub async fn delete(&self, query_name: &str) -> Result<Value> {
		check_name(query_name)?;
		self.send(
			Method::DELETE,
			Resource::SavedQuery(query_name),
			KeyTier::Master,
			None,
		)
		.await
	}

	async fn send(
		&self,
		method: Method,
		resource: Resource<'_>,
		tier: KeyTier,
		body: Option<String>,
	) -> Result<Value> {
		let request = self.client.request_builder().build(
			method,
			resource,
			tier,
			None,
			body,
			RequestMode::Sync,
		)?;
		self.client.execute(request).await
	}
}

fn check_name(query_name: &str) -> Result<()> {
	if query_name.is_empty() {
		return Err(KeenError::invalid_argument("saved query name can not be empty"));
	}
	Ok(())
}
