// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cached datasets: server-side precomputed query results indexed by a
//! property.
//!
//! Listing and definition management use the master key; result fetches use
//! the read key unless the caller hands in an explicit (typically scoped)
//! key.

use serde_json::{json, Value};

use keen_core::{
	strip_null_values, KeenError, KeyTier, Method, QueryParams, RequestMode, Resource, Result,
};

use crate::client::KeenClient;

/// Cached-dataset operations, borrowed from a [`KeenClient`].
#[derive(Debug, Clone, Copy)]
pub struct CachedDatasets<'a> {
	client: &'a KeenClient,
}

impl<'a> CachedDatasets<'a> {
	pub(crate) fn new(client: &'a KeenClient) -> Self {
		Self { client }
	}

	/// Lists dataset definitions, paginated by `limit` and `after_name`.
	pub async fn list(&self, limit: Option<u64>, after_name: Option<&str>) -> Result<Value> {
		let mut params = QueryParams::new();
		if let Some(limit) = limit {
			params.set("limit", limit);
		}
		if let Some(after_name) = after_name {
			params.set("after_name", after_name);
		}
		let request = self.client.request_builder().build(
			Method::GET,
			Resource::Datasets,
			KeyTier::Master,
			Some(&params),
			None,
			RequestMode::Sync,
		)?;
		self.client.execute(request).await
	}

	/// Fetches a single dataset definition.
	pub async fn get_definition(&self, dataset_name: &str) -> Result<Value> {
		check_name(dataset_name)?;
		let request = self.client.request_builder().build(
			Method::GET,
			Resource::Dataset(dataset_name),
			KeyTier::Master,
			None,
			None,
			RequestMode::Sync,
		)?;
		self.client.execute(request).await
	}

	/// Fetches precomputed results for one index value over a timeframe.
	///
	/// Uses the read key unless `api_key` supplies an explicit credential.
	pub async fn get_results(
		&self,
		dataset_name: &str,
		timeframe: Value,
		index_by: &str,
		api_key: Option<&str>,
	) -> Result<Value> {
		check_name(dataset_name)?;
		let params = QueryParams::new()
			.insert("timeframe", timeframe)
			.insert("index_by", index_by);

		let builder = self.client.request_builder();
		let request = match api_key {
			Some(key) => builder.build_with_key(
				Method::GET,
				Resource::DatasetResults(dataset_name),
				key,
				Some(&params),
				None,
				RequestMode::Sync,
			)?,
			None => builder.build(
				Method::GET,
				Resource::DatasetResults(dataset_name),
				KeyTier::Read,
				Some(&params),
				None,
				RequestMode::Sync,
			)?,
		};
		self.client.execute(request).await
	}

	/// Creates a dataset definition. Nil-valued attributes in the query are
	/// stripped before transmission.
	pub async fn create(
		&self,
		dataset_name: &str,
		index_by: &str,
		query: Value,
		display_name: &str,
	) -> Result<Value> {
		check_name(dataset_name)?;
		let body = serde_json::to_string(&json!({
			"query": strip_null_values(&query),
			"index_by": index_by,
			"display_name": display_name,
		}))?;
		let request = self.client.request_builder().build(
			Method::PUT,
			Resource::Dataset(dataset_name),
			KeyTier::Master,
			None,
			Some(body),
			RequestMode::Sync,
		)?;
		self.client.execute(request).await
	}

	/// Deletes a dataset definition. The API answers 204, surfaced as
	/// `true`.
	pub async fn delete(&self, dataset_name: &str) -> Result<Value> {
		check_name(dataset_name)?;
		let request = self.client.request_builder().build(
			Method::DELETE,
			Resource::Dataset(dataset_name),
			KeyTier::Master,
			None,
			None,
			RequestMode::Sync,
		)?;
		self.client.execute(request).await
	}
}

fn check_name(dataset_name: &str) -> Result<()> {
	if dataset_name.is_empty() {
		return Err(KeenError::invalid_argument("dataset name can not be empty"));
	}
	Ok(())
}
