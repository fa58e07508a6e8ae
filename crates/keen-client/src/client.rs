// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The Keen IO client: publish, query, and maintenance operations.
//!
//! Every operation is a stateless request/response transaction: guard
//! checks, parameter encoding, request construction, one transport call,
//! response interpretation. Nothing is retried; a failed request surfaces
//! immediately.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use keen_core::{
	unwrap_result, AnalysisType, ApiRequest, ClientConfig, KeenError, KeyTier, Method, QueryParams,
	RequestBuilder, RequestMode, Resource, Result, ResultFormat,
};

use crate::access_keys::AccessKeys;
use crate::cached_datasets::CachedDatasets;
use crate::http;
use crate::saved_queries::SavedQueries;

/// Per-call options for analytic queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
	/// Return the full response object instead of unwrapping `"result"`.
	pub all_keys: bool,
	/// Send the parameters as a POST body instead of a query string. Avoids
	/// URL length limits for large filter sets.
	pub post_body: bool,
}

/// Builder for [`KeenClient`].
///
/// # Example
///
/// ```ignore
/// let client = KeenClient::builder()
///     .project_id("5c3f...")
///     .write_key("e4f5...")
///     .read_key("a1b2...")
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct KeenClientBuilder {
	config: ClientConfig,
}

impl KeenClientBuilder {
	pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
		self.config.set_project_id(project_id);
		self
	}

	pub fn write_key(mut self, write_key: impl Into<String>) -> Self {
		self.config.set_write_key(write_key);
		self
	}

	pub fn read_key(mut self, read_key: impl Into<String>) -> Self {
		self.config.set_read_key(read_key);
		self
	}

	pub fn master_key(mut self, master_key: impl Into<String>) -> Self {
		self.config.set_master_key(master_key);
		self
	}

	pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
		self.config.set_api_url(api_url);
		self
	}

	pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
		self.config.set_api_version(api_version);
		self
	}

	pub fn proxy_url(mut self, proxy_url: impl Into<String>) -> Self {
		self.config.proxy_url = Some(proxy_url.into());
		self
	}

	pub fn proxy_type(mut self, proxy_type: impl Into<String>) -> Self {
		self.config.proxy_type = Some(proxy_type.into());
		self
	}

	pub fn read_timeout(mut self, timeout: Duration) -> Self {
		self.config.read_timeout = Some(timeout);
		self
	}

	pub fn open_timeout(mut self, timeout: Duration) -> Self {
		self.config.open_timeout = Some(timeout);
		self
	}

	pub fn build(self) -> Result<KeenClient> {
		KeenClient::new(self.config)
	}
}

/// Client for the Keen IO event-analytics API.
///
/// Cheap to clone; the configuration is immutable after construction and the
/// underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct KeenClient {
	config: Arc<ClientConfig>,
	http: reqwest::Client,
}

impl KeenClient {
	pub fn builder() -> KeenClientBuilder {
		KeenClientBuilder::default()
	}

	/// Creates a client from an explicit configuration.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let http = http::build_client(&config)?;
		Ok(Self {
			config: Arc::new(config),
			http,
		})
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub(crate) fn request_builder(&self) -> RequestBuilder<'_> {
		RequestBuilder::new(&self.config)
	}

	/// Issues a built request and interprets the response.
	pub(crate) async fn execute(&self, request: ApiRequest) -> Result<Value> {
		let url = format!("{}{}", self.config.api_url, request.path);
		debug!(method = %request.method, path = %request.path, "issuing API request");

		let mut outgoing = self.http.request(request.method, &url).headers(request.headers);
		if let Some(body) = request.body {
			outgoing = outgoing.body(body);
		}

		let response = outgoing
			.send()
			.await
			.map_err(|error| KeenError::transport(format!("request to {url} failed"), error))?;
		let status = response.status().as_u16();
		let body = response
			.text()
			.await
			.map_err(|error| KeenError::transport("failed reading response body", error))?;

		keen_core::interpret(status, &body)
	}

	// ---- publishing -----------------------------------------------------

	/// Publishes a single event to a collection. Requires the write key.
	///
	/// The success body is `{"created": true}`.
	pub async fn publish(&self, event_collection: &str, properties: Value) -> Result<Value> {
		check_event_data(event_collection, &properties)?;
		let body = serde_json::to_string(&properties)?;
		let request = self.request_builder().build(
			Method::POST,
			Resource::EventCollection(event_collection),
			KeyTier::Write,
			None,
			Some(body),
			RequestMode::Sync,
		)?;
		self.execute(request).await
	}

	/// Publishes a batch of events. Requires the write key.
	///
	/// `events` maps collection names to lists of event property mappings;
	/// the response maps each collection to per-event `{success, error?}`
	/// outcomes.
	pub async fn publish_batch(&self, events: Value) -> Result<Value> {
		if !events.is_object() {
			return Err(KeenError::invalid_argument(
				"batch events must be a mapping of collection names to event lists",
			));
		}
		let body = serde_json::to_string(&events)?;
		let request = self.request_builder().build(
			Method::POST,
			Resource::Events,
			KeyTier::Write,
			None,
			Some(body),
			RequestMode::Sync,
		)?;
		self.execute(request).await
	}

	/// Publishes a single event without blocking the caller.
	///
	/// Returns a handle resolving to the same interpreted outcome `publish`
	/// would produce; transport failures arrive through the handle, never on
	/// the calling task. Cancellation is not supported.
	pub fn publish_async(
		&self,
		event_collection: &str,
		properties: Value,
	) -> tokio::task::JoinHandle<Result<Value>> {
		let client = self.clone();
		let collection = event_collection.to_string();
		tokio::spawn(async move {
			check_event_data(&collection, &properties)?;
			let body = serde_json::to_string(&properties)?;
			let request = client.request_builder().build(
				Method::POST,
				Resource::EventCollection(&collection),
				KeyTier::Write,
				None,
				Some(body),
				RequestMode::Async,
			)?;
			client.execute(request).await
		})
	}

	/// Batch variant of [`publish_async`](Self::publish_async).
	pub fn publish_batch_async(&self, events: Value) -> tokio::task::JoinHandle<Result<Value>> {
		let client = self.clone();
		tokio::spawn(async move {
			if !events.is_object() {
				return Err(KeenError::invalid_argument(
					"batch events must be a mapping of collection names to event lists",
				));
			}
			let body = serde_json::to_string(&events)?;
			let request = client.request_builder().build(
				Method::POST,
				Resource::Events,
				KeyTier::Write,
				None,
				Some(body),
				RequestMode::Async,
			)?;
			client.execute(request).await
		})
	}

	// ---- querying -------------------------------------------------------

	/// Runs an analytic query and unwraps the `"result"` key. Requires the
	/// read key.
	///
	/// `event_collection` is `None` for collection-less analyses (funnel);
	/// everything else about the request is carried in `params`.
	pub async fn query(
		&self,
		analysis: AnalysisType,
		event_collection: Option<&str>,
		params: QueryParams,
	) -> Result<Value> {
		self.query_with_options(analysis, event_collection, params, QueryOptions::default())
			.await
	}

	/// Runs an analytic query with explicit result/transport options.
	pub async fn query_with_options(
		&self,
		analysis: AnalysisType,
		event_collection: Option<&str>,
		mut params: QueryParams,
		options: QueryOptions,
	) -> Result<Value> {
		if let Some(collection) = event_collection {
			params.set("event_collection", collection);
		}

		let request = if options.post_body {
			let body = params.to_json_body()?;
			self.request_builder().build(
				Method::POST,
				Resource::Query(analysis),
				KeyTier::Read,
				None,
				Some(body),
				RequestMode::Sync,
			)?
		} else {
			self.request_builder().build(
				Method::GET,
				Resource::Query(analysis),
				KeyTier::Read,
				Some(&params),
				None,
				RequestMode::Sync,
			)?
		};

		let decoded = self.execute(request).await?;
		let format = if options.all_keys {
			ResultFormat::AllKeys
		} else {
			ResultFormat::Result
		};
		Ok(unwrap_result(decoded, format))
	}

	/// Builds the full GET URL for a query without issuing it.
	///
	/// With `include_read_key`, the read key is appended as an `api_key`
	/// parameter so the URL is usable outside the SDK.
	pub fn query_url(
		&self,
		analysis: AnalysisType,
		event_collection: Option<&str>,
		mut params: QueryParams,
		include_read_key: bool,
	) -> Result<String> {
		if let Some(collection) = event_collection {
			params.set("event_collection", collection);
		}
		if include_read_key {
			let read_key = self.config.ensure_read_key()?.to_string();
			params.set("api_key", read_key);
		}

		let path = self
			.request_builder()
			.resource_path(Resource::Query(analysis))?;
		let query_string = params.to_query_string()?;
		if query_string.is_empty() {
			Ok(format!("{}{}", self.config.api_url, path))
		} else {
			Ok(format!("{}{}?{}", self.config.api_url, path, query_string))
		}
	}

	// ---- maintenance ----------------------------------------------------

	/// Deletes an event collection, optionally restricted by filters.
	/// Requires the master key. The API answers 204, surfaced as `true`.
	pub async fn delete(&self, event_collection: &str, filters: Option<Value>) -> Result<Value> {
		check_collection(event_collection)?;
		let mut params = QueryParams::new();
		if let Some(filters) = filters {
			params.set("filters", filters);
		}
		let request = self.request_builder().build(
			Method::DELETE,
			Resource::EventCollection(event_collection),
			KeyTier::Master,
			Some(&params),
			None,
			RequestMode::Sync,
		)?;
		self.execute(request).await
	}

	/// Updates events matching the given filters. Requires the master key.
	///
	/// `params` must carry `property_updates`, `filters`, and `timeframe`.
	pub async fn update(&self, event_collection: &str, params: Value) -> Result<Value> {
		check_collection(event_collection)?;
		check_update_body(&params)?;
		self.put_update(event_collection, params).await
	}

	/// Batch update: `params` carries a `batch_update` list whose entries
	/// each satisfy the single-update shape. Requires the master key.
	pub async fn update_batch(&self, event_collection: &str, params: Value) -> Result<Value> {
		check_collection(event_collection)?;
		let entries = params
			.get("batch_update")
			.and_then(Value::as_array)
			.ok_or_else(|| {
				KeenError::invalid_argument("missing or invalid 'batch_update' in the body")
			})?;
		for entry in entries {
			check_update_body(entry)?;
		}
		self.put_update(event_collection, params).await
	}

	async fn put_update(&self, event_collection: &str, params: Value) -> Result<Value> {
		let body = serde_json::to_string(&params)?;
		let request = self.request_builder().build(
			Method::PUT,
			Resource::EventCollection(event_collection),
			KeyTier::Master,
			None,
			Some(body),
			RequestMode::Sync,
		)?;
		self.execute(request).await
	}

	/// Lists the project's event collections and their schemas. Requires
	/// the master key.
	pub async fn event_collections(&self) -> Result<Value> {
		let request = self.request_builder().build(
			Method::GET,
			Resource::Events,
			KeyTier::Master,
			None,
			None,
			RequestMode::Sync,
		)?;
		self.execute(request).await
	}

	/// Fetches a single collection's schema. Requires the master key.
	pub async fn event_collection(&self, event_collection: &str) -> Result<Value> {
		check_collection(event_collection)?;
		let request = self.request_builder().build(
			Method::GET,
			Resource::EventCollection(event_collection),
			KeyTier::Master,
			None,
			None,
			RequestMode::Sync,
		)?;
		self.execute(request).await
	}

	/// Fetches project metadata. Requires the master key.
	pub async fn project_info(&self) -> Result<Value> {
		let request = self.request_builder().build(
			Method::GET,
			Resource::Project,
			KeyTier::Master,
			None,
			None,
			RequestMode::Sync,
		)?;
		self.execute(request).await
	}

	// ---- resource facades -----------------------------------------------

	/// Access-key management operations.
	pub fn access_keys(&self) -> AccessKeys<'_> {
		AccessKeys::new(self)
	}

	/// Saved-query management operations.
	pub fn saved_queries(&self) -> SavedQueries<'_> {
		SavedQueries::new(self)
	}

	/// Cached-dataset operations.
	pub fn cached_datasets(&self) -> CachedDatasets<'_> {
		CachedDatasets::new(self)
	}
}

fn check_collection(event_collection: &str) -> Result<()> {
	if event_collection.is_empty() {
		return Err(KeenError::invalid_argument("event collection can not be empty"));
	}
	Ok(())
}

fn check_event_data(event_collection: &str, properties: &Value) -> Result<()> {
	check_collection(event_collection)?;
	if properties.is_null() {
		return Err(KeenError::invalid_argument("event properties can not be nil"));
	}
	Ok(())
}

fn check_update_body(params: &Value) -> Result<()> {
	for key in ["property_updates", "filters", "timeframe"] {
		if params.get(key).map_or(true, Value::is_null) {
			return Err(KeenError::invalid_argument(format!(
				"missing '{key}' in the update body"
			)));
		}
	}
	Ok(())
}
