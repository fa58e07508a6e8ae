// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query/publish parameter codec.
//!
//! Transforms a parameter mapping into wire form. Structured sub-parameters
//! (`filters`, `steps`, `analyses`, absolute `timeframe` objects, `group_by`
//! and `property_names` lists) are JSON-encoded into strings, numeric fields
//! are stringified, and nil-valued entries are stripped, before the whole
//! mapping is rendered either as an RFC 3986 query string or as a JSON body.

use serde_json::{Map, Value};

use crate::error::Result;

/// Parameter names whose values are JSON-encoded lists of mappings.
const JSON_LIST_PARAMS: [&str; 3] = ["filters", "steps", "analyses"];

/// A builder for query and publish parameters.
///
/// # Example
///
/// ```
/// use keen_core::QueryParams;
/// use serde_json::json;
///
/// let params = QueryParams::new()
///     .insert("event_collection", "purchases")
///     .insert("target_property", "price")
///     .insert("group_by", json!(["campaign.id"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
	inner: Map<String, Value>,
}

impl QueryParams {
	/// Creates an empty parameter mapping.
	pub fn new() -> Self {
		Self { inner: Map::new() }
	}

	/// Inserts a key-value pair, replacing any previous value for the key.
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	/// Inserts through a mutable reference, for call sites that already own
	/// the params.
	pub fn set<K, V>(&mut self, key: K, value: V) -> &mut Self
	where
		K: Into<String>,
		V: Into<Value>,
	{
		self.inner.insert(key.into(), value.into());
		self
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.inner.get(key)
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	/// Renders the parameters as a percent-encoded query string.
	///
	/// An empty mapping renders as an empty string. Pairs whose value
	/// encodes to nothing are omitted rather than emitted as `key=`.
	pub fn to_query_string(&self) -> Result<String> {
		let normalized = self.preprocess()?;
		let mut pairs = Vec::with_capacity(normalized.len());
		for (key, value) in &normalized {
			let rendered = render_value(value)?;
			if rendered.is_empty() {
				continue;
			}
			pairs.push(format!("{key}={}", urlencoding::encode(&rendered)));
		}
		Ok(pairs.join("&"))
	}

	/// Renders the parameters as a JSON request body.
	///
	/// The same normalization applies as for the query-string form, but no
	/// percent-encoding; an empty mapping renders as `{}`.
	pub fn to_json_body(&self) -> Result<String> {
		let normalized = self.preprocess()?;
		Ok(serde_json::to_string(&Value::Object(normalized))?)
	}

	/// Applies the normalization pipeline in its fixed order: nil removal,
	/// then JSON-encoding of the structured sub-parameters, then numeric
	/// stringification.
	fn preprocess(&self) -> Result<Map<String, Value>> {
		let mut out = Map::new();
		for (key, value) in &self.inner {
			if value.is_null() {
				continue;
			}
			out.insert(key.clone(), value.clone());
		}

		for key in JSON_LIST_PARAMS {
			if let Some(value) = out.get(key) {
				if !value.is_string() {
					let encoded = serde_json::to_string(value)?;
					out.insert(key.to_string(), Value::String(encoded));
				}
			}
		}

		// Absolute timeframes are objects; relative ones ("this_2_hours")
		// stay as plain strings.
		if let Some(value) = out.get("timeframe") {
			if value.is_object() {
				let encoded = serde_json::to_string(value)?;
				out.insert("timeframe".to_string(), Value::String(encoded));
			}
		}

		if let Some(value) = out.get("group_by") {
			if value.is_array() {
				let encoded = serde_json::to_string(value)?;
				out.insert("group_by".to_string(), Value::String(encoded));
			}
		}

		// Invalid max_age values are dropped, not errored.
		if let Some(value) = out.get("max_age") {
			if let Value::Number(n) = value {
				let stringified = n.to_string();
				out.insert("max_age".to_string(), Value::String(stringified));
			} else {
				out.remove("max_age");
			}
		}

		if let Some(Value::Number(n)) = out.get("percentile") {
			let stringified = n.to_string();
			out.insert("percentile".to_string(), Value::String(stringified));
		}

		if let Some(value) = out.get("property_names") {
			if value.is_array() {
				let encoded = serde_json::to_string(value)?;
				out.insert("property_names".to_string(), Value::String(encoded));
			}
		}

		Ok(out)
	}
}

impl From<Map<String, Value>> for QueryParams {
	fn from(inner: Map<String, Value>) -> Self {
		Self { inner }
	}
}

impl From<QueryParams> for Value {
	fn from(params: QueryParams) -> Self {
		Value::Object(params.inner)
	}
}

/// Renders a normalized value as query-string text. Anything structured that
/// survived normalization under an unspecified key is JSON-encoded rather
/// than rejected.
fn render_value(value: &Value) -> Result<String> {
	match value {
		Value::String(s) => Ok(s.clone()),
		Value::Bool(b) => Ok(b.to_string()),
		Value::Number(n) => Ok(n.to_string()),
		Value::Array(_) | Value::Object(_) => Ok(serde_json::to_string(value)?),
		Value::Null => Ok(String::new()),
	}
}

/// Removes nil-valued entries from a mapping, one nested level deep.
///
/// The API treats missing attributes as nil, so resource bodies (saved
/// queries, dataset definitions) are stripped before transmission.
pub fn strip_null_values(value: &Value) -> Value {
	match value {
		Value::Object(map) => {
			let mut out = Map::new();
			for (key, inner) in map {
				if inner.is_null() {
					continue;
				}
				if inner.is_object() {
					out.insert(key.clone(), strip_null_values(inner));
				} else {
					out.insert(key.clone(), inner.clone());
				}
			}
			Value::Object(out)
		}
		other => other.clone(),
	}
}
