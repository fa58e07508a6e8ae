// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request construction: resource paths, credential selection, headers.
//!
//! Every API operation maps to a resource under
//! `/{version}/projects/{project_id}/...`, a credential tier, and an HTTP
//! method. The builder runs the configuration guards (project id first, then
//! the tier credential), renders the path and query string, and assembles
//! the header set.

use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::Method;
use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, KeyTier};
use crate::error::{KeenError, Result};
use crate::params::QueryParams;

/// SDK name reported in the User-Agent header.
pub const SDK_NAME: &str = "keen-rs";

/// SDK version reported in the User-Agent header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether the request is issued on the awaited path or the spawned
/// (fire-and-forget) publish path. Reported in the User-Agent header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
	#[default]
	Sync,
	Async,
}

impl RequestMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			RequestMode::Sync => "sync",
			RequestMode::Async => "async",
		}
	}
}

/// Builds the User-Agent string: SDK name, version, sync/async mode, and
/// the compile-time target platform.
pub fn user_agent(mode: RequestMode) -> String {
	format!(
		"{}, v{}, {}, {}-{}",
		SDK_NAME,
		SDK_VERSION,
		mode.as_str(),
		std::env::consts::OS,
		std::env::consts::ARCH
	)
}

/// The analysis kind of an aggregate query.
///
/// All analysis types share one request shape; the type only selects the
/// final path segment and which parameters the service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
	Count,
	CountUnique,
	Minimum,
	Maximum,
	Sum,
	Average,
	Median,
	Percentile,
	SelectUnique,
	Extraction,
	Funnel,
	MultiAnalysis,
}

impl AnalysisType {
	/// Returns the path segment for this analysis type.
	pub fn as_str(&self) -> &'static str {
		match self {
			AnalysisType::Count => "count",
			AnalysisType::CountUnique => "count_unique",
			AnalysisType::Minimum => "minimum",
			AnalysisType::Maximum => "maximum",
			AnalysisType::Sum => "sum",
			AnalysisType::Average => "average",
			AnalysisType::Median => "median",
			AnalysisType::Percentile => "percentile",
			AnalysisType::SelectUnique => "select_unique",
			AnalysisType::Extraction => "extraction",
			AnalysisType::Funnel => "funnel",
			AnalysisType::MultiAnalysis => "multi_analysis",
		}
	}

	/// Returns `true` when the analysis runs over explicit steps rather
	/// than a single event collection.
	pub fn is_collection_less(&self) -> bool {
		matches!(self, AnalysisType::Funnel)
	}
}

impl std::fmt::Display for AnalysisType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl std::str::FromStr for AnalysisType {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"count" => Ok(AnalysisType::Count),
			"count_unique" => Ok(AnalysisType::CountUnique),
			"minimum" => Ok(AnalysisType::Minimum),
			"maximum" => Ok(AnalysisType::Maximum),
			"sum" => Ok(AnalysisType::Sum),
			"average" => Ok(AnalysisType::Average),
			"median" => Ok(AnalysisType::Median),
			"percentile" => Ok(AnalysisType::Percentile),
			"select_unique" => Ok(AnalysisType::SelectUnique),
			"extraction" => Ok(AnalysisType::Extraction),
			"funnel" => Ok(AnalysisType::Funnel),
			"multi_analysis" => Ok(AnalysisType::MultiAnalysis),
			_ => Err(format!("unknown analysis type: {s}")),
		}
	}
}

/// An addressable API resource below the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
	/// The project itself (`GET` returns project info).
	Project,
	/// The events root: batch publish, or collection listing with the
	/// master key.
	Events,
	/// A single event collection. The name is percent-escaped so that `/`
	/// never splits the path.
	EventCollection(&'a str),
	/// An aggregate query endpoint.
	Query(AnalysisType),
	/// The saved-queries listing.
	SavedQueries,
	/// A single saved query.
	SavedQuery(&'a str),
	/// The cached result of a saved query.
	SavedQueryResult(&'a str),
	/// The access-keys listing.
	AccessKeys,
	/// A single access key.
	AccessKey(&'a str),
	/// The revoke action on an access key.
	AccessKeyRevoke(&'a str),
	/// The unrevoke action on an access key.
	AccessKeyUnrevoke(&'a str),
	/// The cached-datasets listing.
	Datasets,
	/// A single cached dataset definition.
	Dataset(&'a str),
	/// The precomputed results of a cached dataset.
	DatasetResults(&'a str),
}

impl Resource<'_> {
	fn segment(&self) -> String {
		match self {
			Resource::Project => String::new(),
			Resource::Events => "/events".to_string(),
			Resource::EventCollection(name) => {
				format!("/events/{}", urlencoding::encode(name))
			}
			Resource::Query(analysis) => format!("/queries/{}", analysis.as_str()),
			Resource::SavedQueries => "/queries/saved".to_string(),
			Resource::SavedQuery(name) => format!("/queries/saved/{}", urlencoding::encode(name)),
			Resource::SavedQueryResult(name) => {
				format!("/queries/saved/{}/result", urlencoding::encode(name))
			}
			Resource::AccessKeys => "/keys".to_string(),
			Resource::AccessKey(key) => format!("/keys/{}", urlencoding::encode(key)),
			Resource::AccessKeyRevoke(key) => format!("/keys/{}/revoke", urlencoding::encode(key)),
			Resource::AccessKeyUnrevoke(key) => {
				format!("/keys/{}/unrevoke", urlencoding::encode(key))
			}
			Resource::Datasets => "/datasets".to_string(),
			Resource::Dataset(name) => format!("/datasets/{}", urlencoding::encode(name)),
			Resource::DatasetResults(name) => {
				format!("/datasets/{}/results", urlencoding::encode(name))
			}
		}
	}
}

/// A fully-assembled request, ready for the transport.
#[derive(Debug)]
pub struct ApiRequest {
	pub method: Method,
	/// Absolute path below the API host, query string included.
	pub path: String,
	pub headers: HeaderMap,
	pub body: Option<String>,
}

/// Assembles requests against a client configuration.
#[derive(Debug, Clone, Copy)]
pub struct RequestBuilder<'a> {
	config: &'a ClientConfig,
}

impl<'a> RequestBuilder<'a> {
	pub fn new(config: &'a ClientConfig) -> Self {
		Self { config }
	}

	/// Renders the resource path below the API host, without query string.
	///
	/// Runs the project-id guard only; used by callers that assemble URLs
	/// (not requests), like `query_url`.
	pub fn resource_path(&self, resource: Resource<'_>) -> Result<String> {
		let project_id = self.config.ensure_project_id()?;
		Ok(format!(
			"/{}/projects/{}{}",
			self.config.api_version,
			project_id,
			resource.segment()
		))
	}

	/// Builds a request authenticated with the given credential tier.
	///
	/// Guard order is fixed: project id first, then the tier credential.
	pub fn build(
		&self,
		method: Method,
		resource: Resource<'_>,
		tier: KeyTier,
		query: Option<&QueryParams>,
		body: Option<String>,
		mode: RequestMode,
	) -> Result<ApiRequest> {
		self.config.ensure_project_id()?;
		let key = self.config.ensure_key(tier)?.to_string();
		self.build_with_key(method, resource, &key, query, body, mode)
	}

	/// Builds a request authenticated with an explicit credential, bypassing
	/// tier selection. Used where the caller supplies a key directly (e.g.
	/// fetching cached-dataset results with a handed-out key).
	pub fn build_with_key(
		&self,
		method: Method,
		resource: Resource<'_>,
		api_key: &str,
		query: Option<&QueryParams>,
		body: Option<String>,
		mode: RequestMode,
	) -> Result<ApiRequest> {
		let mut path = self.resource_path(resource)?;
		if let Some(params) = query {
			let query_string = params.to_query_string()?;
			if !query_string.is_empty() {
				path.push('?');
				path.push_str(&query_string);
			}
		}

		Ok(ApiRequest {
			method,
			path,
			headers: self.headers(api_key, mode)?,
			body,
		})
	}

	fn headers(&self, api_key: &str, mode: RequestMode) -> Result<HeaderMap> {
		let mut headers = HeaderMap::with_capacity(3);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(
			USER_AGENT,
			HeaderValue::from_str(&user_agent(mode))
				.map_err(|_| KeenError::invalid_argument("User-Agent contains invalid characters"))?,
		);
		headers.insert(
			AUTHORIZATION,
			HeaderValue::from_str(api_key)
				.map_err(|_| KeenError::invalid_argument("API key contains invalid header characters"))?,
		);
		Ok(headers)
	}
}
