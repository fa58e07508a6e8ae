// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end maintenance tests: delete, update, collection inspection.

mod common;

use common::{client_for, MASTER_KEY, PROJECT_ID};
use keen_client::KeenError;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn delete_with_filters_uses_master_key_and_returns_true() {
	let server = MockServer::start().await;
	let filters = json!([{"property_name": "delete", "operator": "eq", "property_value": "me"}]);
	Mock::given(method("DELETE"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/foodstuffs")))
		.and(query_param("filters", serde_json::to_string(&filters).unwrap().as_str()))
		.and(header("authorization", MASTER_KEY))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	let response = client.delete("foodstuffs", Some(filters)).await.unwrap();
	assert_eq!(response, Value::Bool(true));
}

#[tokio::test]
async fn delete_without_filters_has_no_query_string() {
	let server = MockServer::start().await;
	Mock::given(method("DELETE"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/users")))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	client.delete("users", None).await.unwrap();

	let requests = server.received_requests().await.unwrap();
	assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn update_puts_the_full_params_body() {
	let server = MockServer::start().await;
	let params = json!({
		"property_updates": [{"property_name": "tier", "property_value": "pro"}],
		"filters": [{"property_name": "account_id", "operator": "eq", "property_value": 123}],
		"timeframe": "this_7_days"
	});
	Mock::given(method("PUT"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/users")))
		.and(header("authorization", MASTER_KEY))
		.and(body_json(params.clone()))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({"updated": 4})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	let response = client.update("users", params).await.unwrap();
	assert_eq!(response, json!({"updated": 4}));
}

#[tokio::test]
async fn update_batch_validates_each_entry() {
	let server = MockServer::start().await;
	let client = client_for(&server);

	// Second entry is missing its timeframe.
	let params = json!({
		"batch_update": [
			{
				"property_updates": [{"property_name": "tier", "property_value": "pro"}],
				"filters": [],
				"timeframe": "this_7_days"
			},
			{
				"property_updates": [{"property_name": "tier", "property_value": "free"}],
				"filters": []
			}
		]
	});
	let err = client.update_batch("users", params).await.unwrap_err();
	assert!(matches!(err, KeenError::InvalidArgument { .. }));
	assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn event_collections_listing_uses_master_key() {
	let server = MockServer::start().await;
	let listing = json!([{"name": "users", "properties": {"name": "string"}}]);
	Mock::given(method("GET"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events")))
		.and(header("authorization", MASTER_KEY))
		.respond_with(ResponseTemplate::new(200).set_body_json(listing.clone()))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	assert_eq!(client.event_collections().await.unwrap(), listing);
}

#[tokio::test]
async fn project_info_hits_the_project_root() {
	let server = MockServer::start().await;
	let info = json!({"id": PROJECT_ID, "name": "analytics"});
	Mock::given(method("GET"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}")))
		.and(header("authorization", MASTER_KEY))
		.respond_with(ResponseTemplate::new(200).set_body_json(info.clone()))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	assert_eq!(client.project_info().await.unwrap(), info);
}

#[tokio::test]
async fn missing_collection_maps_to_not_found() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/ghosts")))
		.respond_with(ResponseTemplate::new(404).set_body_string("no such collection"))
		.mount(&server)
		.await;

	let client = client_for(&server);
	let err = client.event_collection("ghosts").await.unwrap_err();
	assert!(matches!(err, KeenError::NotFound { body } if body == "no such collection"));
}

#[tokio::test]
async fn unexpected_statuses_map_to_generic_http_error() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events")))
		.respond_with(ResponseTemplate::new(503).set_body_string("maintenance window"))
		.mount(&server)
		.await;

	let client = client_for(&server);
	let err = client.event_collections().await.unwrap_err();
	assert!(
		matches!(err, KeenError::Http { status: 503, body } if body == "maintenance window")
	);
}

#[tokio::test]
async fn malformed_success_body_yields_empty_object() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events")))
		.respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
		.mount(&server)
		.await;

	let client = client_for(&server);
	assert_eq!(client.event_collections().await.unwrap(), json!({}));
}
