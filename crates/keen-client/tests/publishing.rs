// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end publishing tests against a stubbed API.

mod common;

use common::{client_for, PROJECT_ID, WRITE_KEY};
use keen_client::KeenError;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn publish_posts_one_event_with_write_key() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/users")))
		.and(header("authorization", WRITE_KEY))
		.and(header("content-type", "application/json"))
		.and(body_json(json!({"name": "Bob"})))
		.respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	let response = client.publish("users", json!({"name": "Bob"})).await.unwrap();
	assert_eq!(response, json!({"created": true}));
}

#[tokio::test]
async fn publish_escapes_slashes_in_collection_names() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path(format!(
			"/3.0/projects/{PROJECT_ID}/events/signups%2Fmobile"
		)))
		.respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	let response = client
		.publish("signups/mobile", json!({"device": "ios"}))
		.await
		.unwrap();
	assert_eq!(response, json!({"created": true}));
}

#[tokio::test]
async fn publish_batch_posts_collection_mapping() {
	let server = MockServer::start().await;
	let events = json!({
		"signups": [{"name": "Bob"}, {"name": "Mary"}],
		"purchases": [{"price": 10}]
	});
	let outcome = json!({
		"signups": [{"success": true}, {"success": true}],
		"purchases": [{"success": false, "error": {"name": "InvalidPropertyValueError"}}]
	});
	Mock::given(method("POST"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events")))
		.and(header("authorization", WRITE_KEY))
		.and(body_json(events.clone()))
		.respond_with(ResponseTemplate::new(200).set_body_json(outcome.clone()))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	let response = client.publish_batch(events).await.unwrap();
	assert_eq!(response, outcome);
}

#[tokio::test]
async fn publish_async_resolves_through_the_handle() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/users")))
		.and(header_regex("user-agent", ", async, "))
		.respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	let handle = client.publish_async("users", json!({"name": "Bob"}));
	let response = handle.await.expect("task completes").unwrap();
	assert_eq!(response, json!({"created": true}));
}

#[tokio::test]
async fn publish_async_delivers_errors_through_the_handle() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/users")))
		.respond_with(ResponseTemplate::new(400).set_body_string("bad event"))
		.mount(&server)
		.await;

	let client = client_for(&server);
	let outcome = client
		.publish_async("users", json!({"name": "Bob"}))
		.await
		.expect("task completes");
	assert!(matches!(outcome, Err(KeenError::BadRequest { body }) if body == "bad event"));
}

#[tokio::test]
async fn publish_sync_mode_is_reported_in_user_agent() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path(format!("/3.0/projects/{PROJECT_ID}/events/users")))
		.and(header_regex("user-agent", "^keen-rs, v"))
		.and(header_regex("user-agent", ", sync, "))
		.respond_with(ResponseTemplate::new(201).set_body_json(json!({"created": true})))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server);
	client.publish("users", json!({"name": "Bob"})).await.unwrap();
}

#[tokio::test]
async fn publish_surfaces_transport_failures() {
	let uri = {
		let server = MockServer::start().await;
		server.uri()
		// Server drops here; the port is closed again.
	};
	let client = keen_client::KeenClient::builder()
		.project_id(PROJECT_ID)
		.write_key(WRITE_KEY)
		.api_url(uri)
		.build()
		.unwrap();

	let err = client.publish("users", json!({"name": "Bob"})).await.unwrap_err();
	assert!(matches!(err, KeenError::Transport { .. }));
}

#[tokio::test]
async fn publish_without_write_key_never_reaches_the_network() {
	let server = MockServer::start().await;
	let client = keen_client::KeenClient::builder()
		.project_id(PROJECT_ID)
		.api_url(server.uri())
		.build()
		.unwrap();

	let err = client.publish("users", json!({"name": "Bob"})).await.unwrap_err();
	assert!(matches!(err, KeenError::Configuration { .. }));
	assert!(server.received_requests().await.unwrap().is_empty());
}
