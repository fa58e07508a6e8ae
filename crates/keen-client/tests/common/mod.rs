// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared fixtures for the end-to-end API tests.

use keen_client::KeenClient;
use wiremock::MockServer;

pub const PROJECT_ID: &str = "project-id";
pub const WRITE_KEY: &str = "the-write-key";
pub const READ_KEY: &str = "the-read-key";
pub const MASTER_KEY: &str = "the-master-key";

/// A fully-credentialed client pointed at the mock server.
pub fn client_for(server: &MockServer) -> KeenClient {
	KeenClient::builder()
		.project_id(PROJECT_ID)
		.write_key(WRITE_KEY)
		.read_key(READ_KEY)
		.master_key(MASTER_KEY)
		.api_url(server.uri())
		.build()
		.expect("client builds")
}
