// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Keen IO SDK.

use thiserror::Error;

/// Keen IO SDK errors.
///
/// Pre-flight failures (`Configuration`, `InvalidArgument`) are raised before
/// any request is built; the HTTP family mirrors the API's status codes and
/// carries the raw response body as detail.
#[derive(Debug, Error)]
pub enum KeenError {
	/// A credential or project id required by the operation is not configured.
	#[error("{message}")]
	Configuration { message: String },

	/// A call argument was missing or malformed.
	#[error("invalid argument: {message}")]
	InvalidArgument { message: String },

	/// The API rejected the request as malformed (HTTP 400).
	#[error("bad request: {body}")]
	BadRequest { body: String },

	/// The credential was missing, revoked, or not authorized (HTTP 401).
	#[error("authentication failed: {body}")]
	Authentication { body: String },

	/// The addressed resource does not exist (HTTP 404).
	#[error("not found: {body}")]
	NotFound { body: String },

	/// Any other HTTP status the API returned.
	#[error("HTTP error ({status}): {body}")]
	Http { status: u16, body: String },

	/// The request never produced an HTTP response (connect/read failure).
	#[error("transport failure: {message}")]
	Transport {
		message: String,
		#[source]
		source: Option<Box<dyn std::error::Error + Send + Sync>>,
	},

	/// Scoped-key encryption or decryption failed.
	#[error("cipher error: {message}")]
	Cipher { message: String },

	/// A parameter mapping or payload could not be serialized to JSON.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl KeenError {
	pub(crate) fn configuration(message: impl Into<String>) -> Self {
		KeenError::Configuration {
			message: message.into(),
		}
	}

	/// Builds an `InvalidArgument` error. Public because the facade crate
	/// validates call arguments before handing off to this crate.
	pub fn invalid_argument(message: impl Into<String>) -> Self {
		KeenError::InvalidArgument {
			message: message.into(),
		}
	}

	pub(crate) fn cipher(message: impl Into<String>) -> Self {
		KeenError::Cipher {
			message: message.into(),
		}
	}

	/// Wraps a transport-level failure, retaining the original error as cause.
	pub fn transport(
		message: impl Into<String>,
		source: impl std::error::Error + Send + Sync + 'static,
	) -> Self {
		KeenError::Transport {
			message: message.into(),
			source: Some(Box::new(source)),
		}
	}
}

/// Result type alias for Keen IO operations.
pub type Result<T> = std::result::Result<T, KeenError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn http_errors_carry_raw_body() {
		let err = KeenError::BadRequest {
			body: r#"{"error_code":"InvalidPropertyNameError"}"#.to_string(),
		};
		assert!(err.to_string().contains("InvalidPropertyNameError"));
	}

	#[test]
	fn transport_error_preserves_source() {
		let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
		let err = KeenError::transport("request to api.keen.io failed", io);
		let source = std::error::Error::source(&err).expect("source retained");
		assert!(source.to_string().contains("timed out"));
	}

	#[test]
	fn configuration_message_is_verbatim() {
		let err = KeenError::configuration("Project ID must be set");
		assert_eq!(err.to_string(), "Project ID must be set");
	}
}
