// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Response interpretation: status code plus raw body into a decoded JSON
//! value or a typed error.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{KeenError, Result};

/// How a successful query body is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultFormat {
	/// Unwrap the `"result"` key (the default for analytic queries).
	#[default]
	Result,
	/// Return the full decoded object.
	AllKeys,
}

/// Maps an HTTP status code and raw body to a decoded value or an error.
///
/// - 200/201: JSON-decode the body. A malformed body is not an error: some
///   successful responses are empty, so it logs a warning and yields `{}`.
/// - 204: no body expected, yields `true`.
/// - 400/401/404: the corresponding typed error, raw body as detail.
/// - anything else: a generic `Http` error.
pub fn interpret(status: u16, body: &str) -> Result<Value> {
	match status {
		200 | 201 => match serde_json::from_str(body) {
			Ok(value) => Ok(value),
			Err(error) => {
				warn!(status, body, %error, "invalid JSON in success response; treating as empty");
				Ok(Value::Object(Map::new()))
			}
		},
		204 => Ok(Value::Bool(true)),
		400 => Err(KeenError::BadRequest {
			body: body.to_string(),
		}),
		401 => Err(KeenError::Authentication {
			body: body.to_string(),
		}),
		404 => Err(KeenError::NotFound {
			body: body.to_string(),
		}),
		other => Err(KeenError::Http {
			status: other,
			body: body.to_string(),
		}),
	}
}

/// Applies the caller's result-unwrapping choice to a decoded query body.
pub fn unwrap_result(value: Value, format: ResultFormat) -> Value {
	match format {
		ResultFormat::Result => match value {
			Value::Object(mut map) => map.remove("result").unwrap_or(Value::Null),
			other => other,
		},
		ResultFormat::AllKeys => value,
	}
}
