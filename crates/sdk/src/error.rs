// Copyright 2025 itscheems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error document returned by the BlindPay API

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bodies at least this long are left out of the fallback message
const MAX_RAW_BODY_IN_MESSAGE: usize = 1000;

/// Individual entry of the `errors` array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub long_message: Option<String>,
}

/// Error response from the BlindPay API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
	#[serde(skip)]
	pub status_code: u16,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub errors: Vec<ErrorItem>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub trace_id: Option<String>,
	#[serde(skip)]
	pub raw_body: Vec<u8>,
}

impl ApiError {
	/// Build an error from a non-2xx response
	///
	/// If the body is not a JSON error document the message falls back to
	/// `HTTP <status> error`, followed by the body when it is short.
	pub fn from_response(status_code: u16, body: &[u8]) -> Self {
		let document = match serde_json::from_slice::<Value>(body) {
			// `null` is an empty document
			Ok(Value::Null) => Some(ApiError::default()),
			Ok(value @ Value::Object(_)) => serde_json::from_value::<ApiError>(value).ok(),
			_ => None,
		};

		let mut error = match document {
			Some(parsed) => parsed,
			None => {
				let mut message = format!("HTTP {} error", status_code);
				if !body.is_empty() && body.len() < MAX_RAW_BODY_IN_MESSAGE {
					message.push_str(&format!(": {}", String::from_utf8_lossy(body)));
				}
				ApiError {
					message,
					..Default::default()
				}
			}
		};

		error.status_code = status_code;
		error.raw_body = body.to_vec();
		error
	}

	pub fn is_client_error(&self) -> bool {
		(400..500).contains(&self.status_code)
	}

	pub fn is_server_error(&self) -> bool {
		(500..600).contains(&self.status_code)
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "blindpay: API error (status {})", self.status_code)?;

		if !self.message.is_empty() {
			write!(f, ": {}", self.message)?;
		}

		if let Some(trace_id) = self.trace_id.as_deref().filter(|id| !id.is_empty()) {
			write!(f, " [trace_id: {}]", trace_id)?;
		}

		if !self.errors.is_empty() {
			f.write_str(" - errors:")?;
			for item in &self.errors {
				match item.code.as_deref().filter(|code| !code.is_empty()) {
					Some(code) => write!(f, " [{}: {}]", code, item.message)?,
					None => write!(f, " [{}]", item.message)?,
				}
			}
		}

		Ok(())
	}
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_error_document() {
		let body = br#"{"message":"Validation failed","trace_id":"tr_123","errors":[{"code":"invalid_field","message":"email is invalid","long_message":"The email address is not valid"},{"message":"name is required"}]}"#;
		let err = ApiError::from_response(422, body);

		assert_eq!(err.status_code, 422);
		assert_eq!(err.message, "Validation failed");
		assert_eq!(err.trace_id.as_deref(), Some("tr_123"));
		assert_eq!(err.errors.len(), 2);
		assert_eq!(
			err.errors[0].long_message.as_deref(),
			Some("The email address is not valid")
		);
		assert_eq!(err.raw_body, body.to_vec());
		assert_eq!(
			err.to_string(),
			"blindpay: API error (status 422): Validation failed [trace_id: tr_123] - errors: [invalid_field: email is invalid] [name is required]"
		);
	}

	#[test]
	fn test_fallback_message_for_non_json_body() {
		let err = ApiError::from_response(502, b"Bad Gateway");
		assert_eq!(err.message, "HTTP 502 error: Bad Gateway");
		assert_eq!(
			err.to_string(),
			"blindpay: API error (status 502): HTTP 502 error: Bad Gateway"
		);
		assert!(err.is_server_error());
		assert!(!err.is_client_error());
	}

	#[test]
	fn test_fallback_message_omits_empty_and_long_bodies() {
		assert_eq!(ApiError::from_response(500, b"").message, "HTTP 500 error");

		let long_body = vec![b'x'; MAX_RAW_BODY_IN_MESSAGE];
		let err = ApiError::from_response(500, &long_body);
		assert_eq!(err.message, "HTTP 500 error");
		assert_eq!(err.raw_body.len(), MAX_RAW_BODY_IN_MESSAGE);
	}

	#[test]
	fn test_non_object_json_uses_fallback_message() {
		let err = ApiError::from_response(500, b"[]");
		assert_eq!(err.message, "HTTP 500 error: []");

		let err = ApiError::from_response(500, br#""oops""#);
		assert_eq!(err.message, r#"HTTP 500 error: "oops""#);
	}

	#[test]
	fn test_null_body_is_empty_document() {
		let err = ApiError::from_response(500, b"null");
		assert_eq!(err.message, "");
		assert_eq!(err.raw_body, b"null".to_vec());
		assert_eq!(err.to_string(), "blindpay: API error (status 500)");
	}

	#[test]
	fn test_display_minimal() {
		let err = ApiError::from_response(404, b"{}");
		assert!(err.is_client_error());
		assert_eq!(err.to_string(), "blindpay: API error (status 404)");
	}
}
