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

use std::time::Duration;

use tracing::debug;

use super::{
	SIGNATURE_VERSION, SignatureHeader, WebhookError, WebhookHeaders, WebhookSecret,
	signature::compute_signature,
};

/// Outcome of a well-formed verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
	/// A `v1` token matched the expected signature
	Verified,
	/// No supported token matched
	SignatureMismatch,
	/// The timestamp is further from the current time than the configured tolerance
	TimestampOutsideTolerance { age_secs: u64 },
}

impl Verification {
	pub fn is_verified(&self) -> bool {
		matches!(self, Verification::Verified)
	}
}

/// Webhook signature verifier
///
/// Parses the secret once and can be shared freely between threads; each
/// call only touches its own inputs.
///
/// By default no timestamp tolerance is enforced and the timestamp is used
/// only as part of the signed content. Use [`WebhookVerifier::with_tolerance`]
/// to reject deliveries signed too far in the past or the future.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
	secret: WebhookSecret,
	tolerance: Option<Duration>,
}

impl WebhookVerifier {
	/// Create a verifier from a `whsec_<base64>` secret
	pub fn new(secret: &str) -> Result<Self, WebhookError> {
		Ok(Self::from_secret(WebhookSecret::parse(secret)?))
	}

	pub fn from_secret(secret: WebhookSecret) -> Self {
		Self {
			secret,
			tolerance: None,
		}
	}

	/// Reject timestamps more than `tolerance` away from the current time
	pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
		self.tolerance = Some(tolerance);
		self
	}

	pub fn tolerance(&self) -> Option<Duration> {
		self.tolerance
	}

	/// Produce the `v1,<base64>` token the sender would attach for these inputs
	pub fn sign(&self, message_id: &str, timestamp: &str, payload: impl AsRef<[u8]>) -> String {
		format!(
			"{},{}",
			SIGNATURE_VERSION,
			compute_signature(&self.secret, message_id, timestamp, payload.as_ref())
		)
	}

	/// Verify a delivery, returning `Ok(false)` when it is not authentic
	pub fn verify(
		&self,
		message_id: &str,
		timestamp: &str,
		payload: impl AsRef<[u8]>,
		signature_header: &str,
	) -> Result<bool, WebhookError> {
		self.check(message_id, timestamp, payload, signature_header)
			.map(|outcome| outcome.is_verified())
	}

	/// Same as [`WebhookVerifier::verify`] with an explicit current time (unix seconds)
	pub fn verify_at(
		&self,
		now: i64,
		message_id: &str,
		timestamp: &str,
		payload: impl AsRef<[u8]>,
		signature_header: &str,
	) -> Result<bool, WebhookError> {
		self.check_at(now, message_id, timestamp, payload, signature_header)
			.map(|outcome| outcome.is_verified())
	}

	/// Verify a delivery from its extracted headers
	pub fn verify_headers(
		&self,
		headers: &WebhookHeaders<'_>,
		payload: impl AsRef<[u8]>,
	) -> Result<bool, WebhookError> {
		self.check_headers(headers, payload)
			.map(|outcome| outcome.is_verified())
	}

	/// Verify a delivery and report why it failed
	pub fn check(
		&self,
		message_id: &str,
		timestamp: &str,
		payload: impl AsRef<[u8]>,
		signature_header: &str,
	) -> Result<Verification, WebhookError> {
		// The clock is only consulted when a tolerance is configured.
		let now = self.tolerance.map(|_| chrono::Utc::now().timestamp());
		self.evaluate(
			now,
			message_id,
			timestamp,
			payload.as_ref(),
			signature_header,
		)
	}

	pub fn check_at(
		&self,
		now: i64,
		message_id: &str,
		timestamp: &str,
		payload: impl AsRef<[u8]>,
		signature_header: &str,
	) -> Result<Verification, WebhookError> {
		self.evaluate(
			Some(now),
			message_id,
			timestamp,
			payload.as_ref(),
			signature_header,
		)
	}

	pub fn check_headers(
		&self,
		headers: &WebhookHeaders<'_>,
		payload: impl AsRef<[u8]>,
	) -> Result<Verification, WebhookError> {
		self.check(headers.id, headers.timestamp, payload, headers.signature)
	}

	fn evaluate(
		&self,
		now: Option<i64>,
		message_id: &str,
		timestamp: &str,
		payload: &[u8],
		signature_header: &str,
	) -> Result<Verification, WebhookError> {
		require(message_id.is_empty(), "message id")?;
		require(timestamp.is_empty(), "timestamp")?;
		require(payload.is_empty(), "payload")?;
		require(signature_header.is_empty(), "signature header")?;

		if let (Some(tolerance), Some(now)) = (self.tolerance, now) {
			let signed_at = timestamp
				.parse::<i64>()
				.map_err(|e| WebhookError::InvalidTimestamp(format!("{}: {}", timestamp, e)))?;

			let age_secs = now.abs_diff(signed_at);
			if age_secs > tolerance.as_secs() {
				debug!(
					message_id,
					age_secs,
					tolerance_secs = tolerance.as_secs(),
					"Webhook timestamp outside tolerance"
				);
				return Ok(Verification::TimestampOutsideTolerance { age_secs });
			}
		}

		let expected = compute_signature(&self.secret, message_id, timestamp, payload);
		if SignatureHeader::parse(signature_header).matches(&expected) {
			Ok(Verification::Verified)
		} else {
			debug!(message_id, "Webhook signature did not match");
			Ok(Verification::SignatureMismatch)
		}
	}
}

fn require(missing: bool, field: &'static str) -> Result<(), WebhookError> {
	if missing {
		return Err(WebhookError::MissingInput(field));
	}
	Ok(())
}

/// Verify a BlindPay webhook signature
///
/// # Arguments
///
/// * `secret` - Webhook secret from the BlindPay dashboard (`whsec_<base64>`)
/// * `message_id` - Value of the `svix-id` header
/// * `timestamp` - Value of the `svix-timestamp` header
/// * `payload` - Raw request body, before any JSON parsing
/// * `signature_header` - Value of the `svix-signature` header
///
/// Returns `Ok(true)` if any `v1` signature matches, `Ok(false)` otherwise.
/// A malformed secret or an empty input is an error.
pub fn verify_webhook_signature(
	secret: &str,
	message_id: &str,
	timestamp: &str,
	payload: &str,
	signature_header: &str,
) -> Result<bool, WebhookError> {
	WebhookVerifier::new(secret)?.verify(message_id, timestamp, payload, signature_header)
}
