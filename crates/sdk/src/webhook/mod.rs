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

//! Webhook signature verification
//!
//! BlindPay signs every webhook delivery with a shared secret using an
//! HMAC-SHA256 scheme compatible with Svix / Standard Webhooks.
//!
//! # Wire Format
//!
//! - **Secret**: `whsec_` followed by the standard base64 encoding of the raw key
//! - **Signed content**: `{message_id}.{timestamp}.{raw_body}`
//! - **Signature header**: one or more space-separated `v1,{base64(hmac)}` tokens
//!   (several tokens are sent while a secret is being rotated)
//!
//! # Outcome Model
//!
//! Verification distinguishes three situations so HTTP handlers can answer
//! with the right status:
//!
//! - **Configuration error** (`Err`, [`WebhookError::is_configuration`]): the secret
//!   is missing or malformed. The receiver is misconfigured (500).
//! - **Invalid input** (`Err`, [`WebhookError::is_invalid_input`]): a required value
//!   or header is missing. The request is malformed (400).
//! - **Not verified** (`Ok(false)`): inputs are well-formed but no signature
//!   matched, or the timestamp is outside the configured tolerance (401).
//!
//! The payload must be the raw request body exactly as received. Parsing and
//! re-serializing JSON before verification changes the bytes and breaks the
//! signature.

pub mod event;
pub mod headers;
pub mod secret;
pub mod signature;
pub mod verifier;

use thiserror::Error;

pub use event::{WebhookEvent, WebhookPayload};
pub use headers::WebhookHeaders;
pub use secret::WebhookSecret;
pub use signature::{SignatureHeader, SignatureToken};
pub use verifier::{Verification, WebhookVerifier, verify_webhook_signature};

/// Prefix carried by every webhook secret
pub const SECRET_PREFIX: &str = "whsec_";

/// The only signature scheme version currently produced by BlindPay
pub const SIGNATURE_VERSION: &str = "v1";

/// Error types for webhook verification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
	#[error("Webhook secret not provided")]
	MissingSecret,
	#[error("Invalid webhook secret format, expected 'whsec_<base64>'")]
	InvalidSecretPrefix,
	#[error("Failed to decode webhook secret: {0}")]
	InvalidSecretEncoding(String),
	#[error("Webhook secret decodes to an empty key")]
	EmptySecretKey,
	#[error("Missing required value: {0}")]
	MissingInput(&'static str),
	#[error("Missing required header: {0}")]
	MissingHeader(&'static str),
	#[error("Invalid timestamp: {0}")]
	InvalidTimestamp(String),
	#[error("Invalid webhook payload: {0}")]
	InvalidPayload(String),
}

impl WebhookError {
	/// The secret is missing or malformed; the caller must fix its setup.
	pub fn is_configuration(&self) -> bool {
		matches!(
			self,
			WebhookError::MissingSecret
				| WebhookError::InvalidSecretPrefix
				| WebhookError::InvalidSecretEncoding(_)
				| WebhookError::EmptySecretKey
		)
	}

	/// The request lacks a required value or carries one that cannot be used.
	pub fn is_invalid_input(&self) -> bool {
		matches!(
			self,
			WebhookError::MissingInput(_)
				| WebhookError::MissingHeader(_)
				| WebhookError::InvalidTimestamp(_)
				| WebhookError::InvalidPayload(_)
		)
	}
}
