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

use std::{fmt, str::FromStr};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use rand::RngCore;

use super::{SECRET_PREFIX, WebhookError};

/// Key length used by [`WebhookSecret::generate`]
const GENERATED_KEY_LEN: usize = 32;

/// Decoded webhook signing secret
///
/// Holds the raw HMAC key bytes. The `Debug` output is redacted so the
/// secret never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookSecret {
	key: Vec<u8>,
}

impl WebhookSecret {
	/// Parse a secret in the `whsec_<base64>` format shown in the BlindPay dashboard
	pub fn parse(secret: &str) -> Result<Self, WebhookError> {
		if secret.is_empty() {
			return Err(WebhookError::MissingSecret);
		}

		let encoded = secret
			.strip_prefix(SECRET_PREFIX)
			.ok_or(WebhookError::InvalidSecretPrefix)?;

		let key = BASE64_STANDARD
			.decode(encoded)
			.map_err(|e| WebhookError::InvalidSecretEncoding(e.to_string()))?;

		Self::from_bytes(key)
	}

	/// Wrap raw key bytes
	pub fn from_bytes(key: impl Into<Vec<u8>>) -> Result<Self, WebhookError> {
		let key = key.into();
		if key.is_empty() {
			return Err(WebhookError::EmptySecretKey);
		}
		Ok(Self { key })
	}

	/// Generate a fresh random secret
	pub fn generate() -> Self {
		let mut key = vec![0u8; GENERATED_KEY_LEN];
		rand::thread_rng().fill_bytes(&mut key);
		Self { key }
	}

	/// Raw HMAC key bytes
	pub fn as_bytes(&self) -> &[u8] {
		&self.key
	}

	/// Encode back into the `whsec_<base64>` form
	pub fn to_encoded(&self) -> String {
		format!("{}{}", SECRET_PREFIX, BASE64_STANDARD.encode(&self.key))
	}
}

impl FromStr for WebhookSecret {
	type Err = WebhookError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Debug for WebhookSecret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("WebhookSecret(***)")
	}
}
