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

//! Signature computation and signature header parsing

use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};

use super::{SIGNATURE_VERSION, WebhookSecret};

type HmacSha256 = Hmac<Sha256>;

/// Compute the base64 HMAC-SHA256 of `{message_id}.{timestamp}.{payload}`
///
/// The separators and field order must match the sender byte for byte.
pub fn compute_signature(
	secret: &WebhookSecret,
	message_id: &str,
	timestamp: &str,
	payload: &[u8],
) -> String {
	let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
		.expect("HMAC accepts keys of any length");
	mac.update(message_id.as_bytes());
	mac.update(b".");
	mac.update(timestamp.as_bytes());
	mac.update(b".");
	mac.update(payload);

	BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

/// One `version,signature` pair of a signature header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureToken<'a> {
	pub version: &'a str,
	pub signature: &'a str,
}

/// Parsed signature header
///
/// Tokens are whitespace-separated; each is split on its first comma.
/// Tokens without a comma are ignored. A header with no comma token at all
/// is treated as a bare, unversioned signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader<'a> {
	raw: &'a str,
	tokens: Vec<SignatureToken<'a>>,
}

impl<'a> SignatureHeader<'a> {
	/// Split a raw header value into its `version,signature` tokens
	pub fn parse(raw: &'a str) -> Self {
		let tokens = raw
			.split_whitespace()
			.filter_map(|token| token.split_once(','))
			.map(|(version, signature)| SignatureToken { version, signature })
			.collect();

		Self { raw, tokens }
	}

	/// Tokens in header order, including unsupported versions
	pub fn tokens(&self) -> &[SignatureToken<'a>] {
		&self.tokens
	}

	/// Whether at least one `version,signature` token was present
	pub fn is_versioned(&self) -> bool {
		!self.tokens.is_empty()
	}

	/// Check the expected signature against every `v1` token
	///
	/// All candidate tokens are compared in constant time; the loop does not
	/// stop at the first match.
	pub fn matches(&self, expected: &str) -> bool {
		if !self.is_versioned() {
			return bool::from(self.raw.as_bytes().ct_eq(expected.as_bytes()));
		}

		let mut matched = Choice::from(0u8);
		for token in self
			.tokens
			.iter()
			.filter(|token| token.version == SIGNATURE_VERSION)
		{
			matched |= token.signature.as_bytes().ct_eq(expected.as_bytes());
		}

		bool::from(matched)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn secret() -> WebhookSecret {
		WebhookSecret::from_bytes(b"test_secret_key_12345".to_vec()).unwrap()
	}

	#[test]
	fn test_parse_multiple_tokens() {
		let header = SignatureHeader::parse("v1,abc v2,def  v1,ghi=");
		assert_eq!(
			header.tokens(),
			&[
				SignatureToken {
					version: "v1",
					signature: "abc"
				},
				SignatureToken {
					version: "v2",
					signature: "def"
				},
				SignatureToken {
					version: "v1",
					signature: "ghi="
				},
			]
		);
		assert!(header.is_versioned());
	}

	#[test]
	fn test_parse_splits_on_first_comma_only() {
		let header = SignatureHeader::parse("v1,a,b");
		assert_eq!(header.tokens()[0].signature, "a,b");
	}

	#[test]
	fn test_parse_bare_signature() {
		let header = SignatureHeader::parse("c2lnbmF0dXJl");
		assert!(header.tokens().is_empty());
		assert!(!header.is_versioned());
		assert!(header.matches("c2lnbmF0dXJl"));
	}

	#[test]
	fn test_only_v1_tokens_are_compared() {
		let expected = compute_signature(&secret(), "msg", "1", b"{}");
		let header_value = format!("v2,{}", expected);
		assert!(!SignatureHeader::parse(&header_value).matches(&expected));

		let header_value = format!("v2,{} v1,{}", expected, expected);
		assert!(SignatureHeader::parse(&header_value).matches(&expected));
	}

	#[test]
	fn test_versioned_header_skips_bare_fallback() {
		// Unknown-version tokens make the header versioned; the raw value
		// must not be compared as a whole.
		let header = SignatureHeader::parse("v2,abc");
		assert!(!header.matches("v2,abc"));
	}

	#[test]
	fn test_compute_signature_is_deterministic() {
		let a = compute_signature(&secret(), "msg_1", "1704067200", b"payload");
		let b = compute_signature(&secret(), "msg_1", "1704067200", b"payload");
		assert_eq!(a, b);
		// 32-byte digest, padded standard base64
		assert_eq!(a.len(), 44);
		assert!(a.ends_with('='));
	}

	#[test]
	fn test_compute_signature_matches_joined_content() {
		let payload = r#"{"event":"x"}"#;
		let mut mac = HmacSha256::new_from_slice(b"test_secret_key_12345").unwrap();
		mac.update(format!("msg_test123.1704067200.{}", payload).as_bytes());
		let expected = BASE64_STANDARD.encode(mac.finalize().into_bytes());

		assert_eq!(
			compute_signature(&secret(), "msg_test123", "1704067200", payload.as_bytes()),
			expected
		);
	}
}
