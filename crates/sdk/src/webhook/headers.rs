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

use super::WebhookError;

pub const HEADER_SVIX_ID: &str = "svix-id";
pub const HEADER_SVIX_TIMESTAMP: &str = "svix-timestamp";
pub const HEADER_SVIX_SIGNATURE: &str = "svix-signature";

// Standard Webhooks names, sent by some relays instead of the svix ones
pub const HEADER_WEBHOOK_ID: &str = "webhook-id";
pub const HEADER_WEBHOOK_TIMESTAMP: &str = "webhook-timestamp";
pub const HEADER_WEBHOOK_SIGNATURE: &str = "webhook-signature";

/// Signing metadata carried in the headers of a webhook delivery
///
/// This type does not depend on any HTTP library; build it from whatever
/// header map the web framework provides with [`WebhookHeaders::from_lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookHeaders<'a> {
	pub id: &'a str,
	pub timestamp: &'a str,
	pub signature: &'a str,
}

impl<'a> WebhookHeaders<'a> {
	/// Extract the headers using a case-insensitive lookup function
	///
	/// `svix-*` headers take precedence over `webhook-*` ones. A header that is
	/// absent or empty under both names is reported by its `svix-*` name.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, WebhookError>
	where
		F: Fn(&str) -> Option<&'a str>,
	{
		let find = |primary: &'static str, fallback: &'static str| {
			[primary, fallback]
				.into_iter()
				.filter_map(&lookup)
				.map(str::trim)
				.find(|value| !value.is_empty())
				.ok_or(WebhookError::MissingHeader(primary))
		};

		Ok(Self {
			id: find(HEADER_SVIX_ID, HEADER_WEBHOOK_ID)?,
			timestamp: find(HEADER_SVIX_TIMESTAMP, HEADER_WEBHOOK_TIMESTAMP)?,
			signature: find(HEADER_SVIX_SIGNATURE, HEADER_WEBHOOK_SIGNATURE)?,
		})
	}
}
