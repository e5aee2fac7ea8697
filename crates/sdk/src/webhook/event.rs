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

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::WebhookError;

/// Webhook event name
///
/// Names not known to this SDK version are kept as [`WebhookEvent::Other`]
/// so that receivers keep working when new events are introduced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WebhookEvent {
	ReceiverNew,
	ReceiverUpdate,
	BankAccountNew,
	PayoutNew,
	PayoutUpdate,
	PayoutComplete,
	PayoutPartnerFee,
	BlockchainWalletNew,
	PayinNew,
	PayinUpdate,
	PayinComplete,
	PayinPartnerFee,
	Other(String),
}

impl WebhookEvent {
	pub fn as_str(&self) -> &str {
		match self {
			WebhookEvent::ReceiverNew => "receiver.new",
			WebhookEvent::ReceiverUpdate => "receiver.update",
			WebhookEvent::BankAccountNew => "bankAccount.new",
			WebhookEvent::PayoutNew => "payout.new",
			WebhookEvent::PayoutUpdate => "payout.update",
			WebhookEvent::PayoutComplete => "payout.complete",
			WebhookEvent::PayoutPartnerFee => "payout.partnerFee",
			WebhookEvent::BlockchainWalletNew => "blockchainWallet.new",
			WebhookEvent::PayinNew => "payin.new",
			WebhookEvent::PayinUpdate => "payin.update",
			WebhookEvent::PayinComplete => "payin.complete",
			WebhookEvent::PayinPartnerFee => "payin.partnerFee",
			WebhookEvent::Other(name) => name,
		}
	}

	/// Whether this SDK version knows the event
	pub fn is_known(&self) -> bool {
		!matches!(self, WebhookEvent::Other(_))
	}
}

impl From<&str> for WebhookEvent {
	fn from(name: &str) -> Self {
		match name {
			"receiver.new" => WebhookEvent::ReceiverNew,
			"receiver.update" => WebhookEvent::ReceiverUpdate,
			"bankAccount.new" => WebhookEvent::BankAccountNew,
			"payout.new" => WebhookEvent::PayoutNew,
			"payout.update" => WebhookEvent::PayoutUpdate,
			"payout.complete" => WebhookEvent::PayoutComplete,
			"payout.partnerFee" => WebhookEvent::PayoutPartnerFee,
			"blockchainWallet.new" => WebhookEvent::BlockchainWalletNew,
			"payin.new" => WebhookEvent::PayinNew,
			"payin.update" => WebhookEvent::PayinUpdate,
			"payin.complete" => WebhookEvent::PayinComplete,
			"payin.partnerFee" => WebhookEvent::PayinPartnerFee,
			other => WebhookEvent::Other(other.to_string()),
		}
	}
}

impl From<String> for WebhookEvent {
	fn from(name: String) -> Self {
		match WebhookEvent::from(name.as_str()) {
			WebhookEvent::Other(_) => WebhookEvent::Other(name),
			known => known,
		}
	}
}

impl From<WebhookEvent> for String {
	fn from(event: WebhookEvent) -> Self {
		match event {
			WebhookEvent::Other(name) => name,
			known => known.as_str().to_string(),
		}
	}
}

impl FromStr for WebhookEvent {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(WebhookEvent::from(s))
	}
}

impl fmt::Display for WebhookEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Body of a webhook delivery
///
/// Every delivery is a JSON object tagged with `webhook_event`; the rest of
/// the object is the resource the event refers to. Only parse a payload
/// after its signature has been verified against the raw body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
	pub webhook_event: WebhookEvent,
	#[serde(flatten)]
	pub data: Map<String, Value>,
}

impl WebhookPayload {
	pub fn from_json(payload: impl AsRef<[u8]>) -> Result<Self, WebhookError> {
		serde_json::from_slice(payload.as_ref())
			.map_err(|e| WebhookError::InvalidPayload(e.to_string()))
	}

	/// Identifier of the resource the event refers to (`id` field)
	pub fn resource_id(&self) -> Option<&str> {
		self.data.get("id").and_then(Value::as_str)
	}

	pub fn get(&self, field: &str) -> Option<&Value> {
		self.data.get(field)
	}
}
