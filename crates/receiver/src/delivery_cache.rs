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

//! Duplicate delivery detection
//!
//! BlindPay retries a delivery until it receives a 2xx response, so the same
//! message id can arrive more than once. Message ids are remembered for a
//! bounded time and entry count; only deliveries that passed signature
//! verification may be recorded.

use std::{
	sync::atomic::{AtomicU64, Ordering},
	time::Duration,
};

use moka::sync::Cache;

pub struct DeliveryCache {
	/// Value is a per-insert token used to detect whether this call created the entry
	cache: Cache<String, u64>,
	next_token: AtomicU64,
}

impl DeliveryCache {
	pub fn new(ttl: Duration, max_capacity: u64) -> Self {
		let cache = Cache::builder()
			.max_capacity(max_capacity)
			.time_to_live(ttl)
			.build();

		Self {
			cache,
			next_token: AtomicU64::new(1),
		}
	}

	/// Record a message id, returning `true` if it was not seen within the TTL.
	///
	/// `get_with` inserts our token only when the key is missing, so comparing
	/// the stored value with it tells concurrent callers apart without a
	/// separate `contains_key` + `insert` step.
	pub fn record(&self, message_id: &str) -> bool {
		let token = self.next_token.fetch_add(1, Ordering::Relaxed);
		self.cache.get_with(message_id.to_string(), || token) == token
	}

	#[cfg(test)]
	pub fn contains(&self, message_id: &str) -> bool {
		self.cache.contains_key(message_id)
	}
}
