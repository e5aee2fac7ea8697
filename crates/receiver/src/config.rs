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

use std::{env, net::SocketAddr, str::FromStr};

use anyhow::{Context, Result, bail};
use blindpay_sdk::WebhookConfig;

// Logging configuration constants
/// Default log level (can be overridden by RUST_LOG environment variable)
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log directory component name
pub const LOG_COMPONENT_NAME: &str = "receiver";

/// Default console output enabled (can be overridden by LOG_TO_CONSOLE environment variable)
pub const DEFAULT_LOG_TO_CONSOLE: bool = false;

// Server configuration constants
/// Default HTTP server bind address (can be overridden by RECEIVER_BIND_ADDR environment variable)
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default maximum webhook body size in bytes (can be overridden by RECEIVER_MAX_BODY_BYTES)
pub const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;

// Duplicate delivery configuration constants
/// Default time a delivered message id is remembered, in seconds (can be overridden by RECEIVER_DELIVERY_TTL_SECS)
pub const DEFAULT_DELIVERY_TTL_SECS: u64 = 600;

/// Default duplicate cache maximum capacity in entries (can be overridden by RECEIVER_DELIVERY_CACHE_MAX_CAPACITY)
pub const DEFAULT_DELIVERY_CACHE_MAX_CAPACITY: u64 = 100_000;

#[derive(Debug, Clone)]
pub struct ReceiverRuntimeConfig {
	pub bind_addr: SocketAddr,
	pub workers: usize,
	pub max_body_bytes: usize,
	pub delivery_ttl_secs: u64,
	pub delivery_cache_max_capacity: u64,
	pub webhook: WebhookConfig,
}

impl ReceiverRuntimeConfig {
	pub fn from_env() -> Result<Self> {
		dotenv::dotenv().ok();

		let bind_addr_str =
			env::var("RECEIVER_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
		let bind_addr = bind_addr_str
			.parse()
			.with_context(|| format!("Invalid bind address: {}", bind_addr_str))?;

		let workers = parse_workers(env::var("RECEIVER_WORKERS").ok().as_deref())?;
		let max_body_bytes = parse_env("RECEIVER_MAX_BODY_BYTES").unwrap_or(DEFAULT_MAX_BODY_BYTES);
		let delivery_ttl_secs =
			parse_env("RECEIVER_DELIVERY_TTL_SECS").unwrap_or(DEFAULT_DELIVERY_TTL_SECS);
		let delivery_cache_max_capacity = parse_env("RECEIVER_DELIVERY_CACHE_MAX_CAPACITY")
			.unwrap_or(DEFAULT_DELIVERY_CACHE_MAX_CAPACITY);

		let webhook = WebhookConfig::from_env().context("Failed to load webhook configuration")?;

		Ok(Self {
			bind_addr,
			workers,
			max_body_bytes,
			delivery_ttl_secs,
			delivery_cache_max_capacity,
			webhook,
		})
	}
}

/// Worker count from `RECEIVER_WORKERS`, defaulting to the CPU count
fn parse_workers(value: Option<&str>) -> Result<usize> {
	let Some(value) = value else {
		return Ok(num_cpus::get());
	};

	let workers: usize = value
		.trim()
		.parse()
		.with_context(|| format!("Invalid RECEIVER_WORKERS: {}", value))?;
	if workers == 0 {
		bail!("RECEIVER_WORKERS must be greater than zero");
	}

	Ok(workers)
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
	env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_workers() {
		assert_eq!(parse_workers(Some("4")).unwrap(), 4);
		assert_eq!(parse_workers(None).unwrap(), num_cpus::get());
	}

	#[test]
	fn test_parse_workers_rejects_zero_and_garbage() {
		let err = parse_workers(Some("0")).unwrap_err();
		assert!(err.to_string().contains("greater than zero"));

		assert!(parse_workers(Some("many")).is_err());
	}
}
