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

//! BlindPay Webhook Receiver
//!
//! Accepts BlindPay webhook deliveries over HTTP, verifies their signatures
//! against the raw request body and acknowledges each delivery once.
//!
//! # Responses
//!
//! - `200` - delivery verified (`accepted`) or already processed (`duplicate`)
//! - `400` - missing signing headers, non-UTF-8 body or not a webhook envelope
//! - `401` - signature mismatch or timestamp outside the configured tolerance
//! - `500` - the configured secret is unusable

mod config;
mod delivery_cache;
mod handlers;
mod logging;
mod middleware;
mod routes;
mod server;

use anyhow::{Context, Result};
use tracing::info;

use crate::{config::ReceiverRuntimeConfig, logging::init_logging, server::ReceiverServer};

#[actix_rt::main]
async fn main() -> Result<()> {
	init_logging()?;

	let config = ReceiverRuntimeConfig::from_env()?;
	info!(
		target: "server",
		"Starting BlindPay webhook receiver {} on {}",
		blindpay_sdk::VERSION,
		config.bind_addr
	);

	let server = ReceiverServer::new(config).context("Failed to create webhook receiver")?;

	server.serve().await.context("Failed to start webhook receiver")?;

	Ok(())
}
