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

use std::{sync::Arc, time::Duration};

use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use blindpay_sdk::WebhookVerifier;
use tracing::info;

use crate::{
	config::ReceiverRuntimeConfig, delivery_cache::DeliveryCache, middleware::LoggingMiddleware,
	routes::configure_routes,
};

/// State shared by all workers
#[derive(Clone)]
pub struct ReceiverState {
	pub(crate) verifier: Arc<WebhookVerifier>,
	pub(crate) deliveries: Arc<DeliveryCache>,
}

impl ReceiverState {
	pub fn new(verifier: Arc<WebhookVerifier>, deliveries: Arc<DeliveryCache>) -> Self {
		Self {
			verifier,
			deliveries,
		}
	}
}

/// Webhook receiver server
pub struct ReceiverServer {
	config: ReceiverRuntimeConfig,
	state: ReceiverState,
}

impl ReceiverServer {
	/// Build the server, failing fast when the webhook secret is unusable
	pub fn new(config: ReceiverRuntimeConfig) -> Result<Self> {
		let verifier = config
			.webhook
			.build_verifier()
			.context("Invalid webhook configuration (BLINDPAY_WEBHOOK_SECRET)")?;

		match verifier.tolerance() {
			Some(tolerance) => {
				info!(target: "server", "Timestamp tolerance: {}s", tolerance.as_secs())
			}
			None => info!(target: "server", "Timestamp tolerance: disabled"),
		}

		let deliveries = DeliveryCache::new(
			Duration::from_secs(config.delivery_ttl_secs),
			config.delivery_cache_max_capacity,
		);

		Ok(Self {
			state: ReceiverState::new(Arc::new(verifier), Arc::new(deliveries)),
			config,
		})
	}

	/// Start the HTTP server and run until shutdown
	pub async fn serve(self) -> Result<()> {
		let state = web::Data::new(self.state);
		let max_body_bytes = self.config.max_body_bytes;
		let addr = self.config.bind_addr;

		info!(
			target: "server",
			"Listening on {} with {} workers (max body {} bytes)",
			addr, self.config.workers, max_body_bytes
		);

		HttpServer::new(move || {
			App::new()
				.app_data(state.clone())
				.app_data(web::PayloadConfig::new(max_body_bytes))
				.wrap(LoggingMiddleware)
				.configure(configure_routes)
		})
		.workers(self.config.workers)
		.bind(addr)
		.with_context(|| format!("Failed to bind {}", addr))?
		.run()
		.await
		.context("HTTP server terminated with an error")?;

		Ok(())
	}
}
