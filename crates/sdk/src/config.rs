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

use serde::{Deserialize, Serialize};

use crate::webhook::{WebhookError, WebhookVerifier};

/// Environment variable prefix (`BLINDPAY_WEBHOOK_SECRET`, `BLINDPAY_WEBHOOK_TOLERANCE_SECS`)
pub const ENV_PREFIX: &str = "BLINDPAY_WEBHOOK";

/// Recommended timestamp tolerance in seconds
///
/// Not applied unless `tolerance_secs` is set.
pub const DEFAULT_TOLERANCE_SECS: u64 = 300;

/// Webhook verification configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
	/// Signing secret (`whsec_<base64>`)
	#[serde(default)]
	pub secret: String,
	/// Maximum distance between the delivery timestamp and now, in seconds
	#[serde(default)]
	pub tolerance_secs: Option<u64>,
}

impl WebhookConfig {
	/// Load configuration from environment variables
	pub fn from_env() -> Result<Self, config::ConfigError> {
		Self::from_environment(environment())
	}

	/// Load configuration from file, overridden by environment variables
	pub fn from_file(path: &str) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder()
			.add_source(config::File::with_name(path))
			.add_source(environment())
			.build()?;

		cfg.try_deserialize()
	}

	fn from_environment(source: config::Environment) -> Result<Self, config::ConfigError> {
		let cfg = config::Config::builder().add_source(source).build()?;

		cfg.try_deserialize()
	}

	pub fn tolerance(&self) -> Option<Duration> {
		self.tolerance_secs.map(Duration::from_secs)
	}

	/// Parse the secret and build a verifier with the configured tolerance
	pub fn build_verifier(&self) -> Result<WebhookVerifier, WebhookError> {
		let verifier = WebhookVerifier::new(&self.secret)?;
		Ok(match self.tolerance() {
			Some(tolerance) => verifier.with_tolerance(tolerance),
			None => verifier,
		})
	}
}

fn environment() -> config::Environment {
	config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}
