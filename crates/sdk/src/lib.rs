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

//! BlindPay SDK - Webhook verification for BlindPay integrations
//!
//! This crate verifies the signatures BlindPay attaches to webhook
//! deliveries, parses the delivered event envelopes and models the error
//! documents returned by the BlindPay API.
//!
//! The SDK is designed to be lightweight and embeddable:
//! - No background threads
//! - No runtime initialization
//! - Configuration loading only when explicitly requested
//!
//! # Example
//!
//! ```
//! use blindpay_sdk::WebhookVerifier;
//!
//! let verifier = WebhookVerifier::new("whsec_dGVzdF9zZWNyZXRfa2V5XzEyMzQ1").unwrap();
//! let payload = r#"{"webhook_event":"payout.complete","id":"po_1"}"#;
//! let signature = verifier.sign("msg_1", "1704067200", payload);
//!
//! assert!(verifier.verify("msg_1", "1704067200", payload, &signature).unwrap());
//! ```

pub mod config;
pub mod error;
pub mod webhook;

pub use config::{DEFAULT_TOLERANCE_SECS, WebhookConfig};
pub use error::{ApiError, ErrorItem};
pub use webhook::{
	Verification, WebhookError, WebhookEvent, WebhookHeaders, WebhookPayload, WebhookSecret,
	WebhookVerifier, verify_webhook_signature,
};

/// SDK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
