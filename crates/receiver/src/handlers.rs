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

use actix_web::{HttpRequest, HttpResponse, Responder, http::StatusCode, web};
use blindpay_sdk::{Verification, WebhookError, WebhookHeaders, WebhookPayload};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::server::ReceiverState;

/// Error types for webhook delivery handling
#[derive(Debug, Error)]
pub enum ReceiverError {
	#[error("{0}")]
	Webhook(#[from] WebhookError),
	#[error("Request body is not valid UTF-8: {0}")]
	InvalidBody(String),
	#[error("Webhook signature verification failed")]
	Unverified(Verification),
}

impl actix_web::ResponseError for ReceiverError {
	fn status_code(&self) -> StatusCode {
		match self {
			ReceiverError::Webhook(e) if e.is_configuration() => StatusCode::INTERNAL_SERVER_ERROR,
			ReceiverError::Webhook(_) | ReceiverError::InvalidBody(_) => StatusCode::BAD_REQUEST,
			ReceiverError::Unverified(_) => StatusCode::UNAUTHORIZED,
		}
	}

	fn error_response(&self) -> HttpResponse {
		let message = match self {
			// Secret problems are logged, not reported to the sender
			ReceiverError::Webhook(e) if e.is_configuration() => {
				"Webhook receiver is misconfigured".to_string()
			}
			other => other.to_string(),
		};

		HttpResponse::build(self.status_code()).json(serde_json::json!({
			"error": message
		}))
	}
}

/// Health check endpoint
pub async fn health() -> impl Responder {
	HttpResponse::Ok().json(serde_json::json!({
		"status": "ok",
		"service": "blindpay-webhook-receiver"
	}))
}

/// Handle a webhook delivery
///
/// The body is taken as raw bytes: the signature covers the exact bytes
/// sent, so nothing may parse it before verification. Only verified
/// deliveries are parsed and recorded for duplicate detection.
pub async fn receive_webhook(
	state: web::Data<ReceiverState>,
	req: HttpRequest,
	body: web::Bytes,
) -> Result<HttpResponse, ReceiverError> {
	let header_map = req.headers();
	let headers = WebhookHeaders::from_lookup(move |name: &str| {
		header_map.get(name).and_then(|v| v.to_str().ok())
	})?;

	let payload =
		std::str::from_utf8(&body).map_err(|e| ReceiverError::InvalidBody(e.to_string()))?;

	let outcome = state
		.verifier
		.check_headers(&headers, payload)
		.inspect_err(|e| {
			if e.is_configuration() {
				error!(error = %e, "Webhook secret is not usable");
			}
		})?;
	if !outcome.is_verified() {
		warn!(message_id = headers.id, outcome = ?outcome, "Rejected webhook delivery");
		return Err(ReceiverError::Unverified(outcome));
	}

	let event = WebhookPayload::from_json(payload)?;

	if !state.deliveries.record(headers.id) {
		info!(message_id = headers.id, event = %event.webhook_event, "Duplicate webhook delivery");
		return Ok(HttpResponse::Ok().json(serde_json::json!({
			"status": "duplicate"
		})));
	}

	info!(
		message_id = headers.id,
		event = %event.webhook_event,
		resource_id = event.resource_id().unwrap_or("-"),
		"Accepted webhook delivery"
	);

	Ok(HttpResponse::Ok().json(serde_json::json!({
		"status": "accepted",
		"event": event.webhook_event
	})))
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, time::Duration};

	use actix_web::{App, test};
	use blindpay_sdk::{WebhookSecret, WebhookVerifier};
	use serde_json::Value;

	use super::*;
	use crate::{delivery_cache::DeliveryCache, routes::configure_routes};

	const TIMESTAMP: &str = "1704067200";
	const PAYLOAD: &str = r#"{"webhook_event":"payout.complete","id":"po_000000000000"}"#;

	fn verifier() -> WebhookVerifier {
		WebhookVerifier::from_secret(WebhookSecret::from_bytes(b"receiver-test-key".to_vec()).unwrap())
	}

	fn state() -> web::Data<ReceiverState> {
		web::Data::new(ReceiverState::new(
			Arc::new(verifier()),
			Arc::new(DeliveryCache::new(Duration::from_secs(60), 100)),
		))
	}

	fn delivery(message_id: &str, payload: &str, signature: &str) -> test::TestRequest {
		test::TestRequest::post()
			.uri("/webhooks")
			.insert_header(("svix-id", message_id))
			.insert_header(("svix-timestamp", TIMESTAMP))
			.insert_header(("svix-signature", signature))
			.set_payload(payload.to_string())
	}

	#[actix_web::test]
	async fn test_health() {
		let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

		let req = test::TestRequest::get().uri("/health").to_request();
		let body: Value = test::call_and_read_body_json(&app, req).await;
		assert_eq!(body["status"], "ok");
		assert_eq!(body["service"], "blindpay-webhook-receiver");
	}

	#[actix_web::test]
	async fn test_accepts_then_flags_duplicate() {
		let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
		let signature = verifier().sign("msg_1", TIMESTAMP, PAYLOAD);

		let resp = test::call_service(&app, delivery("msg_1", PAYLOAD, &signature).to_request()).await;
		assert_eq!(resp.status(), StatusCode::OK);
		let body: Value = test::read_body_json(resp).await;
		assert_eq!(body["status"], "accepted");
		assert_eq!(body["event"], "payout.complete");

		let resp = test::call_service(&app, delivery("msg_1", PAYLOAD, &signature).to_request()).await;
		assert_eq!(resp.status(), StatusCode::OK);
		let body: Value = test::read_body_json(resp).await;
		assert_eq!(body["status"], "duplicate");
	}

	#[actix_web::test]
	async fn test_rejects_bad_signature() {
		let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
		let signature = verifier().sign("msg_1", TIMESTAMP, PAYLOAD);
		let tampered = PAYLOAD.replace("po_000000000000", "po_999999999999");

		let resp = test::call_service(&app, delivery("msg_1", &tampered, &signature).to_request()).await;
		assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
	}

	#[actix_web::test]
	async fn test_rejected_delivery_is_not_recorded() {
		let state = state();
		let app = test::init_service(App::new().app_data(state.clone()).configure(configure_routes))
			.await;

		let resp = test::call_service(&app, delivery("msg_1", PAYLOAD, "v1,bm9wZQ==").to_request()).await;
		assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
		assert!(!state.deliveries.contains("msg_1"));

		// The genuine delivery is still accepted afterwards
		let signature = verifier().sign("msg_1", TIMESTAMP, PAYLOAD);
		let resp = test::call_service(&app, delivery("msg_1", PAYLOAD, &signature).to_request()).await;
		let body: Value = test::read_body_json(resp).await;
		assert_eq!(body["status"], "accepted");
	}

	#[actix_web::test]
	async fn test_stale_delivery_is_unauthorized() {
		let state = web::Data::new(ReceiverState::new(
			Arc::new(verifier().with_tolerance(Duration::from_secs(300))),
			Arc::new(DeliveryCache::new(Duration::from_secs(60), 100)),
		));
		let app = test::init_service(App::new().app_data(state).configure(configure_routes)).await;

		// 2024-01-01 is far outside a five minute window
		let signature = verifier().sign("msg_1", TIMESTAMP, PAYLOAD);
		let resp = test::call_service(&app, delivery("msg_1", PAYLOAD, &signature).to_request()).await;
		assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
	}

	#[actix_web::test]
	async fn test_missing_header_is_bad_request() {
		let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

		let req = test::TestRequest::post()
			.uri("/webhooks")
			.insert_header(("svix-id", "msg_1"))
			.insert_header(("svix-signature", "v1,abc"))
			.set_payload(PAYLOAD)
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
		let body: Value = test::read_body_json(resp).await;
		assert_eq!(body["error"], "Missing required header: svix-timestamp");
	}

	#[actix_web::test]
	async fn test_standard_webhook_headers_are_accepted() {
		let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
		let signature = verifier().sign("msg_2", TIMESTAMP, PAYLOAD);

		let req = test::TestRequest::post()
			.uri("/webhooks")
			.insert_header(("webhook-id", "msg_2"))
			.insert_header(("webhook-timestamp", TIMESTAMP))
			.insert_header(("webhook-signature", signature.as_str()))
			.set_payload(PAYLOAD)
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::OK);
	}

	#[actix_web::test]
	async fn test_verified_non_envelope_is_bad_request() {
		let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;
		let payload = r#"{"id":"po_1"}"#;
		let signature = verifier().sign("msg_3", TIMESTAMP, payload);

		let resp = test::call_service(&app, delivery("msg_3", payload, &signature).to_request()).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_non_utf8_body_is_bad_request() {
		let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

		let req = test::TestRequest::post()
			.uri("/webhooks")
			.insert_header(("svix-id", "msg_4"))
			.insert_header(("svix-timestamp", TIMESTAMP))
			.insert_header(("svix-signature", "v1,abc"))
			.set_payload(vec![0xff, 0xfe, 0xfd])
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[::core::prelude::v1::test]
	fn test_configuration_errors_map_to_server_error() {
		use actix_web::ResponseError;

		let err = ReceiverError::from(WebhookError::InvalidSecretPrefix);
		assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

		let err = ReceiverError::from(WebhookError::MissingInput("payload"));
		assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

		let err = ReceiverError::Unverified(Verification::SignatureMismatch);
		assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
	}
}
