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

use std::future::{Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::{
	Error,
	dev::{Service, ServiceRequest, ServiceResponse, Transform},
};
use blindpay_sdk::webhook::headers::{HEADER_SVIX_ID, HEADER_WEBHOOK_ID};
use tracing::{Instrument, info, warn};

/// Request logging middleware
///
/// Every request runs inside an `http_request` span carrying the method,
/// path and the webhook message id when present.
pub struct LoggingMiddleware;

impl<S, B> Transform<S, ServiceRequest> for LoggingMiddleware
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<B>;
	type Error = Error;
	type InitError = ();
	type Transform = LoggingMiddlewareInner<S>;
	type Future = Ready<Result<Self::Transform, Self::InitError>>;

	fn new_transform(&self, service: S) -> Self::Future {
		ready(Ok(LoggingMiddlewareInner {
			service: Rc::new(service),
		}))
	}
}

pub struct LoggingMiddlewareInner<S> {
	service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for LoggingMiddlewareInner<S>
where
	S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
	S::Future: 'static,
	B: 'static,
{
	type Response = ServiceResponse<B>;
	type Error = Error;
	type Future = Pin<Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>>>>;

	fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.service.poll_ready(cx)
	}

	fn call(&self, req: ServiceRequest) -> Self::Future {
		let service = self.service.clone();
		let message_id = req
			.headers()
			.get(HEADER_SVIX_ID)
			.or_else(|| req.headers().get(HEADER_WEBHOOK_ID))
			.and_then(|v| v.to_str().ok())
			.unwrap_or("-")
			.to_string();
		let span = tracing::info_span!(
			"http_request",
			method = %req.method(),
			path = %req.path(),
			message_id = %message_id
		);

		Box::pin(
			async move {
				let start = std::time::Instant::now();
				let res = service.call(req).await;
				let duration = start.elapsed();

				match &res {
					Ok(response) => {
						info!(
							status = response.status().as_u16(),
							duration_ms = duration.as_millis(),
							"Request completed"
						);
					}
					Err(e) => {
						warn!(error = %e, duration_ms = duration.as_millis(), "Request failed");
					}
				}

				res
			}
			.instrument(span),
		)
	}
}
