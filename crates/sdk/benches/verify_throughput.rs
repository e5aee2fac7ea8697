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

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use blindpay_sdk::{WebhookSecret, WebhookVerifier};

const PAYLOAD_SIZES: &[usize] = &[256, 4 * 1024, 64 * 1024];
const TIMESTAMP: &str = "1704067200";

fn payload_of(size: usize) -> String {
	let filler = "x".repeat(size.saturating_sub(48));
	format!(r#"{{"webhook_event":"payout.update","data":"{}"}}"#, filler)
}

fn bench_verify(c: &mut Criterion) {
	let verifier = WebhookVerifier::from_secret(WebhookSecret::generate());
	let mut group = c.benchmark_group("verify");

	for &size in PAYLOAD_SIZES {
		let payload = payload_of(size);
		let header = verifier.sign("msg_bench", TIMESTAMP, &payload);

		group.throughput(Throughput::Bytes(payload.len() as u64));
		group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
			b.iter(|| {
				verifier
					.verify(
						black_box("msg_bench"),
						black_box(TIMESTAMP),
						black_box(payload.as_str()),
						black_box(header.as_str()),
					)
					.unwrap()
			});
		});
	}

	group.finish();
}

fn bench_rotation_header(c: &mut Criterion) {
	let verifier = WebhookVerifier::from_secret(WebhookSecret::generate());
	let previous = WebhookVerifier::from_secret(WebhookSecret::generate());
	let payload = payload_of(1024);

	// Matching token last so every candidate is compared
	let header = format!(
		"{} {} {}",
		previous.sign("msg_bench", TIMESTAMP, &payload),
		previous.sign("msg_other", TIMESTAMP, &payload),
		verifier.sign("msg_bench", TIMESTAMP, &payload)
	);

	c.bench_function("verify_rotation_header", |b| {
		b.iter(|| {
			verifier
				.verify(
					black_box("msg_bench"),
					black_box(TIMESTAMP),
					black_box(payload.as_str()),
					black_box(header.as_str()),
				)
				.unwrap()
		});
	});
}

criterion_group!(benches, bench_verify, bench_rotation_header);
criterion_main!(benches);
