// Copyright 2021-2022 Parity Technologies (UK) Ltd.
// This file is part of Polkadot.

// Polkadot is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Polkadot is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Polkadot.  If not, see <http://www.gnu.org/licenses/>.

use super::prelude::LOG_TARGET;
use http_body_util::Full;
pub use hidden::*;
use hyper::{Method, Request, Response, body::Bytes, header::CONTENT_TYPE, service::service_fn};
use hyper_util::{
	rt::{TokioExecutor, TokioIo},
	server::conn::auto::Builder,
};
use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;
use tokio::net::TcpListener;

type Body = Full<Bytes>;

async fn serve_req(req: Request<hyper::body::Incoming>) -> Result<Response<Body>, hyper::Error> {
	let response = match (req.method(), req.uri().path()) {
		(&Method::GET, "/metrics") => {
			let mut buffer = vec![];
			let encoder = TextEncoder::new();
			let metric_families = prometheus::gather();
			match encoder.encode(&metric_families, &mut buffer) {
				Ok(()) => Response::builder()
					.status(200)
					.header(CONTENT_TYPE, encoder.format_type())
					.body(Body::from(buffer)),
				Err(e) => Response::builder().status(500).body(Body::from(e.to_string())),
			}
		},
		(&Method::GET, "/") => Response::builder().status(200).body(Body::from("")),
		_ => Response::builder().status(404).body(Body::from("")),
	};

	Ok(response.expect("static response parts are valid; qed"))
}

/// Serve `/metrics` on `port` in the background.
pub async fn run(port: u16) -> Result<(), String> {
	let addr = SocketAddr::from(([0, 0, 0, 0], port));
	let listener = TcpListener::bind(&addr)
		.await
		.map_err(|e| format!("Failed bind socket on port {port} {e:?}"))?;

	log::info!(target: LOG_TARGET, "Started prometheus endpoint on http://{addr}");

	tokio::spawn(async move {
		loop {
			let (stream, _) = match listener.accept().await {
				Ok(conn) => conn,
				Err(e) => {
					log::warn!(target: LOG_TARGET, "Failed to accept connection: {e}");
					continue;
				},
			};

			let io = TokioIo::new(stream);
			tokio::spawn(async move {
				if let Err(e) = Builder::new(TokioExecutor::new())
					.serve_connection(io, service_fn(serve_req))
					.await
				{
					log::debug!(target: LOG_TARGET, "Error serving connection: {e}");
				}
			});
		}
	});

	Ok(())
}

mod hidden {
	use once_cell::sync::Lazy;
	use prometheus::{Counter, Gauge, opts, register_counter, register_gauge};

	static RECOMPUTE_STARTED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"contest_predictor_recompute_started",
			"Number of recompute passes started",
		))
		.unwrap()
	});

	static RECOMPUTE_SUCCESS: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"contest_predictor_recompute_success",
			"Number of recompute passes that published a table",
		))
		.unwrap()
	});

	static RECOMPUTE_FAILED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"contest_predictor_recompute_failed",
			"Number of recompute passes aborted by an error",
		))
		.unwrap()
	});

	static PARTICIPANTS: Lazy<Gauge> = Lazy::new(|| {
		register_gauge!(opts!(
			"contest_predictor_participants",
			"Number of rated participants of the last recompute pass",
		))
		.unwrap()
	});

	static INVERSION_DURATION: Lazy<Gauge> = Lazy::new(|| {
		register_gauge!(
			"contest_predictor_inversion_duration_ms",
			"The time in milliseconds the last rank to performance table took"
		)
		.unwrap()
	});

	static RESULTS_APPLIED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"contest_predictor_results_applied",
			"Number of fixed contest results merged into the histories",
		))
		.unwrap()
	});

	static HISTORY_REFETCHED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"contest_predictor_history_refetched",
			"Number of user histories fetched in full",
		))
		.unwrap()
	});

	static PUBLISH_FAILED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!("contest_predictor_publish_failed", "Number of artifacts that failed to publish"))
			.unwrap()
	});

	static TRACKED_CONTESTS: Lazy<Gauge> = Lazy::new(|| {
		register_gauge!(opts!(
			"contest_predictor_tracked_contests",
			"Number of contests that are not finalized yet",
		))
		.unwrap()
	});

	pub fn on_recompute_attempt() {
		RECOMPUTE_STARTED.inc();
	}

	pub fn on_recompute_success() {
		RECOMPUTE_SUCCESS.inc();
	}

	pub fn on_recompute_failure() {
		RECOMPUTE_FAILED.inc();
	}

	pub fn on_result_applied() {
		RESULTS_APPLIED.inc();
	}

	pub fn on_history_refetch() {
		HISTORY_REFETCHED.inc();
	}

	pub fn on_publish_failure() {
		PUBLISH_FAILED.inc();
	}

	pub fn set_participants(n: usize) {
		PARTICIPANTS.set(n as f64);
	}

	pub fn set_tracked_contests(n: usize) {
		TRACKED_CONTESTS.set(n as f64);
	}

	pub fn observe_inversion_duration(time: f64) {
		INVERSION_DURATION.set(time);
	}
}
