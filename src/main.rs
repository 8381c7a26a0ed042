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

//! # Contest Rating Predictor.
//!
//! Simple bot following the contests of a competitive programming site and publishing, for every
//! running contest, the predicted performance of each rank.
//! See `help` for more information.
//!
//! # Implementation Notes:
//!
//! The bot is designed to operate 24/7. It reads whatever the fetcher dumped into the source
//! directory and writes its artifacts into the output directory. Failing ticks are retried on the
//! next tick, only I/O errors on startup make it crash.
#![cfg_attr(docsrs, feature(doc_cfg))]

use clap::Parser;
use contest_rating_predictor::{
	commands,
	error::Error,
	prelude::{DEFAULT_PROMETHEUS_PORT, LOG_TARGET},
	prometheus,
};
use futures::future::{BoxFuture, FutureExt};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq, Parser)]
#[clap(author, version, about)]
pub struct Opt {
	#[clap(subcommand)]
	pub command: Command,

	/// The prometheus endpoint TCP port.
	#[clap(long, short, env = "PROMETHEUS_PORT", default_value_t = DEFAULT_PROMETHEUS_PORT)]
	pub prometheus_port: u16,

	/// Sets a custom logging filter. Syntax is `<target>=<level>`, e.g.
	/// -lcontest-rating-predictor=debug.
	///
	/// Log levels (least to most verbose) are error, warn, info, debug, and trace.
	/// By default, all targets log `info`. The global log level can be set with `-l<level>`.
	#[clap(long, short, default_value = "info")]
	pub log: String,
}

#[derive(Debug, Clone, PartialEq, Parser)]
pub enum Command {
	/// Follow the contest listing and publish predictions until the results are fixed.
	Monitor(commands::MonitorConfig),
	/// Publish the prediction of a single contest once.
	Predict(commands::PredictConfig),
	/// Fetch the histories of a list of users ahead of their next contest.
	Prefetch(commands::PrefetchConfig),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
	let Opt { command, prometheus_port, log } = Opt::parse();
	let filter = EnvFilter::from_default_env().add_directive(log.parse()?);
	tracing_subscriber::fmt().with_env_filter(filter).init();

	if let Err(e) = prometheus::run(prometheus_port).await {
		log::warn!(target: LOG_TARGET, "Failed to start prometheus endpoint: {e}");
	}

	let fut = match command {
		Command::Monitor(cfg) => commands::monitor_cmd(cfg).boxed(),
		Command::Predict(cfg) => commands::predict_cmd(cfg).boxed(),
		Command::Prefetch(cfg) => commands::prefetch_cmd(cfg).boxed(),
	};

	let res = run_command(fut).await;

	log::debug!(target: LOG_TARGET, "round of execution finished. outcome = {res:?}");
	res
}

#[cfg(target_family = "unix")]
async fn run_command(fut: BoxFuture<'_, Result<(), Error>>) -> Result<(), Error> {
	use tokio::signal::unix::{SignalKind, signal};

	let mut stream_int = signal(SignalKind::interrupt()).map_err(Error::Io)?;
	let mut stream_term = signal(SignalKind::terminate()).map_err(Error::Io)?;

	tokio::select! {
		_ = stream_int.recv() => {
			Ok(())
		}
		_ = stream_term.recv() => {
			Ok(())
		}
		res = fut => res,
	}
}

#[cfg(not(unix))]
async fn run_command(fut: BoxFuture<'_, Result<(), Error>>) -> Result<(), Error> {
	use tokio::signal::ctrl_c;

	tokio::select! {
		_ = ctrl_c() => Ok(()),
		res = fut => res,
	}
}
