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

use crate::{
	commands::types::MonitorConfig,
	error::Error,
	prelude::LOG_TARGET,
	scheduler::{ContestLifecycleScheduler, SchedulerConfig},
};

/// Cancels every trigger once the monitor future is dropped.
struct ShutdownOnDrop(ContestLifecycleScheduler);

impl Drop for ShutdownOnDrop {
	fn drop(&mut self) {
		log::info!(target: LOG_TARGET, "shutting down, {} contests still tracked", self.0.tracked());
		self.0.shutdown();
	}
}

/// Follow every contest of the listing until its result is merged, forever.
pub async fn monitor_cmd(config: MonitorConfig) -> Result<(), Error> {
	tokio::fs::create_dir_all(&config.paths.history_dir).await?;
	tokio::fs::create_dir_all(&config.paths.output_dir).await?;

	let scheduler = ContestLifecycleScheduler::new(config.paths.pipeline().await?, SchedulerConfig::from(&config));
	let guard = ShutdownOnDrop(scheduler);

	log::info!(
		target: LOG_TARGET,
		"monitoring contests from {}, polling the listing every {}s",
		config.paths.source_dir.display(),
		config.listing_interval
	);

	guard.0.run().await;
	Ok(())
}
