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
	contest::ContestKind,
	error::Error,
	gateway::{CachedGateway, DirectoryGateway},
	history::FileHistoryStore,
	pipeline::Pipeline,
	publish::FilePublisher,
	registry::ContestRegistry,
	scheduler::SchedulerConfig,
};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct PathsConfig {
	/// Directory with the JSON dumps of the contest site: the contest listing, standings,
	/// results and user histories.
	#[clap(long, env = "SOURCE_DIR", default_value = "source")]
	pub source_dir: PathBuf,

	/// Directory the per-user performance histories are kept in.
	#[clap(long, env = "HISTORY_DIR", default_value = "history")]
	pub history_dir: PathBuf,

	/// Directory the artifacts are written to, pushing it anywhere is up to the operator.
	#[clap(long, env = "OUTPUT_DIR", default_value = "output")]
	pub output_dir: PathBuf,

	/// Seconds the contest listing and standings are cached for.
	#[clap(long, default_value_t = 30)]
	pub cache_ttl: u64,
}

impl PathsConfig {
	/// The pipeline over these directories, knowing every contest published so far.
	pub async fn pipeline(&self) -> Result<Pipeline, Error> {
		let gateway = CachedGateway::new(DirectoryGateway::new(&self.source_dir), Duration::from_secs(self.cache_ttl));
		let registry = ContestRegistry::load(&self.output_dir).await?;
		Ok(Pipeline::new(
			Arc::new(gateway),
			Arc::new(FileHistoryStore::new(&self.history_dir)),
			Arc::new(FilePublisher::new(&self.output_dir)),
			registry,
		))
	}
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct MonitorConfig {
	#[clap(flatten)]
	pub paths: PathsConfig,

	/// Seconds between two polls of the contest listing.
	#[clap(long, default_value_t = 60)]
	pub listing_interval: u64,

	/// Seconds between two passes of an algorithmic contest.
	#[clap(long, default_value_t = 180)]
	pub algo_interval: u64,

	/// Seconds between two passes of a heuristic contest shorter than a day.
	#[clap(long, default_value_t = 120)]
	pub heuristic_short_interval: u64,

	/// Seconds between two passes of a heuristic contest lasting a day or more.
	#[clap(long, default_value_t = 600)]
	pub heuristic_long_interval: u64,

	/// Seconds between two polls for the fixed result of a contest.
	#[clap(long, default_value_t = 3 * 60 * 60)]
	pub result_interval: u64,

	/// Rated contests starting within this many minutes get an early pass.
	#[clap(long, default_value_t = 120)]
	pub upcoming_window: i64,

	/// Max number of passes running at the same time.
	#[clap(long, default_value_t = 4)]
	pub max_concurrent_passes: usize,
}

impl From<&MonitorConfig> for SchedulerConfig {
	fn from(config: &MonitorConfig) -> Self {
		Self {
			listing_interval: Duration::from_secs(config.listing_interval),
			algo_interval: Duration::from_secs(config.algo_interval),
			heuristic_short_interval: Duration::from_secs(config.heuristic_short_interval),
			heuristic_long_interval: Duration::from_secs(config.heuristic_long_interval),
			result_interval: Duration::from_secs(config.result_interval),
			upcoming_window: chrono::Duration::minutes(config.upcoming_window),
			max_concurrent_passes: config.max_concurrent_passes,
		}
	}
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct PredictConfig {
	#[clap(flatten)]
	pub paths: PathsConfig,

	/// Short id of the contest, e.g. `abc350`. It must be part of the contest listing.
	#[clap(long)]
	pub contest: String,

	/// Merge the fixed result into the histories if it is available.
	#[clap(long)]
	pub finalize: bool,
}

#[derive(Debug, Clone, PartialEq, clap::Parser)]
pub struct PrefetchConfig {
	#[clap(flatten)]
	pub paths: PathsConfig,

	/// File with one username per line.
	#[clap(long)]
	pub users: PathBuf,

	/// Which history to fetch, `algo` or `heuristic`.
	#[clap(long, default_value = "algo")]
	pub kind: ContestKind,
}
