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

//! Artifacts handed to downstream consumers and where they end up.

use crate::{
	contest::ContestKind,
	error::Error,
	history::PerformanceRecord,
	prelude::{ContestId, LOG_TARGET},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory below the output root every artifact lives in.
pub const DATA_DIR: &str = "data";

/// File name suffix of the contest type artifacts.
pub const CONTEST_TYPE_SUFFIX: &str = "_contest_type.json";

/// `data/<id>_ranking_to_perf.json`
pub fn ranking_path(contest: &str) -> String {
	format!("data/{contest}_ranking_to_perf.json")
}

/// `data/<id>_<kind>_average_performance.json`
pub fn strength_path(contest: &str, kind: ContestKind) -> String {
	format!("data/{contest}_{kind}_average_performance.json")
}

/// `data/<id>_rounded_perf_history.json`
pub fn rounded_history_path(contest: &str) -> String {
	format!("data/{contest}_rounded_perf_history.json")
}

/// `data/<id>_contest_type.json`
pub fn contest_type_path(contest: &str) -> String {
	format!("{DATA_DIR}/{contest}{CONTEST_TYPE_SUFFIX}")
}

/// Rounded history of one participant, column-wise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundedHistory {
	#[serde(rename = "RoundedPerformance")]
	pub rounded_performances: Vec<i32>,
	#[serde(rename = "ContestShortName")]
	pub contests: Vec<ContestId>,
	#[serde(rename = "ContestEndTime")]
	pub end_times: Vec<DateTime<Utc>>,
	#[serde(rename = "Weight")]
	pub weights: Vec<f64>,
}

impl From<&PerformanceRecord> for RoundedHistory {
	fn from(record: &PerformanceRecord) -> Self {
		let mut history = Self::default();
		for entry in record.entries() {
			history.rounded_performances.push(entry.rounded_performance);
			history.contests.push(entry.contest_short_id.clone());
			history.end_times.push(entry.end_time);
			history.weights.push(entry.weight);
		}
		history
	}
}

/// Persists artifacts and pushes them wherever downstream consumers read them.
#[async_trait]
pub trait PublishGateway: Send + Sync {
	async fn publish(&self, artifact_path: &str, content: String) -> Result<(), Error>;
}

/// Writes artifacts below a root directory. Pushing that directory is left to the operator.
#[derive(Debug, Clone)]
pub struct FilePublisher {
	root: PathBuf,
}

impl FilePublisher {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}
}

#[async_trait]
impl PublishGateway for FilePublisher {
	async fn publish(&self, artifact_path: &str, content: String) -> Result<(), Error> {
		let path = self.root.join(artifact_path);
		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(&path, content).await?;
		log::debug!(target: LOG_TARGET, "published {}", path.display());
		Ok(())
	}
}

/// Serialize and publish, logging instead of failing.
pub async fn publish_json<T: Serialize + ?Sized>(publisher: &dyn PublishGateway, artifact_path: &str, value: &T) {
	let content = match serde_json::to_string(value) {
		Ok(content) => content,
		Err(e) => {
			log::error!(target: LOG_TARGET, "failed to encode {artifact_path}: {e}");
			return;
		},
	};

	if let Err(e) = publisher.publish(artifact_path, content).await {
		crate::prometheus::on_publish_failure();
		log::error!(target: LOG_TARGET, "failed to publish {artifact_path}: {e}");
	}
}
