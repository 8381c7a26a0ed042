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

//! Per user performance history and where it is kept.

use crate::{
	contest::ContestKind,
	error::Error,
	prelude::{ContestId, LOG_TARGET, RECORD_SCHEMA_VERSION},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One rated contest in the history of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
	pub contest_short_id: ContestId,
	/// The published, possibly capped, performance.
	pub rounded_performance: i32,
	/// The uncapped performance used for strength estimation.
	pub inner_performance: i32,
	pub end_time: DateTime<Utc>,
	pub weight: f64,
}

/// Rated history of one user for one contest kind, ordered by contest end time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
	pub schema_version: u32,
	entries: Vec<PerformanceEntry>,
}

impl Default for PerformanceRecord {
	fn default() -> Self {
		Self { schema_version: RECORD_SCHEMA_VERSION, entries: Vec::new() }
	}
}

impl PerformanceRecord {
	/// Build a record from entries in any order, dropping duplicated contests.
	pub fn from_entries(mut entries: Vec<PerformanceEntry>) -> Self {
		entries.sort_by_key(|e| e.end_time);
		let mut record = Self::default();
		for entry in entries {
			record.append(entry);
		}
		record
	}

	pub fn entries(&self) -> &[PerformanceEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains(&self, contest: &str) -> bool {
		self.entries.iter().any(|e| e.contest_short_id == contest)
	}

	/// Append a contest result, returns `false` if the contest is already part of the history.
	pub fn append(&mut self, entry: PerformanceEntry) -> bool {
		if self.contains(&entry.contest_short_id) {
			return false;
		}
		self.entries.push(entry);
		true
	}

	/// The record without the result of `contest`.
	pub fn without(mut self, contest: &str) -> Self {
		self.entries.retain(|e| e.contest_short_id != contest);
		self
	}

	/// Inner performances, oldest first.
	pub fn inner_performances(&self) -> Vec<i32> {
		self.entries.iter().map(|e| e.inner_performance).collect()
	}

	/// Whether the record no longer matches the number of rated contests the source reports.
	pub fn is_obsolete(&self, official_count: Option<usize>) -> bool {
		self.schema_version != RECORD_SCHEMA_VERSION ||
			official_count.is_some_and(|count| count != self.entries.len())
	}
}

/// Storage of performance records.
#[async_trait]
pub trait HistoryStore: Send + Sync {
	async fn load(&self, username: &str, kind: ContestKind) -> Result<Option<PerformanceRecord>, Error>;

	async fn save(&self, username: &str, kind: ContestKind, record: &PerformanceRecord) -> Result<(), Error>;

	async fn exists(&self, username: &str, kind: ContestKind) -> Result<bool, Error>;

	/// Forget the record, it will be fetched again in full.
	async fn discard(&self, username: &str, kind: ContestKind) -> Result<(), Error>;
}

/// Keeps every record at `<root>/<kind>/<username>.json`.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
	root: PathBuf,
}

impl FileHistoryStore {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	fn path(&self, username: &str, kind: ContestKind) -> PathBuf {
		self.root.join(kind.as_str()).join(format!("{username}.json"))
	}
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
	async fn load(&self, username: &str, kind: ContestKind) -> Result<Option<PerformanceRecord>, Error> {
		let path = self.path(username, kind);
		let bytes = match tokio::fs::read(&path).await {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e.into()),
		};

		match serde_json::from_slice(&bytes) {
			Ok(record) => Ok(Some(record)),
			Err(e) => {
				// An unreadable record is as good as an obsolete one.
				log::warn!(target: LOG_TARGET, "dropping unreadable history {}: {e}", path.display());
				Ok(None)
			},
		}
	}

	async fn save(&self, username: &str, kind: ContestKind, record: &PerformanceRecord) -> Result<(), Error> {
		let path = self.path(username, kind);
		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(&path, serde_json::to_vec(record)?).await?;
		Ok(())
	}

	async fn exists(&self, username: &str, kind: ContestKind) -> Result<bool, Error> {
		Ok(tokio::fs::try_exists(self.path(username, kind)).await?)
	}

	async fn discard(&self, username: &str, kind: ContestKind) -> Result<(), Error> {
		match tokio::fs::remove_file(self.path(username, kind)).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}
