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

//! Gateway over a directory the scraper dumps the raw JSON of the contest site into.
//!
//! Layout:
//!
//! ```text
//! contests.json                      {"active": [...], "upcoming": [...]}
//! standings/<contest>.json           {"StandingsData": [...]}
//! results/<contest>.json             [...], absent until the result is fixed
//! history/<algo|heuristic>/<user>.json
//! ```

use super::{FetchGateway, HistoryEntry, ResultEntry, StandingsEntry};
use crate::{
	contest::{ContestKind, ContestListing},
	error::Error,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
struct RawListing {
	#[serde(default)]
	active: Vec<ContestListing>,
	#[serde(default)]
	upcoming: Vec<ContestListing>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStandings {
	standings_data: Vec<RawStandingsRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawStandingsRow {
	user_screen_name: String,
	is_rated: bool,
	#[serde(default)]
	competitions: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawResultRow {
	user_screen_name: String,
	is_rated: bool,
	performance: i32,
	#[serde(default)]
	inner_performance: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHistoryRow {
	/// e.g. `abc350.contest.atcoder.jp`
	contest_screen_name: String,
	performance: i32,
	#[serde(default)]
	inner_performance: Option<i32>,
	end_time: DateTime<Utc>,
	is_rated: bool,
}

#[derive(Debug, Clone)]
pub struct DirectoryGateway {
	root: PathBuf,
}

impl DirectoryGateway {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	async fn listing(&self) -> Result<RawListing, Error> {
		read_json(&self.root.join("contests.json")).await?.ok_or_else(|| unavailable("contest listing"))
	}
}

#[async_trait]
impl FetchGateway for DirectoryGateway {
	async fn active_contests(&self) -> Result<Vec<ContestListing>, Error> {
		Ok(self.listing().await?.active)
	}

	async fn upcoming_contests(&self) -> Result<Vec<ContestListing>, Error> {
		Ok(self.listing().await?.upcoming)
	}

	async fn standings(&self, contest: &str) -> Result<Vec<StandingsEntry>, Error> {
		let path = self.root.join("standings").join(format!("{contest}.json"));
		let raw: RawStandings =
			read_json(&path).await?.ok_or_else(|| unavailable(&format!("standings of {contest}")))?;

		Ok(raw
			.standings_data
			.into_iter()
			.map(|row| StandingsEntry {
				username: row.user_screen_name,
				is_rated: row.is_rated,
				competitions: row.competitions,
			})
			.collect())
	}

	async fn result(&self, contest: &str) -> Result<Vec<ResultEntry>, Error> {
		let path = self.root.join("results").join(format!("{contest}.json"));
		let rows: Vec<RawResultRow> = read_json(&path).await?.unwrap_or_default();

		Ok(rows
			.into_iter()
			.map(|row| ResultEntry {
				username: row.user_screen_name,
				is_rated: row.is_rated,
				rounded_performance: row.performance,
				inner_performance: row.inner_performance,
			})
			.collect())
	}

	async fn user_history(&self, username: &str, kind: ContestKind) -> Result<Vec<HistoryEntry>, Error> {
		let path = self.root.join("history").join(kind.as_str()).join(format!("{username}.json"));
		let rows: Vec<RawHistoryRow> =
			read_json(&path).await?.ok_or_else(|| unavailable(&format!("history of {username}")))?;

		Ok(rows
			.into_iter()
			.map(|row| {
				let contest_short_id = match row.contest_screen_name.split_once('.') {
					Some((id, _)) => id.to_string(),
					None => row.contest_screen_name,
				};
				HistoryEntry {
					contest_short_id,
					rounded_performance: row.performance,
					inner_performance: row.inner_performance.unwrap_or(row.performance),
					end_time: row.end_time,
					is_rated: row.is_rated,
				}
			})
			.collect())
	}
}

fn unavailable(what: &str) -> Error {
	Error::Unavailable(format!("{what} not dumped yet"))
}

/// Read and decode a JSON file, `None` if it doesn't exist.
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, Error> {
	match tokio::fs::read(path).await {
		Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e.into()),
	}
}
