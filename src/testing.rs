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

//! In-memory collaborators for unit tests.

use crate::{
	contest::{ContestKind, ContestListing},
	error::Error,
	gateway::{FetchGateway, HistoryEntry, ResultEntry, StandingsEntry},
	history::{HistoryStore, PerformanceRecord},
	prelude::{ContestId, Username},
	publish::PublishGateway,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::{
	collections::{BTreeMap, HashMap},
	sync::{
		Mutex,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration,
};

pub fn rated(username: &str, competitions: Option<u32>) -> StandingsEntry {
	StandingsEntry { username: username.into(), is_rated: true, competitions }
}

pub fn unrated(username: &str) -> StandingsEntry {
	StandingsEntry { username: username.into(), is_rated: false, competitions: None }
}

pub fn result(username: &str, rounded: i32, inner: Option<i32>) -> ResultEntry {
	ResultEntry { username: username.into(), is_rated: true, rounded_performance: rounded, inner_performance: inner }
}

pub fn past(contest: &str, day: u32, perf: i32) -> HistoryEntry {
	HistoryEntry {
		contest_short_id: contest.into(),
		rounded_performance: perf,
		inner_performance: perf,
		end_time: day_of_2024(day),
		is_rated: true,
	}
}

/// A listing row, `marker` is `Ⓐ` for algorithmic contests.
pub fn listing(marker: char, contest: &str, start: DateTime<Utc>, duration: &str, range: &str) -> ContestListing {
	ContestListing {
		start_time: start.format("%Y-%m-%d %H:%M:%S+0000").to_string(),
		name: format!("{marker}◉{contest}"),
		link: format!("/contests/{contest}"),
		duration: duration.into(),
		rate_range: range.into(),
	}
}

pub fn day_of_2024(day: u32) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
}

/// Standings that are not configured are unavailable, results default to not fixed and
/// histories to empty.
#[derive(Default)]
pub struct FakeGateway {
	pub active: Mutex<Vec<ContestListing>>,
	pub upcoming: Mutex<Vec<ContestListing>>,
	pub standings: Mutex<HashMap<ContestId, Vec<StandingsEntry>>>,
	pub results: Mutex<HashMap<ContestId, Vec<ResultEntry>>>,
	pub histories: Mutex<HashMap<Username, Vec<HistoryEntry>>>,
	pub listing_unavailable: AtomicBool,
	pub standings_calls: AtomicUsize,
	pub result_calls: AtomicUsize,
	pub history_calls: AtomicUsize,
}

impl FakeGateway {
	pub fn set_standings(&self, contest: &str, entries: Vec<StandingsEntry>) {
		self.standings.lock().unwrap().insert(contest.into(), entries);
	}

	pub fn set_result(&self, contest: &str, entries: Vec<ResultEntry>) {
		self.results.lock().unwrap().insert(contest.into(), entries);
	}

	pub fn set_active(&self, rows: Vec<ContestListing>) {
		*self.active.lock().unwrap() = rows;
	}

	pub fn set_upcoming(&self, rows: Vec<ContestListing>) {
		*self.upcoming.lock().unwrap() = rows;
	}

	pub fn set_history(&self, username: &str, entries: Vec<HistoryEntry>) {
		self.histories.lock().unwrap().insert(username.into(), entries);
	}

	pub fn history_calls(&self) -> usize {
		self.history_calls.load(Ordering::SeqCst)
	}

	pub fn standings_calls(&self) -> usize {
		self.standings_calls.load(Ordering::SeqCst)
	}

	pub fn result_calls(&self) -> usize {
		self.result_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl FetchGateway for FakeGateway {
	async fn active_contests(&self) -> Result<Vec<ContestListing>, Error> {
		if self.listing_unavailable.load(Ordering::SeqCst) {
			return Err(Error::Unavailable("contest listing".into()));
		}
		Ok(self.active.lock().unwrap().clone())
	}

	async fn upcoming_contests(&self) -> Result<Vec<ContestListing>, Error> {
		if self.listing_unavailable.load(Ordering::SeqCst) {
			return Err(Error::Unavailable("contest listing".into()));
		}
		Ok(self.upcoming.lock().unwrap().clone())
	}

	async fn standings(&self, contest: &str) -> Result<Vec<StandingsEntry>, Error> {
		self.standings_calls.fetch_add(1, Ordering::SeqCst);
		self.standings
			.lock()
			.unwrap()
			.get(contest)
			.cloned()
			.ok_or_else(|| Error::Unavailable(format!("standings of {contest}")))
	}

	async fn result(&self, contest: &str) -> Result<Vec<ResultEntry>, Error> {
		self.result_calls.fetch_add(1, Ordering::SeqCst);
		Ok(self.results.lock().unwrap().get(contest).cloned().unwrap_or_default())
	}

	async fn user_history(&self, username: &str, _kind: ContestKind) -> Result<Vec<HistoryEntry>, Error> {
		self.history_calls.fetch_add(1, Ordering::SeqCst);
		Ok(self.histories.lock().unwrap().get(username).cloned().unwrap_or_default())
	}
}

#[derive(Default)]
pub struct MemoryStore {
	records: Mutex<HashMap<(Username, ContestKind), PerformanceRecord>>,
}

impl MemoryStore {
	pub fn get(&self, username: &str, kind: ContestKind) -> Option<PerformanceRecord> {
		self.records.lock().unwrap().get(&(username.to_string(), kind)).cloned()
	}

	pub fn put(&self, username: &str, kind: ContestKind, record: PerformanceRecord) {
		self.records.lock().unwrap().insert((username.to_string(), kind), record);
	}
}

#[async_trait]
impl HistoryStore for MemoryStore {
	async fn load(&self, username: &str, kind: ContestKind) -> Result<Option<PerformanceRecord>, Error> {
		Ok(self.get(username, kind))
	}

	async fn save(&self, username: &str, kind: ContestKind, record: &PerformanceRecord) -> Result<(), Error> {
		self.put(username, kind, record.clone());
		Ok(())
	}

	async fn exists(&self, username: &str, kind: ContestKind) -> Result<bool, Error> {
		Ok(self.get(username, kind).is_some())
	}

	async fn discard(&self, username: &str, kind: ContestKind) -> Result<(), Error> {
		self.records.lock().unwrap().remove(&(username.to_string(), kind));
		Ok(())
	}
}

#[derive(Default)]
pub struct MemoryPublisher {
	artifacts: Mutex<BTreeMap<String, String>>,
	publishes: AtomicUsize,
	delays: Mutex<HashMap<String, Duration>>,
}

impl MemoryPublisher {
	/// Publishing `path` takes `delay`.
	pub fn slow_down(&self, path: &str, delay: Duration) {
		self.delays.lock().unwrap().insert(path.to_string(), delay);
	}

	pub fn artifact(&self, path: &str) -> Option<serde_json::Value> {
		let artifacts = self.artifacts.lock().unwrap();
		artifacts.get(path).map(|content| serde_json::from_str(content).unwrap())
	}

	pub fn paths(&self) -> Vec<String> {
		self.artifacts.lock().unwrap().keys().cloned().collect()
	}

	/// Number of publications, republishing the same path included.
	pub fn publishes(&self) -> usize {
		self.publishes.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl PublishGateway for MemoryPublisher {
	async fn publish(&self, artifact_path: &str, content: String) -> Result<(), Error> {
		let delay = self.delays.lock().unwrap().get(artifact_path).copied();
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
		self.publishes.fetch_add(1, Ordering::SeqCst);
		self.artifacts.lock().unwrap().insert(artifact_path.to_string(), content);
		Ok(())
	}
}
