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

//! Access to contest listings, standings, results and user histories.
//!
//! Scraping, login and retries live with whoever implements [`FetchGateway`]. The gateway
//! returns [`Error::Unavailable`] when the data can't be obtained right now, which aborts the
//! current tick.

mod cache;
mod directory;

pub use cache::CachedGateway;
pub use directory::DirectoryGateway;

use crate::{
	contest::{ContestKind, ContestListing},
	error::Error,
	prelude::{ContestId, Username},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contestant in the current standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
	pub username: Username,
	pub is_rated: bool,
	/// Number of rated contests the user took part in before, if reported.
	pub competitions: Option<u32>,
}

/// A contestant in the fixed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
	pub username: Username,
	pub is_rated: bool,
	pub rounded_performance: i32,
	pub inner_performance: Option<i32>,
}

/// One contest of a user history as reported by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
	pub contest_short_id: ContestId,
	pub rounded_performance: i32,
	pub inner_performance: i32,
	pub end_time: DateTime<Utc>,
	pub is_rated: bool,
}

#[async_trait]
pub trait FetchGateway: Send + Sync {
	/// Contests currently running.
	async fn active_contests(&self) -> Result<Vec<ContestListing>, Error>;

	/// Contests announced but not started yet.
	async fn upcoming_contests(&self) -> Result<Vec<ContestListing>, Error>;

	async fn standings(&self, contest: &str) -> Result<Vec<StandingsEntry>, Error>;

	/// The fixed result, empty as long as the result is not fixed.
	async fn result(&self, contest: &str) -> Result<Vec<ResultEntry>, Error>;

	async fn user_history(&self, username: &str, kind: ContestKind) -> Result<Vec<HistoryEntry>, Error>;
}
