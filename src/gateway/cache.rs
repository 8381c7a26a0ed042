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

use super::{FetchGateway, HistoryEntry, ResultEntry, StandingsEntry};
use crate::{
	contest::{ContestKind, ContestListing},
	error::Error,
	prelude::LOG_TARGET,
};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Mutex, time::Duration};
use tokio::time::Instant;

/// Values keyed by string that expire `ttl` after being inserted.
struct TtlMap<V> {
	ttl: Duration,
	entries: Mutex<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlMap<V> {
	fn new(ttl: Duration) -> Self {
		Self { ttl, entries: Mutex::new(HashMap::new()) }
	}

	fn get(&self, key: &str) -> Option<V> {
		let mut entries = self.entries.lock().expect("Lock is poisoned");
		match entries.get(key) {
			Some((at, value)) if at.elapsed() < self.ttl => Some(value.clone()),
			Some(_) => {
				entries.remove(key);
				None
			},
			None => None,
		}
	}

	fn insert(&self, key: String, value: V) {
		self.entries.lock().expect("Lock is poisoned").insert(key, (Instant::now(), value));
	}
}

/// Caches listings and standings of the wrapped gateway for `ttl`.
///
/// Results and user histories are never cached.
pub struct CachedGateway<G> {
	inner: G,
	listings: TtlMap<Vec<ContestListing>>,
	standings: TtlMap<Vec<StandingsEntry>>,
}

impl<G: FetchGateway> CachedGateway<G> {
	pub fn new(inner: G, ttl: Duration) -> Self {
		Self { inner, listings: TtlMap::new(ttl), standings: TtlMap::new(ttl) }
	}
}

#[async_trait]
impl<G: FetchGateway> FetchGateway for CachedGateway<G> {
	async fn active_contests(&self) -> Result<Vec<ContestListing>, Error> {
		if let Some(hit) = self.listings.get("active") {
			return Ok(hit);
		}
		let listing = self.inner.active_contests().await?;
		self.listings.insert("active".into(), listing.clone());
		Ok(listing)
	}

	async fn upcoming_contests(&self) -> Result<Vec<ContestListing>, Error> {
		if let Some(hit) = self.listings.get("upcoming") {
			return Ok(hit);
		}
		let listing = self.inner.upcoming_contests().await?;
		self.listings.insert("upcoming".into(), listing.clone());
		Ok(listing)
	}

	async fn standings(&self, contest: &str) -> Result<Vec<StandingsEntry>, Error> {
		if let Some(hit) = self.standings.get(contest) {
			log::trace!(target: LOG_TARGET, "standings of {contest} served from cache");
			return Ok(hit);
		}
		let standings = self.inner.standings(contest).await?;
		self.standings.insert(contest.to_string(), standings.clone());
		Ok(standings)
	}

	async fn result(&self, contest: &str) -> Result<Vec<ResultEntry>, Error> {
		self.inner.result(contest).await
	}

	async fn user_history(&self, username: &str, kind: ContestKind) -> Result<Vec<HistoryEntry>, Error> {
		self.inner.user_history(username, kind).await
	}
}
