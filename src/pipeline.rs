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

//! One recompute pass and the merge of a fixed result.
//!
//! A recompute pass does the following:
//!
//! 1. Fetch the standings and keep the rated participants, skip the pass if there are none.
//! 2. Make sure every participant has an up-to-date local history, fetching it in full if it
//!    is missing or obsolete.
//! 3. Estimate the strength of every participant.
//! 4. Invert the strengths into the rank to performance table.
//! 5. Publish the table, the strengths and, for heuristic contests, the rounded histories.
//!
//! Any fetch error aborts the pass before anything is published.

use crate::{
	contest::{ContestDescriptor, ContestKind},
	error::Error,
	gateway::{FetchGateway, ResultEntry},
	history::{HistoryStore, PerformanceEntry, PerformanceRecord},
	inverter,
	prelude::{HISTORY_FETCH_CONCURRENCY, LOG_TARGET, Username},
	prometheus,
	publish::{self, PublishGateway, RoundedHistory},
	registry::ContestRegistry,
	strength,
	utils::{KeyedLocks, TimedFuture},
};
use futures::{StreamExt, TryStreamExt, stream};
use std::{collections::BTreeMap, sync::Arc};

/// What a recompute pass ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
	/// Nobody rated takes part (yet), nothing was computed.
	Skipped,
	/// A table for this many participants was published.
	Published { participants: usize },
}

/// Everything a pass needs, cheap to clone.
#[derive(Clone)]
pub struct Pipeline {
	gateway: Arc<dyn FetchGateway>,
	store: Arc<dyn HistoryStore>,
	publisher: Arc<dyn PublishGateway>,
	registry: ContestRegistry,
	user_locks: KeyedLocks,
}

impl Pipeline {
	pub fn new(
		gateway: Arc<dyn FetchGateway>,
		store: Arc<dyn HistoryStore>,
		publisher: Arc<dyn PublishGateway>,
		registry: ContestRegistry,
	) -> Self {
		Self { gateway, store, publisher, registry, user_locks: KeyedLocks::new() }
	}

	pub fn gateway(&self) -> &dyn FetchGateway {
		&*self.gateway
	}

	pub fn publisher(&self) -> &dyn PublishGateway {
		&*self.publisher
	}

	pub fn registry(&self) -> &ContestRegistry {
		&self.registry
	}

	/// Run one recompute pass for `contest`.
	pub async fn recompute(&self, contest: &ContestDescriptor) -> Result<PassOutcome, Error> {
		self.pass(contest, false).await
	}

	/// A recompute pass. The final one works on the local histories as they are, minus the
	/// contest itself, since the source may already count its result.
	async fn pass(&self, contest: &ContestDescriptor, final_pass: bool) -> Result<PassOutcome, Error> {
		let id = contest.short_id();
		let kind = contest.kind();

		let participants: Vec<_> =
			self.gateway.standings(id).await?.into_iter().filter(|p| p.is_rated).collect();
		log::info!(target: LOG_TARGET, "{} rated users joined {id}", participants.len());
		if participants.is_empty() {
			return Ok(PassOutcome::Skipped);
		}

		let records: BTreeMap<Username, PerformanceRecord> = stream::iter(participants)
			.map(|p| async move {
				let official = if final_pass { None } else { p.competitions.map(|c| c as usize) };
				let record = self.ensure_history(&p.username, kind, official).await?;
				let record = if final_pass { record.without(id) } else { record };
				Ok::<_, Error>((p.username, record))
			})
			.buffer_unordered(HISTORY_FETCH_CONCURRENCY)
			.try_collect()
			.await?;

		let newcomer = contest.newcomer_strength();
		let strengths: BTreeMap<&str, f64> = records
			.iter()
			.map(|(username, record)| {
				(username.as_str(), strength::estimate(&record.inner_performances(), newcomer))
			})
			.collect();

		let population: Vec<f64> = strengths.values().copied().collect();
		let max_performance = contest.max_performance();
		let (table, elapsed) =
			tokio::task::spawn_blocking(move || inverter::invert(&population, max_performance))
				.timed()
				.await;
		let table = table??;
		log::trace!(target: LOG_TARGET, "table of {id} took {}ms", elapsed.as_millis());
		prometheus::observe_inversion_duration(elapsed.as_millis() as f64);
		prometheus::set_participants(table.len());

		let publisher = self.publisher();
		publish::publish_json(publisher, &publish::ranking_path(id), &table).await;
		publish::publish_json(publisher, &publish::strength_path(id, kind), &strengths).await;
		if kind == ContestKind::Heuristic {
			let histories: BTreeMap<&str, RoundedHistory> = records
				.iter()
				.map(|(username, record)| (username.as_str(), RoundedHistory::from(record)))
				.collect();
			publish::publish_json(publisher, &publish::rounded_history_path(id), &histories).await;
		}

		Ok(PassOutcome::Published { participants: table.len() })
	}

	/// Merge the fixed result of `contest` into the histories of its rated participants.
	///
	/// Returns `false` while the result is not fixed. Once it is, the table is produced one
	/// final time from the pre-contest histories before they are updated.
	pub async fn finalize(&self, contest: &ContestDescriptor) -> Result<bool, Error> {
		let results = self.gateway.result(contest.short_id()).await?;
		if results.is_empty() {
			log::debug!(target: LOG_TARGET, "result of {} is not fixed yet", contest.short_id());
			return Ok(false);
		}

		self.pass(contest, true).await?;

		let rated: Vec<ResultEntry> = results.into_iter().filter(|r| r.is_rated).collect();
		let n = rated.len();
		stream::iter(rated)
			.map(|entry| async move { self.merge_result(contest, entry).await })
			.buffer_unordered(HISTORY_FETCH_CONCURRENCY)
			.try_collect::<Vec<()>>()
			.await?;

		prometheus::on_result_applied();
		log::info!(target: LOG_TARGET, "merged the result of {} into {n} histories", contest.short_id());
		Ok(true)
	}

	/// Fetch the full history of every user in `usernames` ahead of their next contest.
	///
	/// Users whose history can't be fetched are skipped. Returns how many histories were stored.
	pub async fn prefetch(&self, usernames: Vec<Username>, kind: ContestKind) -> usize {
		stream::iter(usernames)
			.map(|username| async move {
				let _guard = self.user_locks.lock(&lock_key(&username, kind)).await;
				match self.fetch_history(&username, kind).await {
					Ok(record) => {
						log::debug!(target: LOG_TARGET, "{username} took part in {} rated contests", record.len());
						true
					},
					Err(e) => {
						log::warn!(target: LOG_TARGET, "prefetching the history of {username} failed: {e}");
						false
					},
				}
			})
			.buffer_unordered(HISTORY_FETCH_CONCURRENCY)
			.filter(|stored| futures::future::ready(*stored))
			.count()
			.await
	}

	async fn merge_result(&self, contest: &ContestDescriptor, entry: ResultEntry) -> Result<(), Error> {
		let kind = contest.kind();
		let _guard = self.user_locks.lock(&lock_key(&entry.username, kind)).await;

		// A capped performance hides the inner one, only the source knows it.
		let capped = entry.rounded_performance == contest.max_performance();
		match self.store.load(&entry.username, kind).await? {
			Some(mut record) if !capped => {
				let appended = record.append(PerformanceEntry {
					contest_short_id: contest.short_id().to_string(),
					rounded_performance: entry.rounded_performance,
					inner_performance: entry.inner_performance.unwrap_or(entry.rounded_performance),
					end_time: contest.end_time(),
					weight: contest.weight(),
				});
				if appended {
					self.store.save(&entry.username, kind, &record).await?;
				}
			},
			_ => {
				self.store.discard(&entry.username, kind).await?;
				self.fetch_history(&entry.username, kind).await?;
			},
		}

		Ok(())
	}

	/// Local history of `username`, refreshed in full if missing or obsolete.
	async fn ensure_history(
		&self,
		username: &str,
		kind: ContestKind,
		official: Option<usize>,
	) -> Result<PerformanceRecord, Error> {
		let _guard = self.user_locks.lock(&lock_key(username, kind)).await;

		if let Some(record) = self.store.load(username, kind).await? {
			if !record.is_obsolete(official) {
				return Ok(record);
			}
			log::debug!(
				target: LOG_TARGET,
				"history of {username} is obsolete ({} local, {official:?} official), refetching",
				record.len()
			);
			self.store.discard(username, kind).await?;
		}

		let record = self.fetch_history(username, kind).await?;
		if record.is_obsolete(official) {
			log::warn!(
				target: LOG_TARGET,
				"fresh history of {username} has {} contests but the standings report {official:?}",
				record.len()
			);
		}
		Ok(record)
	}

	/// Replace the local history of `username` by the one of the source.
	///
	/// The caller must hold the lock of the user.
	async fn fetch_history(&self, username: &str, kind: ContestKind) -> Result<PerformanceRecord, Error> {
		let entries = self
			.gateway
			.user_history(username, kind)
			.await?
			.into_iter()
			.filter(|e| e.is_rated)
			.map(|e| PerformanceEntry {
				weight: self.weight_of(kind, &e.contest_short_id),
				contest_short_id: e.contest_short_id,
				rounded_performance: e.rounded_performance,
				inner_performance: e.inner_performance,
				end_time: e.end_time,
			})
			.collect();

		let record = PerformanceRecord::from_entries(entries);
		self.store.save(username, kind, &record).await?;
		prometheus::on_history_refetch();
		Ok(record)
	}

	fn weight_of(&self, kind: ContestKind, contest: &str) -> f64 {
		match kind {
			ContestKind::Algorithmic => 1.0,
			ContestKind::Heuristic => self.registry.weight(contest).unwrap_or_else(|| {
				log::trace!(target: LOG_TARGET, "weight of unknown contest {contest} defaults to 1");
				1.0
			}),
		}
	}
}

fn lock_key(username: &str, kind: ContestKind) -> String {
	format!("{kind}/{username}")
}
