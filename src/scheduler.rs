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

//! Drives every contest from its discovery until its result is merged.
//!
//! Every listing poll the scheduler does the following:
//!
//! 1. Discover new contests: register them and publish their contest type, once.
//! 2. Give rated contests starting soon one early pass.
//! 3. For contests that became active, run a pass right away and keep recomputing until the
//!    contest ends. At the same time start polling for the fixed result.
//! 4. Once the result is fixed, merge it into the histories and cancel everything left.
//!
//! Passes of the same contest never overlap and at most `max_concurrent_passes` passes run at
//! once. A failing pass leaves everything as it was and the next tick simply tries again.

use crate::{
	contest::{ContestDescriptor, ContestKind, ContestListing},
	error::Error,
	pipeline::{PassOutcome, Pipeline},
	prelude::{ContestId, LOG_TARGET},
	prometheus, publish,
	tasks::{Schedule, TaskHandle, spawn_recurring},
	utils::KeyedLocks,
};
use chrono::{DateTime, Utc};
use std::{
	collections::{HashMap, HashSet},
	ops::ControlFlow,
	sync::{Arc, Mutex},
	time::Duration,
};
use tokio::{sync::Semaphore, time::Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
	/// Time between two listing polls.
	pub listing_interval: Duration,
	pub algo_interval: Duration,
	/// Recompute interval of heuristic contests shorter than a day.
	pub heuristic_short_interval: Duration,
	pub heuristic_long_interval: Duration,
	/// Time between two polls for the fixed result.
	pub result_interval: Duration,
	/// Rated contests starting within this window get an early pass.
	pub upcoming_window: chrono::Duration,
	pub max_concurrent_passes: usize,
}

impl Default for SchedulerConfig {
	fn default() -> Self {
		Self {
			listing_interval: Duration::from_secs(60),
			algo_interval: Duration::from_secs(3 * 60),
			heuristic_short_interval: Duration::from_secs(2 * 60),
			heuristic_long_interval: Duration::from_secs(10 * 60),
			result_interval: Duration::from_secs(3 * 60 * 60),
			upcoming_window: chrono::Duration::hours(2),
			max_concurrent_passes: 4,
		}
	}
}

impl SchedulerConfig {
	pub fn recompute_interval(&self, contest: &ContestDescriptor) -> Duration {
		match contest.kind() {
			ContestKind::Algorithmic => self.algo_interval,
			ContestKind::Heuristic if contest.is_short() => self.heuristic_short_interval,
			ContestKind::Heuristic => self.heuristic_long_interval,
		}
	}
}

/// Where a contest is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContestState {
	/// Known, nothing scheduled.
	Discovered,
	/// Starts soon, the early pass was scheduled.
	Upcoming,
	/// Active, recomputed until it ends.
	PeriodicRecompute,
	/// Ended, waiting for the fixed result.
	AwaitingOfficialResult,
	/// Result merged or the contest is unrated.
	Finalized,
}

struct Tracked {
	contest: ContestDescriptor,
	finalized: bool,
	early_pass: Option<TaskHandle>,
	recompute: Option<TaskHandle>,
	result_poll: Option<TaskHandle>,
}

impl Tracked {
	fn new(contest: ContestDescriptor) -> Self {
		let finalized = !contest.is_rated();
		Self { contest, finalized, early_pass: None, recompute: None, result_poll: None }
	}

	fn state(&self) -> ContestState {
		match (&self.recompute, &self.early_pass) {
			_ if self.finalized => ContestState::Finalized,
			(Some(recompute), _) if recompute.is_finished() => ContestState::AwaitingOfficialResult,
			(Some(_), _) => ContestState::PeriodicRecompute,
			(None, Some(_)) => ContestState::Upcoming,
			(None, None) => ContestState::Discovered,
		}
	}

	/// Every trigger has stopped, nothing runs on behalf of the contest anymore.
	fn is_idle(&self) -> bool {
		[&self.early_pass, &self.recompute, &self.result_poll].into_iter().flatten().all(TaskHandle::is_finished)
	}

	fn cancel_all(&self) {
		for handle in [&self.early_pass, &self.recompute, &self.result_poll].into_iter().flatten() {
			handle.cancel();
		}
	}
}

#[derive(Clone)]
pub struct ContestLifecycleScheduler {
	pipeline: Pipeline,
	config: SchedulerConfig,
	contests: Arc<Mutex<HashMap<ContestId, Tracked>>>,
	contest_locks: KeyedLocks,
	workers: Arc<Semaphore>,
}

impl ContestLifecycleScheduler {
	pub fn new(pipeline: Pipeline, config: SchedulerConfig) -> Self {
		let workers = Arc::new(Semaphore::new(config.max_concurrent_passes.max(1)));
		Self { pipeline, config, contests: Default::default(), contest_locks: KeyedLocks::new(), workers }
	}

	/// Poll the listing every `listing_interval`, forever.
	pub async fn run(&self) {
		let mut interval = tokio::time::interval(self.config.listing_interval);
		interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

		loop {
			interval.tick().await;
			if let Err(e) = self.poll_listing(Utc::now()).await {
				log::warn!(target: LOG_TARGET, "listing poll failed, retrying next tick: {e}");
			}
		}
	}

	/// One listing tick, `now` is the wall clock time of the tick.
	pub async fn poll_listing(&self, now: DateTime<Utc>) -> Result<(), Error> {
		let active = self.pipeline.gateway().active_contests().await?;
		let upcoming = self.pipeline.gateway().upcoming_contests().await?;

		let active = parse_rows(&active);
		let upcoming = parse_rows(&upcoming);
		let listed: HashSet<ContestId> =
			active.iter().chain(&upcoming).map(|c| c.short_id().to_string()).collect();

		for contest in active {
			self.on_active(contest, now).await;
		}
		for contest in upcoming {
			self.on_upcoming(contest, now).await;
		}

		self.forget_unlisted(&listed);
		prometheus::set_tracked_contests(self.tracked());
		Ok(())
	}

	/// Drop finalized contests that left the listing.
	fn forget_unlisted(&self, listed: &HashSet<ContestId>) {
		let mut contests = self.contests.lock().expect("Lock is poisoned");
		contests.retain(|id, tracked| {
			let keep = !tracked.finalized || !tracked.is_idle() || listed.contains(id);
			if !keep {
				log::debug!(target: LOG_TARGET, "forgetting {id}");
			}
			keep
		});
	}

	pub fn state(&self, contest: &str) -> Option<ContestState> {
		self.contests.lock().expect("Lock is poisoned").get(contest).map(Tracked::state)
	}

	/// Number of contests that are not finalized.
	pub fn tracked(&self) -> usize {
		self.contests.lock().expect("Lock is poisoned").values().filter(|t| !t.finalized).count()
	}

	/// Cancel every trigger of every contest.
	pub fn shutdown(&self) {
		let contests = self.contests.lock().expect("Lock is poisoned");
		for tracked in contests.values() {
			tracked.cancel_all();
		}
	}

	/// Register `contest` if it is new.
	async fn discover(&self, contest: &ContestDescriptor) {
		{
			let mut contests = self.contests.lock().expect("Lock is poisoned");
			if contests.contains_key(contest.short_id()) {
				return;
			}
			contests.insert(contest.short_id().to_string(), Tracked::new(contest.clone()));
		}

		log::info!(target: LOG_TARGET, "discovered {contest}");

		if !contest.is_rated() && contest.kind() == ContestKind::Algorithmic {
			log::info!(target: LOG_TARGET, "{} is unrated, ignoring it", contest.short_id());
			return;
		}

		self.pipeline.registry().register(contest);
		publish::publish_json(
			self.pipeline.publisher(),
			&publish::contest_type_path(contest.short_id()),
			&contest.type_artifact(),
		)
		.await;
	}

	async fn on_upcoming(&self, contest: ContestDescriptor, now: DateTime<Utc>) {
		self.discover(&contest).await;

		if contest.start_time() - now > self.config.upcoming_window {
			return;
		}

		let mut contests = self.contests.lock().expect("Lock is poisoned");
		let Some(tracked) = contests.get_mut(contest.short_id()) else { return };
		if tracked.state() != ContestState::Discovered {
			return;
		}

		log::info!(target: LOG_TARGET, "{} starts at {}, running an early pass", contest.short_id(), contest.start_time());
		let this = self.clone();
		tracked.early_pass = Some(spawn_recurring(
			format!("early pass {}", contest.short_id()),
			Schedule::every(self.config.listing_interval),
			move || {
				let this = this.clone();
				let contest = contest.clone();
				async move {
					this.run_pass(&contest).await;
					ControlFlow::Break(())
				}
			},
		));
	}

	async fn on_active(&self, contest: ContestDescriptor, now: DateTime<Utc>) {
		self.discover(&contest).await;

		let mut contests = self.contests.lock().expect("Lock is poisoned");
		let Some(tracked) = contests.get_mut(contest.short_id()) else { return };
		if !matches!(tracked.state(), ContestState::Discovered | ContestState::Upcoming) {
			return;
		}

		// Superseded by the recurring passes, an early pass in progress completes first.
		if let Some(early) = &tracked.early_pass {
			early.cancel();
		}

		// Both the recompute and the result poll work on the registered descriptor.
		let contest = tracked.contest.clone();
		let interval = self.config.recompute_interval(&contest);
		let until = deadline(contest.end_time(), now);
		log::info!(
			target: LOG_TARGET,
			"{} is active, recomputing every {}s until {}",
			contest.short_id(),
			interval.as_secs(),
			contest.end_time()
		);

		let this = self.clone();
		let recompute_contest = contest.clone();
		tracked.recompute = Some(spawn_recurring(
			format!("recompute {}", contest.short_id()),
			Schedule::every(interval).until(until),
			move || {
				let this = this.clone();
				let contest = recompute_contest.clone();
				async move {
					this.run_pass(&contest).await;
					ControlFlow::Continue(())
				}
			},
		));

		let this = self.clone();
		tracked.result_poll = Some(spawn_recurring(
			format!("result poll {}", contest.short_id()),
			Schedule::every(self.config.result_interval),
			move || {
				let this = this.clone();
				let contest = contest.clone();
				async move { this.poll_result(&contest).await }
			},
		));
	}

	/// One recompute tick.
	async fn run_pass(&self, contest: &ContestDescriptor) {
		let _guard = self.contest_locks.lock(contest.short_id()).await;
		let _permit = self.workers.acquire().await.expect("the worker pool is never closed; qed");

		if self.is_finalized(contest.short_id()) {
			return;
		}

		prometheus::on_recompute_attempt();
		match self.pipeline.recompute(contest).await {
			Ok(PassOutcome::Published { participants }) => {
				prometheus::on_recompute_success();
				log::info!(target: LOG_TARGET, "published the table of {} for {participants} users", contest.short_id());
			},
			Ok(PassOutcome::Skipped) => {
				log::debug!(target: LOG_TARGET, "nobody rated in {} yet", contest.short_id());
			},
			Err(e) => {
				prometheus::on_recompute_failure();
				if e.is_retryable() {
					log::warn!(target: LOG_TARGET, "pass of {} failed, retrying next tick: {e}", contest.short_id());
				} else {
					log::error!(target: LOG_TARGET, "pass of {} failed: {e}", contest.short_id());
				}
			},
		}
	}

	/// One result poll tick, breaks once the result is merged.
	async fn poll_result(&self, contest: &ContestDescriptor) -> ControlFlow<()> {
		let _guard = self.contest_locks.lock(contest.short_id()).await;
		let _permit = self.workers.acquire().await.expect("the worker pool is never closed; qed");

		match self.pipeline.finalize(contest).await {
			Ok(true) => {
				self.mark_finalized(contest.short_id());
				ControlFlow::Break(())
			},
			Ok(false) => ControlFlow::Continue(()),
			Err(e) => {
				log::warn!(target: LOG_TARGET, "merging the result of {} failed: {e}", contest.short_id());
				ControlFlow::Continue(())
			},
		}
	}

	fn is_finalized(&self, contest: &str) -> bool {
		self.contests.lock().expect("Lock is poisoned").get(contest).is_some_and(|t| t.finalized)
	}

	fn mark_finalized(&self, contest: &str) {
		let mut contests = self.contests.lock().expect("Lock is poisoned");
		if let Some(tracked) = contests.get_mut(contest) {
			tracked.finalized = true;
			if let Some(early) = &tracked.early_pass {
				early.cancel();
			}
			if let Some(recompute) = &tracked.recompute {
				recompute.cancel();
			}
		}
		log::info!(target: LOG_TARGET, "{contest} is finalized");
		prometheus::set_tracked_contests(contests.values().filter(|t| !t.finalized).count());
	}
}

fn parse_rows(rows: &[ContestListing]) -> Vec<ContestDescriptor> {
	rows.iter()
		.filter_map(|row| match ContestDescriptor::try_from(row) {
			Ok(contest) => Some(contest),
			Err(e) => {
				log::warn!(target: LOG_TARGET, "skipping listing row {row:?}: {e}");
				None
			},
		})
		.collect()
}

/// The runtime instant matching the wall clock time `at`.
fn deadline(at: DateTime<Utc>, now: DateTime<Utc>) -> Instant {
	Instant::now() + (at - now).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		contest::RatingBracket,
		history::HistoryStore,
		registry::ContestRegistry,
		testing::{FakeGateway, MemoryPublisher, MemoryStore, listing, rated, result, unrated},
	};
	use chrono::TimeZone;
	use std::sync::atomic::Ordering;

	struct Setup {
		gateway: Arc<FakeGateway>,
		store: Arc<MemoryStore>,
		publisher: Arc<MemoryPublisher>,
		registry: ContestRegistry,
		scheduler: ContestLifecycleScheduler,
	}

	fn setup() -> Setup {
		let gateway = Arc::new(FakeGateway::default());
		let store = Arc::new(MemoryStore::default());
		let publisher = Arc::new(MemoryPublisher::default());
		let registry = ContestRegistry::new();
		let pipeline = Pipeline::new(gateway.clone(), store.clone(), publisher.clone(), registry.clone());
		let scheduler = ContestLifecycleScheduler::new(pipeline, SchedulerConfig::default());
		Setup { gateway, store, publisher, registry, scheduler }
	}

	fn now() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 2, 3, 12, 10, 0).unwrap()
	}

	fn minutes(m: i64) -> chrono::Duration {
		chrono::Duration::minutes(m)
	}

	async fn sleep_mins(m: u64) {
		tokio::time::sleep(Duration::from_secs(m * 60)).await;
	}

	#[tokio::test(start_paused = true)]
	async fn rediscovery_is_a_noop() {
		let Setup { gateway, publisher, registry, scheduler, .. } = setup();
		gateway.set_active(vec![listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "- 1999")]);

		scheduler.poll_listing(now()).await.unwrap();
		scheduler.poll_listing(now()).await.unwrap();
		sleep_mins(1).await;

		assert_eq!(registry.len(), 1);
		// standings are unavailable, so the contest type is all that got published
		assert_eq!(publisher.publishes(), 1);
		let artifact = publisher.artifact("data/abc340_contest_type.json").unwrap();
		assert_eq!(artifact["type"], "algo");
		assert_eq!(artifact["rated"], true);
		// a single immediate pass
		assert_eq!(gateway.standings_calls(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn active_contest_is_recomputed_until_it_ends() {
		let Setup { gateway, scheduler, .. } = setup();
		// 90 minutes left, one pass every 3 minutes
		gateway.set_active(vec![listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "- 1999")]);

		scheduler.poll_listing(now()).await.unwrap();
		assert_eq!(scheduler.state("abc340"), Some(ContestState::PeriodicRecompute));

		sleep_mins(60).await;
		assert_eq!(scheduler.state("abc340"), Some(ContestState::PeriodicRecompute));

		sleep_mins(60).await;
		assert_eq!(gateway.standings_calls(), 30);
		assert_eq!(scheduler.state("abc340"), Some(ContestState::AwaitingOfficialResult));
		assert_eq!(scheduler.tracked(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn heuristic_intervals_depend_on_the_duration() {
		let Setup { gateway, scheduler, .. } = setup();
		gateway.set_active(vec![
			listing('Ⓗ', "ahc044", now() - minutes(10), "04:00", "All"),
			listing('Ⓗ', "ahc045", now() - minutes(10), "240:00", "All"),
		]);

		scheduler.poll_listing(now()).await.unwrap();
		sleep_mins(59).await;

		// 0, 2, ..., 58 and 0, 10, ..., 50
		assert_eq!(gateway.standings_calls(), 30 + 6);
	}

	#[tokio::test(start_paused = true)]
	async fn fixed_result_finalizes_the_contest() {
		let Setup { gateway, store, scheduler, .. } = setup();
		gateway.set_active(vec![listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "- 1999")]);
		gateway.set_standings("abc340", vec![unrated("x")]);

		scheduler.poll_listing(now()).await.unwrap();
		sleep_mins(120).await;
		assert_eq!(scheduler.state("abc340"), Some(ContestState::AwaitingOfficialResult));
		assert_eq!(gateway.result_calls(), 1);

		gateway.set_result("abc340", vec![result("alice", 1500, Some(1480))]);
		sleep_mins(61).await;

		assert_eq!(scheduler.state("abc340"), Some(ContestState::Finalized));
		assert_eq!(scheduler.tracked(), 0);
		assert!(store.exists("alice", ContestKind::Algorithmic).await.unwrap());

		// nothing is polled anymore
		let (standings, results) = (gateway.standings_calls(), gateway.result_calls());
		sleep_mins(24 * 60).await;
		assert_eq!(gateway.standings_calls(), standings);
		assert_eq!(gateway.result_calls(), results);
	}

	#[tokio::test(start_paused = true)]
	async fn result_fixed_early_stops_the_recompute() {
		let Setup { gateway, scheduler, .. } = setup();
		gateway.set_active(vec![listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "- 1999")]);
		gateway.set_standings("abc340", vec![unrated("x")]);
		gateway.set_result("abc340", vec![result("alice", 1500, None)]);

		scheduler.poll_listing(now()).await.unwrap();
		sleep_mins(30).await;

		assert_eq!(scheduler.state("abc340"), Some(ContestState::Finalized));
		// the immediate pass and the final one
		assert!(gateway.standings_calls() <= 2);
	}

	#[tokio::test(start_paused = true)]
	async fn unrated_contests_are_finalized_at_discovery() {
		let Setup { gateway, publisher, registry, scheduler, .. } = setup();
		gateway.set_active(vec![
			listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "-"),
			listing('Ⓗ', "ahc044", now() - minutes(10), "04:00", "-"),
		]);

		scheduler.poll_listing(now()).await.unwrap();
		sleep_mins(60).await;

		assert_eq!(scheduler.state("abc340"), Some(ContestState::Finalized));
		assert_eq!(scheduler.state("ahc044"), Some(ContestState::Finalized));
		assert_eq!(gateway.standings_calls(), 0);
		assert_eq!(gateway.result_calls(), 0);
		// only the heuristic one is kept for bookkeeping
		assert!(!registry.contains("abc340"));
		assert!(registry.contains("ahc044"));
		assert_eq!(publisher.paths(), vec!["data/ahc044_contest_type.json".to_string()]);
	}

	#[tokio::test(start_paused = true)]
	async fn upcoming_contests_get_one_early_pass() {
		let Setup { gateway, scheduler, .. } = setup();
		gateway.set_upcoming(vec![
			listing('Ⓐ', "abc340", now() + minutes(60), "01:40", "- 1999"),
			listing('Ⓐ', "abc341", now() + minutes(5 * 60), "01:40", "- 1999"),
		]);

		scheduler.poll_listing(now()).await.unwrap();
		scheduler.poll_listing(now() + minutes(1)).await.unwrap();
		sleep_mins(30).await;

		assert_eq!(gateway.standings_calls(), 1);
		assert_eq!(scheduler.state("abc340"), Some(ContestState::Upcoming));
		assert_eq!(scheduler.state("abc341"), Some(ContestState::Discovered));

		// once active it is recomputed like any other contest
		gateway.set_upcoming(vec![]);
		gateway.set_active(vec![listing('Ⓐ', "abc340", now() + minutes(60), "01:40", "- 1999")]);
		scheduler.poll_listing(now() + minutes(60)).await.unwrap();
		sleep_mins(1).await;
		assert_eq!(scheduler.state("abc340"), Some(ContestState::PeriodicRecompute));
		assert_eq!(gateway.standings_calls(), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn activation_lets_the_early_pass_complete() {
		let Setup { gateway, publisher, scheduler, .. } = setup();
		let start = now() + minutes(60);
		gateway.set_upcoming(vec![listing('Ⓐ', "abc340", start, "01:40", "- 1999")]);
		gateway.set_standings("abc340", vec![rated("a", None)]);
		let strengths = "data/abc340_algo_average_performance.json";
		publisher.slow_down(strengths, Duration::from_secs(5 * 60));

		scheduler.poll_listing(now()).await.unwrap();
		sleep_mins(1).await;
		assert!(publisher.artifact("data/abc340_ranking_to_perf.json").is_some());
		assert!(publisher.artifact(strengths).is_none());

		// later passes fail, whatever gets published comes from the early pass
		gateway.standings.lock().unwrap().clear();
		gateway.set_upcoming(vec![]);
		gateway.set_active(vec![listing('Ⓐ', "abc340", start, "01:40", "- 1999")]);
		scheduler.poll_listing(start).await.unwrap();
		sleep_mins(10).await;

		assert_eq!(scheduler.state("abc340"), Some(ContestState::PeriodicRecompute));
		assert_eq!(publisher.artifact(strengths), Some(serde_json::json!({ "a": 800.0 })));
	}

	#[tokio::test(start_paused = true)]
	async fn finalized_contests_are_forgotten_once_unlisted() {
		let Setup { gateway, scheduler, .. } = setup();
		gateway.set_active(vec![
			listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "-"),
			listing('Ⓐ', "abc341", now() - minutes(10), "01:40", "- 1999"),
		]);

		scheduler.poll_listing(now()).await.unwrap();
		assert_eq!(scheduler.state("abc340"), Some(ContestState::Finalized));

		gateway.set_active(vec![]);
		scheduler.poll_listing(now() + minutes(1)).await.unwrap();

		assert_eq!(scheduler.state("abc340"), None);
		// still waiting for its result
		assert_eq!(scheduler.state("abc341"), Some(ContestState::PeriodicRecompute));
	}

	#[tokio::test(start_paused = true)]
	async fn unavailable_listing_changes_nothing() {
		let Setup { gateway, scheduler, .. } = setup();
		gateway.set_active(vec![listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "- 1999")]);
		gateway.listing_unavailable.store(true, Ordering::SeqCst);

		let err = scheduler.poll_listing(now()).await.unwrap_err();
		assert!(err.is_retryable());
		assert_eq!(scheduler.state("abc340"), None);

		gateway.listing_unavailable.store(false, Ordering::SeqCst);
		scheduler.poll_listing(now()).await.unwrap();
		assert_eq!(scheduler.state("abc340"), Some(ContestState::PeriodicRecompute));
	}

	#[tokio::test(start_paused = true)]
	async fn malformed_rows_are_skipped() {
		let Setup { gateway, scheduler, .. } = setup();
		let mut broken = listing('Ⓐ', "abc339", now(), "01:40", "- 1999");
		broken.duration = "forever".into();
		gateway.set_active(vec![broken, listing('Ⓐ', "abc340", now() - minutes(10), "01:40", "- 1999")]);

		scheduler.poll_listing(now()).await.unwrap();

		assert_eq!(scheduler.state("abc339"), None);
		assert_eq!(scheduler.state("abc340"), Some(ContestState::PeriodicRecompute));
	}

	#[test]
	fn recompute_intervals() {
		let config = SchedulerConfig::default();
		let start = now();
		let open = RatingBracket::Open;
		let abc = ContestDescriptor::new(ContestKind::Algorithmic, "abc340", "", start, 6000, open);
		let short = ContestDescriptor::new(ContestKind::Heuristic, "ahc044", "", start, 4 * 3600, open);
		let long = ContestDescriptor::new(ContestKind::Heuristic, "ahc045", "", start, 240 * 3600, open);

		assert_eq!(config.recompute_interval(&abc), Duration::from_secs(180));
		assert_eq!(config.recompute_interval(&short), Duration::from_secs(120));
		assert_eq!(config.recompute_interval(&long), Duration::from_secs(600));
	}
}
