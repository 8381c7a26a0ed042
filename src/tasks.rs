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

//! Recurring tasks: run a callback every period, optionally until an instant.
//!
//! A task stops when it expires, when the callback returns [`ControlFlow::Break`] or when
//! its [`TaskHandle`] is cancelled. A callback that is already running is never interrupted by
//! expiry or cancellation, it completes and no further run starts. Dropping the handle aborts
//! the task right away, running callback included.

use crate::prelude::LOG_TARGET;
use futures::future::{AbortHandle, abortable};
use std::{
	future::Future,
	ops::ControlFlow,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};
use tokio::{
	sync::Notify,
	time::{Instant, MissedTickBehavior},
};

/// When a recurring task runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Schedule {
	/// Time between two runs, the first run happens right away.
	pub every: Duration,
	/// No run starts at or after this instant.
	pub until: Option<Instant>,
}

impl Schedule {
	pub fn every(every: Duration) -> Self {
		Self { every, until: None }
	}

	pub fn until(self, until: Instant) -> Self {
		Self { until: Some(until), ..self }
	}
}

/// Owner side of a recurring task.
#[derive(Debug)]
pub struct TaskHandle {
	name: String,
	cancel: Arc<Notify>,
	abort: AbortHandle,
	finished: Arc<AtomicBool>,
}

impl TaskHandle {
	/// Stop scheduling further runs, a run in progress completes.
	pub fn cancel(&self) {
		if !self.is_finished() {
			log::debug!(target: LOG_TARGET, "cancelling task `{}`", self.name);
		}
		self.cancel.notify_one();
	}

	/// Whether the task has stopped for any reason.
	pub fn is_finished(&self) -> bool {
		self.finished.load(Ordering::Acquire)
	}

	pub fn name(&self) -> &str {
		&self.name
	}
}

impl Drop for TaskHandle {
	fn drop(&mut self) {
		self.abort.abort();
	}
}

/// Spawn `run` on the tokio runtime according to `schedule`.
pub fn spawn_recurring<F, Fut>(name: impl Into<String>, schedule: Schedule, mut run: F) -> TaskHandle
where
	F: FnMut() -> Fut + Send + 'static,
	Fut: Future<Output = ControlFlow<()>> + Send + 'static,
{
	let name = name.into();
	let finished = Arc::new(AtomicBool::new(false));
	let cancel = Arc::new(Notify::new());

	let task_name = name.clone();
	let cancelled = cancel.clone();
	let (fut, abort) = abortable(async move {
		let mut interval = tokio::time::interval(schedule.every);
		interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
		let until = schedule.until.unwrap_or_else(Instant::now);

		loop {
			let tick = tokio::select! {
				biased;
				_ = cancelled.notified() => {
					log::debug!(target: LOG_TARGET, "task `{task_name}` cancelled");
					return;
				},
				_ = tokio::time::sleep_until(until), if schedule.until.is_some() => break,
				tick = interval.tick() => tick,
			};

			if schedule.until.is_some_and(|until| tick >= until) {
				break;
			}

			if run().await.is_break() {
				log::debug!(target: LOG_TARGET, "task `{task_name}` is done");
				return;
			}
		}

		log::debug!(target: LOG_TARGET, "task `{task_name}` expired");
	});

	let done = finished.clone();
	tokio::spawn(async move {
		let _ = fut.await;
		done.store(true, Ordering::Release);
	});

	TaskHandle { name, cancel, abort, finished }
}
