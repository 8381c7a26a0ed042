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

//! Run a single pass for one contest.

use crate::{
	commands::types::PredictConfig,
	contest::ContestDescriptor,
	error::Error,
	pipeline::PassOutcome,
	prelude::LOG_TARGET,
	publish,
};

/// Publish the table of `config.contest` and, with `--finalize`, merge its fixed result.
pub async fn predict_cmd(config: PredictConfig) -> Result<(), Error> {
	let pipeline = config.paths.pipeline().await?;
	let gateway = pipeline.gateway();

	let mut rows = gateway.active_contests().await?;
	rows.extend(gateway.upcoming_contests().await?);

	// Every listed contest is registered so heuristic histories get their weights.
	let mut target = None;
	for row in &rows {
		let contest = match ContestDescriptor::try_from(row) {
			Ok(contest) => contest,
			Err(e) => {
				log::warn!(target: LOG_TARGET, "skipping listing row {row:?}: {e}");
				continue;
			},
		};
		pipeline.registry().register(&contest);
		if contest.short_id() == config.contest {
			target = Some(contest);
		}
	}

	let contest = target.ok_or_else(|| Error::UnknownContest(config.contest.clone()))?;
	log::info!(target: LOG_TARGET, "predicting {contest}");

	if !contest.is_rated() {
		log::info!(target: LOG_TARGET, "{} is unrated, nothing to predict", contest.short_id());
		return Ok(());
	}

	publish::publish_json(
		pipeline.publisher(),
		&publish::contest_type_path(contest.short_id()),
		&contest.type_artifact(),
	)
	.await;

	if config.finalize {
		if pipeline.finalize(&contest).await? {
			log::info!(target: LOG_TARGET, "result of {} merged", contest.short_id());
			return Ok(());
		}
		log::info!(target: LOG_TARGET, "result of {} is not fixed yet", contest.short_id());
	}

	match pipeline.recompute(&contest).await? {
		PassOutcome::Published { participants } => {
			log::info!(target: LOG_TARGET, "published the table of {} for {participants} users", contest.short_id())
		},
		PassOutcome::Skipped => log::info!(target: LOG_TARGET, "nobody rated in {}", contest.short_id()),
	}

	Ok(())
}
