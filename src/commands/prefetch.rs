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

//! Fill the history store ahead of the next contests.

use crate::{
	commands::types::PrefetchConfig,
	error::Error,
	prelude::{LOG_TARGET, Username},
};
use std::collections::BTreeSet;

/// Fetch and store the full history of every user listed in `config.users`.
pub async fn prefetch_cmd(config: PrefetchConfig) -> Result<(), Error> {
	let content = tokio::fs::read_to_string(&config.users).await?;
	let usernames = parse_usernames(&content);
	let pipeline = config.paths.pipeline().await?;

	log::info!(target: LOG_TARGET, "prefetching the {} histories of {} users", config.kind, usernames.len());
	let total = usernames.len();
	let stored = pipeline.prefetch(usernames, config.kind).await;
	log::info!(target: LOG_TARGET, "stored {stored} of {total} {} histories", config.kind);

	Ok(())
}

/// One username per line, blank lines and `#` comments are skipped.
fn parse_usernames(content: &str) -> Vec<Username> {
	let usernames: BTreeSet<&str> =
		content.lines().map(str::trim).filter(|line| !line.is_empty() && !line.starts_with('#')).collect();
	usernames.into_iter().map(String::from).collect()
}
