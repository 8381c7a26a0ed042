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

//! Contests known to the bot and their rating weights.
//!
//! Heuristic histories need the weight of every past contest, not only of the ones listed while
//! the process runs. The registry is therefore seeded from the contest type artifacts published
//! by earlier runs.

use crate::{
	contest::{ContestDescriptor, ContestTypeArtifact},
	error::Error,
	prelude::{ContestId, LOG_TARGET},
	publish,
};
use std::{
	collections::HashMap,
	path::Path,
	sync::{Arc, RwLock},
};

/// Every known contest, keyed by short id.
#[derive(Clone, Default)]
pub struct ContestRegistry(Arc<RwLock<HashMap<ContestId, ContestTypeArtifact>>>);

impl ContestRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry holding every contest type artifact below `output_dir`.
	///
	/// Unreadable artifacts are skipped, a missing directory yields an empty registry.
	pub async fn load(output_dir: &Path) -> Result<Self, Error> {
		let registry = Self::new();
		let dir = output_dir.join(publish::DATA_DIR);
		let mut entries = match tokio::fs::read_dir(&dir).await {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(registry),
			Err(e) => return Err(e.into()),
		};

		while let Some(entry) = entries.next_entry().await? {
			let path = entry.path();
			let is_contest_type = path
				.file_name()
				.and_then(|name| name.to_str())
				.is_some_and(|name| name.ends_with(publish::CONTEST_TYPE_SUFFIX));
			if !is_contest_type {
				continue;
			}

			let bytes = tokio::fs::read(&path).await?;
			match serde_json::from_slice::<ContestTypeArtifact>(&bytes) {
				Ok(artifact) => {
					registry.insert(artifact);
				},
				Err(e) => log::warn!(target: LOG_TARGET, "skipping contest type {}: {e}", path.display()),
			}
		}

		log::info!(target: LOG_TARGET, "{} contests known from {}", registry.len(), dir.display());
		Ok(registry)
	}

	/// Record a contest, returns `false` if the short id is already known.
	pub fn register(&self, contest: &ContestDescriptor) -> bool {
		self.insert(contest.type_artifact())
	}

	fn insert(&self, artifact: ContestTypeArtifact) -> bool {
		let mut contests = self.0.write().expect("Lock is poisoned");
		if contests.contains_key(&artifact.short_id) {
			return false;
		}
		contests.insert(artifact.short_id.clone(), artifact);
		true
	}

	pub fn get(&self, contest: &str) -> Option<ContestTypeArtifact> {
		self.0.read().expect("Lock is poisoned").get(contest).cloned()
	}

	pub fn contains(&self, contest: &str) -> bool {
		self.0.read().expect("Lock is poisoned").contains_key(contest)
	}

	/// Weight of a known contest.
	pub fn weight(&self, contest: &str) -> Option<f64> {
		self.0.read().expect("Lock is poisoned").get(contest).map(|c| c.weight)
	}

	pub fn len(&self) -> usize {
		self.0.read().expect("Lock is poisoned").len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
