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

//! Contest classification and the constants derived from it.

use crate::{
	error::Error,
	prelude::{ContestId, LONG_CONTEST_SECS, SHORT_HEURISTIC_WEIGHT, WEIGHT_CUTOVER},
};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

static CUTOVER: Lazy<DateTime<Utc>> = Lazy::new(|| {
	DateTime::parse_from_rfc3339(WEIGHT_CUTOVER)
		.expect("cutover is a valid RFC 3339 constant; qed")
		.with_timezone(&Utc)
});

/// Marker in front of the contest name of algorithmic contests.
const ALGORITHMIC_MARKER: char = 'Ⓐ';

/// The kind of contest, each kind has its own rating and history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestKind {
	#[serde(rename = "algo")]
	Algorithmic,
	Heuristic,
}

impl ContestKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Algorithmic => "algo",
			Self::Heuristic => "heuristic",
		}
	}
}

impl fmt::Display for ContestKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ContestKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Error> {
		match s {
			"algo" => Ok(Self::Algorithmic),
			"heuristic" => Ok(Self::Heuristic),
			other => Err(Error::InvalidContest(format!("unknown contest kind `{other}`"))),
		}
	}
}

/// The advertised rating range of a contest.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingBracket {
	/// `- 1999`
	UpTo1999,
	/// `- 2799`
	UpTo2799,
	/// `1200 -`
	From1200,
	/// `All`
	Open,
	/// Anything else, e.g. `-` for unrated contests.
	Unrated,
}

impl RatingBracket {
	/// Classify the rating range text of a contest listing.
	pub fn from_rate_range(range: &str) -> Self {
		match range.trim() {
			"- 1999" => Self::UpTo1999,
			"- 2799" => Self::UpTo2799,
			"1200 -" => Self::From1200,
			"All" => Self::Open,
			_ => Self::Unrated,
		}
	}

	pub fn is_rated(&self) -> bool {
		!matches!(self, Self::Unrated)
	}

	/// Strength assumed for a contestant without any rated history.
	pub fn newcomer_strength(&self) -> i32 {
		match self {
			Self::UpTo1999 => 800,
			Self::UpTo2799 => 1000,
			Self::From1200 => 1200,
			Self::Open | Self::Unrated => 1000,
		}
	}

	/// Performance cap of the bracket.
	pub fn max_performance(&self) -> i32 {
		match self {
			Self::UpTo1999 => 2400,
			Self::UpTo2799 => 3200,
			Self::From1200 | Self::Open | Self::Unrated => 10000,
		}
	}
}

impl fmt::Display for RatingBracket {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let range = match self {
			Self::UpTo1999 => "- 1999",
			Self::UpTo2799 => "- 2799",
			Self::From1200 => "1200 -",
			Self::Open => "All",
			Self::Unrated => "-",
		};
		f.write_str(range)
	}
}

/// One raw row of the contest listing, as handed over by the fetch gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestListing {
	/// `2024-05-12 21:00:00+0900`
	pub start_time: String,
	/// Display name, prefixed with the kind marker.
	pub name: String,
	/// `/contests/arc179`
	pub link: String,
	/// `HH:MM`
	pub duration: String,
	/// Rating range text, e.g. `- 2799`.
	pub rate_range: String,
}

/// Immutable facts about one contest.
#[derive(Debug, Clone, PartialEq)]
pub struct ContestDescriptor {
	kind: ContestKind,
	short_id: ContestId,
	long_name: String,
	start_time: DateTime<Utc>,
	duration_seconds: i64,
	bracket: RatingBracket,
	weight: f64,
}

impl ContestDescriptor {
	pub fn new(
		kind: ContestKind,
		short_id: impl Into<ContestId>,
		long_name: impl Into<String>,
		start_time: DateTime<Utc>,
		duration_seconds: i64,
		bracket: RatingBracket,
	) -> Self {
		let weight = contest_weight(kind, start_time, duration_seconds);
		Self {
			kind,
			short_id: short_id.into(),
			long_name: long_name.into(),
			start_time,
			duration_seconds,
			bracket,
			weight,
		}
	}

	pub fn kind(&self) -> ContestKind {
		self.kind
	}

	pub fn short_id(&self) -> &str {
		&self.short_id
	}

	pub fn long_name(&self) -> &str {
		&self.long_name
	}

	pub fn start_time(&self) -> DateTime<Utc> {
		self.start_time
	}

	pub fn duration_seconds(&self) -> i64 {
		self.duration_seconds
	}

	pub fn end_time(&self) -> DateTime<Utc> {
		self.start_time + Duration::seconds(self.duration_seconds)
	}

	pub fn bracket(&self) -> RatingBracket {
		self.bracket
	}

	pub fn weight(&self) -> f64 {
		self.weight
	}

	pub fn is_rated(&self) -> bool {
		self.bracket.is_rated()
	}

	pub fn newcomer_strength(&self) -> i32 {
		self.bracket.newcomer_strength()
	}

	pub fn max_performance(&self) -> i32 {
		self.bracket.max_performance()
	}

	/// Heuristic contests shorter than a day.
	pub fn is_short(&self) -> bool {
		self.duration_seconds < LONG_CONTEST_SECS
	}

	/// Bookkeeping entry persisted when the contest is discovered.
	pub fn type_artifact(&self) -> ContestTypeArtifact {
		ContestTypeArtifact {
			kind: self.kind,
			short_id: self.short_id.clone(),
			start_time: self.start_time,
			duration_seconds: self.duration_seconds,
			weight: self.weight,
			rated: self.is_rated(),
		}
	}
}

impl fmt::Display for ContestDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} contest {} ({}) from {} to {}, bracket `{}`",
			self.kind,
			self.short_id,
			self.long_name,
			self.start_time,
			self.end_time(),
			self.bracket
		)
	}
}

impl TryFrom<&ContestListing> for ContestDescriptor {
	type Error = Error;

	fn try_from(row: &ContestListing) -> Result<Self, Error> {
		let name = row.name.replace('\n', " ").replace('\r', "");
		let name = name.trim();
		let kind = match name.chars().next() {
			Some(ALGORITHMIC_MARKER) => ContestKind::Algorithmic,
			Some(_) => ContestKind::Heuristic,
			None => return Err(Error::InvalidContest("empty contest name".into())),
		};
		let long_name: String = name.chars().skip(2).collect();

		let short_id = row.link.replace("contests", "").replace('/', "");
		if short_id.is_empty() {
			return Err(Error::InvalidContest(format!("no short id in link `{}`", row.link)));
		}

		let start_time =
			DateTime::parse_from_str(row.start_time.trim(), "%Y-%m-%d %H:%M:%S%z")?.with_timezone(&Utc);

		Ok(Self::new(
			kind,
			short_id,
			long_name.trim(),
			start_time,
			parse_duration(&row.duration)?,
			RatingBracket::from_rate_range(&row.rate_range),
		))
	}
}

/// `HH:MM` to seconds.
fn parse_duration(duration: &str) -> Result<i64, Error> {
	let invalid = || Error::InvalidContest(format!("invalid duration `{duration}`"));
	let (hours, minutes) = duration.trim().split_once(':').ok_or_else(invalid)?;
	let hours: i64 = hours.parse().map_err(|_| invalid())?;
	let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
	Ok(hours * 60 * 60 + minutes * 60)
}

/// Rating weight of a contest.
///
/// Short heuristic contests started at or after the rule change count half.
pub fn contest_weight(kind: ContestKind, start_time: DateTime<Utc>, duration_seconds: i64) -> f64 {
	match kind {
		ContestKind::Heuristic if duration_seconds < LONG_CONTEST_SECS && start_time >= *CUTOVER =>
			SHORT_HEURISTIC_WEIGHT,
		_ => 1.0,
	}
}

/// Content of `data/<id>_contest_type.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContestTypeArtifact {
	#[serde(rename = "type")]
	pub kind: ContestKind,
	pub short_id: ContestId,
	pub start_time: DateTime<Utc>,
	pub duration_seconds: i64,
	pub weight: f64,
	pub rated: bool,
}
