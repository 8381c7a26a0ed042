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

//! Constants and aliases that are shared all over the place.

/// The logging target.
pub const LOG_TARGET: &str = "contest-rating-predictor";
/// Default port to start the prometheus server on.
pub const DEFAULT_PROMETHEUS_PORT: u16 = 9999;

/// Lower bound of the performance search window.
pub const SEARCH_LOWER: i32 = -5000;
/// Upper bound of the performance search window.
pub const SEARCH_UPPER: i32 = 7000;

/// Decay ratio of the average strength, most recent contest first.
pub const STRENGTH_DECAY: f64 = 0.9;

/// Heuristic contests at least this long are "long" contests.
pub const LONG_CONTEST_SECS: i64 = 24 * 60 * 60;

/// Weight of a short heuristic contest held after the rating rule change.
pub const SHORT_HEURISTIC_WEIGHT: f64 = 0.5;

/// Start of the rating rule change that halves short heuristic contests, in RFC 3339.
pub const WEIGHT_CUTOVER: &str = "2025-01-01T00:00:00+09:00";

/// Current version of the on-disk performance record.
pub const RECORD_SCHEMA_VERSION: u32 = 1;

/// Max number of user histories fetched concurrently during one pass.
pub const HISTORY_FETCH_CONCURRENCY: usize = 8;

/// Contest short id, e.g. `abc350`.
pub type ContestId = String;
/// Screen name of a contestant.
pub type Username = String;
/// Rank to performance table, index 0 is rank 1.
pub type RankTable = Vec<i32>;
