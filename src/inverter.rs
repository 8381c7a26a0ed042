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

//! Turns the strengths of all contestants into the performance every rank earns.
//!
//! The expected rank of a contestant performing `p` against strengths `s_1..s_n` is
//!
//! ```text
//! E[rank](p) = 0.5 + Σ 1 / (1 + 6^((p - s_i) / 400))
//! ```
//!
//! which is non-increasing in `p`. The performance of rank `r` is the smallest integer `p`
//! such that `ceil(E[rank](p)) <= r`.

use crate::{
	error::Error,
	prelude::{RankTable, SEARCH_LOWER, SEARCH_UPPER},
};

/// Expected rank of a contestant performing `perf`.
pub fn expected_rank(strengths: &[f64], perf: i32) -> f64 {
	let perf = perf as f64;
	0.5 + strengths
		.iter()
		.map(|strength| 1.0 / (1.0 + 6.0_f64.powf((perf - strength) / 400.0)))
		.sum::<f64>()
}

/// `ceil(E[rank](perf))`, i.e. the rank a performance of `perf` is good enough for.
pub fn rank_of(strengths: &[f64], perf: i32) -> f64 {
	expected_rank(strengths, perf).ceil()
}

/// Compute the rank to performance table, index 0 is rank 1.
///
/// Rank 1 is found by a binary search over the search window. Each later rank starts at the
/// previous rank's performance and walks down until the boundary holds again, which keeps the
/// whole table linear in the number of ranks as long as neighbouring ranks are close.
///
/// Every value is capped at `max_performance`. A boundary outside of the search window is an
/// error rather than being clamped.
pub fn invert(strengths: &[f64], max_performance: i32) -> Result<RankTable, Error> {
	let mut table = Vec::with_capacity(strengths.len());
	if strengths.is_empty() {
		return Ok(table);
	}

	let mut perf = search_first(strengths, 1.0)?;
	for rank in 1..=strengths.len() {
		let r = rank as f64;
		while rank_of(strengths, perf - 1) <= r {
			perf -= 1;
			if perf < SEARCH_LOWER {
				return Err(Error::InversionOutOfRange { rank, lower: SEARCH_LOWER, upper: SEARCH_UPPER });
			}
		}
		table.push(perf.min(max_performance));
	}

	Ok(table)
}

/// Smallest performance in the search window whose rank is at most `rank`.
fn search_first(strengths: &[f64], rank: f64) -> Result<i32, Error> {
	let (mut left, mut right) = (SEARCH_LOWER, SEARCH_UPPER);
	while left < right {
		let mid = (left + right).div_euclid(2);
		if rank_of(strengths, mid) <= rank {
			right = mid;
		} else {
			left = mid + 1;
		}
	}

	if rank_of(strengths, left) > rank {
		return Err(Error::InversionOutOfRange {
			rank: rank as usize,
			lower: SEARCH_LOWER,
			upper: SEARCH_UPPER,
		});
	}

	Ok(left)
}
