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

use crate::prelude::STRENGTH_DECAY;

/// Estimate the current strength of a contestant from its inner performances, oldest first.
///
/// The most recent performance gets weight `0.9`, the one before `0.9^2` and so on, and the
/// result is the weighted mean. Without any history the newcomer default is returned.
pub fn estimate(history: &[i32], newcomer_default: i32) -> f64 {
	if history.is_empty() {
		return newcomer_default as f64;
	}

	let mut numerator = 0.0;
	let mut denominator = 0.0;
	let mut weight = 1.0;
	for &perf in history.iter().rev() {
		weight *= STRENGTH_DECAY;
		numerator += weight * perf as f64;
		denominator += weight;
	}

	numerator / denominator
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_history_is_newcomer_default() {
		for default in [-300, 0, 800, 1000, 1200] {
			assert_eq!(estimate(&[], default), default as f64);
		}
	}

	#[test]
	fn single_entry_is_itself() {
		assert!((estimate(&[1234], 800) - 1234.0).abs() < 1e-9);
	}

	#[test]
	fn recent_entries_weigh_more() {
		// (0.9 * 2000 + 0.81 * 1000) / (0.9 + 0.81)
		let expected = (0.9 * 2000.0 + 0.81 * 1000.0) / 1.71;
		assert!((estimate(&[1000, 2000], 800) - expected).abs() < 1e-9);
		assert!(estimate(&[1000, 2000], 800) > estimate(&[2000, 1000], 800));
	}

	#[test]
	fn old_history_does_not_matter() {
		let recent: Vec<i32> = (0..300).map(|i| 1500 + (i % 7) * 13).collect();
		let mut with_old = vec![0; 100];
		with_old.extend_from_slice(&recent);

		assert!((estimate(&recent, 800) - estimate(&with_old, 800)).abs() < 1e-6);
	}
}
