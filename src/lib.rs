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

//! # Contest Rating Predictor.
//!
//! Predicts the performance of every rank of a running contest from the past performances of
//! its participants, and keeps those histories up to date once the results are fixed.
//!
//! The [`scheduler`] drives every contest of the listing through its lifecycle. Each tick runs
//! a [`pipeline`] pass built on the [`strength`] estimator and the [`inverter`].

pub mod commands;
pub mod contest;
pub mod error;
pub mod gateway;
pub mod history;
pub mod inverter;
pub mod pipeline;
pub mod prelude;
pub mod prometheus;
pub mod publish;
pub mod registry;
pub mod scheduler;
pub mod strength;
pub mod tasks;
pub mod utils;

#[cfg(test)]
mod testing;
