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

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("Failed to parse log directive: `{0}´")]
	LogParse(#[from] tracing_subscriber::filter::ParseError),
	#[error("I/O error: `{0}`")]
	Io(#[from] std::io::Error),
	#[error("JSON error: `{0}`")]
	Json(#[from] serde_json::Error),
	#[error("Time parse error: `{0}`")]
	TimeParse(#[from] chrono::ParseError),
	#[error("{0}")]
	JoinError(#[from] tokio::task::JoinError),
	#[error("Source unavailable: {0}")]
	Unavailable(String),
	#[error("Invalid contest listing: {0}")]
	InvalidContest(String),
	#[error("Unknown contest: `{0}`")]
	UnknownContest(String),
	#[error("Rank {rank} resolves outside of the search window [{lower}, {upper}]")]
	InversionOutOfRange { rank: usize, lower: i32, upper: i32 },
}

impl Error {
	/// Whether the error means the tick should simply be retried later.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Error::Unavailable(_) | Error::Io(_) | Error::Json(_))
	}
}
