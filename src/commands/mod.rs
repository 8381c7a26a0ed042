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

//! Entry points of the binary, one per subcommand.

mod monitor;
mod predict;
mod prefetch;
pub mod types;

pub use monitor::monitor_cmd;
pub use predict::predict_cmd;
pub use prefetch::prefetch_cmd;
pub use types::{MonitorConfig, PathsConfig, PredictConfig, PrefetchConfig};
