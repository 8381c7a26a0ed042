#![allow(dead_code)]

use chrono::{DateTime, Utc};
use contest_rating_predictor::commands::PathsConfig;
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub fn init_logger() {
	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}

/// A source, history and output directory below one temporary directory.
pub struct Workspace {
	dir: TempDir,
}

impl Workspace {
	pub fn new() -> Self {
		Self { dir: tempfile::tempdir().expect("temp dir can be created") }
	}

	pub fn root(&self) -> &Path {
		self.dir.path()
	}

	pub fn paths(&self) -> PathsConfig {
		PathsConfig {
			source_dir: self.root().join("source"),
			history_dir: self.root().join("history"),
			output_dir: self.root().join("output"),
			cache_ttl: 0,
		}
	}

	/// Write `value` to `source/<rel>`.
	pub fn dump(&self, rel: &str, value: &Value) {
		let path = self.root().join("source").join(rel);
		std::fs::create_dir_all(path.parent().unwrap()).unwrap();
		std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
	}

	/// Write `value` to `output/<rel>`, as an earlier run would have published it.
	pub fn published(&self, rel: &str, value: &Value) {
		let path = self.root().join("output").join(rel);
		std::fs::create_dir_all(path.parent().unwrap()).unwrap();
		std::fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
	}

	/// Read `output/<rel>`, `None` until it is completely written.
	pub fn artifact(&self, rel: &str) -> Option<Value> {
		let content = std::fs::read(self.root().join("output").join(rel)).ok()?;
		serde_json::from_slice(&content).ok()
	}
}

pub fn listing_row(marker: char, contest: &str, start: DateTime<Utc>, duration: &str, range: &str) -> Value {
	json!({
		"start_time": start.format("%Y-%m-%d %H:%M:%S+0000").to_string(),
		"name": format!("{marker}◉{contest}"),
		"link": format!("/contests/{contest}"),
		"duration": duration,
		"rate_range": range,
	})
}

pub fn history_row(contest: &str, perf: i32, inner: i32, end_time: &str) -> Value {
	json!({
		"ContestScreenName": format!("{contest}.contest.atcoder.jp"),
		"Performance": perf,
		"InnerPerformance": inner,
		"EndTime": end_time,
		"IsRated": true,
	})
}

/// A short heuristic contest held after the weight change, as its contest type artifact.
pub fn ahc045_contest_type() -> Value {
	json!({
		"type": "heuristic",
		"short_id": "ahc045",
		"start_time": "2025-03-01T03:00:00Z",
		"duration_seconds": 4 * 60 * 60,
		"weight": 0.5,
		"rated": true,
	})
}

/// An algorithmic contest for up to 1999 that started half an hour ago, with alice (two rated
/// contests), bob (newcomer) and carol (not rated).
pub fn running_abc(ws: &Workspace) {
	let start = Utc::now() - chrono::Duration::minutes(30);
	ws.dump("contests.json", &json!({ "active": [listing_row('Ⓐ', "abc350", start, "01:40", "- 1999")] }));
	ws.dump(
		"standings/abc350.json",
		&json!({ "StandingsData": [
			{ "UserScreenName": "alice", "IsRated": true, "Competitions": 2 },
			{ "UserScreenName": "bob", "IsRated": true, "Competitions": 0 },
			{ "UserScreenName": "carol", "IsRated": false },
		]}),
	);
	ws.dump(
		"history/algo/alice.json",
		&json!([
			history_row("abc348", 1200, 1200, "2024-04-06T22:40:00+09:00"),
			history_row("abc349", 1400, 1400, "2024-04-13T22:40:00+09:00"),
		]),
	);
	ws.dump("history/algo/bob.json", &json!([]));
}
