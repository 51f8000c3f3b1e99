use std::io::Read;

use log::info;
use rusqlite::Connection;
use serde::Deserialize;

use crate::data::{self, TournamentKey};
use crate::error::Result;

/// A row of a match results file: `winner,loser` player ids.
#[derive(Debug, Deserialize)]
pub struct MatchRow {
	pub winner: i64,
	pub loser: i64,
}

/// Records every match in `reader` against one tournament. The file is
/// loaded in a single transaction, so one bad row leaves nothing recorded.
pub fn load_matches<R: Read>(conn: &mut Connection, reader: R, key: &TournamentKey) -> Result<usize> {
	let mut rdr = csv::ReaderBuilder::new()
		.trim(csv::Trim::All)
		.from_reader(reader);

	let tx = conn.transaction()?;
	let tournament = data::tournament_id(&tx, key)?;

	let mut loaded = 0;
	for row in rdr.deserialize() {
		let row: MatchRow = row?;
		data::record_match(&tx, tournament, row.winner, row.loser)?;
		loaded += 1;
	}
	tx.commit()?;

	info!("loaded {loaded} matches into tournament {key}");
	Ok(loaded)
}
