use std::path::Path;

use log::debug;
use rusqlite::{Connection, Result};

/// Opens the tournament database at `path`, creating the schema if needed.
pub fn open(path: &Path) -> Result<Connection> {
	debug!("opening database at {}", path.display());
	prepare(Connection::open(path)?)
}

#[cfg(test)]
pub fn open_in_memory() -> Result<Connection> {
	prepare(Connection::open_in_memory()?)
}

fn prepare(mut conn: Connection) -> Result<Connection> {
	// Has no effect inside a transaction, so it must run before the schema.
	conn.pragma_update(None, "foreign_keys", true)?;
	create_schema(&mut conn)?;
	Ok(conn)
}

pub fn create_schema(conn: &mut Connection) -> Result<()> {
	let tx = conn.transaction()?;

	tx.execute(
		"CREATE TABLE IF NOT EXISTS tournaments (
			id         INTEGER PRIMARY KEY AUTOINCREMENT,
			name       TEXT    NOT NULL,
			name_key   TEXT    NOT NULL,
			start_date TEXT    NOT NULL,
			end_date   TEXT    NOT NULL,
			UNIQUE (name_key, start_date, end_date)
		);",
		[],
	)?;

	tx.execute(
		"CREATE TABLE IF NOT EXISTS players (
			id            INTEGER PRIMARY KEY AUTOINCREMENT,
			name          TEXT    NOT NULL,
			name_key      TEXT    NOT NULL,
			tournament_id INTEGER REFERENCES tournaments (id)
		);",
		[],
	)?;

	tx.execute(
		"CREATE TABLE IF NOT EXISTS matches (
			id            INTEGER PRIMARY KEY AUTOINCREMENT,
			winner_id     INTEGER REFERENCES players (id)
								  NOT NULL,
			loser_id      INTEGER REFERENCES players (id)
								  NOT NULL,
			tournament_id INTEGER REFERENCES tournaments (id)
								  NOT NULL,
			CHECK (winner_id <> loser_id)
		);",
		[],
	)?;

	tx.commit()
}
