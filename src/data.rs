use std::fmt;

use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, TournamentError};
use crate::pairing::{self, Round};

/// Identifies a tournament by name and dates. Names compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentKey {
	pub name: String,
	pub start: NaiveDate,
	pub end: NaiveDate,
}

impl TournamentKey {
	pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
		Self {
			name: name.into(),
			start,
			end,
		}
	}

	fn name_key(&self) -> String {
		name_key(&self.name)
	}
}

impl fmt::Display for TournamentKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "'{}' ({} to {})", self.name, self.start, self.end)
	}
}

/// One row of a tournament's standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
	pub id: i64,
	pub name: String,
	pub wins: u32,
	pub matches: u32,
}

fn name_key(name: &str) -> String {
	name.to_lowercase()
}

fn check_name(what: &str, name: &str) -> Result<()> {
	if name.trim().is_empty() {
		return Err(TournamentError::Validation(format!("{what} name must not be empty")));
	}
	Ok(())
}

fn find_tournament_ids(conn: &Connection, key: &TournamentKey) -> Result<Vec<i64>> {
	let mut stmt = conn.prepare(
		"SELECT id FROM tournaments
		 WHERE name_key = ?1 AND start_date = ?2 AND end_date = ?3;",
	)?;
	let ids = stmt
		.query_map(params![key.name_key(), key.start, key.end], |row| row.get(0))?
		.collect::<rusqlite::Result<Vec<i64>>>()?;

	Ok(ids)
}

/// Resolves a tournament to its id, or `None` when no tournament matches.
pub fn find_tournament(conn: &Connection, key: &TournamentKey) -> Result<Option<i64>> {
	let ids = find_tournament_ids(conn, key)?;

	match ids.as_slice() {
		[] => Ok(None),
		[id] => Ok(Some(*id)),
		_ => Err(TournamentError::Ambiguous {
			what: format!("tournament {key}"),
			count: ids.len(),
		}),
	}
}

pub fn tournament_id(conn: &Connection, key: &TournamentKey) -> Result<i64> {
	find_tournament(conn, key)?.ok_or_else(|| TournamentError::NotFound(format!("tournament {key}")))
}

pub fn register_tournament(conn: &mut Connection, key: &TournamentKey) -> Result<i64> {
	check_name("tournament", &key.name)?;
	if key.start > key.end {
		return Err(TournamentError::Validation(format!(
			"tournament {key} ends before it starts"
		)));
	}

	let tx = conn.transaction()?;
	if !find_tournament_ids(&tx, key)?.is_empty() {
		return Err(TournamentError::Duplicate(format!("tournament {key}")));
	}

	tx.execute(
		"INSERT INTO tournaments (name, name_key, start_date, end_date)
		 VALUES (?1, ?2, ?3, ?4);",
		params![key.name, key.name_key(), key.start, key.end],
	)?;
	let id = tx.last_insert_rowid();
	tx.commit()?;

	info!("registered tournament {key} with id {id}");
	Ok(id)
}

fn insert_player(conn: &Connection, name: &str, tournament_id: Option<i64>) -> Result<i64> {
	conn.execute(
		"INSERT INTO players (name, name_key, tournament_id) VALUES (?1, ?2, ?3);",
		params![name, name_key(name), tournament_id],
	)?;
	Ok(conn.last_insert_rowid())
}

/// Registers a player who is not part of any tournament.
pub fn register_player(conn: &mut Connection, name: &str) -> Result<i64> {
	check_name("player", name)?;

	let tx = conn.transaction()?;
	let id = insert_player(&tx, name, None)?;
	tx.commit()?;

	info!("registered player '{name}' with id {id}");
	Ok(id)
}

pub fn register_player_in_tournament(
	conn: &mut Connection,
	name: &str,
	key: &TournamentKey,
) -> Result<i64> {
	check_name("player", name)?;

	let tx = conn.transaction()?;
	let tournament = tournament_id(&tx, key)?;
	let id = insert_player(&tx, name, Some(tournament))?;
	tx.commit()?;

	info!("registered player '{name}' with id {id} in tournament {key}");
	Ok(id)
}

pub fn count_players(conn: &Connection) -> Result<usize> {
	let count = conn.query_row("SELECT COUNT(*) FROM players;", [], |row| {
		row.get::<usize, usize>(0)
	})?;

	debug!("{count} players registered");
	Ok(count)
}

/// Counts the players registered in a tournament. An unknown tournament has none.
pub fn count_players_in_tournament(conn: &Connection, key: &TournamentKey) -> Result<usize> {
	let Some(tournament) = find_tournament(conn, key)? else {
		debug!("no tournament {key}, counting zero players");
		return Ok(0);
	};

	let count = conn.query_row(
		"SELECT COUNT(*) FROM players WHERE tournament_id = ?1;",
		[tournament],
		|row| row.get::<usize, usize>(0),
	)?;

	debug!("{count} players registered in tournament {key}");
	Ok(count)
}

/// Checks that exactly one player called `player_name` is registered in the
/// tournament, and returns the tournament's id.
pub fn verify_player_registration(
	conn: &Connection,
	player_name: &str,
	key: &TournamentKey,
) -> Result<i64> {
	let tournament = tournament_id(conn, key)?;

	let count = conn.query_row(
		"SELECT COUNT(*) FROM players WHERE name_key = ?1 AND tournament_id = ?2;",
		params![name_key(player_name), tournament],
		|row| row.get::<usize, usize>(0),
	)?;

	match count {
		1 => Ok(tournament),
		0 => Err(TournamentError::NotFound(format!(
			"player '{player_name}' in tournament {key}"
		))),
		count => Err(TournamentError::Ambiguous {
			what: format!("player '{player_name}' in tournament {key}"),
			count,
		}),
	}
}

/// Returns the tournament's players ranked by wins, highest first. Players
/// with equal wins keep registration order. An unknown tournament has no
/// standings.
pub fn player_standings(conn: &Connection, key: &TournamentKey) -> Result<Vec<Standing>> {
	let Some(tournament) = find_tournament(conn, key)? else {
		debug!("no tournament {key}, standings are empty");
		return Ok(Vec::new());
	};

	let mut stmt = conn.prepare(
		"SELECT p.id, p.name, COALESCE(w.wins, 0) AS wins, COALESCE(m.matches, 0) AS matches
		 FROM players p
		 LEFT JOIN (
			SELECT winner_id, COUNT(*) AS wins
			FROM matches WHERE tournament_id = ?1
			GROUP BY winner_id
		 ) w ON w.winner_id = p.id
		 LEFT JOIN (
			SELECT player_id, COUNT(*) AS matches
			FROM (
				SELECT winner_id AS player_id FROM matches WHERE tournament_id = ?1
				UNION ALL
				SELECT loser_id AS player_id FROM matches WHERE tournament_id = ?1
			)
			GROUP BY player_id
		 ) m ON m.player_id = p.id
		 WHERE p.tournament_id = ?1
		 ORDER BY wins DESC, p.id ASC;",
	)?;

	let standings = stmt
		.query_map([tournament], |row| {
			Ok(Standing {
				id: row.get(0)?,
				name: row.get(1)?,
				wins: row.get(2)?,
				matches: row.get(3)?,
			})
		})?
		.collect::<rusqlite::Result<Vec<_>>>()?;

	debug!("{} players in standings for tournament {key}", standings.len());
	Ok(standings)
}

fn player_tournament(conn: &Connection, player: i64) -> Result<Option<i64>> {
	conn.query_row(
		"SELECT tournament_id FROM players WHERE id = ?1;",
		[player],
		|row| row.get::<usize, Option<i64>>(0),
	)
	.optional()?
	.ok_or_else(|| TournamentError::NotFound(format!("player {player}")))
}

/// Inserts a match after checking both players belong to `tournament`.
pub(crate) fn record_match(conn: &Connection, tournament: i64, winner: i64, loser: i64) -> Result<()> {
	if winner == loser {
		return Err(TournamentError::Validation(format!(
			"player {winner} cannot play against themselves"
		)));
	}

	for player in [winner, loser] {
		if player_tournament(conn, player)? != Some(tournament) {
			return Err(TournamentError::Validation(format!(
				"player {player} is not registered in tournament {tournament}"
			)));
		}
	}

	conn.execute(
		"INSERT INTO matches (winner_id, loser_id, tournament_id) VALUES (?1, ?2, ?3);",
		params![winner, loser, tournament],
	)?;

	Ok(())
}

pub fn report_match(conn: &mut Connection, winner: i64, loser: i64, key: &TournamentKey) -> Result<()> {
	let tx = conn.transaction()?;
	let tournament = tournament_id(&tx, key)?;
	record_match(&tx, tournament, winner, loser)?;
	tx.commit()?;

	info!("player {winner} beat player {loser} in tournament {key}");
	Ok(())
}

/// Computes next-round pairings from the tournament's current standings.
pub fn swiss_pairings(conn: &Connection, key: &TournamentKey) -> Result<Round> {
	let standings = player_standings(conn, key)?;
	let round = pairing::swiss_pairings(&standings)?;

	debug!("{} pairs for tournament {key}", round.pairs.len());
	Ok(round)
}

fn delete_all(conn: &mut Connection, table: &str) -> Result<usize> {
	let tx = conn.transaction()?;
	let deleted = tx.execute(&format!("DELETE FROM {table};"), [])?;
	tx.commit()?;

	info!("deleted {deleted} rows from {table}");
	Ok(deleted)
}

pub fn delete_matches(conn: &mut Connection) -> Result<usize> {
	delete_all(conn, "matches")
}

/// Fails while matches still reference players.
pub fn delete_players(conn: &mut Connection) -> Result<usize> {
	delete_all(conn, "players")
}

/// Fails while players or matches still reference tournaments.
pub fn delete_tournaments(conn: &mut Connection) -> Result<usize> {
	delete_all(conn, "tournaments")
}
