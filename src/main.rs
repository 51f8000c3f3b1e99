mod cli;
mod data;
mod db;
mod error;
mod import;
mod pairing;

use std::{
	fs::File,
	io::{self, BufReader, Write},
};

use clap::Parser;
use cli::{Cli, Commands, DeleteTarget};
use data::Standing;
use error::Result;
use pairing::Round;
use rusqlite::Connection;

fn main() -> Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

	let cli = Cli::parse();

	let mut conn = db::open(&cli.database)?;

	let mut out = match cli.output.as_deref() {
		Some(path) => Box::new(File::create(path)?) as Box<dyn Write>,
		None => Box::new(io::stdout()) as Box<dyn Write>,
	};

	let string = run_command(&mut conn, cli.command)?;
	out.write_all(string.as_bytes())?;

	Ok(())
}

fn run_command(conn: &mut Connection, command: Commands) -> Result<String> {
	let string = match command {
		Commands::Tournament { name, start, end } => {
			let key = data::TournamentKey::new(name, start, end);
			let id = data::register_tournament(conn, &key)?;
			format!("Registered tournament {key} as {id}\n")
		}
		Commands::Player { name, scope } => match scope.key() {
			Some(key) => {
				let id = data::register_player_in_tournament(conn, &name, &key)?;
				format!("Registered {name} as player {id} in {key}\n")
			}
			None => {
				let id = data::register_player(conn, &name)?;
				format!("Registered {name} as player {id}\n")
			}
		},
		Commands::Count { scope } => {
			let count = match scope.key() {
				Some(key) => data::count_players_in_tournament(conn, &key)?,
				None => data::count_players(conn)?,
			};
			format!("{count}\n")
		}
		Commands::Verify { player, tournament } => {
			let key = tournament.key();
			let id = data::verify_player_registration(conn, &player, &key)?;
			format!("{player} is registered in tournament {id}\n")
		}
		Commands::Standings { tournament } => {
			standings_string(&data::player_standings(conn, &tournament.key())?)
		}
		Commands::Report {
			winner,
			loser,
			tournament,
		} => {
			data::report_match(conn, winner, loser, &tournament.key())?;
			format!("Recorded {winner} beating {loser}\n")
		}
		Commands::Load {
			matches,
			tournament,
		} => {
			let file = BufReader::new(File::open(&matches)?);
			let loaded = import::load_matches(conn, file, &tournament.key())?;
			format!("Loaded {loaded} matches from {}\n", matches.display())
		}
		Commands::Pairings { tournament } => {
			pairings_string(&data::swiss_pairings(conn, &tournament.key())?)
		}
		Commands::Delete { target } => {
			let mut deleted = 0;
			if matches!(target, DeleteTarget::Matches | DeleteTarget::All) {
				deleted += data::delete_matches(conn)?;
			}
			if matches!(target, DeleteTarget::Players | DeleteTarget::All) {
				deleted += data::delete_players(conn)?;
			}
			if matches!(target, DeleteTarget::Tournaments | DeleteTarget::All) {
				deleted += data::delete_tournaments(conn)?;
			}
			format!("Deleted {deleted} records\n")
		}
	};

	Ok(string)
}

fn standings_string(standings: &[Standing]) -> String {
	let mut string = String::from("# Standings\n```");

	for (rank, entry) in standings.iter().enumerate() {
		string.push_str(&format!(
			"\n{}: {} (#{}) - {} wins / {} matches",
			rank + 1,
			entry.name,
			entry.id,
			entry.wins,
			entry.matches
		));
	}

	string.push_str("\n```\n");

	string
}

fn pairings_string(round: &Round) -> String {
	let mut string = String::from("# Pairings\n```");

	for (table, pair) in round.pairs.iter().enumerate() {
		string.push_str(&format!(
			"\n{}: {} (#{}) vs {} (#{})",
			table + 1,
			pair.name1,
			pair.id1,
			pair.name2,
			pair.id2
		));
	}

	if let Some(bye) = &round.bye {
		string.push_str(&format!("\nbye: {} (#{})", bye.name, bye.id));
	}

	string.push_str("\n```\n");

	string
}
