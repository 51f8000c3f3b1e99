use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::data::TournamentKey;

#[derive(Parser)]
#[command(author, version, about = "Swiss-system tournament registry and pairing", long_about = None)]
pub struct Cli {
	/// SQLite database holding tournaments, players and matches.
	#[arg(short, long, value_name = "FILE", default_value = "tournament.db")]
	pub database: PathBuf,

	#[arg(short, long, value_name = "FILE")]
	pub output: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Args)]
pub struct TournamentArgs {
	/// Tournament name, matched case-insensitively.
	#[arg(short, long, value_name = "NAME")]
	pub tournament: String,

	#[arg(long, value_name = "YYYY-MM-DD")]
	pub start: NaiveDate,

	#[arg(long, value_name = "YYYY-MM-DD")]
	pub end: NaiveDate,
}

impl TournamentArgs {
	pub fn key(&self) -> TournamentKey {
		TournamentKey::new(self.tournament.clone(), self.start, self.end)
	}
}

/// Optional tournament scope: either all three of name, start and end, or none.
#[derive(Args)]
pub struct ScopeArgs {
	#[arg(short, long, value_name = "NAME", requires = "start", requires = "end")]
	pub tournament: Option<String>,

	#[arg(long, value_name = "YYYY-MM-DD", requires = "tournament")]
	pub start: Option<NaiveDate>,

	#[arg(long, value_name = "YYYY-MM-DD", requires = "tournament")]
	pub end: Option<NaiveDate>,
}

impl ScopeArgs {
	pub fn key(&self) -> Option<TournamentKey> {
		match (&self.tournament, self.start, self.end) {
			(Some(name), Some(start), Some(end)) => Some(TournamentKey::new(name.clone(), start, end)),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DeleteTarget {
	Matches,
	Players,
	Tournaments,
	/// Matches, then players, then tournaments.
	All,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Register a tournament.
	Tournament {
		name: String,
		#[arg(long, value_name = "YYYY-MM-DD")]
		start: NaiveDate,
		#[arg(long, value_name = "YYYY-MM-DD")]
		end: NaiveDate,
	},
	/// Register a player, optionally in a tournament.
	Player {
		name: String,
		#[command(flatten)]
		scope: ScopeArgs,
	},
	/// Count registered players, globally or in a tournament.
	Count {
		#[command(flatten)]
		scope: ScopeArgs,
	},
	/// Check that a player is registered in a tournament.
	Verify {
		player: String,
		#[command(flatten)]
		tournament: TournamentArgs,
	},
	Standings {
		#[command(flatten)]
		tournament: TournamentArgs,
	},
	/// Record that `winner` beat `loser`.
	Report {
		winner: i64,
		loser: i64,
		#[command(flatten)]
		tournament: TournamentArgs,
	},
	/// Load match results from a CSV file with `winner,loser` columns.
	Load {
		#[arg(value_name = "FILE")]
		matches: PathBuf,
		#[command(flatten)]
		tournament: TournamentArgs,
	},
	/// Pair players for the next round.
	Pairings {
		#[command(flatten)]
		tournament: TournamentArgs,
	},
	Delete {
		#[arg(value_enum)]
		target: DeleteTarget,
	},
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_tournament_scoped_player() {
		let cli = Cli::try_parse_from([
			"swisstourney",
			"player",
			"Chandra Nalaar",
			"--tournament",
			"Foobar tournament",
			"--start",
			"2015-05-01",
			"--end",
			"2015-05-10",
		])
		.unwrap();

		let Commands::Player { name, scope } = cli.command else {
			panic!("expected player command");
		};
		assert_eq!(name, "Chandra Nalaar");
		let key = scope.key().unwrap();
		assert_eq!(key.name, "Foobar tournament");
		assert_eq!(key.start, NaiveDate::from_ymd_opt(2015, 5, 1).unwrap());
	}

	#[test]
	fn scope_needs_both_dates() {
		let result = Cli::try_parse_from(["swisstourney", "count", "--tournament", "Foobar", "--start", "2015-05-01"]);
		assert!(result.is_err());
	}

	#[test]
	fn unscoped_count_has_no_key() {
		let cli = Cli::try_parse_from(["swisstourney", "count"]).unwrap();
		let Commands::Count { scope } = cli.command else {
			panic!("expected count command");
		};
		assert!(scope.key().is_none());
	}

	#[test]
	fn rejects_malformed_dates() {
		let result = Cli::try_parse_from([
			"swisstourney",
			"standings",
			"-t",
			"Foobar",
			"--start",
			"May 1st",
			"--end",
			"2015-05-10",
		]);
		assert!(result.is_err());
	}
}
