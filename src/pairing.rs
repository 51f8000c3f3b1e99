use std::collections::HashSet;

use log::warn;

use crate::data::Standing;
use crate::error::{Result, TournamentError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pairing {
	pub id1: i64,
	pub name1: String,
	pub id2: i64,
	pub name2: String,
}

impl Pairing {
	fn new(first: &Standing, second: &Standing) -> Self {
		Self {
			id1: first.id,
			name1: first.name.clone(),
			id2: second.id,
			name2: second.name.clone(),
		}
	}
}

/// Pairings for the next round. `bye` holds the lowest-ranked player when
/// the field has an odd number of players.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Round {
	pub pairs: Vec<Pairing>,
	pub bye: Option<Standing>,
}

/// Pairs adjacent players in standings order: rank 1 with rank 2, rank 3
/// with rank 4, and so on.
///
/// `standings` must already be sorted by wins, highest first. Malformed
/// input is rejected as a whole; no partial round is produced.
pub fn swiss_pairings(standings: &[Standing]) -> Result<Round> {
	check_standings(standings)?;

	let mut chunks = standings.chunks_exact(2);
	let pairs = chunks
		.by_ref()
		.map(|pair| Pairing::new(&pair[0], &pair[1]))
		.collect();
	let bye = chunks.remainder().first().cloned();

	if let Some(player) = &bye {
		warn!("odd number of players, {} ({}) sits out this round", player.name, player.id);
	}

	Ok(Round { pairs, bye })
}

fn check_standings(standings: &[Standing]) -> Result<()> {
	let mut seen = HashSet::with_capacity(standings.len());

	for entry in standings {
		if !seen.insert(entry.id) {
			return Err(TournamentError::Validation(format!(
				"player {} appears more than once in the standings",
				entry.id
			)));
		}
		if entry.wins > entry.matches {
			return Err(TournamentError::Validation(format!(
				"player {} has {} wins from only {} matches",
				entry.id, entry.wins, entry.matches
			)));
		}
	}

	if let Some(pair) = standings.windows(2).find(|w| w[0].wins < w[1].wins) {
		return Err(TournamentError::Validation(format!(
			"standings are not sorted by wins: player {} ({}) is ranked above player {} ({})",
			pair[0].id, pair[0].wins, pair[1].id, pair[1].wins
		)));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn standing(id: i64, wins: u32, matches: u32) -> Standing {
		Standing {
			id,
			name: format!("Player {id}"),
			wins,
			matches,
		}
	}

	fn ids(round: &Round) -> Vec<(i64, i64)> {
		round.pairs.iter().map(|p| (p.id1, p.id2)).collect()
	}

	#[test]
	fn empty_standings_give_an_empty_round() {
		let round = swiss_pairings(&[]).unwrap();
		assert!(round.pairs.is_empty());
		assert!(round.bye.is_none());
	}

	#[test]
	fn adjacent_ranks_are_paired() {
		let standings = vec![
			standing(3, 2, 2),
			standing(1, 2, 2),
			standing(4, 1, 2),
			standing(2, 1, 2),
			standing(6, 0, 2),
			standing(5, 0, 2),
		];
		let round = swiss_pairings(&standings).unwrap();

		assert_eq!(ids(&round), vec![(3, 1), (4, 2), (6, 5)]);
		assert_eq!(round.pairs[0].name1, "Player 3");
		assert_eq!(round.pairs[0].name2, "Player 1");
		assert!(round.bye.is_none());
	}

	#[test]
	fn odd_field_leaves_the_last_player_as_bye() {
		let standings = vec![standing(1, 1, 1), standing(2, 1, 1), standing(3, 0, 1)];
		let round = swiss_pairings(&standings).unwrap();

		assert_eq!(ids(&round), vec![(1, 2)]);
		assert_eq!(round.bye, Some(standing(3, 0, 1)));
	}

	#[test]
	fn single_player_only_gets_a_bye() {
		let round = swiss_pairings(&[standing(7, 0, 0)]).unwrap();
		assert!(round.pairs.is_empty());
		assert_eq!(round.bye.map(|s| s.id), Some(7));
	}

	#[test]
	fn every_player_is_paired_exactly_once() {
		let standings: Vec<_> = (1..=10).map(|id| standing(id, 0, 0)).collect();
		let round = swiss_pairings(&standings).unwrap();

		assert_eq!(round.pairs.len(), 5);
		let mut paired: Vec<i64> = round.pairs.iter().flat_map(|p| [p.id1, p.id2]).collect();
		paired.sort_unstable();
		assert_eq!(paired, (1..=10).collect::<Vec<_>>());
	}

	#[test]
	fn unsorted_standings_are_rejected() {
		let standings = vec![standing(1, 0, 1), standing(2, 1, 1)];
		let err = swiss_pairings(&standings).unwrap_err();
		assert!(matches!(err, TournamentError::Validation(_)));
	}

	#[test]
	fn repeated_player_is_rejected() {
		let standings = vec![standing(1, 1, 1), standing(1, 1, 1)];
		assert!(matches!(
			swiss_pairings(&standings),
			Err(TournamentError::Validation(_))
		));
	}

	#[test]
	fn more_wins_than_matches_is_rejected() {
		let standings = vec![standing(1, 2, 1), standing(2, 0, 1)];
		assert!(matches!(
			swiss_pairings(&standings),
			Err(TournamentError::Validation(_))
		));
	}
}
