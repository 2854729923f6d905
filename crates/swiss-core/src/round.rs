//! Boards of a round and the uniqueness rules they obey.

use crate::{Color, MatchResult, ParticipantId, TournamentId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Violations of the per-round match invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("round numbers start at 1")]
    InvalidRound,

    #[error("board numbers start at 1 (round {round})")]
    InvalidBoard { round: u32 },

    #[error("participant {0} cannot play against itself")]
    SelfPairing(ParticipantId),

    #[error("board {board} is used twice in round {round}")]
    DuplicateBoard { round: u32, board: u32 },

    #[error("{first} and {second} are paired twice in round {round}")]
    DuplicatePair {
        round: u32,
        first: ParticipantId,
        second: ParticipantId,
    },
}

/// A single board between two participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub tournament: TournamentId,
    pub round: u32,
    pub board: u32,
    pub white: ParticipantId,
    pub black: ParticipantId,
    #[serde(default)]
    pub result: MatchResult,
    /// Set when the pairing engine had to repeat an earlier pairing.
    #[serde(default)]
    pub forced_rematch: bool,
}

impl Match {
    /// Creates a pending match.
    pub fn new(
        tournament: TournamentId,
        round: u32,
        board: u32,
        white: ParticipantId,
        black: ParticipantId,
    ) -> Self {
        Match {
            tournament,
            round,
            board,
            white,
            black,
            result: MatchResult::Pending,
            forced_rematch: false,
        }
    }

    /// Returns the participant playing `color`.
    pub fn player(&self, color: Color) -> &ParticipantId {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    /// Returns true if both participants are on this board, in either color.
    pub fn involves_pair(&self, a: &ParticipantId, b: &ParticipantId) -> bool {
        (&self.white == a && &self.black == b) || (&self.white == b && &self.black == a)
    }

    /// The unordered pair key of this board.
    fn pair_key(&self) -> (&ParticipantId, &ParticipantId) {
        if self.white <= self.black {
            (&self.white, &self.black)
        } else {
            (&self.black, &self.white)
        }
    }
}

/// Checks the per-round invariants over a set of matches.
///
/// Matches of different tournaments are validated independently.
pub fn validate_round(matches: &[Match]) -> Result<(), MatchError> {
    let mut boards = HashSet::new();
    let mut pairs = HashSet::new();

    for m in matches {
        if m.round == 0 {
            return Err(MatchError::InvalidRound);
        }
        if m.board == 0 {
            return Err(MatchError::InvalidBoard { round: m.round });
        }
        if m.white == m.black {
            return Err(MatchError::SelfPairing(m.white.clone()));
        }
        if !boards.insert((&m.tournament, m.round, m.board)) {
            return Err(MatchError::DuplicateBoard {
                round: m.round,
                board: m.board,
            });
        }
        let (first, second) = m.pair_key();
        if !pairs.insert((&m.tournament, m.round, first, second)) {
            return Err(MatchError::DuplicatePair {
                round: m.round,
                first: first.clone(),
                second: second.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(round: u32, board: u32, white: &str, black: &str) -> Match {
        Match::new(
            TournamentId::from("t"),
            round,
            board,
            white.into(),
            black.into(),
        )
    }

    #[test]
    fn valid_round_passes() {
        let matches = vec![board(1, 1, "a", "b"), board(1, 2, "c", "d")];
        assert_eq!(validate_round(&matches), Ok(()));
    }

    #[test]
    fn duplicate_board_rejected() {
        let matches = vec![board(1, 1, "a", "b"), board(1, 1, "c", "d")];
        assert_eq!(
            validate_round(&matches),
            Err(MatchError::DuplicateBoard { round: 1, board: 1 })
        );
    }

    #[test]
    fn reversed_pair_rejected() {
        let matches = vec![board(2, 1, "a", "b"), board(2, 2, "b", "a")];
        assert!(matches!(
            validate_round(&matches),
            Err(MatchError::DuplicatePair { round: 2, .. })
        ));
    }

    #[test]
    fn same_pair_in_different_rounds_is_fine() {
        let matches = vec![board(1, 1, "a", "b"), board(2, 1, "b", "a")];
        assert_eq!(validate_round(&matches), Ok(()));
    }

    #[test]
    fn zero_numbers_and_self_pairing_rejected() {
        assert_eq!(
            validate_round(&[board(0, 1, "a", "b")]),
            Err(MatchError::InvalidRound)
        );
        assert_eq!(
            validate_round(&[board(1, 0, "a", "b")]),
            Err(MatchError::InvalidBoard { round: 1 })
        );
        assert_eq!(
            validate_round(&[board(1, 1, "a", "a")]),
            Err(MatchError::SelfPairing("a".into()))
        );
    }

    #[test]
    fn player_lookup() {
        let m = board(1, 1, "a", "b");
        assert_eq!(m.player(Color::White), &ParticipantId::from("a"));
        assert_eq!(m.player(Color::Black), &ParticipantId::from("b"));
        assert!(m.involves_pair(&"b".into(), &"a".into()));
    }
}
