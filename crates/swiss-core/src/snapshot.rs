//! Per-round view of a participant, rebuilt from match history.

use crate::{Color, Match, ParticipantId, Score, Tournament};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the pairing engine knows about a participant.
///
/// Snapshots are values: they are rebuilt from the tournament's match
/// history for every pairing call rather than patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub id: ParticipantId,
    pub score: Score,
    /// Opponents in the order they were met.
    #[serde(default)]
    pub opponents: Vec<ParticipantId>,
    /// Colors played, parallel to `opponents`.
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub byes: u32,
}

impl ParticipantSnapshot {
    /// Creates a snapshot with no history.
    pub fn new(id: impl Into<ParticipantId>, score: Score) -> Self {
        ParticipantSnapshot {
            id: id.into(),
            score,
            opponents: Vec::new(),
            colors: Vec::new(),
            byes: 0,
        }
    }

    /// Returns true if `other` is among the previous opponents.
    pub fn has_played(&self, other: &ParticipantId) -> bool {
        self.opponents.iter().any(|o| o == other)
    }

    /// Number of games played with the white pieces.
    pub fn white_count(&self) -> usize {
        self.colors.iter().filter(|&&c| c == Color::White).count()
    }

    /// Color of the most recent game, if any.
    pub fn last_color(&self) -> Option<Color> {
        self.colors.last().copied()
    }

    /// Records a game against `opponent` with `color`.
    pub fn record_game(&mut self, opponent: ParticipantId, color: Color) {
        self.opponents.push(opponent);
        self.colors.push(color);
    }

    /// Builds snapshots for every participant of `tournament`.
    ///
    /// Output follows registration order. Only matches of this tournament
    /// are considered, in round then board order; boards naming an unknown
    /// participant are skipped.
    pub fn build_all(tournament: &Tournament, matches: &[Match]) -> Vec<ParticipantSnapshot> {
        let mut snapshots: Vec<ParticipantSnapshot> = tournament
            .participants
            .iter()
            .map(|p| ParticipantSnapshot {
                id: p.id.clone(),
                score: p.score,
                opponents: Vec::new(),
                colors: Vec::new(),
                byes: p.byes(),
            })
            .collect();

        let index: HashMap<ParticipantId, usize> = snapshots
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        let mut history: Vec<&Match> = matches
            .iter()
            .filter(|m| m.tournament == tournament.id)
            .collect();
        history.sort_by_key(|m| (m.round, m.board));

        for m in history {
            let (Some(&w), Some(&b)) = (index.get(&m.white), index.get(&m.black)) else {
                continue;
            };
            snapshots[w].record_game(m.black.clone(), Color::White);
            snapshots[b].record_game(m.white.clone(), Color::Black);
        }

        snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, TournamentId};

    fn tournament() -> Tournament {
        let mut t = Tournament::new("t", "Test", 3);
        for id in ["a", "b", "c", "d"] {
            t.register(Participant::new(id)).unwrap();
        }
        t
    }

    fn board(round: u32, board: u32, white: &str, black: &str) -> Match {
        Match::new(TournamentId::from("t"), round, board, white.into(), black.into())
    }

    #[test]
    fn history_in_round_order() {
        let t = tournament();
        let matches = vec![
            board(2, 1, "c", "a"),
            board(1, 1, "a", "b"),
            board(1, 2, "c", "d"),
        ];

        let snaps = ParticipantSnapshot::build_all(&t, &matches);
        assert_eq!(snaps.len(), 4);
        let a = &snaps[0];
        assert_eq!(
            a.opponents,
            vec![ParticipantId::from("b"), ParticipantId::from("c")]
        );
        assert_eq!(a.colors, vec![Color::White, Color::Black]);
        assert_eq!(a.white_count(), 1);
        assert_eq!(a.last_color(), Some(Color::Black));
        assert!(a.has_played(&"c".into()));
        assert!(!a.has_played(&"d".into()));
    }

    #[test]
    fn foreign_and_unknown_matches_skipped() {
        let t = tournament();
        let mut other = board(1, 1, "a", "b");
        other.tournament = TournamentId::from("other");
        let matches = vec![other, board(1, 2, "a", "ghost")];

        let snaps = ParticipantSnapshot::build_all(&t, &matches);
        assert!(snaps.iter().all(|s| s.opponents.is_empty()));
    }

    #[test]
    fn carries_score_and_byes() {
        let mut t = tournament();
        t.participants[3].score = Score::ONE;
        t.participants[3].bye_rounds.push(1);

        let snaps = ParticipantSnapshot::build_all(&t, &[]);
        assert_eq!(snaps[3].score, Score::ONE);
        assert_eq!(snaps[3].byes, 1);
    }
}
